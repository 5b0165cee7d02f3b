// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first EMA value is seeded with the SMA of the first `period` closes.
// The series is recomputed from scratch over the full window on every scan;
// no state is carried between scans.

/// Compute the EMA series for `closes` with the given look-back `period`.
///
/// Returns an empty `Vec` when the input is shorter than `period` or the
/// period is zero. Each output element corresponds to a close starting at
/// index `period - 1`.
///
/// # Edge cases
/// - `period == 0` => empty vec (division guard)
/// - `closes.len() < period` => empty vec
/// - A non-finite intermediate value stops the series; downstream consumers
///   must not trust a broken tail.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let sma: f64 = closes[..period].iter().sum::<f64>() / period as f64;
    if !sma.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len() - period + 1);
    result.push(sma);

    let mut prev = sma;
    for &close in &closes[period..] {
        let ema = close * multiplier + prev * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev = ema;
    }

    result
}

/// Most recent EMA value for `closes`, or `None` when the history is too
/// short to seed the average.
pub fn latest_ema(closes: &[f64], period: usize) -> Option<f64> {
    calculate_ema(closes, period).last().copied()
}
