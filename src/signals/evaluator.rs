// =============================================================================
// Signal evaluators
// =============================================================================

use crate::indicators::snapshot::{BandSnapshot, EmaSnapshot};
use crate::signals::{SignalState, EPSILON};

/// Band-proximity check: the close sits on or above the lower band, and no
/// more than `threshold_pct` percent above it.
///
/// Both boundaries are inclusive within [`EPSILON`]. Returns `None` when the
/// lower band is non-positive or any input is non-finite; the caller treats
/// that as insufficient data rather than dividing by a degenerate band.
pub fn evaluate_band_proximity(snap: &BandSnapshot, threshold_pct: f64) -> Option<SignalState> {
    let BandSnapshot { lower, close, .. } = *snap;

    if !lower.is_finite() || !close.is_finite() || !threshold_pct.is_finite() {
        return None;
    }
    if lower <= 0.0 {
        return None;
    }

    let ceiling = lower * (1.0 + threshold_pct / 100.0);
    if close >= lower - EPSILON && close <= ceiling + EPSILON {
        Some(SignalState::WithinRange)
    } else {
        Some(SignalState::NoSignal)
    }
}

/// EMA-crossover check.
///
/// Bullish: the fast and mid averages have converged to within
/// `diff_threshold` price units, the slow average sits above both, and the
/// reference candle closed up above the mid average. Bearish is the mirror
/// image. The two cannot both hold (their slow-average comparisons are
/// opposite-signed); degenerate equalities fall through to `NoSignal`.
pub fn evaluate_ema_crossover(snap: &EmaSnapshot, diff_threshold: f64) -> SignalState {
    let EmaSnapshot {
        fast,
        mid,
        slow,
        close,
        open,
    } = *snap;

    let finite = fast.is_finite()
        && mid.is_finite()
        && slow.is_finite()
        && close.is_finite()
        && open.is_finite();
    if !finite {
        return SignalState::NoSignal;
    }

    let converged = (fast - mid).abs() < diff_threshold;

    if converged && slow > mid && slow > fast && close > mid && close > open {
        SignalState::Bullish
    } else if converged && slow < mid && slow < fast && close < mid && close < open {
        SignalState::Bearish
    } else {
        SignalState::NoSignal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(lower: f64, close: f64) -> BandSnapshot {
        BandSnapshot {
            upper: lower + 20.0,
            middle: lower + 10.0,
            lower,
            close,
        }
    }

    fn emas(fast: f64, mid: f64, slow: f64, close: f64, open: f64) -> EmaSnapshot {
        EmaSnapshot {
            fast,
            mid,
            slow,
            close,
            open,
        }
    }

    // ---- band proximity ----------------------------------------------------

    #[test]
    fn close_on_lower_band_is_within_range() {
        assert_eq!(
            evaluate_band_proximity(&band(100.0, 100.0), 3.0),
            Some(SignalState::WithinRange)
        );
    }

    #[test]
    fn close_on_threshold_ceiling_is_within_range() {
        // 100 * 1.03 rounds just below 103.0 in f64; the inclusive boundary
        // must still admit an exact 103.
        assert_eq!(
            evaluate_band_proximity(&band(100.0, 103.0), 3.0),
            Some(SignalState::WithinRange)
        );
    }

    #[test]
    fn close_past_threshold_ceiling_is_no_signal() {
        assert_eq!(
            evaluate_band_proximity(&band(100.0, 103.01), 3.0),
            Some(SignalState::NoSignal)
        );
    }

    #[test]
    fn close_below_lower_band_is_no_signal() {
        assert_eq!(
            evaluate_band_proximity(&band(100.0, 99.5), 3.0),
            Some(SignalState::NoSignal)
        );
    }

    #[test]
    fn non_positive_lower_band_is_invalid() {
        assert!(evaluate_band_proximity(&band(0.0, 10.0), 3.0).is_none());
        assert!(evaluate_band_proximity(&band(-4.0, 10.0), 3.0).is_none());
    }

    #[test]
    fn non_finite_inputs_are_invalid() {
        assert!(evaluate_band_proximity(&band(f64::NAN, 10.0), 3.0).is_none());
        assert!(evaluate_band_proximity(&band(100.0, f64::INFINITY), 3.0).is_none());
    }

    // ---- ema crossover -----------------------------------------------------

    #[test]
    fn converged_stack_below_slow_with_up_candle_is_bullish() {
        // |104 - 100| = 4 < 5, slow above both, candle closed up above mid.
        let snap = emas(104.0, 100.0, 120.0, 106.0, 103.0);
        assert_eq!(evaluate_ema_crossover(&snap, 5.0), SignalState::Bullish);
    }

    #[test]
    fn mirrored_inequalities_are_bearish() {
        let snap = emas(96.0, 100.0, 80.0, 94.0, 97.0);
        assert_eq!(evaluate_ema_crossover(&snap, 5.0), SignalState::Bearish);
    }

    #[test]
    fn wide_fast_mid_spread_is_no_signal() {
        // diff = 6 >= 5 kills the signal regardless of the other conditions.
        let snap = emas(106.0, 100.0, 120.0, 108.0, 105.0);
        assert_eq!(evaluate_ema_crossover(&snap, 5.0), SignalState::NoSignal);
    }

    #[test]
    fn degenerate_slow_equals_mid_is_no_signal() {
        let snap = emas(101.0, 100.0, 100.0, 103.0, 101.0);
        assert_eq!(evaluate_ema_crossover(&snap, 5.0), SignalState::NoSignal);
    }

    #[test]
    fn flat_candle_is_no_signal() {
        // close == open fails the candle-direction condition on both sides.
        let snap = emas(104.0, 100.0, 120.0, 106.0, 106.0);
        assert_eq!(evaluate_ema_crossover(&snap, 5.0), SignalState::NoSignal);
    }

    #[test]
    fn non_finite_ema_is_no_signal() {
        let snap = emas(f64::NAN, 100.0, 120.0, 106.0, 103.0);
        assert_eq!(evaluate_ema_crossover(&snap, 5.0), SignalState::NoSignal);
    }

    #[test]
    fn exact_threshold_gap_is_no_signal() {
        // The convergence test is strict: a gap of exactly D does not fire.
        let snap = emas(105.0, 100.0, 120.0, 107.0, 104.0);
        assert_eq!(evaluate_ema_crossover(&snap, 5.0), SignalState::NoSignal);
    }

    #[test]
    fn mirroring_a_bullish_stack_yields_bearish() {
        // Reflecting every value through the mid average swaps the
        // classification; nothing maps to both.
        let bullish = emas(104.0, 100.0, 120.0, 106.0, 103.0);
        assert_eq!(evaluate_ema_crossover(&bullish, 5.0), SignalState::Bullish);

        let mirrored = emas(
            200.0 - bullish.fast,
            100.0,
            200.0 - bullish.slow,
            200.0 - bullish.close,
            200.0 - bullish.open,
        );
        assert_eq!(evaluate_ema_crossover(&mirrored, 5.0), SignalState::Bearish);
    }
}
