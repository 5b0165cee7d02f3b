// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA over the trailing window, upper/lower = middle +- k*sigma.
// Sigma is the *population* standard deviation (divide by N, not N-1); the
// same window feeds both the mean and the deviation.

/// Result of a Bollinger Band calculation over the trailing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Calculate Bollinger Bands over the last `period` closes.
///
/// Returns `None` when:
/// - `period` is zero or fewer than `period` closes are available.
/// - The middle band is non-positive (degenerate for an equity series).
/// - Any band comes out non-finite.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<BollingerBands> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;

    if middle <= 0.0 {
        return None;
    }

    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period as f64;
    let std_dev = variance.sqrt();

    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;

    if upper.is_finite() && lower.is_finite() {
        Some(BollingerBands {
            upper,
            middle,
            lower,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_band_is_mean_of_window() {
        // Window mean of 81..=100 is 90.5; the earlier closes must not count.
        let closes: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        let mean: f64 = closes[80..].iter().sum::<f64>() / 20.0;
        assert!((bb.middle - mean).abs() < 1e-9);
        assert!((bb.middle - 90.5).abs() < 1e-9);
    }

    #[test]
    fn bands_are_symmetric_around_middle() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64 * 3.0).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert!(bb.upper > bb.middle);
        assert!(bb.lower < bb.middle);
        assert!(((bb.upper - bb.middle) - (bb.middle - bb.lower)).abs() < 1e-9);
    }

    #[test]
    fn population_std_dev_known_values() {
        // [2, 4, 4, 4, 5, 5, 7, 9] has population sigma exactly 2.
        let closes = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bb = calculate_bollinger(&closes, 8, 2.0).unwrap();
        assert!((bb.middle - 5.0).abs() < 1e-9);
        assert!((bb.upper - 9.0).abs() < 1e-9);
        assert!((bb.lower - 1.0).abs() < 1e-9);
    }

    #[test]
    fn insufficient_data_returns_none() {
        let closes = vec![1.0, 2.0, 3.0];
        assert!(calculate_bollinger(&closes, 20, 2.0).is_none());
        assert!(calculate_bollinger(&[], 20, 2.0).is_none());
    }

    #[test]
    fn zero_period_returns_none() {
        assert!(calculate_bollinger(&[1.0, 2.0], 0, 2.0).is_none());
    }

    #[test]
    fn non_positive_middle_returns_none() {
        let closes = vec![0.0; 20];
        assert!(calculate_bollinger(&closes, 20, 2.0).is_none());
        let closes = vec![-5.0; 20];
        assert!(calculate_bollinger(&closes, 20, 2.0).is_none());
    }

    #[test]
    fn flat_series_collapses_bands() {
        let closes = vec![100.0; 20];
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert!((bb.upper - 100.0).abs() < 1e-9);
        assert!((bb.lower - 100.0).abs() < 1e-9);
    }
}
