// =============================================================================
// Indicator snapshots
// =============================================================================
//
// A snapshot is the per-scan, per-instrument indicator state handed to the
// signal evaluator. Snapshots are computed fresh from the bar history on
// every pass and never persisted. `None` means the instrument does not have
// enough (or clean enough) history this pass; the scanner skips it.

use crate::indicators::bollinger::{self, BollingerBands};
use crate::indicators::ema;
use crate::market_data::PriceBar;

/// Bollinger window length.
pub const BOLLINGER_PERIOD: usize = 20;
/// Band half-width in standard deviations.
pub const BOLLINGER_NUM_STD: f64 = 2.0;

/// EMA spans for the crossover strategy. The slow span is the minimum
/// history required before any EMA signal is considered valid.
pub const EMA_FAST_PERIOD: usize = 13;
pub const EMA_MID_PERIOD: usize = 50;
pub const EMA_SLOW_PERIOD: usize = 200;

/// Bollinger(20,2) state plus the reference close of the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSnapshot {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub close: f64,
}

/// EMA 13/50/200 state plus the reference close and open of the most recent
/// bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaSnapshot {
    pub fast: f64,
    pub mid: f64,
    pub slow: f64,
    pub close: f64,
    pub open: f64,
}

/// Build a [`BandSnapshot`] from an oldest-to-newest bar history.
///
/// Requires at least [`BOLLINGER_PERIOD`] bars and a finite, positive
/// reference close.
pub fn band_snapshot(bars: &[PriceBar]) -> Option<BandSnapshot> {
    let last = bars.last()?;
    if !last.close.is_finite() || last.close <= 0.0 {
        return None;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let BollingerBands {
        upper,
        middle,
        lower,
    } = bollinger::calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD)?;

    Some(BandSnapshot {
        upper,
        middle,
        lower,
        close: last.close,
    })
}

/// Build an [`EmaSnapshot`] from an oldest-to-newest bar history.
///
/// Requires at least [`EMA_SLOW_PERIOD`] bars so the slowest average is
/// seeded; shorter histories are a normal no-snapshot outcome.
pub fn ema_snapshot(bars: &[PriceBar]) -> Option<EmaSnapshot> {
    if bars.len() < EMA_SLOW_PERIOD {
        return None;
    }

    let last = bars.last()?;
    if !last.close.is_finite() || !last.open.is_finite() || last.close <= 0.0 {
        return None;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast = ema::latest_ema(&closes, EMA_FAST_PERIOD)?;
    let mid = ema::latest_ema(&closes, EMA_MID_PERIOD)?;
    let slow = ema::latest_ema(&closes, EMA_SLOW_PERIOD)?;

    Some(EmaSnapshot {
        fast,
        mid,
        slow,
        close: last.close,
        open: last.open,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 604_800, 0).unwrap(),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000.0,
            })
            .collect()
    }

    #[test]
    fn band_snapshot_requires_twenty_bars() {
        let closes: Vec<f64> = (1..=19).map(|x| x as f64).collect();
        assert!(band_snapshot(&bars_from_closes(&closes)).is_none());

        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let snap = band_snapshot(&bars_from_closes(&closes)).unwrap();
        assert!((snap.close - 20.0).abs() < 1e-9);
        assert!((snap.middle - 10.5).abs() < 1e-9);
    }

    #[test]
    fn band_snapshot_uses_latest_close_as_reference() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64 * 2.0).collect();
        let snap = band_snapshot(&bars_from_closes(&closes)).unwrap();
        assert!((snap.close - 80.0).abs() < 1e-9);
    }

    #[test]
    fn ema_snapshot_requires_slow_span() {
        let closes: Vec<f64> = (1..=199).map(|x| x as f64).collect();
        assert!(ema_snapshot(&bars_from_closes(&closes)).is_none());

        let closes: Vec<f64> = (1..=200).map(|x| x as f64).collect();
        let snap = ema_snapshot(&bars_from_closes(&closes)).unwrap();
        assert!((snap.close - 200.0).abs() < 1e-9);
        assert!((snap.open - 199.5).abs() < 1e-9);
        // Rising series: the faster the span, the closer it tracks price.
        assert!(snap.fast > snap.mid);
        assert!(snap.mid > snap.slow);
    }

    #[test]
    fn empty_history_has_no_snapshot() {
        assert!(band_snapshot(&[]).is_none());
        assert!(ema_snapshot(&[]).is_none());
    }

    #[test]
    fn non_finite_reference_close_has_no_snapshot() {
        let mut bars = bars_from_closes(&(1..=20).map(|x| x as f64).collect::<Vec<_>>());
        bars.last_mut().unwrap().close = f64::NAN;
        assert!(band_snapshot(&bars).is_none());
    }
}
