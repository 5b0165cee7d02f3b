// =============================================================================
// Alert message formatting
// =============================================================================
//
// Telegram HTML bodies. Markup is cosmetic; the contract is that every
// alert names the instrument, the reference price, the indicator values
// that fired, and the percentage distance that triggered the signal.

use crate::indicators::snapshot::{BandSnapshot, EmaSnapshot};
use crate::signals::SignalState;
use crate::types::Instrument;

/// Percentage of `value` above `base`, or `None` when the base is not a
/// usable denominator.
fn pct_above(value: f64, base: f64) -> Option<f64> {
    if base > 0.0 && value.is_finite() && base.is_finite() {
        Some((value - base) / base * 100.0)
    } else {
        None
    }
}

/// Body for a lower-band proximity alert.
pub fn band_alert(inst: &Instrument, snap: &BandSnapshot, threshold_pct: f64) -> String {
    let diff = pct_above(snap.close, snap.lower)
        .map(|d| format!("{d:.2}%"))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "\u{1F6A8} <b>Bollinger Bands (20,2) Signal</b> \u{1F6A8}\n\n\
         <b>{inst}</b>\n\
         Price: \u{20B9}{close:.2}\n\
         Lower Band: \u{20B9}{lower:.2}\n\
         Within {threshold_pct}% of lower band\n\
         Diff: {diff}",
        close = snap.close,
        lower = snap.lower,
    )
}

/// Body for an EMA crossover alert.
pub fn ema_alert(inst: &Instrument, snap: &EmaSnapshot, state: SignalState) -> String {
    let arrow = match state {
        SignalState::Bullish => "\u{1F4C8}",
        _ => "\u{1F4C9}",
    };
    let diff = pct_above(snap.close, snap.mid)
        .map(|d| format!("{d:.2}%"))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "{arrow} <b>EMA 13/50/200 {state} Signal</b> {arrow}\n\n\
         <b>{inst}</b>\n\
         Price: \u{20B9}{close:.2}\n\
         EMA13: \u{20B9}{fast:.2} | EMA50: \u{20B9}{mid:.2} | EMA200: \u{20B9}{slow:.2}\n\
         Close vs EMA50: {diff}",
        close = snap.close,
        fast = snap.fast,
        mid = snap.mid,
        slow = snap.slow,
    )
}
