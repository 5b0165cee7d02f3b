// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the scanner
// evaluates. Every public function returns `Option<T>` (or an empty series)
// so callers are forced to handle insufficient-data and numerical-edge-case
// outcomes; a short or degenerate history is a normal result, not an error.

pub mod bollinger;
pub mod ema;
pub mod snapshot;
