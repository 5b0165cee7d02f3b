// =============================================================================
// Market data types
// =============================================================================

pub mod provider;
pub mod udf_client;

pub use provider::{FetchError, MarketDataProvider};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV bar for one sampling interval.
///
/// Histories are ordered oldest to newest with strictly increasing
/// timestamps; the provider client rejects anything else as malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
