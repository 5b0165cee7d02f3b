// =============================================================================
// Market data provider port
// =============================================================================
//
// The scanner only ever sees this trait; the HTTP client behind it is an
// external collaborator. Failure variants are distinguishable so the retry
// policy can decide what to do with each.

use async_trait::async_trait;
use thiserror::Error;

use crate::market_data::PriceBar;
use crate::types::{BarInterval, Instrument};

/// Errors a provider can report for a single fetch.
///
/// All variants are retriable from the scanner's point of view; the
/// distinction exists for logging and for operators reading the logs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("rate limited by data provider")]
    RateLimited,

    #[error("no history for {symbol}")]
    NotFound { symbol: String },

    #[error("provider returned HTTP {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed history response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Classify a reqwest failure into the taxonomy above.
    pub fn from_request_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Capability the scanner needs from the outside world: an ordered recent
/// price history for one instrument at one sampling interval.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_bars(
        &self,
        instrument: &Instrument,
        interval: BarInterval,
    ) -> Result<Vec<PriceBar>, FetchError>;
}
