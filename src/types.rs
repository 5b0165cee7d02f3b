// =============================================================================
// Shared types used across the Vigil scanner
// =============================================================================

use serde::{Deserialize, Serialize};

/// One entry of the scan universe: a listed instrument and where it trades.
///
/// Instruments are immutable once the universe is loaded; the scanner never
/// mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Exchange ticker, e.g. "INFY".
    pub symbol: String,
    /// Venue tag, e.g. "NSE" or "BSE".
    pub venue: String,
    /// Informal sector label carried through to alert text.
    #[serde(default)]
    pub sector: String,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        venue: impl Into<String>,
        sector: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            venue: venue.into(),
            sector: sector.into(),
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.symbol, self.venue)
    }
}

/// Sampling interval of the price history requested from the data provider.
///
/// The two variants correspond to the two deployment modes: the weekly
/// band-proximity scan and the intraday EMA scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarInterval {
    Weekly,
    Min15,
}

impl Default for BarInterval {
    fn default() -> Self {
        Self::Weekly
    }
}

impl BarInterval {
    /// Resolution string the history endpoint expects.
    pub fn resolution(&self) -> &'static str {
        match self {
            Self::Weekly => "W",
            Self::Min15 => "15",
        }
    }
}

impl std::fmt::Display for BarInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Min15 => write!(f, "15m"),
        }
    }
}
