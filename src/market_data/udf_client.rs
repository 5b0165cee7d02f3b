// =============================================================================
// UDF history client
// =============================================================================
//
// HTTP client for a UDF-style chart-history endpoint:
//
//   GET {base_url}/history?symbol=NSE:INFY&resolution=W&countback=250
//
// The response is columnar JSON: `{"s":"ok","t":[..],"o":[..],"h":[..],
// "l":[..],"c":[..],"v":[..]}`, with `s` set to "no_data" or "error" when
// there is nothing to return. Timestamps are epoch seconds, oldest first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::market_data::provider::{FetchError, MarketDataProvider};
use crate::market_data::PriceBar;
use crate::types::{BarInterval, Instrument};

/// Request timeout for a single history call.
const REQUEST_TIMEOUT_SECS: u64 = 20;

/// UDF-style history client.
pub struct UdfHistoryClient {
    base_url: String,
    countback: usize,
    client: reqwest::Client,
}

impl UdfHistoryClient {
    /// Create a client for `base_url`, requesting `countback` bars per call.
    ///
    /// `countback` must cover the slowest indicator span (200 bars for the
    /// EMA stack); the scanner treats shorter histories as insufficient
    /// data, not as a client error.
    pub fn new(base_url: impl Into<String>, countback: usize) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            countback,
            client,
        })
    }
}

#[async_trait]
impl MarketDataProvider for UdfHistoryClient {
    async fn fetch_bars(
        &self,
        instrument: &Instrument,
        interval: BarInterval,
    ) -> Result<Vec<PriceBar>, FetchError> {
        let url = format!(
            "{}/history?symbol={}:{}&resolution={}&countback={}",
            self.base_url,
            instrument.venue,
            instrument.symbol,
            interval.resolution(),
            self.countback
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from_request_error)?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(FetchError::RateLimited);
        }
        if status.as_u16() == 404 {
            return Err(FetchError::NotFound {
                symbol: instrument.symbol.clone(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let history: UdfHistory = resp
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        let bars = parse_history(history, &instrument.symbol)?;
        debug!(
            symbol = %instrument.symbol,
            interval = %interval,
            count = bars.len(),
            "history fetched"
        );
        Ok(bars)
    }
}

/// Raw columnar response body.
#[derive(Debug, Deserialize)]
pub struct UdfHistory {
    pub s: String,
    #[serde(default)]
    pub t: Vec<i64>,
    #[serde(default)]
    pub o: Vec<f64>,
    #[serde(default)]
    pub h: Vec<f64>,
    #[serde(default)]
    pub l: Vec<f64>,
    #[serde(default)]
    pub c: Vec<f64>,
    #[serde(default)]
    pub v: Vec<f64>,
    #[serde(default)]
    pub errmsg: Option<String>,
}

/// Validate a columnar history and turn it into ordered [`PriceBar`]s.
///
/// Rejects mismatched column lengths, unparseable or non-increasing
/// timestamps, and non-finite prices. `s = "no_data"` maps to
/// [`FetchError::NotFound`] so the scanner can log it distinctly.
pub fn parse_history(history: UdfHistory, symbol: &str) -> Result<Vec<PriceBar>, FetchError> {
    match history.s.as_str() {
        "ok" => {}
        "no_data" => {
            return Err(FetchError::NotFound {
                symbol: symbol.to_string(),
            })
        }
        "error" => {
            return Err(FetchError::Malformed(
                history.errmsg.unwrap_or_else(|| "provider error".to_string()),
            ))
        }
        other => return Err(FetchError::Malformed(format!("unknown status '{other}'"))),
    }

    let n = history.t.len();
    let columns_match = history.o.len() == n
        && history.h.len() == n
        && history.l.len() == n
        && history.c.len() == n
        && history.v.len() == n;
    if !columns_match {
        return Err(FetchError::Malformed(format!(
            "column lengths disagree (t={}, o={}, h={}, l={}, c={}, v={})",
            n,
            history.o.len(),
            history.h.len(),
            history.l.len(),
            history.c.len(),
            history.v.len()
        )));
    }

    let mut bars = Vec::with_capacity(n);
    let mut prev_ts: Option<i64> = None;

    for i in 0..n {
        let ts = history.t[i];
        if let Some(prev) = prev_ts {
            if ts <= prev {
                return Err(FetchError::Malformed(format!(
                    "timestamps not strictly increasing at index {i}"
                )));
            }
        }
        prev_ts = Some(ts);

        let timestamp: DateTime<Utc> = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| FetchError::Malformed(format!("invalid epoch {ts} at index {i}")))?;

        let (open, high, low, close, volume) = (
            history.o[i],
            history.h[i],
            history.l[i],
            history.c[i],
            history.v[i],
        );
        let finite =
            open.is_finite() && high.is_finite() && low.is_finite() && close.is_finite();
        if !finite {
            return Err(FetchError::Malformed(format!(
                "non-finite price at index {i}"
            )));
        }

        bars.push(PriceBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_history(t: Vec<i64>, c: Vec<f64>) -> UdfHistory {
        let n = t.len();
        UdfHistory {
            s: "ok".to_string(),
            o: c.iter().map(|x| x - 1.0).collect(),
            h: c.iter().map(|x| x + 2.0).collect(),
            l: c.iter().map(|x| x - 2.0).collect(),
            v: vec![1_000.0; n],
            t,
            c,
            errmsg: None,
        }
    }

    #[test]
    fn ok_response_parses_in_order() {
        let bars = parse_history(
            ok_history(vec![100, 200, 300], vec![10.0, 11.0, 12.0]),
            "INFY",
        )
        .unwrap();
        assert_eq!(bars.len(), 3);
        assert!((bars[2].close - 12.0).abs() < 1e-9);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn no_data_maps_to_not_found() {
        let history = UdfHistory {
            s: "no_data".to_string(),
            t: vec![],
            o: vec![],
            h: vec![],
            l: vec![],
            c: vec![],
            v: vec![],
            errmsg: None,
        };
        match parse_history(history, "GPPL") {
            Err(FetchError::NotFound { symbol }) => assert_eq!(symbol, "GPPL"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn error_status_carries_provider_message() {
        let history = UdfHistory {
            s: "error".to_string(),
            t: vec![],
            o: vec![],
            h: vec![],
            l: vec![],
            c: vec![],
            v: vec![],
            errmsg: Some("unknown symbol".to_string()),
        };
        match parse_history(history, "X") {
            Err(FetchError::Malformed(msg)) => assert!(msg.contains("unknown symbol")),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_columns_are_malformed() {
        let mut history = ok_history(vec![100, 200], vec![10.0, 11.0]);
        history.v.pop();
        assert!(matches!(
            parse_history(history, "X"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn out_of_order_timestamps_are_malformed() {
        let history = ok_history(vec![100, 300, 200], vec![10.0, 11.0, 12.0]);
        assert!(matches!(
            parse_history(history, "X"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn duplicate_timestamps_are_malformed() {
        let history = ok_history(vec![100, 100], vec![10.0, 11.0]);
        assert!(matches!(
            parse_history(history, "X"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn nan_close_is_malformed() {
        let history = ok_history(vec![100, 200], vec![10.0, f64::NAN]);
        assert!(matches!(
            parse_history(history, "X"),
            Err(FetchError::Malformed(_))
        ));
    }
}
