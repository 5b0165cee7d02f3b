// =============================================================================
// Scan configuration
// =============================================================================
//
// Every tunable the scanner recognizes lives here, sourced from an optional
// JSON file plus environment overrides applied in main. All fields carry
// `#[serde(default)]` so an older or partial config file keeps loading as
// new fields are added. There is no runtime reconfiguration; the scanner
// reads this once at startup.
//
// Messaging credentials (TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID) are env-only
// and deliberately never part of this struct.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::session::SessionWindow;
use crate::signals::SignalStrategy;
use crate::types::{BarInterval, Instrument};
use crate::universe::default_universe;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_threshold_pct() -> f64 {
    3.0
}

fn default_ema_diff_threshold() -> f64 {
    5.0
}

fn default_delay_between_instruments_secs() -> u64 {
    20
}

fn default_jitter_max_secs() -> u64 {
    15
}

fn default_batch_size() -> usize {
    5
}

fn default_batch_cooldown_secs() -> u64 {
    90
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_jitter_min_secs() -> u64 {
    10
}

fn default_retry_jitter_max_secs() -> u64 {
    20
}

fn default_notify_cooldown_secs() -> u64 {
    7200
}

fn default_closed_poll_secs() -> u64 {
    300
}

fn default_pass_retry_delay_secs() -> u64 {
    300
}

fn default_countback() -> usize {
    250
}

// =============================================================================
// ScanConfig
// =============================================================================

/// Top-level configuration for one scanner deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    // --- What to scan --------------------------------------------------------
    /// Evaluation strategy this deployment runs.
    #[serde(default)]
    pub strategy: SignalStrategy,

    /// Sampling interval requested from the data provider.
    #[serde(default)]
    pub bar_interval: BarInterval,

    /// Ordered instrument universe. Symbols must be unique.
    #[serde(default = "default_universe")]
    pub universe: Vec<Instrument>,

    // --- Signal thresholds ---------------------------------------------------
    /// Band-proximity threshold as a percentage above the lower band.
    #[serde(default = "default_threshold_pct")]
    pub threshold_pct: f64,

    /// Maximum EMA13/EMA50 gap, in price units, for the crossover signal.
    #[serde(default = "default_ema_diff_threshold")]
    pub ema_diff_threshold: f64,

    // --- Pacing --------------------------------------------------------------
    /// Base delay between consecutive instruments.
    #[serde(default = "default_delay_between_instruments_secs")]
    pub delay_between_instruments_secs: u64,

    /// Upper bound of the uniform jitter added to the base delay.
    #[serde(default = "default_jitter_max_secs")]
    pub jitter_max_secs: u64,

    /// Instruments per batch; a longer cooldown follows each full batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Cooldown after each full batch.
    #[serde(default = "default_batch_cooldown_secs")]
    pub batch_cooldown_secs: u64,

    // --- Fetch retries -------------------------------------------------------
    /// Total fetch attempts per instrument per pass.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Uniform jitter bounds added to the retry backoff.
    #[serde(default = "default_retry_jitter_min_secs")]
    pub retry_jitter_min_secs: u64,

    #[serde(default = "default_retry_jitter_max_secs")]
    pub retry_jitter_max_secs: u64,

    // --- Notifications -------------------------------------------------------
    /// Minimum elapsed time before a repeat alert for the same instrument.
    #[serde(default = "default_notify_cooldown_secs")]
    pub notify_cooldown_secs: u64,

    // --- Session gating ------------------------------------------------------
    /// Venue trading session; scanning only happens inside it.
    #[serde(default)]
    pub session: SessionWindow,

    /// Re-check interval while the market is closed.
    #[serde(default = "default_closed_poll_secs")]
    pub closed_poll_secs: u64,

    /// Wait before starting a new pass after an aborted one.
    #[serde(default = "default_pass_retry_delay_secs")]
    pub pass_retry_delay_secs: u64,

    /// Scan the universe once and exit instead of looping (the CI-cron
    /// deployment mode).
    #[serde(default)]
    pub run_once: bool,

    // --- Data provider -------------------------------------------------------
    /// Base URL of the UDF-style history endpoint. Required; also settable
    /// via VIGIL_DATA_URL.
    #[serde(default)]
    pub data_base_url: String,

    /// Bars requested per fetch; must cover the slowest indicator span.
    #[serde(default = "default_countback")]
    pub countback: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            strategy: SignalStrategy::default(),
            bar_interval: BarInterval::default(),
            universe: default_universe(),
            threshold_pct: default_threshold_pct(),
            ema_diff_threshold: default_ema_diff_threshold(),
            delay_between_instruments_secs: default_delay_between_instruments_secs(),
            jitter_max_secs: default_jitter_max_secs(),
            batch_size: default_batch_size(),
            batch_cooldown_secs: default_batch_cooldown_secs(),
            max_retries: default_max_retries(),
            retry_jitter_min_secs: default_retry_jitter_min_secs(),
            retry_jitter_max_secs: default_retry_jitter_max_secs(),
            notify_cooldown_secs: default_notify_cooldown_secs(),
            session: SessionWindow::default(),
            closed_poll_secs: default_closed_poll_secs(),
            pass_retry_delay_secs: default_pass_retry_delay_secs(),
            run_once: false,
            data_base_url: String::new(),
            countback: default_countback(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scan config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scan config from {}", path.display()))?;

        info!(
            path = %path.display(),
            strategy = %config.strategy,
            interval = %config.bar_interval,
            instruments = config.universe.len(),
            "scan config loaded"
        );

        Ok(config)
    }
}
