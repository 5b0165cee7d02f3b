// =============================================================================
// Scan Scheduler
// =============================================================================
//
// One sequential pass walks the universe front to back: fetch history,
// compute the snapshot, classify, and (cooldown permitting) notify. Pacing
// keeps the process under the provider's rate limits: a jittered delay
// between instruments, a long cooldown after every full batch, and a
// jittered backoff between fetch retries. Jitter desynchronizes this
// process from other callers of the same API.
//
// Failure isolation: a fetch failure or short history skips that one
// instrument; only an unexpected error aborts the pass, and the continuous
// loop then waits and starts a new pass. Every sleep races the shutdown
// signal so Ctrl-C lands within one sleep boundary.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use rand::Rng;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use crate::indicators::snapshot;
use crate::market_data::{FetchError, MarketDataProvider, PriceBar};
use crate::notify::dedup::AlertLedger;
use crate::notify::{message, Notifier};
use crate::scan_config::ScanConfig;
use crate::signals::{evaluator, SignalState, SignalStrategy};
use crate::types::Instrument;

/// Outcome of scanning one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Signal fired and the alert was delivered.
    Alerted(SignalState),
    /// Signal fired but the cooldown suppressed it.
    Suppressed(SignalState),
    /// Signal fired but delivery failed; the cooldown was not consumed.
    NotifyFailed(SignalState),
    /// Evaluated clean, nothing fired.
    NoSignal,
    /// Not enough (or not clean enough) history this pass.
    InsufficientData,
    /// All fetch attempts failed.
    FetchFailed,
}

/// Counters for one completed pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub scanned: usize,
    pub alerted: usize,
    pub suppressed: usize,
    pub notify_failed: usize,
    pub no_signal: usize,
    pub insufficient: usize,
    pub fetch_failed: usize,
}

impl PassSummary {
    fn record(&mut self, outcome: ScanOutcome) {
        self.scanned += 1;
        match outcome {
            ScanOutcome::Alerted(_) => self.alerted += 1,
            ScanOutcome::Suppressed(_) => self.suppressed += 1,
            ScanOutcome::NotifyFailed(_) => self.notify_failed += 1,
            ScanOutcome::NoSignal => self.no_signal += 1,
            ScanOutcome::InsufficientData => self.insufficient += 1,
            ScanOutcome::FetchFailed => self.fetch_failed += 1,
        }
    }
}

/// Sequential scanner over the configured universe.
pub struct Scanner {
    config: ScanConfig,
    provider: Arc<dyn MarketDataProvider>,
    notifier: Arc<dyn Notifier>,
    ledger: AlertLedger,
    shutdown: watch::Receiver<bool>,
}

impl Scanner {
    pub fn new(
        config: ScanConfig,
        provider: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn Notifier>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let ledger = AlertLedger::new(config.notify_cooldown_secs);
        Self {
            config,
            provider,
            notifier,
            ledger,
            shutdown,
        }
    }

    /// Drive the scanner until shutdown (continuous mode) or through a
    /// single pass (`run_once`).
    pub async fn run(mut self) -> Result<()> {
        info!(
            strategy = %self.config.strategy,
            interval = %self.config.bar_interval,
            instruments = self.config.universe.len(),
            run_once = self.config.run_once,
            "scanner starting"
        );

        if self.config.run_once {
            // The cron-style deployment: one session check, one pass.
            if !self.config.session.contains(Utc::now()) {
                info!("outside market hours, nothing to scan");
                return Ok(());
            }
            let summary = self.run_pass().await?;
            info!(?summary, "scan pass complete");
            return Ok(());
        }

        while !self.is_shutdown() {
            match self.run_pass().await {
                Ok(summary) => {
                    info!(?summary, "scan pass complete");
                }
                Err(err) => {
                    // Unexpected failure: this pass is lost, the process is
                    // not. Wait, then start fresh.
                    error!(error = ?err, "scan pass aborted");
                    if !self
                        .sleep_cancellable(Duration::from_secs(self.config.pass_retry_delay_secs))
                        .await
                    {
                        break;
                    }
                }
            }
        }

        info!("scanner stopped");
        Ok(())
    }

    /// One pass over the universe. Returns early with the partial summary
    /// when shutdown is requested mid-pass.
    pub async fn run_pass(&mut self) -> Result<PassSummary> {
        let universe = self.config.universe.clone();
        let mut summary = PassSummary::default();

        for (idx, instrument) in universe.iter().enumerate() {
            if self.is_shutdown() {
                return Ok(summary);
            }

            // Session gating happens per instrument: a pass that started
            // minutes before the close must not keep hammering the provider
            // after it.
            if !self.config.run_once && !self.wait_for_session().await {
                return Ok(summary);
            }

            let outcome = self.scan_instrument(instrument).await?;
            summary.record(outcome);

            let remaining = idx + 1 < universe.len();
            if remaining {
                let batch_boundary = (idx + 1) % self.config.batch_size.max(1) == 0;
                let pause = if batch_boundary {
                    debug!(
                        cooldown_secs = self.config.batch_cooldown_secs,
                        "batch boundary, cooling down"
                    );
                    Duration::from_secs(self.config.batch_cooldown_secs)
                } else {
                    self.inter_instrument_delay()
                };
                if !self.sleep_cancellable(pause).await {
                    return Ok(summary);
                }
            }
        }

        Ok(summary)
    }

    /// Fetch, evaluate, and possibly notify one instrument.
    async fn scan_instrument(&mut self, instrument: &Instrument) -> Result<ScanOutcome> {
        let bars = match self.fetch_with_retry(instrument).await {
            Ok(bars) => bars,
            Err(err) => {
                warn!(symbol = %instrument.symbol, error = %err, "fetch failed, skipping");
                return Ok(ScanOutcome::FetchFailed);
            }
        };

        let (state, body) = match self.config.strategy {
            SignalStrategy::BandProximity => {
                let Some(snap) = snapshot::band_snapshot(&bars) else {
                    debug!(symbol = %instrument.symbol, bars = bars.len(), "insufficient history for bands");
                    return Ok(ScanOutcome::InsufficientData);
                };
                let Some(state) =
                    evaluator::evaluate_band_proximity(&snap, self.config.threshold_pct)
                else {
                    debug!(symbol = %instrument.symbol, lower = snap.lower, "degenerate band, skipping");
                    return Ok(ScanOutcome::InsufficientData);
                };
                let body = message::band_alert(instrument, &snap, self.config.threshold_pct);
                info!(
                    symbol = %instrument.symbol,
                    close = snap.close,
                    lower = snap.lower,
                    state = %state,
                    "band evaluation"
                );
                (state, body)
            }
            SignalStrategy::EmaCrossover => {
                let Some(snap) = snapshot::ema_snapshot(&bars) else {
                    debug!(symbol = %instrument.symbol, bars = bars.len(), "insufficient history for EMA stack");
                    return Ok(ScanOutcome::InsufficientData);
                };
                let state = evaluator::evaluate_ema_crossover(&snap, self.config.ema_diff_threshold);
                let body = message::ema_alert(instrument, &snap, state);
                info!(
                    symbol = %instrument.symbol,
                    close = snap.close,
                    fast = snap.fast,
                    mid = snap.mid,
                    slow = snap.slow,
                    state = %state,
                    "EMA evaluation"
                );
                (state, body)
            }
        };

        if !state.is_alert() {
            return Ok(ScanOutcome::NoSignal);
        }

        if !self.ledger.should_notify(&instrument.symbol, Utc::now()) {
            debug!(symbol = %instrument.symbol, state = %state, "alert suppressed by cooldown");
            return Ok(ScanOutcome::Suppressed(state));
        }

        match self.notifier.notify(&body).await {
            Ok(()) => {
                // Recorded only on delivery, so a failed send retries on the
                // next eligible signal.
                self.ledger.record_sent(&instrument.symbol, Utc::now());
                info!(symbol = %instrument.symbol, state = %state, "alert sent");
                Ok(ScanOutcome::Alerted(state))
            }
            Err(err) => {
                warn!(symbol = %instrument.symbol, error = %err, "alert delivery failed");
                Ok(ScanOutcome::NotifyFailed(state))
            }
        }
    }

    /// Fetch with bounded retries; each retry backs off with jitter.
    async fn fetch_with_retry(
        &mut self,
        instrument: &Instrument,
    ) -> Result<Vec<PriceBar>, FetchError> {
        let attempts = self.config.max_retries.max(1);
        let mut attempt = 1;

        loop {
            match self
                .provider
                .fetch_bars(instrument, self.config.bar_interval)
                .await
            {
                Ok(bars) => return Ok(bars),
                Err(err) if attempt < attempts => {
                    let backoff = self.retry_backoff();
                    warn!(
                        symbol = %instrument.symbol,
                        attempt,
                        wait_secs = backoff.as_secs_f64(),
                        error = %err,
                        "fetch attempt failed, retrying"
                    );
                    if !self.sleep_cancellable(backoff).await {
                        return Err(err);
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Block until the session opens. Returns false on shutdown.
    async fn wait_for_session(&mut self) -> bool {
        while !self.config.session.contains(Utc::now()) {
            if self.is_shutdown() {
                return false;
            }
            info!(
                poll_secs = self.config.closed_poll_secs,
                "market closed, waiting"
            );
            if !self
                .sleep_cancellable(Duration::from_secs(self.config.closed_poll_secs))
                .await
            {
                return false;
            }
        }
        true
    }

    /// Base delay plus uniform jitter in `[0, jitter_max]`.
    fn inter_instrument_delay(&self) -> Duration {
        let base = self.config.delay_between_instruments_secs as f64;
        let jitter = rand::rng().random_range(0.0..=self.config.jitter_max_secs as f64);
        Duration::from_secs_f64(base + jitter)
    }

    /// Twice the base delay plus uniform jitter in the configured bounds.
    fn retry_backoff(&self) -> Duration {
        let base = 2.0 * self.config.delay_between_instruments_secs as f64;
        let lo = self.config.retry_jitter_min_secs as f64;
        let hi = self.config.retry_jitter_max_secs.max(self.config.retry_jitter_min_secs) as f64;
        let jitter = rand::rng().random_range(lo..=hi);
        Duration::from_secs_f64(base + jitter)
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Sleep for `dur`, waking immediately on shutdown. Returns false when
    /// the scanner should stop.
    async fn sleep_cancellable(&mut self, dur: Duration) -> bool {
        if self.is_shutdown() {
            return false;
        }
        tokio::select! {
            _ = tokio::time::sleep(dur) => {}
            _ = self.shutdown.changed() => {}
        }
        !self.is_shutdown()
    }
}
