// =============================================================================
// Vigil Equity Scanner — Main Entry Point
// =============================================================================
//
// Wires the config, the history client, and the Telegram notifier into the
// scan scheduler, then runs it until Ctrl-C (or through a single pass in
// run-once mode). Credentials come from the environment only.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod indicators;
mod market_data;
mod notify;
mod scan_config;
mod scanner;
mod session;
mod signals;
mod types;
mod universe;

use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::market_data::udf_client::UdfHistoryClient;
use crate::notify::telegram::TelegramNotifier;
use crate::scan_config::ScanConfig;
use crate::scanner::Scanner;
use crate::universe::parse_universe;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Vigil Equity Scanner — Starting Up               ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config_path =
        std::env::var("VIGIL_CONFIG").unwrap_or_else(|_| "scan_config.json".to_string());
    let mut config = ScanConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ScanConfig::default()
    });

    // Override the universe from env if available.
    if let Ok(csv) = std::env::var("VIGIL_SYMBOLS") {
        let parsed = parse_universe(&csv);
        if !parsed.is_empty() {
            config.universe = parsed;
        }
    }
    if let Ok(url) = std::env::var("VIGIL_DATA_URL") {
        if !url.trim().is_empty() {
            config.data_base_url = url;
        }
    }

    if config.universe.is_empty() {
        bail!("scan universe is empty; configure instruments or set VIGIL_SYMBOLS");
    }
    if config.data_base_url.trim().is_empty() {
        bail!("no history endpoint configured; set data_base_url or VIGIL_DATA_URL");
    }

    info!(
        strategy = %config.strategy,
        interval = %config.bar_interval,
        instruments = config.universe.len(),
        batch_size = config.batch_size,
        run_once = config.run_once,
        "Configured scan"
    );

    // ── 2. External collaborators ────────────────────────────────────────
    let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default();
    let chat_id = std::env::var("TELEGRAM_CHAT_ID").unwrap_or_default();
    let notifier =
        TelegramNotifier::new(bot_token, chat_id).context("building Telegram notifier")?;

    let provider = UdfHistoryClient::new(config.data_base_url.as_str(), config.countback)
        .context("building history client")?;

    // ── 3. Scanner task ──────────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scanner = Scanner::new(config, Arc::new(provider), Arc::new(notifier), shutdown_rx);

    let mut scan_task = tokio::spawn(scanner.run());

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    tokio::select! {
        res = &mut scan_task => {
            // Run-once mode finishes on its own.
            res.context("scanner task failed")??;
            info!("Vigil scan complete.");
            return Ok(());
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Shutdown signal received — stopping at the next sleep boundary");
            let _ = shutdown_tx.send(true);
        }
    }

    scan_task.await.context("scanner task failed")??;
    info!("Vigil shut down complete.");
    Ok(())
}
