// =============================================================================
// Notification port
// =============================================================================
//
// The scanner talks to an abstract notifier; Telegram is the only shipping
// implementation. Delivery failures are reported, never panicked on, and
// the caller decides whether a failed send consumes the cooldown (it does
// not).

pub mod dedup;
pub mod message;
pub mod telegram;

use async_trait::async_trait;
use thiserror::Error;

/// Errors a notification sink can report for a single send.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Could not reach the sink at all.
    #[error("network error: {0}")]
    Network(String),

    /// The sink is not usable as configured (missing token, bad chat id).
    #[error("configuration error: {0}")]
    Config(String),

    /// The sink answered with a failure status.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Send a human-readable alert to the configured destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}
