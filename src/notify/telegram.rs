// =============================================================================
// Telegram notifier
// =============================================================================
//
// Sends alerts through the Telegram Bot `sendMessage` endpoint with HTML
// parse mode. The bot token is part of the URL, so it must never be logged.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::notify::{Notifier, NotifyError};

/// Request timeout for a single send.
const SEND_TIMEOUT_SECS: u64 = 10;

pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

/// Payload for the Telegram `sendMessage` API.
#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

impl TelegramNotifier {
    /// Create a notifier for the given bot token and chat id.
    ///
    /// Fails with [`NotifyError::Config`] when either credential is empty,
    /// so a misconfigured deployment dies at startup instead of silently
    /// dropping every alert.
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, NotifyError> {
        let bot_token = bot_token.into();
        let chat_id = chat_id.into();

        if bot_token.trim().is_empty() {
            return Err(NotifyError::Config("TELEGRAM_BOT_TOKEN is not set".to_string()));
        }
        if chat_id.trim().is_empty() {
            return Err(NotifyError::Config("TELEGRAM_CHAT_ID is not set".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        Ok(Self {
            bot_token,
            chat_id,
            client,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
        };

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Platform(format!(
                "Telegram API returned {status}: {body}"
            )));
        }

        debug!(chat_id = %self.chat_id, "alert delivered");
        Ok(())
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}
