use std::fmt;

use async_trait::async_trait;
use log::debug;
use zeroize::Zeroizing;

use crate::execution::DeliveryError;

/// Outbound message channel. One call is one delivery attempt; retries
/// are layered on top by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the sink's response body on success.
    async fn send(&self, message: &str) -> Result<String, DeliveryError>;
}

pub struct TelegramNotifier {
    http_client: reqwest::Client,
    api_url: String,
    bot_token: Zeroizing<String>,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        http_client: reqwest::Client,
        api_url: &str,
        bot_token: Zeroizing<String>,
        chat_id: String,
    ) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            bot_token,
            chat_id,
        }
    }

    fn send_message_url(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("{}/bot{}/sendMessage", self.api_url, self.bot_token.as_str()))
    }
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_url", &self.api_url)
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<String, DeliveryError> {
        let url = self.send_message_url();
        let response = self
            .http_client
            .post(url.as_str())
            .form(&[("chat_id", self.chat_id.as_str()), ("text", message)])
            .send()
            .await
            // the URL carries the bot token
            .map_err(|e| DeliveryError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url()))?;

        if status.is_success() {
            debug!("Telegram accepted message to chat {}", self.chat_id);
            Ok(body)
        } else {
            Err(DeliveryError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            })
        }
    }
}
