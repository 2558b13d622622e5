//! Outbound operator notifications via the Telegram Bot API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

use crate::storage::config::TelegramConfig;

/// Something that can deliver a short text message to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text`. Returns true only on confirmed delivery; callers
    /// treat false as "retry later if still eligible".
    async fn send(&self, text: &str) -> bool;
}

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram bot `sendMessage` sender.
pub struct TelegramNotifier {
    client: Client,
    base_url: Url,
    token: String,
    chat_id: String,
    deep_link: Option<String>,
}

impl TelegramNotifier {
    /// Build a notifier from config. Returns None unless both the bot
    /// token and the chat id are configured -- absence is the valid
    /// "disabled" state, not an error.
    pub fn from_config(config: &TelegramConfig) -> Option<Self> {
        let token = config.bot_token.clone()?;
        let chat_id = config.chat_id.clone()?;
        let base_url = Url::parse(TELEGRAM_API_BASE).ok()?;
        Some(Self {
            client: Client::new(),
            base_url,
            token,
            chat_id,
            deep_link: config.deep_link.clone(),
        })
    }

    /// Override the API base URL (tests).
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    fn endpoint(&self) -> Option<Url> {
        // Built from the full string: the token contains a colon, which a
        // relative-reference join would misread as a URL scheme.
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/bot{}/sendMessage", self.token)).ok()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> bool {
        let Some(endpoint) = self.endpoint() else {
            return false;
        };
        let text = match &self.deep_link {
            Some(link) => format!("{text}\n{link}"),
            None => text.to_string(),
        };
        let body = json!({ "chat_id": self.chat_id, "text": text });

        match self.client.post(endpoint).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "telegram send rejected");
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "telegram send failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>, chat_id: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(str::to_string),
            chat_id: chat_id.map(str::to_string),
            deep_link: None,
        }
    }

    #[test]
    fn disabled_without_credentials() {
        assert!(TelegramNotifier::from_config(&config(None, None)).is_none());
        assert!(TelegramNotifier::from_config(&config(Some("t"), None)).is_none());
        assert!(TelegramNotifier::from_config(&config(None, Some("c"))).is_none());
    }

    #[tokio::test]
    async fn send_reports_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(200)
            .with_body("{\"ok\":true}")
            .create_async()
            .await;

        let notifier = TelegramNotifier::from_config(&config(Some("123:abc"), Some("42")))
            .unwrap()
            .with_base_url(Url::parse(&server.url()).unwrap());

        assert!(notifier.send("Next window: US Prime").await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_reports_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(502)
            .create_async()
            .await;

        let notifier = TelegramNotifier::from_config(&config(Some("123:abc"), Some("42")))
            .unwrap()
            .with_base_url(Url::parse(&server.url()).unwrap());

        assert!(!notifier.send("Next window: US Prime").await);
    }

    #[tokio::test]
    async fn deep_link_is_appended() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_body(mockito::Matcher::PartialJsonString(
                "{\"text\":\"ping\\nhttps://t.me/lifeos_app\"}".to_string(),
            ))
            .with_status(200)
            .create_async()
            .await;

        let mut telegram = config(Some("123:abc"), Some("42"));
        telegram.deep_link = Some("https://t.me/lifeos_app".to_string());
        let notifier = TelegramNotifier::from_config(&telegram)
            .unwrap()
            .with_base_url(Url::parse(&server.url()).unwrap());

        assert!(notifier.send("ping").await);
        mock.assert_async().await;
    }
}
