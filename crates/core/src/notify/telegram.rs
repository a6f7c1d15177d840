use crate::config::{Config, Credentials};
use crate::notify::{DeliveryError, DeliveryReport, Notifier};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PARSE_MODE: &str = "Markdown";

/// Telegram Bot API `sendMessage` client bound to one chat.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl TelegramNotifier {
    pub fn new(credentials: Credentials, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build telegram http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.credentials.clone(),
            &config.telegram_api_base_url,
            config.telegram_timeout,
        )
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.base_url, self.credentials.bot_token
        )
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct TelegramResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<SentMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct SentMessage {
    message_id: i64,
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    fn channel_name(&self) -> &'static str {
        "telegram"
    }

    async fn deliver(&self, message: &str) -> Result<DeliveryReport, DeliveryError> {
        let req = SendMessageRequest {
            chat_id: &self.credentials.chat_id,
            text: message,
            parse_mode: PARSE_MODE,
        };

        let res = self
            .http
            .post(self.send_message_url())
            .json(&req)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;

        interpret_response(status.as_u16(), &text)
    }
}

fn interpret_response(status: u16, body: &str) -> Result<DeliveryReport, DeliveryError> {
    let parsed = serde_json::from_str::<TelegramResponse>(body).ok();

    let accepted = (200..300).contains(&status) && parsed.as_ref().map_or(true, |r| r.ok);
    if !accepted {
        return Err(DeliveryError::Rejected {
            status,
            description: parsed.and_then(|r| r.description),
        });
    }

    Ok(DeliveryReport {
        http_status: status,
        message_id: parsed.and_then(|r| r.result).map(|m| m.message_id),
    })
}
