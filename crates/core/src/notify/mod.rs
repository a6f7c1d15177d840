pub mod message;
pub mod telegram;

use std::fmt;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn channel_name(&self) -> &'static str;

    /// Sends `message` once. No retries.
    async fn deliver(&self, message: &str) -> Result<DeliveryReport, DeliveryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub http_status: u16,
    pub message_id: Option<i64>,
}

#[derive(Debug)]
pub enum DeliveryError {
    /// Request never produced a response (connect failure, timeout, unreadable body).
    Transport(reqwest::Error),
    /// Endpoint answered but refused the message.
    Rejected {
        status: u16,
        description: Option<String>,
    },
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Transport(err) => write!(f, "message delivery failed: {err}"),
            DeliveryError::Rejected {
                status,
                description: Some(description),
            } => write!(f, "message rejected (HTTP {status}): {description}"),
            DeliveryError::Rejected {
                status,
                description: None,
            } => write!(f, "message rejected (HTTP {status})"),
        }
    }
}

impl std::error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeliveryError::Transport(err) => Some(err),
            DeliveryError::Rejected { .. } => None,
        }
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        // The request url embeds the bot token.
        DeliveryError::Transport(err.without_url())
    }
}
