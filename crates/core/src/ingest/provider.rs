use crate::domain::quote::PriceQuote;
use rust_decimal::Decimal;
use std::fmt;

#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Most recent daily close for `instrument_id`. One attempt, no retries.
    async fn fetch_latest(&self, instrument_id: &str) -> Result<PriceQuote, FetchError>;
}

#[derive(Debug)]
pub enum FetchError {
    /// Provider has no bars for the instrument (market closed, holiday, delisted).
    NoData,
    Transport(reqwest::Error),
    Http { status: u16, body: String },
    Parse(String),
    /// Error reported inside an otherwise well-formed provider envelope.
    Provider { code: String, description: String },
    /// Latest close is zero or negative.
    InvalidPrice(Decimal),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NoData => write!(f, "no price data returned (market closed or no bars)"),
            FetchError::Transport(err) => write!(f, "price source request failed: {err}"),
            FetchError::Http { status, body } => write!(f, "price source HTTP {status}: {body}"),
            FetchError::Parse(detail) => write!(f, "failed to parse price source response: {detail}"),
            FetchError::Provider { code, description } => {
                write!(f, "price source error ({code}): {description}")
            }
            FetchError::InvalidPrice(price) => {
                write!(f, "price source returned a non-positive close: {price}")
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err)
    }
}
