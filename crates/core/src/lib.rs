pub mod domain;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod time;

pub mod config {
    use std::fmt;
    use std::time::Duration;

    pub const DEFAULT_INSTRUMENT: &str = "GOLDBEES.NS";
    pub const DEFAULT_PRICE_SOURCE_BASE_URL: &str = "https://query1.finance.yahoo.com";
    pub const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Telegram bot credentials. `Debug` masks the token.
    #[derive(Clone)]
    pub struct Credentials {
        pub bot_token: String,
        pub chat_id: String,
    }

    impl Credentials {
        /// First five characters of the token followed by `***`, safe for logs.
        pub fn masked_token(&self) -> String {
            let prefix: String = self.bot_token.chars().take(5).collect();
            format!("{prefix}***")
        }
    }

    impl fmt::Debug for Credentials {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Credentials")
                .field("bot_token", &self.masked_token())
                .field("chat_id", &self.chat_id)
                .finish()
        }
    }

    #[derive(Debug, Clone)]
    pub struct Config {
        pub credentials: Credentials,
        pub instrument: String,
        pub price_source_base_url: String,
        pub price_source_timeout: Duration,
        pub telegram_api_base_url: String,
        pub telegram_timeout: Duration,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ConfigError {
        /// Required variable is unset or blank.
        Missing { var: &'static str },
    }

    impl fmt::Display for ConfigError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ConfigError::Missing { var } => {
                    write!(f, "{var} is required but missing from the environment")
                }
            }
        }
    }

    impl std::error::Error for ConfigError {}

    /// Reads the process environment once. Call this at startup before any network work.
    pub fn load_config() -> Result<Config, ConfigError> {
        load_config_from(|key| std::env::var(key).ok())
    }

    pub fn load_config_from<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let bot_token = non_blank("TELEGRAM_TOKEN").ok_or(ConfigError::Missing {
            var: "TELEGRAM_TOKEN",
        })?;
        let chat_id = non_blank("CHAT_ID").ok_or(ConfigError::Missing { var: "CHAT_ID" })?;

        let timeout = |key: &str| {
            let secs = non_blank(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS);
            Duration::from_secs(secs)
        };

        Ok(Config {
            credentials: Credentials {
                bot_token: bot_token.trim().to_string(),
                chat_id: chat_id.trim().to_string(),
            },
            instrument: non_blank("INSTRUMENT")
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| DEFAULT_INSTRUMENT.to_string()),
            price_source_base_url: non_blank("PRICE_SOURCE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PRICE_SOURCE_BASE_URL.to_string()),
            price_source_timeout: timeout("PRICE_SOURCE_TIMEOUT_SECS"),
            telegram_api_base_url: non_blank("TELEGRAM_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE_URL.to_string()),
            telegram_timeout: timeout("TELEGRAM_TIMEOUT_SECS"),
        })
    }

}
