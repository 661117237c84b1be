use std::env;

pub const DEFAULT_STREAM_URL: &str = "wss://pumpportal.fun/api/data";
pub const DEFAULT_ALLOWED_ACCOUNTS_FILE: &str = "allowed_accounts.txt";
pub const DEFAULT_SEEN_POSTS_FILE: &str = "seen_posts.txt";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub stream_url: String,
    pub allowed_accounts_file: String,
    pub seen_posts_file: String,
    pub metadata_timeout_secs: u64,
    pub reconnect_delay_secs: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID` are the only required
    /// variables; a missing one is the single startup-fatal condition.
    /// Everything else falls back to a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| ConfigError::MissingVariable("TELEGRAM_BOT_TOKEN".to_string()))?;

        let telegram_chat_id = env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| ConfigError::MissingVariable("TELEGRAM_CHAT_ID".to_string()))?;

        let stream_url =
            env::var("STREAM_URL").unwrap_or_else(|_| DEFAULT_STREAM_URL.to_string());

        if !stream_url.starts_with("ws://") && !stream_url.starts_with("wss://") {
            return Err(ConfigError::InvalidValue(
                "STREAM_URL must start with ws:// or wss://".to_string(),
            ));
        }

        let allowed_accounts_file = env::var("ALLOWED_ACCOUNTS_FILE")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ACCOUNTS_FILE.to_string());

        let seen_posts_file =
            env::var("SEEN_POSTS_FILE").unwrap_or_else(|_| DEFAULT_SEEN_POSTS_FILE.to_string());

        let metadata_timeout_secs = env::var("METADATA_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .unwrap_or(10);

        let reconnect_delay_secs = env::var("RECONNECT_DELAY_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .unwrap_or(10);

        Ok(Self {
            telegram_bot_token,
            telegram_chat_id,
            stream_url,
            allowed_accounts_file,
            seen_posts_file,
            metadata_timeout_secs,
            reconnect_delay_secs,
        })
    }
}
