use std::env;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SLACK_API_BASE_URL: &str = "https://slack.com/api";

const MAX_SLACK_TIMEOUT_SECS: u64 = 120;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub slack: SlackConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct SlackConfig {
    pub bot_token: SecretString,
    pub api_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Values set programmatically; each one wins over the environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub slack_bot_token: Option<String>,
    pub slack_api_base_url: Option<String>,
    pub slack_timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            slack: SlackConfig {
                bot_token: SecretString::from(String::new()),
                api_base_url: DEFAULT_SLACK_API_BASE_URL.to_owned(),
                timeout_secs: 10,
            },
            server: ServerConfig { bind_address: "0.0.0.0".to_owned(), port: DEFAULT_PORT },
            logging: LoggingConfig { level: "info".to_owned(), format: LogFormat::Compact },
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl ServerConfig {
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl AppConfig {
    /// Defaults, then the process environment, then `options.overrides`.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        Self::load_with(options, |key| env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] but reads variables through `lookup`.
    /// Blank values count as unset.
    pub fn load_with<F>(options: LoadOptions, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = var("PORT") {
            config.server.port = parse_number("PORT", &value)?;
        }
        if let Some(value) = var("IMPRESSIONS_BIND_ADDRESS") {
            config.server.bind_address = value;
        }
        if let Some(value) = var("SLACK_BOT_TOKEN") {
            config.slack.bot_token = SecretString::from(value);
        }
        if let Some(value) = var("IMPRESSIONS_SLACK_API_BASE_URL") {
            config.slack.api_base_url = value;
        }
        if let Some(value) = var("IMPRESSIONS_SLACK_TIMEOUT_SECS") {
            config.slack.timeout_secs = parse_number("IMPRESSIONS_SLACK_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = var("IMPRESSIONS_LOG_LEVEL") {
            config.logging.level = value;
        }
        if let Some(value) = var("IMPRESSIONS_LOG_FORMAT") {
            config.logging.format = value.parse()?;
        }

        config.apply_overrides(options.overrides);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            port,
            bind_address,
            log_level,
            slack_bot_token,
            slack_api_base_url,
            slack_timeout_secs,
        } = overrides;

        self.server.port = port.unwrap_or(self.server.port);
        if let Some(bind_address) = bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(level) = log_level {
            self.logging.level = level;
        }
        if let Some(token) = slack_bot_token {
            self.slack.bot_token = SecretString::from(token);
        }
        if let Some(api_base_url) = slack_api_base_url {
            self.slack.api_base_url = api_base_url;
        }
        self.slack.timeout_secs = slack_timeout_secs.unwrap_or(self.slack.timeout_secs);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.slack.validate()?;
        self.server.validate()?;
        self.logging.validate()
    }
}

impl SlackConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let token = self.bot_token.expose_secret();
        if token.trim().is_empty() {
            return Err(invalid(
                "SLACK_BOT_TOKEN environment variable is required (slack.bot_token). Get it from https://api.slack.com/apps > Your App > OAuth & Permissions > Bot User OAuth Token",
            ));
        }
        if token.starts_with("xapp-") {
            return Err(invalid(
                "slack.bot_token looks like an app-level token (`xapp-`); use the bot token instead",
            ));
        }

        let base_url = self.api_base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid("slack.api_base_url must start with http:// or https://"));
        }

        if !(1..=MAX_SLACK_TIMEOUT_SECS).contains(&self.timeout_secs) {
            return Err(invalid("slack.timeout_secs must be in range 1..=120"));
        }

        Ok(())
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(invalid("server.port must be greater than zero"));
        }
        if self.bind_address.trim().is_empty() {
            return Err(invalid("server.bind_address must not be empty"));
        }
        Ok(())
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(invalid("logging.level must be one of trace|debug|info|warn|error")),
        }
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Validation(message.to_owned())
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}
