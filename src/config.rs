//! Gateway configuration loaded from TOML.

use crate::application::gateway::DEFAULT_MAX_UNIQUE_FEE;
use crate::domain::transaction::DEFAULT_EXPIRY_MINUTES;
use crate::error::{QrisError, Result};
use crate::infrastructure::okeconnect::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GatewayConfig {
    /// Remote mutation feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Payment generation and polling settings.
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Hard bound on a single settlement check.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentConfig {
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: i64,
    /// Random fee ceiling; 0 disables the fee.
    #[serde(default = "default_max_unique_fee")]
    pub max_unique_fee: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_expiry_minutes() -> i64 {
    DEFAULT_EXPIRY_MINUTES
}
fn default_max_unique_fee() -> u64 {
    DEFAULT_MAX_UNIQUE_FEE
}
fn default_poll_interval_secs() -> u64 {
    5
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            expiry_minutes: default_expiry_minutes(),
            max_unique_fee: default_max_unique_fee(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GatewayConfig {
    /// Loads config from a TOML file, falling back to defaults when it is missing.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the poller and feed client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.feed.timeout_secs == 0 {
            return Err(QrisError::InvalidConfig(
                "feed.timeout_secs must be at least 1".into(),
            ));
        }
        if self.payment.poll_interval_secs == 0 {
            return Err(QrisError::InvalidConfig(
                "payment.poll_interval_secs must be at least 1".into(),
            ));
        }
        if self.payment.expiry_minutes < 0 {
            return Err(QrisError::InvalidConfig(
                "payment.expiry_minutes must not be negative".into(),
            ));
        }
        Ok(())
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.payment.poll_interval_secs)
    }

    pub fn validity(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.payment.expiry_minutes)
    }
}
