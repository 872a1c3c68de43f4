//! Configuration management

use std::time::Duration;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::*;
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub broker: BrokerSettings,
    pub dispatch: DispatchSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BrokerSettings {
    /// Request keys accepted for subscribe and topic creation. Plain text,
    /// or `sha256:<hex>` digests.
    #[serde(default)]
    pub request_keys: Vec<String>,
    /// Topics created at startup.
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DispatchSettings {
    pub timeout_ms: u64,
    pub max_in_flight: usize,
    pub report_capacity: usize,
    pub user_agent: String,
    #[serde(default)]
    pub signing_secret: Option<String>,
}

impl DispatchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    /// `json` or `pretty`
    pub format: String,
    #[serde(default)]
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl AppConfig {
    /// Loads `.env`, built-in defaults, `config/default`, `config/{APP_ENV}`,
    /// then environment variables (`DISPATCH__TIMEOUT_MS=500`).
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("broker.request_keys")
                    .with_list_parse_key("broker.topics")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Builder pre-populated with every default value.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", DEFAULT_HOST)?
            .set_default("app.port", DEFAULT_PORT)?
            .set_default("app.name", DEFAULT_APP_NAME)?
            .set_default("dispatch.timeout_ms", DEFAULT_DISPATCH_TIMEOUT_MS)?
            .set_default("dispatch.max_in_flight", DEFAULT_DISPATCH_MAX_IN_FLIGHT as u64)?
            .set_default("dispatch.report_capacity", DEFAULT_DISPATCH_REPORT_CAPACITY as u64)?
            .set_default("dispatch.user_agent", DEFAULT_USER_AGENT)?
            .set_default("log.format", DEFAULT_LOG_FORMAT)?
            .set_default("log.file_prefix", DEFAULT_LOG_FILE_PREFIX)
    }

    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let cfg: AppConfig = config.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.dispatch.timeout_ms == 0 {
            return Err(AppError::InvalidSetting {
                key: "dispatch.timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.dispatch.max_in_flight == 0 {
            return Err(AppError::InvalidSetting {
                key: "dispatch.max_in_flight",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.dispatch.report_capacity == 0 {
            return Err(AppError::InvalidSetting {
                key: "dispatch.report_capacity",
                reason: "must be greater than zero".to_string(),
            });
        }
        match self.log.format.as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(AppError::InvalidSetting {
                key: "log.format",
                reason: format!("unknown format `{}`", other),
            }),
        }
    }
}
