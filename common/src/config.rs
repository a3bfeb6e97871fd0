use serde::Deserialize;
use std::{error::Error, fs, time::Duration};

/// Deployment profile. Only the request timeout and transport logging differ.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "dev")]
    Development,
    #[serde(alias = "prod")]
    Production,
}

impl Environment {
    pub fn default_timeout(&self) -> Duration {
        match self {
            Environment::Development => Duration::from_secs(30),
            Environment::Production => Duration::from_secs(10),
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommonConfig {
    pub project_name: String,
    pub api_base_url: String,
    #[serde(default)]
    pub environment: Environment,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub factor: u32,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
            factor: 2,
            max_delay_ms: 10_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TransportConfig {
    /// Overrides the per-environment timeout when set.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub storage_path: String,
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: ".bakery/session.json".to_string(),
            storage_key: "auth-storage".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub log_level: String,
    pub page_size: u32,
    pub search_debounce_ms: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            page_size: 10,
            search_debounce_ms: 400,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub common: CommonConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        tracing::debug!(path = config_path, "Loading config");
        let contents = fs::read_to_string(config_path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let config = serde_yml::from_str(contents)?;
        Ok(config)
    }

    /// Effective request timeout: explicit override, else the environment default.
    pub fn request_timeout(&self) -> Duration {
        self.transport
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.common.environment.default_timeout())
    }
}
