use config::{Config, ConfigError, Environment, Source};
use serde::Deserialize;

/// Process settings, read from the environment after `.env` is loaded.
#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    #[serde(default = "Settings::default_bind_address")]
    pub bind_address: String,
    #[serde(default = "Settings::default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "Settings::default_db_workers")]
    pub db_workers: usize,
    #[serde(default = "Settings::default_log_filter")]
    pub log_filter: String,
    /// Comma-separated; unset allows any origin.
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
}

impl Settings {
    fn default_bind_address() -> String {
        "127.0.0.1:8080".to_owned()
    }
    fn default_pool_size() -> u32 {
        10
    }
    fn default_db_workers() -> usize {
        4
    }
    fn default_log_filter() -> String {
        "info".to_owned()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_from(Environment::default().try_parsing(true))
    }

    fn load_from<S: Source + Send + Sync + 'static>(source: S) -> Result<Self, ConfigError> {
        Config::builder().add_source(source).build()?.try_deserialize()
    }

    pub fn allowed_origins(&self) -> Vec<&str> {
        self.cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}
