use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};

use super::HortasError;
use crate::persistence::{
    get_data_file_path,
    load_json_or_default,
};

pub const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "HORTAS_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "HORTAS_TIMEOUT_SECS";
pub const ENV_LOG: &str = "HORTAS_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            request_timeout_secs: 30,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Config file from the app data dir, then environment overrides.
    pub fn load() -> Result<Self, HortasError> {
        let mut config: Config = load_json_or_default(&get_data_file_path(CONFIG_FILE));
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_TIMEOUT_SECS),
            }
        }

        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
    }

    pub fn validate(&self) -> Result<(), HortasError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(HortasError::Config(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(HortasError::Config("request_timeout_secs must be positive".to_string()));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
