//! Layered application configuration.
//!
//! Settings come from `config/default.toml`, an optional environment
//! overlay (`config/{VITALWATCH_ENV}.toml`) and `VITALWATCH_*` environment
//! variables, in that order. Everything is fixed at process start.

use serde::Deserialize;

use crate::notify::NotifierConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub notifier: NotifierConfig,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    pub patient_ids: Vec<String>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_poll_interval_secs() -> u64 {
    10
}

/// Loads the layered configuration.
pub fn load_config() -> Result<Config, config::ConfigError> {
    let env = std::env::var("VITALWATCH_ENV").unwrap_or_else(|_| "development".into());
    config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{env}")).required(false))
        .add_source(config::Environment::with_prefix("VITALWATCH").separator("__"))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_take_defaults() {
        let cfg: StoreConfig =
            serde_json::from_str(r#"{"base_url": "https://store.example"}"#).unwrap();
        assert_eq!(cfg.timeout_secs, 10);

        let cfg: MonitorConfig =
            serde_json::from_str(r#"{"patient_ids": ["patient_001"]}"#).unwrap();
        assert_eq!(cfg.poll_interval_secs, 10);
    }
}
