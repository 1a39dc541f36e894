use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub model: ModelSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Paths to the destination catalog and the retraining capture file
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub data_path: String,
    pub new_data_path: String,
}

/// Path to the trained model artifact
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with HARMONY_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with HARMONY_)
            // e.g., HARMONY_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("HARMONY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Apply the short-form environment variables the original
        // deployment used (DATA_PATH etc. in .env)
        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("HARMONY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply `DATA_PATH`, `NEW_DATA_PATH`, and `MODEL_PATH` overrides
///
/// These short names predate the `HARMONY__`-prefixed scheme and are
/// still what the deployment tooling exports.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let data_path = env::var("DATA_PATH")
        .or_else(|_| env::var("HARMONY_STORE__DATA_PATH"))
        .unwrap_or_else(|_| "data/destinos.csv".to_string());
    let new_data_path = env::var("NEW_DATA_PATH")
        .or_else(|_| env::var("HARMONY_STORE__NEW_DATA_PATH"))
        .unwrap_or_else(|_| "data/nuevos_registros.csv".to_string());
    let model_path = env::var("MODEL_PATH")
        .or_else(|_| env::var("HARMONY_MODEL__PATH"))
        .unwrap_or_else(|_| "data/modelo.json".to_string());

    Config::builder()
        .add_source(settings)
        .set_override("store.data_path", data_path)?
        .set_override("store.new_data_path", new_data_path)?
        .set_override("model.path", model_path)?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_settings() {
        let server = ServerSettings::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
        assert!(server.workers.is_none());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
