use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_ENV: &str = "APEXRX_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "apexrx.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldsConfig {
    pub endpoint: String,
    /// Serve the endpoint from an in-memory mock instead of the network.
    pub mock: bool,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/fields".to_string(),
            mock: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fields: FieldsConfig,
}

impl Config {
    /// `$APEXRX_CONFIG` if set, otherwise `apexrx.toml` in the working directory.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|error| match error {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path, source },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = &self.fields.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Validation {
                message: format!("fields.endpoint must be an http(s) URL, got '{endpoint}'"),
            });
        }
        Ok(())
    }
}
