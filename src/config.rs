//! Service configuration - bind address and model artifact location.
//!
//! Every field has a built-in default so the service runs with no config
//! file present. Load order: `$FLEETSENSE_CONFIG`, then `./fleetsense.toml`,
//! then defaults. CLI flags override whatever was loaded.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration for a prediction-service deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Model artifact settings
    #[serde(default)]
    pub model: ModelConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080"
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

/// Model artifact configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the fitted classifier artifact (JSON)
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
        }
    }
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("pd_24h_model.json")
}

impl ServiceConfig {
    /// Load configuration using the standard search order:
    /// 1. `$FLEETSENSE_CONFIG` environment variable
    /// 2. `./fleetsense.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("FLEETSENSE_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from FLEETSENSE_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from FLEETSENSE_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "FLEETSENSE_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("fleetsense.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./fleetsense.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./fleetsense.toml, using defaults");
                }
            }
        }

        info!("No fleetsense.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot possibly start the service.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "server.addr '{}' is not a valid socket address",
                self.server.addr,
            )));
        }
        if self.model.artifact_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "model.artifact_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.model.artifact_path, PathBuf::from("pd_24h_model.json"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleetsense.toml");
        std::fs::write(&path, "[server]\naddr = \"127.0.0.1:9000\"\n").unwrap();

        let config = ServiceConfig::load_from_file(&path).unwrap();
        assert_eq!(config.server.addr, "127.0.0.1:9000");
        assert_eq!(config.model.artifact_path, PathBuf::from("pd_24h_model.json"));
    }

    #[test]
    fn test_bad_addr_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleetsense.toml");
        std::fs::write(&path, "[server]\naddr = \"not-an-address\"\n").unwrap();

        let err = ServiceConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleetsense.toml");
        std::fs::write(&path, "server = [broken").unwrap();

        let err = ServiceConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_, _)));
    }
}
