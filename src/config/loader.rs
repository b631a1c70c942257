//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::blockchain::types::Commitment;
use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Optional path to a TOML config file.
pub const CONFIG_PATH_ENV_VAR: &str = "LEDGER_CLIENT_CONFIG";
/// Overrides `rpc.url`.
pub const RPC_URL_ENV_VAR: &str = "LEDGER_RPC_URL";
/// Overrides `rpc.commitment`.
pub const COMMITMENT_ENV_VAR: &str = "LEDGER_COMMITMENT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Override { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Override { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ClientConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration the way the binary does: optional file, then
/// environment overrides, then validation.
pub fn load_from_env() -> Result<ClientConfig, ConfigError> {
    let config = match std::env::var(CONFIG_PATH_ENV_VAR) {
        Ok(path) => {
            tracing::debug!(path = %path, "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        Err(_) => ClientConfig::default(),
    };

    let config = apply_overrides(config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment-style overrides through `lookup`.
pub fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(RPC_URL_ENV_VAR) {
        config.rpc.url = url;
    }

    if let Some(level) = lookup(COMMITMENT_ENV_VAR) {
        config.rpc.commitment = level.parse::<Commitment>().map_err(|e| ConfigError::Override {
            var: COMMITMENT_ENV_VAR,
            message: e.to_string(),
        })?;
    }

    Ok(config)
}
