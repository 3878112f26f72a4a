use crate::config::types::{Config, ValidationLimits};
use crate::config::validation::validate_value;
use crate::ConfigError;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::Path;

/// On-disk configuration syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Picks the format from the file extension; anything but `.json` is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Loads and validates a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the JSON or TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use corpus_harvest::config::load_config;
///
/// let config = load_config(Path::new("scraper_config.json")).unwrap();
/// println!("Seeds: {:?}", config.seed_urls());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_limits(path, &ValidationLimits::default())
}

/// Loads a configuration file, validating numeric fields against `limits`
pub fn load_config_with_limits(
    path: &Path,
    limits: &ValidationLimits,
) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content, ConfigFormat::from_path(path), limits)
}

/// Parses configuration text and validates it
pub fn parse_config_str(
    content: &str,
    format: ConfigFormat,
    limits: &ValidationLimits,
) -> Result<Config, ConfigError> {
    let raw: Value = match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?
        }
    };

    validate_value(&raw, limits)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a dataset can be traced back to the configuration
/// that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
