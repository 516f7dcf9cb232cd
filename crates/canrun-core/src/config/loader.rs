//! Multi-format configuration loading
//!
//! Format is detected from the file extension; environment variables with a
//! prefix and `__` nesting separator are layered on top of the file.

use config::{Config as Cfg, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::FitError;

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Invalid(#[from] FitError),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Detect configuration format from file extension
///
/// Supported: `.yaml`, `.yml`, `.toml`, `.json`, `.json5`
pub fn detect_format(path: impl AsRef<Path>) -> ConfigResult<FileFormat> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ConfigError::UnsupportedFormat("No file extension found".to_string()))?;

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        "json5" => Ok(FileFormat::Json5),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Load a file into `T`
pub fn load_config<T>(path: impl AsRef<Path>) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    let config = Cfg::builder()
        .add_source(File::from_str(&content, format))
        .build()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::Serialization(e.to_string()))
}

/// Environment source for `prefix`, nesting on `__`
///
/// For a field `verdict.tight_gb` and prefix `CANRUN` the variable is
/// `CANRUN_VERDICT__TIGHT_GB`.
pub fn env_overrides(prefix: &str) -> Environment {
    Environment::with_prefix(prefix)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Layer `env` over an optional file and deserialize into `T`
///
/// With no file, fields missing from the environment fall back to the
/// `#[serde(default)]` values of `T`.
pub fn load_layered<T>(path: Option<&Path>, env: Environment) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let mut builder = Cfg::builder();
    if let Some(path) = path {
        let format = detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        builder = builder.add_source(File::from_str(&content, format));
    }

    let config = builder
        .add_source(env)
        .build()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::Serialization(e.to_string()))
}

/// Load a file into `T` with environment variable overrides
pub fn load_with_env<T>(path: impl AsRef<Path>, env_prefix: &str) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    load_layered(Some(path.as_ref()), env_overrides(env_prefix))
}
