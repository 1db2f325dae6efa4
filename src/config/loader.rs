//! Reading bus configurations from TOML (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result};

use super::units::truncate;
use super::BusConfig;

/// Read and validate a bus configuration file.
///
/// # Errors
///
/// Returns `ConfigError::IoError` if the file cannot be read, otherwise
/// any error from [`parse_config`].
///
/// # Example
///
/// ```rust,ignore
/// use mks_servo_can::load_config;
///
/// let config = load_config("servos.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BusConfig> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| ConfigError::IoError(truncate(&e.to_string())))?;
    parse_config(&content)
}

/// Parse and validate a bus configuration.
///
/// # Errors
///
/// Returns `ConfigError::ParseError` for malformed TOML or rejected values,
/// and the first failure from [`validate_config`](super::validate_config).
pub fn parse_config(content: &str) -> Result<BusConfig> {
    let config: BusConfig = toml::from_str(content)
        .map_err(|e| ConfigError::ParseError(truncate(e.message())))?;

    super::validation::validate_config(&config)?;

    Ok(config)
}
