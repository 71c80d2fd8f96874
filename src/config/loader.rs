// src/config/loader.rs
//! Configuration loading with range validation

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::constants::{psd, signal};
use super::PreprocConfig;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Requested file does not exist
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML syntax or type error
    #[error("configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Layered-source backend error
    #[error("configuration backend error: {0}")]
    Backend(#[from] ::config::ConfigError),

    /// A setting is outside its valid range
    #[error("configuration validation failed: {0}")]
    Validation(String),

    /// Filesystem error
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads [`PreprocConfig`] from an optional TOML file, falling back to
/// built-in defaults, and validates ranges before handing it out.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader that produces the built-in defaults.
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Loader that reads `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load and validate the configuration.
    pub fn load(&self) -> Result<PreprocConfig, ConfigError> {
        let config = match &self.config_path {
            None => PreprocConfig::default(),
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path.display().to_string()));
                }
                let settings = ::config::Config::builder()
                    .add_source(::config::File::from(path.as_path()))
                    .build()?;
                settings.try_deserialize::<PreprocConfig>()?
            }
        };
        validate(&config)?;
        Ok(config)
    }
}

/// Parse a configuration from a TOML string and validate it.
pub fn from_toml_str(raw: &str) -> Result<PreprocConfig, ConfigError> {
    let config: PreprocConfig = toml::from_str(raw)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &PreprocConfig) -> Result<(), ConfigError> {
    let sfreq = config.sampling.sfreq_hz;
    if !(signal::MIN_SFREQ_HZ..=signal::MAX_SFREQ_HZ).contains(&sfreq) {
        return Err(ConfigError::Validation(format!(
            "sampling.sfreq_hz {} outside [{}, {}]",
            sfreq,
            signal::MIN_SFREQ_HZ,
            signal::MAX_SFREQ_HZ
        )));
    }
    if config.filter.low_hz <= 0.0 || config.filter.high_hz <= config.filter.low_hz {
        return Err(ConfigError::Validation(format!(
            "filter band [{}, {}] is not an increasing positive pair",
            config.filter.low_hz, config.filter.high_hz
        )));
    }
    if config.filter.high_hz >= sfreq / 2.0 {
        return Err(ConfigError::Validation(format!(
            "filter.high_hz {} at or above Nyquist for sfreq {}",
            config.filter.high_hz, sfreq
        )));
    }
    if config.psd.segment_len < psd::MIN_SEGMENT_LEN {
        return Err(ConfigError::Validation(format!(
            "psd.segment_len {} below minimum {}",
            config.psd.segment_len,
            psd::MIN_SEGMENT_LEN
        )));
    }
    if !(0.0..1.0).contains(&config.psd.overlap) {
        return Err(ConfigError::Validation(format!(
            "psd.overlap {} outside [0, 1)",
            config.psd.overlap
        )));
    }
    if config.epoching.tmin >= config.epoching.tmax {
        return Err(ConfigError::Validation(format!(
            "epoching window [{}, {}] is empty",
            config.epoching.tmin, config.epoching.tmax
        )));
    }
    Ok(())
}
