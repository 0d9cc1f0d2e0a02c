//! Configuration management

use crate::error::{OutlierError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Number of consecutive rows drawn per file
    pub sample_size: usize,
    /// Outlier threshold as a multiple of the sample standard deviation
    pub std_dev_multiplier: f64,
    /// Extension (without dot) of eligible input files
    pub extension: String,
    /// Appended to the input file stem to name the report
    pub output_suffix: String,
    /// Fewest eligible files a directory may contain
    pub min_files: usize,
    /// Most eligible files a directory may contain
    pub max_files: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_size: 30,
            std_dev_multiplier: 2.0,
            extension: "csv".to_string(),
            output_suffix: "_outliers".to_string(),
            min_files: 1,
            max_files: 2,
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_size < 2 {
            return Err(OutlierError::Config(format!(
                "sample_size must be at least 2, got {}",
                self.sample_size
            )));
        }
        if !self.std_dev_multiplier.is_finite() || self.std_dev_multiplier <= 0.0 {
            return Err(OutlierError::Config(format!(
                "std_dev_multiplier must be a positive number, got {}",
                self.std_dev_multiplier
            )));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(OutlierError::Config("extension must not be empty".to_string()));
        }
        if self.min_files > self.max_files {
            return Err(OutlierError::Config(format!(
                "min_files ({}) exceeds max_files ({})",
                self.min_files, self.max_files
            )));
        }
        Ok(())
    }

    /// Eligible-file extension, normalised without a leading dot
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

impl Config {
    /// Load configuration from file, overridden by `OUTLIER__*` env vars
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("OUTLIER").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.detection.validate()?;
        Ok(config)
    }

    /// Load from default locations, falling back to built-in defaults
    pub fn load_default() -> Result<Self> {
        let paths = ["outliers.toml", "~/.config/price-outliers/config.toml"];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::load(expanded.as_ref());
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }
}
