//! The user's salary settings, read from TOML.
//!
//! ```toml
//! monthly_salary = "1500000"
//! currency = "CRC"                # optional, defaults to CRC
//! withholding_rate = "0.1083"     # optional, defaults to the CCSS rate
//! brackets_file = "brackets.csv"  # optional, defaults to the built-in table
//! ```
//!
//! Decimal values may be written as strings or plain numbers. A relative
//! `brackets_file` is resolved against the directory holding the settings
//! file.

use std::path::{Path, PathBuf};

use budget_core::{DeductionConfig, DeductionError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::bracket_loader::{TaxBracketLoader, TaxBracketLoaderError};

pub const DEFAULT_CURRENCY: &str = "CRC";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("monthly salary must be non-negative, got {0}")]
    NegativeSalary(Decimal),

    #[error("currency code must not be blank")]
    BlankCurrency,

    #[error(transparent)]
    Brackets(#[from] TaxBracketLoaderError),

    #[error("invalid deduction settings: {0}")]
    Deductions(#[from] DeductionError),
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Per-user salary settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Gross monthly salary before any deduction.
    pub monthly_salary: Decimal,

    #[serde(default = "default_currency")]
    pub currency: String,

    /// Overrides [`DeductionConfig::CCSS_RATE`].
    #[serde(default)]
    pub withholding_rate: Option<Decimal>,

    /// CSV bracket table replacing the built-in one.
    #[serde(default)]
    pub brackets_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monthly_salary: Decimal::ZERO,
            currency: default_currency(),
            withholding_rate: None,
            brackets_file: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_toml_str(&source)?;
        debug!(
            path = %path.display(),
            currency = %settings.currency,
            "loaded settings"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.monthly_salary < Decimal::ZERO {
            return Err(SettingsError::NegativeSalary(self.monthly_salary));
        }
        if self.currency.trim().is_empty() {
            return Err(SettingsError::BlankCurrency);
        }
        Ok(())
    }

    /// Builds the calculator configuration these settings describe.
    ///
    /// `base_dir` anchors a relative `brackets_file`.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Brackets`] if the bracket file cannot be loaded, or
    /// [`SettingsError::Deductions`] if the resulting table or rate is invalid.
    pub fn deduction_config(
        &self,
        base_dir: &Path,
    ) -> Result<DeductionConfig, SettingsError> {
        let withholding_rate = self.withholding_rate.unwrap_or(DeductionConfig::CCSS_RATE);

        let config = match &self.brackets_file {
            Some(file) => {
                let path = if file.is_absolute() {
                    file.clone()
                } else {
                    base_dir.join(file)
                };
                TaxBracketLoader::load_from_file(&path, withholding_rate)?
            }
            None => DeductionConfig {
                withholding_rate,
                ..DeductionConfig::canonical()
            },
        };
        config.validate()?;
        Ok(config)
    }
}
