//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Every key has a default, so an
//! empty file and no file behave the same.
//!
//! ```yaml
//! reference: tables/fy2025.yaml
//! estimate_distance: true
//! calculator:
//!   dla_stacking: multiplicative
//!   withholding:
//!     federal_percent: "22"
//! validation:
//!   include_passing: true
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pcs_entitlements::CalculatorConfig;
use pcs_validation::ValidationConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Reference-table file; the built-in tables when absent.
    pub reference: Option<PathBuf>,
    /// Fill a missing claim distance from locality coordinates.
    pub estimate_distance: bool,
    pub calculator: CalculatorConfig,
    pub validation: ValidationConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            reference: None,
            estimate_distance: true,
            calculator: CalculatorConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or defaults when no path is given.
    ///
    /// A relative `reference` path is resolved against the config file's
    /// directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse config file: {}", path.display()))?
        };
        if let (Some(reference), Some(dir)) = (config.reference.as_ref(), path.parent()) {
            if reference.is_relative() {
                config.reference = Some(dir.join(reference));
            }
        }
        config
            .calculator
            .validate()
            .with_context(|| format!("invalid calculator settings in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded CLI configuration");
        Ok(config)
    }
}
