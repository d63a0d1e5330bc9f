//! Calculator configuration.
//!
//! Every policy knob has a default matching current JTR practice, so an empty
//! YAML section (or `CalculatorConfig::default()`) is a valid configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pcs_core::BasisPoints;

use crate::payout::{PayoutError, WithholdingProfile, WithholdingRates};

/// How the dependents and OCONUS DLA multipliers combine when both apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DlaStacking {
    /// Apply only the larger of the two multipliers.
    #[default]
    LargerOnly,
    /// Apply both multipliers in sequence.
    Multiplicative,
}

impl DlaStacking {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LargerOnly => "larger_only",
            Self::Multiplicative => "multiplicative",
        }
    }
}

/// Errors in calculator configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("withholding profile: {0}")]
    Withholding(#[from] PayoutError),
}

/// Upper bound accepted for [`CalculatorConfig::tle_max_nights`].
pub const MAX_TLE_NIGHTS: u32 = 60;

/// Policy knobs for the Entitlement Calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub dla_stacking: DlaStacking,
    /// With-dependents DLA multiplier (15000 = ×1.5).
    pub dla_dependents_multiplier_bps: u32,
    /// OCONUS DLA multiplier (15000 = ×1.5).
    pub dla_oconus_multiplier_bps: u32,
    /// TLE nights reimbursed per location. Validation warns above the same
    /// cap the calculator clamps to.
    pub tle_max_nights: u32,
    /// Per diem factor for en-route travel days.
    pub per_diem_travel_days_bps: u32,
    /// Per diem factor for extended stays.
    pub per_diem_extended_stay_bps: u32,
    /// PPM incentive as a share of the government constructed cost.
    pub ppm_incentive_bps: u32,
    /// When set, the result carries a PPM gross-to-net breakdown.
    pub withholding: Option<WithholdingProfile>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            dla_stacking: DlaStacking::LargerOnly,
            dla_dependents_multiplier_bps: 15_000,
            dla_oconus_multiplier_bps: 15_000,
            tle_max_nights: 10,
            per_diem_travel_days_bps: 7_500,
            per_diem_extended_stay_bps: 5_500,
            ppm_incentive_bps: 9_500,
            withholding: None,
        }
    }
}

impl CalculatorConfig {
    /// Check ranges and parse the withholding profile.
    ///
    /// Returns the parsed withholding rates, if a profile is configured.
    pub fn validate(&self) -> Result<Option<WithholdingRates>, ConfigError> {
        range("tle_max_nights", self.tle_max_nights, 1, MAX_TLE_NIGHTS)?;
        range("dla_dependents_multiplier_bps", self.dla_dependents_multiplier_bps, 10_000, 30_000)?;
        range("dla_oconus_multiplier_bps", self.dla_oconus_multiplier_bps, 10_000, 30_000)?;
        range("per_diem_travel_days_bps", self.per_diem_travel_days_bps, 0, 10_000)?;
        range("per_diem_extended_stay_bps", self.per_diem_extended_stay_bps, 0, 10_000)?;
        range("ppm_incentive_bps", self.ppm_incentive_bps, 0, 10_000)?;
        match &self.withholding {
            Some(profile) => Ok(Some(profile.rates()?)),
            None => Ok(None),
        }
    }

    pub fn dla_dependents_multiplier(&self) -> BasisPoints {
        BasisPoints::new(self.dla_dependents_multiplier_bps)
    }

    pub fn dla_oconus_multiplier(&self) -> BasisPoints {
        BasisPoints::new(self.dla_oconus_multiplier_bps)
    }
}

fn range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(CalculatorConfig::default().validate(), Ok(None));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: CalculatorConfig =
            serde_yaml::from_str("dla_stacking: multiplicative\nwithholding:\n  state_percent: \"5\"\n")
                .unwrap();
        assert_eq!(config.dla_stacking, DlaStacking::Multiplicative);
        assert_eq!(config.tle_max_nights, 10);
        let rates = config.validate().unwrap().unwrap();
        assert_eq!(rates.state.value(), 500);
        assert_eq!(rates.federal.value(), 2_200);
    }

    #[test]
    fn out_of_range_factor_rejected() {
        let config = CalculatorConfig {
            ppm_incentive_bps: 12_000,
            ..CalculatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "ppm_incentive_bps", .. })
        ));
    }

    #[test]
    fn tle_cap_must_be_positive_and_bounded() {
        for nights in [0, MAX_TLE_NIGHTS + 1] {
            let config = CalculatorConfig {
                tle_max_nights: nights,
                ..CalculatorConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::OutOfRange { field: "tle_max_nights", .. })
            ));
        }
        let seven = CalculatorConfig {
            tle_max_nights: 7,
            ..CalculatorConfig::default()
        };
        assert!(seven.validate().is_ok());
    }

    #[test]
    fn bad_withholding_surfaces() {
        let config = CalculatorConfig {
            withholding: Some(WithholdingProfile {
                federal_percent: "99".into(),
                ..WithholdingProfile::default()
            }),
            ..CalculatorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Withholding(_))));
    }
}
