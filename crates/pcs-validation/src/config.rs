//! Validation engine configuration.
//!
//! Limits the calculator also enforces, such as the TLE night cap, are not
//! repeated here; rules read them from the engine's
//! [`CalculatorConfig`](pcs_entitlements::CalculatorConfig).

use serde::{Deserialize, Serialize};

/// Scoring weights and rule thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Score penalty per error finding.
    pub error_weight: u32,
    /// Score penalty per warning finding.
    pub warning_weight: u32,
    /// Emit a `passed: true` info finding for every rule that found nothing.
    pub include_passing: bool,
    /// Longest distance accepted without a plausibility warning.
    pub max_plausible_miles: u32,
    /// Stated distance below this share of the straight-line distance is
    /// flagged, in basis points.
    pub min_distance_ratio_bps: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            error_weight: 20,
            warning_weight: 5,
            include_passing: false,
            max_plausible_miles: 15_000,
            min_distance_ratio_bps: 8_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: ValidationConfig = serde_yaml::from_str("warning_weight: 10\n").unwrap();
        assert_eq!(config.warning_weight, 10);
        assert_eq!(config.error_weight, 20);
        assert!(!config.include_passing);
    }

    #[test]
    fn calculator_limits_are_not_accepted_here() {
        assert!(serde_yaml::from_str::<ValidationConfig>("tle_max_nights: 7\n").is_err());
    }
}
