//! # PPM Net Payout
//!
//! A PPM incentive is taxable income. The finance office withholds federal
//! supplemental-wage tax, optional state tax, FICA and Medicare before paying
//! it out. This module turns a gross incentive into the net the member
//! actually receives.
//!
//! ## Determinism
//!
//! Rates are percent strings parsed to basis points; amounts are integer
//! cents. Each component rounds half-up to the cent on its own, and the net
//! is `gross − Σ components`, so the breakdown always sums exactly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pcs_core::{BasisPoints, Cents};

/// Errors computing a net payout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    #[error("invalid {field} rate \"{value}\" (expected a percentage such as \"6.2\")")]
    InvalidRate { field: &'static str, value: String },

    #[error("combined withholding rate {combined} exceeds 100%")]
    CombinedRateExceeds { combined: BasisPoints },

    #[error("gross payout must be non-negative, got {0}")]
    NegativeGross(Cents),
}

// ---------------------------------------------------------------------------
// Withholding Profile
// ---------------------------------------------------------------------------

/// Withholding rates as configured: percent strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct WithholdingProfile {
    /// Federal supplemental wage rate.
    pub federal_percent: String,
    pub state_percent: String,
    pub fica_percent: String,
    pub medicare_percent: String,
}

impl Default for WithholdingProfile {
    fn default() -> Self {
        Self {
            federal_percent: "22".to_string(),
            state_percent: "0".to_string(),
            fica_percent: "6.2".to_string(),
            medicare_percent: "1.45".to_string(),
        }
    }
}

impl WithholdingProfile {
    /// Parse and check the profile.
    pub fn rates(&self) -> Result<WithholdingRates, PayoutError> {
        let parse = |field: &'static str, value: &str| {
            BasisPoints::parse_percent(value).map_err(|_| PayoutError::InvalidRate {
                field,
                value: value.to_string(),
            })
        };
        let rates = WithholdingRates {
            federal: parse("federal", &self.federal_percent)?,
            state: parse("state", &self.state_percent)?,
            fica: parse("fica", &self.fica_percent)?,
            medicare: parse("medicare", &self.medicare_percent)?,
        };
        rates.check()?;
        Ok(rates)
    }
}

/// Parsed withholding rates in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingRates {
    pub federal: BasisPoints,
    pub state: BasisPoints,
    pub fica: BasisPoints,
    pub medicare: BasisPoints,
}

impl WithholdingRates {
    /// Sum of all four rates.
    pub fn combined(&self) -> BasisPoints {
        self.federal
            .saturating_add(self.state)
            .saturating_add(self.fica)
            .saturating_add(self.medicare)
    }

    fn check(&self) -> Result<(), PayoutError> {
        let combined = self.combined();
        if combined > BasisPoints::FULL {
            return Err(PayoutError::CombinedRateExceeds { combined });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Net Payout
// ---------------------------------------------------------------------------

/// Gross-to-net breakdown of a PPM incentive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PpmNetPayout {
    pub gross: Cents,
    pub federal: Cents,
    pub state: Cents,
    pub fica: Cents,
    pub medicare: Cents,
    pub total_withheld: Cents,
    pub net: Cents,
    /// Blended withholding rate.
    pub effective_rate_bps: BasisPoints,
    /// Same rate for display, e.g. `"27.65"`.
    pub effective_rate_percent: String,
}

/// Compute the net payout for a gross PPM incentive.
///
/// # Errors
///
/// `NegativeGross` for a negative gross, `CombinedRateExceeds` if the rates
/// sum past 100%.
pub fn calculate_net_payout(gross: Cents, rates: &WithholdingRates) -> Result<PpmNetPayout, PayoutError> {
    if gross < Cents::ZERO {
        return Err(PayoutError::NegativeGross(gross));
    }
    rates.check()?;

    let federal = gross.apply_bps(rates.federal);
    let state = gross.apply_bps(rates.state);
    let fica = gross.apply_bps(rates.fica);
    let medicare = gross.apply_bps(rates.medicare);
    let total_withheld = federal + state + fica + medicare;
    let effective = rates.combined();

    tracing::debug!(
        gross = gross.as_i64(),
        withheld = total_withheld.as_i64(),
        rate = %effective,
        "computed PPM net payout"
    );

    Ok(PpmNetPayout {
        gross,
        federal,
        state,
        fica,
        medicare,
        total_withheld,
        net: gross - total_withheld,
        effective_rate_bps: effective,
        effective_rate_percent: effective.to_percent_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(federal: &str, state: &str) -> WithholdingProfile {
        WithholdingProfile {
            federal_percent: federal.into(),
            state_percent: state.into(),
            ..WithholdingProfile::default()
        }
    }

    #[test]
    fn reference_example_nets_868_20() {
        let rates = profile("15", "5").rates().unwrap();
        let payout = calculate_net_payout(Cents::new(120_000), &rates).unwrap();
        assert_eq!(payout.federal, Cents::new(18_000));
        assert_eq!(payout.state, Cents::new(6_000));
        assert_eq!(payout.fica, Cents::new(7_440));
        assert_eq!(payout.medicare, Cents::new(1_740));
        assert_eq!(payout.total_withheld, Cents::new(33_180));
        assert_eq!(payout.net, Cents::new(86_820));
        assert_eq!(payout.effective_rate_percent, "27.65");
    }

    #[test]
    fn default_profile_uses_supplemental_rate() {
        let rates = WithholdingProfile::default().rates().unwrap();
        assert_eq!(rates.federal.value(), 2_200);
        assert_eq!(rates.state.value(), 0);
        assert_eq!(rates.combined().value(), 2_965);
    }

    #[test]
    fn combined_over_100_rejected() {
        let err = profile("90", "5").rates().unwrap_err();
        assert!(matches!(err, PayoutError::CombinedRateExceeds { .. }));
        assert!(err.to_string().contains("102.65%"));
    }

    #[test]
    fn exactly_100_is_allowed_and_nets_zero() {
        let rates = profile("92.35", "0").rates().unwrap();
        let payout = calculate_net_payout(Cents::new(50_000), &rates).unwrap();
        assert_eq!(payout.net, Cents::ZERO);
    }

    #[test]
    fn garbage_rate_names_field() {
        let err = profile("twenty", "0").rates().unwrap_err();
        assert_eq!(
            err,
            PayoutError::InvalidRate {
                field: "federal",
                value: "twenty".into()
            }
        );
    }

    #[test]
    fn negative_gross_rejected() {
        let rates = WithholdingProfile::default().rates().unwrap();
        assert!(matches!(
            calculate_net_payout(Cents::new(-1), &rates),
            Err(PayoutError::NegativeGross(_))
        ));
    }

    #[test]
    fn components_always_sum_to_gross() {
        let rates = profile("22", "4.95").rates().unwrap();
        for gross in [1, 333, 99_999, 123_457] {
            let p = calculate_net_payout(Cents::new(gross), &rates).unwrap();
            assert_eq!(p.net + p.total_withheld, p.gross);
        }
    }
}
