//! Distance and weight rules.

use serde_json::json;

use pcs_core::DistanceSource;
use pcs_rates::haversine_miles;

use crate::finding::{Severity, ValidationFinding};
use crate::registry::RuleCode;
use crate::rule::{RuleContext, RuleError, ValidationRule};

/// Distance is present, within bounds, and not shorter than the straight
/// line between the two localities.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistancePlausible;

impl DistancePlausible {
    fn straight_line_miles(ctx: &RuleContext<'_>) -> Option<f64> {
        let origin = ctx.reference.locality(ctx.claim.origin_locality.as_ref()?)?;
        let destination = ctx.reference.locality(ctx.claim.destination_locality.as_ref()?)?;
        Some(haversine_miles(
            origin.latitude,
            origin.longitude,
            destination.latitude,
            destination.longitude,
        ))
    }
}

impl ValidationRule for DistancePlausible {
    fn code(&self) -> RuleCode {
        RuleCode::DistancePlausible
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let Some(miles) = ctx.claim.distance_miles else {
            return Ok(vec![ValidationFinding::new(
                self.code(),
                self.field(),
                Severity::Info,
                "No distance stated; MALT and PPM cannot be priced",
            )
            .with_fix("Enter the official distance between duty stations")]);
        };

        if miles == 0 || miles > ctx.config.max_plausible_miles {
            return Ok(vec![ValidationFinding::new(
                self.code(),
                self.field(),
                Severity::Warning,
                format!("Distance of {miles} miles is implausible"),
            )
            .with_fix("Verify the distance against the DTOD mileage for the two duty stations")
            .with_details(json!({ "miles": miles, "max": ctx.config.max_plausible_miles }))]);
        }

        if ctx.claim.distance_source == DistanceSource::Estimated {
            return Ok(vec![ValidationFinding::new(
                self.code(),
                self.field(),
                Severity::Info,
                format!("Distance of {miles} miles was estimated from locality coordinates"),
            )
            .with_fix("Replace the estimate with the official distance")]);
        }

        if let Some(straight) = Self::straight_line_miles(ctx) {
            let floor = straight * f64::from(ctx.config.min_distance_ratio_bps) / 10_000.0;
            if f64::from(miles) < floor {
                return Ok(vec![ValidationFinding::new(
                    self.code(),
                    self.field(),
                    Severity::Warning,
                    format!(
                        "Stated distance of {miles} miles is shorter than the {:.0}-mile straight line between the localities",
                        straight
                    ),
                )
                .with_fix("Check the origin and destination localities and the stated distance")
                .with_details(json!({ "miles": miles, "straight_line_miles": straight.round() as u64 }))]);
            }
        }
        Ok(Vec::new())
    }
}

/// PPM moves need a weight to price the incentive.
#[derive(Debug, Clone, Copy, Default)]
pub struct PpmWeightRequired;

impl ValidationRule for PpmWeightRequired {
    fn code(&self) -> RuleCode {
        RuleCode::PpmWeightRequired
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        if !ctx.claim.travel_method.includes_ppm() || ctx.claim.weight.effective_lbs().is_some() {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationFinding::new(
            self.code(),
            self.field(),
            Severity::Warning,
            "PPM move without an estimated or actual weight; the incentive cannot be priced",
        )
        .with_fix("Enter the estimated weight now and the certified weight-ticket weight when available")])
    }
}

/// Shipment weight is within the paygrade allowance.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightAllowanceRule;

impl ValidationRule for WeightAllowanceRule {
    fn code(&self) -> RuleCode {
        RuleCode::WeightAllowance
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let claim = ctx.claim;
        let (Some(paygrade), Some(weight)) = (&claim.paygrade, claim.weight.effective_lbs()) else {
            return Ok(Vec::new());
        };
        let Some(allowance) = ctx.reference.weight_allowance(paygrade, claim.dependents.any()) else {
            return Ok(Vec::new());
        };
        if weight <= allowance {
            return Ok(Vec::new());
        }
        let field = if claim.weight.actual_lbs.is_some() {
            "actualWeight"
        } else {
            "estimatedWeight"
        };
        Ok(vec![ValidationFinding::new(
            self.code(),
            field,
            Severity::Warning,
            format!(
                "{weight} lbs exceeds the {allowance} lb allowance for {paygrade}; excess weight is at member expense"
            ),
        )
        .with_fix("Reduce the shipment or plan to pay for the excess")
        .with_details(json!({
            "weight_lbs": weight,
            "allowance_lbs": allowance,
            "excess_lbs": weight - allowance,
        }))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcs_core::{DependentsInput, LooseNumber, TravelMethod};
    use pcs_rates::{complete_distance, GreatCircleDistance, ReferenceData};

    use crate::rules::fixtures::{claim, draft, run};

    #[test]
    fn stated_distance_is_plausible() {
        assert!(run(&DistancePlausible, &claim(draft())).is_empty());
    }

    #[test]
    fn missing_distance_is_info() {
        let mut d = draft();
        d.distance_miles = None;
        let findings = run(&DistancePlausible, &claim(d));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn zero_and_huge_distances_warn() {
        for miles in [0.0, 20_000.0] {
            let mut d = draft();
            d.distance_miles = Some(LooseNumber::Number(miles));
            let findings = run(&DistancePlausible, &claim(d));
            assert_eq!(findings[0].severity, Severity::Warning, "{miles}");
        }
    }

    #[test]
    fn shorter_than_straight_line_warns() {
        let mut d = draft();
        d.distance_miles = Some(LooseNumber::Number(900.0));
        let findings = run(&DistancePlausible, &claim(d));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].details.is_some());
    }

    #[test]
    fn estimated_distance_is_info() {
        let mut d = draft();
        d.distance_miles = None;
        let reference = ReferenceData::standard();
        let c = complete_distance(claim(d), &GreatCircleDistance::new(&reference));
        let findings = run(&DistancePlausible, &c);
        assert_eq!(findings[0].severity, Severity::Info);
        assert!(findings[0].message.contains("estimated"));
    }

    #[test]
    fn ppm_without_weight_warns() {
        let mut d = draft();
        d.estimated_weight = None;
        let findings = run(&PpmWeightRequired, &claim(d.clone()));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].citation.as_deref(), Some("JTR 051402"));

        d.travel_method = Some(TravelMethod::Government);
        assert!(run(&PpmWeightRequired, &claim(d)).is_empty());
    }

    #[test]
    fn weight_within_allowance_is_silent() {
        assert!(run(&WeightAllowanceRule, &claim(draft())).is_empty());
    }

    #[test]
    fn overweight_warns_on_the_weight_used() {
        let mut d = draft();
        d.dependents = Some(DependentsInput::Flag(false));
        d.actual_weight = Some(LooseNumber::Text("7,500".into()));
        let findings = run(&WeightAllowanceRule, &claim(d));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "actualWeight");
        assert_eq!(findings[0].details.as_ref().unwrap()["excess_lbs"], 500);
    }

    #[test]
    fn unmapped_paygrade_has_no_allowance() {
        let mut d = draft();
        d.paygrade = Some("GS-12".into());
        d.estimated_weight = Some(LooseNumber::Number(30_000.0));
        assert!(run(&WeightAllowanceRule, &claim(d)).is_empty());
    }
}
