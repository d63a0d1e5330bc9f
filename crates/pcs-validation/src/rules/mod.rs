//! Rule implementations, grouped by the part of the claim they inspect.
//!
//! Each rule is a unit struct (or a small config-free value) implementing
//! [`ValidationRule`](crate::rule::ValidationRule).
//! [`RuleCode::rule`](crate::registry::RuleCode::rule) is the only
//! constructor the registry uses.

mod claim;
mod entitlement;
mod lodging;
mod shipment;

pub use claim::{
    ArrivalAfterDeparture, ClaimNameRequired, DepartureAfterOrders, OrdersDateRequired,
    PaygradeRecognized, TravelDatesRequired,
};
pub use entitlement::{DlaMultiplierStacking, RateConfidence};
pub use lodging::{LodgingSide, TleNightsMax};
pub use shipment::{DistancePlausible, PpmWeightRequired, WeightAllowanceRule};

#[cfg(test)]
pub(crate) mod fixtures {
    use pcs_core::{Claim, ClaimDraft, DependentsInput, LooseNumber};
    use pcs_entitlements::{CalculationResult, CalculatorConfig};
    use pcs_rates::ReferenceData;

    use crate::config::ValidationConfig;
    use crate::finding::ValidationFinding;
    use crate::rule::{RuleContext, ValidationRule};

    /// A complete, compliant Norfolk to San Diego PPM move.
    pub fn draft() -> ClaimDraft {
        ClaimDraft {
            id: Some("pcs-2025-001".into()),
            claim_name: Some("Norfolk to San Diego".into()),
            paygrade: Some("E-5".into()),
            dependents: Some(DependentsInput::Flag(true)),
            origin_locality: Some("NORFOLK_VA".into()),
            destination_locality: Some("SAN_DIEGO_CA".into()),
            orders_date: Some("2025-05-01".into()),
            departure_date: Some("2025-06-01".into()),
            arrival_date: Some("2025-06-05".into()),
            origin_lodging_nights: Some(LooseNumber::Number(3.0)),
            destination_lodging_nights: Some(LooseNumber::Number(5.0)),
            distance_miles: Some(LooseNumber::Number(2_650.0)),
            estimated_weight: Some(LooseNumber::Number(8_000.0)),
            ..ClaimDraft::default()
        }
    }

    pub fn claim(draft: ClaimDraft) -> Claim {
        draft.normalize().unwrap()
    }

    pub fn run(rule: &dyn ValidationRule, claim: &Claim) -> Vec<ValidationFinding> {
        run_with(rule, claim, None)
    }

    pub fn run_with(
        rule: &dyn ValidationRule,
        claim: &Claim,
        calculation: Option<&CalculationResult>,
    ) -> Vec<ValidationFinding> {
        let reference = ReferenceData::standard();
        run_under(rule, claim, calculation, &CalculatorConfig::default())
    }

    pub fn run_under(
        rule: &dyn ValidationRule,
        claim: &Claim,
        calculation: Option<&CalculationResult>,
        policy: &CalculatorConfig,
    ) -> Vec<ValidationFinding> {
        let reference = ReferenceData::standard();
        let config = ValidationConfig::default();
        let ctx = RuleContext {
            claim,
            calculation,
            reference: &reference,
            config: &config,
            policy,
        };
        rule.evaluate(&ctx).unwrap()
    }
}
