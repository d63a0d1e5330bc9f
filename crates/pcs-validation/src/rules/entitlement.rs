//! Rules that look at how the claim will be priced.

use serde_json::{json, Map, Value};

use pcs_core::Confidence;

use crate::finding::{Severity, ValidationFinding};
use crate::registry::RuleCode;
use crate::rule::{RuleContext, RuleError, ValidationRule};

/// Flags moves where the dependents and OCONUS DLA multipliers both apply.
/// How they combine is a calculator policy; the member should know the
/// estimate depends on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DlaMultiplierStacking;

impl ValidationRule for DlaMultiplierStacking {
    fn code(&self) -> RuleCode {
        RuleCode::DlaMultiplierStacking
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        if !ctx.claim.dependents.any() || !ctx.reference.move_is_oconus(ctx.claim) {
            return Ok(Vec::new());
        }
        let mut finding = ValidationFinding::new(
            self.code(),
            self.field(),
            Severity::Info,
            "Both the dependents and OCONUS DLA multipliers apply; the DLA estimate depends on how they are combined",
        )
        .with_fix("Confirm the DLA amount with the finance office before relying on it");
        if let Some(calc) = ctx.calculation {
            finding = finding.with_details(json!({
                "dla_amount": calc.dla.amount.to_decimal_string(),
                "notes": calc.dla.notes,
            }));
        }
        Ok(vec![finding])
    }
}

/// Reports entitlement lines priced from anything less than exact reference
/// rates. Needs a calculation; without one it records that nothing was
/// assessed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateConfidence;

impl ValidationRule for RateConfidence {
    fn code(&self) -> RuleCode {
        RuleCode::RateConfidence
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let Some(calc) = ctx.calculation else {
            return Ok(vec![ValidationFinding::new(
                self.code(),
                self.field(),
                Severity::Info,
                "Rate confidence not assessed; validate together with a calculation",
            )]);
        };

        let overall = calc.confidence.overall;
        if overall == Confidence::EXACT {
            return Ok(Vec::new());
        }

        let weak: Map<String, Value> = calc
            .lines()
            .filter(|line| line.confidence < Confidence::EXACT)
            .map(|line| (line.entitlement.as_str().to_string(), json!(line.confidence.value())))
            .collect();
        let labels: Vec<&str> = calc
            .lines()
            .filter(|line| line.confidence < Confidence::EXACT)
            .map(|line| line.entitlement.label())
            .collect();

        let (severity, message) = if overall == Confidence::NONE {
            (
                Severity::Warning,
                format!("Some amounts could not be priced from reference data: {}", labels.join(", ")),
            )
        } else {
            (
                Severity::Info,
                format!(
                    "Some amounts use interpolated or default rates (overall confidence {}): {}",
                    overall.value(),
                    labels.join(", ")
                ),
            )
        };
        Ok(vec![ValidationFinding::new(self.code(), self.field(), severity, message)
            .with_fix("Check the paygrade, localities, distance and weight so exact rates can be used")
            .with_details(json!({ "overall": overall.value(), "by_line": weak }))])
    }
}
