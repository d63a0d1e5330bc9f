//! TLE night limits.

use serde_json::json;

use crate::finding::{Severity, ValidationFinding};
use crate::registry::RuleCode;
use crate::rule::{RuleContext, RuleError, ValidationRule};

/// Which end of the move a TLE claim covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LodgingSide {
    Origin,
    Destination,
}

impl LodgingSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Destination => "destination",
        }
    }
}

/// Warns when claimed TLE nights at one location exceed the maximum. The
/// calculator clamps the excess; this rule tells the member why.
#[derive(Debug, Clone, Copy)]
pub struct TleNightsMax {
    side: LodgingSide,
}

impl TleNightsMax {
    pub fn origin() -> Self {
        Self {
            side: LodgingSide::Origin,
        }
    }

    pub fn destination() -> Self {
        Self {
            side: LodgingSide::Destination,
        }
    }

    pub fn side(&self) -> LodgingSide {
        self.side
    }
}

impl ValidationRule for TleNightsMax {
    fn code(&self) -> RuleCode {
        match self.side {
            LodgingSide::Origin => RuleCode::TleOriginNightsMax,
            LodgingSide::Destination => RuleCode::TleDestinationNightsMax,
        }
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let nights = match self.side {
            LodgingSide::Origin => ctx.claim.lodging_nights.origin,
            LodgingSide::Destination => ctx.claim.lodging_nights.destination,
        };
        let max = ctx.policy.tle_max_nights;
        if nights <= max {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationFinding::new(
            self.code(),
            self.field(),
            Severity::Warning,
            format!(
                "{nights} {} TLE nights claimed; only {max} are reimbursable per location",
                self.side.as_str()
            ),
        )
        .with_fix(format!("Reduce {} lodging nights to {max} or fewer", self.side.as_str()))
        .with_details(json!({
            "claimed": nights,
            "reimbursable": max,
            "excess": nights - max,
        }))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcs_core::LooseNumber;

    use pcs_entitlements::CalculatorConfig;

    use crate::rules::fixtures::{claim, draft, run, run_under};

    #[test]
    fn within_limit_is_silent() {
        let c = claim(draft());
        assert!(run(&TleNightsMax::origin(), &c).is_empty());
        assert!(run(&TleNightsMax::destination(), &c).is_empty());
    }

    #[test]
    fn exactly_ten_nights_is_allowed() {
        let mut d = draft();
        d.origin_lodging_nights = Some(LooseNumber::Number(10.0));
        assert!(run(&TleNightsMax::origin(), &claim(d)).is_empty());
    }

    #[test]
    fn fifteen_origin_nights_warns_once() {
        let mut d = draft();
        d.origin_lodging_nights = Some(LooseNumber::Number(15.0));
        let c = claim(d);

        let findings = run(&TleNightsMax::origin(), &c);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_code, RuleCode::TleOriginNightsMax);
        assert_eq!(findings[0].field, "originLodgingNights");
        assert_eq!(findings[0].citation.as_deref(), Some("JTR 054205"));
        assert_eq!(findings[0].details.as_ref().unwrap()["excess"], 5);

        assert!(run(&TleNightsMax::destination(), &c).is_empty());
    }

    #[test]
    fn destination_side_uses_its_own_code() {
        let mut d = draft();
        d.destination_lodging_nights = Some(LooseNumber::Text("12".into()));
        let findings = run(&TleNightsMax::destination(), &claim(d));
        assert_eq!(findings[0].rule_code, RuleCode::TleDestinationNightsMax);
        assert_eq!(findings[0].field, "destinationLodgingNights");
    }

    #[test]
    fn cap_follows_the_calculator_policy() {
        let policy = CalculatorConfig {
            tle_max_nights: 7,
            ..CalculatorConfig::default()
        };
        let mut d = draft();
        d.origin_lodging_nights = Some(LooseNumber::Number(9.0));
        let c = claim(d);

        let findings = run_under(&TleNightsMax::origin(), &c, None, &policy);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].details.as_ref().unwrap()["reimbursable"], 7);
        assert_eq!(findings[0].details.as_ref().unwrap()["excess"], 2);

        assert!(run(&TleNightsMax::origin(), &c).is_empty());
    }
}
