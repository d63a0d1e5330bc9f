//! Identity and date rules.

use serde_json::json;

use pcs_core::Paygrade;

use crate::finding::{Severity, ValidationFinding};
use crate::registry::RuleCode;
use crate::rule::{RuleContext, RuleError, ValidationRule};

#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimNameRequired;

impl ValidationRule for ClaimNameRequired {
    fn code(&self) -> RuleCode {
        RuleCode::ClaimNameRequired
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        if ctx.claim.claim_name.is_some() {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationFinding::new(
            self.code(),
            self.field(),
            Severity::Error,
            "Claim name is required",
        )
        .with_fix("Give the claim a short descriptive name, e.g. \"Norfolk to San Diego\"")])
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrdersDateRequired;

impl ValidationRule for OrdersDateRequired {
    fn code(&self) -> RuleCode {
        RuleCode::OrdersDateRequired
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        if ctx.claim.orders_date.is_some() {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationFinding::new(
            self.code(),
            self.field(),
            Severity::Error,
            "Orders date is required to establish PCS eligibility",
        )
        .with_fix("Enter the date printed on the PCS orders")])
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PaygradeRecognized;

impl ValidationRule for PaygradeRecognized {
    fn code(&self) -> RuleCode {
        RuleCode::PaygradeRecognized
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let finding = match &ctx.claim.paygrade {
            None => ValidationFinding::new(
                self.code(),
                self.field(),
                Severity::Error,
                "Paygrade is required to price DLA and weight allowances",
            )
            .with_fix("Enter the paygrade from the orders, e.g. E-5 or O-3"),
            Some(Paygrade::Unmapped(raw)) => ValidationFinding::new(
                self.code(),
                self.field(),
                Severity::Warning,
                format!("Paygrade \"{raw}\" does not map to a rate band; DLA will be estimated at the lowest band"),
            )
            .with_fix("Use a uniformed-service grade: E-1 to E-9, W-1 to W-5 or O-1 to O-10")
            .with_details(json!({ "paygrade": raw })),
            Some(_) => return Ok(Vec::new()),
        };
        Ok(vec![finding])
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TravelDatesRequired;

impl ValidationRule for TravelDatesRequired {
    fn code(&self) -> RuleCode {
        RuleCode::TravelDatesRequired
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let mut findings = Vec::new();
        if ctx.claim.departure.is_none() {
            findings.push(
                ValidationFinding::new(self.code(), "departureDate", Severity::Error, "Departure date is required")
                    .with_fix("Enter the date travel began"),
            );
        }
        if ctx.claim.arrival.is_none() {
            findings.push(
                ValidationFinding::new(self.code(), "arrivalDate", Severity::Error, "Arrival date is required")
                    .with_fix("Enter the date you reported to the new duty station"),
            );
        }
        Ok(findings)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrivalAfterDeparture;

impl ValidationRule for ArrivalAfterDeparture {
    fn code(&self) -> RuleCode {
        RuleCode::ArrivalAfterDeparture
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let (Some(departure), Some(arrival)) = (ctx.claim.departure, ctx.claim.arrival) else {
            return Ok(Vec::new());
        };
        if arrival > departure {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationFinding::new(
            self.code(),
            self.field(),
            Severity::Error,
            "Arrival date must be after departure date",
        )
        .with_fix("Check the travel dates; arrival cannot precede or equal departure")
        .with_details(json!({
            "departure": departure.to_rfc3339(),
            "arrival": arrival.to_rfc3339(),
        }))])
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DepartureAfterOrders;

impl ValidationRule for DepartureAfterOrders {
    fn code(&self) -> RuleCode {
        RuleCode::DepartureAfterOrders
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let (Some(orders), Some(departure)) = (ctx.claim.orders_date, ctx.claim.rate_date()) else {
            return Ok(Vec::new());
        };
        if departure >= orders {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationFinding::new(
            self.code(),
            self.field(),
            Severity::Warning,
            format!("Travel began {departure}, before the orders date {orders}"),
        )
        .with_fix("Travel performed before orders are issued is generally not reimbursable; confirm both dates")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::{claim, draft, run};

    #[test]
    fn compliant_claim_passes_every_claim_rule() {
        let c = claim(draft());
        assert!(run(&ClaimNameRequired, &c).is_empty());
        assert!(run(&OrdersDateRequired, &c).is_empty());
        assert!(run(&PaygradeRecognized, &c).is_empty());
        assert!(run(&TravelDatesRequired, &c).is_empty());
        assert!(run(&ArrivalAfterDeparture, &c).is_empty());
        assert!(run(&DepartureAfterOrders, &c).is_empty());
    }

    #[test]
    fn blank_name_is_an_error() {
        let mut d = draft();
        d.claim_name = Some("   ".into());
        let findings = run(&ClaimNameRequired, &claim(d));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].suggested_fix.is_some());
    }

    #[test]
    fn missing_orders_date_cites_jtr() {
        let mut d = draft();
        d.orders_date = None;
        let findings = run(&OrdersDateRequired, &claim(d));
        assert_eq!(findings[0].citation.as_deref(), Some("JTR 050101"));
    }

    #[test]
    fn paygrade_missing_vs_unmapped() {
        let mut d = draft();
        d.paygrade = None;
        assert_eq!(run(&PaygradeRecognized, &claim(d.clone()))[0].severity, Severity::Error);

        d.paygrade = Some("GS-12".into());
        let findings = run(&PaygradeRecognized, &claim(d));
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("GS-12"));
    }

    #[test]
    fn each_missing_travel_date_reported() {
        let mut d = draft();
        d.departure_date = None;
        d.arrival_date = None;
        let findings = run(&TravelDatesRequired, &claim(d));
        let fields: Vec<&str> = findings.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["departureDate", "arrivalDate"]);
    }

    #[test]
    fn arrival_equal_to_departure_is_one_error() {
        let mut d = draft();
        d.arrival_date = d.departure_date.clone();
        let findings = run(&ArrivalAfterDeparture, &claim(d));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].citation.as_deref(), Some("JTR 020301"));
    }

    #[test]
    fn arrival_rule_silent_without_both_dates() {
        let mut d = draft();
        d.departure_date = None;
        assert!(run(&ArrivalAfterDeparture, &claim(d)).is_empty());
    }

    #[test]
    fn departure_before_orders_warns() {
        let mut d = draft();
        d.orders_date = Some("2025-06-10".into());
        let findings = run(&DepartureAfterOrders, &claim(d));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn departure_on_orders_date_is_fine() {
        let mut d = draft();
        d.orders_date = Some("2025-06-01".into());
        assert!(run(&DepartureAfterOrders, &claim(d)).is_empty());
    }
}
