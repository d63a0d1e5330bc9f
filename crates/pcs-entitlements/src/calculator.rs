//! # Entitlement Calculator
//!
//! Checks calculation preconditions, prices the five lines in parallel,
//! and assembles a [`CalculationResult`].
//!
//! ## Determinism
//!
//! Lines are computed with `rayon` but collected in [`EntitlementType::all`]
//! order, data sources are deduplicated in that same order, and nothing
//! time-dependent enters the result. Identical claim + reference data +
//! configuration always yields byte-identical output.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;

use pcs_core::{Claim, EntitlementType, FieldError, InputError, Paygrade};
use pcs_rates::{RateRecord, ReferenceData};

use crate::config::{CalculatorConfig, ConfigError};
use crate::confidence::{aggregate, compile_data_sources};
use crate::lines::{line_calculator, LineContext, LineOutcome};
use crate::payout::{calculate_net_payout, WithholdingRates};
use crate::result::{CalculationResult, EntitlementLineResult};

/// Computes entitlement estimates against one set of reference data.
///
/// `Send + Sync`; one calculator can serve concurrent claims.
#[derive(Debug, Clone)]
pub struct EntitlementCalculator<'a> {
    reference: &'a ReferenceData,
    config: CalculatorConfig,
    withholding: Option<WithholdingRates>,
}

impl<'a> EntitlementCalculator<'a> {
    /// Build a calculator, validating the configuration.
    pub fn new(reference: &'a ReferenceData, config: CalculatorConfig) -> Result<Self, ConfigError> {
        let withholding = config.validate()?;
        Ok(Self {
            reference,
            config,
            withholding,
        })
    }

    /// A calculator with default policy and no withholding breakdown.
    pub fn with_defaults(reference: &'a ReferenceData) -> Self {
        Self {
            reference,
            config: CalculatorConfig::default(),
            withholding: None,
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceData {
        self.reference
    }

    /// Compute every entitlement line for a claim.
    ///
    /// # Errors
    ///
    /// [`InputError`] if the paygrade or either travel date is missing, or if
    /// arrival is not after departure. Missing reference data is never an
    /// error; it lowers the affected line's confidence.
    pub fn calculate(&self, claim: &Claim) -> Result<CalculationResult, InputError> {
        let (paygrade, as_of, travel_days) = check_preconditions(claim)?;
        let ctx = LineContext {
            claim,
            reference: self.reference,
            config: &self.config,
            paygrade,
            as_of,
            travel_days,
            oconus: self.reference.move_is_oconus(claim),
        };

        let outcomes: Vec<LineOutcome> = EntitlementType::all()
            .par_iter()
            .map(|entitlement| line_calculator(*entitlement).compute(&ctx))
            .collect();

        let records: Vec<&RateRecord> = outcomes.iter().flat_map(|o| o.records.iter()).collect();
        let data_sources = compile_data_sources(records);
        let mut lines: BTreeMap<EntitlementType, EntitlementLineResult> = outcomes
            .into_iter()
            .map(|o| (o.line.entitlement, o.line))
            .collect();
        let mut take = |entitlement: EntitlementType| {
            lines
                .remove(&entitlement)
                .unwrap_or_else(|| EntitlementLineResult::unpriced(entitlement, "Line not computed"))
        };
        let (dla, tle, malt, per_diem, ppm) = (
            take(EntitlementType::Dla),
            take(EntitlementType::Tle),
            take(EntitlementType::Malt),
            take(EntitlementType::PerDiem),
            take(EntitlementType::Ppm),
        );

        let confidence = aggregate([&dla, &tle, &malt, &per_diem, &ppm]);
        let total = dla.amount + tle.amount + malt.amount + per_diem.amount + ppm.amount;

        let ppm_payout = self
            .withholding
            .as_ref()
            .and_then(|rates| match calculate_net_payout(ppm.amount, rates) {
                Ok(payout) => Some(payout),
                Err(e) => {
                    tracing::warn!(error = %e, "PPM net payout skipped");
                    None
                }
            });

        tracing::info!(
            claim_id = claim.id.as_ref().map(|id| id.as_str()).unwrap_or("<none>"),
            total = total.as_i64(),
            overall_confidence = confidence.overall.value(),
            "entitlement calculation complete"
        );

        Ok(CalculationResult {
            claim_id: claim.id.clone(),
            reference_version: self.reference.version().to_string(),
            dla,
            tle,
            malt,
            per_diem,
            ppm,
            total,
            confidence,
            data_sources,
            ppm_payout,
        })
    }
}

/// Fail-fast checks before any line is priced. Collects every violation.
pub fn check_preconditions(claim: &Claim) -> Result<(&Paygrade, NaiveDate, u32), InputError> {
    let mut errors = Vec::new();
    if claim.paygrade.is_none() {
        errors.push(FieldError::new("paygrade", "required for calculation"));
    }
    if claim.departure.is_none() {
        errors.push(FieldError::new("departureDate", "required for calculation"));
    }
    if claim.arrival.is_none() {
        errors.push(FieldError::new("arrivalDate", "required for calculation"));
    }
    if let (Some(departure), Some(arrival)) = (claim.departure, claim.arrival) {
        if arrival <= departure {
            errors.push(FieldError::new("arrivalDate", "must be after departureDate"));
        }
    }
    InputError::check(errors)?;

    match (&claim.paygrade, claim.rate_date(), claim.travel_days()) {
        (Some(paygrade), Some(as_of), Some(days)) => Ok((paygrade, as_of, days)),
        _ => Err(InputError::field("claim", "incomplete after precondition checks")),
    }
}
