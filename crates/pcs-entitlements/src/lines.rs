//! # Entitlement Line Calculators
//!
//! One [`LineCalculator`] per [`EntitlementType`]. Each reads the claim and
//! reference data through a shared [`LineContext`], resolves the rates it
//! needs, and returns the priced line together with the records it used.
//!
//! Calculators are independent of one another, which is what lets the
//! [`EntitlementCalculator`](crate::EntitlementCalculator) run them in
//! parallel.
//!
//! ## Formulas
//!
//! | Line | Amount |
//! |---|---|
//! | DLA | band base × dependents/OCONUS multiplier |
//! | TLE | Σ locality nightly rate × min(nights, 10), origin and destination |
//! | MALT | marginal tiers: 100 mi, next 300 mi, remainder |
//! | Per diem | destination daily rate × classification factor × travel days |
//! | PPM | weight × distance × banded cwt-mile rate ÷ 100 × 95% |

use std::fmt;

use chrono::NaiveDate;

use pcs_core::{
    mul_div_round, BasisPoints, Cents, Claim, Confidence, DistanceSource, EntitlementType, LocalityCode,
    Paygrade, TravelMethod, TripClassification,
};
use pcs_rates::{resolve, RateKind, RateQuery, RateRecord, ReferenceData};

use crate::config::{CalculatorConfig, DlaStacking};
use crate::result::EntitlementLineResult;

/// Cap applied to distance-driven lines when the distance was estimated.
pub const ESTIMATED_DISTANCE_CAP: Confidence = Confidence::NATIONAL_DEFAULT;

// ---------------------------------------------------------------------------
// Context and Trait
// ---------------------------------------------------------------------------

/// Everything a line calculator may read. Preconditions are already checked:
/// the paygrade is present and arrival is after departure.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    pub claim: &'a Claim,
    pub reference: &'a ReferenceData,
    pub config: &'a CalculatorConfig,
    pub paygrade: &'a Paygrade,
    /// Rate as-of date (departure).
    pub as_of: NaiveDate,
    pub travel_days: u32,
    pub oconus: bool,
}

impl LineContext<'_> {
    /// Resolve a rate for this claim.
    pub fn rate(&self, kind: RateKind, locality: Option<&LocalityCode>) -> RateRecord {
        let query = RateQuery::new(kind, self.paygrade, self.as_of)
            .with_dependents(self.claim.dependents.any())
            .at(locality);
        resolve(self.reference, &query)
    }
}

/// A priced line and the rate records behind it.
#[derive(Debug, Clone)]
pub struct LineOutcome {
    pub line: EntitlementLineResult,
    pub records: Vec<RateRecord>,
}

impl LineOutcome {
    fn without_rates(line: EntitlementLineResult) -> Self {
        Self {
            line,
            records: Vec::new(),
        }
    }
}

/// Prices one entitlement line.
pub trait LineCalculator: Send + Sync + fmt::Debug {
    /// The line this calculator produces.
    fn entitlement(&self) -> EntitlementType;

    /// Price the line.
    fn compute(&self, ctx: &LineContext<'_>) -> LineOutcome;
}

/// The calculator for a line. Exhaustive: a new entitlement type does not
/// compile until it has a calculator.
pub fn line_calculator(entitlement: EntitlementType) -> &'static dyn LineCalculator {
    match entitlement {
        EntitlementType::Dla => &DlaLine,
        EntitlementType::Tle => &TleLine,
        EntitlementType::Malt => &MaltLine,
        EntitlementType::PerDiem => &PerDiemLine,
        EntitlementType::Ppm => &PpmLine,
    }
}

fn scaled(record: &RateRecord) -> i64 {
    record.scaled_amount().unwrap_or_else(|| {
        tracing::warn!(
            kind = %record.kind,
            amount = %record.amount,
            "unparseable rate amount; pricing at zero"
        );
        0
    })
}

// ---------------------------------------------------------------------------
// DLA
// ---------------------------------------------------------------------------

/// Dislocation Allowance.
#[derive(Debug, Clone, Copy)]
pub struct DlaLine;

impl LineCalculator for DlaLine {
    fn entitlement(&self) -> EntitlementType {
        EntitlementType::Dla
    }

    fn compute(&self, ctx: &LineContext<'_>) -> LineOutcome {
        let record = ctx.rate(RateKind::DlaBase, None);
        let base = Cents::new(scaled(&record));
        let config = ctx.config;

        let dependents = ctx
            .claim
            .dependents
            .any()
            .then(|| config.dla_dependents_multiplier());
        let oconus = ctx.oconus.then(|| config.dla_oconus_multiplier());

        let mut notes = Vec::new();
        let amount = match (dependents, oconus) {
            (None, None) => base,
            (Some(m), None) | (None, Some(m)) => base.apply_bps(m),
            (Some(d), Some(o)) => {
                notes.push(format!(
                    "dependents and OCONUS multipliers both apply; stacking policy {}",
                    config.dla_stacking.as_str()
                ));
                match config.dla_stacking {
                    DlaStacking::LargerOnly => base.apply_bps(d.max(o)),
                    DlaStacking::Multiplicative => Cents::new(mul_div_round(
                        base.as_i64(),
                        i64::from(d.value()) * i64::from(o.value()),
                        100_000_000,
                    )),
                }
            }
        };

        let mut line = EntitlementLineResult::from_records(EntitlementType::Dla, amount, std::slice::from_ref(&record));
        line.notes = notes;
        LineOutcome {
            line,
            records: vec![record],
        }
    }
}

// ---------------------------------------------------------------------------
// TLE
// ---------------------------------------------------------------------------

/// Temporary Lodging Expense, origin plus destination.
#[derive(Debug, Clone, Copy)]
pub struct TleLine;

impl LineCalculator for TleLine {
    fn entitlement(&self) -> EntitlementType {
        EntitlementType::Tle
    }

    fn compute(&self, ctx: &LineContext<'_>) -> LineOutcome {
        let claim = ctx.claim;
        let cap = ctx.config.tle_max_nights;
        let ends = [
            ("origin", claim.lodging_nights.origin, claim.origin_locality.as_ref()),
            (
                "destination",
                claim.lodging_nights.destination,
                claim.destination_locality.as_ref(),
            ),
        ];

        let mut amount = Cents::ZERO;
        let mut records = Vec::new();
        let mut notes = Vec::new();
        for (end, nights, locality) in ends {
            if nights == 0 {
                continue;
            }
            let paid = nights.min(cap);
            if paid < nights {
                notes.push(format!("{end} nights clamped from {nights} to {paid}"));
            }
            let record = ctx.rate(RateKind::TleDaily, locality);
            amount += Cents::new(scaled(&record)).times(i64::from(paid));
            records.push(record);
        }

        if records.is_empty() {
            return LineOutcome::without_rates(EntitlementLineResult::not_applicable(
                EntitlementType::Tle,
                "No temporary lodging claimed",
            ));
        }
        let mut line = EntitlementLineResult::from_records(EntitlementType::Tle, amount, &records);
        line.notes = notes;
        LineOutcome { line, records }
    }
}

// ---------------------------------------------------------------------------
// MALT
// ---------------------------------------------------------------------------

/// Mileage Allowance in Lieu of Transportation. Once per move.
#[derive(Debug, Clone, Copy)]
pub struct MaltLine;

/// Split a distance across the three marginal MALT tiers.
pub fn malt_tiers(miles: u32) -> [(RateKind, u32); 3] {
    [
        (RateKind::MaltFirst100, miles.min(100)),
        (RateKind::MaltNext300, miles.saturating_sub(100).min(300)),
        (RateKind::MaltBeyond400, miles.saturating_sub(400)),
    ]
}

impl LineCalculator for MaltLine {
    fn entitlement(&self) -> EntitlementType {
        EntitlementType::Malt
    }

    fn compute(&self, ctx: &LineContext<'_>) -> LineOutcome {
        let Some(miles) = ctx.claim.distance_miles else {
            return LineOutcome::without_rates(EntitlementLineResult::unpriced(
                EntitlementType::Malt,
                "Distance not provided",
            ));
        };

        let mut records = Vec::new();
        let mut mill_miles: i64 = 0;
        for (kind, tier_miles) in malt_tiers(miles) {
            if tier_miles == 0 {
                continue;
            }
            // Once per move: the query ignores dependents.
            let record = resolve(ctx.reference, &RateQuery::new(kind, ctx.paygrade, ctx.as_of));
            mill_miles = mill_miles.saturating_add(i64::from(tier_miles).saturating_mul(scaled(&record)));
            records.push(record);
        }
        if records.is_empty() {
            return LineOutcome::without_rates(EntitlementLineResult::not_applicable(
                EntitlementType::Malt,
                "No travel distance",
            ));
        }

        // mills → cents
        let amount = Cents::new(mul_div_round(mill_miles, 1, 10));
        let mut line = EntitlementLineResult::from_records(EntitlementType::Malt, amount, &records)
            .with_note(format!("{miles} miles"));
        if ctx.claim.distance_source == DistanceSource::Estimated {
            line = line
                .capped(ESTIMATED_DISTANCE_CAP)
                .with_note("distance estimated from locality coordinates");
        }
        LineOutcome { line, records }
    }
}

// ---------------------------------------------------------------------------
// Per Diem
// ---------------------------------------------------------------------------

/// Per diem for travel days at the destination locality rate.
#[derive(Debug, Clone, Copy)]
pub struct PerDiemLine;

impl LineCalculator for PerDiemLine {
    fn entitlement(&self) -> EntitlementType {
        EntitlementType::PerDiem
    }

    fn compute(&self, ctx: &LineContext<'_>) -> LineOutcome {
        let record = ctx.rate(RateKind::PerDiemDaily, ctx.claim.destination_locality.as_ref());
        let factor = BasisPoints::new(match ctx.claim.trip_classification {
            TripClassification::TravelDays => ctx.config.per_diem_travel_days_bps,
            TripClassification::ExtendedStay => ctx.config.per_diem_extended_stay_bps,
        });
        let amount = Cents::new(scaled(&record))
            .times(i64::from(ctx.travel_days))
            .apply_bps(factor);

        let line = EntitlementLineResult::from_records(EntitlementType::PerDiem, amount, std::slice::from_ref(&record))
            .with_note(format!("{} day(s) at {} of locality rate", ctx.travel_days, factor));
        LineOutcome {
            line,
            records: vec![record],
        }
    }
}

// ---------------------------------------------------------------------------
// PPM
// ---------------------------------------------------------------------------

/// Personally Procured Move incentive, gross of withholding.
#[derive(Debug, Clone, Copy)]
pub struct PpmLine;

impl LineCalculator for PpmLine {
    fn entitlement(&self) -> EntitlementType {
        EntitlementType::Ppm
    }

    fn compute(&self, ctx: &LineContext<'_>) -> LineOutcome {
        let claim = ctx.claim;
        if !claim.travel_method.includes_ppm() {
            return LineOutcome::without_rates(EntitlementLineResult::not_applicable(
                EntitlementType::Ppm,
                "Government-arranged move; no PPM incentive",
            ));
        }
        let Some(pounds) = claim.weight.effective_lbs() else {
            return LineOutcome::without_rates(EntitlementLineResult::unpriced(
                EntitlementType::Ppm,
                "Weight not provided",
            ));
        };
        let Some(miles) = claim.distance_miles else {
            return LineOutcome::without_rates(EntitlementLineResult::unpriced(
                EntitlementType::Ppm,
                "Distance not provided",
            ));
        };

        let record = ctx.rate(RateKind::ppm_band_for(miles), None);
        // lbs × miles × mills-per-cwt-mile ÷ (100 lbs/cwt × 10 mills/cent)
        let constructed = Cents::new(mul_div_round(
            i64::from(pounds) * i64::from(miles),
            scaled(&record),
            1_000,
        ));
        let amount = constructed.apply_bps(BasisPoints::new(ctx.config.ppm_incentive_bps));

        let mut line = EntitlementLineResult::from_records(EntitlementType::Ppm, amount, std::slice::from_ref(&record))
            .with_note(format!("government constructed cost {constructed}"));
        if claim.travel_method == TravelMethod::Mixed {
            line = line.with_note("partial PPM alongside a government shipment");
        }
        if claim.weight.actual_lbs.is_none() {
            line = line.with_note("based on estimated weight; final incentive uses certified weight tickets");
        }
        if claim.distance_source == DistanceSource::Estimated {
            line = line
                .capped(ESTIMATED_DISTANCE_CAP)
                .with_note("distance estimated from locality coordinates");
        }
        LineOutcome {
            line,
            records: vec![record],
        }
    }
}
