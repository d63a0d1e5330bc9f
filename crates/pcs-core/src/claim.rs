//! # Claims: Drafts and Normalized Snapshots
//!
//! A [`ClaimDraft`] is what forms and OCR extraction hand us: every field
//! optional, numbers possibly quoted, dates in whichever ISO form the source
//! produced. [`ClaimDraft::normalize`] turns it into a [`Claim`], the typed
//! snapshot that both the calculator and the validation engine consume.
//!
//! Normalization rejects only *malformed* values (negative distances,
//! unparseable dates, fractional night counts). Values that are well-formed
//! but inconsistent, such as an arrival before departure, survive
//! normalization so that validation can report them as findings; the
//! calculator refuses them separately at its own entry point.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, InputError};
use crate::identity::{ClaimId, LocalityCode};
use crate::paygrade::Paygrade;

/// Seconds per day, used for the travel-day ceiling.
const SECONDS_PER_DAY: i64 = 86_400;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// How household goods move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMethod {
    /// Member moves everything personally (PPM).
    #[default]
    Ppm,
    /// Government-arranged shipment only; no PPM incentive.
    Government,
    /// Partial PPM alongside a government shipment.
    Mixed,
}

impl TravelMethod {
    /// Whether the move earns any PPM incentive.
    pub fn includes_ppm(self) -> bool {
        matches!(self, Self::Ppm | Self::Mixed)
    }
}

/// Per diem trip classification, stated by the caller.
///
/// There is no inferred day-count threshold between the two; the caller (or
/// the finance office) decides which applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TripClassification {
    /// En-route travel days, paid at 75% of the locality rate.
    #[default]
    TravelDays,
    /// Extended / TDY-style stay, paid at 55% of the locality rate.
    ExtendedStay,
}

/// Where the claim's distance figure came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    /// No distance available.
    #[default]
    Missing,
    /// Entered by the member or extracted from orders.
    Stated,
    /// Estimated by a distance provider from the two localities.
    Estimated,
}

// ---------------------------------------------------------------------------
// Draft (loosely typed input)
// ---------------------------------------------------------------------------

/// A number that may arrive as JSON number or numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    /// A JSON number.
    Number(f64),
    /// A string such as `"1,250"` or `" 15 "`.
    Text(String),
}

impl LooseNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                cleaned.parse::<f64>().ok()
            }
        }
    }
}

/// Dependents as either a yes/no flag or a head count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependentsInput {
    /// `true` / `false`.
    Flag(bool),
    /// Number of dependents.
    Count(LooseNumber),
}

/// Loosely typed claim input, as produced by forms or OCR extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimDraft {
    pub id: Option<String>,
    pub claim_name: Option<String>,
    pub paygrade: Option<String>,
    pub dependents: Option<DependentsInput>,
    pub origin_locality: Option<String>,
    pub destination_locality: Option<String>,
    pub oconus: Option<bool>,
    pub orders_date: Option<String>,
    pub departure_date: Option<String>,
    pub arrival_date: Option<String>,
    pub origin_lodging_nights: Option<LooseNumber>,
    pub destination_lodging_nights: Option<LooseNumber>,
    pub distance_miles: Option<LooseNumber>,
    pub estimated_weight: Option<LooseNumber>,
    pub actual_weight: Option<LooseNumber>,
    pub travel_method: Option<TravelMethod>,
    pub trip_classification: Option<TripClassification>,
}

impl ClaimDraft {
    /// Normalize into a typed [`Claim`] snapshot.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] listing every malformed field.
    pub fn normalize(&self) -> Result<Claim, InputError> {
        let mut errors: Vec<FieldError> = Vec::new();

        let id = non_blank(&self.id).and_then(|s| ClaimId::new(s).ok());
        let claim_name = non_blank(&self.claim_name).map(str::to_string);
        let paygrade = non_blank(&self.paygrade).map(Paygrade::parse);

        let dependents = match &self.dependents {
            None | Some(DependentsInput::Flag(false)) => Dependents::none(),
            Some(DependentsInput::Flag(true)) => Dependents::with_count(1),
            Some(DependentsInput::Count(n)) => {
                match whole_number("dependents", n, &mut errors) {
                    Some(count) => Dependents::with_count(count),
                    None => Dependents::none(),
                }
            }
        };

        let origin_locality = locality("originLocality", &self.origin_locality, &mut errors);
        let destination_locality =
            locality("destinationLocality", &self.destination_locality, &mut errors);

        let orders_date = non_blank(&self.orders_date).and_then(|s| match parse_claim_date(s) {
            Ok(d) => Some(d),
            Err(reason) => {
                errors.push(FieldError::new("ordersDate", reason));
                None
            }
        });
        let departure = datetime("departureDate", &self.departure_date, &mut errors);
        let arrival = datetime("arrivalDate", &self.arrival_date, &mut errors);

        let origin_nights = optional_whole("originLodgingNights", &self.origin_lodging_nights, &mut errors)
            .unwrap_or(0);
        let destination_nights = optional_whole(
            "destinationLodgingNights",
            &self.destination_lodging_nights,
            &mut errors,
        )
        .unwrap_or(0);

        let distance_miles = optional_rounded("distanceMiles", &self.distance_miles, &mut errors);
        let estimated_lbs = optional_rounded("estimatedWeight", &self.estimated_weight, &mut errors);
        let actual_lbs = optional_rounded("actualWeight", &self.actual_weight, &mut errors);

        InputError::check(errors)?;

        Ok(Claim {
            id,
            claim_name,
            paygrade,
            dependents,
            origin_locality,
            destination_locality,
            oconus: self.oconus,
            orders_date,
            departure,
            arrival,
            lodging_nights: LodgingNights {
                origin: origin_nights,
                destination: destination_nights,
            },
            distance_source: if distance_miles.is_some() {
                DistanceSource::Stated
            } else {
                DistanceSource::Missing
            },
            distance_miles,
            weight: Weight {
                estimated_lbs,
                actual_lbs,
            },
            travel_method: self.travel_method.unwrap_or_default(),
            trip_classification: self.trip_classification.unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Normalized snapshot
// ---------------------------------------------------------------------------

/// Dependents on the orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependents {
    /// Number of dependents; zero means a member without dependents.
    pub count: u32,
}

impl Dependents {
    /// No dependents.
    pub fn none() -> Self {
        Self { count: 0 }
    }

    /// A given number of dependents.
    pub fn with_count(count: u32) -> Self {
        Self { count }
    }

    /// Whether the with-dependents rate applies.
    pub fn any(&self) -> bool {
        self.count > 0
    }
}

/// Temporary lodging nights claimed at each end of the move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LodgingNights {
    pub origin: u32,
    pub destination: u32,
}

/// Household goods weight, in pounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weight {
    pub estimated_lbs: Option<u32>,
    pub actual_lbs: Option<u32>,
}

impl Weight {
    /// Actual (weighed) weight if known, else the estimate.
    pub fn effective_lbs(&self) -> Option<u32> {
        self.actual_lbs.or(self.estimated_lbs)
    }
}

/// A normalized, immutable claim snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: Option<ClaimId>,
    pub claim_name: Option<String>,
    pub paygrade: Option<Paygrade>,
    pub dependents: Dependents,
    pub origin_locality: Option<LocalityCode>,
    pub destination_locality: Option<LocalityCode>,
    /// Explicit OCONUS flag; when absent the locality table decides.
    pub oconus: Option<bool>,
    pub orders_date: Option<NaiveDate>,
    pub departure: Option<DateTime<Utc>>,
    pub arrival: Option<DateTime<Utc>>,
    pub lodging_nights: LodgingNights,
    pub distance_miles: Option<u32>,
    pub distance_source: DistanceSource,
    pub weight: Weight,
    pub travel_method: TravelMethod,
    pub trip_classification: TripClassification,
}

impl Claim {
    /// Travel days: ceiling of the arrival − departure delta in days, at least 1.
    ///
    /// `None` when either date is missing or arrival is not after departure.
    pub fn travel_days(&self) -> Option<u32> {
        let (departure, arrival) = (self.departure?, self.arrival?);
        let seconds = (arrival - departure).num_seconds();
        if seconds <= 0 {
            return None;
        }
        let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
        Some(u32::try_from(days.max(1)).unwrap_or(u32::MAX))
    }

    /// The date used to select effective rates: the departure date.
    pub fn rate_date(&self) -> Option<NaiveDate> {
        self.departure.map(|d| d.date_naive())
    }

    /// Replace a missing distance with a provider estimate.
    ///
    /// A stated distance is never overwritten.
    pub fn with_estimated_distance(mut self, miles: u32) -> Self {
        if self.distance_miles.is_none() {
            self.distance_miles = Some(miles);
            self.distance_source = DistanceSource::Estimated;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar date.
pub fn parse_claim_date(s: &str) -> Result<NaiveDate, String> {
    parse_claim_datetime(s).map(|dt| dt.date_naive())
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp (converted to UTC).
pub fn parse_claim_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("\"{s}\" is not an ISO date (YYYY-MM-DD) or RFC 3339 timestamp"))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn locality(field: &str, value: &Option<String>, errors: &mut Vec<FieldError>) -> Option<LocalityCode> {
    let raw = non_blank(value)?;
    match LocalityCode::new(raw) {
        Ok(code) => Some(code),
        Err(e) => {
            errors.push(FieldError::new(field, e.to_string()));
            None
        }
    }
}

fn datetime(field: &str, value: &Option<String>, errors: &mut Vec<FieldError>) -> Option<DateTime<Utc>> {
    let raw = non_blank(value)?;
    match parse_claim_datetime(raw) {
        Ok(dt) => Some(dt),
        Err(reason) => {
            errors.push(FieldError::new(field, reason));
            None
        }
    }
}

fn finite_non_negative(field: &str, n: &LooseNumber, errors: &mut Vec<FieldError>) -> Option<f64> {
    match n.as_f64() {
        Some(v) if v.is_finite() && v >= 0.0 && v <= f64::from(u32::MAX) => Some(v),
        Some(v) if v.is_finite() && v < 0.0 => {
            errors.push(FieldError::new(field, "must be >= 0"));
            None
        }
        _ => {
            errors.push(FieldError::new(field, "must be a finite number"));
            None
        }
    }
}

fn whole_number(field: &str, n: &LooseNumber, errors: &mut Vec<FieldError>) -> Option<u32> {
    let v = finite_non_negative(field, n, errors)?;
    if v.fract() != 0.0 {
        errors.push(FieldError::new(field, "must be a whole number"));
        return None;
    }
    Some(v as u32)
}

fn optional_whole(field: &str, n: &Option<LooseNumber>, errors: &mut Vec<FieldError>) -> Option<u32> {
    n.as_ref().and_then(|n| whole_number(field, n, errors))
}

fn optional_rounded(field: &str, n: &Option<LooseNumber>, errors: &mut Vec<FieldError>) -> Option<u32> {
    let v = finite_non_negative(field, n.as_ref()?, errors)?;
    Some(v.round() as u32)
}
