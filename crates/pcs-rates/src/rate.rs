//! # Rate Records
//!
//! One [`RateRecord`] is one row of a versioned reference table: a rate kind,
//! the paygrades / dependency status / locality it applies to, the date range
//! during which it is effective, and the decimal amount with its citation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pcs_core::{parse_scaled, Confidence, EntitlementType, LocalityCode, PaygradeBand};

/// The kind of rate a record carries.
///
/// Statically enumerated: an unknown kind in a reference file fails
/// deserialization instead of being silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    /// Dislocation Allowance base amount (dollars).
    DlaBase,
    /// Temporary lodging daily rate (dollars per night).
    TleDaily,
    /// MALT, miles 1–100 (dollars per mile).
    MaltFirst100,
    /// MALT, miles 101–400 (dollars per mile).
    MaltNext300,
    /// MALT, miles 401 and beyond (dollars per mile).
    MaltBeyond400,
    /// Per diem locality daily rate (dollars per day).
    PerDiemDaily,
    /// Government carrier rate for hauls up to 250 miles (dollars per cwt-mile).
    PpmShortHaul,
    /// Government carrier rate for hauls of 251–1000 miles.
    PpmMediumHaul,
    /// Government carrier rate for hauls over 1000 miles.
    PpmLongHaul,
}

impl RateKind {
    /// All kinds, in entitlement order.
    pub fn all() -> &'static [RateKind] {
        &[
            Self::DlaBase,
            Self::TleDaily,
            Self::MaltFirst100,
            Self::MaltNext300,
            Self::MaltBeyond400,
            Self::PerDiemDaily,
            Self::PpmShortHaul,
            Self::PpmMediumHaul,
            Self::PpmLongHaul,
        ]
    }

    /// Snake-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DlaBase => "dla_base",
            Self::TleDaily => "tle_daily",
            Self::MaltFirst100 => "malt_first100",
            Self::MaltNext300 => "malt_next300",
            Self::MaltBeyond400 => "malt_beyond400",
            Self::PerDiemDaily => "per_diem_daily",
            Self::PpmShortHaul => "ppm_short_haul",
            Self::PpmMediumHaul => "ppm_medium_haul",
            Self::PpmLongHaul => "ppm_long_haul",
        }
    }

    /// The entitlement line this rate feeds.
    pub fn entitlement(&self) -> EntitlementType {
        match self {
            Self::DlaBase => EntitlementType::Dla,
            Self::TleDaily => EntitlementType::Tle,
            Self::MaltFirst100 | Self::MaltNext300 | Self::MaltBeyond400 => EntitlementType::Malt,
            Self::PerDiemDaily => EntitlementType::PerDiem,
            Self::PpmShortHaul | Self::PpmMediumHaul | Self::PpmLongHaul => EntitlementType::Ppm,
        }
    }

    /// Whether records of this kind are keyed by locality.
    pub fn is_locality_scoped(&self) -> bool {
        matches!(self, Self::TleDaily | Self::PerDiemDaily)
    }

    /// Fractional digits at which the amount is parsed.
    ///
    /// Dollar amounts are held in cents (scale 2); per-mile and per-cwt-mile
    /// rates in mills (scale 3).
    pub fn scale(&self) -> u32 {
        match self {
            Self::DlaBase | Self::TleDaily | Self::PerDiemDaily => 2,
            Self::MaltFirst100
            | Self::MaltNext300
            | Self::MaltBeyond400
            | Self::PpmShortHaul
            | Self::PpmMediumHaul
            | Self::PpmLongHaul => 3,
        }
    }

    /// Amount used when no record of this kind exists at all.
    pub fn statutory_floor(&self) -> &'static str {
        match self {
            Self::DlaBase => "1200.00",
            Self::TleDaily => "110.00",
            Self::MaltFirst100 | Self::MaltNext300 | Self::MaltBeyond400 => "0.18",
            Self::PerDiemDaily => "68.00",
            Self::PpmShortHaul | Self::PpmMediumHaul | Self::PpmLongHaul => "0.045",
        }
    }

    /// The carrier-rate kind for a total haul distance.
    ///
    /// The band is chosen by total distance and applied to every mile.
    pub fn ppm_band_for(miles: u32) -> RateKind {
        match miles {
            0..=250 => Self::PpmShortHaul,
            251..=1000 => Self::PpmMediumHaul,
            _ => Self::PpmLongHaul,
        }
    }
}

impl fmt::Display for RateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which paygrades a record applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaygradeScope {
    /// Every paygrade.
    #[default]
    All,
    /// One paygrade band.
    Band(PaygradeBand),
}

impl PaygradeScope {
    /// Whether this scope includes the band.
    pub fn covers(&self, band: PaygradeBand) -> bool {
        match self {
            Self::All => true,
            Self::Band(b) => *b == band,
        }
    }

    fn specificity(&self) -> u8 {
        match self {
            Self::All => 0,
            Self::Band(_) => 1,
        }
    }
}

impl TryFrom<String> for PaygradeScope {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        PaygradeBand::all()
            .iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(value.trim()))
            .map(|b| Self::Band(*b))
            .ok_or_else(|| format!("unknown paygrade scope \"{value}\" (expected \"all\" or a band such as \"E5-E6\")"))
    }
}

impl From<PaygradeScope> for String {
    fn from(scope: PaygradeScope) -> String {
        match scope {
            PaygradeScope::All => "all".to_string(),
            PaygradeScope::Band(b) => b.as_str().to_string(),
        }
    }
}

/// How closely a resolved record matches the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Effective on the as-of date, for the requested scope.
    #[default]
    Exact,
    /// Nearest record outside its effective range.
    Interpolated,
    /// National default, lowest band, or statutory floor.
    Fallback,
}

fn full_confidence() -> Confidence {
    Confidence::EXACT
}

/// A versioned reference-table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    pub kind: RateKind,
    #[serde(default)]
    pub paygrade: PaygradeScope,
    /// `None` applies to members with and without dependents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependents: Option<bool>,
    /// `None` is the national default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<LocalityCode>,
    pub effective_from: NaiveDate,
    /// Inclusive; `None` is open-ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_until: Option<NaiveDate>,
    /// Decimal string, e.g. `"1500.00"` or `"0.22"`.
    pub amount: String,
    pub citation: String,
    #[serde(default)]
    pub confidence_tier: ConfidenceTier,
    #[serde(default = "full_confidence")]
    pub confidence: Confidence,
    pub last_verified: NaiveDate,
}

impl RateRecord {
    /// Whether the record is effective on `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_until.map_or(true, |until| date <= until)
    }

    /// The amount as an integer at [`RateKind::scale`] (cents or mills).
    pub fn scaled_amount(&self) -> Option<i64> {
        parse_scaled(&self.amount, self.kind.scale())
    }

    /// Human-readable source line for reports.
    pub fn source_label(&self) -> String {
        format!(
            "{} (effective {}, verified {})",
            self.citation, self.effective_from, self.last_verified
        )
    }

    /// Ranking among records that all match a query: band-scoped over
    /// all-scoped, dependency-specific over unspecified.
    pub(crate) fn specificity(&self) -> (u8, u8) {
        (self.paygrade.specificity(), u8::from(self.dependents.is_some()))
    }

    /// Downgrade tier and cap confidence.
    pub(crate) fn degrade(mut self, tier: ConfidenceTier, cap: Confidence) -> Self {
        self.confidence_tier = tier;
        self.confidence = self.confidence.min(cap);
        self
    }
}
