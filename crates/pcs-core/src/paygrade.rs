//! # Paygrades and Entitlement Bands
//!
//! A [`Paygrade`] is the member's grade on the orders (`E-5`, `O-3`, `W-2`).
//! Rate tables are keyed by [`PaygradeBand`], a grouping of grades that share
//! an entitlement tier. Every band match is exhaustive so that adding a band
//! forces every rate consumer to handle it.
//!
//! Grades that cannot be parsed are kept as [`Paygrade::Unmapped`] rather than
//! rejected: the calculation still completes, at confidence zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A member's paygrade as printed on PCS orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Paygrade {
    /// Enlisted grades E-1 through E-9.
    Enlisted(u8),
    /// Warrant officer grades W-1 through W-5.
    Warrant(u8),
    /// Commissioned officer grades O-1 through O-10.
    Officer(u8),
    /// A code the engine does not recognise, kept verbatim.
    Unmapped(String),
}

impl Paygrade {
    /// Parse a paygrade code. Accepts `E-5`, `E5`, `e5`, `O-10`, `W-2`.
    /// Anything else becomes [`Paygrade::Unmapped`].
    pub fn parse(code: &str) -> Self {
        let trimmed = code.trim();
        let normalized: String = trimmed
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        let mut chars = normalized.chars();
        let prefix = chars.next();
        let number = chars.as_str().parse::<u8>().ok();

        match (prefix, number) {
            (Some('E'), Some(n @ 1..=9)) => Self::Enlisted(n),
            (Some('W'), Some(n @ 1..=5)) => Self::Warrant(n),
            (Some('O'), Some(n @ 1..=10)) => Self::Officer(n),
            _ => Self::Unmapped(trimmed.to_string()),
        }
    }

    /// The entitlement band for this grade, or `None` if unmapped.
    ///
    /// Warrant officers W-1 to W-3 share the O-1 to O-3 tier and W-4/W-5 the
    /// O-4 to O-6 tier.
    pub fn band(&self) -> Option<PaygradeBand> {
        match self {
            Self::Enlisted(1..=4) => Some(PaygradeBand::E1E4),
            Self::Enlisted(5..=6) => Some(PaygradeBand::E5E6),
            Self::Enlisted(_) => Some(PaygradeBand::E7E9),
            Self::Warrant(1..=3) => Some(PaygradeBand::O1O3),
            Self::Warrant(_) => Some(PaygradeBand::O4O6),
            Self::Officer(1..=3) => Some(PaygradeBand::O1O3),
            Self::Officer(4..=6) => Some(PaygradeBand::O4O6),
            Self::Officer(_) => Some(PaygradeBand::O7Plus),
            Self::Unmapped(_) => None,
        }
    }

    /// Whether the grade was recognised.
    pub fn is_mapped(&self) -> bool {
        !matches!(self, Self::Unmapped(_))
    }

    /// Canonical code, e.g. `E-5`.
    pub fn code(&self) -> String {
        match self {
            Self::Enlisted(n) => format!("E-{n}"),
            Self::Warrant(n) => format!("W-{n}"),
            Self::Officer(n) => format!("O-{n}"),
            Self::Unmapped(raw) => raw.clone(),
        }
    }

    /// Every recognised grade in seniority order within each corps.
    pub fn all_mapped() -> Vec<Paygrade> {
        let mut grades = Vec::with_capacity(24);
        grades.extend((1..=9).map(Self::Enlisted));
        grades.extend((1..=5).map(Self::Warrant));
        grades.extend((1..=10).map(Self::Officer));
        grades
    }
}

impl fmt::Display for Paygrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for Paygrade {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for Paygrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for Paygrade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Groups of paygrades sharing an entitlement rate tier.
///
/// Variants are declared in seniority order; the derived `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaygradeBand {
    /// E-1 to E-4.
    #[serde(rename = "E1-E4")]
    E1E4,
    /// E-5 and E-6.
    #[serde(rename = "E5-E6")]
    E5E6,
    /// E-7 to E-9.
    #[serde(rename = "E7-E9")]
    E7E9,
    /// O-1 to O-3 (and W-1 to W-3).
    #[serde(rename = "O1-O3")]
    O1O3,
    /// O-4 to O-6 (and W-4, W-5).
    #[serde(rename = "O4-O6")]
    O4O6,
    /// O-7 and above.
    #[serde(rename = "O7+")]
    O7Plus,
}

impl PaygradeBand {
    /// All bands in seniority order.
    pub fn all() -> &'static [PaygradeBand] {
        &[
            Self::E1E4,
            Self::E5E6,
            Self::E7E9,
            Self::O1O3,
            Self::O4O6,
            Self::O7Plus,
        ]
    }

    /// Display label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E1E4 => "E1-E4",
            Self::E5E6 => "E5-E6",
            Self::E7E9 => "E7-E9",
            Self::O1O3 => "O1-O3",
            Self::O4O6 => "O4-O6",
            Self::O7Plus => "O7+",
        }
    }

    /// The most junior band, used when a grade cannot be mapped.
    pub fn lowest() -> PaygradeBand {
        Self::E1E4
    }
}

impl fmt::Display for PaygradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
