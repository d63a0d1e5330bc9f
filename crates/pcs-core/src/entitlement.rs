//! # Entitlement Types and Confidence
//!
//! The five reimbursement lines a PCS estimate produces, and the 0–100
//! confidence figure attached to each of them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A reimbursable PCS entitlement line.
///
/// Declaration order is report order: every result, table and data-source
/// list iterates lines in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntitlementType {
    /// Dislocation Allowance.
    #[serde(rename = "dla")]
    Dla,
    /// Temporary Lodging Expense.
    #[serde(rename = "tle")]
    Tle,
    /// Mileage Allowance in Lieu of Transportation.
    #[serde(rename = "malt")]
    Malt,
    /// Per diem for travel days.
    #[serde(rename = "perDiem")]
    PerDiem,
    /// Personally Procured Move incentive (gross).
    #[serde(rename = "ppm")]
    Ppm,
}

/// Number of entitlement lines in a calculation.
pub const ENTITLEMENT_TYPE_COUNT: usize = 5;

impl EntitlementType {
    /// All lines in report order.
    pub fn all() -> &'static [EntitlementType; ENTITLEMENT_TYPE_COUNT] {
        &[Self::Dla, Self::Tle, Self::Malt, Self::PerDiem, Self::Ppm]
    }

    /// Wire name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dla => "dla",
            Self::Tle => "tle",
            Self::Malt => "malt",
            Self::PerDiem => "perDiem",
            Self::Ppm => "ppm",
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dla => "Dislocation Allowance",
            Self::Tle => "Temporary Lodging Expense",
            Self::Malt => "Mileage Allowance (MALT)",
            Self::PerDiem => "Per Diem",
            Self::Ppm => "PPM Incentive (gross)",
        }
    }
}

impl fmt::Display for EntitlementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trust in a figure, from 0 (statutory placeholder) to 100 (exact table hit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    /// Exact reference-data match.
    pub const EXACT: Confidence = Confidence(100);
    /// Nearest effective record used outside its date range.
    pub const INTERPOLATED: Confidence = Confidence(80);
    /// National default substituted for a missing locality.
    pub const NATIONAL_DEFAULT: Confidence = Confidence(60);
    /// Statutory floor or unmapped paygrade: the number is a placeholder.
    pub const NONE: Confidence = Confidence(0);

    /// Construct, rejecting values above 100.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > 100 {
            return Err(ValidationError::InvalidConfidence(u32::from(value)));
        }
        Ok(Self(value))
    }

    /// Construct, clamping values above 100.
    pub fn saturating(value: u32) -> Self {
        Self(value.min(100) as u8)
    }

    /// The raw 0–100 value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// The lower of two confidences.
    pub fn min(self, other: Confidence) -> Confidence {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

impl TryFrom<u32> for Confidence {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value > 100 {
            return Err(ValidationError::InvalidConfidence(value));
        }
        Ok(Self(value as u8))
    }
}

impl From<Confidence> for u8 {
    fn from(c: Confidence) -> u8 {
        c.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entitlement_wire_names() {
        let names: Vec<&str> = EntitlementType::all().iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["dla", "tle", "malt", "perDiem", "ppm"]);
        for t in EntitlementType::all() {
            let json = serde_json::to_string(t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn confidence_bounds() {
        assert!(Confidence::new(100).is_ok());
        assert!(Confidence::new(101).is_err());
        assert_eq!(Confidence::saturating(250).value(), 100);
        assert!(serde_json::from_str::<Confidence>("101").is_err());
        assert_eq!(serde_json::from_str::<Confidence>("60").unwrap(), Confidence::NATIONAL_DEFAULT);
    }

    #[test]
    fn confidence_min_is_conservative() {
        assert_eq!(Confidence::EXACT.min(Confidence::NONE), Confidence::NONE);
        assert_eq!(
            Confidence::INTERPOLATED.min(Confidence::NATIONAL_DEFAULT),
            Confidence::NATIONAL_DEFAULT
        );
    }
}
