//! # Rule Registry
//!
//! [`RuleCode`] enumerates every rule the engine knows. A [`RuleRegistry`] is
//! an ordered selection of them; registry order breaks severity ties in the
//! report. Unknown or repeated codes are rejected when the registry is built,
//! never at evaluation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rule::ValidationRule;
use crate::rules;

/// Errors building a registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown rule code \"{code}\"; known codes: {known}")]
    UnknownCode { code: String, known: String },

    #[error("rule code {0} listed more than once")]
    DuplicateCode(RuleCode),
}

/// Every validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCode {
    ClaimNameRequired,
    OrdersDateRequired,
    PaygradeRecognized,
    TravelDatesRequired,
    ArrivalAfterDeparture,
    DepartureAfterOrders,
    TleOriginNightsMax,
    TleDestinationNightsMax,
    DistancePlausible,
    PpmWeightRequired,
    WeightAllowance,
    DlaMultiplierStacking,
    RateConfidence,
}

impl RuleCode {
    /// All codes in standard registry order.
    pub fn all() -> &'static [RuleCode] {
        &[
            Self::ClaimNameRequired,
            Self::OrdersDateRequired,
            Self::PaygradeRecognized,
            Self::TravelDatesRequired,
            Self::ArrivalAfterDeparture,
            Self::DepartureAfterOrders,
            Self::TleOriginNightsMax,
            Self::TleDestinationNightsMax,
            Self::DistancePlausible,
            Self::PpmWeightRequired,
            Self::WeightAllowance,
            Self::DlaMultiplierStacking,
            Self::RateConfidence,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClaimNameRequired => "CLAIM_NAME_REQUIRED",
            Self::OrdersDateRequired => "ORDERS_DATE_REQUIRED",
            Self::PaygradeRecognized => "PAYGRADE_RECOGNIZED",
            Self::TravelDatesRequired => "TRAVEL_DATES_REQUIRED",
            Self::ArrivalAfterDeparture => "ARRIVAL_AFTER_DEPARTURE",
            Self::DepartureAfterOrders => "DEPARTURE_AFTER_ORDERS",
            Self::TleOriginNightsMax => "TLE_ORIGIN_NIGHTS_MAX",
            Self::TleDestinationNightsMax => "TLE_DESTINATION_NIGHTS_MAX",
            Self::DistancePlausible => "DISTANCE_PLAUSIBLE",
            Self::PpmWeightRequired => "PPM_WEIGHT_REQUIRED",
            Self::WeightAllowance => "WEIGHT_ALLOWANCE",
            Self::DlaMultiplierStacking => "DLA_MULTIPLIER_STACKING",
            Self::RateConfidence => "RATE_CONFIDENCE",
        }
    }

    /// The claim field the rule reports on.
    pub fn field(&self) -> &'static str {
        match self {
            Self::ClaimNameRequired => "claimName",
            Self::OrdersDateRequired => "ordersDate",
            Self::PaygradeRecognized => "paygrade",
            Self::TravelDatesRequired | Self::DepartureAfterOrders => "departureDate",
            Self::ArrivalAfterDeparture => "arrivalDate",
            Self::TleOriginNightsMax => "originLodgingNights",
            Self::TleDestinationNightsMax => "destinationLodgingNights",
            Self::DistancePlausible => "distanceMiles",
            Self::PpmWeightRequired => "estimatedWeight",
            Self::WeightAllowance => "actualWeight",
            Self::DlaMultiplierStacking => "dependents",
            Self::RateConfidence => "calculation",
        }
    }

    /// Regulatory citation, where one applies.
    pub fn citation(&self) -> Option<&'static str> {
        match self {
            Self::OrdersDateRequired | Self::DepartureAfterOrders => Some("JTR 050101"),
            Self::ArrivalAfterDeparture => Some("JTR 020301"),
            Self::TleOriginNightsMax | Self::TleDestinationNightsMax => Some("JTR 054205"),
            Self::DistancePlausible => Some("JTR 020304"),
            Self::PpmWeightRequired => Some("JTR 051402"),
            Self::WeightAllowance => Some("JTR Table 5-37"),
            Self::DlaMultiplierStacking => Some("JTR 050501"),
            Self::ClaimNameRequired
            | Self::PaygradeRecognized
            | Self::TravelDatesRequired
            | Self::RateConfidence => None,
        }
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ClaimNameRequired => "Claim has a name",
            Self::OrdersDateRequired => "Orders date is present",
            Self::PaygradeRecognized => "Paygrade is present and maps to a rate band",
            Self::TravelDatesRequired => "Departure and arrival dates are present",
            Self::ArrivalAfterDeparture => "Arrival is after departure",
            Self::DepartureAfterOrders => "Departure is on or after the orders date",
            Self::TleOriginNightsMax => "Origin TLE nights within the per-location maximum",
            Self::TleDestinationNightsMax => "Destination TLE nights within the per-location maximum",
            Self::DistancePlausible => "Distance is present and plausible for the localities",
            Self::PpmWeightRequired => "PPM moves state an estimated or actual weight",
            Self::WeightAllowance => "Shipment weight within the paygrade allowance",
            Self::DlaMultiplierStacking => "Flags moves where both DLA multipliers apply",
            Self::RateConfidence => "Calculation relies on exact reference rates",
        }
    }

    /// The rule implementation. Exhaustive: a new code does not compile
    /// until it has a rule.
    pub fn rule(&self) -> Box<dyn ValidationRule> {
        match self {
            Self::ClaimNameRequired => Box::new(rules::ClaimNameRequired),
            Self::OrdersDateRequired => Box::new(rules::OrdersDateRequired),
            Self::PaygradeRecognized => Box::new(rules::PaygradeRecognized),
            Self::TravelDatesRequired => Box::new(rules::TravelDatesRequired),
            Self::ArrivalAfterDeparture => Box::new(rules::ArrivalAfterDeparture),
            Self::DepartureAfterOrders => Box::new(rules::DepartureAfterOrders),
            Self::TleOriginNightsMax => Box::new(rules::TleNightsMax::origin()),
            Self::TleDestinationNightsMax => Box::new(rules::TleNightsMax::destination()),
            Self::DistancePlausible => Box::new(rules::DistancePlausible),
            Self::PpmWeightRequired => Box::new(rules::PpmWeightRequired),
            Self::WeightAllowance => Box::new(rules::WeightAllowanceRule),
            Self::DlaMultiplierStacking => Box::new(rules::DlaMultiplierStacking),
            Self::RateConfidence => Box::new(rules::RateConfidence),
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleCode {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RegistryError::UnknownCode {
                code: wanted.to_string(),
                known: Self::all()
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// An ordered set of rules.
#[derive(Debug)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl RuleRegistry {
    /// Every rule, in [`RuleCode::all`] order.
    pub fn standard() -> Self {
        Self {
            rules: RuleCode::all().iter().map(RuleCode::rule).collect(),
        }
    }

    /// A registry of the named rules, in the order given.
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self, RegistryError> {
        let parsed = codes
            .iter()
            .map(|c| c.as_ref().parse::<RuleCode>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rules(parsed.iter().map(RuleCode::rule).collect())
    }

    /// A registry of arbitrary rule implementations. Codes must be unique.
    pub fn from_rules(rules: Vec<Box<dyn ValidationRule>>) -> Result<Self, RegistryError> {
        let mut seen = Vec::with_capacity(rules.len());
        for rule in &rules {
            let code = rule.code();
            if seen.contains(&code) {
                return Err(RegistryError::DuplicateCode(code));
            }
            seen.push(code);
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Box<dyn ValidationRule>] {
        &self.rules
    }

    pub fn codes(&self) -> Vec<RuleCode> {
        self.rules.iter().map(|r| r.code()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
