//! # Identifier Newtypes
//!
//! No bare strings for identifiers. Each newtype validates at construction
//! and normalizes its representation so that map lookups are exact.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A rate-table locality key, e.g. `SAN_DIEGO_CA` or `RAMSTEIN_DE`.
///
/// Input is upper-cased and spaces/hyphens become underscores, so
/// `"san diego-ca"` and `"SAN_DIEGO_CA"` name the same locality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalityCode(String);

impl LocalityCode {
    /// Normalize and validate a locality code.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = raw.as_ref();
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        if normalized.is_empty()
            || !normalized
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(ValidationError::InvalidLocality(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// The normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocalityCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocalityCode> for String {
    fn from(code: LocalityCode) -> String {
        code.0
    }
}

impl fmt::Display for LocalityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller-assigned claim identifier.
///
/// The engine never invents one during normalization; [`ClaimId::generate`]
/// exists for tooling that creates fresh drafts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClaimId(String);

impl ClaimId {
    /// Wrap a non-empty identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidClaimId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// A fresh random (UUID v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClaimId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClaimId> for String {
    fn from(id: ClaimId) -> String {
        id.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locality_normalizes_spelling() {
        let a = LocalityCode::new("san diego-ca").unwrap();
        let b = LocalityCode::new("SAN_DIEGO_CA").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "SAN_DIEGO_CA");
    }

    #[test]
    fn locality_rejects_empty_and_symbols() {
        assert!(LocalityCode::new("").is_err());
        assert!(LocalityCode::new("   ").is_err());
        assert!(LocalityCode::new("Norfolk, VA").is_err());
    }

    #[test]
    fn locality_serde_normalizes() {
        let code: LocalityCode = serde_json::from_str("\"norfolk va\"").unwrap();
        assert_eq!(code.as_str(), "NORFOLK_VA");
        assert!(serde_json::from_str::<LocalityCode>("\"!\"").is_err());
    }

    #[test]
    fn claim_id_rejects_blank() {
        assert!(ClaimId::new("  ").is_err());
        assert_eq!(ClaimId::new(" pcs-001 ").unwrap().as_str(), "pcs-001");
    }

    #[test]
    fn generated_claim_ids_are_unique() {
        assert_ne!(ClaimId::generate(), ClaimId::generate());
    }
}
