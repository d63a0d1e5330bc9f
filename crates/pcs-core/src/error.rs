//! # Error Hierarchy
//!
//! Structured error types shared by every `pcs-*` crate, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Missing reference data is deliberately absent from this hierarchy: rate
//! lookups degrade confidence instead of failing. Only structurally invalid
//! input is an error on the calculation path.

use thiserror::Error;

/// Top-level error type for the PCS engine.
#[derive(Error, Debug)]
pub enum PcsError {
    /// Claim input is structurally invalid.
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// Canonicalization failure during digest computation.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field-level rejection of claim input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct FieldError {
    /// The offending field, in the wire (camelCase) spelling.
    pub field: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl FieldError {
    /// Build a field error.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Claim input rejected at normalization or calculation entry.
///
/// Carries every offending field so the caller can highlight all of them at
/// once rather than fixing one field per round trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", render_fields(.fields))]
pub struct InputError {
    /// Every field that failed, in the order they were checked.
    pub fields: Vec<FieldError>,
}

impl InputError {
    /// An input error for a single field.
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError::new(field, reason)],
        }
    }

    /// Returns `Ok(())` if no field errors were collected.
    pub fn check(fields: Vec<FieldError>) -> Result<(), InputError> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(InputError { fields })
        }
    }

    /// Whether the given field is among the rejected ones.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

fn render_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Amounts must be integer cents or decimal strings.
    #[error("float values are not permitted in canonical representations; use integer cents or strings: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Locality code is empty or contains characters outside `[A-Z0-9_]`.
    #[error("invalid locality code: \"{0}\" (expected letters, digits and underscores)")]
    InvalidLocality(String),

    /// Claim identifier is empty.
    #[error("invalid claim ID: must be non-empty")]
    InvalidClaimId,

    /// Confidence outside 0..=100.
    #[error("invalid confidence {0} (expected 0-100)")]
    InvalidConfidence(u32),

    /// Decimal amount could not be parsed.
    #[error("invalid amount: \"{0}\"")]
    InvalidAmount(String),

    /// Percentage rate could not be parsed.
    #[error("invalid rate: \"{0}\" (expected a percentage such as \"6.2\")")]
    InvalidRate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_renders_every_field() {
        let err = InputError {
            fields: vec![
                FieldError::new("distanceMiles", "must be >= 0"),
                FieldError::new("arrivalDate", "must be after departureDate"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("distanceMiles: must be >= 0"));
        assert!(msg.contains("arrivalDate: must be after departureDate"));
        assert!(err.has_field("arrivalDate"));
        assert!(!err.has_field("paygrade"));
    }

    #[test]
    fn input_error_check_empty_is_ok() {
        assert!(InputError::check(Vec::new()).is_ok());
        assert!(InputError::check(vec![FieldError::new("a", "b")]).is_err());
    }

    #[test]
    fn pcs_error_wraps_input() {
        let err: PcsError = InputError::field("paygrade", "required").into();
        assert!(err.to_string().starts_with("invalid input: paygrade"));
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError::InvalidLocality("san diego!".into());
        assert!(err.to_string().contains("san diego!"));
    }
}
