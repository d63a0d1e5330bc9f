//! Validation findings and severities.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::RuleCode;

/// How serious a finding is.
///
/// Declaration order is report order: errors first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks submission.
    Error,
    /// Likely to reduce reimbursement or draw finance-office questions.
    Warning,
    /// Informational only.
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule outcome for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFinding {
    /// Wire (camelCase) name of the field the finding is about.
    pub field: String,
    pub severity: Severity,
    pub rule_code: RuleCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    /// `true` only on the optional "rule passed" entries.
    #[serde(default)]
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ValidationFinding {
    pub fn new(rule_code: RuleCode, field: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            severity,
            rule_code,
            message: message.into(),
            suggested_fix: None,
            citation: rule_code.citation().map(str::to_string),
            passed: false,
            details: None,
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// The informational entry recorded for a rule that found nothing.
    pub fn passing(rule_code: RuleCode) -> Self {
        Self {
            passed: true,
            ..Self::new(
                rule_code,
                rule_code.field(),
                Severity::Info,
                format!("{} passed", rule_code.as_str()),
            )
        }
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({}): {}", self.severity, self.rule_code, self.field, self.message)?;
        if let Some(citation) = &self.citation {
            write!(f, " [{citation}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_errors_first() {
        let mut s = vec![Severity::Info, Severity::Error, Severity::Warning];
        s.sort();
        assert_eq!(s, vec![Severity::Error, Severity::Warning, Severity::Info]);
    }

    #[test]
    fn finding_inherits_rule_citation() {
        let f = ValidationFinding::new(
            RuleCode::TleOriginNightsMax,
            "originLodgingNights",
            Severity::Warning,
            "too many nights",
        );
        assert_eq!(f.citation.as_deref(), Some("JTR 054205"));
        assert!(f.to_string().contains("[warning] TLE_ORIGIN_NIGHTS_MAX"));
    }

    #[test]
    fn passing_entry() {
        let f = ValidationFinding::passing(RuleCode::ClaimNameRequired);
        assert!(f.passed);
        assert_eq!(f.severity, Severity::Info);
        assert_eq!(f.field, "claimName");
    }

    #[test]
    fn serialized_shape() {
        let f = ValidationFinding::new(RuleCode::ArrivalAfterDeparture, "arrivalDate", Severity::Error, "x")
            .with_fix("fix it");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["rule_code"], "ARRIVAL_AFTER_DEPARTURE");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["suggested_fix"], "fix it");
        assert_eq!(json["passed"], false);
    }
}
