//! Aggregated validation report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::finding::{Severity, ValidationFinding};

/// Outcome of running a registry against one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Number of rules evaluated. Always the registry size.
    pub total_rules: usize,
    /// Rules that produced no error or warning.
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
    pub info: usize,
    /// 0 to 100.
    pub overall_score: u8,
    pub ready_to_submit: bool,
    /// Ordered by severity, then registry order.
    pub results: Vec<ValidationFinding>,
}

/// `100 - (errors * error_weight + warnings * warning_weight)`, floored at 0.
pub fn score(errors: usize, warnings: usize, config: &ValidationConfig) -> u8 {
    let as_u64 = |n: usize| u64::try_from(n).unwrap_or(u64::MAX);
    let penalty = as_u64(errors)
        .saturating_mul(u64::from(config.error_weight))
        .saturating_add(as_u64(warnings).saturating_mul(u64::from(config.warning_weight)));
    let remaining = 100u64.saturating_sub(penalty);
    u8::try_from(remaining).unwrap_or(0)
}

impl ValidationSummary {
    pub(crate) fn from_findings(
        total_rules: usize,
        passed: usize,
        results: Vec<ValidationFinding>,
        config: &ValidationConfig,
    ) -> Self {
        let count = |severity: Severity| {
            results
                .iter()
                .filter(|f| f.severity == severity && !f.passed)
                .count()
        };
        let (errors, warnings, info) = (count(Severity::Error), count(Severity::Warning), count(Severity::Info));
        Self {
            total_rules,
            passed,
            warnings,
            errors,
            info,
            overall_score: score(errors, warnings, config),
            ready_to_submit: errors == 0,
            results,
        }
    }

    pub fn findings_of(&self, severity: Severity) -> impl Iterator<Item = &ValidationFinding> {
        self.results.iter().filter(move |f| f.severity == severity)
    }
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} rules: {} passed, {} errors, {} warnings, {} info; score {}/100",
            self.total_rules, self.passed, self.errors, self.warnings, self.info, self.overall_score
        )?;
        for finding in &self.results {
            writeln!(f, "  {finding}")?;
        }
        write!(
            f,
            "{}",
            if self.ready_to_submit {
                "Ready to submit"
            } else {
                "Not ready to submit"
            }
        )
    }
}
