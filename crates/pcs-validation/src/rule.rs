//! The rule trait and the context every rule reads.

use std::fmt;

use thiserror::Error;

use pcs_core::Claim;
use pcs_entitlements::{CalculationResult, CalculatorConfig};
use pcs_rates::ReferenceData;

use crate::config::ValidationConfig;
use crate::finding::ValidationFinding;
use crate::registry::RuleCode;

/// A rule could not reach a verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule {code} needs {what}, which is not available")]
    MissingContext { code: RuleCode, what: String },

    #[error("rule {code} failed: {reason}")]
    Failed { code: RuleCode, reason: String },
}

/// Everything a rule may look at. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub claim: &'a Claim,
    /// Present when validation runs alongside a calculation.
    pub calculation: Option<&'a CalculationResult>,
    pub reference: &'a ReferenceData,
    pub config: &'a ValidationConfig,
    /// Calculator policy; the limits the calculator clamps to.
    pub policy: &'a CalculatorConfig,
}

/// One independent compliance check.
///
/// Implementations are pure: the same context always produces the same
/// findings. Returning an empty vector means the rule passed.
pub trait ValidationRule: Send + Sync + fmt::Debug {
    fn code(&self) -> RuleCode;

    fn field(&self) -> &'static str {
        self.code().field()
    }

    fn citation(&self) -> Option<&'static str> {
        self.code().citation()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ValidationFinding>, RuleError>;
}
