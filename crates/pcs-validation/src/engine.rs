//! # Validation Engine
//!
//! Runs every rule in a [`RuleRegistry`] against one claim and folds the
//! findings into a [`ValidationSummary`].
//!
//! The whole registry always runs. A rule that returns an error or panics is
//! contained: it contributes a single info finding under its own code and
//! the remaining rules still execute. `total_rules` is therefore always the
//! registry size.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use pcs_core::Claim;
use pcs_entitlements::{CalculationResult, CalculatorConfig};
use pcs_rates::ReferenceData;

use crate::config::ValidationConfig;
use crate::finding::{Severity, ValidationFinding};
use crate::registry::RuleRegistry;
use crate::rule::{RuleContext, ValidationRule};
use crate::summary::ValidationSummary;

/// Validates claims against one registry and one set of reference data.
#[derive(Debug)]
pub struct ValidationEngine<'a> {
    reference: &'a ReferenceData,
    registry: RuleRegistry,
    config: ValidationConfig,
    policy: CalculatorConfig,
}

impl<'a> ValidationEngine<'a> {
    /// The standard registry with default configuration.
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self {
            reference,
            registry: RuleRegistry::standard(),
            config: ValidationConfig::default(),
            policy: CalculatorConfig::default(),
        }
    }

    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// The calculator policy the claim is priced under. Rules that warn about
    /// a clamped or capped amount read their limit from here.
    pub fn with_policy(mut self, policy: CalculatorConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn policy(&self) -> &CalculatorConfig {
        &self.policy
    }

    /// Validate a claim, optionally alongside its calculation.
    pub fn validate(&self, claim: &Claim, calculation: Option<&CalculationResult>) -> ValidationSummary {
        let ctx = RuleContext {
            claim,
            calculation,
            reference: self.reference,
            config: &self.config,
            policy: &self.policy,
        };

        let mut ordered: Vec<(usize, ValidationFinding)> = Vec::new();
        let mut passed = 0usize;
        for (index, rule) in self.registry.rules().iter().enumerate() {
            let findings = self.run_rule(rule.as_ref(), &ctx);
            let blocking = findings
                .iter()
                .any(|f| matches!(f.severity, Severity::Error | Severity::Warning));
            if !blocking {
                passed += 1;
            }
            if findings.is_empty() && self.config.include_passing {
                ordered.push((index, ValidationFinding::passing(rule.code())));
            }
            ordered.extend(findings.into_iter().map(|f| (index, f)));
        }

        // Stable: findings from one rule keep their emitted order.
        ordered.sort_by_key(|(index, f)| (f.severity, f.passed, *index));
        let results: Vec<ValidationFinding> = ordered.into_iter().map(|(_, f)| f).collect();

        let summary = ValidationSummary::from_findings(self.registry.len(), passed, results, &self.config);
        tracing::info!(
            claim_id = claim.id.as_ref().map(|id| id.as_str()).unwrap_or("<none>"),
            total_rules = summary.total_rules,
            errors = summary.errors,
            warnings = summary.warnings,
            score = summary.overall_score,
            ready = summary.ready_to_submit,
            "claim validation complete"
        );
        summary
    }

    fn run_rule(&self, rule: &dyn ValidationRule, ctx: &RuleContext<'_>) -> Vec<ValidationFinding> {
        let code = rule.code();
        match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx))) {
            Ok(Ok(findings)) => {
                tracing::debug!(rule = %code, findings = findings.len(), "rule evaluated");
                findings
            }
            Ok(Err(e)) => {
                tracing::error!(rule = %code, error = %e, "rule evaluation failed");
                vec![rule_failure(rule, e.to_string())]
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::error!(rule = %code, panic = %reason, "rule panicked");
                vec![rule_failure(rule, format!("panicked: {reason}"))]
            }
        }
    }
}

fn rule_failure(rule: &dyn ValidationRule, reason: String) -> ValidationFinding {
    ValidationFinding::new(
        rule.code(),
        rule.field(),
        Severity::Info,
        format!("Rule {} could not be evaluated: {reason}", rule.code()),
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
