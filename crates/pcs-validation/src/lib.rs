//! # pcs-validation: Validation Rule Engine
//!
//! Checks a normalized [`Claim`](pcs_core::Claim) against the JTR rules a
//! finance office applies before paying a PCS claim, and reports every
//! problem at once.
//!
//! ## Architecture
//!
//! - [`RuleCode`]: the closed set of rules. Each code knows its field,
//!   citation and implementation.
//! - [`RuleRegistry`]: an ordered selection of rules; built from codes,
//!   failing fast on unknown or duplicate entries.
//! - [`ValidationRule`]: one pure check over a [`RuleContext`].
//! - [`ValidationEngine`]: runs the registry with per-rule failure
//!   isolation and produces a [`ValidationSummary`].
//!
//! Severity decides readiness: any [`Severity::Error`] blocks submission;
//! warnings and info only lower or annotate the score.

pub mod config;
pub mod engine;
pub mod finding;
pub mod registry;
pub mod rule;
pub mod rules;
pub mod summary;

pub use config::ValidationConfig;
pub use engine::ValidationEngine;
pub use finding::{Severity, ValidationFinding};
pub use registry::{RegistryError, RuleCode, RuleRegistry};
pub use rule::{RuleContext, RuleError, ValidationRule};
pub use summary::{score, ValidationSummary};
