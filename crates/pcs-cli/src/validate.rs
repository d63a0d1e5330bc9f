//! # Validate Subcommand
//!
//! Runs the rule registry over a claim file. Exit code 1 means the claim is
//! not ready to submit.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pcs_entitlements::EntitlementCalculator;
use pcs_validation::{RuleRegistry, ValidationEngine, ValidationSummary};

use crate::config::CliConfig;
use crate::OutputFormat;

/// Arguments for the `pcs validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Claim file (JSON or YAML).
    #[arg(value_name = "CLAIM")]
    pub claim: PathBuf,

    /// Reference-table file overriding the configured one.
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Also calculate the claim so rate-confidence rules can run.
    #[arg(long)]
    pub with_calculation: bool,

    /// Run only these rules, in this order (comma-separated codes).
    #[arg(long, value_delimiter = ',', value_name = "CODE")]
    pub rules: Option<Vec<String>>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when ready to submit, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    let summary = validate_file(args, config)?;
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => println!("{summary}"),
    }
    Ok(if summary.ready_to_submit { 0 } else { 1 })
}

pub fn validate_file(args: &ValidateArgs, config: &CliConfig) -> Result<ValidationSummary> {
    let registry = match &args.rules {
        Some(codes) => RuleRegistry::from_codes(codes).context("invalid --rules")?,
        None => RuleRegistry::standard(),
    };
    let reference = crate::load_reference(args.reference.as_deref(), config)?;
    let claim = crate::load_claim(&args.claim, &reference, config)?;

    let calculation = if args.with_calculation {
        let calculator = EntitlementCalculator::new(&reference, config.calculator.clone())
            .context("invalid calculator configuration")?;
        match calculator.calculate(&claim) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(error = %e, "calculation skipped; validating claim alone");
                None
            }
        }
    } else {
        None
    };

    let engine = ValidationEngine::new(&reference)
        .with_registry(registry)
        .with_config(config.validation.clone())
        .with_policy(config.calculator.clone());
    Ok(engine.validate(&claim, calculation.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcs_validation::{RuleCode, Severity};

    use crate::testutil::{write, CLAIM_YAML};

    fn args(claim: PathBuf) -> ValidateArgs {
        ValidateArgs {
            claim,
            reference: None,
            with_calculation: true,
            rules: None,
            format: OutputFormat::Json,
        }
    }

    #[test]
    fn compliant_claim_is_ready() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "claim.yaml", CLAIM_YAML);
        let summary = validate_file(&args(path), &CliConfig::default()).unwrap();
        assert_eq!(summary.total_rules, 13);
        assert!(summary.ready_to_submit);
        assert_eq!(summary.overall_score, 100);
    }

    #[test]
    fn bad_dates_validate_without_calculation() {
        let dir = tempfile::tempdir().unwrap();
        let content = CLAIM_YAML.replace("arrivalDate: 2025-06-05", "arrivalDate: 2025-05-30");
        let path = write(&dir, "claim.yaml", &content);
        let summary = validate_file(&args(path), &CliConfig::default()).unwrap();
        assert_eq!(summary.errors, 1);
        assert!(!summary.ready_to_submit);
        assert_eq!(summary.results[0].rule_code, RuleCode::ArrivalAfterDeparture);
    }

    #[test]
    fn rule_selection_limits_registry() {
        let dir = tempfile::tempdir().unwrap();
        let content = CLAIM_YAML.replace("originLodgingNights: 3", "originLodgingNights: 15");
        let path = write(&dir, "claim.yaml", &content);
        let mut a = args(path);
        a.rules = Some(vec!["TLE_ORIGIN_NIGHTS_MAX".into(), "CLAIM_NAME_REQUIRED".into()]);
        let summary = validate_file(&a, &CliConfig::default()).unwrap();
        assert_eq!(summary.total_rules, 2);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.results[0].severity, Severity::Warning);
    }

    #[test]
    fn unknown_rule_code_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "claim.yaml", CLAIM_YAML);
        let mut a = args(path);
        a.rules = Some(vec!["NOT_A_RULE".into()]);
        let err = validate_file(&a, &CliConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("NOT_A_RULE"));
    }

    #[test]
    fn configured_tle_cap_drives_the_warning() {
        let dir = tempfile::tempdir().unwrap();
        let content = CLAIM_YAML.replace("originLodgingNights: 3", "originLodgingNights: 9");
        let path = write(&dir, "claim.yaml", &content);
        let mut config = CliConfig::default();
        config.calculator.tle_max_nights = 7;

        let summary = validate_file(&args(path.clone()), &config).unwrap();
        let tle: Vec<_> = summary
            .results
            .iter()
            .filter(|f| f.rule_code == RuleCode::TleOriginNightsMax)
            .collect();
        assert_eq!(tle.len(), 1);
        assert_eq!(tle[0].severity, Severity::Warning);

        assert_eq!(validate_file(&args(path), &CliConfig::default()).unwrap().warnings, 0);
    }
}
