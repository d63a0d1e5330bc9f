//! # pcs-cli: CLI for the PCS Entitlement Engine
//!
//! Provides the `pcs` command-line interface over the calculation and
//! validation libraries.
//!
//! ## Subcommands
//!
//! - `pcs calculate`: Price every entitlement line for a claim.
//! - `pcs validate`: Run the compliance rule registry; exit 1 when the claim
//!   is not ready to submit.
//! - `pcs payout`: Net a gross PPM incentive after withholding.
//! - `pcs rates`: Dump and verify reference tables.
//! - `pcs rules`: List the rule registry.
//! - `pcs template`: Print a blank claim draft.
//!
//! ```bash
//! pcs calculate claim.yaml --format text
//! pcs validate claim.json --with-calculation --rules ARRIVAL_AFTER_DEPARTURE,TLE_ORIGIN_NIGHTS_MAX
//! pcs payout --gross 1200.00 --federal 15 --state 5
//! ```

pub mod calculate;
pub mod config;
pub mod payout;
pub mod rates;
pub mod rules;
pub mod template;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use pcs_core::{Claim, ClaimDraft};
use pcs_rates::{complete_distance, GreatCircleDistance, ReferenceData};

use crate::config::CliConfig;

/// Output rendering for subcommands that print a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Whether a path should be parsed as JSON rather than YAML.
pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Read a claim draft from a JSON or YAML file.
pub fn load_claim_draft(path: &Path) -> Result<ClaimDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read claim file: {}", path.display()))?;
    if is_json(path) {
        serde_json::from_str(&content).with_context(|| format!("failed to parse claim JSON: {}", path.display()))
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("failed to parse claim YAML: {}", path.display()))
    }
}

/// Read and normalize a claim, filling a missing distance from locality
/// coordinates when the configuration allows it.
pub fn load_claim(path: &Path, reference: &ReferenceData, config: &CliConfig) -> Result<Claim> {
    let draft = load_claim_draft(path)?;
    let claim = draft
        .normalize()
        .with_context(|| format!("claim has invalid fields: {}", path.display()))?;
    if config.estimate_distance {
        Ok(complete_distance(claim, &GreatCircleDistance::new(reference)))
    } else {
        Ok(claim)
    }
}

/// Reference data from `--reference`, else the config file, else built-in.
pub fn load_reference(override_path: Option<&Path>, config: &CliConfig) -> Result<ReferenceData> {
    match override_path.or(config.reference.as_deref()) {
        Some(path) => ReferenceData::load(path)
            .with_context(|| format!("failed to load reference data: {}", path.display())),
        None => Ok(ReferenceData::standard()),
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::path::PathBuf;

    pub const CLAIM_YAML: &str = "\
id: pcs-2025-001
claimName: Norfolk to San Diego
paygrade: E-5
dependents: true
originLocality: NORFOLK_VA
destinationLocality: SAN_DIEGO_CA
ordersDate: 2025-05-01
departureDate: 2025-06-01
arrivalDate: 2025-06-05
originLodgingNights: 3
destinationLodgingNights: 5
distanceMiles: 2650
estimatedWeight: 8000
";

    pub fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{write, CLAIM_YAML};

    #[test]
    fn yaml_and_json_claims_load_alike() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = write(&dir, "claim.yaml", CLAIM_YAML);
        let draft = load_claim_draft(&yaml).unwrap();
        let json = write(&dir, "claim.json", &serde_json::to_string(&draft).unwrap());
        assert_eq!(load_claim_draft(&json).unwrap(), draft);
    }

    #[test]
    fn missing_distance_estimated_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let content = CLAIM_YAML.replace("distanceMiles: 2650\n", "");
        let path = write(&dir, "claim.yaml", &content);
        let reference = ReferenceData::standard();

        let config = CliConfig::default();
        assert!(load_claim(&path, &reference, &config).unwrap().distance_miles.is_some());

        let config = CliConfig {
            estimate_distance: false,
            ..CliConfig::default()
        };
        assert!(load_claim(&path, &reference, &config).unwrap().distance_miles.is_none());
    }

    #[test]
    fn malformed_claim_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "claim.yaml", "departureDate: not-a-date\n");
        let err = load_claim(&path, &ReferenceData::standard(), &CliConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("departureDate"));
    }

    #[test]
    fn missing_reference_file_is_an_error() {
        let config = CliConfig::default();
        assert!(load_reference(Some(Path::new("/nonexistent/rates.yaml")), &config).is_err());
        assert_eq!(load_reference(None, &config).unwrap().version(), "FY2025");
    }
}
