//! # Calculate Subcommand
//!
//! Prices a claim file and prints the [`CalculationResult`] as JSON or as a
//! readable report.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pcs_entitlements::{CalculationResult, EntitlementCalculator};

use crate::config::CliConfig;
use crate::OutputFormat;

/// Arguments for the `pcs calculate` subcommand.
#[derive(Args, Debug)]
pub struct CalculateArgs {
    /// Claim file (JSON or YAML).
    #[arg(value_name = "CLAIM")]
    pub claim: PathBuf,

    /// Reference-table file overriding the configured one.
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Append the SHA-256 digest of the canonical result.
    #[arg(long)]
    pub digest: bool,
}

/// Execute the calculate subcommand.
///
/// Returns exit code 0; input and reference-data problems are errors.
pub fn run_calculate(args: &CalculateArgs, config: &CliConfig) -> Result<u8> {
    let result = calculate_file(args, config)?;
    print!("{}", render_calculation(&result, args.format, args.digest)?);
    Ok(0)
}

pub fn calculate_file(args: &CalculateArgs, config: &CliConfig) -> Result<CalculationResult> {
    let reference = crate::load_reference(args.reference.as_deref(), config)?;
    let claim = crate::load_claim(&args.claim, &reference, config)?;
    let calculator = EntitlementCalculator::new(&reference, config.calculator.clone())
        .context("invalid calculator configuration")?;
    calculator
        .calculate(&claim)
        .with_context(|| format!("cannot calculate {}", args.claim.display()))
}

pub fn render_calculation(result: &CalculationResult, format: OutputFormat, digest: bool) -> Result<String> {
    let digest = if digest {
        Some(result.digest().context("failed to digest result")?.to_string())
    } else {
        None
    };
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(result)?;
            if let (Some(d), Some(obj)) = (digest, value.as_object_mut()) {
                obj.insert("digest".to_string(), serde_json::Value::String(d));
            }
            Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
        }
        OutputFormat::Text => Ok(render_text(result, digest.as_deref())?),
    }
}

fn render_text(result: &CalculationResult, digest: Option<&str>) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    if let Some(id) = &result.claim_id {
        writeln!(out, "Claim {id}")?;
    }
    writeln!(out, "Reference data {}", result.reference_version)?;
    writeln!(out)?;
    for line in result.lines() {
        writeln!(
            out,
            "{:<10} {:>14}  confidence {:>3}  {}",
            line.entitlement.label(),
            line.amount.to_string(),
            line.confidence.value(),
            line.source
        )?;
        for note in &line.notes {
            writeln!(out, "{:<10} note: {note}", "")?;
        }
    }
    writeln!(out, "{:<10} {:>14}", "Total", result.total.to_string())?;
    writeln!(out, "Overall confidence {}", result.confidence.overall.value())?;

    if let Some(payout) = &result.ppm_payout {
        writeln!(out)?;
        writeln!(out, "PPM payout")?;
        for (label, amount) in [
            ("Gross", payout.gross),
            ("Federal", payout.federal),
            ("State", payout.state),
            ("FICA", payout.fica),
            ("Medicare", payout.medicare),
            ("Net", payout.net),
        ] {
            writeln!(out, "  {label:<9} {:>14}", amount.to_string())?;
        }
        writeln!(out, "  Effective rate {}%", payout.effective_rate_percent)?;
    }

    writeln!(out)?;
    writeln!(out, "Data sources")?;
    for source in &result.data_sources {
        writeln!(out, "  - {source}")?;
    }
    if let Some(d) = digest {
        writeln!(out, "Digest {d}")?;
    }
    Ok(out)
}
