//! # pcs CLI entry point
//!
//! Parses command-line arguments, loads the optional configuration file and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pcs_cli::calculate::{run_calculate, CalculateArgs};
use pcs_cli::config::CliConfig;
use pcs_cli::payout::{run_payout, PayoutArgs};
use pcs_cli::rates::{run_rates, RatesArgs};
use pcs_cli::rules::{run_rules, RulesArgs};
use pcs_cli::template::{run_template, TemplateArgs};
use pcs_cli::validate::{run_validate, ValidateArgs};

/// PCS entitlement estimates and JTR compliance checks.
///
/// Calculates DLA, TLE, MALT, per diem and PPM entitlements for a PCS claim,
/// validates the claim against JTR rules, and nets PPM payouts after
/// withholding.
#[derive(Parser, Debug)]
#[command(name = "pcs", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate every entitlement line for a claim.
    Calculate(CalculateArgs),

    /// Validate a claim against the JTR rule registry.
    Validate(ValidateArgs),

    /// Net a gross PPM incentive after withholding.
    Payout(PayoutArgs),

    /// Dump and verify reference rate tables.
    Rates(RatesArgs),

    /// List the validation rules.
    Rules(RulesArgs),

    /// Print a blank claim draft with a fresh claim ID.
    Template(TemplateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("pcs CLI starting");

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    let result = match cli.command {
        Commands::Calculate(args) => run_calculate(&args, &config),
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Payout(args) => run_payout(&args),
        Commands::Rates(args) => run_rates(&args, &config),
        Commands::Rules(args) => run_rules(&args),
        Commands::Template(args) => run_template(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
