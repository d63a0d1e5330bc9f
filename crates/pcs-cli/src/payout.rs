//! # Payout Subcommand
//!
//! Standalone PPM gross-to-net calculation.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::Args;

use pcs_core::{parse_amount, Cents};
use pcs_entitlements::{calculate_net_payout, PpmNetPayout, WithholdingProfile};

use crate::OutputFormat;

/// Arguments for the `pcs payout` subcommand.
#[derive(Args, Debug)]
pub struct PayoutArgs {
    /// Gross PPM incentive in dollars, e.g. 1200.00 or $1,200.
    #[arg(long)]
    pub gross: String,

    /// Federal withholding percent.
    #[arg(long, default_value = "22")]
    pub federal: String,

    /// State withholding percent.
    #[arg(long, default_value = "0")]
    pub state: String,

    /// FICA percent.
    #[arg(long, default_value = "6.2")]
    pub fica: String,

    /// Medicare percent.
    #[arg(long, default_value = "1.45")]
    pub medicare: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Execute the payout subcommand.
pub fn run_payout(args: &PayoutArgs) -> Result<u8> {
    let payout = compute_payout(args)?;
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&payout)?),
        OutputFormat::Text => print!("{}", render_text(&payout)?),
    }
    Ok(0)
}

pub fn compute_payout(args: &PayoutArgs) -> Result<PpmNetPayout> {
    let gross = parse_gross(&args.gross)?;
    let profile = WithholdingProfile {
        federal_percent: args.federal.clone(),
        state_percent: args.state.clone(),
        fica_percent: args.fica.clone(),
        medicare_percent: args.medicare.clone(),
    };
    let rates = profile.rates().context("invalid withholding rates")?;
    Ok(calculate_net_payout(gross, &rates)?)
}

fn parse_gross(raw: &str) -> Result<Cents> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
    parse_amount(&cleaned).with_context(|| format!("invalid gross amount \"{raw}\""))
}

fn render_text(payout: &PpmNetPayout) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for (label, amount) in [
        ("Gross", payout.gross),
        ("Federal", payout.federal),
        ("State", payout.state),
        ("FICA", payout.fica),
        ("Medicare", payout.medicare),
        ("Withheld", payout.total_withheld),
        ("Net", payout.net),
    ] {
        writeln!(out, "{label:<9} {:>14}", amount.to_string())?;
    }
    writeln!(out, "Effective rate {}%", payout.effective_rate_percent)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(gross: &str, federal: &str, state: &str) -> PayoutArgs {
        PayoutArgs {
            gross: gross.into(),
            federal: federal.into(),
            state: state.into(),
            fica: "6.2".into(),
            medicare: "1.45".into(),
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn twelve_hundred_at_fifteen_and_five() {
        let payout = compute_payout(&args("1200.00", "15", "5")).unwrap();
        assert_eq!(payout.net, Cents::new(86_820));
        assert!(render_text(&payout).unwrap().contains("$868.20"));
    }

    #[test]
    fn dollar_sign_and_commas_accepted() {
        let payout = compute_payout(&args("$1,200", "15", "5")).unwrap();
        assert_eq!(payout.gross, Cents::new(120_000));
    }

    #[test]
    fn garbage_gross_rejected() {
        assert!(compute_payout(&args("twelve", "15", "5")).is_err());
    }

    #[test]
    fn combined_over_hundred_rejected() {
        let err = compute_payout(&args("1200", "90", "5")).unwrap_err();
        assert!(format!("{err:#}").contains("exceeds 100%"));
    }
}
