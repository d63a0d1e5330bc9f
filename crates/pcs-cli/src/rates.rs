//! # Rates Subcommand
//!
//! Loads reference tables (which validates them) and prints them, optionally
//! filtered by entitlement or rate kind.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use pcs_rates::{RateKind, RateRecord, ReferenceData};

use crate::config::CliConfig;
use crate::OutputFormat;

/// Arguments for the `pcs rates` subcommand.
#[derive(Args, Debug)]
pub struct RatesArgs {
    /// Reference-table file overriding the configured one.
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Show only one entitlement (`dla`, `tle`, `malt`, `perDiem`, `ppm`) or
    /// one rate kind (`malt_first100`, ...).
    #[arg(long)]
    pub kind: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the rates subcommand.
pub fn run_rates(args: &RatesArgs, config: &CliConfig) -> Result<u8> {
    let reference = crate::load_reference(args.reference.as_deref(), config)?;
    let kinds = select_kinds(args.kind.as_deref())?;
    let records: Vec<&RateRecord> = reference
        .rates()
        .iter()
        .filter(|r| kinds.contains(&r.kind))
        .collect();
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => print!("{}", render_text(&reference, &records)?),
    }
    Ok(0)
}

/// Rate kinds matching a `--kind` filter; every kind when absent.
pub fn select_kinds(filter: Option<&str>) -> Result<Vec<RateKind>> {
    let Some(filter) = filter.map(str::trim) else {
        return Ok(RateKind::all().to_vec());
    };
    let kinds: Vec<RateKind> = RateKind::all()
        .iter()
        .copied()
        .filter(|k| {
            k.as_str().eq_ignore_ascii_case(filter) || k.entitlement().as_str().eq_ignore_ascii_case(filter)
        })
        .collect();
    if kinds.is_empty() {
        bail!(
            "unknown rate kind \"{filter}\"; expected an entitlement (dla, tle, malt, perDiem, ppm) or one of: {}",
            RateKind::all().iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
        );
    }
    Ok(kinds)
}

fn render_text(reference: &ReferenceData, records: &[&RateRecord]) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "Reference data {}: {} rates, {} localities, {} weight allowances (verified)",
        reference.version(),
        reference.rates().len(),
        reference.localities().count(),
        reference.weight_allowances().len()
    )?;
    writeln!(out)?;
    for r in records {
        let scope = String::from(r.paygrade);
        let dependents = match r.dependents {
            Some(true) => "with deps",
            Some(false) => "no deps",
            None => "",
        };
        let locality = r.locality.as_ref().map(|l| l.as_str()).unwrap_or("national");
        let until = r
            .effective_until
            .map(|d| d.to_string())
            .unwrap_or_else(|| "open".to_string());
        writeln!(
            out,
            "{:<16} {:<6} {:<9} {:<20} {:>10}  {} to {}  [{}]",
            r.kind.as_str(),
            scope,
            dependents,
            locality,
            r.amount,
            r.effective_from,
            until,
            r.citation
        )?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entitlement_filter_selects_all_its_kinds() {
        let kinds = select_kinds(Some("malt")).unwrap();
        assert_eq!(kinds.len(), 3);
        assert!(kinds.iter().all(|k| k.as_str().starts_with("malt")));
    }

    #[test]
    fn single_kind_filter() {
        assert_eq!(select_kinds(Some("dla_base")).unwrap(), vec![RateKind::DlaBase]);
        assert_eq!(select_kinds(Some("DLA")).unwrap(), vec![RateKind::DlaBase]);
    }

    #[test]
    fn no_filter_means_every_kind() {
        assert_eq!(select_kinds(None).unwrap().len(), RateKind::all().len());
    }

    #[test]
    fn unknown_kind_rejected() {
        assert!(select_kinds(Some("bah")).is_err());
    }

    #[test]
    fn text_table_has_header_and_rows() {
        let reference = ReferenceData::standard();
        let records: Vec<&RateRecord> = reference.rates_of(RateKind::DlaBase).collect();
        let text = render_text(&reference, &records).unwrap();
        assert!(text.starts_with("Reference data FY2025"));
        assert!(text.contains("E5-E6"));
    }
}
