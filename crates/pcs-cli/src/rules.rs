//! # Rules Subcommand
//!
//! Lists the standard validation registry.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use pcs_validation::{RuleCode, RuleRegistry};

use crate::OutputFormat;

/// Arguments for the `pcs rules` subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct RuleListing {
    pub code: RuleCode,
    pub field: &'static str,
    pub citation: Option<&'static str>,
    pub description: &'static str,
}

pub fn list_rules(registry: &RuleRegistry) -> Vec<RuleListing> {
    registry
        .codes()
        .into_iter()
        .map(|code| RuleListing {
            code,
            field: code.field(),
            citation: code.citation(),
            description: code.description(),
        })
        .collect()
}

/// Execute the rules subcommand.
pub fn run_rules(args: &RulesArgs) -> Result<u8> {
    let listing = list_rules(&RuleRegistry::standard());
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for rule in &listing {
                writeln!(
                    out,
                    "{:<28} {:<26} {:<16} {}",
                    rule.code.as_str(),
                    rule.field,
                    rule.citation.unwrap_or("-"),
                    rule.description
                )?;
            }
            print!("{out}");
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_follows_registry_order() {
        let listing = list_rules(&RuleRegistry::standard());
        assert_eq!(listing.len(), RuleCode::all().len());
        assert_eq!(listing[0].code, RuleCode::ClaimNameRequired);
        assert_eq!(listing[6].citation, Some("JTR 054205"));
    }
}
