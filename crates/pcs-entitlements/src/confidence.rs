//! # Confidence Aggregation
//!
//! Folds per-line confidence into one overall figure and compiles the list of
//! data sources behind an estimate. The policy is the minimum: an estimate is
//! only as trustworthy as its weakest line.

use std::collections::BTreeMap;

use pcs_core::{Confidence, EntitlementType};
use pcs_rates::RateRecord;

use crate::result::{ConfidenceSummary, EntitlementLineResult};

/// Minimum-policy aggregation over lines. No lines → overall 0.
pub fn aggregate<'a>(lines: impl IntoIterator<Item = &'a EntitlementLineResult>) -> ConfidenceSummary {
    let by_line: BTreeMap<EntitlementType, Confidence> = lines
        .into_iter()
        .map(|line| (line.entitlement, line.confidence))
        .collect();
    let overall = by_line
        .values()
        .copied()
        .reduce(Confidence::min)
        .unwrap_or(Confidence::NONE);
    ConfidenceSummary { overall, by_line }
}

/// Source labels for `records`, deduplicated, in first-seen order.
pub fn compile_data_sources<'a>(records: impl IntoIterator<Item = &'a RateRecord>) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for record in records {
        let label = record.source_label();
        if !sources.contains(&label) {
            sources.push(label);
        }
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcs_rates::{RateKind, ReferenceData};

    fn line(t: EntitlementType, c: u32) -> EntitlementLineResult {
        EntitlementLineResult {
            confidence: Confidence::saturating(c),
            ..EntitlementLineResult::not_applicable(t, "test")
        }
    }

    #[test]
    fn overall_is_minimum() {
        let lines = [
            line(EntitlementType::Dla, 100),
            line(EntitlementType::Tle, 60),
            line(EntitlementType::Malt, 80),
        ];
        let summary = aggregate(&lines);
        assert_eq!(summary.overall.value(), 60);
        assert_eq!(summary.by_line.len(), 3);
        assert_eq!(summary.by_line[&EntitlementType::Malt].value(), 80);
    }

    #[test]
    fn empty_is_zero() {
        let summary = aggregate(std::iter::empty::<&EntitlementLineResult>());
        assert_eq!(summary.overall, Confidence::NONE);
        assert!(summary.by_line.is_empty());
    }

    #[test]
    fn sources_dedup_first_seen() {
        let reference = ReferenceData::standard();
        let malt: Vec<&RateRecord> = reference
            .rates()
            .iter()
            .filter(|r| r.kind.entitlement() == EntitlementType::Malt)
            .collect();
        let dla = reference.rates_of(RateKind::DlaBase).next().unwrap();
        let sources = compile_data_sources(malt.iter().copied().chain([dla]).chain(malt.iter().copied()));
        assert_eq!(sources.len(), 2);
        assert!(sources[0].starts_with("JTR 020304"));
        assert!(sources[1].starts_with("JTR 050501"));
    }
}
