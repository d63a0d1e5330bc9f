//! # Rate Resolution
//!
//! [`resolve`] turns a [`RateQuery`] into a [`RateRecord`] and never fails.
//! When the tables cannot answer exactly, the answer degrades and the record
//! says so through its tier and confidence:
//!
//! | Situation | Tier | Confidence cap |
//! |---|---|---|
//! | Record effective on the as-of date | as stored | as stored |
//! | Matching records, none effective on the date | interpolated | 80 |
//! | Locality missing/unknown (TLE, per diem) | fallback | 60 |
//! | Paygrade unmapped (lowest band used) | fallback | 0 |
//! | No record of the kind at all (statutory floor) | fallback | 0 |
//!
//! Degradations compose: an interpolated national default is capped at 60.
//! Every degradation is logged at `warn`.

use chrono::NaiveDate;

use pcs_core::{Confidence, LocalityCode, Paygrade, PaygradeBand};

use crate::rate::{ConfidenceTier, PaygradeScope, RateKind, RateRecord};
use crate::reference::ReferenceData;

/// Citation attached to statutory-floor placeholders.
pub const STATUTORY_FLOOR_CITATION: &str = "Statutory floor (no reference record)";

/// One rate lookup.
#[derive(Debug, Clone, Copy)]
pub struct RateQuery<'a> {
    pub kind: RateKind,
    pub paygrade: &'a Paygrade,
    pub dependents: bool,
    pub locality: Option<&'a LocalityCode>,
    pub as_of: NaiveDate,
}

impl<'a> RateQuery<'a> {
    pub fn new(kind: RateKind, paygrade: &'a Paygrade, as_of: NaiveDate) -> Self {
        Self {
            kind,
            paygrade,
            dependents: false,
            locality: None,
            as_of,
        }
    }

    pub fn with_dependents(mut self, dependents: bool) -> Self {
        self.dependents = dependents;
        self
    }

    pub fn at(mut self, locality: Option<&'a LocalityCode>) -> Self {
        self.locality = locality;
        self
    }
}

/// Resolve a rate. See the module docs for the degradation ladder.
pub fn resolve(reference: &ReferenceData, query: &RateQuery<'_>) -> RateRecord {
    let kind = query.kind;
    let (band, unmapped) = match query.paygrade.band() {
        Some(band) => (band, false),
        None => (PaygradeBand::lowest(), true),
    };

    let matches_scope = |r: &RateRecord| {
        r.paygrade.covers(band) && r.dependents.map_or(true, |d| d == query.dependents)
    };

    let mut national_fallback = false;
    let mut candidates: Vec<&RateRecord> = Vec::new();
    if kind.is_locality_scoped() {
        if let Some(code) = query.locality {
            candidates = reference
                .rates_of(kind)
                .filter(|r| r.locality.as_ref() == Some(code) && matches_scope(r))
                .collect();
        }
        if candidates.is_empty() {
            national_fallback = true;
        }
    }
    if candidates.is_empty() {
        candidates = reference
            .rates_of(kind)
            .filter(|r| r.locality.is_none() && matches_scope(r))
            .collect();
    }

    let mut record = match select(&candidates, query.as_of) {
        Some((record, true)) => {
            tracing::debug!(%kind, citation = %record.citation, "rate resolved exactly");
            record.clone()
        }
        Some((record, false)) => {
            tracing::warn!(
                %kind,
                as_of = %query.as_of,
                effective_from = %record.effective_from,
                "no rate effective on as-of date; using nearest record"
            );
            record
                .clone()
                .degrade(ConfidenceTier::Interpolated, Confidence::INTERPOLATED)
        }
        None => {
            tracing::warn!(%kind, "no reference record for rate kind; using statutory floor");
            return statutory_floor(kind, query.as_of);
        }
    };

    if national_fallback {
        tracing::warn!(
            %kind,
            locality = query.locality.map(LocalityCode::as_str).unwrap_or("<none>"),
            "locality missing or unknown; using national default rate"
        );
        record = record.degrade(ConfidenceTier::Fallback, Confidence::NATIONAL_DEFAULT);
    }
    if unmapped {
        tracing::warn!(
            %kind,
            paygrade = %query.paygrade,
            "paygrade not recognised; using lowest-band rate"
        );
        record = record.degrade(ConfidenceTier::Fallback, Confidence::NONE);
    }
    record
}

/// Pick the best candidate for `as_of`. The flag is `true` when the record is
/// effective on that date.
fn select<'r>(candidates: &[&'r RateRecord], as_of: NaiveDate) -> Option<(&'r RateRecord, bool)> {
    let effective = candidates
        .iter()
        .filter(|r| r.covers(as_of))
        .max_by_key(|r| (r.specificity(), r.effective_from));
    if let Some(record) = effective {
        return Some((*record, true));
    }

    // Latest record that ended before the date, else the earliest that
    // starts after it.
    let prior = candidates
        .iter()
        .filter(|r| r.effective_from <= as_of)
        .max_by_key(|r| (r.effective_until, r.specificity(), r.effective_from));
    let nearest = prior.or_else(|| {
        candidates
            .iter()
            .filter(|r| r.effective_from > as_of)
            .min_by_key(|r| (r.effective_from, std::cmp::Reverse(r.specificity())))
    });
    nearest.map(|record| (*record, false))
}

fn statutory_floor(kind: RateKind, as_of: NaiveDate) -> RateRecord {
    RateRecord {
        kind,
        paygrade: PaygradeScope::All,
        dependents: None,
        locality: None,
        effective_from: as_of,
        effective_until: None,
        amount: kind.statutory_floor().to_string(),
        citation: STATUTORY_FLOOR_CITATION.to_string(),
        confidence_tier: ConfidenceTier::Fallback,
        confidence: Confidence::NONE,
        last_verified: as_of,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceDocument;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn code(s: &str) -> LocalityCode {
        LocalityCode::new(s).unwrap()
    }

    #[test]
    fn exact_dla_match() {
        let reference = ReferenceData::standard();
        let grade = Paygrade::Enlisted(5);
        let r = resolve(&reference, &RateQuery::new(RateKind::DlaBase, &grade, date(2025, 6, 1)));
        assert_eq!(r.amount, "1500.00");
        assert_eq!(r.confidence_tier, ConfidenceTier::Exact);
        assert_eq!(r.confidence, Confidence::EXACT);
    }

    #[test]
    fn date_escalator_selects_prior_year() {
        let reference = ReferenceData::standard();
        let grade = Paygrade::Enlisted(5);
        let r = resolve(&reference, &RateQuery::new(RateKind::DlaBase, &grade, date(2024, 7, 1)));
        assert_eq!(r.amount, "1440.00");
        assert_eq!(r.confidence_tier, ConfidenceTier::Exact);
    }

    #[test]
    fn before_any_record_interpolates_forward() {
        let reference = ReferenceData::standard();
        let grade = Paygrade::Officer(3);
        let r = resolve(&reference, &RateQuery::new(RateKind::MaltFirst100, &grade, date(2023, 3, 1)));
        assert_eq!(r.amount, "0.22");
        assert_eq!(r.confidence_tier, ConfidenceTier::Interpolated);
        assert_eq!(r.confidence, Confidence::INTERPOLATED);
    }

    #[test]
    fn after_closed_range_interpolates_backward() {
        let mut doc = ReferenceData::standard().to_document();
        doc.rates
            .retain(|r| !(r.kind == RateKind::DlaBase && r.effective_until.is_none()));
        let reference = ReferenceData::from_document(doc).unwrap();
        let grade = Paygrade::Enlisted(5);
        let r = resolve(&reference, &RateQuery::new(RateKind::DlaBase, &grade, date(2025, 6, 1)));
        assert_eq!(r.amount, "1440.00");
        assert_eq!(r.confidence_tier, ConfidenceTier::Interpolated);
    }

    #[test]
    fn locality_specific_tle() {
        let reference = ReferenceData::standard();
        let grade = Paygrade::Enlisted(5);
        let sd = code("SAN_DIEGO_CA");
        let q = RateQuery::new(RateKind::TleDaily, &grade, date(2025, 6, 1)).at(Some(&sd));
        let r = resolve(&reference, &q);
        assert_eq!(r.amount, "232.00");
        assert_eq!(r.confidence, Confidence::EXACT);
    }

    #[test]
    fn unknown_locality_falls_back_to_national() {
        let reference = ReferenceData::standard();
        let grade = Paygrade::Enlisted(5);
        let nowhere = code("ATLANTIS");
        let q = RateQuery::new(RateKind::PerDiemDaily, &grade, date(2025, 6, 1)).at(Some(&nowhere));
        let r = resolve(&reference, &q);
        assert_eq!(r.amount, "178.00");
        assert_eq!(r.confidence_tier, ConfidenceTier::Fallback);
        assert_eq!(r.confidence, Confidence::NATIONAL_DEFAULT);

        let q = RateQuery::new(RateKind::PerDiemDaily, &grade, date(2025, 6, 1));
        assert_eq!(resolve(&reference, &q).confidence, Confidence::NATIONAL_DEFAULT);
    }

    #[test]
    fn unmapped_paygrade_uses_lowest_band_at_zero() {
        let reference = ReferenceData::standard();
        let grade = Paygrade::Unmapped("GS-12".into());
        let r = resolve(&reference, &RateQuery::new(RateKind::DlaBase, &grade, date(2025, 6, 1)));
        assert_eq!(r.amount, "1200.00");
        assert_eq!(r.confidence_tier, ConfidenceTier::Fallback);
        assert_eq!(r.confidence, Confidence::NONE);
    }

    #[test]
    fn empty_tables_use_statutory_floor() {
        let reference = ReferenceData::from_document(ReferenceDocument {
            version: "EMPTY".into(),
            localities: Vec::new(),
            rates: Vec::new(),
            weight_allowances: Vec::new(),
        })
        .unwrap();
        let grade = Paygrade::Enlisted(5);
        for kind in RateKind::all() {
            let r = resolve(&reference, &RateQuery::new(*kind, &grade, date(2025, 6, 1)));
            assert_eq!(r.amount, kind.statutory_floor());
            assert_eq!(r.confidence, Confidence::NONE);
            assert_eq!(r.citation, STATUTORY_FLOOR_CITATION);
        }
    }

    #[test]
    fn band_scoped_beats_all_scoped() {
        let mut doc = ReferenceData::standard().to_document();
        let mut generic = doc
            .rates
            .iter()
            .find(|r| r.kind == RateKind::DlaBase && r.effective_until.is_none())
            .unwrap()
            .clone();
        generic.paygrade = PaygradeScope::All;
        generic.amount = "999.00".into();
        doc.rates.push(generic);
        let reference = ReferenceData::from_document(doc).unwrap();
        let grade = Paygrade::Enlisted(7);
        let r = resolve(&reference, &RateQuery::new(RateKind::DlaBase, &grade, date(2025, 6, 1)));
        assert_eq!(r.amount, "1900.00");
    }

    #[test]
    fn dependency_specific_record_wins_when_flag_matches() {
        let mut doc = ReferenceData::standard().to_document();
        let mut with_deps = doc
            .rates
            .iter()
            .find(|r| r.kind == RateKind::TleDaily && r.locality.is_none())
            .unwrap()
            .clone();
        with_deps.dependents = Some(true);
        with_deps.amount = "140.00".into();
        doc.rates.push(with_deps);
        let reference = ReferenceData::from_document(doc).unwrap();
        let grade = Paygrade::Enlisted(5);
        let q = RateQuery::new(RateKind::TleDaily, &grade, date(2025, 6, 1));
        assert_eq!(resolve(&reference, &q.with_dependents(true)).amount, "140.00");
        assert_eq!(resolve(&reference, &q.with_dependents(false)).amount, "110.00");
    }

    #[test]
    fn oconus_rates_carry_stored_confidence() {
        let reference = ReferenceData::standard();
        let grade = Paygrade::Officer(4);
        let okinawa = code("OKINAWA_JP");
        let q = RateQuery::new(RateKind::TleDaily, &grade, date(2025, 6, 1)).at(Some(&okinawa));
        let r = resolve(&reference, &q);
        assert_eq!(r.confidence_tier, ConfidenceTier::Exact);
        assert_eq!(r.confidence.value(), 90);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn resolution_always_yields_a_parseable_amount(
                grade in "[EOWX]-?[0-9]{1,2}",
                days in 0i64..2_000,
                kind_idx in 0usize..9,
            ) {
                let reference = ReferenceData::standard();
                let paygrade = Paygrade::parse(&grade);
                let kind = RateKind::all()[kind_idx];
                let as_of = date(2022, 1, 1) + chrono::Duration::days(days);
                let r = resolve(&reference, &RateQuery::new(kind, &paygrade, as_of));
                prop_assert_eq!(r.kind, kind);
                prop_assert!(r.scaled_amount().is_some_and(|v| v >= 0));
                if !paygrade.is_mapped() {
                    prop_assert_eq!(r.confidence, Confidence::NONE);
                }
            }
        }
    }
}
