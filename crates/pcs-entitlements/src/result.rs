//! Calculation output types.
//!
//! Results carry no timestamps. The same claim against the same reference
//! data always serializes to the same bytes, and [`CalculationResult::digest`]
//! fingerprints it for audit trails.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pcs_core::{
    sha256_digest, CanonicalBytes, CanonicalizationError, Cents, ClaimId, Confidence, ContentDigest,
    EntitlementType,
};
use pcs_rates::RateRecord;

use crate::payout::PpmNetPayout;

/// One reimbursement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementLineResult {
    #[serde(rename = "type")]
    pub entitlement: EntitlementType,
    /// Integer cents.
    pub amount: Cents,
    pub confidence: Confidence,
    pub source: String,
    /// Oldest verification date among the rates used.
    pub last_verified: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl EntitlementLineResult {
    /// A line priced from resolved rate records.
    ///
    /// Confidence is the minimum across the records; the source lists each
    /// distinct citation once.
    pub fn from_records(entitlement: EntitlementType, amount: Cents, records: &[RateRecord]) -> Self {
        let confidence = records
            .iter()
            .map(|r| r.confidence)
            .reduce(Confidence::min)
            .unwrap_or(Confidence::EXACT);
        let mut citations: Vec<&str> = Vec::new();
        for record in records {
            if !citations.contains(&record.citation.as_str()) {
                citations.push(&record.citation);
            }
        }
        Self {
            entitlement,
            amount,
            confidence,
            source: citations.join("; "),
            last_verified: records.iter().map(|r| r.last_verified).min(),
            notes: Vec::new(),
        }
    }

    /// A line that needs no rate lookup (nothing claimed, or not applicable).
    pub fn not_applicable(entitlement: EntitlementType, reason: &str) -> Self {
        Self {
            entitlement,
            amount: Cents::ZERO,
            confidence: Confidence::EXACT,
            source: reason.to_string(),
            last_verified: None,
            notes: Vec::new(),
        }
    }

    /// A zero line that cannot be priced because an input is missing.
    pub fn unpriced(entitlement: EntitlementType, reason: &str) -> Self {
        Self {
            confidence: Confidence::NONE,
            ..Self::not_applicable(entitlement, reason)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Lower the confidence to at most `cap`.
    pub fn capped(mut self, cap: Confidence) -> Self {
        self.confidence = self.confidence.min(cap);
        self
    }
}

/// Overall and per-line confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceSummary {
    pub overall: Confidence,
    pub by_line: BTreeMap<EntitlementType, Confidence>,
}

/// The full entitlement estimate for a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<ClaimId>,
    pub reference_version: String,
    pub dla: EntitlementLineResult,
    pub tle: EntitlementLineResult,
    pub malt: EntitlementLineResult,
    pub per_diem: EntitlementLineResult,
    pub ppm: EntitlementLineResult,
    pub total: Cents,
    pub confidence: ConfidenceSummary,
    pub data_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ppm_payout: Option<PpmNetPayout>,
}

impl CalculationResult {
    /// The line for an entitlement type.
    pub fn line(&self, entitlement: EntitlementType) -> &EntitlementLineResult {
        match entitlement {
            EntitlementType::Dla => &self.dla,
            EntitlementType::Tle => &self.tle,
            EntitlementType::Malt => &self.malt,
            EntitlementType::PerDiem => &self.per_diem,
            EntitlementType::Ppm => &self.ppm,
        }
    }

    /// All lines in report order.
    pub fn lines(&self) -> impl Iterator<Item = &EntitlementLineResult> {
        EntitlementType::all().iter().map(|t| self.line(*t))
    }

    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }

    /// SHA-256 over the canonical serialization.
    pub fn digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&self.canonical_bytes()?))
    }
}
