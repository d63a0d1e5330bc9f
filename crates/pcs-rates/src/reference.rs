//! # Reference Data
//!
//! [`ReferenceData`] is the immutable, versioned set of tables every resolver
//! call reads: rate records, localities and weight allowances. It is passed
//! explicitly to the calculator and validation engine; there is no global
//! instance.
//!
//! Two construction paths:
//!
//! - [`ReferenceData::standard`]: the built-in tables compiled into the crate.
//! - [`ReferenceData::load`]: a YAML or JSON [`ReferenceDocument`] on disk,
//!   validated before use. A malformed file fails at load time, never during
//!   a calculation.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pcs_core::{Claim, LocalityCode, Paygrade};

use crate::allowance::WeightAllowance;
use crate::error::ReferenceDataError;
use crate::locality::Locality;
use crate::rate::{PaygradeScope, RateKind, RateRecord};
use crate::standard;

/// Serialized form of a reference-data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceDocument {
    /// Free-form table version, e.g. `FY2025`.
    pub version: String,
    #[serde(default)]
    pub localities: Vec<Locality>,
    #[serde(default)]
    pub rates: Vec<RateRecord>,
    #[serde(default)]
    pub weight_allowances: Vec<WeightAllowance>,
}

/// Immutable reference tables.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    version: String,
    rates: Vec<RateRecord>,
    localities: BTreeMap<LocalityCode, Locality>,
    weight_allowances: Vec<WeightAllowance>,
}

impl ReferenceData {
    /// The built-in tables.
    pub fn standard() -> Self {
        Self::from_parts(standard::document())
    }

    /// Validate a document and build reference data from it.
    pub fn from_document(doc: ReferenceDocument) -> Result<Self, ReferenceDataError> {
        validate_document(&doc)?;
        tracing::info!(
            version = %doc.version,
            rates = doc.rates.len(),
            localities = doc.localities.len(),
            "reference data loaded"
        );
        Ok(Self::from_parts(doc))
    }

    /// Load from a `.json` file, or YAML for any other extension.
    pub fn load(path: &Path) -> Result<Self, ReferenceDataError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReferenceDataError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ReferenceDataError::Io(e)
            }
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let doc: ReferenceDocument = if is_json {
            serde_json::from_str(&content).map_err(|e| ReferenceDataError::JsonParse {
                path: path.to_path_buf(),
                source: e,
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| ReferenceDataError::YamlParse {
                path: path.to_path_buf(),
                source: e,
            })?
        };
        Self::from_document(doc)
    }

    /// Parse and validate an in-memory YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ReferenceDataError> {
        let doc: ReferenceDocument =
            serde_yaml::from_str(yaml).map_err(|e| ReferenceDataError::YamlParse {
                path: PathBuf::from("<inline>"),
                source: e,
            })?;
        Self::from_document(doc)
    }

    fn from_parts(doc: ReferenceDocument) -> Self {
        Self {
            version: doc.version,
            rates: doc.rates,
            localities: doc
                .localities
                .into_iter()
                .map(|l| (l.code.clone(), l))
                .collect(),
            weight_allowances: doc.weight_allowances,
        }
    }

    /// Back to the serializable document form.
    pub fn to_document(&self) -> ReferenceDocument {
        ReferenceDocument {
            version: self.version.clone(),
            localities: self.localities.values().cloned().collect(),
            rates: self.rates.clone(),
            weight_allowances: self.weight_allowances.clone(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rates(&self) -> &[RateRecord] {
        &self.rates
    }

    /// Records of one kind, in table order.
    pub fn rates_of(&self, kind: RateKind) -> impl Iterator<Item = &RateRecord> {
        self.rates.iter().filter(move |r| r.kind == kind)
    }

    pub fn localities(&self) -> impl Iterator<Item = &Locality> {
        self.localities.values()
    }

    pub fn locality(&self, code: &LocalityCode) -> Option<&Locality> {
        self.localities.get(code)
    }

    /// Whether the move crosses outside the continental US.
    ///
    /// An explicit flag on the claim wins; otherwise either end being an
    /// OCONUS locality makes the move OCONUS.
    pub fn move_is_oconus(&self, claim: &Claim) -> bool {
        if let Some(flag) = claim.oconus {
            return flag;
        }
        [&claim.origin_locality, &claim.destination_locality]
            .into_iter()
            .flatten()
            .filter_map(|code| self.locality(code))
            .any(|l| l.oconus)
    }

    /// Weight allowance in pounds, `None` for unmapped or missing grades.
    pub fn weight_allowance(&self, paygrade: &Paygrade, dependents: bool) -> Option<u32> {
        self.weight_allowances
            .iter()
            .find(|row| &row.paygrade == paygrade)
            .map(|row| row.for_dependents(dependents))
    }

    pub fn weight_allowances(&self) -> &[WeightAllowance] {
        &self.weight_allowances
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::standard()
    }
}

type RateKey = (RateKind, PaygradeScope, Option<bool>, Option<LocalityCode>, NaiveDate);

/// Load-time checks: parseable non-negative amounts, ordered date ranges, no
/// duplicate keys, localities only on locality-scoped kinds and only ones the
/// document defines.
pub fn validate_document(doc: &ReferenceDocument) -> Result<(), ReferenceDataError> {
    let mut codes: BTreeSet<&LocalityCode> = BTreeSet::new();
    for locality in &doc.localities {
        if !codes.insert(&locality.code) {
            return Err(ReferenceDataError::DuplicateLocality(locality.code.to_string()));
        }
    }

    let mut seen: HashMap<RateKey, usize> = HashMap::new();
    for (index, rate) in doc.rates.iter().enumerate() {
        let kind = rate.kind.as_str().to_string();
        match rate.scaled_amount() {
            Some(v) if v >= 0 => {}
            _ => {
                return Err(ReferenceDataError::InvalidAmount {
                    index,
                    kind,
                    amount: rate.amount.clone(),
                })
            }
        }
        if let Some(until) = rate.effective_until {
            if until < rate.effective_from {
                return Err(ReferenceDataError::InvalidDateRange {
                    index,
                    kind,
                    from: rate.effective_from.to_string(),
                    until: until.to_string(),
                });
            }
        }
        if let Some(code) = &rate.locality {
            if !rate.kind.is_locality_scoped() {
                return Err(ReferenceDataError::UnexpectedLocality { index, kind });
            }
            if !codes.contains(code) {
                return Err(ReferenceDataError::UnknownLocality {
                    index,
                    kind,
                    locality: code.to_string(),
                });
            }
        }
        let key = (
            rate.kind,
            rate.paygrade,
            rate.dependents,
            rate.locality.clone(),
            rate.effective_from,
        );
        if let Some(first) = seen.insert(key, index) {
            return Err(ReferenceDataError::DuplicateRate { index, first, kind });
        }
    }

    let mut grades: BTreeSet<&Paygrade> = BTreeSet::new();
    for row in &doc.weight_allowances {
        if !grades.insert(&row.paygrade) {
            return Err(ReferenceDataError::DuplicateAllowance(row.paygrade.code()));
        }
    }
    Ok(())
}
