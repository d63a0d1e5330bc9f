//! Reference-data load and validation errors.
//!
//! These are the only failures the rate layer produces. Resolution itself
//! never fails; it degrades confidence instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading or validating a reference-data document.
#[derive(Error, Debug)]
pub enum ReferenceDataError {
    #[error("reference file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate #{index} ({kind}): invalid amount \"{amount}\" (expected a non-negative decimal)")]
    InvalidAmount {
        index: usize,
        kind: String,
        amount: String,
    },

    #[error("rate #{index} ({kind}): effective_until {until} is before effective_from {from}")]
    InvalidDateRange {
        index: usize,
        kind: String,
        from: String,
        until: String,
    },

    #[error("rate #{index} ({kind}) duplicates rate #{first} (same scope, locality and effective_from)")]
    DuplicateRate {
        index: usize,
        first: usize,
        kind: String,
    },

    #[error("rate #{index} ({kind}) references unknown locality {locality}")]
    UnknownLocality {
        index: usize,
        kind: String,
        locality: String,
    },

    #[error("rate #{index} ({kind}) is locality-scoped data on a kind that is not keyed by locality")]
    UnexpectedLocality { index: usize, kind: String },

    #[error("locality {0} is defined more than once")]
    DuplicateLocality(String),

    #[error("weight allowance for {0} is defined more than once")]
    DuplicateAllowance(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
