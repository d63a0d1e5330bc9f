//! # pcs-rates: Rate Resolver
//!
//! Versioned reference tables and the fail-soft lookup over them.
//!
//! ## Architecture
//!
//! - [`ReferenceData`]: immutable tables: [`RateRecord`]s, [`Locality`]
//!   rows and [`WeightAllowance`]s. Built-in ([`ReferenceData::standard`]) or
//!   loaded and validated from YAML/JSON ([`ReferenceData::load`]).
//! - [`resolve`]: answers a [`RateQuery`] with a record, degrading tier and
//!   confidence instead of failing when the tables fall short.
//! - [`DistanceProvider`]: seam for origin → destination mileage, with a
//!   great-circle implementation over the locality coordinates.
//!
//! `ReferenceData` is `Send + Sync`; share one instance across threads.

pub mod allowance;
pub mod error;
pub mod locality;
pub mod rate;
pub mod reference;
pub mod resolver;
pub mod standard;

pub use allowance::WeightAllowance;
pub use error::ReferenceDataError;
pub use locality::{complete_distance, haversine_miles, DistanceProvider, GreatCircleDistance, Locality};
pub use rate::{ConfidenceTier, PaygradeScope, RateKind, RateRecord};
pub use reference::{validate_document, ReferenceData, ReferenceDocument};
pub use resolver::{resolve, RateQuery, STATUTORY_FLOOR_CITATION};
pub use standard::STANDARD_VERSION;
