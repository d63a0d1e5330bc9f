//! # pcs-core: Foundational Types for the PCS Entitlement Engine
//!
//! Domain primitives shared by every `pcs-*` crate. Depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Integer cents.** Every amount is a [`Cents`]; rates are parsed from
//!    decimal strings at a fixed scale. No dollar figure passes through `f64`.
//!
//! 2. **Newtypes for identifiers.** [`LocalityCode`] and [`ClaimId`] validate
//!    and normalize at construction.
//!
//! 3. **Exhaustive enums.** [`EntitlementType`] and [`PaygradeBand`] are
//!    matched exhaustively, so adding a line or band forces every consumer
//!    to handle it.
//!
//! 4. **Draft vs. snapshot.** Loosely typed [`ClaimDraft`] input is normalized
//!    once into an immutable [`Claim`]; nothing downstream re-parses strings.
//!
//! 5. **Canonical digests.** [`sha256_digest`] accepts only [`CanonicalBytes`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pcs-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod claim;
pub mod digest;
pub mod entitlement;
pub mod error;
pub mod identity;
pub mod money;
pub mod paygrade;

pub use canonical::CanonicalBytes;
pub use claim::{
    parse_claim_date, parse_claim_datetime, Claim, ClaimDraft, Dependents, DependentsInput,
    DistanceSource, LodgingNights, LooseNumber, TravelMethod, TripClassification, Weight,
};
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use entitlement::{Confidence, EntitlementType, ENTITLEMENT_TYPE_COUNT};
pub use error::{CanonicalizationError, FieldError, InputError, PcsError, ValidationError};
pub use identity::{ClaimId, LocalityCode};
pub use money::{format_amount, mul_div_round, parse_amount, parse_scaled, BasisPoints, Cents};
pub use paygrade::{Paygrade, PaygradeBand};
