//! # Localities and Distance Estimation
//!
//! The locality table names every duty location the reference data knows
//! about, whether it is outside the continental US, and its coordinates.
//! Coordinates feed [`GreatCircleDistance`], the built-in
//! [`DistanceProvider`] used when a claim arrives without a mileage figure.

use std::fmt;

use serde::{Deserialize, Serialize};

use pcs_core::{BasisPoints, Claim, LocalityCode};

use crate::reference::ReferenceData;

/// Mean Earth radius in statute miles.
const EARTH_RADIUS_MILES: f64 = 3_958.8;

/// A duty location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locality {
    pub code: LocalityCode,
    pub name: String,
    /// State or country.
    pub region: String,
    #[serde(default)]
    pub oconus: bool,
    pub latitude: f64,
    pub longitude: f64,
}

/// Source of origin → destination mileage.
///
/// The built-in implementation is [`GreatCircleDistance`]; a hosting layer may
/// plug in a routing service behind the same trait. Retry and timeout policy
/// belong to that implementation, not to the engine.
pub trait DistanceProvider: Send + Sync + fmt::Debug {
    /// Estimated travel miles, or `None` if either locality is unknown.
    fn distance_miles(&self, origin: &LocalityCode, destination: &LocalityCode) -> Option<u32>;
}

/// Great-circle distance between locality coordinates, scaled by a road
/// circuity factor.
#[derive(Debug, Clone)]
pub struct GreatCircleDistance<'a> {
    reference: &'a ReferenceData,
    circuity: BasisPoints,
}

impl<'a> GreatCircleDistance<'a> {
    /// Typical road-to-straight-line ratio for US highway travel.
    pub const DEFAULT_CIRCUITY: BasisPoints = BasisPoints::new(11_700);

    pub fn new(reference: &'a ReferenceData) -> Self {
        Self {
            reference,
            circuity: Self::DEFAULT_CIRCUITY,
        }
    }

    pub fn with_circuity(mut self, circuity: BasisPoints) -> Self {
        self.circuity = circuity;
        self
    }
}

impl DistanceProvider for GreatCircleDistance<'_> {
    fn distance_miles(&self, origin: &LocalityCode, destination: &LocalityCode) -> Option<u32> {
        let a = self.reference.locality(origin)?;
        let b = self.reference.locality(destination)?;
        let straight = haversine_miles(a.latitude, a.longitude, b.latitude, b.longitude);
        let road = straight * f64::from(self.circuity.value()) / 10_000.0;
        Some(road.round().clamp(0.0, f64::from(u32::MAX)) as u32)
    }
}

/// Haversine distance in statute miles.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().min(1.0).asin()
}

/// Fill a missing claim distance from `provider`.
///
/// Stated distances are kept. If either locality is absent or unknown to the
/// provider, the claim is returned unchanged.
pub fn complete_distance(claim: Claim, provider: &dyn DistanceProvider) -> Claim {
    if claim.distance_miles.is_some() {
        return claim;
    }
    let estimate = match (&claim.origin_locality, &claim.destination_locality) {
        (Some(origin), Some(destination)) => provider.distance_miles(origin, destination),
        _ => None,
    };
    match estimate {
        Some(miles) => {
            tracing::debug!(miles, "estimated missing distance from locality coordinates");
            claim.with_estimated_distance(miles)
        }
        None => claim,
    }
}
