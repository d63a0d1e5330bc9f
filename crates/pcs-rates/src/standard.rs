//! Built-in reference tables (FY2025, with FY2024 DLA history).
//!
//! Table order is significant only for display; resolution ranks records by
//! scope and effective date, not position.

use chrono::NaiveDate;

use pcs_core::{Confidence, LocalityCode, Paygrade, PaygradeBand};

use crate::allowance::WeightAllowance;
use crate::locality::Locality;
use crate::rate::{ConfidenceTier, PaygradeScope, RateKind, RateRecord};
use crate::reference::ReferenceDocument;

/// Version tag of the built-in tables.
pub const STANDARD_VERSION: &str = "FY2025";

/// OCONUS locality rates change monthly; the built-in snapshot is less certain.
const OCONUS_CONFIDENCE: u32 = 90;

// code, name, region, oconus, latitude, longitude
const LOCALITIES: &[(&str, &str, &str, bool, f64, f64)] = &[
    ("SAN_DIEGO_CA", "San Diego", "CA", false, 32.7157, -117.1611),
    ("NORFOLK_VA", "Norfolk", "VA", false, 36.8508, -76.2859),
    ("FORT_LIBERTY_NC", "Fort Liberty", "NC", false, 35.1390, -79.0060),
    ("JBLM_WA", "Joint Base Lewis-McChord", "WA", false, 47.1125, -122.5714),
    ("COLORADO_SPRINGS_CO", "Colorado Springs", "CO", false, 38.8339, -104.8214),
    ("SAN_ANTONIO_TX", "San Antonio", "TX", false, 29.4241, -98.4936),
    ("HONOLULU_HI", "Honolulu", "HI", true, 21.3069, -157.8583),
    ("RAMSTEIN_DE", "Ramstein Air Base", "Germany", true, 49.4369, 7.6003),
    ("OKINAWA_JP", "Okinawa", "Japan", true, 26.3344, 127.8056),
];

// band, FY2025 base, FY2024 base
const DLA_BASE: &[(PaygradeBand, &str, &str)] = &[
    (PaygradeBand::E1E4, "1200.00", "1150.00"),
    (PaygradeBand::E5E6, "1500.00", "1440.00"),
    (PaygradeBand::E7E9, "1900.00", "1820.00"),
    (PaygradeBand::O1O3, "2100.00", "2010.00"),
    (PaygradeBand::O4O6, "2600.00", "2490.00"),
    (PaygradeBand::O7Plus, "3000.00", "2870.00"),
];

// locality (None = national default), TLE nightly, per diem daily
const LOCALITY_RATES: &[(Option<&str>, &str, &str)] = &[
    (None, "110.00", "178.00"),
    (Some("SAN_DIEGO_CA"), "232.00", "256.00"),
    (Some("NORFOLK_VA"), "161.00", "187.00"),
    (Some("FORT_LIBERTY_NC"), "125.00", "166.00"),
    (Some("JBLM_WA"), "180.00", "225.00"),
    (Some("COLORADO_SPRINGS_CO"), "166.00", "207.00"),
    (Some("SAN_ANTONIO_TX"), "150.00", "197.00"),
    (Some("HONOLULU_HI"), "290.00", "351.00"),
    (Some("RAMSTEIN_DE"), "210.00", "248.00"),
    (Some("OKINAWA_JP"), "220.00", "262.00"),
];

const MALT_TIERS: &[(RateKind, &str)] = &[
    (RateKind::MaltFirst100, "0.22"),
    (RateKind::MaltNext300, "0.20"),
    (RateKind::MaltBeyond400, "0.18"),
];

const PPM_CARRIER: &[(RateKind, &str)] = &[
    (RateKind::PpmShortHaul, "0.090"),
    (RateKind::PpmMediumHaul, "0.060"),
    (RateKind::PpmLongHaul, "0.045"),
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn fy2025(kind: RateKind, amount: &str, citation: &str) -> RateRecord {
    RateRecord {
        kind,
        paygrade: PaygradeScope::All,
        dependents: None,
        locality: None,
        effective_from: date(2025, 1, 1),
        effective_until: None,
        amount: amount.to_string(),
        citation: citation.to_string(),
        confidence_tier: ConfidenceTier::Exact,
        confidence: Confidence::EXACT,
        last_verified: date(2025, 1, 15),
    }
}

fn localities() -> Vec<Locality> {
    LOCALITIES
        .iter()
        .filter_map(|&(code, name, region, oconus, latitude, longitude)| {
            Some(Locality {
                code: LocalityCode::new(code).ok()?,
                name: name.to_string(),
                region: region.to_string(),
                oconus,
                latitude,
                longitude,
            })
        })
        .collect()
}

fn rates() -> Vec<RateRecord> {
    let mut rates = Vec::new();

    for &(band, current, previous) in DLA_BASE {
        rates.push(RateRecord {
            paygrade: PaygradeScope::Band(band),
            ..fy2025(RateKind::DlaBase, current, "JTR 050501, DLA Table FY2025")
        });
        rates.push(RateRecord {
            paygrade: PaygradeScope::Band(band),
            effective_from: date(2024, 1, 1),
            effective_until: Some(date(2024, 12, 31)),
            last_verified: date(2024, 1, 12),
            ..fy2025(RateKind::DlaBase, previous, "JTR 050501, DLA Table FY2024")
        });
    }

    let oconus: Vec<&str> = LOCALITIES
        .iter()
        .filter(|l| l.3)
        .map(|l| l.0)
        .collect();
    for &(locality, tle, per_diem) in LOCALITY_RATES {
        let confidence = match locality {
            Some(code) if oconus.contains(&code) => Confidence::saturating(OCONUS_CONFIDENCE),
            _ => Confidence::EXACT,
        };
        let locality = locality.and_then(|code| LocalityCode::new(code).ok());
        rates.push(RateRecord {
            locality: locality.clone(),
            confidence,
            ..fy2025(RateKind::TleDaily, tle, "JTR 054205, TLE lodging ceiling FY2025")
        });
        rates.push(RateRecord {
            locality,
            confidence,
            ..fy2025(RateKind::PerDiemDaily, per_diem, "GSA/DTMO per diem rates FY2025")
        });
    }

    for &(kind, amount) in MALT_TIERS {
        rates.push(fy2025(kind, amount, "JTR 020304, MALT rates CY2025"));
    }
    for &(kind, amount) in PPM_CARRIER {
        rates.push(fy2025(kind, amount, "JTR 051402, PPM government constructed cost FY2025"));
    }
    rates
}

fn weight_allowances() -> Vec<WeightAllowance> {
    use Paygrade::{Enlisted as E, Officer as O, Warrant as W};
    vec![
        WeightAllowance::new(E(1), 5_000, 8_000),
        WeightAllowance::new(E(2), 5_000, 8_000),
        WeightAllowance::new(E(3), 5_000, 8_000),
        WeightAllowance::new(E(4), 7_000, 8_000),
        WeightAllowance::new(E(5), 7_000, 9_000),
        WeightAllowance::new(E(6), 8_000, 11_000),
        WeightAllowance::new(E(7), 11_000, 13_000),
        WeightAllowance::new(E(8), 12_000, 14_000),
        WeightAllowance::new(E(9), 13_000, 15_000),
        WeightAllowance::new(W(1), 10_000, 12_000),
        WeightAllowance::new(W(2), 12_500, 13_500),
        WeightAllowance::new(W(3), 13_000, 14_500),
        WeightAllowance::new(W(4), 14_000, 17_000),
        WeightAllowance::new(W(5), 16_000, 17_500),
        WeightAllowance::new(O(1), 10_000, 12_000),
        WeightAllowance::new(O(2), 12_500, 13_500),
        WeightAllowance::new(O(3), 13_000, 14_500),
        WeightAllowance::new(O(4), 14_000, 17_000),
        WeightAllowance::new(O(5), 16_000, 17_500),
        WeightAllowance::new(O(6), 18_000, 18_000),
        WeightAllowance::new(O(7), 18_000, 18_000),
        WeightAllowance::new(O(8), 18_000, 18_000),
        WeightAllowance::new(O(9), 18_000, 18_000),
        WeightAllowance::new(O(10), 18_000, 18_000),
    ]
}

/// The built-in reference document.
pub fn document() -> ReferenceDocument {
    ReferenceDocument {
        version: STANDARD_VERSION.to_string(),
        localities: localities(),
        rates: rates(),
        weight_allowances: weight_allowances(),
    }
}
