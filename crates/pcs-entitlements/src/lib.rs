//! # pcs-entitlements: Entitlement Calculator
//!
//! Prices the five PCS reimbursement lines for a normalized [`Claim`]:
//!
//! - **DLA**: Dislocation Allowance by paygrade band, dependents and OCONUS
//!   multipliers.
//! - **TLE**: Temporary Lodging Expense, capped nights at each end.
//! - **MALT**: mileage in three marginal tiers.
//! - **Per Diem**: destination locality rate for travel days.
//! - **PPM**: Personally Procured Move incentive, gross, with an optional
//!   [`PpmNetPayout`] after withholding.
//!
//! Every line carries the confidence of the rates behind it; the overall
//! figure is the minimum across lines.
//!
//! [`Claim`]: pcs_core::Claim

pub mod calculator;
pub mod confidence;
pub mod config;
pub mod lines;
pub mod payout;
pub mod result;

pub use calculator::{check_preconditions, EntitlementCalculator};
pub use confidence::{aggregate, compile_data_sources};
pub use config::{CalculatorConfig, ConfigError, DlaStacking, MAX_TLE_NIGHTS};
pub use lines::{line_calculator, LineCalculator, LineContext, LineOutcome};
pub use payout::{calculate_net_payout, PayoutError, PpmNetPayout, WithholdingProfile, WithholdingRates};
pub use result::{CalculationResult, ConfidenceSummary, EntitlementLineResult};
