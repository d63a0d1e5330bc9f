//! Household goods weight allowances by paygrade.

use serde::{Deserialize, Serialize};

use pcs_core::Paygrade;

/// One row of the weight-allowance table (JTR Table 5-37 layout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightAllowance {
    pub paygrade: Paygrade,
    pub without_dependents_lbs: u32,
    pub with_dependents_lbs: u32,
}

impl WeightAllowance {
    pub fn new(paygrade: Paygrade, without_dependents_lbs: u32, with_dependents_lbs: u32) -> Self {
        Self {
            paygrade,
            without_dependents_lbs,
            with_dependents_lbs,
        }
    }

    /// The allowance for a member with or without dependents.
    pub fn for_dependents(&self, dependents: bool) -> u32 {
        if dependents {
            self.with_dependents_lbs
        } else {
            self.without_dependents_lbs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowance_picks_column() {
        let row = WeightAllowance::new(Paygrade::Enlisted(5), 7_000, 9_000);
        assert_eq!(row.for_dependents(false), 7_000);
        assert_eq!(row.for_dependents(true), 9_000);
    }

    #[test]
    fn allowance_yaml_row() {
        let row: WeightAllowance = serde_yaml::from_str(
            "paygrade: O-3\nwithout_dependents_lbs: 13000\nwith_dependents_lbs: 14500\n",
        )
        .unwrap();
        assert_eq!(row.paygrade, Paygrade::Officer(3));
    }
}
