// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod service;
pub mod v2_borrow;
pub mod v3_flash_loan;
pub mod v3_repay;
pub mod v3_withdraw;

use crate::domain::constants::{
    CHAIN_ARBITRUM, CHAIN_AVALANCHE, CHAIN_ETHEREUM, CHAIN_OPTIMISM, CHAIN_POLYGON,
};
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

pub const AAVE_V2_CHAINS: &[u64] = &[CHAIN_ETHEREUM, CHAIN_POLYGON, CHAIN_AVALANCHE];
pub const AAVE_V3_CHAINS: &[u64] = &[
    CHAIN_ETHEREUM,
    CHAIN_OPTIMISM,
    CHAIN_POLYGON,
    CHAIN_ARBITRUM,
    CHAIN_AVALANCHE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum InterestRateMode {
    Stable = 1,
    Variable = 2,
}

impl InterestRateMode {
    pub fn as_u256(self) -> U256 {
        U256::from(self as u8)
    }
}

impl std::str::FromStr for InterestRateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "stable" => Ok(InterestRateMode::Stable),
            "2" | "variable" => Ok(InterestRateMode::Variable),
            other => Err(format!("unknown interest rate mode {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_mode_parses_names_and_numbers() {
        assert_eq!("variable".parse::<InterestRateMode>(), Ok(InterestRateMode::Variable));
        assert_eq!("1".parse::<InterestRateMode>(), Ok(InterestRateMode::Stable));
        assert!("fixed".parse::<InterestRateMode>().is_err());
        assert_eq!(InterestRateMode::Variable.as_u256(), U256::from(2u64));
    }
}
