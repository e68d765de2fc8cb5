// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod flash_loan;

use crate::domain::constants::{
    CHAIN_ARBITRUM, CHAIN_AVALANCHE, CHAIN_ETHEREUM, CHAIN_OPTIMISM, CHAIN_POLYGON,
};

pub const BALANCER_V2_CHAINS: &[u64] = &[
    CHAIN_ETHEREUM,
    CHAIN_OPTIMISM,
    CHAIN_POLYGON,
    CHAIN_ARBITRUM,
    CHAIN_AVALANCHE,
];
