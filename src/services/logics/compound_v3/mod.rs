// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod service;
pub mod withdraw_base;

use crate::domain::constants::{CHAIN_ARBITRUM, CHAIN_ETHEREUM, CHAIN_POLYGON};

pub const COMPOUND_V3_CHAINS: &[u64] = &[CHAIN_ETHEREUM, CHAIN_POLYGON, CHAIN_ARBITRUM];
