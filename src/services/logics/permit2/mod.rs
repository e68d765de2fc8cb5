// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Permit2 allowance-transfer logics and the permit lifecycle.

pub mod allowance;
pub mod flow;
pub mod permit_token;
pub mod pull_token;

use crate::data::permit2::{PermitBatch, PermitDetails, PermitSingle};
use crate::domain::constants::{CHAIN_ARBITRUM, CHAIN_AVALANCHE, CHAIN_BSC, CHAIN_ETHEREUM, CHAIN_OPTIMISM, CHAIN_POLYGON};
use alloy::primitives::{Address, B256, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub const PERMIT2_CHAINS: &[u64] = &[
    CHAIN_ETHEREUM,
    CHAIN_OPTIMISM,
    CHAIN_BSC,
    CHAIN_POLYGON,
    CHAIN_ARBITRUM,
    CHAIN_AVALANCHE,
];

/// Unsigned permit payload; the shape follows the number of details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermitData {
    Single(PermitSingle),
    Batch(PermitBatch),
}

impl PermitData {
    /// `None` when nothing needs permitting.
    pub fn from_details(
        mut details: Vec<PermitDetails>,
        spender: Address,
        sig_deadline: U256,
    ) -> Option<Self> {
        match details.len() {
            0 => None,
            1 => details.pop().map(|detail| {
                PermitData::Single(PermitSingle {
                    details: detail,
                    spender,
                    sigDeadline: sig_deadline,
                })
            }),
            _ => Some(PermitData::Batch(PermitBatch {
                details,
                spender,
                sigDeadline: sig_deadline,
            })),
        }
    }

    pub fn details(&self) -> Vec<PermitDetails> {
        match self {
            PermitData::Single(single) => vec![single.details.clone()],
            PermitData::Batch(batch) => batch.details.clone(),
        }
    }

    pub fn spender(&self) -> Address {
        match self {
            PermitData::Single(single) => single.spender,
            PermitData::Batch(batch) => batch.spender,
        }
    }

    pub fn sig_deadline(&self) -> U256 {
        match self {
            PermitData::Single(single) => single.sigDeadline,
            PermitData::Batch(batch) => batch.sigDeadline,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, PermitData::Single(_))
    }

    /// EIP-712 digest the account holder signs.
    pub fn signing_hash(&self, chain_id: u64, permit2: Address) -> B256 {
        let domain = permit2_domain(chain_id, permit2);
        match self {
            PermitData::Single(single) => single.eip712_signing_hash(&domain),
            PermitData::Batch(batch) => batch.eip712_signing_hash(&domain),
        }
    }
}

pub fn permit2_domain(chain_id: u64, permit2: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed("Permit2")),
        None,
        Some(U256::from(chain_id)),
        Some(permit2),
        None,
    )
}
