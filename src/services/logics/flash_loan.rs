// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::LogicError;
use crate::domain::token::TokenAmounts;
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Loaned outputs plus the opaque payload handed to the callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashLoanFields {
    pub outputs: TokenAmounts,
    #[serde(default)]
    pub params: Bytes,
}

/// Parallel asset/amount arrays in ascending address order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedLoan {
    pub assets: Vec<Address>,
    pub amounts: Vec<U256>,
}

impl SortedLoan {
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

pub fn sort_loan_assets(outputs: &TokenAmounts) -> Result<SortedLoan, LogicError> {
    if outputs.is_empty() {
        return Err(LogicError::field("outputs", "flash loan needs at least one asset"));
    }
    if let Some(native) = outputs.native() {
        return Err(LogicError::field(
            "outputs",
            format!("{} cannot be flash loaned; use its wrapped form", native.token.symbol),
        ));
    }

    sort_pairs(
        outputs
            .iter()
            .map(|out| (out.token.address, out.amount_wei))
            .collect(),
    )
}

fn sort_pairs(mut pairs: Vec<(Address, U256)>) -> Result<SortedLoan, LogicError> {
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    if let Some(pair) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(LogicError::field(
            "outputs",
            format!("asset {:#x} is listed more than once", pair[0].0),
        ));
    }

    let (assets, amounts) = pairs.into_iter().unzip();
    Ok(SortedLoan { assets, amounts })
}
