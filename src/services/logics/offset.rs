// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Dynamic-amount encoding.
//!
//! When fields carry a balance fraction instead of a fixed amount, the
//! calldata still holds a placeholder amount and the logic input reports
//! where that amount lives. The router overwrites the 32-byte word at
//! `4 + offset` with `live_balance * bps / 10000` just before the call.

use crate::domain::constants::BPS_BASE;
use crate::domain::error::LogicError;
use crate::domain::logic::{AmountOffset, LogicInput};
use alloy::primitives::{Address, Bytes, U256};

const WORD: usize = 32;
const SELECTOR_LEN: usize = 4;

/// Where a call carries the amount the router may patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPosition {
    /// Zero-based index of a static argument in the encoded call.
    Param(usize),
    /// No amount argument; the amount travels as the call value.
    NativeValue,
}

impl AmountPosition {
    pub fn offset(self) -> AmountOffset {
        match self {
            AmountPosition::Param(index) => AmountOffset::At(param_offset(index)),
            AmountPosition::NativeValue => AmountOffset::NotUsed,
        }
    }
}

/// Byte offset of argument `index`, counted after the selector.
pub fn param_offset(index: usize) -> U256 {
    U256::from(index * WORD)
}

pub fn validate_bps(bps: u16, field: &str) -> Result<u16, LogicError> {
    if bps == 0 || bps > BPS_BASE {
        return Err(LogicError::field(
            field,
            format!("{bps} is outside (0, {BPS_BASE}]"),
        ));
    }
    Ok(bps)
}

/// Builds the router input for one token.
///
/// With `bps == None` the amount is fixed and no offset is reported.
pub fn logic_input(
    token: Address,
    amount_wei: U256,
    bps: Option<u16>,
    bps_field: &str,
    position: AmountPosition,
) -> Result<LogicInput, LogicError> {
    match bps {
        None => Ok(LogicInput::fixed(token, amount_wei)),
        Some(bps) => {
            let bps = validate_bps(bps, bps_field)?;
            Ok(LogicInput::fraction(token, bps, position.offset()))
        }
    }
}

/// Amount the router resolves at execution time.
pub fn apply_bps(balance: U256, bps: u16) -> U256 {
    balance.saturating_mul(U256::from(bps)) / U256::from(BPS_BASE)
}

/// Balance an account must hold so that `bps` of it covers `amount`.
pub fn required_amount_by_balance_bps(amount: U256, bps: u16) -> Result<U256, LogicError> {
    let bps = validate_bps(bps, "balance_bps")?;
    let scaled = amount.saturating_mul(U256::from(BPS_BASE));
    Ok(scaled.div_ceil(U256::from(bps)))
}

/// Writes `amount` into calldata the way the router does at execution time.
///
/// Returns `None` for `NotUsed` offsets or when the word falls outside `data`.
pub fn patch_amount(data: &[u8], offset: AmountOffset, amount: U256) -> Option<Bytes> {
    let AmountOffset::At(offset) = offset else {
        return None;
    };
    let start = SELECTOR_LEN.checked_add(usize::try_from(offset).ok()?)?;
    let end = start.checked_add(WORD)?;
    if end > data.len() {
        return None;
    }
    let mut patched = data.to_vec();
    patched[start..end].copy_from_slice(&amount.to_be_bytes::<32>());
    Some(patched.into())
}
