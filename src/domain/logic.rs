// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::{BPS_NOT_USED, OFFSET_NOT_USED};
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Native-asset bracketing the router applies around a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum WrapMode {
    #[default]
    None = 0,
    WrapBefore = 1,
    UnwrapAfter = 2,
}

impl WrapMode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Where the router writes a dynamically resolved amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmountOffset {
    /// Byte offset into the call arguments, counted after the 4-byte selector.
    At(U256),
    /// The call has no amount argument; the amount becomes the call value.
    NotUsed,
}

impl AmountOffset {
    pub fn to_word(self) -> U256 {
        match self {
            AmountOffset::At(offset) => offset,
            AmountOffset::NotUsed => OFFSET_NOT_USED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputAmount {
    Fixed(U256),
    /// `bps / 10000` of the live balance, patched in at execution time.
    Fraction { bps: u16, offset: AmountOffset },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicInput {
    pub token: Address,
    pub amount: InputAmount,
}

impl LogicInput {
    pub fn fixed(token: Address, amount_wei: U256) -> Self {
        Self {
            token,
            amount: InputAmount::Fixed(amount_wei),
        }
    }

    pub fn fraction(token: Address, bps: u16, offset: AmountOffset) -> Self {
        Self {
            token,
            amount: InputAmount::Fraction { bps, offset },
        }
    }

    pub fn amount_offset(&self) -> Option<AmountOffset> {
        match self.amount {
            InputAmount::Fixed(_) => None,
            InputAmount::Fraction { offset, .. } => Some(offset),
        }
    }

    pub fn amount_bps(&self) -> Option<u16> {
        match self.amount {
            InputAmount::Fixed(_) => None,
            InputAmount::Fraction { bps, .. } => Some(bps),
        }
    }

    pub fn fixed_amount(&self) -> Option<U256> {
        match self.amount {
            InputAmount::Fixed(amount) => Some(amount),
            InputAmount::Fraction { .. } => None,
        }
    }

    /// `(balanceBps, amountOrOffset)` as the router ABI expects them.
    pub fn router_words(&self) -> (U256, U256) {
        match self.amount {
            InputAmount::Fixed(amount) => (U256::from(BPS_NOT_USED), amount),
            InputAmount::Fraction { bps, offset } => (U256::from(bps), offset.to_word()),
        }
    }
}

/// One encoded protocol call plus router execution metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logic {
    pub to: Address,
    pub data: Bytes,
    #[serde(default)]
    pub inputs: Vec<LogicInput>,
    #[serde(default)]
    pub wrap_mode: WrapMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<Address>,
}

impl Logic {
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
            inputs: Vec::new(),
            wrap_mode: WrapMode::None,
            callback: None,
        }
    }

    pub fn with_inputs(mut self, inputs: Vec<LogicInput>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_wrap_mode(mut self, wrap_mode: WrapMode) -> Self {
        self.wrap_mode = wrap_mode;
        self
    }

    pub fn with_callback(mut self, callback: Address) -> Self {
        self.callback = Some(callback);
        self
    }
}
