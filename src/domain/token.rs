// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::{
    NATIVE_TOKEN_ADDRESS, native_token, wrapped_native_for_chain, wrapped_native_token,
};
use crate::domain::error::AppError;
use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A chain asset. Native assets carry the elastic sentinel address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub is_native: bool,
}

impl Token {
    pub fn new(
        chain_id: u64,
        address: Address,
        decimals: u8,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: symbol.into(),
            name: name.into(),
            is_native: false,
        }
    }

    pub fn native(chain_id: u64, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            chain_id,
            address: NATIVE_TOKEN_ADDRESS,
            decimals: 18,
            symbol: symbol.into(),
            name: name.into(),
            is_native: true,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        !self.is_native && self.address == wrapped_native_for_chain(self.chain_id)
    }

    /// Form used for on-chain ERC-20 calls: native resolves to its wrapped counterpart.
    pub fn wrapped(&self) -> Token {
        if self.is_native {
            wrapped_native_token(self.chain_id)
        } else {
            self.clone()
        }
    }

    pub fn unwrapped(&self) -> Token {
        if self.is_wrapped() {
            native_token(self.chain_id)
        } else {
            self.clone()
        }
    }

    pub fn same_asset(&self, other: &Token) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

/// A quantity of a token; `amount_wei` is the exact on-chain integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub token: Token,
    pub amount_wei: U256,
}

impl TokenAmount {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            amount_wei: U256::ZERO,
        }
    }

    pub fn from_wei(token: Token, amount_wei: U256) -> Self {
        Self { token, amount_wei }
    }

    /// Parse a human amount such as `"1.5"` under the token's decimals.
    pub fn from_units(token: Token, amount: &str) -> Result<Self, AppError> {
        let trimmed = amount.trim();
        if trimmed.starts_with('-') {
            return Err(AppError::Validation {
                field: "amount".into(),
                message: format!("negative amount {trimmed}"),
            });
        }
        let parsed = parse_units(trimmed, token.decimals).map_err(|e| AppError::Validation {
            field: "amount".into(),
            message: format!("{trimmed}: {e}"),
        })?;
        Ok(Self {
            amount_wei: parsed.get_absolute(),
            token,
        })
    }

    /// Human-readable amount under the token's decimals.
    pub fn amount(&self) -> String {
        format_units(self.amount_wei, self.token.decimals)
            .unwrap_or_else(|_| self.amount_wei.to_string())
    }

    pub fn set_wei(mut self, amount_wei: U256) -> Self {
        self.amount_wei = amount_wei;
        self
    }

    pub fn add_wei(&mut self, amount_wei: U256) {
        self.amount_wei = self.amount_wei.saturating_add(amount_wei);
    }

    pub fn is_zero(&self) -> bool {
        self.amount_wei.is_zero()
    }
}

/// Insertion-ordered token amounts without duplicate tokens.
///
/// Serialized as a plain list; duplicates in the input merge on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TokenAmount>", into = "Vec<TokenAmount>")]
pub struct TokenAmounts {
    entries: Vec<TokenAmount>,
}

impl TokenAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an amount, merging into an existing entry for the same token.
    pub fn add(&mut self, amount: TokenAmount) -> &mut Self {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.token.same_asset(&amount.token))
        {
            Some(existing) => existing.add_wei(amount.amount_wei),
            None => self.entries.push(amount),
        }
        self
    }

    pub fn get(&self, address: Address) -> Option<&TokenAmount> {
        self.entries.iter().find(|e| e.token.address == address)
    }

    pub fn native(&self) -> Option<&TokenAmount> {
        self.entries.iter().find(|e| e.token.is_native)
    }

    pub fn erc20(&self) -> TokenAmounts {
        TokenAmounts {
            entries: self
                .entries
                .iter()
                .filter(|e| !e.token.is_native)
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TokenAmount> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<TokenAmount> {
        self.entries.clone()
    }
}

impl FromIterator<TokenAmount> for TokenAmounts {
    fn from_iter<I: IntoIterator<Item = TokenAmount>>(iter: I) -> Self {
        let mut out = TokenAmounts::new();
        for amount in iter {
            out.add(amount);
        }
        out
    }
}

impl From<Vec<TokenAmount>> for TokenAmounts {
    fn from(entries: Vec<TokenAmount>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<TokenAmounts> for Vec<TokenAmount> {
    fn from(amounts: TokenAmounts) -> Self {
        amounts.entries
    }
}

impl<'a> IntoIterator for &'a TokenAmounts {
    type Item = &'a TokenAmount;
    type IntoIter = std::slice::Iter<'a, TokenAmount>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
