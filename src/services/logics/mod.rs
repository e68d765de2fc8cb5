// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Protocol adapters ("logics") that quote and encode single router steps.
//!
//! Each adapter builds a [`Logic`] the router executes in order inside one
//! transaction. Adapters that depend on live chain state also expose a
//! read-only `quote`, and adapters with a discoverable asset universe expose
//! `token_list`. Capabilities are declared once and resolved at registration.

pub mod aave;
pub mod agent;
pub mod balancer_v2;
pub mod compound_v3;
pub mod flash_loan;
pub mod offset;
pub mod permit2;
pub mod registry;
pub mod router;
pub mod utility;
pub mod wrap;

use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::domain::token::Token;
use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use registry::LogicRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicId {
    pub protocol: &'static str,
    pub action: &'static str,
}

impl LogicId {
    pub const fn new(protocol: &'static str, action: &'static str) -> Self {
        Self { protocol, action }
    }
}

impl fmt::Display for LogicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.protocol, self.action)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub token_list: bool,
    pub quote: bool,
    pub build: bool,
}

impl Capabilities {
    pub const BUILD: Self = Self {
        token_list: false,
        quote: false,
        build: true,
    };

    pub const fn with_token_list(mut self) -> Self {
        self.token_list = true;
        self
    }

    pub const fn with_quote(mut self) -> Self {
        self.quote = true;
        self
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.token_list {
            parts.push("token-list");
        }
        if self.quote {
            parts.push("quote");
        }
        if self.build {
            parts.push("build");
        }
        write!(f, "{}", parts.join(","))
    }
}

/// Per-call context supplied by the caller at build time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub account: Option<Address>,
}

impl BuildOptions {
    pub fn for_account(account: Address) -> Self {
        Self {
            account: Some(account),
        }
    }

    pub fn require_account(&self) -> Result<Address, LogicError> {
        match self.account {
            Some(account) if !account.is_zero() => Ok(account),
            _ => Err(LogicError::field("account", "build requires the executing account")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TokenList {
    Tokens(Vec<Token>),
    /// `(input, output)` pairs, e.g. aToken and its underlying.
    Pairs(Vec<(Token, Token)>),
    ByMarket(BTreeMap<String, Vec<(Token, Token)>>),
}

impl TokenList {
    pub fn len(&self) -> usize {
        match self {
            TokenList::Tokens(tokens) => tokens.len(),
            TokenList::Pairs(pairs) => pairs.len(),
            TokenList::ByMarket(markets) => markets.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Quote inputs, one variant per quoting adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "logic", rename_all = "kebab-case")]
pub enum QuoteParams {
    AaveV3Repay(aave::v3_repay::RepayParams),
    AaveV3Withdraw(aave::v3_withdraw::WithdrawParams),
    CompoundV3WithdrawBase(compound_v3::withdraw_base::WithdrawBaseParams),
}

impl QuoteParams {
    pub fn kind(&self) -> &'static str {
        match self {
            QuoteParams::AaveV3Repay(_) => "aave-v3:repay",
            QuoteParams::AaveV3Withdraw(_) => "aave-v3:withdraw",
            QuoteParams::CompoundV3WithdrawBase(_) => "compound-v3:withdraw-base",
        }
    }
}

/// Build-time input, one variant per adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "logic", rename_all = "kebab-case")]
pub enum LogicFields {
    PermitToken(permit2::permit_token::PermitTokenFields),
    PullToken(permit2::pull_token::PullTokenFields),
    AaveV2Borrow(aave::v2_borrow::BorrowFields),
    AaveV3Repay(aave::v3_repay::RepayFields),
    AaveV3Withdraw(aave::v3_withdraw::WithdrawFields),
    AaveV3FlashLoan(flash_loan::FlashLoanFields),
    CompoundV3WithdrawBase(compound_v3::withdraw_base::WithdrawBaseFields),
    BalancerV2FlashLoan(flash_loan::FlashLoanFields),
    SendToken(utility::send_token::SendTokenFields),
}

impl LogicFields {
    pub fn kind(&self) -> &'static str {
        match self {
            LogicFields::PermitToken(_) => "permit2:permit-token",
            LogicFields::PullToken(_) => "permit2:pull-token",
            LogicFields::AaveV2Borrow(_) => "aave-v2:borrow",
            LogicFields::AaveV3Repay(_) => "aave-v3:repay",
            LogicFields::AaveV3Withdraw(_) => "aave-v3:withdraw",
            LogicFields::AaveV3FlashLoan(_) => "aave-v3:flash-loan",
            LogicFields::CompoundV3WithdrawBase(_) => "compound-v3:withdraw-base",
            LogicFields::BalancerV2FlashLoan(_) => "balancer-v2:flash-loan",
            LogicFields::SendToken(_) => "utility:send-token",
        }
    }

    pub(crate) fn mismatch(&self, logic: LogicId) -> LogicError {
        LogicError::FieldsMismatch {
            logic: logic.to_string(),
            received: self.kind().to_string(),
        }
    }
}

/// Adapter contract every logic implements.
///
/// Only `build` is required; `token_list` and `quote` default to
/// `UnsupportedOperation` and must be paired with the matching
/// [`Capabilities`] flag when overridden.
#[async_trait]
pub trait LogicAdapter: Send + Sync + fmt::Debug {
    fn id(&self) -> LogicId;

    fn chain_id(&self) -> u64;

    fn capabilities(&self) -> Capabilities;

    async fn token_list(&self) -> Result<TokenList, LogicError> {
        Err(unsupported(self.id(), "token_list"))
    }

    async fn quote(&self, _params: QuoteParams) -> Result<LogicFields, LogicError> {
        Err(unsupported(self.id(), "quote"))
    }

    /// Pure: encodes the call without touching the chain.
    fn build(&self, fields: LogicFields, options: &BuildOptions) -> Result<Logic, LogicError>;
}

pub(crate) fn unsupported(logic: LogicId, operation: &str) -> LogicError {
    LogicError::UnsupportedOperation {
        operation: operation.to_string(),
        logic: logic.to_string(),
    }
}

pub(crate) fn ensure_supported_chain(chain_id: u64, supported: &[u64]) -> Result<(), LogicError> {
    if supported.contains(&chain_id) {
        Ok(())
    } else {
        Err(LogicError::UnsupportedChain(chain_id))
    }
}

/// Wrapped tokens are listed after their native counterpart; both are selectable.
pub(crate) fn with_native_counterparts(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len() + 1);
    for token in tokens {
        if token.is_wrapped() {
            out.push(token.unwrapped());
        }
        out.push(token);
    }
    out
}
