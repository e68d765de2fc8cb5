// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::BALANCER_V2_CHAINS;
use crate::data::abi::IBalancerVault;
use crate::data::address_book::ChainAddresses;
use crate::data::token_list::{
    BALANCER_TOKEN_LIST_URL, HttpTokenListClient, RemoteTokenList, TokenListSource,
};
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::domain::token::Token;
use crate::services::logics::flash_loan::{FlashLoanFields, sort_loan_assets};
use crate::services::logics::{
    BuildOptions, Capabilities, LogicAdapter, LogicFields, LogicId, TokenList,
    ensure_supported_chain,
};
use alloy::primitives::Address;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::collections::HashSet;
use std::str::FromStr;

pub const ID: LogicId = LogicId::new("balancer-v2", "flash-loan");

pub struct FlashLoanLogic<L = HttpTokenListClient> {
    chain_id: u64,
    vault: Address,
    callback: Address,
    lists: L,
}

impl<L> std::fmt::Debug for FlashLoanLogic<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalancerV2FlashLoanLogic")
            .field("chain_id", &self.chain_id)
            .field("vault", &self.vault)
            .field("callback", &self.callback)
            .finish_non_exhaustive()
    }
}

impl<L: TokenListSource> FlashLoanLogic<L> {
    pub fn new(chain: &ChainAddresses, lists: L) -> Result<Self, LogicError> {
        ensure_supported_chain(chain.chain_id, BALANCER_V2_CHAINS)?;
        Ok(Self {
            chain_id: chain.chain_id,
            vault: ChainAddresses::require(chain.balancer_v2_vault, "balancer_v2_vault")?,
            callback: ChainAddresses::require(
                chain.balancer_v2_flash_loan_callback,
                "balancer_v2_flash_loan_callback",
            )?,
            lists,
        })
    }

    pub fn build_flash_loan(&self, fields: FlashLoanFields) -> Result<Logic, LogicError> {
        let loan = sort_loan_assets(&fields.outputs)?;
        let data = IBalancerVault::flashLoanCall {
            recipient: self.callback,
            tokens: loan.assets,
            amounts: loan.amounts,
            userData: fields.params,
        }
        .abi_encode();
        Ok(Logic::new(self.vault, data).with_callback(self.callback))
    }
}

/// Tokens for `chain_id` with complete metadata, first occurrence wins.
pub fn listed_tokens(chain_id: u64, list: RemoteTokenList) -> Vec<Token> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for entry in list.tokens {
        if entry.chain_id != chain_id {
            continue;
        }
        let (Some(decimals), Some(symbol), Some(name)) = (entry.decimals, entry.symbol, entry.name)
        else {
            continue;
        };
        if symbol.is_empty() || name.is_empty() {
            continue;
        }
        let Ok(address) = Address::from_str(entry.address.trim()) else {
            tracing::debug!(target: "token_list", address = %entry.address, "Skipping invalid address");
            continue;
        };
        if seen.insert(address) {
            tokens.push(Token::new(chain_id, address, decimals, symbol, name));
        }
    }
    tokens
}

#[async_trait]
impl<L: TokenListSource> LogicAdapter for FlashLoanLogic<L> {
    fn id(&self) -> LogicId {
        ID
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BUILD.with_token_list()
    }

    async fn token_list(&self) -> Result<TokenList, LogicError> {
        let list = self.lists.remote_token_list(BALANCER_TOKEN_LIST_URL).await?;
        Ok(TokenList::Tokens(listed_tokens(self.chain_id, list)))
    }

    fn build(&self, fields: LogicFields, _options: &BuildOptions) -> Result<Logic, LogicError> {
        match fields {
            LogicFields::BalancerV2FlashLoan(fields) => self.build_flash_loan(fields),
            other => Err(other.mismatch(ID)),
        }
    }
}
