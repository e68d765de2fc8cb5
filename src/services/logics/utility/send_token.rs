// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::data::abi::IERC20;
use crate::data::address_book::ChainAddresses;
use crate::data::token_list::{AggregatorTokens, HttpTokenListClient, TokenListSource};
use crate::domain::constants::{
    CHAIN_ARBITRUM, CHAIN_AVALANCHE, CHAIN_BSC, CHAIN_ETHEREUM, CHAIN_OPTIMISM, CHAIN_POLYGON,
    NATIVE_TOKEN_ADDRESS, native_token,
};
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::domain::token::{Token, TokenAmount};
use crate::services::logics::offset::{AmountPosition, logic_input};
use crate::services::logics::{
    BuildOptions, Capabilities, LogicAdapter, LogicFields, LogicId, TokenList,
    ensure_supported_chain,
};
use alloy::primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ID: LogicId = LogicId::new("utility", "send-token");

pub const SEND_TOKEN_CHAINS: &[u64] = &[
    CHAIN_ETHEREUM,
    CHAIN_OPTIMISM,
    CHAIN_BSC,
    CHAIN_POLYGON,
    CHAIN_ARBITRUM,
    CHAIN_AVALANCHE,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTokenFields {
    pub input: TokenAmount,
    #[serde(default)]
    pub recipient: Option<Address>,
    #[serde(default)]
    pub balance_bps: Option<u16>,
}

pub struct SendTokenLogic<L = HttpTokenListClient> {
    chain_id: u64,
    lists: L,
}

impl<L> std::fmt::Debug for SendTokenLogic<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendTokenLogic")
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl<L: TokenListSource> SendTokenLogic<L> {
    pub fn new(chain: &ChainAddresses, lists: L) -> Result<Self, LogicError> {
        ensure_supported_chain(chain.chain_id, SEND_TOKEN_CHAINS)?;
        Ok(Self {
            chain_id: chain.chain_id,
            lists,
        })
    }

    /// Native sends are plain value transfers; ERC-20 sends call `transfer`.
    pub fn build_send(&self, fields: SendTokenFields) -> Result<Logic, LogicError> {
        let SendTokenFields {
            input,
            recipient,
            balance_bps,
        } = fields;
        let recipient = recipient
            .filter(|r| !r.is_zero())
            .ok_or_else(|| LogicError::field("recipient", "send requires a recipient"))?;

        let (to, data, position) = if input.token.is_native {
            (recipient, Bytes::new(), AmountPosition::NativeValue)
        } else {
            let data = IERC20::transferCall {
                to: recipient,
                amount: input.amount_wei,
            }
            .abi_encode();
            (input.token.address, Bytes::from(data), AmountPosition::Param(1))
        };
        let logic_in = logic_input(
            input.token.address,
            input.amount_wei,
            balance_bps,
            "balance_bps",
            position,
        )?;

        Ok(Logic::new(to, data).with_inputs(vec![logic_in]))
    }
}

/// Aggregator token map to tokens; the elastic address maps to the native token.
pub fn aggregator_token_list(chain_id: u64, data: AggregatorTokens) -> Vec<Token> {
    let mut tokens: Vec<Token> = data
        .tokens
        .into_values()
        .filter_map(|entry| {
            let address = Address::from_str(entry.address.trim()).ok()?;
            if address == NATIVE_TOKEN_ADDRESS {
                Some(native_token(chain_id))
            } else {
                Some(Token::new(chain_id, address, entry.decimals, entry.symbol, entry.name))
            }
        })
        .collect();
    tokens.sort_by(|a, b| a.address.cmp(&b.address));
    tokens.dedup_by(|a, b| a.address == b.address);
    tokens
}

#[async_trait]
impl<L: TokenListSource> LogicAdapter for SendTokenLogic<L> {
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
        let data = self.lists.aggregator_tokens(self.chain_id).await?;
        Ok(TokenList::Tokens(aggregator_token_list(self.chain_id, data)))
    }

    fn build(&self, fields: LogicFields, _options: &BuildOptions) -> Result<Logic, LogicError> {
        match fields {
            LogicFields::SendToken(fields) => self.build_send(fields),
            other => Err(other.mismatch(ID)),
        }
    }
}
