// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::COMPOUND_V3_CHAINS;
use super::service::{CometDataSource, CometService};
use crate::data::abi::IComet;
use crate::data::address_book::ChainAddresses;
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::domain::token::{Token, TokenAmount};
use crate::services::logics::offset::{AmountPosition, logic_input};
use crate::services::logics::wrap::resolve_wrap_mode;
use crate::services::logics::{
    BuildOptions, Capabilities, LogicAdapter, LogicFields, LogicId, QuoteParams, TokenList,
    ensure_supported_chain,
};
use alloy::primitives::{Address, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ID: LogicId = LogicId::new("compound-v3", "withdraw-base");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawBaseParams {
    pub market_id: String,
    pub input: TokenAmount,
    pub token_out: Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawBaseFields {
    pub market_id: String,
    pub input: TokenAmount,
    pub output: TokenAmount,
    #[serde(default)]
    pub balance_bps: Option<u16>,
}

pub struct WithdrawBaseLogic<S = CometService> {
    chain_id: u64,
    markets: BTreeMap<String, Address>,
    source: S,
}

impl<S> std::fmt::Debug for WithdrawBaseLogic<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithdrawBaseLogic")
            .field("chain_id", &self.chain_id)
            .field("markets", &self.markets)
            .finish_non_exhaustive()
    }
}

impl<S: CometDataSource> WithdrawBaseLogic<S> {
    pub fn new(chain: &ChainAddresses, source: S) -> Result<Self, LogicError> {
        ensure_supported_chain(chain.chain_id, COMPOUND_V3_CHAINS)?;
        Ok(Self {
            chain_id: chain.chain_id,
            markets: chain.compound_v3_markets.clone(),
            source,
        })
    }

    fn market(&self, market_id: &str) -> Result<Address, LogicError> {
        if market_id.trim().is_empty() {
            return Err(LogicError::field("market_id", "market id is required"));
        }
        self.markets
            .get(market_id)
            .copied()
            .ok_or_else(|| LogicError::UnknownMarket(market_id.to_string()))
    }

    /// Base withdrawals burn cTokens 1:1.
    pub fn quote_withdraw_base(&self, params: WithdrawBaseParams) -> Result<WithdrawBaseFields, LogicError> {
        self.market(&params.market_id)?;
        let output = TokenAmount::from_wei(params.token_out, params.input.amount_wei);
        Ok(WithdrawBaseFields {
            market_id: params.market_id,
            input: params.input,
            output,
            balance_bps: None,
        })
    }

    /// Fixed amounts withdraw everything (`uint256.max`); fractions patch
    /// the amount argument at execution time.
    pub fn build_withdraw_base(&self, fields: WithdrawBaseFields) -> Result<Logic, LogicError> {
        let WithdrawBaseFields {
            market_id,
            input,
            output,
            balance_bps,
        } = fields;
        let comet = self.market(&market_id)?;
        let token_out = output.token.wrapped();
        let amount = if balance_bps.is_some() {
            input.amount_wei
        } else {
            U256::MAX
        };
        let data = IComet::withdrawCall {
            asset: token_out.address,
            amount,
        }
        .abi_encode();
        let logic_in = logic_input(
            input.token.address,
            input.amount_wei,
            balance_bps,
            "balance_bps",
            AmountPosition::Param(1),
        )?;
        let wrap_mode = resolve_wrap_mode(Some(&input.token), Some(&output.token))?;

        Ok(Logic::new(comet, data)
            .with_inputs(vec![logic_in])
            .with_wrap_mode(wrap_mode))
    }
}

#[async_trait]
impl<S: CometDataSource> LogicAdapter for WithdrawBaseLogic<S> {
    fn id(&self) -> LogicId {
        ID
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BUILD.with_quote().with_token_list()
    }

    /// Market id → `(cToken, base)` pairs; a wrapped base is offered natively first.
    async fn token_list(&self) -> Result<TokenList, LogicError> {
        let fetched = try_join_all(
            self.markets
                .values()
                .map(|comet| self.source.comet_tokens(*comet)),
        )
        .await?;
        let mut by_market = BTreeMap::new();
        for (market_id, tokens) in self.markets.keys().zip(fetched) {
            let mut pairs = Vec::with_capacity(2);
            if tokens.base_token.is_wrapped() {
                pairs.push((tokens.c_token.clone(), tokens.base_token.unwrapped()));
            }
            pairs.push((tokens.c_token, tokens.base_token));
            by_market.insert(market_id.clone(), pairs);
        }
        Ok(TokenList::ByMarket(by_market))
    }

    async fn quote(&self, params: QuoteParams) -> Result<LogicFields, LogicError> {
        match params {
            QuoteParams::CompoundV3WithdrawBase(params) => Ok(
                LogicFields::CompoundV3WithdrawBase(self.quote_withdraw_base(params)?),
            ),
            other => Err(LogicError::FieldsMismatch {
                logic: ID.to_string(),
                received: other.kind().to_string(),
            }),
        }
    }

    fn build(&self, fields: LogicFields, _options: &BuildOptions) -> Result<Logic, LogicError> {
        match fields {
            LogicFields::CompoundV3WithdrawBase(fields) => self.build_withdraw_base(fields),
            other => Err(other.mismatch(ID)),
        }
    }
}
