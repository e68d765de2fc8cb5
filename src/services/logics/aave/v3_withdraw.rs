// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::AAVE_V3_CHAINS;
use super::service::{AaveDataSource, AaveService};
use crate::data::abi::IAaveV3Pool;
use crate::data::address_book::ChainAddresses;
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::domain::token::{Token, TokenAmount};
use crate::services::logics::agent::AccountAgent;
use crate::services::logics::offset::{AmountPosition, logic_input};
use crate::services::logics::wrap::resolve_wrap_mode;
use crate::services::logics::{
    BuildOptions, Capabilities, LogicAdapter, LogicFields, LogicId, QuoteParams, TokenList,
    ensure_supported_chain,
};
use alloy::primitives::Address;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const ID: LogicId = LogicId::new("aave-v3", "withdraw");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawParams {
    /// aToken amount being redeemed.
    pub input: TokenAmount,
    pub token_out: Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawFields {
    pub input: TokenAmount,
    pub output: TokenAmount,
    #[serde(default)]
    pub balance_bps: Option<u16>,
}

pub struct WithdrawLogic<S = AaveService> {
    chain_id: u64,
    pool: Address,
    agent: AccountAgent,
    source: S,
}

impl<S> std::fmt::Debug for WithdrawLogic<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithdrawLogic")
            .field("chain_id", &self.chain_id)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl<S: AaveDataSource> WithdrawLogic<S> {
    pub fn new(chain: &ChainAddresses, source: S) -> Result<Self, LogicError> {
        ensure_supported_chain(chain.chain_id, AAVE_V3_CHAINS)?;
        Ok(Self {
            chain_id: chain.chain_id,
            pool: ChainAddresses::require(chain.aave_v3_pool, "aave_v3_pool")?,
            agent: AccountAgent::for_chain(chain)?,
            source,
        })
    }

    /// aTokens redeem 1:1 for their underlying.
    pub fn quote_withdraw(&self, params: WithdrawParams) -> WithdrawFields {
        let output = TokenAmount::from_wei(params.token_out, params.input.amount_wei);
        WithdrawFields {
            input: params.input,
            output,
            balance_bps: None,
        }
    }

    /// The underlying is sent to the account's agent.
    pub fn build_withdraw(&self, fields: WithdrawFields, account: Address) -> Result<Logic, LogicError> {
        let WithdrawFields {
            input,
            output,
            balance_bps,
        } = fields;
        let token_out = output.token.wrapped();
        let data = IAaveV3Pool::withdrawCall {
            asset: token_out.address,
            amount: input.amount_wei,
            to: self.agent.agent_of(account),
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

        Ok(Logic::new(self.pool, data)
            .with_inputs(vec![logic_in])
            .with_wrap_mode(wrap_mode))
    }
}

#[async_trait]
impl<S: AaveDataSource> LogicAdapter for WithdrawLogic<S> {
    fn id(&self) -> LogicId {
        ID
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BUILD.with_quote().with_token_list()
    }

    /// `(aToken, underlying)` pairs; wrapped reserves are offered natively too.
    async fn token_list(&self) -> Result<TokenList, LogicError> {
        let reserves = self.source.reserve_tokens().await?;
        let a_tokens = self.source.a_tokens(&reserves).await?;
        if a_tokens.len() != reserves.len() {
            return Err(LogicError::ChainRead(format!(
                "{} aTokens for {} reserves",
                a_tokens.len(),
                reserves.len()
            )));
        }
        let mut pairs = Vec::with_capacity(reserves.len() + 1);
        for (a_token, reserve) in a_tokens.into_iter().zip(reserves) {
            if reserve.is_wrapped() {
                pairs.push((a_token.clone(), reserve.unwrapped()));
            }
            pairs.push((a_token, reserve));
        }
        Ok(TokenList::Pairs(pairs))
    }

    async fn quote(&self, params: QuoteParams) -> Result<LogicFields, LogicError> {
        match params {
            QuoteParams::AaveV3Withdraw(params) => {
                Ok(LogicFields::AaveV3Withdraw(self.quote_withdraw(params)))
            }
            other => Err(LogicError::FieldsMismatch {
                logic: ID.to_string(),
                received: other.kind().to_string(),
            }),
        }
    }

    fn build(&self, fields: LogicFields, options: &BuildOptions) -> Result<Logic, LogicError> {
        match fields {
            LogicFields::AaveV3Withdraw(fields) => {
                self.build_withdraw(fields, options.require_account()?)
            }
            other => Err(other.mismatch(ID)),
        }
    }
}
