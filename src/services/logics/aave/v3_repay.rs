// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::service::{AaveDataSource, AaveService};
use super::{AAVE_V3_CHAINS, InterestRateMode};
use crate::data::abi::IAaveV3Pool;
use crate::data::address_book::ChainAddresses;
use crate::domain::constants::BPS_BASE;
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::domain::token::{Token, TokenAmount};
use crate::services::logics::offset::{AmountPosition, logic_input};
use crate::services::logics::wrap::resolve_wrap_mode;
use crate::services::logics::{
    BuildOptions, Capabilities, LogicAdapter, LogicFields, LogicId, QuoteParams, TokenList,
    ensure_supported_chain, with_native_counterparts,
};
use alloy::primitives::{Address, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const ID: LogicId = LogicId::new("aave-v3", "repay");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayParams {
    pub borrower: Address,
    pub token_in: Token,
    pub interest_rate_mode: InterestRateMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayFields {
    pub input: TokenAmount,
    pub interest_rate_mode: InterestRateMode,
    #[serde(default)]
    pub borrower: Option<Address>,
    #[serde(default)]
    pub balance_bps: Option<u16>,
}

/// `debt * (10000 + margin_bps) / 10000`, rounded up so any debt stays covered.
pub fn with_repay_margin(debt: U256, margin_bps: u16) -> U256 {
    if debt.is_zero() {
        return U256::ZERO;
    }
    let base = U256::from(BPS_BASE);
    debt.saturating_mul(base + U256::from(margin_bps)).div_ceil(base)
}

pub struct RepayLogic<S = AaveService> {
    chain_id: u64,
    pool: Address,
    source: S,
    margin_bps: u16,
}

impl<S> std::fmt::Debug for RepayLogic<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepayLogic")
            .field("chain_id", &self.chain_id)
            .field("pool", &self.pool)
            .field("margin_bps", &self.margin_bps)
            .finish_non_exhaustive()
    }
}

impl<S: AaveDataSource> RepayLogic<S> {
    pub fn new(chain: &ChainAddresses, source: S, margin_bps: u16) -> Result<Self, LogicError> {
        ensure_supported_chain(chain.chain_id, AAVE_V3_CHAINS)?;
        if margin_bps > BPS_BASE {
            return Err(LogicError::field("repay_margin_bps", format!("{margin_bps} exceeds {BPS_BASE}")));
        }
        Ok(Self {
            chain_id: chain.chain_id,
            pool: ChainAddresses::require(chain.aave_v3_pool, "aave_v3_pool")?,
            source,
            margin_bps,
        })
    }

    /// Outstanding debt plus margin; zero debt quotes zero.
    pub async fn quote_repay(&self, params: RepayParams) -> Result<RepayFields, LogicError> {
        let RepayParams {
            borrower,
            token_in,
            interest_rate_mode,
        } = params;
        let debt = self
            .source
            .user_debt(token_in.wrapped().address, borrower, interest_rate_mode)
            .await?;
        let amount_wei = with_repay_margin(debt, self.margin_bps);
        tracing::debug!(
            target: "aave",
            borrower = %format!("{:#x}", borrower),
            token = %token_in.symbol,
            debt = %debt,
            quoted = %amount_wei,
            "Quoted repay"
        );
        Ok(RepayFields {
            input: TokenAmount::from_wei(token_in, amount_wei),
            interest_rate_mode,
            borrower: Some(borrower),
            balance_bps: None,
        })
    }

    pub fn build_repay(&self, fields: RepayFields) -> Result<Logic, LogicError> {
        let RepayFields {
            input,
            interest_rate_mode,
            borrower,
            balance_bps,
        } = fields;
        let borrower = borrower
            .filter(|b| !b.is_zero())
            .ok_or_else(|| LogicError::field("borrower", "repay requires a borrower"))?;

        let token_in = input.token.wrapped();
        let data = IAaveV3Pool::repayCall {
            asset: token_in.address,
            amount: input.amount_wei,
            interestRateMode: interest_rate_mode.as_u256(),
            onBehalfOf: borrower,
        }
        .abi_encode();
        let logic_in = logic_input(
            token_in.address,
            input.amount_wei,
            balance_bps,
            "balance_bps",
            AmountPosition::Param(1),
        )?;
        let wrap_mode = resolve_wrap_mode(Some(&input.token), None)?;

        Ok(Logic::new(self.pool, data)
            .with_inputs(vec![logic_in])
            .with_wrap_mode(wrap_mode))
    }
}

#[async_trait]
impl<S: AaveDataSource> LogicAdapter for RepayLogic<S> {
    fn id(&self) -> LogicId {
        ID
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BUILD.with_quote().with_token_list()
    }

    async fn token_list(&self) -> Result<TokenList, LogicError> {
        let reserves = self.source.reserve_tokens().await?;
        Ok(TokenList::Tokens(with_native_counterparts(reserves)))
    }

    async fn quote(&self, params: QuoteParams) -> Result<LogicFields, LogicError> {
        match params {
            QuoteParams::AaveV3Repay(params) => {
                Ok(LogicFields::AaveV3Repay(self.quote_repay(params).await?))
            }
            other => Err(LogicError::FieldsMismatch {
                logic: ID.to_string(),
                received: other.kind().to_string(),
            }),
        }
    }

    fn build(&self, fields: LogicFields, _options: &BuildOptions) -> Result<Logic, LogicError> {
        match fields {
            LogicFields::AaveV3Repay(fields) => self.build_repay(fields),
            other => Err(other.mismatch(ID)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::{CHAIN_ETHEREUM, WETH_MAINNET, native_token};
    use crate::domain::logic::{AmountOffset, WrapMode};

    struct FixedDebt(U256);

    #[async_trait]
    impl AaveDataSource for FixedDebt {
        async fn reserve_tokens(&self) -> Result<Vec<Token>, LogicError> {
            Ok(vec![])
        }

        async fn a_tokens(&self, _reserves: &[Token]) -> Result<Vec<Token>, LogicError> {
            Ok(vec![])
        }

        async fn user_debt(
            &self,
            _asset: Address,
            _borrower: Address,
            _mode: InterestRateMode,
        ) -> Result<U256, LogicError> {
            Ok(self.0)
        }
    }

    fn logic(debt: u64) -> RepayLogic<FixedDebt> {
        let chain = ChainAddresses::defaults(CHAIN_ETHEREUM);
        RepayLogic::new(&chain, FixedDebt(U256::from(debt)), 100).expect("logic")
    }

    #[test]
    fn margin_rounds_up_and_keeps_zero() {
        assert_eq!(with_repay_margin(U256::from(10_000u64), 100), U256::from(10_100u64));
        assert_eq!(with_repay_margin(U256::from(1u64), 100), U256::from(2u64));
        assert_eq!(with_repay_margin(U256::ZERO, 100), U256::ZERO);
    }

    #[tokio::test]
    async fn quote_adds_margin_over_debt() {
        let fields = logic(1_000_000)
            .quote_repay(RepayParams {
                borrower: Address::from([5u8; 20]),
                token_in: native_token(CHAIN_ETHEREUM),
                interest_rate_mode: InterestRateMode::Variable,
            })
            .await
            .expect("quote");
        assert_eq!(fields.input.amount_wei, U256::from(1_010_000u64));
        assert!(fields.input.token.is_native);
        assert_eq!(fields.borrower, Some(Address::from([5u8; 20])));
    }

    #[test]
    fn native_repay_wraps_before_and_patches_amount() {
        let fields = RepayFields {
            input: TokenAmount::from_wei(native_token(CHAIN_ETHEREUM), U256::from(7u64)),
            interest_rate_mode: InterestRateMode::Variable,
            borrower: Some(Address::from([5u8; 20])),
            balance_bps: Some(5_000),
        };
        let built = logic(0).build_repay(fields).expect("build");
        assert_eq!(built.wrap_mode, WrapMode::WrapBefore);
        assert_eq!(built.inputs[0].token, WETH_MAINNET);
        assert_eq!(built.inputs[0].amount_offset(), Some(AmountOffset::At(U256::from(32u64))));

        let call = IAaveV3Pool::repayCall::abi_decode(&built.data).expect("decode");
        assert_eq!(call.asset, WETH_MAINNET);
        assert_eq!(call.interestRateMode, U256::from(2u64));
    }

    #[test]
    fn missing_borrower_is_rejected() {
        let fields = RepayFields {
            input: TokenAmount::from_wei(native_token(CHAIN_ETHEREUM), U256::from(7u64)),
            interest_rate_mode: InterestRateMode::Stable,
            borrower: None,
            balance_bps: None,
        };
        assert!(matches!(
            logic(0).build_repay(fields),
            Err(LogicError::FieldValidation { ref field, .. }) if field == "borrower"
        ));
    }
}
