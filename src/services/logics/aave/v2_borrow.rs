// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::service::{AaveDataSource, AaveService};
use super::{AAVE_V2_CHAINS, InterestRateMode};
use crate::data::abi::IAaveV2LendingPool;
use crate::data::address_book::ChainAddresses;
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::domain::token::TokenAmount;
use crate::services::logics::wrap::resolve_wrap_mode;
use crate::services::logics::{
    BuildOptions, Capabilities, LogicAdapter, LogicFields, LogicId, TokenList,
    ensure_supported_chain, with_native_counterparts,
};
use alloy::primitives::Address;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const ID: LogicId = LogicId::new("aave-v2", "borrow");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowFields {
    pub output: TokenAmount,
    pub interest_rate_mode: InterestRateMode,
    #[serde(default)]
    pub referral_code: u16,
}

pub struct BorrowLogic<S = AaveService> {
    chain_id: u64,
    lending_pool: Address,
    source: S,
}

impl<S> std::fmt::Debug for BorrowLogic<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BorrowLogic")
            .field("chain_id", &self.chain_id)
            .field("lending_pool", &self.lending_pool)
            .finish_non_exhaustive()
    }
}

impl<S: AaveDataSource> BorrowLogic<S> {
    pub fn new(chain: &ChainAddresses, source: S) -> Result<Self, LogicError> {
        ensure_supported_chain(chain.chain_id, AAVE_V2_CHAINS)?;
        Ok(Self {
            chain_id: chain.chain_id,
            lending_pool: ChainAddresses::require(chain.aave_v2_lending_pool, "aave_v2_lending_pool")?,
            source,
        })
    }

    /// Borrows on behalf of the account; the agent receives the funds.
    pub fn build_borrow(&self, fields: BorrowFields, account: Address) -> Result<Logic, LogicError> {
        let BorrowFields {
            output,
            interest_rate_mode,
            referral_code,
        } = fields;
        if output.is_zero() {
            return Err(LogicError::field("output", "borrow amount must be positive"));
        }
        let token_out = output.token.wrapped();
        let data = IAaveV2LendingPool::borrowCall {
            asset: token_out.address,
            amount: output.amount_wei,
            interestRateMode: interest_rate_mode.as_u256(),
            referralCode: referral_code,
            onBehalfOf: account,
        }
        .abi_encode();
        let wrap_mode = resolve_wrap_mode(None, Some(&output.token))?;

        Ok(Logic::new(self.lending_pool, data).with_wrap_mode(wrap_mode))
    }
}

#[async_trait]
impl<S: AaveDataSource> LogicAdapter for BorrowLogic<S> {
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
        let reserves = self.source.reserve_tokens().await?;
        Ok(TokenList::Tokens(with_native_counterparts(reserves)))
    }

    fn build(&self, fields: LogicFields, options: &BuildOptions) -> Result<Logic, LogicError> {
        match fields {
            LogicFields::AaveV2Borrow(fields) => {
                self.build_borrow(fields, options.require_account()?)
            }
            other => Err(other.mismatch(ID)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::{
        CHAIN_ARBITRUM, CHAIN_ETHEREUM, WETH_MAINNET, native_token, wrapped_native_token,
    };
    use crate::domain::logic::WrapMode;
    use crate::domain::token::Token;
    use alloy::primitives::U256;

    struct WethReserve;

    #[async_trait]
    impl AaveDataSource for WethReserve {
        async fn reserve_tokens(&self) -> Result<Vec<Token>, LogicError> {
            Ok(vec![wrapped_native_token(CHAIN_ETHEREUM)])
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
            Ok(U256::ZERO)
        }
    }

    fn logic() -> BorrowLogic<WethReserve> {
        BorrowLogic::new(&ChainAddresses::defaults(CHAIN_ETHEREUM), WethReserve).expect("logic")
    }

    #[test]
    fn native_borrow_unwraps_after() {
        let account = Address::from([4u8; 20]);
        let fields = LogicFields::AaveV2Borrow(BorrowFields {
            output: TokenAmount::from_wei(native_token(CHAIN_ETHEREUM), U256::from(1u64)),
            interest_rate_mode: InterestRateMode::Variable,
            referral_code: 0,
        });
        let built = logic()
            .build(fields, &BuildOptions::for_account(account))
            .expect("build");
        assert_eq!(built.wrap_mode, WrapMode::UnwrapAfter);
        assert!(built.inputs.is_empty());

        let call = IAaveV2LendingPool::borrowCall::abi_decode(&built.data).expect("decode");
        assert_eq!(call.asset, WETH_MAINNET);
        assert_eq!(call.onBehalfOf, account);
    }

    #[tokio::test]
    async fn token_list_offers_native_and_wrapped() {
        let TokenList::Tokens(tokens) = logic().token_list().await.expect("list") else {
            panic!("flat list expected");
        };
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_native);
    }

    #[test]
    fn unsupported_chain_is_rejected() {
        let chain = ChainAddresses::defaults(CHAIN_ARBITRUM);
        assert!(matches!(
            BorrowLogic::new(&chain, WethReserve),
            Err(LogicError::UnsupportedChain(CHAIN_ARBITRUM))
        ));
    }
}
