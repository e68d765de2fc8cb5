// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::AAVE_V3_CHAINS;
use super::service::{AaveDataSource, AaveService};
use crate::data::abi::IAaveV3Pool;
use crate::data::address_book::ChainAddresses;
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::services::logics::agent::AccountAgent;
use crate::services::logics::flash_loan::{FlashLoanFields, sort_loan_assets};
use crate::services::logics::{
    BuildOptions, Capabilities, LogicAdapter, LogicFields, LogicId, TokenList,
    ensure_supported_chain,
};
use alloy::primitives::{Address, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;

pub const ID: LogicId = LogicId::new("aave-v3", "flash-loan");

pub struct FlashLoanLogic<S = AaveService> {
    chain_id: u64,
    pool: Address,
    callback: Address,
    agent: AccountAgent,
    source: S,
}

impl<S> std::fmt::Debug for FlashLoanLogic<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AaveV3FlashLoanLogic")
            .field("chain_id", &self.chain_id)
            .field("pool", &self.pool)
            .field("callback", &self.callback)
            .finish_non_exhaustive()
    }
}

impl<S: AaveDataSource> FlashLoanLogic<S> {
    pub fn new(chain: &ChainAddresses, source: S) -> Result<Self, LogicError> {
        ensure_supported_chain(chain.chain_id, AAVE_V3_CHAINS)?;
        Ok(Self {
            chain_id: chain.chain_id,
            pool: ChainAddresses::require(chain.aave_v3_pool, "aave_v3_pool")?,
            callback: ChainAddresses::require(
                chain.aave_v3_flash_loan_callback,
                "aave_v3_flash_loan_callback",
            )?,
            agent: AccountAgent::for_chain(chain)?,
            source,
        })
    }

    /// No-debt flash loan (mode 0 for every asset) paid to the callback.
    pub fn build_flash_loan(
        &self,
        fields: FlashLoanFields,
        account: Address,
    ) -> Result<Logic, LogicError> {
        let loan = sort_loan_assets(&fields.outputs)?;
        let modes = vec![U256::ZERO; loan.len()];
        let data = IAaveV3Pool::flashLoanCall {
            receiverAddress: self.callback,
            assets: loan.assets,
            amounts: loan.amounts,
            interestRateModes: modes,
            onBehalfOf: self.agent.agent_of(account),
            params: fields.params,
            referralCode: 0,
        }
        .abi_encode();
        Ok(Logic::new(self.pool, data).with_callback(self.callback))
    }
}

#[async_trait]
impl<S: AaveDataSource> LogicAdapter for FlashLoanLogic<S> {
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
        Ok(TokenList::Tokens(self.source.reserve_tokens().await?))
    }

    fn build(&self, fields: LogicFields, options: &BuildOptions) -> Result<Logic, LogicError> {
        match fields {
            LogicFields::AaveV3FlashLoan(fields) => {
                self.build_flash_loan(fields, options.require_account()?)
            }
            other => Err(other.mismatch(ID)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::CHAIN_ETHEREUM;
    use crate::domain::token::{Token, TokenAmount, TokenAmounts};
    use crate::services::logics::aave::InterestRateMode;
    use alloy::primitives::{B256, Bytes};

    struct Empty;

    #[async_trait]
    impl AaveDataSource for Empty {
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
            Ok(U256::ZERO)
        }
    }

    fn chain() -> ChainAddresses {
        let mut chain = ChainAddresses::defaults(CHAIN_ETHEREUM);
        chain.router = Some(Address::from([0x10; 20]));
        chain.agent_init_code_hash = Some(B256::repeat_byte(0x42));
        chain.aave_v3_flash_loan_callback = Some(Address::from([0xcb; 20]));
        chain
    }

    #[test]
    fn sorted_assets_and_zero_modes() {
        let logic = FlashLoanLogic::new(&chain(), Empty).expect("logic");
        let outputs: TokenAmounts = [0x50u8, 0x20, 0x40]
            .into_iter()
            .map(|b| {
                let token = Token::new(CHAIN_ETHEREUM, Address::from([b; 20]), 18, "T", "T");
                TokenAmount::from_wei(token, U256::from(u64::from(b)))
            })
            .collect();
        let built = logic
            .build_flash_loan(
                FlashLoanFields {
                    outputs,
                    params: Bytes::from(vec![0x01]),
                },
                Address::from([3u8; 20]),
            )
            .expect("build");
        assert_eq!(built.callback, Some(Address::from([0xcb; 20])));

        let call = IAaveV3Pool::flashLoanCall::abi_decode(&built.data).expect("decode");
        assert_eq!(call.receiverAddress, Address::from([0xcb; 20]));
        assert_eq!(call.assets[0], Address::from([0x20; 20]));
        assert_eq!(call.amounts[0], U256::from(0x20u64));
        assert_eq!(call.assets[2], Address::from([0x50; 20]));
        assert!(call.interestRateModes.iter().all(|m| m.is_zero()));
    }

    #[test]
    fn callback_must_be_configured() {
        let mut chain = chain();
        chain.aave_v3_flash_loan_callback = None;
        assert!(matches!(
            FlashLoanLogic::new(&chain, Empty),
            Err(LogicError::MissingAddress("aave_v3_flash_loan_callback"))
        ));
    }
}
