// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::InterestRateMode;
use crate::data::abi::IAaveDataProvider;
use crate::data::multicall::Multicall;
use crate::domain::error::LogicError;
use crate::domain::token::Token;
use alloy::primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;

/// Read side of an Aave deployment.
#[async_trait]
pub trait AaveDataSource: Send + Sync {
    /// Listed reserves in their on-chain (wrapped) form.
    async fn reserve_tokens(&self) -> Result<Vec<Token>, LogicError>;

    /// aToken for each reserve, aligned with `reserves`.
    async fn a_tokens(&self, reserves: &[Token]) -> Result<Vec<Token>, LogicError>;

    async fn user_debt(
        &self,
        asset: Address,
        borrower: Address,
        mode: InterestRateMode,
    ) -> Result<U256, LogicError>;
}

#[derive(Clone)]
pub struct AaveService {
    chain_id: u64,
    data_provider: Address,
    multicall: Multicall,
}

impl std::fmt::Debug for AaveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AaveService")
            .field("chain_id", &self.chain_id)
            .field("data_provider", &self.data_provider)
            .finish_non_exhaustive()
    }
}

impl AaveService {
    pub fn new(chain_id: u64, data_provider: Address, multicall: Multicall) -> Self {
        Self {
            chain_id,
            data_provider,
            multicall,
        }
    }
}

#[async_trait]
impl AaveDataSource for AaveService {
    async fn reserve_tokens(&self) -> Result<Vec<Token>, LogicError> {
        let reserves = IAaveDataProvider::new(self.data_provider, self.multicall.provider().clone())
            .getAllReservesTokens()
            .call()
            .await
            .map_err(|e| LogicError::ChainRead(format!("getAllReservesTokens: {e}")))?;
        let addresses: Vec<Address> = reserves.iter().map(|r| r.tokenAddress).collect();
        tracing::debug!(target: "aave", reserves = addresses.len(), "Fetched reserve list");
        Ok(self.multicall.token_metadata(self.chain_id, &addresses).await?)
    }

    async fn a_tokens(&self, reserves: &[Token]) -> Result<Vec<Token>, LogicError> {
        let calls = reserves
            .iter()
            .map(|reserve| {
                let data = IAaveDataProvider::getReserveTokensAddressesCall {
                    asset: reserve.address,
                }
                .abi_encode();
                (self.data_provider, Bytes::from(data))
            })
            .collect();
        let results = self.multicall.aggregate(calls).await?;

        let a_token_addresses = reserves
            .iter()
            .zip(results)
            .map(|(reserve, result)| {
                let failed = || {
                    LogicError::ChainRead(format!(
                        "getReserveTokensAddresses failed for {:#x}",
                        reserve.address
                    ))
                };
                if !result.success {
                    return Err(failed());
                }
                IAaveDataProvider::getReserveTokensAddressesCall::abi_decode_returns(
                    &result.returnData,
                )
                .map(|ret| ret.aTokenAddress)
                .map_err(|_| failed())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .multicall
            .token_metadata(self.chain_id, &a_token_addresses)
            .await?)
    }

    async fn user_debt(
        &self,
        asset: Address,
        borrower: Address,
        mode: InterestRateMode,
    ) -> Result<U256, LogicError> {
        let data = IAaveDataProvider::new(self.data_provider, self.multicall.provider().clone())
            .getUserReserveData(asset, borrower)
            .call()
            .await
            .map_err(|e| LogicError::ChainRead(format!("getUserReserveData: {e}")))?;
        Ok(match mode {
            InterestRateMode::Stable => data.currentStableDebt,
            InterestRateMode::Variable => data.currentVariableDebt,
        })
    }
}
