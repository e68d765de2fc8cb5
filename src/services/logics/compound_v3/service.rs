// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::data::abi::IComet;
use crate::data::multicall::Multicall;
use crate::domain::error::LogicError;
use crate::domain::token::Token;
use alloy::primitives::Address;
use async_trait::async_trait;

/// A Comet market's own token (cToken) and its base asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CometTokens {
    pub c_token: Token,
    pub base_token: Token,
}

#[async_trait]
pub trait CometDataSource: Send + Sync {
    async fn comet_tokens(&self, comet: Address) -> Result<CometTokens, LogicError>;
}

#[derive(Clone)]
pub struct CometService {
    chain_id: u64,
    multicall: Multicall,
}

impl std::fmt::Debug for CometService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CometService")
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl CometService {
    pub fn new(chain_id: u64, multicall: Multicall) -> Self {
        Self {
            chain_id,
            multicall,
        }
    }
}

#[async_trait]
impl CometDataSource for CometService {
    async fn comet_tokens(&self, comet: Address) -> Result<CometTokens, LogicError> {
        let base = IComet::new(comet, self.multicall.provider().clone())
            .baseToken()
            .call()
            .await
            .map_err(|e| LogicError::ChainRead(format!("baseToken of {comet:#x}: {e}")))?;
        let mut tokens = self
            .multicall
            .token_metadata(self.chain_id, &[comet, base])
            .await?
            .into_iter();
        match (tokens.next(), tokens.next()) {
            (Some(c_token), Some(base_token)) => Ok(CometTokens {
                c_token,
                base_token,
            }),
            _ => Err(LogicError::ChainRead(format!(
                "missing token metadata for comet {comet:#x}"
            ))),
        }
    }
}
