// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::AppError;
use alloy::network::Ethereum;
use alloy::providers::{Provider, RootProvider};
use url::Url;

pub type HttpProvider = RootProvider<Ethereum>;

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn http(rpc_url: &str) -> Result<HttpProvider, AppError> {
        let url =
            Url::parse(rpc_url).map_err(|e| AppError::Config(format!("Invalid RPC URL: {}", e)))?;

        let provider = RootProvider::new_http(url);
        Ok(provider)
    }

    /// Connect and confirm the endpoint serves `expected_chain_id`.
    pub async fn http_checked(
        rpc_url: &str,
        expected_chain_id: u64,
    ) -> Result<HttpProvider, AppError> {
        let provider = Self::http(rpc_url)?;
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| AppError::Connection(format!("{rpc_url}: {e}")))?;
        if chain_id != expected_chain_id {
            return Err(AppError::Config(format!(
                "RPC endpoint serves chain {chain_id}, expected {expected_chain_id}"
            )));
        }
        Ok(provider)
    }
}
