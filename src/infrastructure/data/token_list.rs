// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

pub const BALANCER_TOKEN_LIST_URL: &str =
    "https://raw.githubusercontent.com/balancer/tokenlists/main/generated/listed-old.tokenlist.json";
pub const ONEINCH_TOKENS_URL: &str = "https://api.1inch.io/v5.0";

/// Uniswap token-list schema (only the fields adapters read).
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTokenList {
    pub tokens: Vec<RemoteToken>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteToken {
    pub chain_id: u64,
    pub address: String,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// 1inch `/tokens` response keyed by address.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorTokens {
    pub tokens: HashMap<String, AggregatorToken>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorToken {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub address: String,
}

#[async_trait]
pub trait TokenListSource: Send + Sync {
    async fn remote_token_list(&self, url: &str) -> Result<RemoteTokenList, AppError>;
    async fn aggregator_tokens(&self, chain_id: u64) -> Result<AggregatorTokens, AppError>;
}

#[derive(Clone, Debug)]
pub struct HttpTokenListClient {
    http: reqwest::Client,
    aggregator_base: String,
}

impl HttpTokenListClient {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Initialization(format!("token list client: {e}")))?;
        Ok(Self {
            http,
            aggregator_base: ONEINCH_TOKENS_URL.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, provider: &str, url: &str) -> Result<T, AppError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Connection(format!("{url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::ApiCall {
                provider: provider.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp
            .json::<T>()
            .await
            .map_err(|e| AppError::Connection(format!("{url}: invalid body: {e}")))?;
        tracing::debug!(target: "token_list", url, "Fetched token list");
        Ok(body)
    }
}

#[async_trait]
impl TokenListSource for HttpTokenListClient {
    async fn remote_token_list(&self, url: &str) -> Result<RemoteTokenList, AppError> {
        self.get_json("tokenlist", url).await
    }

    async fn aggregator_tokens(&self, chain_id: u64) -> Result<AggregatorTokens, AppError> {
        let url = format!("{}/{}/tokens", self.aggregator_base, chain_id);
        self.get_json("1inch", &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_list_tolerates_missing_metadata() {
        let raw = r#"{
            "name": "listed",
            "tokens": [
                { "chainId": 1, "address": "0x6B175474E89094C44Da98b954EedeAC495271d0F",
                  "decimals": 18, "symbol": "DAI", "name": "Dai Stablecoin" },
                { "chainId": 1, "address": "0x0000000000000000000000000000000000000001" }
            ]
        }"#;
        let list: RemoteTokenList = serde_json::from_str(raw).expect("parse");
        assert_eq!(list.tokens.len(), 2);
        assert_eq!(list.tokens[0].symbol.as_deref(), Some("DAI"));
        assert!(list.tokens[1].decimals.is_none());
    }
}
