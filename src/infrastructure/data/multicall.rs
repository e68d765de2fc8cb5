// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::AppError;
use crate::domain::token::Token;
use crate::infrastructure::data::abi::{IERC20, IERC20Bytes32, IMulticall3};
use crate::network::provider::HttpProvider;
use alloy::primitives::{Address, B256, Bytes};
use alloy_sol_types::SolCall;

/// Batched read-only calls through Multicall3 `aggregate3`; one RPC round trip per batch.
#[derive(Clone)]
pub struct Multicall {
    provider: HttpProvider,
    address: Address,
}

impl std::fmt::Debug for Multicall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multicall")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Multicall {
    pub fn new(provider: HttpProvider, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }

    /// Every call may fail independently; results stay aligned with `calls`.
    pub async fn aggregate(
        &self,
        calls: Vec<(Address, Bytes)>,
    ) -> Result<Vec<IMulticall3::CallResult>, AppError> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }
        let expected = calls.len();
        let call3 = calls
            .into_iter()
            .map(|(target, call_data)| IMulticall3::Call3 {
                target,
                allowFailure: true,
                callData: call_data,
            })
            .collect::<Vec<_>>();
        let results = IMulticall3::new(self.address, self.provider.clone())
            .aggregate3(call3)
            .call()
            .await
            .map_err(|e| AppError::ChainRead(format!("aggregate3 failed: {e}")))?;
        if results.len() != expected {
            return Err(AppError::ChainRead(format!(
                "aggregate3 returned {} results for {} calls",
                results.len(),
                expected
            )));
        }
        Ok(results)
    }

    /// ERC-20 decimals/symbol/name for each address, in input order.
    pub async fn token_metadata(
        &self,
        chain_id: u64,
        addresses: &[Address],
    ) -> Result<Vec<Token>, AppError> {
        let mut calls = Vec::with_capacity(addresses.len() * 3);
        for addr in addresses {
            calls.push((*addr, Bytes::from(IERC20::decimalsCall {}.abi_encode())));
            calls.push((*addr, Bytes::from(IERC20::symbolCall {}.abi_encode())));
            calls.push((*addr, Bytes::from(IERC20::nameCall {}.abi_encode())));
        }
        let results = self.aggregate(calls).await?;

        addresses
            .iter()
            .zip(results.chunks(3))
            .map(|(addr, chunk)| decode_metadata(chain_id, *addr, chunk))
            .collect()
    }
}

fn decode_metadata(
    chain_id: u64,
    address: Address,
    chunk: &[IMulticall3::CallResult],
) -> Result<Token, AppError> {
    let failed = |what: &str| AppError::ChainRead(format!("{what} read failed for token {address:#x}"));
    let [decimals, symbol, name] = chunk else {
        return Err(failed("metadata"));
    };
    if !decimals.success {
        return Err(failed("decimals"));
    }
    let decimals = IERC20::decimalsCall::abi_decode_returns(&decimals.returnData)
        .map_err(|_| failed("decimals"))?;
    let symbol = decode_text(symbol, true).ok_or_else(|| failed("symbol"))?;
    // Some tokens never implemented name(); fall back to the symbol.
    let name = decode_text(name, false).unwrap_or_else(|| symbol.clone());
    Ok(Token::new(chain_id, address, decimals, symbol, name))
}

fn decode_text(result: &IMulticall3::CallResult, is_symbol: bool) -> Option<String> {
    if !result.success {
        return None;
    }
    let data = &result.returnData;
    let text = if is_symbol {
        IERC20::symbolCall::abi_decode_returns(data).ok()
    } else {
        IERC20::nameCall::abi_decode_returns(data).ok()
    };
    text.or_else(|| {
        let word: B256 = if is_symbol {
            IERC20Bytes32::symbolCall::abi_decode_returns(data).ok()?
        } else {
            IERC20Bytes32::nameCall::abi_decode_returns(data).ok()?
        };
        bytes32_to_string(word)
    })
}

fn bytes32_to_string(word: B256) -> Option<String> {
    let trimmed: Vec<u8> = word.iter().copied().take_while(|b| *b != 0).collect();
    let s = String::from_utf8(trimmed).ok()?;
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use alloy_sol_types::SolValue;

    fn ok(data: Vec<u8>) -> IMulticall3::CallResult {
        IMulticall3::CallResult {
            success: true,
            returnData: data.into(),
        }
    }

    #[test]
    fn decodes_string_and_bytes32_metadata() {
        let addr = Address::from([9u8; 20]);
        let mut mkr = [0u8; 32];
        mkr[..3].copy_from_slice(b"MKR");
        let chunk = vec![
            ok(U256::from(18u64).abi_encode()),
            ok(B256::from(mkr).abi_encode()),
            ok("Maker".to_string().abi_encode()),
        ];
        let token = decode_metadata(1, addr, &chunk).expect("metadata");
        assert_eq!(token.decimals, 18);
        assert_eq!(token.symbol, "MKR");
        assert_eq!(token.name, "Maker");
    }

    #[test]
    fn failed_decimals_names_the_token() {
        let addr = Address::from([7u8; 20]);
        let chunk = vec![
            IMulticall3::CallResult {
                success: false,
                returnData: Bytes::new(),
            },
            ok("X".to_string().abi_encode()),
            ok("X".to_string().abi_encode()),
        ];
        let err = decode_metadata(1, addr, &chunk).expect_err("should fail");
        assert!(err.to_string().contains(&format!("{addr:#x}")));
    }
}
