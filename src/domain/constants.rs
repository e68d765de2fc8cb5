// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::token::Token;
use alloy::primitives::{Address, U256, address};
use lazy_static::lazy_static;
use std::collections::HashMap;

// Common assets
pub const WETH_MAINNET: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
pub const WETH_OPTIMISM: Address = address!("4200000000000000000000000000000000000006");
pub const WETH_ARBITRUM: Address = address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1");
pub const WMATIC_POLYGON: Address = address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270");
pub const WBNB_BSC: Address = address!("BB4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c");
pub const WAVAX_AVALANCHE: Address = address!("B31f66AA3C1e785363F0875A1B74E27b85FD66c7");

/// Elastic sentinel the router uses for the chain's native asset.
pub const NATIVE_TOKEN_ADDRESS: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

// =============================================================================
// NETWORK CONSTANTS
// =============================================================================

pub const CHAIN_ETHEREUM: u64 = 1;
pub const CHAIN_OPTIMISM: u64 = 10;
pub const CHAIN_BSC: u64 = 56;
pub const CHAIN_POLYGON: u64 = 137;
pub const CHAIN_ARBITRUM: u64 = 42161;
pub const CHAIN_AVALANCHE: u64 = 43114;

// =============================================================================
// SHARED INFRASTRUCTURE (same address on every supported chain)
// =============================================================================

pub const PERMIT2: Address = address!("000000000022D473030F116dDEE9F6B43aC78BA3");
pub const MULTICALL3: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

// =============================================================================
// ROUTER ENCODING CONSTANTS
// =============================================================================

/// Denominator of every basis-point fraction.
pub const BPS_BASE: u16 = 10_000;
/// `balanceBps` value the router reads as "fixed amount".
pub const BPS_NOT_USED: u16 = 0;
/// Offset the router reads as "apply the amount to the call value".
pub const OFFSET_NOT_USED: U256 = U256::MAX;

// =============================================================================
// PERMIT DEFAULTS
// =============================================================================

/// Allowance lifetime granted by a fresh permit detail (30 days).
pub const PERMIT_EXPIRATION_SECS: u64 = 30 * 24 * 60 * 60;
/// How long a signed permit stays submittable (30 minutes).
pub const PERMIT_SIG_DEADLINE_SECS: u64 = 30 * 60;

/// Margin added on top of an observed debt when quoting a repay (1%).
pub const REPAY_MARGIN_BPS: u16 = 100;

// =============================================================================
// LOGGING DEFAULTS
// =============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "info";

struct NativeInfo {
    symbol: &'static str,
    name: &'static str,
    wrapped: Address,
    wrapped_symbol: &'static str,
    wrapped_name: &'static str,
}

lazy_static! {
    static ref NATIVE_BY_CHAIN: HashMap<u64, NativeInfo> = {
        let mut m = HashMap::new();
        m.insert(CHAIN_ETHEREUM, NativeInfo {
            symbol: "ETH", name: "Ethereum",
            wrapped: WETH_MAINNET, wrapped_symbol: "WETH", wrapped_name: "Wrapped Ether",
        });
        m.insert(CHAIN_OPTIMISM, NativeInfo {
            symbol: "ETH", name: "Ethereum",
            wrapped: WETH_OPTIMISM, wrapped_symbol: "WETH", wrapped_name: "Wrapped Ether",
        });
        m.insert(CHAIN_ARBITRUM, NativeInfo {
            symbol: "ETH", name: "Ethereum",
            wrapped: WETH_ARBITRUM, wrapped_symbol: "WETH", wrapped_name: "Wrapped Ether",
        });
        m.insert(CHAIN_POLYGON, NativeInfo {
            symbol: "MATIC", name: "Polygon",
            wrapped: WMATIC_POLYGON, wrapped_symbol: "WMATIC", wrapped_name: "Wrapped Matic",
        });
        m.insert(CHAIN_BSC, NativeInfo {
            symbol: "BNB", name: "BNB",
            wrapped: WBNB_BSC, wrapped_symbol: "WBNB", wrapped_name: "Wrapped BNB",
        });
        m.insert(CHAIN_AVALANCHE, NativeInfo {
            symbol: "AVAX", name: "Avalanche",
            wrapped: WAVAX_AVALANCHE, wrapped_symbol: "WAVAX", wrapped_name: "Wrapped AVAX",
        });
        m
    };
}

pub fn is_supported_chain(chain_id: u64) -> bool {
    NATIVE_BY_CHAIN.contains_key(&chain_id)
}

pub fn wrapped_native_for_chain(chain_id: u64) -> Address {
    NATIVE_BY_CHAIN
        .get(&chain_id)
        .map(|n| n.wrapped)
        .unwrap_or(WETH_MAINNET)
}

/// Native asset of `chain_id`; unknown chains fall back to ETH metadata.
pub fn native_token(chain_id: u64) -> Token {
    let (symbol, name) = NATIVE_BY_CHAIN
        .get(&chain_id)
        .map(|n| (n.symbol, n.name))
        .unwrap_or(("ETH", "Ethereum"));
    Token::native(chain_id, symbol, name)
}

pub fn wrapped_native_token(chain_id: u64) -> Token {
    let (symbol, name) = NATIVE_BY_CHAIN
        .get(&chain_id)
        .map(|n| (n.wrapped_symbol, n.wrapped_name))
        .unwrap_or(("WETH", "Wrapped Ether"));
    Token::new(chain_id, wrapped_native_for_chain(chain_id), 18, symbol, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_native_pairs_with_native() {
        let native = native_token(CHAIN_POLYGON);
        let wrapped = wrapped_native_token(CHAIN_POLYGON);
        assert!(native.is_native);
        assert_eq!(native.symbol, "MATIC");
        assert_eq!(wrapped.address, WMATIC_POLYGON);
        assert!(!wrapped.is_native);
    }

    #[test]
    fn unknown_chain_is_not_supported() {
        assert!(is_supported_chain(CHAIN_ETHEREUM));
        assert!(!is_supported_chain(5));
    }
}
