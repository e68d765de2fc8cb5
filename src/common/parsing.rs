// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::AppError;
use alloy::primitives::{Address, Bytes, U256};
use std::str::FromStr;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

pub fn parse_hex_bytes(s: &str) -> Option<Bytes> {
    hex::decode(strip_0x(s.trim())).ok().map(Bytes::from)
}

pub fn parse_address_hex(s: &str) -> Option<Address> {
    Address::from_str(strip_0x(s.trim())).ok()
}

/// Decimal by default, hex with a `0x` prefix.
pub fn parse_amount_wei(s: &str) -> Option<U256> {
    let s = s.trim();
    if s.starts_with("0x") || s.starts_with("0X") {
        U256::from_str_radix(strip_0x(s), 16).ok()
    } else {
        U256::from_str_radix(s, 10).ok()
    }
}

/// `token:amountWei`, e.g. `0x6B17...1d0F:1000000000000000000`.
pub fn parse_fund(raw: &str) -> Result<(Address, U256), AppError> {
    let invalid = |message: &str| AppError::Validation {
        field: "fund".into(),
        message: format!("{raw}: {message}"),
    };
    let (token, amount) = raw
        .split_once(':')
        .ok_or_else(|| invalid("expected token:amountWei"))?;
    let token = parse_address_hex(token).ok_or_else(|| invalid("invalid token address"))?;
    let amount = parse_amount_wei(amount).ok_or_else(|| invalid("invalid amount"))?;
    Ok((token, amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsers_accept_lower_and_upper_prefixes() {
        assert_eq!(parse_amount_wei("0x2a"), Some(U256::from(42u64)));
        assert_eq!(parse_amount_wei("0X2a"), Some(U256::from(42u64)));
        assert_eq!(parse_amount_wei("100"), Some(U256::from(100u64)));
        assert_eq!(parse_hex_bytes("0Xabcd"), Some(Bytes::from(vec![0xab, 0xcd])));
        assert!(parse_address_hex("0x6b175474e89094c44da98b954eedeac495271d0f").is_some());
    }

    #[test]
    fn fund_requires_token_and_amount() {
        let (token, amount) =
            parse_fund("0x6B175474E89094C44Da98b954EedeAC495271d0F:1000").expect("fund");
        assert_eq!(
            token,
            Address::from_str("0x6B175474E89094C44Da98b954EedeAC495271d0F").expect("addr")
        );
        assert_eq!(amount, U256::from(1000u64));

        assert!(parse_fund("0x6B175474E89094C44Da98b954EedeAC495271d0F").is_err());
        assert!(parse_fund("nope:1").is_err());
        assert!(parse_fund("0x6B175474E89094C44Da98b954EedeAC495271d0F:-1").is_err());
    }
}
