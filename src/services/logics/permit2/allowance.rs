// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::time_utils::deadline_from;
use crate::data::abi::IMulticall3;
use crate::data::multicall::Multicall;
use crate::data::permit2::{IPermit2, PermitDetails};
use crate::domain::constants::{PERMIT_EXPIRATION_SECS, PERMIT_SIG_DEADLINE_SECS};
use crate::domain::error::LogicError;
use crate::domain::token::TokenAmounts;
use alloy::primitives::aliases::{U48, U160};
use alloy::primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;

/// Permit2 allowance granted by `owner` to `spender` for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowance {
    pub amount: U160,
    pub expiration: u64,
    pub nonce: u64,
}

/// Lifetimes applied to fresh permit details and their signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermitWindows {
    pub expiration_secs: u64,
    pub sig_deadline_secs: u64,
}

impl Default for PermitWindows {
    fn default() -> Self {
        Self {
            expiration_secs: PERMIT_EXPIRATION_SECS,
            sig_deadline_secs: PERMIT_SIG_DEADLINE_SECS,
        }
    }
}

/// Reads allowances for many tokens in one round trip.
///
/// Results are aligned with `tokens`; a failure for any token names it.
#[async_trait]
pub trait AllowanceReader: Send + Sync {
    async fn allowances(
        &self,
        owner: Address,
        spender: Address,
        tokens: &[Address],
    ) -> Result<Vec<Allowance>, LogicError>;
}

#[derive(Clone, Debug)]
pub struct MulticallAllowanceReader {
    multicall: Multicall,
    permit2: Address,
}

impl MulticallAllowanceReader {
    pub fn new(multicall: Multicall, permit2: Address) -> Self {
        Self { multicall, permit2 }
    }
}

#[async_trait]
impl AllowanceReader for MulticallAllowanceReader {
    async fn allowances(
        &self,
        owner: Address,
        spender: Address,
        tokens: &[Address],
    ) -> Result<Vec<Allowance>, LogicError> {
        let calls = tokens
            .iter()
            .map(|token| {
                let data = IPermit2::allowanceCall {
                    user: owner,
                    token: *token,
                    spender,
                }
                .abi_encode();
                (self.permit2, Bytes::from(data))
            })
            .collect();
        let results = self.multicall.aggregate(calls).await?;
        decode_allowances(tokens, results)
    }
}

/// Maps batched `allowance` results back onto `tokens`; a reverted or
/// malformed entry fails the whole read and names its token.
pub fn decode_allowances(
    tokens: &[Address],
    results: Vec<IMulticall3::CallResult>,
) -> Result<Vec<Allowance>, LogicError> {
    if tokens.len() != results.len() {
        return Err(LogicError::ChainRead(format!(
            "{} allowance results for {} tokens",
            results.len(),
            tokens.len()
        )));
    }
    tokens
        .iter()
        .zip(results)
        .map(|(token, result)| {
            if !result.success {
                return Err(LogicError::AllowanceRead {
                    token: *token,
                    reason: "call reverted".to_string(),
                });
            }
            let ret = IPermit2::allowanceCall::abi_decode_returns(&result.returnData).map_err(|e| {
                LogicError::AllowanceRead {
                    token: *token,
                    reason: e.to_string(),
                }
            })?;
            Ok(Allowance {
                amount: ret.amount,
                expiration: ret.expiration.to::<u64>(),
                nonce: ret.nonce.to::<u64>(),
            })
        })
        .collect()
}

/// Details for every fund whose allowance is short or expires inside the
/// signature window. Each grants the maximum amount under a fresh expiration
/// and reuses the on-chain nonce.
pub fn select_permit_details(
    erc20_funds: &TokenAmounts,
    allowances: &[Allowance],
    now: u64,
    windows: PermitWindows,
) -> Result<Vec<PermitDetails>, LogicError> {
    if erc20_funds.len() != allowances.len() {
        return Err(LogicError::ChainRead(format!(
            "{} allowances for {} funds",
            allowances.len(),
            erc20_funds.len()
        )));
    }
    let sig_deadline = deadline_from(now, windows.sig_deadline_secs);
    let expiration = deadline_from(now, windows.expiration_secs);

    let details = erc20_funds
        .iter()
        .zip(allowances)
        .filter(|(fund, allowance)| {
            U256::from(allowance.amount) < fund.amount_wei || allowance.expiration <= sig_deadline
        })
        .map(|(fund, allowance)| PermitDetails {
            token: fund.token.address,
            amount: U160::MAX,
            expiration: U48::saturating_from(expiration),
            nonce: U48::saturating_from(allowance.nonce),
        })
        .collect();
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::CHAIN_ETHEREUM;
    use crate::domain::token::{Token, TokenAmount};
    use alloy_sol_types::SolValue;

    const NOW: u64 = 1_700_000_000;

    fn funds(n: u8) -> TokenAmounts {
        (1..=n)
            .map(|i| {
                let token = Token::new(CHAIN_ETHEREUM, Address::from([i; 20]), 18, "T", "Token");
                TokenAmount::from_wei(token, U256::from(100u64))
            })
            .collect()
    }

    fn allowance(amount: u64, expiration: u64, nonce: u64) -> Allowance {
        Allowance {
            amount: U160::from(amount),
            expiration,
            nonce,
        }
    }

    #[test]
    fn sufficient_and_fresh_allowance_needs_no_detail() {
        let windows = PermitWindows::default();
        let fresh = NOW + windows.sig_deadline_secs + 1;
        let details =
            select_permit_details(&funds(1), &[allowance(100, fresh, 3)], NOW, windows).expect("ok");
        assert!(details.is_empty());
    }

    #[test]
    fn short_or_expiring_allowances_get_max_details() {
        let windows = PermitWindows::default();
        let at_deadline = NOW + windows.sig_deadline_secs;
        let far = NOW + windows.expiration_secs;
        let allowances = [
            allowance(99, far, 1),
            allowance(1_000, at_deadline, 7),
            allowance(1_000, far, 2),
        ];
        let details = select_permit_details(&funds(3), &allowances, NOW, windows).expect("ok");

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].token, Address::from([1u8; 20]));
        assert_eq!(details[0].nonce, U48::from(1u64));
        assert_eq!(details[1].token, Address::from([2u8; 20]));
        assert_eq!(details[1].nonce, U48::from(7u64));
        for detail in &details {
            assert_eq!(detail.amount, U160::MAX);
            assert_eq!(detail.expiration, U48::from(NOW + windows.expiration_secs));
        }
    }

    fn encoded(amount: u64, expiration: u64, nonce: u64) -> IMulticall3::CallResult {
        let ret = (U160::from(amount), U48::from(expiration), U48::from(nonce));
        IMulticall3::CallResult {
            success: true,
            returnData: ret.abi_encode_sequence().into(),
        }
    }

    #[test]
    fn decodes_batched_allowances_in_token_order() {
        let tokens = [Address::from([1u8; 20]), Address::from([2u8; 20])];
        let results = vec![encoded(5, 1_000, 2), encoded(0, 0, 0)];
        let allowances = decode_allowances(&tokens, results).expect("decode");
        assert_eq!(allowances, vec![allowance(5, 1_000, 2), allowance(0, 0, 0)]);
    }

    #[test]
    fn reverted_entry_names_its_token() {
        let tokens = [
            Address::from([1u8; 20]),
            Address::from([2u8; 20]),
            Address::from([3u8; 20]),
        ];
        let results = vec![
            encoded(1, 1, 1),
            IMulticall3::CallResult {
                success: false,
                returnData: Bytes::new(),
            },
            encoded(1, 1, 1),
        ];
        let err = decode_allowances(&tokens, results).expect_err("middle read reverted");
        assert!(matches!(err, LogicError::AllowanceRead { token, .. } if token == tokens[1]));
    }

    #[test]
    fn malformed_entry_names_its_token() {
        let tokens = [
            Address::from([1u8; 20]),
            Address::from([2u8; 20]),
            Address::from([3u8; 20]),
        ];
        let results = vec![
            encoded(1, 1, 1),
            IMulticall3::CallResult {
                success: true,
                returnData: Bytes::from(vec![0xde, 0xad]),
            },
            encoded(1, 1, 1),
        ];
        let err = decode_allowances(&tokens, results).expect_err("middle read malformed");
        assert!(matches!(err, LogicError::AllowanceRead { token, .. } if token == tokens[1]));
    }

    #[test]
    fn missing_results_are_rejected() {
        let err = decode_allowances(&[Address::from([1u8; 20])], Vec::new()).expect_err("short");
        assert!(matches!(err, LogicError::ChainRead(_)));
    }

    #[test]
    fn misaligned_results_are_rejected() {
        let result = select_permit_details(&funds(2), &[allowance(0, 0, 0)], NOW, PermitWindows::default());
        assert!(matches!(result, Err(LogicError::ChainRead(_))));
    }
}
