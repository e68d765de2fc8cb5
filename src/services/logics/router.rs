// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::data::address_book::ChainAddresses;
use crate::data::router::IRouter;
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use alloy::primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;

impl From<&Logic> for IRouter::Logic {
    fn from(logic: &Logic) -> Self {
        let inputs = logic
            .inputs
            .iter()
            .map(|input| {
                let (balance_bps, amount_or_offset) = input.router_words();
                IRouter::Input {
                    token: input.token,
                    balanceBps: balance_bps,
                    amountOrOffset: amount_or_offset,
                }
            })
            .collect();
        IRouter::Logic {
            to: logic.to,
            data: logic.data.clone(),
            inputs,
            wrapMode: logic.wrap_mode.as_u8(),
            approveTo: Address::ZERO,
            callback: logic.callback.unwrap_or(Address::ZERO),
        }
    }
}

/// One router `execute` call carrying an ordered list of logics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterTransactionRequest {
    pub chain_id: u64,
    pub to: Address,
    pub logics: Vec<Logic>,
    pub tokens_return: Vec<Address>,
    pub value: U256,
    pub referral_code: U256,
}

impl RouterTransactionRequest {
    pub fn new(
        chain: &ChainAddresses,
        logics: Vec<Logic>,
        tokens_return: Vec<Address>,
        value: U256,
    ) -> Result<Self, LogicError> {
        if logics.is_empty() {
            return Err(LogicError::field("logics", "router request needs at least one logic"));
        }
        let to = ChainAddresses::require(chain.router, "router")?;
        Ok(Self {
            chain_id: chain.chain_id,
            to,
            logics,
            tokens_return,
            value,
            referral_code: U256::ZERO,
        })
    }

    pub fn with_referral_code(mut self, referral_code: U256) -> Self {
        self.referral_code = referral_code;
        self
    }

    pub fn calldata(&self) -> Bytes {
        IRouter::executeCall {
            logics: self.logics.iter().map(IRouter::Logic::from).collect(),
            tokensReturn: self.tokens_return.clone(),
            referralCode: self.referral_code,
        }
        .abi_encode()
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::logic::{AmountOffset, LogicInput, WrapMode};

    #[test]
    fn execute_calldata_carries_router_words() {
        let mut chain = ChainAddresses::empty(1);
        chain.router = Some(Address::from([0x99; 20]));
        let token = Address::from([0x01; 20]);
        let callback = Address::from([0x02; 20]);
        let logic = Logic::new(Address::from([0x03; 20]), vec![0xde, 0xad])
            .with_inputs(vec![
                LogicInput::fraction(token, 5_000, AmountOffset::At(U256::from(32u64))),
                LogicInput::fixed(token, U256::from(9u64)),
            ])
            .with_wrap_mode(WrapMode::UnwrapAfter)
            .with_callback(callback);

        let request =
            RouterTransactionRequest::new(&chain, vec![logic], vec![token], U256::from(1u64))
                .expect("request");
        assert_eq!(request.to, Address::from([0x99; 20]));

        let decoded = IRouter::executeCall::abi_decode(&request.calldata()).expect("decode");
        let encoded = &decoded.logics[0];
        assert_eq!(encoded.wrapMode, 2);
        assert_eq!(encoded.callback, callback);
        assert_eq!(encoded.approveTo, Address::ZERO);
        assert_eq!(encoded.inputs[0].balanceBps, U256::from(5_000u64));
        assert_eq!(encoded.inputs[0].amountOrOffset, U256::from(32u64));
        assert_eq!(encoded.inputs[1].balanceBps, U256::ZERO);
        assert_eq!(encoded.inputs[1].amountOrOffset, U256::from(9u64));
        assert_eq!(decoded.tokensReturn, vec![token]);
    }

    #[test]
    fn request_requires_router_and_logics() {
        let chain = ChainAddresses::empty(1);
        let logic = Logic::new(Address::ZERO, Bytes::new());
        assert!(matches!(
            RouterTransactionRequest::new(&chain, vec![logic], vec![], U256::ZERO),
            Err(LogicError::MissingAddress("router"))
        ));
        assert!(RouterTransactionRequest::new(&chain, vec![], vec![], U256::ZERO).is_err());
    }
}
