// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::PERMIT2_CHAINS;
use crate::data::address_book::ChainAddresses;
use crate::data::permit2::{AllowanceTransferDetails, IPermit2};
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::domain::token::TokenAmounts;
use crate::services::logics::agent::AccountAgent;
use crate::services::logics::{
    BuildOptions, Capabilities, LogicAdapter, LogicFields, LogicId, ensure_supported_chain,
};
use alloy::primitives::{Address, U256};
use alloy::primitives::aliases::U160;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const ID: LogicId = LogicId::new("permit2", "pull-token");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullTokenFields {
    pub inputs: TokenAmounts,
}

/// Moves permitted ERC-20 funds from the account into its agent.
#[derive(Debug, Clone)]
pub struct PullTokenLogic {
    chain_id: u64,
    permit2: Address,
    agent: AccountAgent,
}

impl PullTokenLogic {
    pub fn new(chain: &ChainAddresses) -> Result<Self, LogicError> {
        ensure_supported_chain(chain.chain_id, PERMIT2_CHAINS)?;
        Ok(Self {
            chain_id: chain.chain_id,
            permit2: chain.permit2,
            agent: AccountAgent::for_chain(chain)?,
        })
    }

    pub fn build_pull(&self, fields: PullTokenFields, account: Address) -> Result<Logic, LogicError> {
        if fields.inputs.is_empty() {
            return Err(LogicError::field("inputs", "nothing to pull"));
        }
        if let Some(native) = fields.inputs.native() {
            return Err(LogicError::field(
                "inputs",
                format!("{} is native and is sent as value, not pulled", native.token.symbol),
            ));
        }

        let to = self.agent.agent_of(account);
        let details = fields
            .inputs
            .iter()
            .map(|input| {
                if input.amount_wei > U256::from(U160::MAX) {
                    return Err(LogicError::field(
                        "inputs",
                        format!("{} amount exceeds uint160", input.token.symbol),
                    ));
                }
                Ok(AllowanceTransferDetails {
                    from: account,
                    to,
                    amount: U160::from(input.amount_wei),
                    token: input.token.address,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data = IPermit2::transferFromCall {
            transferDetails: details,
        }
        .abi_encode();
        Ok(Logic::new(self.permit2, data))
    }
}

#[async_trait]
impl LogicAdapter for PullTokenLogic {
    fn id(&self) -> LogicId {
        ID
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BUILD
    }

    fn build(&self, fields: LogicFields, options: &BuildOptions) -> Result<Logic, LogicError> {
        match fields {
            LogicFields::PullToken(fields) => self.build_pull(fields, options.require_account()?),
            other => Err(other.mismatch(ID)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::{CHAIN_ETHEREUM, native_token};
    use crate::domain::token::{Token, TokenAmount};
    use alloy::primitives::B256;

    fn logic() -> PullTokenLogic {
        let mut chain = ChainAddresses::empty(CHAIN_ETHEREUM);
        chain.router = Some(Address::from([0x10; 20]));
        chain.agent_init_code_hash = Some(B256::repeat_byte(0x42));
        PullTokenLogic::new(&chain).expect("logic")
    }

    #[test]
    fn pulls_every_erc20_into_the_agent() {
        let logic = logic();
        let account = Address::from([7u8; 20]);
        let inputs: TokenAmounts = (1u8..=2)
            .map(|i| {
                let token = Token::new(CHAIN_ETHEREUM, Address::from([i; 20]), 18, "T", "T");
                TokenAmount::from_wei(token, U256::from(u64::from(i) * 10))
            })
            .collect();

        let built = logic
            .build(
                LogicFields::PullToken(PullTokenFields { inputs }),
                &BuildOptions::for_account(account),
            )
            .expect("build");
        let call = IPermit2::transferFromCall::abi_decode(&built.data).expect("decode");
        assert_eq!(call.transferDetails.len(), 2);
        for detail in &call.transferDetails {
            assert_eq!(detail.from, account);
            assert_eq!(detail.to, logic.agent.agent_of(account));
        }
        assert_eq!(call.transferDetails[1].amount, U160::from(20u64));
    }

    #[test]
    fn native_input_is_rejected() {
        let inputs: TokenAmounts =
            std::iter::once(TokenAmount::from_wei(native_token(CHAIN_ETHEREUM), U256::from(1u64)))
                .collect();
        let err = logic()
            .build_pull(PullTokenFields { inputs }, Address::from([7u8; 20]))
            .expect_err("native");
        assert!(matches!(err, LogicError::FieldValidation { .. }));
    }
}
