// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::allowance::{AllowanceReader, MulticallAllowanceReader, PermitWindows, select_permit_details};
use super::{PERMIT2_CHAINS, PermitData};
use crate::common::time_utils::{current_unix, deadline_from};
use crate::data::address_book::ChainAddresses;
use crate::data::permit2::IPermit2;
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::domain::token::TokenAmounts;
use crate::services::logics::agent::AccountAgent;
use crate::services::logics::{
    BuildOptions, Capabilities, LogicAdapter, LogicFields, LogicId, ensure_supported_chain,
};
use alloy::primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const ID: LogicId = LogicId::new("permit2", "permit-token");

const SIGNATURE_LEN: usize = 65;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitTokenFields {
    pub permit: PermitData,
    pub signature: Bytes,
}

pub struct PermitTokenLogic<R = MulticallAllowanceReader> {
    chain_id: u64,
    permit2: Address,
    agent: AccountAgent,
    reader: R,
    windows: PermitWindows,
}

impl<R> std::fmt::Debug for PermitTokenLogic<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermitTokenLogic")
            .field("chain_id", &self.chain_id)
            .field("permit2", &self.permit2)
            .field("windows", &self.windows)
            .finish_non_exhaustive()
    }
}

impl<R: AllowanceReader> PermitTokenLogic<R> {
    pub fn new(chain: &ChainAddresses, reader: R, windows: PermitWindows) -> Result<Self, LogicError> {
        ensure_supported_chain(chain.chain_id, PERMIT2_CHAINS)?;
        if windows.sig_deadline_secs >= windows.expiration_secs {
            return Err(LogicError::field(
                "permit_sig_deadline_secs",
                "signature deadline must be shorter than the allowance expiration",
            ));
        }
        Ok(Self {
            chain_id: chain.chain_id,
            permit2: chain.permit2,
            agent: AccountAgent::for_chain(chain)?,
            reader,
            windows,
        })
    }

    pub fn permit2(&self) -> Address {
        self.permit2
    }

    pub fn agent_of(&self, account: Address) -> Address {
        self.agent.agent_of(account)
    }

    pub async fn permit_data(
        &self,
        account: Address,
        erc20_funds: &TokenAmounts,
    ) -> Result<Option<PermitData>, LogicError> {
        self.permit_data_at(account, erc20_funds, current_unix()).await
    }

    /// Which funds need a fresh permit for the account's agent, shaped as a
    /// single or batch payload. `Ok(None)` means nothing to sign.
    pub async fn permit_data_at(
        &self,
        account: Address,
        erc20_funds: &TokenAmounts,
        now: u64,
    ) -> Result<Option<PermitData>, LogicError> {
        if erc20_funds.native().is_some() {
            return Err(LogicError::field("funds", "native funds cannot be permitted"));
        }
        if erc20_funds.is_empty() {
            return Ok(None);
        }

        let spender = self.agent.agent_of(account);
        let tokens: Vec<Address> = erc20_funds.iter().map(|f| f.token.address).collect();
        let allowances = self.reader.allowances(account, spender, &tokens).await?;
        let details = select_permit_details(erc20_funds, &allowances, now, self.windows)?;

        tracing::debug!(
            target: "permit2",
            account = %format!("{:#x}", account),
            funds = erc20_funds.len(),
            details = details.len(),
            "Computed permit details"
        );

        let sig_deadline = U256::from(deadline_from(now, self.windows.sig_deadline_secs));
        Ok(PermitData::from_details(details, spender, sig_deadline))
    }

    /// Encodes the single- or batch-shaped `permit` call for a signed payload.
    pub fn build_permit(
        &self,
        fields: PermitTokenFields,
        account: Address,
    ) -> Result<Logic, LogicError> {
        let PermitTokenFields { permit, signature } = fields;
        if signature.len() != SIGNATURE_LEN {
            return Err(LogicError::field(
                "signature",
                format!("expected {SIGNATURE_LEN} bytes, got {}", signature.len()),
            ));
        }
        let expected_spender = self.agent.agent_of(account);
        if permit.spender() != expected_spender {
            return Err(LogicError::field(
                "permit",
                format!("spender {:#x} is not the account agent", permit.spender()),
            ));
        }

        let data = match permit {
            PermitData::Single(permit_single) => IPermit2::permit_0Call {
                owner: account,
                permitSingle: permit_single,
                signature,
            }
            .abi_encode(),
            PermitData::Batch(permit_batch) => IPermit2::permit_1Call {
                owner: account,
                permitBatch: permit_batch,
                signature,
            }
            .abi_encode(),
        };
        Ok(Logic::new(self.permit2, data))
    }
}

#[async_trait]
impl<R: AllowanceReader> LogicAdapter for PermitTokenLogic<R> {
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
            LogicFields::PermitToken(fields) => self.build_permit(fields, options.require_account()?),
            other => Err(other.mismatch(ID)),
        }
    }
}
