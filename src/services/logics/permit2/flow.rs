// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::PermitData;
use super::allowance::AllowanceReader;
use super::permit_token::{PermitTokenFields, PermitTokenLogic};
use crate::domain::error::LogicError;
use crate::domain::logic::Logic;
use crate::domain::token::TokenAmounts;
use alloy::primitives::{Address, Bytes};

/// Where one account's permit batch stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermitState {
    NotChecked,
    /// Terminal: allowances already cover the funds.
    NoPermitNeeded,
    PermitRequired(PermitData),
    Signed {
        permit: PermitData,
        signature: Bytes,
    },
    /// Terminal: the permit call is part of the transaction.
    Submitted(Logic),
}

impl PermitState {
    pub fn name(&self) -> &'static str {
        match self {
            PermitState::NotChecked => "not_checked",
            PermitState::NoPermitNeeded => "no_permit_needed",
            PermitState::PermitRequired(_) => "permit_required",
            PermitState::Signed { .. } => "signed",
            PermitState::Submitted(_) => "submitted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PermitState::NoPermitNeeded | PermitState::Submitted(_))
    }
}

/// Drives `NotChecked → (NoPermitNeeded | PermitRequired) → Signed → Submitted`.
#[derive(Debug, Clone)]
pub struct PermitFlow {
    account: Address,
    state: PermitState,
}

impl PermitFlow {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            state: PermitState::NotChecked,
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn state(&self) -> &PermitState {
        &self.state
    }

    /// The payload awaiting a signature, if any.
    pub fn pending_permit(&self) -> Option<&PermitData> {
        match &self.state {
            PermitState::PermitRequired(permit) => Some(permit),
            _ => None,
        }
    }

    pub async fn check<R: AllowanceReader>(
        &mut self,
        logic: &PermitTokenLogic<R>,
        erc20_funds: &TokenAmounts,
    ) -> Result<&PermitState, LogicError> {
        self.expect_state("check", |s| matches!(s, PermitState::NotChecked))?;
        let permit = logic.permit_data(self.account, erc20_funds).await?;
        self.record_check(permit)
    }

    /// Applies an allowance check computed elsewhere.
    pub fn record_check(&mut self, permit: Option<PermitData>) -> Result<&PermitState, LogicError> {
        self.expect_state("check", |s| matches!(s, PermitState::NotChecked))?;
        self.state = match permit {
            None => PermitState::NoPermitNeeded,
            Some(permit) => PermitState::PermitRequired(permit),
        };
        tracing::debug!(target: "permit2", state = self.state.name(), "Permit check recorded");
        Ok(&self.state)
    }

    pub fn sign(&mut self, signature: Bytes) -> Result<&PermitState, LogicError> {
        self.expect_state("sign", |s| matches!(s, PermitState::PermitRequired(_)))?;
        if let PermitState::PermitRequired(permit) =
            std::mem::replace(&mut self.state, PermitState::NotChecked)
        {
            self.state = PermitState::Signed { permit, signature };
        }
        Ok(&self.state)
    }

    /// Builds the permit logic. `Ok(None)` when no permit was needed.
    pub fn submit<R: AllowanceReader>(
        &mut self,
        logic: &PermitTokenLogic<R>,
    ) -> Result<Option<Logic>, LogicError> {
        if matches!(self.state, PermitState::NoPermitNeeded) {
            return Ok(None);
        }
        self.expect_state("submit", |s| matches!(s, PermitState::Signed { .. }))?;
        let PermitState::Signed { permit, signature } = &self.state else {
            return Ok(None);
        };
        let built = logic.build_permit(
            PermitTokenFields {
                permit: permit.clone(),
                signature: signature.clone(),
            },
            self.account,
        )?;
        self.state = PermitState::Submitted(built.clone());
        Ok(Some(built))
    }

    fn expect_state(
        &self,
        action: &'static str,
        allowed: impl Fn(&PermitState) -> bool,
    ) -> Result<(), LogicError> {
        if allowed(&self.state) {
            Ok(())
        } else {
            Err(LogicError::InvalidPermitTransition {
                from: self.state.name(),
                action,
            })
        }
    }
}
