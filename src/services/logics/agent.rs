// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::data::address_book::ChainAddresses;
use crate::domain::error::LogicError;
use alloy::primitives::{Address, B256};

/// The router deploys one agent per account; permits and withdrawals target it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountAgent {
    router: Address,
    init_code_hash: B256,
}

impl AccountAgent {
    pub fn new(router: Address, init_code_hash: B256) -> Self {
        Self {
            router,
            init_code_hash,
        }
    }

    pub fn for_chain(chain: &ChainAddresses) -> Result<Self, LogicError> {
        let router = ChainAddresses::require(chain.router, "router")?;
        let init_code_hash = chain
            .agent_init_code_hash
            .ok_or(LogicError::MissingAddress("agent_init_code_hash"))?;
        Ok(Self::new(router, init_code_hash))
    }

    pub fn router(&self) -> Address {
        self.router
    }

    /// CREATE2 address with salt `bytes32(bytes20(account))`.
    pub fn agent_of(&self, account: Address) -> Address {
        let mut salt = [0u8; 32];
        salt[..20].copy_from_slice(account.as_slice());
        self.router.create2(salt, self.init_code_hash.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::keccak256;

    #[test]
    fn agent_matches_create2_formula() {
        let router = Address::from([0x11; 20]);
        let hash = keccak256(b"agent");
        let account = Address::from([0x22; 20]);
        let agent = AccountAgent::new(router, hash).agent_of(account);

        let mut preimage = Vec::with_capacity(85);
        preimage.push(0xff);
        preimage.extend_from_slice(router.as_slice());
        preimage.extend_from_slice(account.as_slice());
        preimage.extend_from_slice(&[0u8; 12]);
        preimage.extend_from_slice(hash.as_slice());
        let expected = Address::from_slice(&keccak256(&preimage)[12..]);
        assert_eq!(agent, expected);
    }

    #[test]
    fn distinct_accounts_get_distinct_agents() {
        let agent = AccountAgent::new(Address::from([1u8; 20]), B256::repeat_byte(7));
        assert_ne!(
            agent.agent_of(Address::from([2u8; 20])),
            agent.agent_of(Address::from([3u8; 20]))
        );
    }

    #[test]
    fn chain_without_router_cannot_resolve_agents() {
        let chain = ChainAddresses::empty(1);
        assert!(matches!(
            AccountAgent::for_chain(&chain),
            Err(LogicError::MissingAddress("router"))
        ));
    }
}
