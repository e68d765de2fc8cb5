// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use super::{
    BuildOptions, Capabilities, LogicAdapter, LogicFields, LogicId, QuoteParams, TokenList,
    unsupported,
};
use crate::app::config::GlobalSettings;
use crate::data::address_book::{AddressBook, ChainAddresses};
use crate::data::multicall::Multicall;
use crate::data::token_list::HttpTokenListClient;
use crate::domain::error::{AppError, LogicError};
use crate::domain::logic::Logic;
use crate::network::provider::HttpProvider;
use crate::services::logics::aave::service::AaveService;
use crate::services::logics::aave::{v2_borrow, v3_flash_loan, v3_repay, v3_withdraw};
use crate::services::logics::compound_v3::service::CometService;
use crate::services::logics::compound_v3::withdraw_base;
use crate::services::logics::permit2::allowance::MulticallAllowanceReader;
use crate::services::logics::permit2::{permit_token, pull_token};
use crate::services::logics::balancer_v2;
use crate::services::logics::utility::send_token;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RegisteredLogic {
    pub adapter: Arc<dyn LogicAdapter>,
    pub capabilities: Capabilities,
}

/// Adapters keyed by `protocol:action`, built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct LogicRegistry {
    chain_id: u64,
    entries: BTreeMap<LogicId, RegisteredLogic>,
}

impl LogicRegistry {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            entries: BTreeMap::new(),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Capabilities are read once here; dispatch never asks the adapter again.
    pub fn register(&mut self, adapter: Arc<dyn LogicAdapter>) {
        let id = adapter.id();
        if adapter.chain_id() != self.chain_id {
            tracing::warn!(
                target: "registry",
                logic = %id,
                adapter_chain = adapter.chain_id(),
                registry_chain = self.chain_id,
                "Adapter chain differs from registry chain"
            );
        }
        let capabilities = adapter.capabilities();
        if self
            .entries
            .insert(id, RegisteredLogic { adapter, capabilities })
            .is_some()
        {
            tracing::warn!(target: "registry", logic = %id, "Replaced previously registered logic");
        } else {
            tracing::debug!(target: "registry", logic = %id, %capabilities, "Registered logic");
        }
    }

    /// Registers the result of an adapter constructor, logging and skipping failures.
    pub fn register_or_skip<A>(&mut self, id: LogicId, built: Result<A, LogicError>)
    where
        A: LogicAdapter + 'static,
    {
        match built {
            Ok(adapter) => self.register(Arc::new(adapter)),
            Err(e) => {
                tracing::warn!(target: "registry", logic = %id, error = %e, "Logic unavailable on this chain");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&LogicId, &RegisteredLogic)> {
        self.entries.iter()
    }

    /// Lookup by the `protocol:action` string form.
    pub fn get(&self, id: &str) -> Result<&RegisteredLogic, LogicError> {
        let wanted = id.trim();
        self.entries
            .iter()
            .find(|(key, _)| key.to_string() == wanted)
            .map(|(_, entry)| entry)
            .ok_or_else(|| LogicError::UnknownLogic(wanted.to_string()))
    }

    pub async fn token_list(&self, id: &str) -> Result<TokenList, LogicError> {
        let entry = self.get(id)?;
        if !entry.capabilities.token_list {
            return Err(unsupported(entry.adapter.id(), "token_list"));
        }
        entry.adapter.token_list().await
    }

    pub async fn quote(&self, id: &str, params: QuoteParams) -> Result<LogicFields, LogicError> {
        let entry = self.get(id)?;
        if !entry.capabilities.quote {
            return Err(unsupported(entry.adapter.id(), "quote"));
        }
        entry.adapter.quote(params).await
    }

    pub fn build(
        &self,
        id: &str,
        fields: LogicFields,
        options: &BuildOptions,
    ) -> Result<Logic, LogicError> {
        let entry = self.get(id)?;
        if !entry.capabilities.build {
            return Err(unsupported(entry.adapter.id(), "build"));
        }
        entry.adapter.build(fields, options)
    }

    /// Every bundled adapter for `settings.chain_id`. Adapters whose chain or
    /// addresses are not configured are skipped with a warning.
    pub fn with_defaults(
        settings: &GlobalSettings,
        book: &AddressBook,
        provider: HttpProvider,
    ) -> Result<Self, AppError> {
        let chain = book.chain(settings.chain_id);
        let multicall = Multicall::new(provider, chain.multicall3);
        let lists = HttpTokenListClient::new(settings.http_timeout())?;
        let mut registry = Self::new(settings.chain_id);

        registry.register_or_skip(
            permit_token::ID,
            permit_token::PermitTokenLogic::new(
                &chain,
                MulticallAllowanceReader::new(multicall.clone(), chain.permit2),
                settings.permit_windows(),
            ),
        );
        registry.register_or_skip(pull_token::ID, pull_token::PullTokenLogic::new(&chain));

        register_aave(&mut registry, &chain, &multicall, settings.repay_margin_bps);

        registry.register_or_skip(
            withdraw_base::ID,
            withdraw_base::WithdrawBaseLogic::new(
                &chain,
                CometService::new(chain.chain_id, multicall.clone()),
            ),
        );
        registry.register_or_skip(
            balancer_v2::flash_loan::ID,
            balancer_v2::flash_loan::FlashLoanLogic::new(&chain, lists.clone()),
        );
        registry.register_or_skip(
            send_token::ID,
            send_token::SendTokenLogic::new(&chain, lists),
        );

        tracing::info!(
            target: "registry",
            chain_id = settings.chain_id,
            logics = registry.len(),
            "Logic registry ready"
        );
        Ok(registry)
    }
}

fn register_aave(
    registry: &mut LogicRegistry,
    chain: &ChainAddresses,
    multicall: &Multicall,
    margin_bps: u16,
) {
    match chain.aave_v2_data_provider {
        Some(provider) => {
            let v2 = AaveService::new(chain.chain_id, provider, multicall.clone());
            registry.register_or_skip(v2_borrow::ID, v2_borrow::BorrowLogic::new(chain, v2));
        }
        None => {
            tracing::warn!(target: "registry", logic = %v2_borrow::ID, "aave_v2_data_provider not configured");
        }
    }

    let Some(provider) = chain.aave_v3_data_provider else {
        tracing::warn!(target: "registry", protocol = "aave-v3", "aave_v3_data_provider not configured");
        return;
    };
    let v3 = AaveService::new(chain.chain_id, provider, multicall.clone());
    registry.register_or_skip(
        v3_repay::ID,
        v3_repay::RepayLogic::new(chain, v3.clone(), margin_bps),
    );
    registry.register_or_skip(
        v3_withdraw::ID,
        v3_withdraw::WithdrawLogic::new(chain, v3.clone()),
    );
    registry.register_or_skip(
        v3_flash_loan::ID,
        v3_flash_loan::FlashLoanLogic::new(chain, v3),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::{
        CHAIN_ETHEREUM, PERMIT_EXPIRATION_SECS, PERMIT_SIG_DEADLINE_SECS, REPAY_MARGIN_BPS,
        native_token,
    };
    use crate::domain::token::Token;
    use crate::network::provider::ConnectionFactory;
    use crate::services::logics::aave::InterestRateMode;
    use alloy::primitives::{Address, B256, Bytes};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Stub {
        id: LogicId,
        caps: Capabilities,
    }

    #[async_trait]
    impl LogicAdapter for Stub {
        fn id(&self) -> LogicId {
            self.id
        }

        fn chain_id(&self) -> u64 {
            CHAIN_ETHEREUM
        }

        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        async fn token_list(&self) -> Result<TokenList, LogicError> {
            Ok(TokenList::Tokens(vec![Token::new(
                CHAIN_ETHEREUM,
                Address::from([1u8; 20]),
                18,
                "T",
                "Test",
            )]))
        }

        fn build(&self, _fields: LogicFields, _options: &BuildOptions) -> Result<Logic, LogicError> {
            Ok(Logic::new(Address::from([2u8; 20]), Bytes::new()))
        }
    }

    fn registry() -> LogicRegistry {
        let mut registry = LogicRegistry::new(CHAIN_ETHEREUM);
        registry.register(Arc::new(Stub {
            id: LogicId::new("stub", "listed"),
            caps: Capabilities::BUILD.with_token_list(),
        }));
        registry.register(Arc::new(Stub {
            id: LogicId::new("stub", "plain"),
            caps: Capabilities::BUILD,
        }));
        registry
    }

    fn pull_fields() -> LogicFields {
        LogicFields::PullToken(pull_token::PullTokenFields {
            inputs: Default::default(),
        })
    }

    #[tokio::test]
    async fn dispatch_honours_registered_capabilities() {
        let registry = registry();
        assert_eq!(registry.token_list("stub:listed").await.expect("list").len(), 1);

        // The stub implements token_list, but the flag was not declared.
        let err = registry.token_list("stub:plain").await.expect_err("flag off");
        assert!(matches!(err, LogicError::UnsupportedOperation { ref operation, .. } if operation == "token_list"));

        let params = QuoteParams::AaveV3Repay(v3_repay::RepayParams {
            borrower: Address::from([3u8; 20]),
            token_in: native_token(CHAIN_ETHEREUM),
            interest_rate_mode: InterestRateMode::Variable,
        });
        let err = registry.quote("stub:listed", params).await.expect_err("no quote");
        assert!(matches!(err, LogicError::UnsupportedOperation { .. }));

        assert!(registry.build("stub:plain", pull_fields(), &BuildOptions::default()).is_ok());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let err = registry().get("nope:missing").expect_err("missing");
        assert!(matches!(err, LogicError::UnknownLogic(ref id) if id == "nope:missing"));
    }

    #[test]
    fn failed_constructors_are_skipped() {
        let mut registry = LogicRegistry::new(CHAIN_ETHEREUM);
        registry.register_or_skip(
            pull_token::ID,
            pull_token::PullTokenLogic::new(&ChainAddresses::empty(CHAIN_ETHEREUM)),
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn defaults_cover_configured_protocols() {
        let settings = GlobalSettings {
            chain_id: CHAIN_ETHEREUM,
            http_provider: "http://127.0.0.1:8545".into(),
            log_level: "info".into(),
            log_json: false,
            address_book_path: None,
            permit_expiration_secs: PERMIT_EXPIRATION_SECS,
            permit_sig_deadline_secs: PERMIT_SIG_DEADLINE_SECS,
            repay_margin_bps: REPAY_MARGIN_BPS,
            http_timeout_secs: 5,
        };
        let mut book = AddressBook::with_defaults(&[CHAIN_ETHEREUM]);
        let mut chain = book.chain(CHAIN_ETHEREUM);
        chain.router = Some(Address::from([0xaa; 20]));
        chain.agent_init_code_hash = Some(B256::repeat_byte(0x11));
        chain.aave_v3_flash_loan_callback = Some(Address::from([0xcb; 20]));
        chain.balancer_v2_flash_loan_callback = Some(Address::from([0xcc; 20]));
        book.insert(chain);

        let provider = ConnectionFactory::http(&settings.http_provider).expect("provider");
        let registry = LogicRegistry::with_defaults(&settings, &book, provider).expect("registry");
        let ids: Vec<String> = registry.entries().map(|(id, _)| id.to_string()).collect();
        for expected in [
            "permit2:permit-token",
            "permit2:pull-token",
            "aave-v2:borrow",
            "aave-v3:repay",
            "aave-v3:withdraw",
            "aave-v3:flash-loan",
            "compound-v3:withdraw-base",
            "balancer-v2:flash-loan",
            "utility:send-token",
        ] {
            assert!(ids.iter().any(|id| id == expected), "missing {expected}");
        }
        let repay = registry.get("aave-v3:repay").expect("repay");
        assert!(repay.capabilities.quote);
    }
}
