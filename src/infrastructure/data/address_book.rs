// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::{self, CHAIN_BSC, CHAIN_ETHEREUM, MULTICALL3, PERMIT2};
use crate::domain::error::{AppError, LogicError};
use crate::network::provider::HttpProvider;
use alloy::primitives::{Address, B256, address};
use alloy::providers::Provider;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Contract addresses one chain's adapters are wired against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainAddresses {
    pub chain_id: u64,
    pub router: Option<Address>,
    pub agent_init_code_hash: Option<B256>,
    pub permit2: Address,
    pub multicall3: Address,
    pub aave_v2_lending_pool: Option<Address>,
    pub aave_v2_data_provider: Option<Address>,
    pub aave_v2_flash_loan_callback: Option<Address>,
    pub aave_v3_pool: Option<Address>,
    pub aave_v3_data_provider: Option<Address>,
    pub aave_v3_flash_loan_callback: Option<Address>,
    pub balancer_v2_vault: Option<Address>,
    pub balancer_v2_flash_loan_callback: Option<Address>,
    pub compound_v3_markets: BTreeMap<String, Address>,
}

impl ChainAddresses {
    pub fn empty(chain_id: u64) -> Self {
        Self {
            chain_id,
            router: None,
            agent_init_code_hash: None,
            permit2: PERMIT2,
            multicall3: MULTICALL3,
            aave_v2_lending_pool: None,
            aave_v2_data_provider: None,
            aave_v2_flash_loan_callback: None,
            aave_v3_pool: None,
            aave_v3_data_provider: None,
            aave_v3_flash_loan_callback: None,
            balancer_v2_vault: None,
            balancer_v2_flash_loan_callback: None,
            compound_v3_markets: BTreeMap::new(),
        }
    }

    /// Built-in protocol deployments; router and callbacks are deployment specific.
    pub fn defaults(chain_id: u64) -> Self {
        let mut c = Self::empty(chain_id);
        if constants::is_supported_chain(chain_id) && chain_id != CHAIN_BSC {
            c.balancer_v2_vault = Some(address!("BA12222222228d8Ba445958a75a0704d566BF2C8"));
        }
        if chain_id == CHAIN_ETHEREUM {
            c.aave_v2_lending_pool = Some(address!("7d2768dE32b0b80b7a3454c06BdAc94A69DDc7A9"));
            c.aave_v2_data_provider = Some(address!("057835Ad21a177dbdd3090bB1CAE03EaCF78Fc6d"));
            c.aave_v3_pool = Some(address!("87870Bca3F3fD6335C3F4ce8392D69350B4fA4E2"));
            c.aave_v3_data_provider = Some(address!("7B4EB56E7CD4b454BA8ff71E4518426369a138a3"));
            c.compound_v3_markets.insert(
                "USDC".to_string(),
                address!("c3d688B66703497DAA19211EEdff47f25384cdc3"),
            );
            c.compound_v3_markets.insert(
                "ETH".to_string(),
                address!("A17581A9E3356d9A858b789D68B4d866e593aE94"),
            );
        }
        c
    }

    pub fn require(value: Option<Address>, name: &'static str) -> Result<Address, LogicError> {
        value.ok_or(LogicError::MissingAddress(name))
    }

    pub fn compound_v3_market(&self, market_id: &str) -> Result<Address, LogicError> {
        self.compound_v3_markets
            .get(market_id)
            .copied()
            .ok_or_else(|| LogicError::UnknownMarket(market_id.to_string()))
    }

    /// Drops configured protocol addresses that have no bytecode on the connected chain.
    pub async fn validate_with_provider(mut self, provider: &HttpProvider) -> Self {
        self.aave_v2_lending_pool =
            validate_optional(provider, self.aave_v2_lending_pool, "aave_v2_lending_pool").await;
        self.aave_v2_data_provider =
            validate_optional(provider, self.aave_v2_data_provider, "aave_v2_data_provider").await;
        self.aave_v3_pool = validate_optional(provider, self.aave_v3_pool, "aave_v3_pool").await;
        self.aave_v3_data_provider =
            validate_optional(provider, self.aave_v3_data_provider, "aave_v3_data_provider").await;
        self.balancer_v2_vault =
            validate_optional(provider, self.balancer_v2_vault, "balancer_v2_vault").await;

        let mut markets = BTreeMap::new();
        for (id, comet) in std::mem::take(&mut self.compound_v3_markets) {
            if has_code(provider, comet).await {
                markets.insert(id, comet);
            } else {
                tracing::warn!(
                    target: "address_book",
                    address = %format!("{:#x}", comet),
                    market = %id,
                    "Comet market has no code; dropping"
                );
            }
        }
        self.compound_v3_markets = markets;
        self
    }
}

#[derive(Deserialize, Debug)]
struct AddressBookFile {
    chains: HashMap<String, ChainAddressesFile>,
}

#[derive(Deserialize, Debug, Default)]
struct ChainAddressesFile {
    router: Option<String>,
    agent_init_code_hash: Option<String>,
    permit2: Option<String>,
    multicall3: Option<String>,
    aave_v2_lending_pool: Option<String>,
    aave_v2_data_provider: Option<String>,
    aave_v2_flash_loan_callback: Option<String>,
    aave_v3_pool: Option<String>,
    aave_v3_data_provider: Option<String>,
    aave_v3_flash_loan_callback: Option<String>,
    balancer_v2_vault: Option<String>,
    balancer_v2_flash_loan_callback: Option<String>,
    #[serde(default)]
    compound_v3_markets: HashMap<String, String>,
}

/// Chain id → addresses, built once at startup and shared read-only.
#[derive(Clone, Debug, Default)]
pub struct AddressBook {
    chains: HashMap<u64, ChainAddresses>,
}

impl AddressBook {
    pub fn with_defaults(chain_ids: &[u64]) -> Self {
        let chains = chain_ids
            .iter()
            .map(|id| (*id, ChainAddresses::defaults(*id)))
            .collect();
        Self { chains }
    }

    pub fn insert(&mut self, addresses: ChainAddresses) {
        self.chains.insert(addresses.chain_id, addresses);
    }

    /// Layer a JSON override file on top of the built-in defaults.
    pub fn load_from_file(path: &str) -> Result<Self, AppError> {
        let p = Path::new(path);
        if !p.exists() {
            return Err(AppError::Config(format!("Address book not found: {}", path)));
        }
        let raw = fs::read_to_string(p)
            .map_err(|e| AppError::Config(format!("Failed to read address book {}: {e}", path)))?;
        Self::from_json(&raw)
            .map_err(|e| AppError::Config(format!("Failed to parse address book {}: {e}", path)))
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let file: AddressBookFile =
            serde_json::from_str(raw).map_err(|e| AppError::Config(e.to_string()))?;

        let mut chains: HashMap<u64, ChainAddresses> = HashMap::new();
        for (chain_str, c) in file.chains {
            let Ok(chain_id) = chain_str.parse::<u64>() else {
                tracing::warn!(target: "address_book", chain = %chain_str, "Skipping non-numeric chain key");
                continue;
            };
            let mut entry = ChainAddresses::defaults(chain_id);
            merge_opt(&mut entry.router, c.router, "router");
            if let Some(raw_hash) = c.agent_init_code_hash {
                entry.agent_init_code_hash = Some(B256::from_str(raw_hash.trim()).map_err(|e| {
                    AppError::Config(format!("Invalid agent_init_code_hash {raw_hash}: {e}"))
                })?);
            }
            if let Some(addr) = parse_address(c.permit2.as_deref(), "permit2") {
                entry.permit2 = addr;
            }
            if let Some(addr) = parse_address(c.multicall3.as_deref(), "multicall3") {
                entry.multicall3 = addr;
            }
            merge_opt(&mut entry.aave_v2_lending_pool, c.aave_v2_lending_pool, "aave_v2_lending_pool");
            merge_opt(&mut entry.aave_v2_data_provider, c.aave_v2_data_provider, "aave_v2_data_provider");
            merge_opt(
                &mut entry.aave_v2_flash_loan_callback,
                c.aave_v2_flash_loan_callback,
                "aave_v2_flash_loan_callback",
            );
            merge_opt(&mut entry.aave_v3_pool, c.aave_v3_pool, "aave_v3_pool");
            merge_opt(&mut entry.aave_v3_data_provider, c.aave_v3_data_provider, "aave_v3_data_provider");
            merge_opt(
                &mut entry.aave_v3_flash_loan_callback,
                c.aave_v3_flash_loan_callback,
                "aave_v3_flash_loan_callback",
            );
            merge_opt(&mut entry.balancer_v2_vault, c.balancer_v2_vault, "balancer_v2_vault");
            merge_opt(
                &mut entry.balancer_v2_flash_loan_callback,
                c.balancer_v2_flash_loan_callback,
                "balancer_v2_flash_loan_callback",
            );
            for (market, raw_addr) in c.compound_v3_markets {
                if let Some(addr) = parse_address(Some(&raw_addr), "compound_v3_markets") {
                    entry.compound_v3_markets.insert(market, addr);
                }
            }
            chains.insert(chain_id, entry);
        }

        Ok(Self { chains })
    }

    /// Addresses for `chain_id`, falling back to built-in defaults.
    pub fn chain(&self, chain_id: u64) -> ChainAddresses {
        self.chains
            .get(&chain_id)
            .cloned()
            .unwrap_or_else(|| ChainAddresses::defaults(chain_id))
    }
}

fn parse_address(raw: Option<&str>, label: &str) -> Option<Address> {
    let s = raw?.trim();
    match Address::from_str(s) {
        Ok(addr) => Some(addr),
        Err(e) => {
            tracing::warn!(target: "address_book", value = %s, label, error = %e, "Invalid address; ignoring");
            None
        }
    }
}

fn merge_opt(slot: &mut Option<Address>, raw: Option<String>, label: &str) {
    if let Some(addr) = parse_address(raw.as_deref(), label) {
        *slot = Some(addr);
    }
}

async fn validate_optional(
    provider: &HttpProvider,
    addr: Option<Address>,
    label: &str,
) -> Option<Address> {
    let a = addr?;
    if has_code(provider, a).await {
        Some(a)
    } else {
        tracing::warn!(
            target: "address_book",
            address = %format!("{:#x}", a),
            label,
            "Address has no code; dropping"
        );
        None
    }
}

async fn has_code(provider: &HttpProvider, addr: Address) -> bool {
    match provider.get_code_at(addr).await {
        Ok(code) => !code.is_empty(),
        Err(e) => {
            tracing::warn!(
                target: "address_book",
                address = %format!("{:#x}", addr),
                error = %e,
                "Failed to fetch code; treating as invalid"
            );
            false
        }
    }
}
