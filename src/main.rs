// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::Address;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use router_logics::app::config::GlobalSettings;
use router_logics::app::logging::setup_logging;
use router_logics::common::parsing::{parse_address_hex, parse_fund};
use router_logics::data::multicall::Multicall;
use router_logics::domain::constants::{NATIVE_TOKEN_ADDRESS, native_token};
use router_logics::domain::token::{Token, TokenAmount, TokenAmounts};
use router_logics::logics::aave::InterestRateMode;
use router_logics::logics::aave::v3_repay::{self, RepayParams};
use router_logics::logics::permit2::allowance::MulticallAllowanceReader;
use router_logics::logics::permit2::permit_token::PermitTokenLogic;
use router_logics::logics::{LogicRegistry, QuoteParams};
use router_logics::network::provider::ConnectionFactory;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "router logic adapters")]
struct Cli {
    /// Path to config file (default: config.{toml,yaml,...})
    #[arg(long)]
    config: Option<String>,

    /// Chain id (overrides config/env)
    #[arg(long)]
    chain_id: Option<u64>,

    /// HTTP RPC endpoint (overrides config/env)
    #[arg(long)]
    rpc_url: Option<String>,

    /// Emit JSON logs
    #[arg(long, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered logics and their capabilities
    Logics,
    /// Fetch the token list of a logic, e.g. `aave-v3:repay`
    TokenList { logic: String },
    /// Compute the Permit2 payload the account must sign for its funds
    PermitData {
        #[arg(long)]
        account: String,
        /// `token:amountWei`, repeatable
        #[arg(long = "fund", required = true)]
        funds: Vec<String>,
    },
    /// Quote an Aave v3 repay for the borrower's outstanding debt
    QuoteRepay {
        #[arg(long)]
        borrower: String,
        /// Token address; the elastic address selects the native token
        #[arg(long)]
        token: String,
        #[arg(long, default_value = "variable")]
        mode: InterestRateMode,
    },
}

#[derive(Serialize)]
struct LogicSummary {
    id: String,
    capabilities: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn address_arg(raw: &str, name: &str) -> Result<Address> {
    match parse_address_hex(raw) {
        Some(addr) => Ok(addr),
        None => bail!("--{name}: invalid address {raw}"),
    }
}

async fn resolve_tokens(
    multicall: &Multicall,
    chain_id: u64,
    addresses: &[Address],
) -> Result<Vec<Token>> {
    let erc20: Vec<Address> = addresses
        .iter()
        .copied()
        .filter(|a| *a != NATIVE_TOKEN_ADDRESS)
        .collect();
    let mut metadata = multicall.token_metadata(chain_id, &erc20).await?.into_iter();
    let mut tokens = Vec::with_capacity(addresses.len());
    for addr in addresses {
        if *addr == NATIVE_TOKEN_ADDRESS {
            tokens.push(native_token(chain_id));
        } else {
            tokens.push(metadata.next().context("token metadata missing")?);
        }
    }
    Ok(tokens)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = GlobalSettings::load_unvalidated(cli.config.as_deref())?;
    if let Some(chain_id) = cli.chain_id {
        settings.chain_id = chain_id;
    }
    if let Some(url) = cli.rpc_url {
        settings.http_provider = url;
    }
    if cli.log_json {
        settings.log_json = true;
    }
    settings.validate()?;
    setup_logging(&settings.log_level, settings.log_json);

    let book = settings.address_book()?;
    let chain = book.chain(settings.chain_id);
    let provider = ConnectionFactory::http(&settings.http_provider)?;

    match cli.command {
        Command::Logics => {
            let registry = LogicRegistry::with_defaults(&settings, &book, provider)?;
            let summary: Vec<LogicSummary> = registry
                .entries()
                .map(|(id, entry)| LogicSummary {
                    id: id.to_string(),
                    capabilities: entry.capabilities.to_string(),
                })
                .collect();
            print_json(&summary)?;
        }
        Command::TokenList { logic } => {
            let registry = LogicRegistry::with_defaults(&settings, &book, provider)?;
            let tokens = registry.token_list(&logic).await?;
            tracing::info!(target: "cli", logic = %logic, tokens = tokens.len(), "Fetched token list");
            print_json(&tokens)?;
        }
        Command::PermitData { account, funds } => {
            let account = address_arg(&account, "account")?;
            let parsed = funds
                .iter()
                .map(String::as_str)
                .map(parse_fund)
                .collect::<Result<Vec<_>, _>>()?;
            let multicall = Multicall::new(provider, chain.multicall3);
            let addresses: Vec<Address> = parsed.iter().map(|(token, _)| *token).collect();
            let tokens = resolve_tokens(&multicall, settings.chain_id, &addresses).await?;
            let erc20_funds: TokenAmounts = tokens
                .into_iter()
                .zip(parsed)
                .map(|(token, (_, amount))| TokenAmount::from_wei(token, amount))
                .collect();

            let logic = PermitTokenLogic::new(
                &chain,
                MulticallAllowanceReader::new(multicall, chain.permit2),
                settings.permit_windows(),
            )?;
            match logic.permit_data(account, &erc20_funds).await? {
                Some(permit) => {
                    let hash = permit.signing_hash(settings.chain_id, logic.permit2());
                    print_json(&serde_json::json!({
                        "permit": permit,
                        "signingHash": hash,
                    }))?;
                }
                None => print_json(&serde_json::json!({ "permit": null }))?,
            }
        }
        Command::QuoteRepay {
            borrower,
            token,
            mode,
        } => {
            let borrower = address_arg(&borrower, "borrower")?;
            let token = address_arg(&token, "token")?;
            let multicall = Multicall::new(provider.clone(), chain.multicall3);
            let token_in = resolve_tokens(&multicall, settings.chain_id, &[token])
                .await?
                .pop()
                .context("token metadata missing")?;

            let registry = LogicRegistry::with_defaults(&settings, &book, provider)?;
            let params = QuoteParams::AaveV3Repay(RepayParams {
                borrower,
                token_in,
                interest_rate_mode: mode,
            });
            let quoted = registry.quote(&v3_repay::ID.to_string(), params).await?;
            print_json(&quoted)?;
        }
    }

    Ok(())
}
