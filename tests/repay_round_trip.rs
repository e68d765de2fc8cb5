// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use router_logics::data::abi::IAaveV3Pool;
use router_logics::data::address_book::ChainAddresses;
use router_logics::domain::constants::{CHAIN_ETHEREUM, native_token, wrapped_native_token};
use router_logics::domain::error::LogicError;
use router_logics::domain::logic::WrapMode;
use router_logics::domain::token::Token;
use router_logics::logics::aave::InterestRateMode;
use router_logics::logics::aave::service::AaveDataSource;
use router_logics::logics::aave::v3_repay::{RepayLogic, RepayParams};
use router_logics::logics::offset::{apply_bps, patch_amount};
use std::sync::{Arc, Mutex};

/// In-memory debt ledger standing in for the Aave pool.
#[derive(Clone)]
struct Ledger(Arc<Mutex<U256>>);

impl Ledger {
    fn new(debt: u64) -> Self {
        Self(Arc::new(Mutex::new(U256::from(debt))))
    }

    /// The pool caps a repayment at the outstanding debt.
    fn repay(&self, amount: U256) -> U256 {
        let mut debt = self.0.lock().expect("ledger");
        let paid = amount.min(*debt);
        *debt -= paid;
        paid
    }
}

#[async_trait]
impl AaveDataSource for Ledger {
    async fn reserve_tokens(&self) -> Result<Vec<Token>, LogicError> {
        Ok(vec![wrapped_native_token(CHAIN_ETHEREUM)])
    }

    async fn a_tokens(&self, reserves: &[Token]) -> Result<Vec<Token>, LogicError> {
        Ok(reserves.to_vec())
    }

    async fn user_debt(
        &self,
        _asset: Address,
        _borrower: Address,
        _mode: InterestRateMode,
    ) -> Result<U256, LogicError> {
        Ok(*self.0.lock().expect("ledger"))
    }
}

fn params(borrower: Address) -> RepayParams {
    RepayParams {
        borrower,
        token_in: native_token(CHAIN_ETHEREUM),
        interest_rate_mode: InterestRateMode::Variable,
    }
}

#[tokio::test]
async fn quoted_repay_clears_the_debt() {
    let ledger = Ledger::new(3_333_333);
    let logic = RepayLogic::new(&ChainAddresses::defaults(CHAIN_ETHEREUM), ledger.clone(), 100)
        .expect("repay logic");
    let borrower = Address::from([0xb0; 20]);

    let fields = logic.quote_repay(params(borrower)).await.expect("quote");
    // 3_333_333 * 1.01 = 3_366_666.33, rounded up.
    assert_eq!(fields.input.amount_wei, U256::from(3_366_667u64));

    let built = logic.build_repay(fields).expect("build");
    assert_eq!(built.wrap_mode, WrapMode::WrapBefore);
    let call = IAaveV3Pool::repayCall::abi_decode(&built.data).expect("decode");
    assert_eq!(call.onBehalfOf, borrower);
    assert_eq!(call.asset, wrapped_native_token(CHAIN_ETHEREUM).address);

    ledger.repay(call.amount);
    let requote = logic.quote_repay(params(borrower)).await.expect("requote");
    assert_eq!(requote.input.amount_wei, U256::ZERO);
}

#[tokio::test]
async fn balance_fraction_is_patched_at_execution() {
    let ledger = Ledger::new(1_000);
    let logic = RepayLogic::new(&ChainAddresses::defaults(CHAIN_ETHEREUM), ledger.clone(), 100)
        .expect("repay logic");
    let borrower = Address::from([0xb0; 20]);

    let mut fields = logic.quote_repay(params(borrower)).await.expect("quote");
    fields.balance_bps = Some(10_000);
    let built = logic.build_repay(fields).expect("build");
    let input = &built.inputs[0];
    let offset = input.amount_offset().expect("offset emitted");

    // The agent holds more than quoted by the time the step runs.
    let live_balance = U256::from(1_250u64);
    let amount = apply_bps(live_balance, input.amount_bps().expect("bps"));
    let patched = patch_amount(&built.data, offset, amount).expect("patch");
    let call = IAaveV3Pool::repayCall::abi_decode(&patched).expect("decode patched");
    assert_eq!(call.amount, live_balance);
    assert_eq!(call.onBehalfOf, borrower);

    assert_eq!(ledger.repay(call.amount), U256::from(1_000u64));
    let requote = logic.quote_repay(params(borrower)).await.expect("requote");
    assert!(requote.input.amount_wei.is_zero());
}
