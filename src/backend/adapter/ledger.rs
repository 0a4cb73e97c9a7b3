// src/backend/adapter/ledger.rs
// ICP ledger plumbing for escrow. A buyer first transfers ICP to a
// canister subaccount derived from their principal, then calls
// request_access; the service verifies the deposit and sweeps it into
// the canister's default (escrow) account. Approvals and denials pay
// out of escrow. Native builds replace the ledger with balance maps the
// tests credit and inspect.

use crate::error::TradeError;
use crate::models::common::E8s;
use candid::Principal;
use ic_ledger_types::Subaccount;

/// Deposit subaccount for a buyer: the standard principal-to-subaccount
/// packing (length byte, principal bytes, zero padding).
pub fn deposit_subaccount(principal: &Principal) -> Subaccount {
    let mut bytes = [0u8; 32];
    let principal_bytes = principal.as_slice();
    bytes[0] = principal_bytes.len() as u8;
    bytes[1..=principal_bytes.len()].copy_from_slice(principal_bytes);
    Subaccount(bytes)
}

#[cfg(target_arch = "wasm32")]
mod icp {
    use super::*;
    use crate::storage::config::get_ledger_canister;
    use ic_ledger_types::{
        account_balance, transfer, AccountBalanceArgs, AccountIdentifier, Memo, Tokens,
        TransferArgs, DEFAULT_FEE, DEFAULT_SUBACCOUNT,
    };

    /// Textual account id a buyer should transfer their deposit to.
    pub fn deposit_account_text(principal: &Principal) -> String {
        AccountIdentifier::new(&ic_cdk::api::id(), &deposit_subaccount(principal)).to_string()
    }

    /// Current balance of a buyer's deposit subaccount.
    pub async fn escrowed_deposit(principal: &Principal) -> Result<E8s, TradeError> {
        let account =
            AccountIdentifier::new(&ic_cdk::api::id(), &deposit_subaccount(principal));
        let balance = account_balance(get_ledger_canister(), AccountBalanceArgs { account })
            .await
            .map_err(|(code, msg)| {
                TradeError::LedgerError(format!("account_balance failed: [{:?}] {}", code, msg))
            })?;
        Ok(balance.e8s())
    }

    /// Moves a verified deposit from the buyer's subaccount into the
    /// canister's default account. The ledger transfer fee comes out of
    /// the moved amount.
    pub async fn sweep_deposit(principal: &Principal, amount_e8s: E8s) -> Result<(), TradeError> {
        let to = AccountIdentifier::new(&ic_cdk::api::id(), &DEFAULT_SUBACCOUNT);
        let args = TransferArgs {
            memo: Memo(0),
            amount: Tokens::from_e8s(amount_e8s.saturating_sub(DEFAULT_FEE.e8s())),
            fee: DEFAULT_FEE,
            from_subaccount: Some(deposit_subaccount(principal)),
            to,
            created_at_time: None,
        };
        execute_transfer(args).await
    }

    /// Pays out of escrow to a principal's main ledger account. The
    /// ledger transfer fee comes out of the paid amount.
    pub async fn payout(to: Principal, amount_e8s: E8s) -> Result<(), TradeError> {
        let args = TransferArgs {
            memo: Memo(0),
            amount: Tokens::from_e8s(amount_e8s.saturating_sub(DEFAULT_FEE.e8s())),
            fee: DEFAULT_FEE,
            from_subaccount: None,
            to: AccountIdentifier::new(&to, &DEFAULT_SUBACCOUNT),
            created_at_time: None,
        };
        execute_transfer(args).await
    }

    async fn execute_transfer(args: TransferArgs) -> Result<(), TradeError> {
        let result = transfer(get_ledger_canister(), args).await.map_err(|(code, msg)| {
            TradeError::LedgerError(format!("transfer call failed: [{:?}] {}", code, msg))
        })?;
        result
            .map(|_block_index| ())
            .map_err(|e| TradeError::LedgerError(format!("transfer rejected: {:?}", e)))
    }
}

#[cfg(target_arch = "wasm32")]
pub use icp::{deposit_account_text, escrowed_deposit, payout, sweep_deposit};

#[cfg(not(target_arch = "wasm32"))]
mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    thread_local! {
        /// Unswept deposits per buyer principal.
        static DEPOSITS: RefCell<HashMap<Principal, E8s>> = RefCell::new(HashMap::new());
        /// Amount held in the canister's default (escrow) account.
        static ESCROW: RefCell<E8s> = const { RefCell::new(0) };
        /// Main-account balances, credited by payouts.
        static BALANCES: RefCell<HashMap<Principal, E8s>> = RefCell::new(HashMap::new());
        /// When set, payouts fail before moving anything.
        static FAIL_PAYOUTS: Cell<bool> = const { Cell::new(false) };
    }

    /// Suspends exactly once. Each transfer starts with one of these,
    /// mirroring the message boundary of a real ledger call, so tests
    /// polling a future by hand can interleave a second call at the
    /// await point.
    struct TransferBoundary(bool);

    impl Future for TransferBoundary {
        type Output = ();

        fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            let this = self.get_mut();
            if this.0 {
                Poll::Ready(())
            } else {
                this.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    fn transfer_boundary() -> TransferBoundary {
        TransferBoundary(false)
    }

    pub fn deposit_account_text(principal: &Principal) -> String {
        hex::encode(deposit_subaccount(principal).0)
    }

    pub async fn escrowed_deposit(principal: &Principal) -> Result<E8s, TradeError> {
        Ok(DEPOSITS.with(|d| d.borrow().get(principal).copied().unwrap_or(0)))
    }

    pub async fn sweep_deposit(principal: &Principal, amount_e8s: E8s) -> Result<(), TradeError> {
        transfer_boundary().await;
        DEPOSITS.with(|d| {
            let mut deposits = d.borrow_mut();
            let available = deposits.get(principal).copied().unwrap_or(0);
            if available < amount_e8s {
                return Err(TradeError::LedgerError(format!(
                    "Deposit subaccount holds {} e8s, cannot sweep {}",
                    available, amount_e8s
                )));
            }
            deposits.insert(*principal, available - amount_e8s);
            Ok(())
        })?;
        ESCROW.with(|e| *e.borrow_mut() += amount_e8s);
        Ok(())
    }

    pub async fn payout(to: Principal, amount_e8s: E8s) -> Result<(), TradeError> {
        transfer_boundary().await;
        if FAIL_PAYOUTS.with(|f| f.get()) {
            return Err(TradeError::LedgerError(
                "transfer rejected: ledger unavailable".to_string(),
            ));
        }
        ESCROW.with(|e| {
            let mut escrow = e.borrow_mut();
            if *escrow < amount_e8s {
                return Err(TradeError::LedgerError(format!(
                    "Escrow holds {} e8s, cannot pay out {}",
                    *escrow, amount_e8s
                )));
            }
            *escrow -= amount_e8s;
            Ok(())
        })?;
        BALANCES.with(|b| {
            *b.borrow_mut().entry(to).or_insert(0) += amount_e8s;
        });
        Ok(())
    }

    // --- Test hooks ---

    /// Credits a buyer's deposit subaccount, standing in for an ICP
    /// transfer made before request_access.
    pub fn credit_deposit(principal: Principal, amount_e8s: E8s) {
        DEPOSITS.with(|d| {
            *d.borrow_mut().entry(principal).or_insert(0) += amount_e8s;
        });
    }

    pub fn deposit_of(principal: &Principal) -> E8s {
        DEPOSITS.with(|d| d.borrow().get(principal).copied().unwrap_or(0))
    }

    pub fn balance_of(principal: &Principal) -> E8s {
        BALANCES.with(|b| b.borrow().get(principal).copied().unwrap_or(0))
    }

    pub fn escrow_total() -> E8s {
        ESCROW.with(|e| *e.borrow())
    }

    /// Makes every subsequent payout fail until cleared.
    pub fn set_payout_failure(fail: bool) {
        FAIL_PAYOUTS.with(|f| f.set(fail));
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use mock::{
    balance_of, credit_deposit, deposit_account_text, deposit_of, escrow_total, escrowed_deposit,
    payout, set_payout_failure, sweep_deposit,
};
