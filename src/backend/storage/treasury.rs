// src/backend/storage/treasury.rs
use crate::models::common::E8s;
use crate::storage::memory::{get_platform_balance_memory, Memory};
use ic_stable_structures::StableCell;
use std::cell::RefCell;

thread_local! {
    /// Accumulated platform fees (e8s) not yet withdrawn by the admin.
    static PLATFORM_BALANCE: RefCell<StableCell<E8s, Memory>> = RefCell::new(
        StableCell::init(get_platform_balance_memory(), 0)
            .expect("Failed to initialize platform balance cell")
    );
}

pub fn get_platform_balance() -> E8s {
    PLATFORM_BALANCE.with(|cell| *cell.borrow().get())
}

fn set_platform_balance(balance: E8s) -> Result<(), String> {
    PLATFORM_BALANCE.with(|cell| {
        cell.borrow_mut()
            .set(balance)
            .map(|_prev| ())
            .map_err(|e| format!("Failed to set platform balance: {:?}", e))
    })
}

/// Adds a fee to the platform balance.
pub fn accrue_fee(fee_e8s: E8s) -> Result<(), String> {
    let balance = get_platform_balance().saturating_add(fee_e8s);
    set_platform_balance(balance)
}

/// Zeroes the balance and returns what it held. The caller pays the
/// amount out afterwards and restores it on payout failure, so a second
/// withdrawal interleaved across the payout await sees zero.
pub fn take_platform_balance() -> Result<E8s, String> {
    let balance = get_platform_balance();
    set_platform_balance(0)?;
    Ok(balance)
}

/// Puts a failed payout back on the books.
pub fn restore_platform_balance(amount_e8s: E8s) -> Result<(), String> {
    accrue_fee(amount_e8s)
}
