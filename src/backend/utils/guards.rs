// src/backend/utils/guards.rs
use crate::error::TradeError;
use crate::storage::config::get_admin_principal;
use candid::Principal;

/// Checks if the canister has sufficient cycles to accept the call.
///
/// # Errors
///
/// Returns `TradeError::CycleLow` if the balance is below the
/// configured threshold.
#[cfg(target_arch = "wasm32")]
pub fn check_cycles() -> Result<(), TradeError> {
    let balance = ic_cdk::api::canister_balance128();
    let threshold = crate::storage::config::get_min_cycles_threshold();
    if balance < threshold {
        ic_cdk::println!(
            "Cycle balance low: {} cycles, threshold: {}",
            balance,
            threshold
        );
        Err(TradeError::CycleLow)
    } else {
        Ok(())
    }
}

// No cycle accounting off-replica.
#[cfg(not(target_arch = "wasm32"))]
pub fn check_cycles() -> Result<(), TradeError> {
    Ok(())
}

/// Checks if `caller` is the configured admin principal.
///
/// # Errors
///
/// Returns `TradeError::NotAuthorized` otherwise.
pub fn check_admin(caller: Principal) -> Result<(), TradeError> {
    if caller == get_admin_principal() {
        Ok(())
    } else {
        Err(TradeError::NotAuthorized(format!(
            "Caller {} is not the platform admin",
            caller
        )))
    }
}
