// src/backend/services/treasury_service.rs
// Platform fee withdrawal and the public marketplace stats.

use crate::{
    adapter::ledger,
    error::TradeError,
    metrics,
    models::{audit_log::LogAction, common::*},
    storage::{access_requests, audit_logs, counters, info_items, treasury},
    utils::guards::check_admin,
};
use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, Default)]
pub struct PlatformStats {
    pub total_items: u64,
    pub active_items: u64,
    pub total_requests: u64,
    pub pending_requests: u64,
    pub platform_balance_e8s: E8s,
    /// Highest allocated ids; the next item/request gets id + 1.
    pub last_item_id: InfoId,
    pub last_request_id: RequestId,
}

/// Pays the accumulated platform fees out to the admin. Admin only,
/// and only when a balance exists.
pub async fn withdraw_platform_fees(caller: PrincipalId) -> Result<E8s, TradeError> {
    check_admin(caller)?;

    if treasury::get_platform_balance() == 0 {
        return Err(TradeError::InvalidState(
            "No platform fees to withdraw".to_string(),
        ));
    }

    // Zero the balance before the payout await so an interleaved second
    // withdrawal sees nothing to take; restore on payout failure.
    let amount = treasury::take_platform_balance().map_err(TradeError::InternalError)?;
    if let Err(e) = ledger::payout(caller, amount).await {
        treasury::restore_platform_balance(amount).map_err(TradeError::InternalError)?;
        return Err(e);
    }

    audit_logs::add_event(caller, LogAction::FeesWithdrawn, None, None, Some(amount), None)
        .map_err(TradeError::InternalError)?;
    metrics::record_fees_withdrawn(amount).map_err(TradeError::InternalError)?;

    ic_cdk::println!("Platform fees withdrawn: {} e8s to {}", amount, caller);

    Ok(amount)
}

/// Public marketplace counters.
pub fn get_platform_stats() -> PlatformStats {
    let metrics = crate::storage::metrics::get_metrics();
    PlatformStats {
        total_items: info_items::item_count(),
        active_items: metrics.active_items,
        total_requests: access_requests::request_count(),
        pending_requests: access_requests::pending_count(),
        platform_balance_e8s: treasury::get_platform_balance(),
        last_item_id: counters::current_info_id(),
        last_request_id: counters::current_request_id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ledger;
    use crate::services::{access_service, info_service};
    use crate::storage::config;
    use candid::Principal;
    use futures::executor::block_on;

    const PRICE: E8s = 100_000;

    fn admin() -> Principal {
        Principal::from_slice(&[9; 8])
    }

    fn alice() -> Principal {
        Principal::from_slice(&[1; 8])
    }

    fn bob() -> Principal {
        Principal::from_slice(&[2; 8])
    }

    fn setup_admin() {
        config::init_config(
            admin(),
            Principal::anonymous(),
            Principal::anonymous(),
            None,
        );
    }

    fn approved_sale() -> InfoId {
        let item_id = block_on(info_service::create_new_info(info_service::InfoInitData {
            owner: alice(),
            title: "Alpha leak".to_string(),
            content: "the password is hunter2".to_string(),
            encrypted_address: vec![0xAB; 32],
            proof: vec![0x01; 64],
            price_e8s: PRICE,
        }))
        .unwrap();
        ledger::credit_deposit(bob(), PRICE);
        let request_id = block_on(access_service::request_access(item_id, bob())).unwrap();
        block_on(access_service::approve_access(request_id, alice())).unwrap();
        item_id
    }

    #[test]
    fn withdraw_pays_admin_and_resets_balance() {
        setup_admin();
        approved_sale();

        let fee = PRICE * FEE_PERCENT / 100;
        assert_eq!(get_platform_stats().platform_balance_e8s, fee);

        let withdrawn = block_on(withdraw_platform_fees(admin())).unwrap();
        assert_eq!(withdrawn, fee);
        assert_eq!(ledger::balance_of(&admin()), fee);
        assert_eq!(get_platform_stats().platform_balance_e8s, 0);
    }

    #[test]
    fn second_withdraw_fails_on_zero_balance() {
        setup_admin();
        approved_sale();

        block_on(withdraw_platform_fees(admin())).unwrap();
        let result = block_on(withdraw_platform_fees(admin()));
        assert!(matches!(result, Err(TradeError::InvalidState(_))));
    }

    #[test]
    fn non_admin_cannot_withdraw() {
        setup_admin();
        approved_sale();

        let result = block_on(withdraw_platform_fees(alice()));
        assert!(matches!(result, Err(TradeError::NotAuthorized(_))));
        // Balance untouched by the rejected call.
        let fee = PRICE * FEE_PERCENT / 100;
        assert_eq!(get_platform_stats().platform_balance_e8s, fee);
    }

    #[test]
    fn stats_track_lifecycle() {
        setup_admin();
        let item_id = approved_sale();

        let stats = get_platform_stats();
        assert_eq!(stats.total_items, 1);
        assert_eq!(stats.active_items, 1);
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.pending_requests, 0);
        assert_eq!(stats.last_item_id, item_id);
        assert_eq!(stats.last_request_id, 1);

        info_service::deactivate_info(item_id, alice()).unwrap();
        assert_eq!(get_platform_stats().active_items, 0);
    }
}
