// src/backend/services/access_service.rs
// Request/approve/deny state machine with escrow. A request is created
// Pending with the buyer's full deposit swept into escrow; the item
// owner resolves it exactly once. Approval distributes the escrow
// (platform fee retained, remainder to the seller) and grants the
// requester; denial refunds the full amount. Guard checks run before
// the first state write, and resolution marks the request terminal
// before any inter-canister await so a call suspended at a payout
// cannot race a second resolution of the same request.

use crate::{
    adapter::{fhe, ledger},
    error::TradeError,
    metrics,
    models::{
        access_request::{AccessGrant, AccessRequest},
        audit_log::LogAction,
        common::*,
    },
    storage::{access_requests, audit_logs, counters, grants, info_items, treasury},
    utils::time::now_ns,
};

/// Creates a pending access request, sweeping the caller's deposit
/// (which must cover the item price) into escrow.
pub async fn request_access(item_id: InfoId, caller: PrincipalId) -> Result<RequestId, TradeError> {
    let item = info_items::get_item(item_id).ok_or(TradeError::InfoNotFound(item_id))?;

    if !item.is_active {
        return Err(TradeError::InvalidState(format!(
            "Item {} is no longer active",
            item_id
        )));
    }
    if item.owner == caller {
        return Err(TradeError::InvalidState(
            "Owner cannot request access to their own item".to_string(),
        ));
    }
    if grants::has_grant(item_id, &caller) {
        return Err(TradeError::InvalidState(format!(
            "Caller already holds an access grant for item {}",
            item_id
        )));
    }
    if let Some(existing) = access_requests::get_request_for_pair(item_id, caller) {
        match existing.status {
            RequestStatus::Pending => {
                return Err(TradeError::InvalidState(format!(
                    "Request {} for item {} is still pending",
                    existing.request_id, item_id
                )));
            }
            RequestStatus::Approved => {
                return Err(TradeError::InvalidState(format!(
                    "Request {} for item {} was already approved",
                    existing.request_id, item_id
                )));
            }
            // A denied request may be retried with a fresh deposit.
            RequestStatus::Denied => {}
        }
    }

    let deposit = ledger::escrowed_deposit(&caller).await?;
    if deposit < item.price_e8s {
        return Err(TradeError::PaymentError(format!(
            "Deposit of {} e8s does not cover the price of {} e8s",
            deposit, item.price_e8s
        )));
    }
    ledger::sweep_deposit(&caller, deposit).await?;

    // The item can be deactivated while the deposit checks are in
    // flight. The deposit is already in escrow by now, so refund it
    // rather than file a request against a dead item.
    match info_items::get_item(item_id) {
        Some(item) if item.is_active => {}
        _ => {
            ledger::payout(caller, deposit).await?;
            return Err(TradeError::InvalidState(format!(
                "Item {} is no longer active",
                item_id
            )));
        }
    }

    let request_id = counters::next_request_id().map_err(TradeError::InternalError)?;
    let request = AccessRequest {
        request_id,
        item_id,
        requester: caller,
        amount_e8s: deposit,
        status: RequestStatus::Pending,
        created_at: now_ns(),
        resolved_at: None,
    };

    access_requests::insert_request(&request);
    access_requests::add_pending(item_id, request_id);

    audit_logs::add_event(
        caller,
        LogAction::AccessRequested,
        Some(item_id),
        Some(request_id),
        Some(deposit),
        None,
    )
    .map_err(TradeError::InternalError)?;
    metrics::record_request_created(deposit).map_err(TradeError::InternalError)?;

    ic_cdk::println!(
        "Access request {} created for item {} by {} ({} e8s escrowed)",
        request_id,
        item_id,
        caller,
        deposit
    );

    Ok(request_id)
}

/// Approves a pending request: the requester is granted on both the
/// ledger and the FHE service, the platform fee is retained, and the
/// remainder is paid to the seller.
pub async fn approve_access(request_id: RequestId, caller: PrincipalId) -> Result<(), TradeError> {
    let mut request =
        access_requests::get_request(request_id).ok_or(TradeError::RequestNotFound(request_id))?;
    let item =
        info_items::get_item(request.item_id).ok_or(TradeError::InfoNotFound(request.item_id))?;

    if item.owner != caller {
        return Err(TradeError::NotAuthorized(format!(
            "Caller {} is not the owner of item {}",
            caller, item.item_id
        )));
    }
    if !request.is_pending() {
        return Err(TradeError::InvalidState(format!(
            "Request {} was already resolved",
            request_id
        )));
    }

    // Fee rounds down, the seller keeps the remainder e8s. Widened so
    // the multiply cannot overflow for large deposits.
    let fee = (request.amount_e8s as u128 * FEE_PERCENT as u128 / 100) as E8s;
    let seller_amount = request.amount_e8s - fee;

    // Mark the request terminal before the payout await. A second
    // resolution arriving while this one is suspended must see the
    // request as resolved, or the escrow would be distributed twice.
    let current_time = now_ns();
    request.status = RequestStatus::Approved;
    request.resolved_at = Some(current_time);
    access_requests::update_request(&request);
    access_requests::remove_pending(request.item_id, request_id);

    if let Err(e) = ledger::payout(item.owner, seller_amount).await {
        // No funds moved; put the request back so the owner can retry.
        request.status = RequestStatus::Pending;
        request.resolved_at = None;
        access_requests::update_request(&request);
        access_requests::add_pending(request.item_id, request_id);
        return Err(e);
    }

    grants::insert_grant(&AccessGrant {
        item_id: request.item_id,
        grantee: request.requester,
        source: GrantSource::Approval,
        granted_at: current_time,
    });
    treasury::accrue_fee(fee).map_err(TradeError::InternalError)?;

    // The grant record above is the authoritative gate. The seller has
    // already been paid, so a coprocessor failure here is logged for
    // operator follow-up instead of unwinding the approval.
    if let Err(e) = fhe::allow(&item.encrypted_address, request.requester).await {
        ic_cdk::println!(
            "FHE allow failed for request {} (grantee {}): {}",
            request_id,
            request.requester,
            e
        );
    }

    audit_logs::add_event(
        caller,
        LogAction::AccessApproved,
        Some(request.item_id),
        Some(request_id),
        Some(request.amount_e8s),
        None,
    )
    .map_err(TradeError::InternalError)?;
    metrics::record_request_approved(fee).map_err(TradeError::InternalError)?;
    metrics::record_grant_issued().map_err(TradeError::InternalError)?;

    ic_cdk::println!(
        "Request {} approved: {} e8s to seller {}, {} e8s platform fee",
        request_id,
        seller_amount,
        item.owner,
        fee
    );

    Ok(())
}

/// Denies a pending request and refunds the full escrowed amount.
pub async fn deny_access(request_id: RequestId, caller: PrincipalId) -> Result<(), TradeError> {
    let mut request =
        access_requests::get_request(request_id).ok_or(TradeError::RequestNotFound(request_id))?;
    let item =
        info_items::get_item(request.item_id).ok_or(TradeError::InfoNotFound(request.item_id))?;

    if item.owner != caller {
        return Err(TradeError::NotAuthorized(format!(
            "Caller {} is not the owner of item {}",
            caller, item.item_id
        )));
    }
    if !request.is_pending() {
        return Err(TradeError::InvalidState(format!(
            "Request {} was already resolved",
            request_id
        )));
    }

    // Same ordering as approval: terminal before the refund await.
    request.status = RequestStatus::Denied;
    request.resolved_at = Some(now_ns());
    access_requests::update_request(&request);
    access_requests::remove_pending(request.item_id, request_id);

    if let Err(e) = ledger::payout(request.requester, request.amount_e8s).await {
        request.status = RequestStatus::Pending;
        request.resolved_at = None;
        access_requests::update_request(&request);
        access_requests::add_pending(request.item_id, request_id);
        return Err(e);
    }

    audit_logs::add_event(
        caller,
        LogAction::AccessDenied,
        Some(request.item_id),
        Some(request_id),
        Some(request.amount_e8s),
        None,
    )
    .map_err(TradeError::InternalError)?;
    metrics::record_request_denied().map_err(TradeError::InternalError)?;

    ic_cdk::println!(
        "Request {} denied: {} e8s refunded to {}",
        request_id,
        request.amount_e8s,
        request.requester
    );

    Ok(())
}

/// Owner direct-grant for a buyer who settled off-chain. No escrow is
/// involved; the grant and FHE permission are issued immediately.
pub async fn grant_direct(
    item_id: InfoId,
    grantee: PrincipalId,
    caller: PrincipalId,
) -> Result<(), TradeError> {
    let item = info_items::get_item(item_id).ok_or(TradeError::InfoNotFound(item_id))?;

    if item.owner != caller {
        return Err(TradeError::NotAuthorized(format!(
            "Caller {} is not the owner of item {}",
            caller, item_id
        )));
    }
    if grantee == item.owner {
        return Err(TradeError::InvalidState(
            "Owner already holds access to their own item".to_string(),
        ));
    }
    if grants::has_grant(item_id, &grantee) {
        return Err(TradeError::InvalidState(format!(
            "{} already holds an access grant for item {}",
            grantee, item_id
        )));
    }

    fhe::allow(&item.encrypted_address, grantee).await?;

    grants::insert_grant(&AccessGrant {
        item_id,
        grantee,
        source: GrantSource::Direct,
        granted_at: now_ns(),
    });

    // The grantee goes in details so the event log alone identifies
    // who received the grant.
    audit_logs::add_event(
        caller,
        LogAction::AccessGranted,
        Some(item_id),
        None,
        None,
        Some(grantee.to_text()),
    )
    .map_err(TradeError::InternalError)?;
    metrics::record_grant_issued().map_err(TradeError::InternalError)?;

    Ok(())
}

/// Whether a principal may read an item's content and obtain
/// decryption rights. False for unknown items.
pub fn has_access(item_id: InfoId, principal: PrincipalId) -> bool {
    match info_items::get_item(item_id) {
        Some(item) => item.owner == principal || grants::has_grant(item_id, &principal),
        None => false,
    }
}

/// Pending requests on an item, owner only. Order is not guaranteed.
pub fn list_pending_requests(
    item_id: InfoId,
    caller: PrincipalId,
) -> Result<Vec<AccessRequest>, TradeError> {
    let item = info_items::get_item(item_id).ok_or(TradeError::InfoNotFound(item_id))?;
    if item.owner != caller {
        return Err(TradeError::NotAuthorized(format!(
            "Caller {} is not the owner of item {}",
            caller, item_id
        )));
    }

    Ok(access_requests::get_pending_ids(item_id)
        .into_iter()
        .filter_map(access_requests::get_request)
        .collect())
}

/// All requests ever made by the caller, any status.
pub fn list_requests_by_requester(caller: PrincipalId) -> Vec<AccessRequest> {
    access_requests::get_requests_by_requester(caller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::info_service::{self, InfoInitData};
    use candid::Principal;
    use futures::executor::block_on;
    use futures::task::noop_waker;
    use std::future::Future;
    use std::task::{Context, Poll};

    const PRICE: E8s = 100_000; // 0.001 ICP

    fn alice() -> Principal {
        Principal::from_slice(&[1; 8])
    }

    fn bob() -> Principal {
        Principal::from_slice(&[2; 8])
    }

    fn carol() -> Principal {
        Principal::from_slice(&[3; 8])
    }

    fn create_item(owner: Principal) -> InfoId {
        block_on(info_service::create_new_info(InfoInitData {
            owner,
            title: "Alpha leak".to_string(),
            content: "the password is hunter2".to_string(),
            encrypted_address: vec![0xAB; 32],
            proof: vec![0x01; 64],
            price_e8s: PRICE,
        }))
        .unwrap()
    }

    #[test]
    fn request_escrows_full_deposit() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE + 500);

        let request_id = block_on(request_access(item_id, bob())).unwrap();
        assert_eq!(request_id, 1);

        // Whole deposit moves into escrow, like attached value.
        assert_eq!(ledger::deposit_of(&bob()), 0);
        assert_eq!(ledger::escrow_total(), PRICE + 500);

        let pending = list_pending_requests(item_id, alice()).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].amount_e8s, PRICE + 500);
        assert!(pending[0].is_pending());
    }

    #[test]
    fn underpaid_request_rejected_without_state_change() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE / 2);

        let result = block_on(request_access(item_id, bob()));
        assert!(matches!(result, Err(TradeError::PaymentError(_))));

        // Nothing mutated: deposit untouched, no request allocated.
        assert_eq!(ledger::deposit_of(&bob()), PRICE / 2);
        assert_eq!(ledger::escrow_total(), 0);
        assert!(list_pending_requests(item_id, alice()).unwrap().is_empty());
        assert_eq!(crate::storage::counters::current_request_id(), 0);
    }

    #[test]
    fn owner_cannot_request_own_item() {
        let item_id = create_item(alice());
        ledger::credit_deposit(alice(), PRICE);

        let result = block_on(request_access(item_id, alice()));
        assert!(matches!(result, Err(TradeError::InvalidState(_))));
    }

    #[test]
    fn duplicate_pending_request_rejected() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), 2 * PRICE);

        block_on(request_access(item_id, bob())).unwrap();
        ledger::credit_deposit(bob(), PRICE);
        let result = block_on(request_access(item_id, bob()));
        assert!(matches!(result, Err(TradeError::InvalidState(_))));
    }

    #[test]
    fn inactive_item_rejects_requests() {
        let item_id = create_item(alice());
        info_service::deactivate_info(item_id, alice()).unwrap();
        ledger::credit_deposit(bob(), PRICE);

        let result = block_on(request_access(item_id, bob()));
        assert!(matches!(result, Err(TradeError::InvalidState(_))));
    }

    #[test]
    fn approve_distributes_escrow_and_grants() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE);
        let request_id = block_on(request_access(item_id, bob())).unwrap();

        block_on(approve_access(request_id, alice())).unwrap();

        // 2% platform fee, remainder to the seller, nothing leaks.
        let fee = PRICE * FEE_PERCENT / 100;
        assert_eq!(fee, 2_000);
        assert_eq!(treasury::get_platform_balance(), fee);
        assert_eq!(ledger::balance_of(&alice()), PRICE - fee);
        assert_eq!(ledger::escrow_total(), fee);

        assert!(has_access(item_id, bob()));
        assert_eq!(
            info_service::get_info_content(item_id, bob()).unwrap(),
            "the password is hunter2"
        );
        let handle = info_service::get_encrypted_address(item_id, bob()).unwrap();
        assert!(fhe::is_allowed(&handle, &bob()));

        assert!(list_pending_requests(item_id, alice()).unwrap().is_empty());
    }

    #[test]
    fn approve_requires_item_owner() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE);
        let request_id = block_on(request_access(item_id, bob())).unwrap();

        let result = block_on(approve_access(request_id, carol()));
        assert!(matches!(result, Err(TradeError::NotAuthorized(_))));
        let result = block_on(deny_access(request_id, carol()));
        assert!(matches!(result, Err(TradeError::NotAuthorized(_))));
    }

    #[test]
    fn approved_request_cannot_be_denied() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE);
        let request_id = block_on(request_access(item_id, bob())).unwrap();

        block_on(approve_access(request_id, alice())).unwrap();
        let result = block_on(deny_access(request_id, alice()));
        assert!(matches!(result, Err(TradeError::InvalidState(_))));
        // Escrow was not touched twice.
        assert_eq!(ledger::balance_of(&bob()), 0);
    }

    #[test]
    fn interleaved_resolutions_distribute_escrow_once() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE);
        let request_id = block_on(request_access(item_id, bob())).unwrap();

        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        // The first approval suspends at the payout with the request
        // already marked terminal.
        let mut first = Box::pin(approve_access(request_id, alice()));
        assert!(first.as_mut().poll(&mut cx).is_pending());

        // Resolutions arriving while it is in flight see a resolved
        // request and change nothing.
        let mut approve_again = Box::pin(approve_access(request_id, alice()));
        assert!(matches!(
            approve_again.as_mut().poll(&mut cx),
            Poll::Ready(Err(TradeError::InvalidState(_)))
        ));
        let mut deny_racing = Box::pin(deny_access(request_id, alice()));
        assert!(matches!(
            deny_racing.as_mut().poll(&mut cx),
            Poll::Ready(Err(TradeError::InvalidState(_)))
        ));

        assert!(matches!(first.as_mut().poll(&mut cx), Poll::Ready(Ok(()))));

        // Exactly one distribution: seller paid once, fee accrued once.
        let fee = PRICE * FEE_PERCENT / 100;
        assert_eq!(ledger::balance_of(&alice()), PRICE - fee);
        assert_eq!(treasury::get_platform_balance(), fee);
        assert_eq!(ledger::escrow_total(), fee);
        assert_eq!(ledger::balance_of(&bob()), 0);
    }

    #[test]
    fn failed_payout_rolls_back_approval() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE);
        let request_id = block_on(request_access(item_id, bob())).unwrap();

        ledger::set_payout_failure(true);
        let result = block_on(approve_access(request_id, alice()));
        assert!(matches!(result, Err(TradeError::LedgerError(_))));

        // Nothing distributed, no grant; the request is pending again.
        assert_eq!(ledger::escrow_total(), PRICE);
        assert_eq!(ledger::balance_of(&alice()), 0);
        assert_eq!(treasury::get_platform_balance(), 0);
        assert!(!has_access(item_id, bob()));
        let pending = list_pending_requests(item_id, alice()).unwrap();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].is_pending());

        ledger::set_payout_failure(false);
        block_on(approve_access(request_id, alice())).unwrap();
        assert!(has_access(item_id, bob()));
    }

    #[test]
    fn failed_refund_leaves_request_pending() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE);
        let request_id = block_on(request_access(item_id, bob())).unwrap();

        ledger::set_payout_failure(true);
        let result = block_on(deny_access(request_id, alice()));
        assert!(matches!(result, Err(TradeError::LedgerError(_))));

        assert_eq!(ledger::escrow_total(), PRICE);
        assert_eq!(ledger::balance_of(&bob()), 0);
        assert!(access_requests::get_request(request_id).unwrap().is_pending());

        ledger::set_payout_failure(false);
        block_on(deny_access(request_id, alice())).unwrap();
        assert_eq!(ledger::balance_of(&bob()), PRICE);
    }

    #[test]
    fn deactivation_during_request_refunds_deposit() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE);

        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        // Suspend the request at the sweep, deactivate, then let it run
        // to completion.
        let mut request = Box::pin(request_access(item_id, bob()));
        assert!(request.as_mut().poll(&mut cx).is_pending());
        info_service::deactivate_info(item_id, alice()).unwrap();

        let result = loop {
            match request.as_mut().poll(&mut cx) {
                Poll::Ready(result) => break result,
                Poll::Pending => {}
            }
        };
        assert!(matches!(result, Err(TradeError::InvalidState(_))));

        // The swept deposit came back; no request was filed.
        assert_eq!(ledger::escrow_total(), 0);
        assert_eq!(ledger::balance_of(&bob()), PRICE);
        assert_eq!(crate::storage::counters::current_request_id(), 0);
        assert!(list_pending_requests(item_id, alice()).unwrap().is_empty());
    }

    #[test]
    fn fee_math_survives_max_deposit() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), u64::MAX);
        let request_id = block_on(request_access(item_id, bob())).unwrap();

        block_on(approve_access(request_id, alice())).unwrap();

        let fee = (u64::MAX as u128 * FEE_PERCENT as u128 / 100) as u64;
        assert_eq!(ledger::balance_of(&alice()), u64::MAX - fee);
        assert_eq!(treasury::get_platform_balance(), fee);
        assert_eq!(ledger::escrow_total(), fee);
    }

    #[test]
    fn deny_refunds_in_full_and_blocks_approve() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE);
        let request_id = block_on(request_access(item_id, bob())).unwrap();

        block_on(deny_access(request_id, alice())).unwrap();

        assert_eq!(ledger::balance_of(&bob()), PRICE);
        assert_eq!(ledger::escrow_total(), 0);
        assert_eq!(treasury::get_platform_balance(), 0);
        assert!(!has_access(item_id, bob()));

        let result = block_on(approve_access(request_id, alice()));
        assert!(matches!(result, Err(TradeError::InvalidState(_))));
    }

    #[test]
    fn denied_requester_may_request_again() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE);
        let first = block_on(request_access(item_id, bob())).unwrap();
        block_on(deny_access(first, alice())).unwrap();

        ledger::credit_deposit(bob(), PRICE);
        let second = block_on(request_access(item_id, bob())).unwrap();
        assert_ne!(first, second);

        block_on(approve_access(second, alice())).unwrap();
        assert!(has_access(item_id, bob()));
    }

    #[test]
    fn direct_grant_gives_read_access() {
        let item_id = create_item(alice());

        assert!(matches!(
            block_on(grant_direct(item_id, bob(), carol())),
            Err(TradeError::NotAuthorized(_))
        ));

        block_on(grant_direct(item_id, bob(), alice())).unwrap();
        assert!(has_access(item_id, bob()));
        assert!(info_service::get_info_content(item_id, bob()).is_ok());
        let grant = grants::get_grant(item_id, &bob()).unwrap();
        assert_eq!(grant.source, GrantSource::Direct);

        // The event log alone must identify the grantee.
        let events = audit_logs::get_events_page(0, 10);
        let granted = events.last().unwrap();
        assert_eq!(granted.action, LogAction::AccessGranted);
        assert_eq!(granted.details, Some(bob().to_text()));

        // Granting twice is an invalid state, as is granting the owner.
        assert!(matches!(
            block_on(grant_direct(item_id, bob(), alice())),
            Err(TradeError::InvalidState(_))
        ));
        assert!(matches!(
            block_on(grant_direct(item_id, alice(), alice())),
            Err(TradeError::InvalidState(_))
        ));
    }

    #[test]
    fn grantee_cannot_also_request() {
        let item_id = create_item(alice());
        block_on(grant_direct(item_id, bob(), alice())).unwrap();

        ledger::credit_deposit(bob(), PRICE);
        let result = block_on(request_access(item_id, bob()));
        assert!(matches!(result, Err(TradeError::InvalidState(_))));
    }

    #[test]
    fn request_history_survives_resolution() {
        let item_id = create_item(alice());
        ledger::credit_deposit(bob(), PRICE);
        ledger::credit_deposit(carol(), PRICE);
        let bobs = block_on(request_access(item_id, bob())).unwrap();
        let carols = block_on(request_access(item_id, carol())).unwrap();

        block_on(approve_access(bobs, alice())).unwrap();
        block_on(deny_access(carols, alice())).unwrap();

        let bob_history = list_requests_by_requester(bob());
        assert_eq!(bob_history.len(), 1);
        assert_eq!(bob_history[0].status, RequestStatus::Approved);
        assert!(bob_history[0].resolved_at.is_some());

        let carol_history = list_requests_by_requester(carol());
        assert_eq!(carol_history.len(), 1);
        assert_eq!(carol_history[0].status, RequestStatus::Denied);
    }

    #[test]
    fn pending_list_uses_unordered_removal() {
        let item_id = create_item(alice());
        let buyers: Vec<Principal> = (10u8..13).map(|b| Principal::from_slice(&[b; 8])).collect();
        let mut ids = Vec::new();
        for buyer in &buyers {
            ledger::credit_deposit(*buyer, PRICE);
            ids.push(block_on(request_access(item_id, *buyer)).unwrap());
        }

        // Resolve the middle one; the other two remain pending.
        block_on(deny_access(ids[1], alice())).unwrap();
        let pending: Vec<RequestId> = list_pending_requests(item_id, alice())
            .unwrap()
            .iter()
            .map(|r| r.request_id)
            .collect();
        assert_eq!(pending.len(), 2);
        assert!(pending.contains(&ids[0]));
        assert!(pending.contains(&ids[2]));
    }
}
