// src/backend/api.rs
// Candid endpoint definitions. Input validation happens here; the
// services own the business rules.

use crate::{
    adapter::ledger,
    error::TradeError,
    metrics::TradeMetrics,
    models::{
        access_request::AccessRequest,
        common::*,
        info_item::InfoSummary,
    },
    models::audit_log::AuditLogEntry,
    services::{
        access_service,
        info_service::{self, InfoInitData},
        treasury_service::{self, PlatformStats},
    },
    storage::{audit_logs, metrics as metrics_store},
    utils::{
        guards::{check_admin, check_cycles},
        rate_limit::rate_guard,
    },
};
use candid::{CandidType, Principal};
use ic_cdk::caller;
use ic_cdk_macros::{query, update};
use serde::Deserialize;
use validator::Validate;

// --- Guard functions ---

/// Named guard for admin-only endpoints.
fn admin_guard() -> Result<(), String> {
    check_admin(caller()).map_err(|e| e.to_string())
}

// --- Validation helper ---

fn validate_request<T: Validate>(req: &T) -> Result<(), TradeError> {
    req.validate()
        .map_err(|e| TradeError::InvalidInput(e.to_string()))
}

// --- Request/Response structs ---

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct CreateInfoRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 8192))]
    pub content: String,
    /// External FHE ciphertext of the recipient address.
    #[serde(with = "serde_bytes")]
    #[validate(length(min = 1, max = 4096))]
    pub encrypted_address: Vec<u8>,
    #[serde(with = "serde_bytes")]
    #[validate(length(min = 1, max = 8192))]
    pub proof: Vec<u8>,
    #[validate(range(min = 1))]
    pub price_e8s: E8s,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct UpdatePriceRequest {
    pub item_id: InfoId,
    #[validate(range(min = 1))]
    pub new_price_e8s: E8s,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct GrantAccessRequest {
    pub item_id: InfoId,
    pub grantee: Principal,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct ListRequest {
    pub offset: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Default)]
pub struct ListInfosResponse {
    pub infos: Vec<InfoSummary>,
    pub total: u64,
}

#[derive(CandidType, Deserialize, Clone, Debug, Default)]
pub struct ListEventsResponse {
    pub events: Vec<AuditLogEntry>,
    pub total: u64,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct MetricsResponse {
    pub metrics: TradeMetrics,
    pub cycle_balance: u128,
}

// --- Item endpoints ---

#[update(guard = "rate_guard")]
async fn create_info(req: CreateInfoRequest) -> Result<InfoId, TradeError> {
    validate_request(&req)?;
    check_cycles()?;

    info_service::create_new_info(InfoInitData {
        owner: caller(),
        title: req.title,
        content: req.content,
        encrypted_address: req.encrypted_address,
        proof: req.proof,
        price_e8s: req.price_e8s,
    })
    .await
}

#[update]
fn deactivate_info(item_id: InfoId) -> Result<(), TradeError> {
    check_cycles()?;
    info_service::deactivate_info(item_id, caller())
}

#[update]
fn update_price(req: UpdatePriceRequest) -> Result<(), TradeError> {
    validate_request(&req)?;
    check_cycles()?;
    info_service::update_price(req.item_id, req.new_price_e8s, caller())
}

#[query]
fn get_info(item_id: InfoId) -> Result<InfoSummary, TradeError> {
    info_service::get_info_summary(item_id)
}

#[query]
fn get_info_content(item_id: InfoId) -> Result<String, TradeError> {
    info_service::get_info_content(item_id, caller())
}

#[query]
fn get_encrypted_address(item_id: InfoId) -> Result<FheHandle, TradeError> {
    info_service::get_encrypted_address(item_id, caller())
}

#[query]
fn list_infos(req: ListRequest) -> Result<ListInfosResponse, TradeError> {
    validate_request(&req)?;
    let offset = req.offset.unwrap_or(0) as u64;
    let limit = req.limit.unwrap_or(20) as usize;
    let (infos, total) = info_service::list_infos(offset, limit);
    Ok(ListInfosResponse { infos, total })
}

#[query]
fn list_my_infos() -> Vec<InfoSummary> {
    info_service::list_infos_by_owner(caller())
}

// --- Access endpoints ---

/// Buyers transfer their payment to this account before calling
/// request_access.
#[query]
fn get_deposit_account() -> String {
    ledger::deposit_account_text(&caller())
}

#[update(guard = "rate_guard")]
async fn request_access(item_id: InfoId) -> Result<RequestId, TradeError> {
    check_cycles()?;
    access_service::request_access(item_id, caller()).await
}

#[update]
async fn approve_access(request_id: RequestId) -> Result<(), TradeError> {
    check_cycles()?;
    access_service::approve_access(request_id, caller()).await
}

#[update]
async fn deny_access(request_id: RequestId) -> Result<(), TradeError> {
    check_cycles()?;
    access_service::deny_access(request_id, caller()).await
}

#[update]
async fn grant_access(req: GrantAccessRequest) -> Result<(), TradeError> {
    check_cycles()?;
    access_service::grant_direct(req.item_id, req.grantee, caller()).await
}

#[query]
fn has_access(item_id: InfoId, principal: Principal) -> bool {
    access_service::has_access(item_id, principal)
}

#[query]
fn list_pending_requests(item_id: InfoId) -> Result<Vec<AccessRequest>, TradeError> {
    access_service::list_pending_requests(item_id, caller())
}

#[query]
fn list_my_requests() -> Vec<AccessRequest> {
    access_service::list_requests_by_requester(caller())
}

// --- Platform endpoints ---

#[update]
async fn withdraw_platform_fees() -> Result<E8s, TradeError> {
    check_cycles()?;
    treasury_service::withdraw_platform_fees(caller()).await
}

#[query]
fn get_platform_stats() -> PlatformStats {
    treasury_service::get_platform_stats()
}

#[query]
fn list_events(req: ListRequest) -> Result<ListEventsResponse, TradeError> {
    validate_request(&req)?;
    let offset = req.offset.unwrap_or(0) as u64;
    let limit = req.limit.unwrap_or(20) as usize;
    Ok(ListEventsResponse {
        events: audit_logs::get_events_page(offset, limit),
        total: audit_logs::event_count(),
    })
}

#[query(guard = "admin_guard")]
fn get_metrics() -> Result<MetricsResponse, TradeError> {
    Ok(MetricsResponse {
        metrics: metrics_store::get_metrics(),
        cycle_balance: cycle_balance(),
    })
}

#[cfg(target_arch = "wasm32")]
fn cycle_balance() -> u128 {
    ic_cdk::api::canister_balance128()
}

#[cfg(not(target_arch = "wasm32"))]
fn cycle_balance() -> u128 {
    0
}
