// src/backend/lib.rs

pub mod adapter;
pub mod api;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

use candid::{CandidType, Principal};
use serde::Deserialize;

use crate::api::{
    CreateInfoRequest, GrantAccessRequest, ListEventsResponse, ListInfosResponse, ListRequest,
    MetricsResponse, UpdatePriceRequest,
};
use crate::error::TradeError;
use crate::models::access_request::AccessRequest;
use crate::models::info_item::InfoSummary;
use crate::models::{E8s, FheHandle, InfoId, RequestId};
use crate::services::treasury_service::PlatformStats;

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct InitArgs {
    /// Principal allowed to withdraw platform fees and read metrics.
    pub admin: Principal,
    /// ICP ledger canister escrow settles against.
    pub ledger_canister_id: Principal,
    /// FHE coprocessor canister holding the access-control list.
    pub fhe_canister_id: Principal,
    pub min_cycles_threshold: Option<u128>,
}

#[ic_cdk::init]
fn init(args: InitArgs) {
    storage::config::init_config(
        args.admin,
        args.ledger_canister_id,
        args.fhe_canister_id,
        args.min_cycles_threshold,
    );
    ic_cdk::println!("InfoTrade marketplace canister initialized.");
}

#[ic_cdk::post_upgrade]
fn post_upgrade(args: Option<InitArgs>) {
    if let Some(args) = args {
        storage::config::init_config(
            args.admin,
            args.ledger_canister_id,
            args.fhe_canister_id,
            args.min_cycles_threshold,
        );
    }
    ic_cdk::println!("InfoTrade marketplace canister upgraded.");
}

// Export Candid interface
ic_cdk::export_candid!();
