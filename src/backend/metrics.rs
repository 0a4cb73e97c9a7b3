// src/backend/metrics.rs
use crate::models::common::E8s;
use crate::storage::metrics::update_metrics;
use candid::CandidType;
use ic_stable_structures::storable::Bound;
use ic_stable_structures::Storable;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Aggregated marketplace counters, persisted in a stable cell and
/// readable by the admin alongside the live cycle balance.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TradeMetrics {
    pub total_items: u64,
    pub active_items: u64,
    pub requests_pending: u64,
    pub requests_approved: u64,
    pub requests_denied: u64,
    pub grants_issued: u64,
    /// Total e8s ever swept into escrow.
    pub escrow_volume_e8s: u128,
    pub fees_accrued_e8s: E8s,
    pub fees_withdrawn_e8s: E8s,
}

impl Storable for TradeMetrics {
    fn to_bytes(&self) -> Cow<[u8]> {
        let mut writer = Vec::new();
        ciborium::ser::into_writer(&self, &mut writer).expect("Failed to serialize TradeMetrics");
        Cow::Owned(writer)
    }

    fn from_bytes(bytes: Cow<[u8]>) -> Self {
        ciborium::de::from_reader(bytes.as_ref()).unwrap_or_default()
    }

    const BOUND: Bound = Bound::Unbounded;
}

// --- Metrics update helpers ---

pub fn record_item_created() -> Result<(), String> {
    update_metrics(|m| {
        m.total_items = m.total_items.saturating_add(1);
        m.active_items = m.active_items.saturating_add(1);
    })
}

pub fn record_item_deactivated() -> Result<(), String> {
    update_metrics(|m| {
        m.active_items = m.active_items.saturating_sub(1);
    })
}

pub fn record_request_created(amount_e8s: E8s) -> Result<(), String> {
    update_metrics(|m| {
        m.requests_pending = m.requests_pending.saturating_add(1);
        m.escrow_volume_e8s = m.escrow_volume_e8s.saturating_add(amount_e8s as u128);
    })
}

pub fn record_request_approved(fee_e8s: E8s) -> Result<(), String> {
    update_metrics(|m| {
        m.requests_pending = m.requests_pending.saturating_sub(1);
        m.requests_approved = m.requests_approved.saturating_add(1);
        m.fees_accrued_e8s = m.fees_accrued_e8s.saturating_add(fee_e8s);
    })
}

pub fn record_request_denied() -> Result<(), String> {
    update_metrics(|m| {
        m.requests_pending = m.requests_pending.saturating_sub(1);
        m.requests_denied = m.requests_denied.saturating_add(1);
    })
}

pub fn record_grant_issued() -> Result<(), String> {
    update_metrics(|m| {
        m.grants_issued = m.grants_issued.saturating_add(1);
    })
}

pub fn record_fees_withdrawn(amount_e8s: E8s) -> Result<(), String> {
    update_metrics(|m| {
        m.fees_withdrawn_e8s = m.fees_withdrawn_e8s.saturating_add(amount_e8s);
    })
}
