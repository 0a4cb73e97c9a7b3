// src/backend/models/audit_log.rs
use crate::models::common::{E8s, InfoId, RequestId, Timestamp};
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

/// One entry in the marketplace event log. This is the canister analog
/// of contract events: everything an off-chain indexer needs to follow
/// item and request lifecycles.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Monotonic sequence number, assigned by storage.
    pub seq: u64,
    /// Nanoseconds since epoch.
    pub timestamp: Timestamp,
    /// Principal that performed the action.
    pub actor: Principal,
    pub action: LogAction,
    pub item_id: Option<InfoId>,
    pub request_id: Option<RequestId>,
    pub amount_e8s: Option<E8s>,
    pub details: Option<String>,
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum LogAction {
    InfoCreated,
    AccessRequested,
    AccessApproved,
    AccessDenied,
    AccessGranted,
    InfoDeactivated,
    PriceUpdated,
    FeesWithdrawn,
}
