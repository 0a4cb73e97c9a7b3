// src/backend/models/access_request.rs
use crate::models::common::{
    E8s, GrantSource, InfoId, PrincipalId, RequestId, RequestStatus, Timestamp,
};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// One paid request for access to an item. The escrowed amount is held
/// by the canister until the item owner resolves the request; the
/// record persists after resolution for historical lookup.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AccessRequest {
    pub request_id: RequestId,
    pub item_id: InfoId,
    pub requester: PrincipalId,
    /// Full deposit swept into escrow when the request was created.
    /// Always >= the item price at request time.
    pub amount_e8s: E8s,
    pub status: RequestStatus,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

impl AccessRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Access grant record for an (item, principal) pair.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AccessGrant {
    pub item_id: InfoId,
    pub grantee: PrincipalId,
    pub source: GrantSource,
    pub granted_at: Timestamp,
}
