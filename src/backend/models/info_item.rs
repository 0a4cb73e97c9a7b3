// src/backend/models/info_item.rs
use crate::models::common::{E8s, FheHandle, InfoId, PrincipalId, Timestamp};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// One stored secret offered for sale. Title and content are immutable
/// after creation; `price_e8s` is owner-mutable while the item is
/// active; `is_active` only ever transitions true -> false.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct InfoItem {
    pub item_id: InfoId,
    pub owner: PrincipalId,
    pub title: String,
    pub content: String,
    /// SHA-256 of `content`, hex-encoded. Stored so grantees can verify
    /// what they decrypted client-side against the on-chain record.
    pub content_sha256: String,
    /// Handle to the FHE-encrypted recipient address.
    pub encrypted_address: FheHandle,
    pub price_e8s: E8s,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InfoItem {
    /// Public view of an item: everything except the gated fields
    /// (content and ciphertext handle).
    pub fn summary(&self) -> InfoSummary {
        InfoSummary {
            item_id: self.item_id,
            owner: self.owner,
            title: self.title.clone(),
            price_e8s: self.price_e8s,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct InfoSummary {
    pub item_id: InfoId,
    pub owner: PrincipalId,
    pub title: String,
    pub price_e8s: E8s,
    pub is_active: bool,
    pub created_at: Timestamp,
}
