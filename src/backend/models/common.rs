// src/backend/models/common.rs
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

pub type InfoId = u64; // Sequential item identifier, starts at 1
pub type RequestId = u64; // Sequential access-request identifier, starts at 1
pub type PrincipalId = Principal;

/// Opaque reference to a ciphertext held by the external FHE
/// access-control service. The ledger never interprets it.
pub type FheHandle = String;

pub type Timestamp = u64; // Nanoseconds since epoch
pub type E8s = u64; // Amount in 10^-8 ICP

/// Platform cut of every approved request, in percent.
pub const FEE_PERCENT: u64 = 2;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum RequestStatus {
    Pending,  // Escrowed, waiting for the item owner to resolve
    Approved, // Terminal: requester granted, escrow distributed
    Denied,   // Terminal: escrow fully refunded to the requester
}

/// How an address came to hold an access grant.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum GrantSource {
    Owner,    // Automatic grant to the item creator
    Approval, // Approved access request
    Direct,   // Owner direct-grant after an off-chain purchase signal
}
