// src/backend/error.rs
use crate::models::common::{InfoId, RequestId};
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

#[derive(CandidType, Deserialize, Error, Debug, PartialEq, Eq, Clone)]
pub enum TradeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Payment error: {0}")]
    PaymentError(String),

    #[error("Info item not found: {0}")]
    InfoNotFound(InfoId),

    #[error("Access request not found: {0}")]
    RequestNotFound(RequestId),

    #[error("Ledger error: {0}")]
    LedgerError(String),

    #[error("Access-control service error: {0}")]
    FheError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Canister cycle balance too low for operation")]
    CycleLow,

    #[error("Internal canister error: {0}")]
    InternalError(String),
}
