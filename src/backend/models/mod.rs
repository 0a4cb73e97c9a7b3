pub mod access_request;
pub mod audit_log;
pub mod common;
pub mod info_item;

// Re-export common types/enums for easier access
pub use common::*;
