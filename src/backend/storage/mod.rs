// src/backend/storage/mod.rs
// Stable memory layout and per-map helpers using ic-stable-structures.

pub mod access_requests;
pub mod audit_logs;
pub mod config;
pub mod counters;
pub mod grants;
pub mod info_items;
pub mod memory;
pub mod metrics;
pub mod storable;
pub mod treasury;

pub use memory::Memory;
pub use storable::Cbor;
