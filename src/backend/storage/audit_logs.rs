// src/backend/storage/audit_logs.rs
use crate::models::audit_log::{AuditLogEntry, LogAction};
use crate::models::common::{E8s, InfoId, RequestId};
use crate::storage::counters::next_event_seq;
use crate::storage::memory::{get_event_log_memory, Memory};
use crate::storage::storable::Cbor;
use crate::utils::time::now_ns;
use candid::Principal;
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableLogEntry = Cbor<AuditLogEntry>;

thread_local! {
    /// Event log: Key = sequence number, Value = AuditLogEntry
    static EVENTS: RefCell<StableBTreeMap<u64, StorableLogEntry, Memory>> = RefCell::new(
        StableBTreeMap::init(get_event_log_memory())
    );
}

/// Appends an event to the log and returns its sequence number.
pub fn add_event(
    actor: Principal,
    action: LogAction,
    item_id: Option<InfoId>,
    request_id: Option<RequestId>,
    amount_e8s: Option<E8s>,
    details: Option<String>,
) -> Result<u64, String> {
    let seq = next_event_seq()?;
    let entry = AuditLogEntry {
        seq,
        timestamp: now_ns(),
        actor,
        action,
        item_id,
        request_id,
        amount_e8s,
        details,
    };
    EVENTS.with(|map_ref| {
        map_ref.borrow_mut().insert(seq, Cbor(entry));
    });
    Ok(seq)
}

/// Paginated read of the event log in sequence order.
pub fn get_events_page(offset: u64, limit: usize) -> Vec<AuditLogEntry> {
    EVENTS.with(|map_ref| {
        map_ref
            .borrow()
            .iter()
            .skip(offset as usize)
            .take(limit)
            .map(|(_seq, cbor)| cbor.0)
            .collect()
    })
}

pub fn event_count() -> u64 {
    EVENTS.with(|map_ref| map_ref.borrow().len())
}
