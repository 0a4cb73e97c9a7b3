// src/backend/storage/counters.rs
use crate::storage::memory::{
    get_event_seq_memory, get_info_id_seq_memory, get_request_id_seq_memory, Memory,
};
use ic_stable_structures::StableCell;
use std::cell::RefCell;

// Each cell holds the last allocated id; allocation returns the next
// one, so exposed ids start at 1.

thread_local! {
    static INFO_ID_SEQ: RefCell<StableCell<u64, Memory>> = RefCell::new(
        StableCell::init(get_info_id_seq_memory(), 0)
            .expect("Failed to initialize info id sequence cell")
    );

    static REQUEST_ID_SEQ: RefCell<StableCell<u64, Memory>> = RefCell::new(
        StableCell::init(get_request_id_seq_memory(), 0)
            .expect("Failed to initialize request id sequence cell")
    );

    static EVENT_SEQ: RefCell<StableCell<u64, Memory>> = RefCell::new(
        StableCell::init(get_event_seq_memory(), 0)
            .expect("Failed to initialize event sequence cell")
    );
}

fn allocate(cell: &RefCell<StableCell<u64, Memory>>) -> Result<u64, String> {
    let next = cell.borrow().get().saturating_add(1);
    cell.borrow_mut()
        .set(next)
        .map_err(|e| format!("Failed to advance sequence: {:?}", e))?;
    Ok(next)
}

/// Allocate the next item id (monotonic, starts at 1).
pub fn next_info_id() -> Result<u64, String> {
    INFO_ID_SEQ.with(allocate)
}

/// Allocate the next access-request id (monotonic, starts at 1).
pub fn next_request_id() -> Result<u64, String> {
    REQUEST_ID_SEQ.with(allocate)
}

/// Allocate the next event-log sequence number.
pub fn next_event_seq() -> Result<u64, String> {
    EVENT_SEQ.with(allocate)
}

/// Last allocated item id (i.e. the id the next item will NOT get).
pub fn current_info_id() -> u64 {
    INFO_ID_SEQ.with(|cell| *cell.borrow().get())
}

pub fn current_request_id() -> u64 {
    REQUEST_ID_SEQ.with(|cell| *cell.borrow().get())
}
