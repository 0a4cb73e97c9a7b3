// src/backend/storage/memory.rs
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;
use std::cell::RefCell;

// Memory IDs for stable structures. Must stay non-overlapping and
// stable across upgrades.
const INFO_ITEMS_MEM_ID: MemoryId = MemoryId::new(1);
const ACCESS_REQUESTS_MEM_ID: MemoryId = MemoryId::new(2);
const REQUEST_PAIR_INDEX_MEM_ID: MemoryId = MemoryId::new(3);
const PENDING_INDEX_MEM_ID: MemoryId = MemoryId::new(4);
const ACCESS_GRANTS_MEM_ID: MemoryId = MemoryId::new(5);
const EVENT_LOG_MEM_ID: MemoryId = MemoryId::new(6);
const METRICS_MEM_ID: MemoryId = MemoryId::new(7);
const PLATFORM_BALANCE_MEM_ID: MemoryId = MemoryId::new(8);
// IDs 9-19 reserved
const INFO_ID_SEQ_MEM_ID: MemoryId = MemoryId::new(20);
const REQUEST_ID_SEQ_MEM_ID: MemoryId = MemoryId::new(21);
const EVENT_SEQ_MEM_ID: MemoryId = MemoryId::new(22);
// Config cells live in storage/config.rs on IDs 25-28.

pub type Memory = VirtualMemory<DefaultMemoryImpl>;

thread_local! {
    static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> = RefCell::new(
        MemoryManager::init(DefaultMemoryImpl::default())
    );
}

/// Get memory instance for a specific MemoryId.
pub fn get_memory(id: MemoryId) -> Memory {
    MEMORY_MANAGER.with(|m| m.borrow().get(id))
}

pub fn get_info_items_memory() -> Memory {
    get_memory(INFO_ITEMS_MEM_ID)
}

pub fn get_access_requests_memory() -> Memory {
    get_memory(ACCESS_REQUESTS_MEM_ID)
}

pub fn get_request_pair_index_memory() -> Memory {
    get_memory(REQUEST_PAIR_INDEX_MEM_ID)
}

pub fn get_pending_index_memory() -> Memory {
    get_memory(PENDING_INDEX_MEM_ID)
}

pub fn get_access_grants_memory() -> Memory {
    get_memory(ACCESS_GRANTS_MEM_ID)
}

pub fn get_event_log_memory() -> Memory {
    get_memory(EVENT_LOG_MEM_ID)
}

pub fn get_metrics_memory() -> Memory {
    get_memory(METRICS_MEM_ID)
}

pub fn get_platform_balance_memory() -> Memory {
    get_memory(PLATFORM_BALANCE_MEM_ID)
}

pub fn get_info_id_seq_memory() -> Memory {
    get_memory(INFO_ID_SEQ_MEM_ID)
}

pub fn get_request_id_seq_memory() -> Memory {
    get_memory(REQUEST_ID_SEQ_MEM_ID)
}

pub fn get_event_seq_memory() -> Memory {
    get_memory(EVENT_SEQ_MEM_ID)
}
