// src/backend/storage/config.rs
use crate::storage::memory::{get_memory, Memory};
use crate::storage::storable::Cbor;
use candid::Principal;
use ic_stable_structures::memory_manager::MemoryId;
use ic_stable_structures::StableCell;
use std::cell::RefCell;

// Memory IDs for config cells (kept apart from the data maps).
const ADMIN_PRINCIPAL_MEM_ID: MemoryId = MemoryId::new(25);
const LEDGER_CANISTER_MEM_ID: MemoryId = MemoryId::new(26);
const FHE_CANISTER_MEM_ID: MemoryId = MemoryId::new(27);
const MIN_CYCLES_THRESHOLD_MEM_ID: MemoryId = MemoryId::new(28);

// Defaults used when a cell is uninitialized; init args overwrite them.
const DEFAULT_PRINCIPAL: Principal = Principal::management_canister();
const DEFAULT_MIN_CYCLES_THRESHOLD: u128 = 10_000_000_000; // 10B cycles

thread_local! {
    /// Principal allowed to withdraw platform fees and read metrics.
    static ADMIN_PRINCIPAL: RefCell<StableCell<Cbor<Principal>, Memory>> = RefCell::new(
        StableCell::init(get_memory(ADMIN_PRINCIPAL_MEM_ID), Cbor(DEFAULT_PRINCIPAL))
            .expect("Failed to initialize admin principal stable cell")
    );

    /// ICP ledger canister this marketplace settles against.
    static LEDGER_CANISTER: RefCell<StableCell<Cbor<Principal>, Memory>> = RefCell::new(
        StableCell::init(get_memory(LEDGER_CANISTER_MEM_ID), Cbor(DEFAULT_PRINCIPAL))
            .expect("Failed to initialize ledger canister stable cell")
    );

    /// FHE coprocessor canister holding the access-control list.
    static FHE_CANISTER: RefCell<StableCell<Cbor<Principal>, Memory>> = RefCell::new(
        StableCell::init(get_memory(FHE_CANISTER_MEM_ID), Cbor(DEFAULT_PRINCIPAL))
            .expect("Failed to initialize FHE canister stable cell")
    );

    static MIN_CYCLES_THRESHOLD: RefCell<StableCell<u128, Memory>> = RefCell::new(
        StableCell::init(get_memory(MIN_CYCLES_THRESHOLD_MEM_ID), DEFAULT_MIN_CYCLES_THRESHOLD)
            .expect("Failed to initialize min cycles threshold stable cell")
    );
}

/// Initialize configuration from InitArgs. Called from canister init
/// and post-upgrade only.
pub fn init_config(
    admin: Principal,
    ledger_canister: Principal,
    fhe_canister: Principal,
    min_cycles_threshold: Option<u128>,
) {
    ADMIN_PRINCIPAL.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(admin))
            .expect("Failed to set admin principal");
    });
    LEDGER_CANISTER.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(ledger_canister))
            .expect("Failed to set ledger canister");
    });
    FHE_CANISTER.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(fhe_canister))
            .expect("Failed to set FHE canister");
    });
    if let Some(threshold) = min_cycles_threshold {
        MIN_CYCLES_THRESHOLD.with(|cell| {
            cell.borrow_mut()
                .set(threshold)
                .expect("Failed to set min cycles threshold");
        });
    }
}

pub fn get_admin_principal() -> Principal {
    ADMIN_PRINCIPAL.with(|cell| cell.borrow().get().0)
}

pub fn get_ledger_canister() -> Principal {
    LEDGER_CANISTER.with(|cell| cell.borrow().get().0)
}

pub fn get_fhe_canister() -> Principal {
    FHE_CANISTER.with(|cell| cell.borrow().get().0)
}

pub fn get_min_cycles_threshold() -> u128 {
    MIN_CYCLES_THRESHOLD.with(|cell| *cell.borrow().get())
}
