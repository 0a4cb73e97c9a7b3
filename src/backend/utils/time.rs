// src/backend/utils/time.rs
use crate::models::common::Timestamp;

/// Current IC time as nanoseconds since epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ns() -> Timestamp {
    ic_cdk::api::time()
}

// Off-replica builds (unit tests) use a settable per-thread clock so
// lifecycle timestamps are deterministic.
#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static TEST_CLOCK_NS: std::cell::Cell<Timestamp> = const { std::cell::Cell::new(1_700_000_000_000_000_000) };
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ns() -> Timestamp {
    TEST_CLOCK_NS.with(|c| c.get())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_now_ns(ns: Timestamp) {
    TEST_CLOCK_NS.with(|c| c.set(ns));
}
