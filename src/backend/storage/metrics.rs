// src/backend/storage/metrics.rs
use crate::metrics::TradeMetrics;
use crate::storage::memory::{get_metrics_memory, Memory};
use ic_stable_structures::StableCell;
use std::cell::RefCell;

thread_local! {
    static METRICS: RefCell<StableCell<TradeMetrics, Memory>> = RefCell::new(
        StableCell::init(get_metrics_memory(), TradeMetrics::default())
            .expect("Failed to initialize metrics cell")
    );
}

pub fn get_metrics() -> TradeMetrics {
    METRICS.with(|cell| cell.borrow().get().clone())
}

/// Applies a mutation to the metrics struct and persists it.
pub fn update_metrics<F>(f: F) -> Result<(), String>
where
    F: FnOnce(&mut TradeMetrics),
{
    METRICS.with(|cell| {
        let mut metrics = cell.borrow().get().clone();
        f(&mut metrics);
        cell.borrow_mut()
            .set(metrics)
            .map(|_prev| ())
            .map_err(|e| format!("Failed to update metrics: {:?}", e))
    })
}
