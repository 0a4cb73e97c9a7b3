// src/backend/utils/rate_limit.rs
use crate::error::TradeError;
use crate::utils::time::now_ns;
use candid::Principal;
use std::cell::RefCell;
use std::collections::HashMap;

const RATE_LIMIT_CAPACITY: u32 = 20; // Max tokens in bucket (burst capacity)
const RATE_LIMIT_REFILL_RATE_PER_SEC: f64 = 1.0; // Tokens added per second

struct TokenBucket {
    tokens: f64,
    last_refill_time_ns: u64,
}

impl TokenBucket {
    fn new() -> Self {
        TokenBucket {
            tokens: RATE_LIMIT_CAPACITY as f64,
            last_refill_time_ns: now_ns(),
        }
    }

    fn refill(&mut self) {
        let now = now_ns();
        let elapsed_secs =
            (now.saturating_sub(self.last_refill_time_ns)) as f64 / 1_000_000_000.0;
        let tokens_to_add = elapsed_secs * RATE_LIMIT_REFILL_RATE_PER_SEC;

        self.tokens = (self.tokens + tokens_to_add).min(RATE_LIMIT_CAPACITY as f64);
        self.last_refill_time_ns = now;
    }

    fn take(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

thread_local! {
    // In-memory map for rate limiting. Cleared on upgrade.
    static PRINCIPAL_BUCKETS: RefCell<HashMap<Principal, TokenBucket>> = RefCell::new(HashMap::new());
}

/// Guard for the state-mutating marketplace endpoints. Returns Ok(())
/// if the call is allowed for this caller. The String error is what the
/// canister macros expect from a guard function.
pub fn rate_guard() -> Result<(), String> {
    let caller = ic_cdk::caller();

    PRINCIPAL_BUCKETS.with(|buckets_refcell| {
        let mut buckets = buckets_refcell.borrow_mut();
        let bucket = buckets.entry(caller).or_insert_with(TokenBucket::new);

        if bucket.take() {
            Ok(())
        } else {
            Err(TradeError::RateLimitExceeded(format!(
                "Rate limit exceeded for principal {}. Please try again later.",
                caller
            ))
            .to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::set_now_ns;

    #[test]
    fn bucket_exhausts_and_refills() {
        set_now_ns(1_000_000_000_000);
        let mut bucket = TokenBucket::new();

        for _ in 0..RATE_LIMIT_CAPACITY {
            assert!(bucket.take());
        }
        assert!(!bucket.take());

        // Two seconds of refill buys two more calls.
        set_now_ns(1_002_000_000_000);
        assert!(bucket.take());
        assert!(bucket.take());
        assert!(!bucket.take());
    }
}
