// src/backend/adapter/fhe.rs
// Client for the external FHE access-control service. The ledger only
// uses three capabilities: wrap an external ciphertext+proof into a
// handle, grant decryption rights on a handle to a principal, and grant
// rights to this canister itself. On wasm32 these are inter-canister
// calls to the configured coprocessor; native builds keep an in-memory
// ACL so the marketplace state machine is unit testable.

use crate::error::TradeError;
use crate::models::common::FheHandle;
use candid::Principal;

#[cfg(target_arch = "wasm32")]
mod coprocessor {
    use super::*;
    use crate::storage::config::get_fhe_canister;

    /// Registers an external ciphertext with its input proof and
    /// returns the coprocessor's handle for it.
    pub async fn register_ciphertext(
        ciphertext: &[u8],
        proof: &[u8],
    ) -> Result<FheHandle, TradeError> {
        let coprocessor = get_fhe_canister();
        let (handle,): (FheHandle,) = ic_cdk::call(
            coprocessor,
            "register_ciphertext",
            (ciphertext.to_vec(), proof.to_vec()),
        )
        .await
        .map_err(|(code, msg)| {
            TradeError::FheError(format!("register_ciphertext failed: [{:?}] {}", code, msg))
        })?;
        Ok(handle)
    }

    /// Grants decryption permission on a handle to a principal.
    pub async fn allow(handle: &FheHandle, grantee: Principal) -> Result<(), TradeError> {
        let coprocessor = get_fhe_canister();
        ic_cdk::call::<_, ()>(coprocessor, "allow", (handle.clone(), grantee))
            .await
            .map_err(|(code, msg)| {
                TradeError::FheError(format!("allow failed: [{:?}] {}", code, msg))
            })
    }

    /// Grants decryption permission on a handle to this canister.
    pub async fn allow_this(handle: &FheHandle) -> Result<(), TradeError> {
        allow(handle, ic_cdk::api::id()).await
    }
}

#[cfg(target_arch = "wasm32")]
pub use coprocessor::{allow, allow_this, register_ciphertext};

#[cfg(not(target_arch = "wasm32"))]
mod mock {
    use super::*;
    use crate::utils::crypto::sha256_hex;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    thread_local! {
        static ACL: RefCell<HashMap<FheHandle, HashSet<Principal>>> = RefCell::new(HashMap::new());
    }

    pub async fn register_ciphertext(
        ciphertext: &[u8],
        proof: &[u8],
    ) -> Result<FheHandle, TradeError> {
        if proof.is_empty() {
            return Err(TradeError::FheError(
                "Input proof verification failed".to_string(),
            ));
        }
        let handle = sha256_hex(ciphertext);
        ACL.with(|acl| {
            acl.borrow_mut().entry(handle.clone()).or_default();
        });
        Ok(handle)
    }

    pub async fn allow(handle: &FheHandle, grantee: Principal) -> Result<(), TradeError> {
        ACL.with(|acl| {
            let mut acl = acl.borrow_mut();
            match acl.get_mut(handle) {
                Some(grantees) => {
                    grantees.insert(grantee);
                    Ok(())
                }
                None => Err(TradeError::FheError(format!("Unknown handle: {}", handle))),
            }
        })
    }

    pub async fn allow_this(handle: &FheHandle) -> Result<(), TradeError> {
        // Native builds have no canister id; the management canister
        // principal stands in for "this canister" in the mock ACL.
        allow(handle, Principal::management_canister()).await
    }

    /// Test hook: whether the mock ACL permits `grantee` on `handle`.
    pub fn is_allowed(handle: &FheHandle, grantee: &Principal) -> bool {
        ACL.with(|acl| {
            acl.borrow()
                .get(handle)
                .map(|grantees| grantees.contains(grantee))
                .unwrap_or(false)
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use mock::{allow, allow_this, is_allowed, register_ciphertext};
