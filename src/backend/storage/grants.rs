// src/backend/storage/grants.rs
use crate::models::access_request::AccessGrant;
use crate::models::common::{InfoId, PrincipalId};
use crate::storage::memory::{get_access_grants_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableGrant = Cbor<AccessGrant>;

thread_local! {
    /// Access grants: Key = (item_id, grantee), Value = AccessGrant
    static GRANTS: RefCell<StableBTreeMap<(InfoId, PrincipalId), StorableGrant, Memory>> = RefCell::new(
        StableBTreeMap::init(get_access_grants_memory())
    );
}

/// Records a grant. Returns the previous grant for the pair if any.
pub fn insert_grant(grant: &AccessGrant) -> Option<AccessGrant> {
    let key = (grant.item_id, grant.grantee);
    GRANTS.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(key, Cbor(grant.clone()))
            .map(|prev| prev.0)
    })
}

pub fn get_grant(item_id: InfoId, grantee: &PrincipalId) -> Option<AccessGrant> {
    GRANTS.with(|map_ref| map_ref.borrow().get(&(item_id, *grantee)).map(|cbor| cbor.0))
}

pub fn has_grant(item_id: InfoId, grantee: &PrincipalId) -> bool {
    GRANTS.with(|map_ref| map_ref.borrow().contains_key(&(item_id, *grantee)))
}
