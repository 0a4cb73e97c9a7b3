// src/backend/storage/access_requests.rs
use crate::models::access_request::AccessRequest;
use crate::models::common::{InfoId, PrincipalId, RequestId};
use crate::storage::memory::{
    get_access_requests_memory, get_pending_index_memory, get_request_pair_index_memory, Memory,
};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableAccessRequest = Cbor<AccessRequest>;
type StorableRequestIdVec = Cbor<Vec<RequestId>>;

thread_local! {
    /// Access requests: Key = request_id, Value = AccessRequest
    static REQUESTS: RefCell<StableBTreeMap<RequestId, StorableAccessRequest, Memory>> = RefCell::new(
        StableBTreeMap::init(get_access_requests_memory())
    );

    /// Latest request per (item, requester) pair. Used to enforce the
    /// one-outstanding-request invariant; a denied request may be
    /// superseded by a new one.
    static PAIR_INDEX: RefCell<StableBTreeMap<(InfoId, PrincipalId), RequestId, Memory>> = RefCell::new(
        StableBTreeMap::init(get_request_pair_index_memory())
    );

    /// Pending request ids per item, in no guaranteed order.
    static PENDING_INDEX: RefCell<StableBTreeMap<InfoId, StorableRequestIdVec, Memory>> = RefCell::new(
        StableBTreeMap::init(get_pending_index_memory())
    );
}

/// Inserts or updates a request record and keeps the pair index
/// pointing at the most recent request for its (item, requester) pair.
pub fn insert_request(request: &AccessRequest) -> Option<AccessRequest> {
    PAIR_INDEX.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert((request.item_id, request.requester), request.request_id);
    });
    REQUESTS.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(request.request_id, Cbor(request.clone()))
            .map(|prev| prev.0)
    })
}

/// Overwrites an existing request record without touching the indices.
pub fn update_request(request: &AccessRequest) {
    REQUESTS.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(request.request_id, Cbor(request.clone()));
    });
}

pub fn get_request(request_id: RequestId) -> Option<AccessRequest> {
    REQUESTS.with(|map_ref| map_ref.borrow().get(&request_id).map(|cbor| cbor.0))
}

/// Latest request (any status) for an (item, requester) pair.
pub fn get_request_for_pair(item_id: InfoId, requester: PrincipalId) -> Option<AccessRequest> {
    let request_id = PAIR_INDEX.with(|map_ref| map_ref.borrow().get(&(item_id, requester)));
    request_id.and_then(get_request)
}

pub fn request_count() -> u64 {
    REQUESTS.with(|map_ref| map_ref.borrow().len())
}

/// All requests made by a principal. Linear scan over the record map.
pub fn get_requests_by_requester(requester: PrincipalId) -> Vec<AccessRequest> {
    REQUESTS.with(|map_ref| {
        map_ref
            .borrow()
            .iter()
            .map(|(_id, cbor)| cbor.0)
            .filter(|req| req.requester == requester)
            .collect()
    })
}

/// Adds a request id to the item's pending list.
pub fn add_pending(item_id: InfoId, request_id: RequestId) {
    PENDING_INDEX.with(|map_ref| {
        let mut map = map_ref.borrow_mut();
        let mut pending = map.get(&item_id).map(|c| c.0).unwrap_or_default();
        pending.push(request_id);
        map.insert(item_id, Cbor(pending));
    });
}

/// Removes a request id from the item's pending list via swap-remove.
/// Pending list order is not part of the API contract.
pub fn remove_pending(item_id: InfoId, request_id: RequestId) {
    PENDING_INDEX.with(|map_ref| {
        let mut map = map_ref.borrow_mut();
        if let Some(mut pending) = map.get(&item_id).map(|c| c.0) {
            if let Some(pos) = pending.iter().position(|id| *id == request_id) {
                pending.swap_remove(pos);
                map.insert(item_id, Cbor(pending));
            }
        }
    });
}

/// Pending request ids for an item.
pub fn get_pending_ids(item_id: InfoId) -> Vec<RequestId> {
    PENDING_INDEX.with(|map_ref| {
        map_ref
            .borrow()
            .get(&item_id)
            .map(|c| c.0)
            .unwrap_or_default()
    })
}

/// Total pending requests across all items.
pub fn pending_count() -> u64 {
    PENDING_INDEX.with(|map_ref| {
        map_ref
            .borrow()
            .iter()
            .map(|(_id, c)| c.0.len() as u64)
            .sum()
    })
}
