// src/backend/storage/info_items.rs
use crate::models::common::{InfoId, PrincipalId};
use crate::models::info_item::InfoItem;
use crate::storage::memory::{get_info_items_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableInfoItem = Cbor<InfoItem>;

thread_local! {
    /// Info items: Key = item_id, Value = InfoItem
    static ITEMS: RefCell<StableBTreeMap<InfoId, StorableInfoItem, Memory>> = RefCell::new(
        StableBTreeMap::init(get_info_items_memory())
    );
}

/// Inserts or updates an item. Returns the previous record if any.
pub fn insert_item(item: &InfoItem) -> Option<InfoItem> {
    ITEMS.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(item.item_id, Cbor(item.clone()))
            .map(|prev| prev.0)
    })
}

pub fn get_item(item_id: InfoId) -> Option<InfoItem> {
    ITEMS.with(|map_ref| map_ref.borrow().get(&item_id).map(|cbor| cbor.0))
}

pub fn item_count() -> u64 {
    ITEMS.with(|map_ref| map_ref.borrow().len())
}

/// Paginated scan over all items in id order.
pub fn get_items_page(offset: u64, limit: usize) -> Vec<InfoItem> {
    ITEMS.with(|map_ref| {
        map_ref
            .borrow()
            .iter()
            .skip(offset as usize)
            .take(limit)
            .map(|(_id, cbor)| cbor.0)
            .collect()
    })
}

/// All items owned by a principal. Linear scan; item counts are small
/// relative to the map's page cache.
pub fn get_items_by_owner(owner: PrincipalId) -> Vec<InfoItem> {
    ITEMS.with(|map_ref| {
        map_ref
            .borrow()
            .iter()
            .map(|(_id, cbor)| cbor.0)
            .filter(|item| item.owner == owner)
            .collect()
    })
}
