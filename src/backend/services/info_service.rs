// src/backend/services/info_service.rs
// Item lifecycle: create, soft-delete, price updates, and the gated
// reads of content and the encrypted-address handle.

use crate::{
    adapter::fhe,
    error::TradeError,
    metrics,
    models::{
        access_request::AccessGrant,
        audit_log::LogAction,
        common::*,
        info_item::{InfoItem, InfoSummary},
    },
    storage::{audit_logs, counters, grants, info_items},
    utils::{crypto::sha256_hex, time::now_ns},
};

/// Creation payload, mapped from the API layer.
#[derive(Clone, Debug)]
pub struct InfoInitData {
    pub owner: PrincipalId,
    pub title: String,
    pub content: String,
    /// External FHE ciphertext of the recipient address.
    pub encrypted_address: Vec<u8>,
    /// Input proof for the ciphertext, checked by the coprocessor.
    pub proof: Vec<u8>,
    pub price_e8s: E8s,
}

/// Creates a new info item, registers its ciphertext with the FHE
/// service, and auto-grants the owner.
pub async fn create_new_info(init_data: InfoInitData) -> Result<InfoId, TradeError> {
    if init_data.title.trim().is_empty() {
        return Err(TradeError::InvalidInput("Title must not be empty".to_string()));
    }
    if init_data.content.trim().is_empty() {
        return Err(TradeError::InvalidInput("Content must not be empty".to_string()));
    }
    if init_data.price_e8s == 0 {
        return Err(TradeError::InvalidInput("Price must be positive".to_string()));
    }

    // Register the ciphertext before any ledger state is written, so a
    // coprocessor rejection leaves no partial item behind.
    let handle = fhe::register_ciphertext(&init_data.encrypted_address, &init_data.proof).await?;
    fhe::allow_this(&handle).await?;
    fhe::allow(&handle, init_data.owner).await?;

    let item_id = counters::next_info_id().map_err(TradeError::InternalError)?;
    let current_time = now_ns();

    let item = InfoItem {
        item_id,
        owner: init_data.owner,
        title: init_data.title,
        content_sha256: sha256_hex(init_data.content.as_bytes()),
        content: init_data.content,
        encrypted_address: handle,
        price_e8s: init_data.price_e8s,
        is_active: true,
        created_at: current_time,
        updated_at: current_time,
    };

    if info_items::insert_item(&item).is_some() {
        return Err(TradeError::InternalError(format!(
            "Item id {} already allocated",
            item_id
        )));
    }

    grants::insert_grant(&AccessGrant {
        item_id,
        grantee: item.owner,
        source: GrantSource::Owner,
        granted_at: current_time,
    });

    audit_logs::add_event(
        item.owner,
        LogAction::InfoCreated,
        Some(item_id),
        None,
        Some(item.price_e8s),
        Some(item.title.clone()),
    )
    .map_err(TradeError::InternalError)?;
    metrics::record_item_created().map_err(TradeError::InternalError)?;

    ic_cdk::println!(
        "Info item {} created by {} at price {} e8s",
        item_id,
        item.owner,
        item.price_e8s
    );

    Ok(item_id)
}

/// Soft-deletes an item. `is_active` never transitions back to true.
pub fn deactivate_info(item_id: InfoId, caller: PrincipalId) -> Result<(), TradeError> {
    let mut item = info_items::get_item(item_id).ok_or(TradeError::InfoNotFound(item_id))?;

    if item.owner != caller {
        return Err(TradeError::NotAuthorized(format!(
            "Caller {} is not the owner of item {}",
            caller, item_id
        )));
    }
    if !item.is_active {
        return Err(TradeError::InvalidState(format!(
            "Item {} is already inactive",
            item_id
        )));
    }

    item.is_active = false;
    item.updated_at = now_ns();
    info_items::insert_item(&item);

    audit_logs::add_event(caller, LogAction::InfoDeactivated, Some(item_id), None, None, None)
        .map_err(TradeError::InternalError)?;
    metrics::record_item_deactivated().map_err(TradeError::InternalError)?;

    Ok(())
}

/// Updates the plaintext price of an active item.
pub fn update_price(
    item_id: InfoId,
    new_price_e8s: E8s,
    caller: PrincipalId,
) -> Result<(), TradeError> {
    let mut item = info_items::get_item(item_id).ok_or(TradeError::InfoNotFound(item_id))?;

    if item.owner != caller {
        return Err(TradeError::NotAuthorized(format!(
            "Caller {} is not the owner of item {}",
            caller, item_id
        )));
    }
    if !item.is_active {
        return Err(TradeError::InvalidState(format!(
            "Item {} is inactive; price is frozen",
            item_id
        )));
    }
    if new_price_e8s == 0 {
        return Err(TradeError::InvalidInput("Price must be positive".to_string()));
    }

    item.price_e8s = new_price_e8s;
    item.updated_at = now_ns();
    info_items::insert_item(&item);

    audit_logs::add_event(
        caller,
        LogAction::PriceUpdated,
        Some(item_id),
        None,
        Some(new_price_e8s),
        None,
    )
    .map_err(TradeError::InternalError)?;

    Ok(())
}

/// Public metadata for an item.
pub fn get_info_summary(item_id: InfoId) -> Result<InfoSummary, TradeError> {
    info_items::get_item(item_id)
        .map(|item| item.summary())
        .ok_or(TradeError::InfoNotFound(item_id))
}

/// Plaintext content, gated on an access grant.
pub fn get_info_content(item_id: InfoId, caller: PrincipalId) -> Result<String, TradeError> {
    let item = info_items::get_item(item_id).ok_or(TradeError::InfoNotFound(item_id))?;
    ensure_can_read(&item, caller)?;
    Ok(item.content)
}

/// Ciphertext handle for client-side decryption, gated like content.
pub fn get_encrypted_address(
    item_id: InfoId,
    caller: PrincipalId,
) -> Result<FheHandle, TradeError> {
    let item = info_items::get_item(item_id).ok_or(TradeError::InfoNotFound(item_id))?;
    ensure_can_read(&item, caller)?;
    Ok(item.encrypted_address)
}

fn ensure_can_read(item: &InfoItem, caller: PrincipalId) -> Result<(), TradeError> {
    if item.owner == caller || grants::has_grant(item.item_id, &caller) {
        Ok(())
    } else {
        Err(TradeError::NotAuthorized(format!(
            "Caller {} holds no access grant for item {}",
            caller, item.item_id
        )))
    }
}

/// Paginated listing of all items (public metadata only).
pub fn list_infos(offset: u64, limit: usize) -> (Vec<InfoSummary>, u64) {
    let summaries = info_items::get_items_page(offset, limit)
        .into_iter()
        .map(|item| item.summary())
        .collect();
    (summaries, info_items::item_count())
}

/// All items owned by the caller.
pub fn list_infos_by_owner(owner: PrincipalId) -> Vec<InfoSummary> {
    info_items::get_items_by_owner(owner)
        .into_iter()
        .map(|item| item.summary())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::Principal;
    use futures::executor::block_on;

    fn alice() -> Principal {
        Principal::from_slice(&[1; 8])
    }

    fn bob() -> Principal {
        Principal::from_slice(&[2; 8])
    }

    fn init_data(owner: Principal) -> InfoInitData {
        InfoInitData {
            owner,
            title: "Alpha leak".to_string(),
            content: "the password is hunter2".to_string(),
            encrypted_address: vec![0xAB; 32],
            proof: vec![0x01; 64],
            price_e8s: 100_000,
        }
    }

    #[test]
    fn create_allocates_sequential_ids_and_grants_owner() {
        crate::utils::time::set_now_ns(42_000_000_000);
        let first = block_on(create_new_info(init_data(alice()))).unwrap();
        let second = block_on(create_new_info(InfoInitData {
            encrypted_address: vec![0xCD; 32],
            ..init_data(alice())
        }))
        .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(get_info_summary(first).unwrap().created_at, 42_000_000_000);
        assert_eq!(get_info_content(first, alice()).unwrap(), "the password is hunter2");

        let handle = get_encrypted_address(first, alice()).unwrap();
        assert!(fhe::is_allowed(&handle, &alice()));
    }

    #[test]
    fn create_rejects_empty_title() {
        let result = block_on(create_new_info(InfoInitData {
            title: "   ".to_string(),
            ..init_data(alice())
        }));
        assert!(matches!(result, Err(TradeError::InvalidInput(_))));
    }

    #[test]
    fn create_rejects_empty_content() {
        let result = block_on(create_new_info(InfoInitData {
            content: String::new(),
            ..init_data(alice())
        }));
        assert!(matches!(result, Err(TradeError::InvalidInput(_))));
    }

    #[test]
    fn create_rejects_zero_price() {
        let result = block_on(create_new_info(InfoInitData {
            price_e8s: 0,
            ..init_data(alice())
        }));
        assert!(matches!(result, Err(TradeError::InvalidInput(_))));
    }

    #[test]
    fn create_rejects_bad_proof_without_allocating() {
        let result = block_on(create_new_info(InfoInitData {
            proof: vec![],
            ..init_data(alice())
        }));
        assert_eq!(
            result,
            Err(TradeError::FheError("Input proof verification failed".to_string()))
        );
        assert_eq!(counters::current_info_id(), 0);
    }

    #[test]
    fn stranger_cannot_read_content_or_handle() {
        let item_id = block_on(create_new_info(init_data(alice()))).unwrap();

        assert!(matches!(
            get_info_content(item_id, bob()),
            Err(TradeError::NotAuthorized(_))
        ));
        assert!(matches!(
            get_encrypted_address(item_id, bob()),
            Err(TradeError::NotAuthorized(_))
        ));
        // Public metadata stays readable.
        assert_eq!(get_info_summary(item_id).unwrap().title, "Alpha leak");
    }

    #[test]
    fn deactivate_is_owner_only_and_one_way() {
        let item_id = block_on(create_new_info(init_data(alice()))).unwrap();

        assert!(matches!(
            deactivate_info(item_id, bob()),
            Err(TradeError::NotAuthorized(_))
        ));
        deactivate_info(item_id, alice()).unwrap();
        assert!(!get_info_summary(item_id).unwrap().is_active);
        assert!(matches!(
            deactivate_info(item_id, alice()),
            Err(TradeError::InvalidState(_))
        ));
        // Owner still reads their own content after deactivation.
        assert!(get_info_content(item_id, alice()).is_ok());
    }

    #[test]
    fn update_price_rules() {
        let item_id = block_on(create_new_info(init_data(alice()))).unwrap();

        assert!(matches!(
            update_price(item_id, 200_000, bob()),
            Err(TradeError::NotAuthorized(_))
        ));
        assert!(matches!(
            update_price(item_id, 0, alice()),
            Err(TradeError::InvalidInput(_))
        ));

        update_price(item_id, 200_000, alice()).unwrap();
        assert_eq!(get_info_summary(item_id).unwrap().price_e8s, 200_000);

        deactivate_info(item_id, alice()).unwrap();
        assert!(matches!(
            update_price(item_id, 300_000, alice()),
            Err(TradeError::InvalidState(_))
        ));
    }

    #[test]
    fn list_infos_paginates() {
        for i in 0..5u64 {
            block_on(create_new_info(InfoInitData {
                title: format!("item {}", i),
                encrypted_address: vec![i as u8; 32],
                ..init_data(alice())
            }))
            .unwrap();
        }

        let (page, total) = list_infos(0, 3);
        assert_eq!(total, 5);
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].item_id, 1);

        let (rest, _) = list_infos(3, 10);
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[1].item_id, 5);

        assert_eq!(list_infos_by_owner(alice()).len(), 5);
        assert!(list_infos_by_owner(bob()).is_empty());
    }
}
