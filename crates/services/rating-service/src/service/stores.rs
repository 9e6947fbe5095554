//! Store creation by administrators.

use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{
    validation::{validate_address, validate_email, validate_store_name},
    NewStore, Role, Store,
};

use super::access_guard::require_role;
use super::token::Identity;
use crate::infra::UnitOfWork;

#[derive(Debug, Clone, Default)]
pub struct StoreCreation {
    pub name: String,
    /// Email of the existing user who will own the store
    pub email: String,
    pub address: String,
}

pub struct StoreManager {
    uow: Arc<dyn UnitOfWork>,
}

impl StoreManager {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Create a store for the user registered under `email`, promoting them
    /// from NORMAL_USER to STORE_OWNER in the same transaction.
    pub async fn create_store(&self, caller: &Identity, input: StoreCreation) -> AppResult<Store> {
        require_role(caller, &[Role::SystemAdmin])?;

        if input.name.is_empty() || input.email.is_empty() || input.address.trim().is_empty() {
            return Err(AppError::validation("Name, email and address are required"));
        }
        validate_store_name(&input.name)?;
        validate_email(&input.email)?;
        validate_address(&input.address)?;

        let owner = self
            .uow
            .users()
            .find_by_email(&input.email)
            .await?
            .ok_or_not_found("User")?;

        match owner.role {
            Role::NormalUser => {}
            Role::StoreOwner => return Err(AppError::conflict("Store")),
            Role::SystemAdmin => {
                return Err(AppError::validation(
                    "Only normal users can be assigned a store",
                ))
            }
        }

        let store = self
            .uow
            .stores()
            .create_for_owner(NewStore {
                name: input.name.trim().to_string(),
                email: input.email,
                address: input.address,
                owner_id: owner.id,
            })
            .await?;

        tracing::info!(store_id = %store.id, owner_id = %owner.id, "Store created");
        Ok(store)
    }
}
