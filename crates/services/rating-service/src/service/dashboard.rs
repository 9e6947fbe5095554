//! Platform-wide and per-owner summaries.

use std::sync::Arc;

use common::{AppResult, OptionExt};
use domain::{AdminSummary, OwnerSummary, Role};

use super::access_guard::require_role;
use super::token::Identity;
use crate::infra::UnitOfWork;

pub struct DashboardAggregator {
    uow: Arc<dyn UnitOfWork>,
}

impl DashboardAggregator {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Cardinalities of users, stores and ratings, counted concurrently.
    pub async fn admin_summary(&self, caller: &Identity) -> AppResult<AdminSummary> {
        require_role(caller, &[Role::SystemAdmin])?;

        let (users, stores, ratings) = (self.uow.users(), self.uow.stores(), self.uow.ratings());
        let (total_users, total_stores, total_ratings) =
            tokio::try_join!(users.count(), stores.count(), ratings.count())?;

        Ok(AdminSummary {
            total_users,
            total_stores,
            total_ratings,
        })
    }

    /// The caller's own store with its average and raters, most recent
    /// first. A STORE_OWNER without a store is `NotFound`.
    pub async fn owner_summary(&self, caller: &Identity) -> AppResult<OwnerSummary> {
        require_role(caller, &[Role::StoreOwner])?;

        let store = self
            .uow
            .stores()
            .find_by_owner(caller.id)
            .await?
            .ok_or_not_found("Store")?;
        let raters = self.uow.ratings().raters_for_store(store.id).await?;

        Ok(OwnerSummary::new(&store, raters))
    }
}
