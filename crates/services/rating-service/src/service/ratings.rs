//! Role-scoped store listings and the rating write path.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{RaterEntry, Rating, RatingInsert, Role, Score, StoreListing};

use super::access_guard::require_role;
use super::token::Identity;
use crate::infra::UnitOfWork;

const OWN_STORE_MESSAGE: &str = "You cannot rate your own store";

pub struct RatingAggregator {
    uow: Arc<dyn UnitOfWork>,
}

impl RatingAggregator {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// All stores with their average rating, shaped by the caller's role.
    ///
    /// Store owners see only their own store, through the owner dashboard.
    pub async fn list_stores(&self, caller: &Identity) -> AppResult<StoreListing> {
        let stores = self.uow.stores();
        match caller.role {
            Role::SystemAdmin => Ok(StoreListing::for_admin(stores.list_with_ratings().await?)),
            Role::NormalUser => {
                let ratings = self.uow.ratings();
                let (stats, own) = tokio::try_join!(
                    stores.list_with_ratings(),
                    ratings.ratings_by_user(caller.id)
                )?;
                Ok(StoreListing::for_normal_user(stats, &own))
            }
            Role::StoreOwner => {
                tracing::warn!(user_id = %caller.id, "Store owner denied store listing");
                Err(AppError::forbidden("Store owners view their store through the dashboard"))
            }
        }
    }

    /// Create the caller's rating of a store.
    ///
    /// The value is validated before anything else, so malformed ratings
    /// are rejected whatever the caller's role. A second rating of the same
    /// store is a `Conflict`, never an overwrite.
    pub async fn submit_rating(
        &self,
        caller: &Identity,
        store_id: Uuid,
        raw_rating: &Value,
    ) -> AppResult<Rating> {
        let score = Score::try_from(raw_rating)?;
        require_role(caller, &[Role::NormalUser])?;

        let store = self
            .uow
            .stores()
            .find_by_id(store_id)
            .await?
            .ok_or_not_found("Store")?;
        if store.is_owned_by(caller.id) {
            return Err(AppError::business_rule(OWN_STORE_MESSAGE));
        }

        match self.uow.ratings().insert(caller.id, store_id, score).await? {
            RatingInsert::Created(rating) => {
                tracing::debug!(user_id = %caller.id, %store_id, rating = rating.rating, "Rating submitted");
                Ok(rating)
            }
            RatingInsert::AlreadyRated => Err(AppError::conflict("Rating")),
        }
    }

    /// Change the value of the caller's existing rating of a store.
    pub async fn update_rating(
        &self,
        caller: &Identity,
        store_id: Uuid,
        raw_rating: &Value,
    ) -> AppResult<Rating> {
        let score = Score::try_from(raw_rating)?;
        require_role(caller, &[Role::NormalUser])?;

        let rating = self
            .uow
            .ratings()
            .update(caller.id, store_id, score)
            .await?
            .ok_or_not_found("Rating")?;

        tracing::debug!(user_id = %caller.id, %store_id, rating = rating.rating, "Rating updated");
        Ok(rating)
    }

    /// Raw ratings of one store with rater identity, newest first.
    ///
    /// Admins may read any store; a store owner only the store they own.
    pub async fn list_ratings_for_store(
        &self,
        caller: &Identity,
        store_id: Uuid,
    ) -> AppResult<Vec<RaterEntry>> {
        require_role(caller, &[Role::SystemAdmin, Role::StoreOwner])?;

        let store = self.uow.stores().find_by_id(store_id).await?;
        match (caller.role, store) {
            (Role::SystemAdmin, None) => return Err(AppError::not_found("Store")),
            (Role::StoreOwner, Some(store)) if store.is_owned_by(caller.id) => {}
            (Role::StoreOwner, _) => {
                tracing::warn!(user_id = %caller.id, %store_id, "Store owner denied foreign store ratings");
                return Err(AppError::forbidden("You can only view ratings of your own store"));
            }
            _ => {}
        }

        self.uow.ratings().raters_for_store(store_id).await
    }
}
