//! Repository hub.
//!
//! Centralizes access to the three repositories so services depend on one
//! handle. Work that must be atomic (store creation) is done inside the
//! owning repository with a single database transaction.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repository::{
    RatingRepository, RatingStore, StoreRepository, StoreStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get store repository
    fn stores(&self) -> Arc<dyn StoreRepository>;

    /// Get rating repository
    fn ratings(&self) -> Arc<dyn RatingRepository>;
}

/// SeaORM-backed UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    store_repo: Arc<StoreStore>,
    rating_repo: Arc<RatingStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            store_repo: Arc::new(StoreStore::new(db.clone())),
            rating_repo: Arc::new(RatingStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn stores(&self) -> Arc<dyn StoreRepository> {
        self.store_repo.clone()
    }

    fn ratings(&self) -> Arc<dyn RatingRepository> {
        self.rating_repo.clone()
    }
}
