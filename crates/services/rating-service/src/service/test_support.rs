//! Repository hub over mockall mocks.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use domain::{Role, Store};

use super::token::Identity;
use crate::infra::UnitOfWork;
use crate::repository::{
    MockRatingRepository, MockStoreRepository, MockUserRepository, RatingRepository,
    StoreRepository, UserRepository,
};

pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    stores: Arc<MockStoreRepository>,
    ratings: Arc<MockRatingRepository>,
}

impl TestUnitOfWork {
    pub(crate) fn new(
        users: MockUserRepository,
        stores: MockStoreRepository,
        ratings: MockRatingRepository,
    ) -> Arc<Self> {
        Arc::new(Self {
            users: Arc::new(users),
            stores: Arc::new(stores),
            ratings: Arc::new(ratings),
        })
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn stores(&self) -> Arc<dyn StoreRepository> {
        self.stores.clone()
    }

    fn ratings(&self) -> Arc<dyn RatingRepository> {
        self.ratings.clone()
    }
}

pub(crate) fn caller(role: Role) -> Identity {
    Identity {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", role.as_str().to_lowercase()),
        role,
    }
}

pub(crate) fn store_owned_by(owner_id: Uuid) -> Store {
    let now = Utc::now();
    Store {
        id: Uuid::new_v4(),
        name: "Corner Shop".to_string(),
        email: Some("shop@example.com".to_string()),
        address: "1 Market Street".to_string(),
        owner_id,
        created_at: now,
        updated_at: now,
    }
}
