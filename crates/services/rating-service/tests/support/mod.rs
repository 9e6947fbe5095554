#![allow(dead_code)]

//! In-memory repositories for multi-step scenarios.
//!
//! Mirrors the storage constraints the services rely on: unique user email,
//! one store per owner, and one rating per (user, store).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{
    average_rating, NewStore, NewUser, RaterEntry, Rating, RatingInsert, Role, Score, Store,
    StoreRatingStats, User,
};
use rating_service_lib::infra::UnitOfWork;
use rating_service_lib::repository::{RatingRepository, StoreRepository, UserRepository};
use rating_service_lib::service::Identity;
use rating_service_lib::Services;

#[derive(Default)]
struct State {
    users: Vec<User>,
    stores: Vec<Store>,
    ratings: Vec<Rating>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Insert a user directly, bypassing hashing.
    pub fn seed_user(&self, name: &str, email: &str, role: Role) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            address: None,
            password_hash: "not-a-real-hash".to_string(),
            role,
            created_at: now,
            updated_at: now,
        };
        self.with(|s| s.users.push(user.clone()));
        user
    }

    pub fn user_role(&self, id: Uuid) -> Option<Role> {
        self.with(|s| s.users.iter().find(|u| u.id == id).map(|u| u.role))
    }
}

impl UnitOfWork for InMemoryStore {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    fn stores(&self) -> Arc<dyn StoreRepository> {
        Arc::new(self.clone())
    }

    fn ratings(&self) -> Arc<dyn RatingRepository> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.with(|s| s.users.iter().find(|u| u.email == email).cloned()))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        self.with(|s| {
            if s.users.iter().any(|u| u.email == new_user.email) {
                return Err(AppError::conflict("Email"));
            }
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                name: new_user.name,
                email: new_user.email,
                address: new_user.address,
                password_hash: new_user.password_hash,
                role: new_user.role,
                created_at: now,
                updated_at: now,
            };
            s.users.push(user.clone());
            Ok(user)
        })
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<bool> {
        Ok(self.with(|s| match s.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users = self.with(|s| s.users.clone());
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.with(|s| s.users.len() as u64))
    }
}

#[async_trait]
impl StoreRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>> {
        Ok(self.with(|s| s.stores.iter().find(|st| st.id == id).cloned()))
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Option<Store>> {
        Ok(self.with(|s| s.stores.iter().find(|st| st.owner_id == owner_id).cloned()))
    }

    async fn create_for_owner(&self, new_store: NewStore) -> AppResult<Store> {
        self.with(|s| {
            if s.stores.iter().any(|st| st.email.as_deref() == Some(new_store.email.as_str())) {
                return Err(AppError::conflict("Store"));
            }
            let owner = s
                .users
                .iter_mut()
                .find(|u| u.id == new_store.owner_id && u.role == Role::NormalUser)
                .ok_or_else(|| AppError::conflict("Store owner"))?;
            owner.role = Role::StoreOwner;

            let now = Utc::now();
            let store = Store {
                id: Uuid::new_v4(),
                name: new_store.name,
                email: Some(new_store.email),
                address: new_store.address,
                owner_id: new_store.owner_id,
                created_at: now,
                updated_at: now,
            };
            s.stores.push(store.clone());
            Ok(store)
        })
    }

    async fn list_with_ratings(&self) -> AppResult<Vec<StoreRatingStats>> {
        let mut stats = self.with(|s| {
            s.stores
                .iter()
                .map(|st| {
                    let values: Vec<i32> = s
                        .ratings
                        .iter()
                        .filter(|r| r.store_id == st.id)
                        .map(|r| r.rating)
                        .collect();
                    StoreRatingStats {
                        store_id: st.id,
                        name: st.name.clone(),
                        email: st.email.clone(),
                        address: st.address.clone(),
                        average_rating: average_rating(values.iter().copied()),
                    }
                })
                .collect::<Vec<_>>()
        });
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(stats)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.with(|s| s.stores.len() as u64))
    }
}

#[async_trait]
impl RatingRepository for InMemoryStore {
    async fn insert(&self, user_id: Uuid, store_id: Uuid, score: Score) -> AppResult<RatingInsert> {
        Ok(self.with(|s| {
            if s.ratings.iter().any(|r| r.user_id == user_id && r.store_id == store_id) {
                return RatingInsert::AlreadyRated;
            }
            let now = Utc::now();
            let rating = Rating {
                id: Uuid::new_v4(),
                user_id,
                store_id,
                rating: score.value(),
                created_at: now,
                updated_at: now,
            };
            s.ratings.push(rating.clone());
            RatingInsert::Created(rating)
        }))
    }

    async fn update(
        &self,
        user_id: Uuid,
        store_id: Uuid,
        score: Score,
    ) -> AppResult<Option<Rating>> {
        Ok(self.with(|s| {
            s.ratings
                .iter_mut()
                .find(|r| r.user_id == user_id && r.store_id == store_id)
                .map(|r| {
                    r.rating = score.value();
                    r.updated_at = Utc::now();
                    r.clone()
                })
        }))
    }

    async fn ratings_by_user(&self, user_id: Uuid) -> AppResult<HashMap<Uuid, i32>> {
        Ok(self.with(|s| {
            s.ratings
                .iter()
                .filter(|r| r.user_id == user_id)
                .map(|r| (r.store_id, r.rating))
                .collect()
        }))
    }

    async fn raters_for_store(&self, store_id: Uuid) -> AppResult<Vec<RaterEntry>> {
        let mut raters = self.with(|s| {
            // Newest insert first so equal timestamps keep recency order
            s.ratings
                .iter()
                .rev()
                .filter(|r| r.store_id == store_id)
                .filter_map(|r| {
                    let user = s.users.iter().find(|u| u.id == r.user_id)?;
                    Some(RaterEntry {
                        user_id: user.id,
                        name: user.name.clone(),
                        email: user.email.clone(),
                        rating: r.rating,
                        rated_at: r.updated_at,
                    })
                })
                .collect::<Vec<_>>()
        });
        raters.sort_by(|a, b| b.rated_at.cmp(&a.rated_at));
        Ok(raters)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.with(|s| s.ratings.len() as u64))
    }
}

pub const TEST_JWT_SECRET: &str = "integration-test-secret-of-sufficient-length";

pub fn services(store: &InMemoryStore) -> Services {
    let jwt = JwtConfig::new(TEST_JWT_SECRET).unwrap();
    Services::new(Arc::new(store.clone()), &jwt)
}

pub fn identity_of(user: &User) -> Identity {
    Identity::from(user)
}

pub fn admin() -> Identity {
    Identity {
        id: Uuid::new_v4(),
        email: "admin@example.com".to_string(),
        role: Role::SystemAdmin,
    }
}
