//! Service container - wires every component from one repository hub and
//! one signing configuration.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use common::JwtConfig;

use super::{
    AccessGuard, CredentialManager, DashboardAggregator, RatingAggregator, StoreManager,
    TokenService,
};
use crate::infra::{Persistence, UnitOfWork};

#[derive(Clone)]
pub struct Services {
    tokens: Arc<TokenService>,
    guard: Arc<AccessGuard>,
    credentials: Arc<CredentialManager>,
    ratings: Arc<RatingAggregator>,
    stores: Arc<StoreManager>,
    dashboard: Arc<DashboardAggregator>,
}

impl Services {
    /// Build all services over the given repository hub.
    pub fn new(uow: Arc<dyn UnitOfWork>, jwt: &JwtConfig) -> Self {
        let tokens = Arc::new(TokenService::new(jwt));

        Self {
            guard: Arc::new(AccessGuard::new(tokens.clone())),
            credentials: Arc::new(CredentialManager::new(uow.clone(), tokens.clone())),
            ratings: Arc::new(RatingAggregator::new(uow.clone())),
            stores: Arc::new(StoreManager::new(uow.clone())),
            dashboard: Arc::new(DashboardAggregator::new(uow)),
            tokens,
        }
    }

    /// Build all services over SeaORM repositories.
    pub fn from_connection(db: DatabaseConnection, jwt: &JwtConfig) -> Self {
        Self::new(Arc::new(Persistence::new(db)), jwt)
    }

    pub fn tokens(&self) -> Arc<TokenService> {
        self.tokens.clone()
    }

    pub fn guard(&self) -> Arc<AccessGuard> {
        self.guard.clone()
    }

    pub fn credentials(&self) -> Arc<CredentialManager> {
        self.credentials.clone()
    }

    pub fn ratings(&self) -> Arc<RatingAggregator> {
        self.ratings.clone()
    }

    pub fn stores(&self) -> Arc<StoreManager> {
        self.stores.clone()
    }

    pub fn dashboard(&self) -> Arc<DashboardAggregator> {
        self.dashboard.clone()
    }
}
