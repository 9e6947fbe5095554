//! Shared application state.

use std::sync::Arc;

use async_trait::async_trait;

use rating_service_lib::{infra::Database, Services};

/// Reachability check for the backing store.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), String>;
}

#[async_trait]
impl HealthProbe for Database {
    async fn ping(&self) -> Result<(), String> {
        Database::ping(self).await.map_err(|e| e.to_string())
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub health: Arc<dyn HealthProbe>,
}

impl AppState {
    pub fn new(services: Services, health: Arc<dyn HealthProbe>) -> Self {
        Self { services, health }
    }
}
