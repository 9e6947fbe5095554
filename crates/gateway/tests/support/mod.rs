#![allow(dead_code)]

//! Router fixtures over mocked repositories.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use common::JwtConfig;
use domain::{Role, Store, User};
use gateway_lib::{routes::create_router, state::AppState, state::HealthProbe};
use rating_service_lib::infra::UnitOfWork;
use rating_service_lib::repository::{
    MockRatingRepository, MockStoreRepository, MockUserRepository, RatingRepository,
    StoreRepository, UserRepository,
};
use rating_service_lib::service::Identity;
use rating_service_lib::Services;

pub const TEST_JWT_SECRET: &str = "gateway-test-secret-long-enough-for-hs256";

struct MockHub {
    users: Arc<MockUserRepository>,
    stores: Arc<MockStoreRepository>,
    ratings: Arc<MockRatingRepository>,
}

impl UnitOfWork for MockHub {
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

/// Probe with a fixed answer.
pub struct StaticProbe(pub bool);

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn ping(&self) -> Result<(), String> {
        if self.0 {
            Ok(())
        } else {
            Err("connection refused".to_string())
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub services: Services,
}

pub fn app(
    users: MockUserRepository,
    stores: MockStoreRepository,
    ratings: MockRatingRepository,
) -> TestApp {
    app_with_probe(users, stores, ratings, true)
}

pub fn app_with_probe(
    users: MockUserRepository,
    stores: MockStoreRepository,
    ratings: MockRatingRepository,
    healthy: bool,
) -> TestApp {
    let hub = Arc::new(MockHub {
        users: Arc::new(users),
        stores: Arc::new(stores),
        ratings: Arc::new(ratings),
    });
    let jwt = JwtConfig::new(TEST_JWT_SECRET).unwrap();
    let services = Services::new(hub, &jwt);
    let state = AppState::new(services.clone(), Arc::new(StaticProbe(healthy)));

    TestApp {
        router: create_router(state),
        services,
    }
}

/// App whose repositories must never be touched.
pub fn untouched_app() -> TestApp {
    app(
        MockUserRepository::new(),
        MockStoreRepository::new(),
        MockRatingRepository::new(),
    )
}

impl TestApp {
    /// A fresh identity with the given role and its `Authorization` value.
    pub fn bearer(&self, role: Role) -> (Identity, String) {
        let identity = Identity {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", role.as_str().to_lowercase()),
            role,
        };
        let token = self.services.tokens().issue(&identity).unwrap();
        (identity, format!("Bearer {}", token))
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

pub fn user(name: &str, email: &str, role: Role) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        address: None,
        password_hash: "not-a-real-hash".to_string(),
        role,
        created_at: now,
        updated_at: now,
    }
}

pub fn store_owned_by(owner_id: Uuid) -> Store {
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
