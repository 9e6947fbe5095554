//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::auth_handler::{LoginRequest, LoginResponse, RegisterRequest};
use crate::handlers::health_handler::{ComponentHealth, HealthResponse};
use crate::handlers::rating_handler::RatingRequest;
use crate::handlers::store_handler::CreateStoreRequest;
use crate::handlers::user_handler::{ChangePasswordRequest, CreateUserRequest, MessageResponse};
use domain::{
    AdminStoreView, AdminSummary, OwnedStore, OwnerSummary, RaterEntry, Rating, Role,
    StoreResponse, UserResponse, UserStoreView,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::user_handler::change_password,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::create_user,
        crate::handlers::store_handler::list_stores,
        crate::handlers::store_handler::create_store,
        crate::handlers::rating_handler::submit_rating,
        crate::handlers::rating_handler::update_rating,
        crate::handlers::rating_handler::list_store_ratings,
        crate::handlers::dashboard_handler::admin_summary,
        crate::handlers::dashboard_handler::owner_summary,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ChangePasswordRequest,
            CreateUserRequest,
            MessageResponse,
            CreateStoreRequest,
            RatingRequest,
            HealthResponse,
            ComponentHealth,
            Role,
            UserResponse,
            StoreResponse,
            AdminStoreView,
            UserStoreView,
            Rating,
            RaterEntry,
            AdminSummary,
            OwnedStore,
            OwnerSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "Password change and user administration"),
        (name = "Stores", description = "Store listing and creation"),
        (name = "Ratings", description = "Submitting and reading store ratings"),
        (name = "Dashboard", description = "Admin and store-owner summaries"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
