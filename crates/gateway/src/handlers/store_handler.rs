//! Store handlers.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use common::{AppError, AppResult};
use domain::{Role, StoreListing, StoreResponse, UserStoreView};
use rating_service_lib::service::{require_role, Identity, StoreCreation};

use crate::extractors::AppJson;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStoreRequest {
    /// Store name, 1-100 characters
    #[serde(default)]
    #[schema(example = "Corner Shop")]
    pub name: String,
    /// Email of the existing normal user who will own the store
    #[serde(default)]
    #[schema(example = "owner@example.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "1 Market Street")]
    pub address: String,
}

/// Create store routes
pub fn store_routes() -> Router<AppState> {
    Router::new().route("/", get(list_stores).post(create_store))
}

/// List every store with its average rating.
///
/// Admins get `AdminStoreView` rows; normal users get `UserStoreView` rows
/// carrying their own rating.
#[utoipa::path(
    get,
    path = "/api/stores",
    tag = "Stores",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Normal-user shape; admins receive AdminStoreView rows", body = Vec<UserStoreView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Store owners cannot list stores")
    )
)]
pub async fn list_stores(
    Extension(caller): Extension<Identity>,
    State(state): State<AppState>,
) -> AppResult<Json<StoreListing>> {
    let listing = state.services.ratings().list_stores(&caller).await?;
    Ok(Json(listing))
}

/// Create a store and promote its owner (admin only)
#[utoipa::path(
    post,
    path = "/api/stores",
    tag = "Stores",
    security(("bearer_auth" = [])),
    request_body = CreateStoreRequest,
    responses(
        (status = 201, description = "Store created", body = StoreResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "No user with that email"),
        (status = 409, description = "User already owns a store")
    )
)]
pub async fn create_store(
    Extension(caller): Extension<Identity>,
    State(state): State<AppState>,
    body: Result<AppJson<CreateStoreRequest>, AppError>,
) -> AppResult<(StatusCode, Json<StoreResponse>)> {
    require_role(&caller, &[Role::SystemAdmin])?;
    let AppJson(req) = body?;

    let store = state
        .services
        .stores()
        .create_store(
            &caller,
            StoreCreation {
                name: req.name,
                email: req.email,
                address: req.address,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(StoreResponse::from(store))))
}
