//! Rating handlers.

use axum::{
    extract::{rejection::PathRejection, Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{RaterEntry, Rating};
use rating_service_lib::service::Identity;

use crate::extractors::AppJson;
use crate::state::AppState;

/// Rating body. The value is kept raw so non-integers are reported as
/// validation errors rather than coerced.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RatingRequest {
    /// Integer from 1 to 5
    #[serde(default)]
    #[schema(value_type = i32, example = 4)]
    pub rating: Value,
}

/// Create rating routes
pub fn rating_routes() -> Router<AppState> {
    Router::new().route(
        "/store/:store_id",
        get(list_store_ratings)
            .post(submit_rating)
            .put(update_rating),
    )
}

fn store_id(path: Result<Path<Uuid>, PathRejection>) -> AppResult<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::validation("Invalid store id"))
}

/// Rate a store (normal users, once per store)
#[utoipa::path(
    post,
    path = "/api/ratings/store/{store_id}",
    tag = "Ratings",
    security(("bearer_auth" = [])),
    params(("store_id" = Uuid, Path, description = "Store to rate")),
    request_body = RatingRequest,
    responses(
        (status = 201, description = "Rating created", body = Rating),
        (status = 400, description = "Rating outside 1-5 or own store"),
        (status = 403, description = "Only normal users can rate"),
        (status = 404, description = "Store not found"),
        (status = 409, description = "Store already rated by caller")
    )
)]
pub async fn submit_rating(
    Extension(caller): Extension<Identity>,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    AppJson(req): AppJson<RatingRequest>,
) -> AppResult<(StatusCode, Json<Rating>)> {
    let store_id = store_id(path)?;
    let rating = state
        .services
        .ratings()
        .submit_rating(&caller, store_id, &req.rating)
        .await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

/// Change the caller's existing rating of a store
#[utoipa::path(
    put,
    path = "/api/ratings/store/{store_id}",
    tag = "Ratings",
    security(("bearer_auth" = [])),
    params(("store_id" = Uuid, Path, description = "Rated store")),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating updated", body = Rating),
        (status = 400, description = "Rating outside 1-5"),
        (status = 403, description = "Only normal users can rate"),
        (status = 404, description = "Caller has not rated this store")
    )
)]
pub async fn update_rating(
    Extension(caller): Extension<Identity>,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    AppJson(req): AppJson<RatingRequest>,
) -> AppResult<Json<Rating>> {
    let store_id = store_id(path)?;
    let rating = state
        .services
        .ratings()
        .update_rating(&caller, store_id, &req.rating)
        .await?;
    Ok(Json(rating))
}

/// Ratings of one store with their raters
#[utoipa::path(
    get,
    path = "/api/ratings/store/{store_id}",
    tag = "Ratings",
    security(("bearer_auth" = [])),
    params(("store_id" = Uuid, Path, description = "Store whose ratings to list")),
    responses(
        (status = 200, description = "Ratings, most recent first", body = Vec<RaterEntry>),
        (status = 403, description = "Not an admin or not the store's owner"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn list_store_ratings(
    Extension(caller): Extension<Identity>,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Vec<RaterEntry>>> {
    let store_id = store_id(path)?;
    let raters = state
        .services
        .ratings()
        .list_ratings_for_store(&caller, store_id)
        .await?;
    Ok(Json(raters))
}
