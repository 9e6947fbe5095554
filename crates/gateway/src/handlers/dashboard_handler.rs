//! Dashboard handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};

use common::AppResult;
use domain::{AdminSummary, OwnerSummary};
use rating_service_lib::service::Identity;

use crate::state::AppState;

/// Create dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_summary))
        .route("/store", get(owner_summary))
}

/// Platform totals (admin only)
#[utoipa::path(
    get,
    path = "/api/dashboard/admin",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User, store and rating counts", body = AdminSummary),
        (status = 403, description = "Forbidden - admin only")
    )
)]
pub async fn admin_summary(
    Extension(caller): Extension<Identity>,
    State(state): State<AppState>,
) -> AppResult<Json<AdminSummary>> {
    Ok(Json(state.services.dashboard().admin_summary(&caller).await?))
}

/// The caller's own store with its average and raters (store owners only)
#[utoipa::path(
    get,
    path = "/api/dashboard/store",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Owned store summary", body = OwnerSummary),
        (status = 403, description = "Forbidden - store owners only"),
        (status = 404, description = "Caller owns no store")
    )
)]
pub async fn owner_summary(
    Extension(caller): Extension<Identity>,
    State(state): State<AppState>,
) -> AppResult<Json<OwnerSummary>> {
    Ok(Json(state.services.dashboard().owner_summary(&caller).await?))
}
