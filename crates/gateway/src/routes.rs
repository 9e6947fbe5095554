//! Route configuration.

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::{AppError, AppResult};

use crate::handlers::{
    auth_routes, dashboard_routes, health_routes, password_routes, rating_routes, store_routes,
    user_routes,
};
use crate::middleware::auth_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let authenticated = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    let api = Router::new()
        // Registration and login (no auth)
        .nest("/auth", auth_routes())
        // Password change proves identity by credential, not token
        .nest(
            "/users",
            password_routes().merge(user_routes().route_layer(authenticated())),
        )
        .nest("/stores", store_routes().route_layer(authenticated()))
        .nest("/ratings", rating_routes().route_layer(authenticated()))
        .nest("/dashboard", dashboard_routes().route_layer(authenticated()));

    Router::new()
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .with_state(state)
}

/// Router with request tracing and CORS applied.
pub fn create_app(state: AppState, cors_allow_origin: Option<&str>) -> AppResult<Router> {
    Ok(create_router(state)
        .layer(cors_layer(cors_allow_origin)?)
        .layer(TraceLayer::new_for_http()))
}

/// Single allowed origin when configured, any origin otherwise.
pub fn cors_layer(allow_origin: Option<&str>) -> AppResult<CorsLayer> {
    let Some(origin) = allow_origin else {
        return Ok(CorsLayer::permissive());
    };

    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|e| AppError::internal(format!("Invalid CORS_ALLOW_ORIGIN: {}", e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600)))
}
