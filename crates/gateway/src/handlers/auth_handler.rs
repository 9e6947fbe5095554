//! Registration and login handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{Role, UserResponse};
use rating_service_lib::service::{LoginResult, Registration};

use crate::extractors::{AppJson, ValidatedJson};
use crate::state::AppState;

/// Self-registration request. Field rules are enforced by the credential
/// manager so that admin-created accounts share them.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name, 20-60 characters
    #[serde(default)]
    #[schema(example = "Alexandra Catherine Whitmore")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "alexandra@example.com")]
    pub email: String,
    /// Optional postal address, at most 400 characters
    pub address: Option<String>,
    /// 8-16 characters with one uppercase letter and one special character
    #[serde(default)]
    #[schema(example = "Secret!123")]
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            address: req.address,
            password: req.password,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    #[schema(example = "alexandra@example.com")]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,
}

/// Token plus the caller's public profile.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<LoginResult> for LoginResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            token: result.token,
            email: result.email,
            name: result.name,
            role: result.role,
        }
    }
}

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new normal user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid name, email, address or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.services.credentials().register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Exchange credentials for a one-hour token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let result = state
        .services
        .credentials()
        .login(&req.email, &req.password)
        .await?;
    Ok(Json(result.into()))
}
