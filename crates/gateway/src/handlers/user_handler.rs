//! User handlers.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{Role, UserResponse};
use rating_service_lib::service::{require_role, Identity, PasswordChange, Registration};

use crate::extractors::{AppJson, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email, old password and new password are required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email, old password and new password are required"))]
    pub old_password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email, old password and new password are required"))]
    pub new_password: String,
}

/// Admin user creation with an explicit role
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub address: Option<String>,
    #[serde(default)]
    pub password: String,
    /// Defaults to NORMAL_USER
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Routes reachable without a token
pub fn password_routes() -> Router<AppState> {
    Router::new().route("/password", put(change_password))
}

/// Routes behind the auth middleware
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", get(list_users).post(create_user))
}

/// Change a password, proven by the current one
#[utoipa::path(
    put,
    path = "/api/users/password",
    tag = "Users",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "New password violates the policy"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .credentials()
        .change_password(PasswordChange {
            email: req.email,
            old_password: req.old_password,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Users ordered by name", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    )
)]
pub async fn list_users(
    Extension(caller): Extension<Identity>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.services.credentials().list_users(&caller).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a user with any role (admin only)
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    Extension(caller): Extension<Identity>,
    State(state): State<AppState>,
    body: Result<AppJson<CreateUserRequest>, AppError>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    require_role(&caller, &[Role::SystemAdmin])?;
    let AppJson(req) = body?;

    let role = req.role.unwrap_or(Role::NormalUser);
    let registration = Registration {
        name: req.name,
        email: req.email,
        address: req.address,
        password: req.password,
    };

    let user = state
        .services
        .credentials()
        .create_user(&caller, registration, role)
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
