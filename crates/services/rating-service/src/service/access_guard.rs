//! Bearer extraction and role enforcement.
//!
//! Stateless: every call re-verifies the token. Authentication failures
//! (`Unauthorized`, `InvalidToken`, `TokenExpired`) stay distinct from
//! authorization failures (`Forbidden`).

use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{Role, BEARER_TOKEN_PREFIX};

use super::token::{Identity, TokenService};

pub struct AccessGuard {
    tokens: Arc<TokenService>,
}

impl AccessGuard {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// The token part of an `Authorization: Bearer <token>` header value.
    pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
        header
            .and_then(|value| value.strip_prefix(BEARER_TOKEN_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Anonymous-tolerant identification: no bearer token is `Ok(None)`,
    /// but a token that is present and fails verification is an error.
    pub fn identify(&self, header: Option<&str>) -> AppResult<Option<Identity>> {
        Self::extract_bearer(header)
            .map(|token| self.tokens.verify(token))
            .transpose()
    }

    /// A verified identity is required.
    pub fn authenticate(&self, header: Option<&str>) -> AppResult<Identity> {
        self.identify(header)?.ok_or(AppError::Unauthorized)
    }
}

/// Fail with `Forbidden` unless the caller holds one of the allowed roles.
pub fn require_role(identity: &Identity, allowed: &[Role]) -> AppResult<()> {
    if identity.role.is_one_of(allowed) {
        return Ok(());
    }

    tracing::warn!(
        user_id = %identity.id,
        role = %identity.role,
        "Access denied for role"
    );
    Err(AppError::forbidden("Access denied for this role"))
}
