//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_NORMAL_USER, ROLE_STORE_OWNER, ROLE_SYSTEM_ADMIN};
use crate::error::DomainError;

/// User roles enumeration. Exactly one role per user at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SystemAdmin,
    NormalUser,
    StoreOwner,
}

impl Role {
    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => ROLE_SYSTEM_ADMIN,
            Role::NormalUser => ROLE_NORMAL_USER,
            Role::StoreOwner => ROLE_STORE_OWNER,
        }
    }

    /// Exact-match or set-membership check used by the access guard.
    pub fn is_one_of(&self, allowed: &[Role]) -> bool {
        allowed.contains(self)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_SYSTEM_ADMIN => Ok(Role::SystemAdmin),
            ROLE_NORMAL_USER => Ok(Role::NormalUser),
            ROLE_STORE_OWNER => Ok(Role::StoreOwner),
            _ => Err(DomainError::validation("Invalid user role")),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, hashed input for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Postal address
    pub address: Option<String>,
    /// User role
    pub role: Role,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
