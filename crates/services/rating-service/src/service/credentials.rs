//! Registration, login and password change.
//!
//! Hashing and verification are CPU-bound, so they run on the blocking
//! pool and never stall the async workers.

use std::sync::Arc;

use serde::Serialize;

use common::{AppError, AppResult};
use domain::{
    validation::{validate_address, validate_email, validate_user_name},
    NewUser, Password, PasswordPolicy, Role, User,
};

use super::access_guard::require_role;
use super::token::{Identity, TokenService};
use crate::infra::UnitOfWork;

/// Input shared by self-registration and admin user creation.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
}

/// Successful login: the token plus the caller's public profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub token: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

pub struct CredentialManager {
    uow: Arc<dyn UnitOfWork>,
    tokens: Arc<TokenService>,
}

impl CredentialManager {
    pub fn new(uow: Arc<dyn UnitOfWork>, tokens: Arc<TokenService>) -> Self {
        Self { uow, tokens }
    }

    /// Self-registration; the account is always a NORMAL_USER.
    pub async fn register(&self, registration: Registration) -> AppResult<User> {
        let user = self.insert_user(registration, Role::NormalUser).await?;
        tracing::debug!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Admin variant of [`register`](Self::register) with an explicit role.
    pub async fn create_user(
        &self,
        caller: &Identity,
        registration: Registration,
        role: Role,
    ) -> AppResult<User> {
        require_role(caller, &[Role::SystemAdmin])?;
        validate_registration(&registration)?;

        if self
            .uow
            .users()
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Email"));
        }

        let user = self.insert_user(registration, role).await?;
        tracing::debug!(user_id = %user.id, role = %user.role, created_by = %caller.id, "User created");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let user = self.uow.users().find_by_email(email).await?;

        // Unknown accounts still pay for a full verification
        let stored = user
            .as_ref()
            .map(|u| Password::from_hash(u.password_hash.as_str()))
            .unwrap_or_else(Password::dummy);
        let verified = verify_password(stored, password.to_string()).await?;

        match user {
            Some(user) if verified => {
                let token = self.tokens.issue(&Identity::from(&user))?;
                tracing::debug!(user_id = %user.id, "Login succeeded");
                Ok(LoginResult {
                    token,
                    email: user.email,
                    name: user.name,
                    role: user.role,
                })
            }
            _ => {
                tracing::warn!("Login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Replace the password of the account identified by email, proven by
    /// the old password.
    pub async fn change_password(&self, change: PasswordChange) -> AppResult<()> {
        PasswordPolicy::validate(&change.new_password)?;

        let user = self.uow.users().find_by_email(&change.email).await?;
        let stored = user
            .as_ref()
            .map(|u| Password::from_hash(u.password_hash.as_str()))
            .unwrap_or_else(Password::dummy);
        let verified = verify_password(stored, change.old_password).await?;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::warn!("Password change rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let new_hash = hash_password(change.new_password).await?;
        if !self
            .uow
            .users()
            .update_password(user.id, new_hash.into_string())
            .await?
        {
            return Err(AppError::not_found("User"));
        }

        tracing::debug!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Every user as a public profile, ordered by name.
    pub async fn list_users(&self, caller: &Identity) -> AppResult<Vec<User>> {
        require_role(caller, &[Role::SystemAdmin])?;
        self.uow.users().list().await
    }

    async fn insert_user(&self, registration: Registration, role: Role) -> AppResult<User> {
        validate_registration(&registration)?;

        let password = hash_password(registration.password).await?;
        self.uow
            .users()
            .create(NewUser {
                name: registration.name,
                email: registration.email,
                address: registration.address.filter(|a| !a.trim().is_empty()),
                password_hash: password.into_string(),
                role,
            })
            .await
    }
}

fn validate_registration(registration: &Registration) -> AppResult<()> {
    if registration.name.is_empty() || registration.email.is_empty() || registration.password.is_empty() {
        return Err(AppError::validation("Name, email and password are required"));
    }

    validate_user_name(&registration.name)?;
    validate_email(&registration.email)?;
    if let Some(address) = &registration.address {
        validate_address(address)?;
    }
    PasswordPolicy::validate(&registration.password)?;
    Ok(())
}

async fn hash_password(plain_text: String) -> AppResult<Password> {
    tokio::task::spawn_blocking(move || Password::new(&plain_text))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn verify_password(stored: Password, plain_text: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || stored.verify(&plain_text))
        .await
        .map_err(|e| AppError::internal(format!("Verification task failed: {}", e)))
}
