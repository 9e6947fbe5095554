//! Repository layer for data access.

pub mod entities;
mod rating_repository;
mod store_repository;
mod user_repository;

use sea_orm::{DbErr, SqlErr};

use common::AppError;

pub use rating_repository::{RatingRepository, RatingStore};
pub use store_repository::{StoreRepository, StoreStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use rating_repository::MockRatingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use store_repository::MockStoreRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Unique-constraint violations become `Conflict(entity)`; every other
/// storage fault stays a database error.
pub(crate) fn map_write_err(err: DbErr, entity: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(entity, %detail, "Unique constraint violated");
            AppError::conflict(entity)
        }
        _ => AppError::Database(err),
    }
}
