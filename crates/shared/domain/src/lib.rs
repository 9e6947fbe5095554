//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! roles, users, stores, ratings, the password policy, field validation and
//! the role-shaped read models.

pub mod constants;
pub mod error;
pub mod password;
pub mod rating;
pub mod store;
pub mod user;
pub mod validation;
pub mod views;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{Password, PasswordPolicy};
pub use rating::{Rating, RatingInsert, Score};
pub use store::{NewStore, Store, StoreResponse};
pub use user::{NewUser, Role, User, UserResponse};
pub use views::{
    average_rating, AdminStoreView, AdminSummary, OwnedStore, OwnerSummary, RaterEntry,
    StoreListing, StoreRatingStats, UserStoreView,
};
