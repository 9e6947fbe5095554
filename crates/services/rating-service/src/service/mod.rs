//! Service layer - credentials, access control and rating aggregation.

mod access_guard;
mod container;
mod credentials;
mod dashboard;
mod ratings;
mod stores;
mod token;

#[cfg(test)]
mod test_support;

pub use access_guard::{require_role, AccessGuard};
pub use container::Services;
pub use credentials::{CredentialManager, LoginResult, PasswordChange, Registration};
pub use dashboard::DashboardAggregator;
pub use ratings::RatingAggregator;
pub use stores::{StoreCreation, StoreManager};
pub use token::{Claims, Identity, TokenService};
