//! SeaORM entities for the three tables.

pub mod rating;
pub mod store;
pub mod user;
