//! Infrastructure layer - database connection, migrations and the
//! repository hub.

mod db;
pub mod migrations;
mod unit_of_work;

pub use db::Database;
pub use migrations::Migrator;
pub use unit_of_work::{Persistence, UnitOfWork};
