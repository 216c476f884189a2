//! Persistence bootstrap shared by the services.
//!
//! Owns the connection wrapper and the schema migrations for every core
//! table. Services receive a `DatabaseConnection` and never open their own.

mod db;
pub mod migrations;

pub use db::{inserted, Database};
pub use migrations::Migrator;
