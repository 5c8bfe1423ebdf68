//! Database module
//!
//! SQLite pool and schema migrations for the recipe store.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
