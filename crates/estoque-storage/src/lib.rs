//! Estoque Storage Layer
//!
//! SQLite-backed key-value persistence that survives process restarts.
//! Plays the role of the browser's local storage for the client shell.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
