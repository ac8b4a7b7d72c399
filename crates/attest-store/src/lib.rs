//! Persistence layer for attest
//!
//! Durable single-user state, standing in for the original's local
//! storage:
//! - The settings record (saved wholesale, loaded wholesale)
//! - Credential records for the simulated sign-in (stored in plaintext)
//! - The current session (signed-in user id, or absent)
//!
//! Test entries are deliberately NOT persisted; they live in memory for
//! the lifetime of one run.

mod sqlite;
mod traits;

pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<attest_config::SettingsError> for StoreError {
    fn from(e: attest_config::SettingsError) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
