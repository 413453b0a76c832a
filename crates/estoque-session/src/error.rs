//! Session error types

use thiserror::Error;

pub(crate) const DEFAULT_LOGIN_ERROR: &str = "Falha no login";
pub(crate) const DEFAULT_REGISTRATION_ERROR: &str = "Falha no registro";

#[derive(Error, Debug)]
pub enum SessionError {
    /// Login was rejected or never reached the server.
    #[error("{0}")]
    Authentication(String),

    /// Registration was rejected or never reached the server.
    #[error("{0}")]
    Registration(String),

    #[error("Storage error: {0}")]
    Storage(#[from] estoque_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SessionError {
    /// Human-readable message suitable for showing to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
