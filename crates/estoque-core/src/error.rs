//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] estoque_storage::StorageError),

    #[error(transparent)]
    Session(#[from] estoque_session::SessionError),

    #[error("Auth API error: {0}")]
    Api(#[from] estoque_session::ApiError),

    #[error("Navigation error: {0}")]
    Router(#[from] estoque_router::RouterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
