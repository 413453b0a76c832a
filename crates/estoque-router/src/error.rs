//! Router error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("No route matches path: {0}")]
    NotFound(String),

    #[error("Unknown route name: {0}")]
    UnknownRoute(String),

    #[error("Missing param '{param}' for route '{route}'")]
    MissingParam { route: String, param: String },

    #[error("Duplicate route name: {0}")]
    DuplicateName(String),

    #[error("Invalid path pattern: {0}")]
    InvalidPattern(String),

    #[error("Too many redirects while navigating to {0}")]
    RedirectLoop(String),
}
