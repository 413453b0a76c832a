//! Estoque Session Management
//!
//! - A session is a token plus the identity record the backend returned
//! - Token and identity are always set and cleared together
//! - The session is persisted to local storage and restored on start
//! - The store never navigates; callers decide where to go next

pub mod api;
mod error;
mod session;
mod store;

pub use api::{ApiError, AuthApi, AuthResponse, Credentials, HttpAuthApi, RegistrationData};
pub use error::SessionError;
pub use session::{Session, UserRecord};
pub use store::SessionStore;

pub type Result<T> = std::result::Result<T, SessionError>;
