//! Estoque Core
//!
//! Client shell of the inventory app: builds the session store once and
//! injects it into the router, and owns the post-login/logout navigation.

mod app;
mod config;
mod error;
mod routes;

pub use app::App;
pub use config::Config;
pub use error::CoreError;
pub use routes::{navigation_guard, route_table};

// Re-export core components
pub use estoque_router::{
    AuthStatus, GuardDecision, NavigationGuard, NavigationOutcome, ResolvedRoute, RouteLocation,
    RouteTable, Router, RouterError,
};
pub use estoque_session::{
    ApiError, AuthApi, Credentials, HttpAuthApi, RegistrationData, Session, SessionError,
    SessionStore, UserRecord,
};
pub use estoque_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// ```no_run
/// estoque_core::init_logging();
/// let app = estoque_core::App::new(estoque_core::Config::from_env()?)?;
/// app.initialize()?;
/// app.navigate("/")?;
/// # Ok::<(), estoque_core::CoreError>(())
/// ```
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
