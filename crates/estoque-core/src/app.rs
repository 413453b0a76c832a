//! Application context
//!
//! Built once at start-up. The session store lives here and the router gets
//! a clone of it, so both read the same session.

use std::sync::Arc;

use estoque_router::{NavigationOutcome, RouteLocation, Router, REDIRECT_QUERY_KEY};
use estoque_session::{AuthApi, Credentials, HttpAuthApi, RegistrationData, SessionStore};
use estoque_storage::Database;

use crate::config::Config;
use crate::routes::{navigation_guard, route_table};
use crate::Result;

pub struct App {
    config: Config,
    db: Database,
    session: SessionStore,
    router: Router,
}

impl App {
    /// Open local storage and talk to the configured backend over HTTP
    pub fn new(config: Config) -> Result<Self> {
        let api = HttpAuthApi::new(&config.api_base_url, config.request_timeout())?;
        Self::with_auth_api(config, Arc::new(api))
    }

    /// Same as [`App::new`] with a caller-supplied auth backend
    pub fn with_auth_api(config: Config, api: Arc<dyn AuthApi>) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let session = SessionStore::new(db.clone(), api);
        let router = Router::new(route_table()?, navigation_guard(), session.clone());

        Ok(Self {
            config,
            db,
            session,
            router,
        })
    }

    /// Restore the persisted session
    pub fn initialize(&self) -> Result<()> {
        self.session.initialize()?;

        tracing::info!(
            authenticated = self.session.is_authenticated(),
            api = %self.config.api_base_url,
            "Client initialized"
        );

        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn navigate(&self, location: impl Into<RouteLocation>) -> Result<NavigationOutcome> {
        Ok(self.router.push(location)?)
    }

    /// Sign in, then continue to the page that sent the user to login
    pub async fn login(&self, credentials: &Credentials) -> Result<NavigationOutcome> {
        self.session.login(credentials).await?;
        self.navigate(self.post_login_target())
    }

    /// Create an account, then go to the start page
    pub async fn register(&self, data: &RegistrationData) -> Result<NavigationOutcome> {
        self.session.register(data).await?;
        self.navigate("/")
    }

    pub fn logout(&self) -> Result<NavigationOutcome> {
        self.session.logout();
        self.navigate(RouteLocation::named(self.router.guard().login_route()))
    }

    /// `redirect` query of the current route when it is an in-app path that
    /// still resolves, otherwise the landing route.
    fn post_login_target(&self) -> RouteLocation {
        self.router
            .current()
            .and_then(|route| route.query.get(REDIRECT_QUERY_KEY).cloned())
            .filter(|path| path.starts_with('/') && !path.starts_with("//"))
            .map(RouteLocation::path)
            .filter(|location| match self.router.resolve(location.clone()) {
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring unresolvable login redirect");
                    false
                }
            })
            .unwrap_or_else(|| RouteLocation::named(self.router.guard().landing_route()))
    }
}
