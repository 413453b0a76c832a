//! Navigation guard
//!
//! Rules, evaluated in order for every transition:
//! ```text
//! requires_auth && !authenticated   → login?redirect=<full path>
//! auth page     &&  authenticated   → landing route
//! otherwise                          → allow
//! ```
//! The login route must not require auth and the landing route must not be
//! an auth page, so a redirect can never bounce back into the same rule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use estoque_session::SessionStore;

use crate::location::{ResolvedRoute, RouteLocation};

pub const REDIRECT_QUERY_KEY: &str = "redirect";

/// Source of the current authentication status
pub trait AuthStatus: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

impl AuthStatus for SessionStore {
    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }
}

impl AuthStatus for bool {
    fn is_authenticated(&self) -> bool {
        *self
    }
}

impl AuthStatus for AtomicBool {
    fn is_authenticated(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl<T: AuthStatus + ?Sized> AuthStatus for Arc<T> {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardDecision {
    /// Let the transition through unmodified
    Allow,
    /// Abort the transition and navigate here instead
    Redirect(RouteLocation),
}

#[derive(Debug, Clone)]
pub struct NavigationGuard {
    login_route: String,
    landing_route: String,
    /// Pages only meaningful for anonymous users
    auth_pages: BTreeSet<String>,
}

impl NavigationGuard {
    pub fn new(login_route: impl Into<String>, landing_route: impl Into<String>) -> Self {
        let login_route = login_route.into();
        let mut auth_pages = BTreeSet::new();
        auth_pages.insert(login_route.clone());

        Self {
            login_route,
            landing_route: landing_route.into(),
            auth_pages,
        }
    }

    /// Mark another route as an auth page (register, password recovery, ...)
    pub fn with_auth_page(mut self, name: impl Into<String>) -> Self {
        self.auth_pages.insert(name.into());
        self
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn landing_route(&self) -> &str {
        &self.landing_route
    }

    pub fn is_auth_page(&self, name: &str) -> bool {
        self.auth_pages.contains(name)
    }

    pub fn check(&self, to: &ResolvedRoute, authenticated: bool) -> GuardDecision {
        if to.requires_auth() && !authenticated {
            return GuardDecision::Redirect(
                RouteLocation::named(self.login_route.as_str())
                    .with_query(REDIRECT_QUERY_KEY, to.full_path()),
            );
        }

        if self.is_auth_page(&to.name) && authenticated {
            return GuardDecision::Redirect(RouteLocation::named(self.landing_route.as_str()));
        }

        GuardDecision::Allow
    }
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new("login", "products")
            .with_auth_page("register")
            .with_auth_page("forgot-password")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteMeta;
    use std::collections::BTreeMap;

    fn route(name: &str, path: &str, requires_auth: bool) -> ResolvedRoute {
        ResolvedRoute {
            name: name.to_string(),
            path: path.to_string(),
            params: BTreeMap::new(),
            query: BTreeMap::new(),
            component: String::new(),
            props: false,
            meta: RouteMeta { requires_auth },
        }
    }

    #[test]
    fn test_protected_route_redirects_anonymous_to_login() {
        let guard = NavigationGuard::default();
        let decision = guard.check(&route("alerts", "/alertas", true), false);

        assert_eq!(
            decision,
            GuardDecision::Redirect(RouteLocation::named("login").with_query("redirect", "/alertas"))
        );
    }

    #[test]
    fn test_redirect_keeps_query_of_target() {
        let guard = NavigationGuard::default();
        let mut target = route("sales", "/vendas", true);
        target.query.insert("mes".to_string(), "3".to_string());

        match guard.check(&target, false) {
            GuardDecision::Redirect(location) => {
                assert_eq!(location.query["redirect"], "/vendas?mes=3");
            }
            GuardDecision::Allow => panic!("Expected Redirect"),
        }
    }

    #[test]
    fn test_auth_pages_redirect_authenticated_to_landing() {
        let guard = NavigationGuard::default();

        for (name, path) in [
            ("login", "/login"),
            ("register", "/register"),
            ("forgot-password", "/esqueci-senha"),
        ] {
            assert_eq!(
                guard.check(&route(name, path, false), true),
                GuardDecision::Redirect(RouteLocation::named("products")),
                "{name} should bounce to products"
            );
        }
    }

    #[test]
    fn test_authenticated_protected_route_is_allowed() {
        let guard = NavigationGuard::default();
        assert_eq!(
            guard.check(&route("products", "/produtos", true), true),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_anonymous_public_routes_are_allowed() {
        let guard = NavigationGuard::default();
        assert_eq!(guard.check(&route("login", "/login", false), false), GuardDecision::Allow);
        assert_eq!(
            guard.check(&route("forgot-password", "/esqueci-senha", false), false),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_custom_guard_names() {
        let guard = NavigationGuard::new("entrar", "painel");
        assert!(guard.is_auth_page("entrar"));
        assert!(!guard.is_auth_page("register"));

        assert_eq!(
            guard.check(&route("entrar", "/entrar", false), true),
            GuardDecision::Redirect(RouteLocation::named("painel"))
        );
    }

    #[test]
    fn test_auth_status_impls() {
        let flag = Arc::new(AtomicBool::new(false));
        let status: Arc<dyn AuthStatus> = flag.clone();
        assert!(!status.is_authenticated());

        flag.store(true, Ordering::SeqCst);
        assert!(status.is_authenticated());
        assert!(true.is_authenticated());
    }
}
