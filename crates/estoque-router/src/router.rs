//! Router
//!
//! Owns the route table, the guard and the current route. Transitions are
//! serialised: `push` holds the current-route lock for the whole transition.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::RouterError;
use crate::guard::{AuthStatus, GuardDecision, NavigationGuard};
use crate::location::{full_path, Query, ResolvedRoute, RouteLocation, RouteTarget};
use crate::route::{normalize_path, RouteTable};
use crate::Result;

/// Upper bound on redirect hops per transition
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The requested route was entered as-is
    Allowed(ResolvedRoute),
    /// A static redirect or the guard sent the transition elsewhere
    Redirected { from: String, to: ResolvedRoute },
}

impl NavigationOutcome {
    /// The route that was finally entered
    pub fn route(&self) -> &ResolvedRoute {
        match self {
            NavigationOutcome::Allowed(route) => route,
            NavigationOutcome::Redirected { to, .. } => to,
        }
    }

    pub fn is_redirected(&self) -> bool {
        matches!(self, NavigationOutcome::Redirected { .. })
    }
}

pub struct Router {
    table: Arc<RouteTable>,
    guard: Arc<NavigationGuard>,
    /// Session status consulted on every transition
    auth: Arc<dyn AuthStatus>,
    current: Arc<RwLock<Option<ResolvedRoute>>>,
}

impl Router {
    pub fn new(table: RouteTable, guard: NavigationGuard, auth: impl AuthStatus + 'static) -> Self {
        Self {
            table: Arc::new(table),
            guard: Arc::new(guard),
            auth: Arc::new(auth),
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    /// Last route a transition committed to
    pub fn current(&self) -> Option<ResolvedRoute> {
        self.current.read().clone()
    }

    /// Navigate to `location`, running static redirects and the guard.
    pub fn push(&self, location: impl Into<RouteLocation>) -> Result<NavigationOutcome> {
        let location = location.into();
        let mut current = self.current.write();

        let requested = location.describe();
        let mut next = location;
        let mut redirected = false;

        for _ in 0..MAX_REDIRECTS {
            let (route, aliased) = self.resolve_location(&next)?;
            redirected |= aliased;

            match self.guard.check(&route, self.auth.is_authenticated()) {
                GuardDecision::Allow => {
                    tracing::info!(
                        route = %route.name,
                        path = %route.full_path(),
                        "Navigation allowed"
                    );
                    *current = Some(route.clone());

                    return Ok(if redirected {
                        NavigationOutcome::Redirected {
                            from: requested,
                            to: route,
                        }
                    } else {
                        NavigationOutcome::Allowed(route)
                    });
                }
                GuardDecision::Redirect(target) => {
                    tracing::debug!(
                        from = %route.full_path(),
                        to = %target.describe(),
                        "Guard redirected navigation"
                    );
                    redirected = true;
                    next = target;
                }
            }
        }

        tracing::warn!(requested = %requested, "Redirect limit reached");
        Err(RouterError::RedirectLoop(requested))
    }

    /// Match `location` against the table, applying static redirects but not
    /// the guard. Nothing is committed.
    pub fn resolve(&self, location: impl Into<RouteLocation>) -> Result<ResolvedRoute> {
        self.resolve_location(&location.into()).map(|(route, _)| route)
    }

    /// Returns the matched route and whether a static redirect was applied
    fn resolve_location(&self, location: &RouteLocation) -> Result<(ResolvedRoute, bool)> {
        let mut path = match &location.target {
            RouteTarget::Path(path) => normalize_path(path),
            RouteTarget::Name(name) => {
                let route = self
                    .table
                    .find_by_name(name)
                    .ok_or_else(|| RouterError::UnknownRoute(name.clone()))?;
                route.path.build(&route.name, &location.params)?
            }
        };
        let mut query = location.query.clone();

        let mut aliased = false;
        let mut hops = 0;
        while let Some(to) = self.table.redirect_for(&path) {
            hops += 1;
            if hops > MAX_REDIRECTS {
                return Err(RouterError::RedirectLoop(full_path(&path, &query)));
            }

            let target = RouteLocation::path(to);
            tracing::debug!(from = %path, to = %to, "Static redirect");
            if let RouteTarget::Path(to_path) = target.target {
                path = normalize_path(&to_path);
            }
            merge_query(&mut query, target.query);
            aliased = true;
        }

        let (route, params) = self
            .table
            .match_path(&path)
            .ok_or_else(|| RouterError::NotFound(full_path(&path, &query)))?;

        Ok((
            ResolvedRoute {
                name: route.name.clone(),
                path,
                params,
                query,
                component: route.component.clone(),
                props: route.props,
                meta: route.meta,
            },
            aliased,
        ))
    }
}

/// Query declared on a redirect target overrides the incoming one
fn merge_query(query: &mut Query, overrides: Query) {
    query.extend(overrides);
}

impl Clone for Router {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            guard: Arc::clone(&self.guard),
            auth: Arc::clone(&self.auth),
            current: Arc::clone(&self.current),
        }
    }
}
