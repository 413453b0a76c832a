//! Estoque Routing
//!
//! Every transition goes through the same pipeline:
//!   1. Static redirects (legacy aliases) rewrite the path, unguarded
//!   2. The path is matched against the route table
//!   3. The navigation guard allows the transition or redirects it
//!
//! A guard redirect re-enters the pipeline for the new target.

mod error;
mod guard;
mod location;
mod route;
mod router;

pub use error::RouterError;
pub use guard::{AuthStatus, GuardDecision, NavigationGuard, REDIRECT_QUERY_KEY};
pub use location::{Query, ResolvedRoute, RouteLocation, RouteTarget};
pub use route::{PathPattern, Route, RouteMeta, RouteRedirect, RouteTable, RouteTableBuilder};
pub use router::{NavigationOutcome, Router};

pub type Result<T> = std::result::Result<T, RouterError>;
