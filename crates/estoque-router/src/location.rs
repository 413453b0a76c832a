//! Navigation targets and resolved routes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::form_urlencoded;

use crate::route::RouteMeta;

pub type Query = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteTarget {
    /// Concrete path, e.g. `/editar-produto/42`
    Path(String),
    /// Route name from the table, e.g. `edit-product`
    Name(String),
}

/// Where a transition should go: a path or a named route, plus params and query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLocation {
    pub target: RouteTarget,
    /// Path params, only used by named targets
    pub params: BTreeMap<String, String>,
    pub query: Query,
}

impl RouteLocation {
    /// Target a path. A query string in `path` is split off into `query`.
    pub fn path(path: impl AsRef<str>) -> Self {
        let (path, query) = split_query(path.as_ref());

        Self {
            target: RouteTarget::Path(path),
            params: BTreeMap::new(),
            query,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            target: RouteTarget::Name(name.into()),
            params: BTreeMap::new(),
            query: Query::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Human-readable form for logs and errors
    pub fn describe(&self) -> String {
        match &self.target {
            RouteTarget::Path(path) => full_path(path, &self.query),
            RouteTarget::Name(name) => format!("{{name: {}}}", name),
        }
    }
}

impl From<&str> for RouteLocation {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<String> for RouteLocation {
    fn from(path: String) -> Self {
        Self::path(path)
    }
}

/// A location matched against the route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    pub name: String,
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub query: Query,
    pub component: String,
    /// Whether the view receives path params as props
    pub props: bool,
    pub meta: RouteMeta,
}

impl ResolvedRoute {
    /// Path plus encoded query string, e.g. `/login?redirect=%2Falertas`
    pub fn full_path(&self) -> String {
        full_path(&self.path, &self.query)
    }

    pub fn requires_auth(&self) -> bool {
        self.meta.requires_auth
    }
}

pub(crate) fn full_path(path: &str, query: &Query) -> String {
    if query.is_empty() {
        return path.to_string();
    }

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter())
        .finish();
    format!("{}?{}", path, encoded)
}

fn split_query(raw: &str) -> (String, Query) {
    let raw = raw.split('#').next().unwrap_or(raw);
    match raw.split_once('?') {
        Some((path, query)) => (
            path.to_string(),
            form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        ),
        None => (raw.to_string(), Query::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_splits_query() {
        let location = RouteLocation::path("/login?redirect=%2Falertas&x=1");
        assert_eq!(location.target, RouteTarget::Path("/login".to_string()));
        assert_eq!(location.query.get("redirect").map(String::as_str), Some("/alertas"));
        assert_eq!(location.query.get("x").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_fragment_is_ignored() {
        let location = RouteLocation::path("/vendas#top");
        assert_eq!(location.target, RouteTarget::Path("/vendas".to_string()));
        assert!(location.query.is_empty());
    }

    #[test]
    fn test_full_path_round_trips_through_path() {
        let query: Query = [("redirect".to_string(), "/editar-produto/3?tab=2".to_string())]
            .into_iter()
            .collect();
        let full = full_path("/login", &query);

        let parsed = RouteLocation::path(&full);
        assert_eq!(parsed.query, query);
    }

    #[test]
    fn test_named_builder() {
        let location = RouteLocation::named("edit-product")
            .with_param("id", "9")
            .with_query("from", "alerts");

        assert_eq!(location.target, RouteTarget::Name("edit-product".to_string()));
        assert_eq!(location.params["id"], "9");
        assert_eq!(location.query["from"], "alerts");
    }
}
