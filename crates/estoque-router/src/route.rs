//! Route definitions and the route table

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::RouterError;
use crate::Result;

/// Static attributes attached to a route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    pub requires_auth: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Path pattern with literal and `:param` segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self> {
        if !raw.starts_with('/') {
            return Err(RouterError::InvalidPattern(raw.to_string()));
        }

        let mut seen = HashSet::new();
        let mut segments = Vec::new();
        for part in split_segments(raw) {
            let segment = match part.strip_prefix(':') {
                Some(name) => {
                    if name.is_empty() || !seen.insert(name.to_string()) {
                        return Err(RouterError::InvalidPattern(raw.to_string()));
                    }
                    Segment::Param(name.to_string())
                }
                None => Segment::Literal(part.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a concrete path, returning the captured params
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }

        Some(params)
    }

    /// Build a concrete path from params
    pub fn build(&self, route: &str, params: &BTreeMap<String, String>) -> Result<String> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| RouterError::MissingParam {
                            route: route.to_string(),
                            param: name.clone(),
                        })?;
                    path.push_str(value);
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strip a trailing slash (except for the root) so `/vendas/` and `/vendas`
/// are the same path.
pub(crate) fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    pub path: PathPattern,
    pub name: String,
    /// View rendered for this route
    pub component: String,
    /// Pass path params to the view as props
    pub props: bool,
    pub meta: RouteMeta,
}

/// Unguarded path rewrite, e.g. a legacy English path to its localized one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRedirect {
    pub from: String,
    pub to: String,
}

struct RouteSpec {
    path: String,
    name: String,
    component: String,
    props: bool,
    meta: RouteMeta,
}

#[derive(Default)]
pub struct RouteTableBuilder {
    routes: Vec<RouteSpec>,
    redirects: Vec<RouteRedirect>,
}

impl RouteTableBuilder {
    /// Route that anyone may visit
    pub fn public(self, path: &str, name: &str, component: &str) -> Self {
        self.route(path, name, component, RouteMeta { requires_auth: false }, false)
    }

    /// Route that needs an authenticated session
    pub fn protected(self, path: &str, name: &str, component: &str) -> Self {
        self.route(path, name, component, RouteMeta { requires_auth: true }, false)
    }

    /// Protected route whose path params are handed to the view as props
    pub fn protected_with_props(self, path: &str, name: &str, component: &str) -> Self {
        self.route(path, name, component, RouteMeta { requires_auth: true }, true)
    }

    pub fn route(
        mut self,
        path: &str,
        name: &str,
        component: &str,
        meta: RouteMeta,
        props: bool,
    ) -> Self {
        self.routes.push(RouteSpec {
            path: path.to_string(),
            name: name.to_string(),
            component: component.to_string(),
            props,
            meta,
        });
        self
    }

    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.push(RouteRedirect {
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    pub fn build(self) -> Result<RouteTable> {
        let mut names = HashSet::new();
        let mut routes = Vec::with_capacity(self.routes.len());

        for spec in self.routes {
            if !names.insert(spec.name.clone()) {
                return Err(RouterError::DuplicateName(spec.name));
            }
            routes.push(Route {
                path: PathPattern::parse(&spec.path)?,
                name: spec.name,
                component: spec.component,
                props: spec.props,
                meta: spec.meta,
            });
        }

        let mut redirects = Vec::with_capacity(self.redirects.len());
        for redirect in self.redirects {
            if !redirect.from.starts_with('/') {
                return Err(RouterError::InvalidPattern(redirect.from));
            }
            if !redirect.to.starts_with('/') {
                return Err(RouterError::InvalidPattern(redirect.to));
            }
            redirects.push(RouteRedirect {
                from: normalize_path(&redirect.from),
                to: redirect.to,
            });
        }

        Ok(RouteTable { routes, redirects })
    }
}

/// Ordered route definitions plus static redirects. Immutable once built.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    redirects: Vec<RouteRedirect>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn redirects(&self) -> &[RouteRedirect] {
        &self.redirects
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// First route, in declaration order, whose pattern matches `path`
    pub fn match_path(&self, path: &str) -> Option<(&Route, BTreeMap<String, String>)> {
        self.routes
            .iter()
            .find_map(|route| route.path.matches(path).map(|params| (route, params)))
    }

    /// Static redirect target for `path`, if one is declared
    pub fn redirect_for(&self, path: &str) -> Option<&str> {
        let path = normalize_path(path);
        self.redirects
            .iter()
            .find(|r| r.from == path)
            .map(|r| r.to.as_str())
    }
}
