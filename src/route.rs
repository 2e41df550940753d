//! Route definitions and the route table.
//!
//! - [`RouteConfig`] is what applications register: a path pattern, an opaque
//!   [`ViewId`] naming the page to show, free-form metadata, and optional
//!   children.
//! - [`RouteTable`] stores the flattened configs in registration order, with an
//!   index on normalized path for the exact-match fast path.
//! - [`RouteInfo`] is the per-navigation snapshot the router commits as the
//!   current route.
//!
//! # Example
//!
//! ```
//! use polyshell::{RouteConfig, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table.register(
//!     RouteConfig::new("/orders", "pages/orders/index")
//!         .child(RouteConfig::new(":orderId", "pages/orders/detail")),
//! );
//!
//! let paths: Vec<_> = table.routes().iter().map(|r| r.path.as_str()).collect();
//! assert_eq!(paths, ["/orders", "/orders/:orderId"]);
//! ```

use crate::matching::normalize_path;
use crate::params::{QueryParams, RouteParams};
use crate::{info_log, trace_log};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Free-form route metadata (`{"requiresAuth": true, "title": "Orders"}`).
pub type RouteMeta = serde_json::Map<String, serde_json::Value>;

/// Opaque handle naming the view a route shows.
///
/// The engine never interprets it; on mini-program hosts it is typically the
/// page module path (`pages/orders/detail`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
    /// Create a view id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ViewId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// RouteConfig
// ============================================================================

/// A registered association between a path pattern and a view.
///
/// Pattern segments may be literals, `:name` parameters or a literal `*`
/// (any single segment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    /// Path pattern, e.g. `/orders/:orderId`.
    pub path: String,
    /// View shown for this route.
    pub view_id: ViewId,
    /// Arbitrary metadata, copied into every [`RouteInfo`] for this route.
    #[serde(default)]
    pub meta: RouteMeta,
    /// Nested routes. Relative child paths are joined onto this path.
    #[serde(default)]
    pub children: Vec<RouteConfig>,
}

impl RouteConfig {
    /// Create a route with no metadata and no children.
    pub fn new(path: impl Into<String>, view_id: impl Into<ViewId>) -> Self {
        Self {
            path: path.into(),
            view_id: view_id.into(),
            meta: RouteMeta::new(),
            children: Vec::new(),
        }
    }

    /// Set a metadata entry.
    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Add a child route.
    #[must_use]
    pub fn child(mut self, child: RouteConfig) -> Self {
        self.children.push(child);
        self
    }

    /// Add several child routes.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = RouteConfig>) -> Self {
        self.children.extend(children);
        self
    }

    /// Return `true` if the pattern has no `:param` or `*` segments.
    pub fn is_static(&self) -> bool {
        self.path
            .split('/')
            .all(|seg| !seg.starts_with(':') && seg != "*")
    }
}

// ============================================================================
// RouteInfo
// ============================================================================

/// Snapshot of a resolved navigation target.
///
/// Built for every navigation attempt; the router keeps the last committed
/// one as the current route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    /// Normalized path without the query string (`/orders/42`).
    pub path: String,
    /// Parameters bound from dynamic segments.
    pub params: RouteParams,
    /// Parsed query string plus any extra navigation params.
    pub query: QueryParams,
    /// View of the matched route.
    pub view_id: ViewId,
    /// Metadata of the matched route.
    pub meta: RouteMeta,
}

impl RouteInfo {
    /// Build the URL handed to host adapters (`/orders/42?ref=push`).
    pub fn url(&self) -> String {
        crate::params::build_url(&self.path, &self.query)
    }
}

// ============================================================================
// RouteTable
// ============================================================================

/// Registered routes, in registration order.
///
/// Registering a path that normalizes to an already registered one replaces
/// that entry in place, so the original registration order is preserved.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<RouteConfig>>,
    by_path: HashMap<String, usize>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route and, depth-first, its children.
    pub fn register(&mut self, route: RouteConfig) {
        self.register_under("", route);
    }

    /// Register several routes in order.
    pub fn register_all(&mut self, routes: impl IntoIterator<Item = RouteConfig>) {
        for route in routes {
            self.register(route);
        }
    }

    fn register_under(&mut self, parent: &str, mut route: RouteConfig) {
        let full = if route.path.starts_with('/') || parent.is_empty() {
            normalize_path(&route.path).into_owned()
        } else {
            normalize_path(&format!("{}/{}", parent, route.path)).into_owned()
        };
        let children = std::mem::take(&mut route.children);
        route.path.clone_from(&full);

        if let Some(&index) = self.by_path.get(&full) {
            info_log!("Re-registered route '{}' (view: {})", full, route.view_id);
            self.routes[index] = Arc::new(route);
        } else {
            info_log!("Registered route '{}' (view: {})", full, route.view_id);
            self.by_path.insert(full.clone(), self.routes.len());
            self.routes.push(Arc::new(route));
        }

        trace_log!("Route '{}' has {} children", full, children.len());
        for child in children {
            self.register_under(&full, child);
        }
    }

    /// Look up a route by its normalized path (no pattern matching).
    pub fn get(&self, normalized_path: &str) -> Option<&Arc<RouteConfig>> {
        self.by_path
            .get(normalized_path)
            .map(|&index| &self.routes[index])
    }

    /// All routes in registration order.
    pub fn routes(&self) -> &[Arc<RouteConfig>] {
        &self.routes
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Return `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
