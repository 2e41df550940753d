//! Segment-based path matching.
//!
//! Resolves a request path against a [`RouteTable`].
//!
//! # Design
//!
//! - Normalize the input: collapse repeated `/`, force a leading `/`, drop a
//!   trailing `/` (except for the root).
//! - Exact lookup on the normalized path first (see [`MatchStrategy`]).
//! - Otherwise scan routes in registration order; the first pattern with the
//!   same number of segments whose segments all match wins.
//!   - `:name` matches any non-empty segment and binds it, percent-decoded.
//!   - `*` matches any single segment.
//!   - Anything else must be equal.
//! - No trie and no specificity ranking: registration order is the only
//!   tie-break.

use crate::params::{decode_component, RouteParams};
use crate::route::{RouteConfig, RouteTable};
use crate::{debug_log, trace_log};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

/// How [`match_route`] picks between an exact and a pattern match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Look the normalized path up by exact key first, then scan patterns.
    #[default]
    ExactFirst,
    /// Skip the exact lookup; a pure scan in registration order. An earlier
    /// `/user/:id` then shadows a later `/user/profile`.
    RegistrationOrder,
}

/// Result of matching a path against the route table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route.
    pub route: Arc<RouteConfig>,
    /// Parameters bound from `:name` segments.
    pub params: RouteParams,
}

/// Normalize a path for lookup and registration.
///
/// # Examples
///
/// ```
/// use polyshell::matching::normalize_path;
///
/// assert_eq!(normalize_path(""), "/");
/// assert_eq!(normalize_path("users//42/"), "/users/42");
/// assert_eq!(normalize_path("/users"), "/users");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let already_normal = path.starts_with('/')
        && (path == "/" || !path.ends_with('/'))
        && !path.contains("//");
    if already_normal {
        return Cow::Borrowed(path);
    }

    let segments = split_path(path);
    if segments.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", segments.join("/")))
    }
}

/// Split a path into segments, filtering empty segments.
///
/// # Examples
///
/// ```
/// use polyshell::matching::split_path;
///
/// assert_eq!(split_path("/users/123"), vec!["users", "123"]);
/// assert!(split_path("/").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Extract the parameter name from a `:name` segment.
pub fn extract_param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(':').filter(|name| !name.is_empty())
}

/// Check if a pattern segment is a parameter.
pub fn is_param_segment(segment: &str) -> bool {
    extract_param_name(segment).is_some()
}

/// Check if a pattern segment is the single-segment wildcard.
pub fn is_wildcard_segment(segment: &str) -> bool {
    segment == "*"
}

/// Test one normalized path against one pattern.
///
/// Segment counts must be equal; see the module docs for segment rules.
pub fn pattern_matches(pattern: &str, path: &str) -> bool {
    let pattern_segments = split_path(pattern);
    let path_segments = split_path(path);

    pattern_segments.len() == path_segments.len()
        && pattern_segments
            .iter()
            .zip(&path_segments)
            .all(|(pattern_seg, path_seg)| segment_matches(pattern_seg, path_seg))
}

fn segment_matches(pattern_seg: &str, path_seg: &str) -> bool {
    if is_param_segment(pattern_seg) {
        !path_seg.is_empty()
    } else {
        is_wildcard_segment(pattern_seg) || pattern_seg == path_seg
    }
}

/// Bind each `:name` segment of `pattern` to the matching segment of `path`.
///
/// Call only after [`pattern_matches`] returned `true`.
pub fn extract_params(pattern: &str, path: &str) -> RouteParams {
    split_path(pattern)
        .into_iter()
        .zip(split_path(path))
        .filter_map(|(pattern_seg, path_seg)| {
            extract_param_name(pattern_seg).map(|name| (name, decode_component(path_seg)))
        })
        .collect()
}

/// Resolve `path` against `table`.
///
/// Returns `None` if no route matches.
pub fn match_route(table: &RouteTable, path: &str, strategy: MatchStrategy) -> Option<RouteMatch> {
    let path = normalize_path(path);

    if strategy == MatchStrategy::ExactFirst {
        if let Some(route) = table.get(&path) {
            debug_log!("Exact match for '{}'", path);
            return Some(RouteMatch {
                params: extract_params(&route.path, &path),
                route: Arc::clone(route),
            });
        }
    }

    trace_log!("Scanning {} routes for '{}'", table.len(), path);
    let route = table
        .routes()
        .iter()
        .find(|route| pattern_matches(&route.path, &path))?;

    debug_log!("Pattern '{}' matched '{}'", route.path, path);
    Some(RouteMatch {
        params: extract_params(&route.path, &path),
        route: Arc::clone(route),
    })
}
