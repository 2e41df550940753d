//! Route parameter extraction and query string handling.
//!
//! This module provides the two string maps carried by every
//! [`RouteInfo`](crate::RouteInfo):
//!
//! - [`RouteParams`]: path parameters bound from dynamic segments (e.g.
//!   `:orderId` in `/orders/:orderId`). Values are plain strings; use
//!   [`get_as`](RouteParams::get_as) for typed access.
//! - [`QueryParams`]: the `?key=value&...` part of a URL. Keeps insertion
//!   order so the URL handed to the host is deterministic, and keeps repeated
//!   keys (`?tag=a&tag=b`).
//!
//! It also owns URL splitting and building ([`split_url`], [`build_url`]).
//!
//! # Example
//!
//! ```
//! use polyshell::{QueryParams, RouteParams};
//!
//! let mut params = RouteParams::new();
//! params.insert("orderId", "42");
//! assert_eq!(params.get_as::<u32>("orderId"), Some(42));
//!
//! let query = QueryParams::from_query_string("ref=push&page=1");
//! assert_eq!(query.get("ref"), Some("push"));
//! assert_eq!(query.to_query_string(), "ref=push&page=1");
//! ```

use std::borrow::Cow;
use std::collections::HashMap;

/// Route parameters extracted from path segments.
///
/// # Example
///
/// ```
/// use polyshell::RouteParams;
///
/// // Pattern /users/:id matched against /users/123
/// let mut params = RouteParams::new();
/// params.insert("id", "123");
///
/// assert_eq!(params.get("id"), Some("123"));
/// assert_eq!(params.get_as::<i32>("id"), Some(123));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing `HashMap`.
    pub fn from_map(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a parameter and parse it as a specific type.
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Get a reference to the underlying parameter map.
    pub fn all(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters parsed from a URL query string.
///
/// Pairs are kept in insertion order. A key may appear more than once;
/// [`get`](Self::get) returns the **last** value (later assignment wins) and
/// [`get_all`](Self::get_all) returns every value.
///
/// # Example
///
/// ```
/// use polyshell::QueryParams;
///
/// let query = QueryParams::from_query_string("tag=rust&tag=wasm&flag");
///
/// assert_eq!(query.get("tag"), Some("wasm"));
/// assert_eq!(query.get_all("tag"), vec!["rust", "wasm"]);
/// assert_eq!(query.get("flag"), Some(""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create empty query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string (without the leading `?`).
    ///
    /// Pairs are split on `&`, then on the first `=`. Keys and values are
    /// percent-decoded; a key without `=` gets an empty value; empty pairs
    /// are skipped.
    pub fn from_query_string(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (decode_component(key), decode_component(value)),
                None => (decode_component(pair), String::new()),
            })
            .collect();

        Self { pairs }
    }

    /// Get the last value assigned to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get every value assigned to `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Get the last value for a key, parsed as type `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Append a value for the given key.
    ///
    /// If the key already exists the new value is added, not replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Append every pair of `other`, in order.
    pub fn extend(&mut self, other: &QueryParams) {
        self.pairs.extend(other.pairs.iter().cloned());
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Iterate over all `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Collapse into a plain map, last value winning.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.pairs.iter().cloned().collect()
    }

    /// Serialize back into a percent-encoded query string.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Return the number of pairs (repeated keys count once per value).
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// URL helpers
// ============================================================================

/// Split a URL into its path and (possibly empty) query string on the first `?`.
///
/// ```
/// use polyshell::params::split_url;
///
/// assert_eq!(split_url("/orders/42?ref=push"), ("/orders/42", "ref=push"));
/// assert_eq!(split_url("/orders"), ("/orders", ""));
/// ```
pub fn split_url(url: &str) -> (&str, &str) {
    url.split_once('?').unwrap_or((url, ""))
}

/// Join a path and query parameters into the URL passed to host adapters.
pub fn build_url(path: &str, query: &QueryParams) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.to_query_string())
    }
}

/// Percent-decode a URL component, keeping the raw text if it is not valid UTF-8.
pub fn decode_component(s: &str) -> String {
    urlencoding::decode(s).map_or_else(|_| s.to_string(), Cow::into_owned)
}

// ============================================================================
// Tests
// ============================================================================
