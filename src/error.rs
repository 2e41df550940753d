//! Error and outcome types.
//!
//! This module defines what the engine hands back when something does not go
//! as planned:
//!
//! - [`NavigationResult`]: the non-error outcome of a navigation (`Success`,
//!   `Blocked` by a guard, `Superseded` by a newer navigation, or `WentBack`).
//! - [`NavigationError`]: the failures a caller must handle (unknown route,
//!   host adapter failure).
//! - [`GuardError`], [`HostError`], [`ThemeError`], [`StyleError`] and
//!   [`ConfigError`] for the individual collaborators.
//!
//! A guard veto is **not** an error: the router reports it as
//! [`NavigationResult::Blocked`] so callers can tell it apart from
//! [`NavigationError::RouteNotFound`] without matching on error strings.
//!
//! # Examples
//!
//! ```
//! use polyshell::error::{NavigationError, NavigationResult};
//!
//! let blocked = NavigationResult::Blocked {
//!     guard: "AuthGuard".into(),
//!     reason: Some("login required".into()),
//! };
//! assert!(blocked.is_blocked());
//! assert!(blocked.route().is_none());
//!
//! let err = NavigationError::RouteNotFound { path: "/nope".into() };
//! assert_eq!(err.to_string(), "Route not found: /nope");
//! ```

use crate::route::RouteInfo;
use thiserror::Error;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation attempt that did not fail.
///
/// Every path-based call on [`Router`](crate::Router) returns
/// `Result<NavigationResult, NavigationError>`.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// The host performed the transition and the route is now current.
    Success {
        /// The committed route.
        route: RouteInfo,
    },
    /// A guard vetoed the navigation. Nothing changed.
    Blocked {
        /// Name of the vetoing guard.
        guard: String,
        /// Why, if the guard failed rather than answering `false`.
        reason: Option<String>,
    },
    /// The host performed the transition, but a newer navigation was issued
    /// while it was in flight, so this result was not committed.
    Superseded {
        /// The route that was not committed.
        route: RouteInfo,
    },
    /// The host popped `delta` pages. The current route is unchanged.
    WentBack {
        /// Pages popped, after raising 0 to 1.
        delta: u32,
    },
}

impl NavigationResult {
    /// Check if the route was committed.
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if a guard vetoed the navigation.
    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationResult::Blocked { .. })
    }

    /// Check if a newer navigation won the race.
    pub fn is_superseded(&self) -> bool {
        matches!(self, NavigationResult::Superseded { .. })
    }

    /// The route the navigation targeted, unless it was blocked before one
    /// was handed to the host.
    pub fn route(&self) -> Option<&RouteInfo> {
        match self {
            NavigationResult::Success { route } | NavigationResult::Superseded { route } => {
                Some(route)
            }
            NavigationResult::Blocked { .. } | NavigationResult::WentBack { .. } => None,
        }
    }
}

/// Failures surfaced to the caller of a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// No registered route matches the target path.
    #[error("Route not found: {path}")]
    RouteNotFound {
        /// The normalized path that failed to match.
        path: String,
    },

    /// The host adapter invoked `fail`, or dropped its callbacks.
    #[error("Navigation failed: {message}")]
    AdapterFailure {
        /// Message reported by the host.
        message: String,
    },
}

impl From<HostError> for NavigationError {
    fn from(err: HostError) -> Self {
        NavigationError::AdapterFailure {
            message: err.message,
        }
    }
}

// ============================================================================
// Collaborator errors
// ============================================================================

/// Error raised by a guard. The router treats it as a veto.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GuardError {
    /// Human-readable description.
    pub message: String,
}

impl GuardError {
    /// Create a guard error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by a host navigation adapter through its `fail` callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    /// Host-provided error message (for mini-programs, the `errMsg` field).
    pub message: String,
}

impl HostError {
    /// Create a host error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors from [`ThemeStore::set_theme`](crate::ThemeStore::set_theme).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    /// Theme overrides must be a JSON object keyed by category.
    #[error("theme override must be an object, got {found}")]
    NotAnObject {
        /// JSON type name of the rejected value.
        found: &'static str,
    },
}

/// Errors building a [`StyleDescriptor`](crate::StyleDescriptor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// Style descriptors must be JSON objects.
    #[error("style descriptor must be an object, got {found}")]
    NotAnObject {
        /// JSON type name of the rejected value.
        found: &'static str,
    },
}

/// Errors loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON or has the wrong shape.
    #[error("invalid engine configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// `style.cache_capacity` must be at least one.
    #[error("style cache capacity must be non-zero")]
    ZeroCacheCapacity,
}

/// JSON type name used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_result_blocked() {
        let result = NavigationResult::Blocked {
            guard: "AuthGuard".to_string(),
            reason: None,
        };
        assert!(result.is_blocked());
        assert!(!result.is_success());
        assert!(!result.is_superseded());
        assert!(result.route().is_none());
    }

    #[test]
    fn test_navigation_error_display() {
        let error = NavigationError::RouteNotFound {
            path: "/test".to_string(),
        };
        assert_eq!(error.to_string(), "Route not found: /test");

        let error = NavigationError::AdapterFailure {
            message: "navigateTo:fail page limit".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Navigation failed: navigateTo:fail page limit"
        );
    }

    #[test]
    fn test_host_error_converts_to_adapter_failure() {
        let error: NavigationError = HostError::new("boom").into();
        assert_eq!(
            error,
            NavigationError::AdapterFailure {
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&serde_json::json!([1])), "array");
        assert_eq!(json_type_name(&serde_json::json!("x")), "string");
        assert_eq!(json_type_name(&serde_json::json!({})), "object");
    }
}
