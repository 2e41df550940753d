//! Route guards.
//!
//! Guards are consulted **before** the host adapter is called. Each guard sees
//! the target [`RouteInfo`] and the current one (if any) and answers `true`
//! (allow) or `false` (veto). Guards may be asynchronous.
//!
//! The router evaluates guards one at a time in **registration order**,
//! awaiting each before starting the next. The first veto wins and the
//! remaining guards are skipped. A guard that returns `Err` or panics counts
//! as a veto; the error is logged, never propagated.
//!
//! # Built-in guards
//!
//! | Guard | Purpose |
//! |-------|---------|
//! | [`guard_fn`] | synchronous closure |
//! | [`async_guard_fn`] | closure returning a future |
//! | [`AuthGuard`] | login check, optionally only for routes flagged in `meta` |
//! | [`Guards`] | AND composition |
//! | [`NotGuard`] | inversion |
//!
//! # Example
//!
//! ```
//! use polyshell::{guard_fn, AuthGuard, RouteGuard};
//!
//! let logged_in = guard_fn(|to, _from| !to.path.starts_with("/admin"));
//! let auth = AuthGuard::new(|| true).only_for_meta("requiresAuth");
//! assert_eq!(auth.name(), "AuthGuard");
//! # let _ = logged_in;
//! ```

use crate::error::GuardError;
use crate::route::RouteInfo;
use futures::future::{self, BoxFuture, FutureExt};
use std::future::Future;

/// What a guard answers: `Ok(true)` allows, `Ok(false)` or `Err(_)` vetoes.
pub type GuardResult = Result<bool, GuardError>;

// ============================================================================
// RouteGuard trait
// ============================================================================

/// Trait for route guards.
///
/// # Example
///
/// ```
/// use futures::future::{BoxFuture, FutureExt};
/// use polyshell::{GuardResult, RouteGuard, RouteInfo};
///
/// struct MaintenanceGuard {
///     down: bool,
/// }
///
/// impl RouteGuard for MaintenanceGuard {
///     fn check<'a>(
///         &'a self,
///         _to: &'a RouteInfo,
///         _from: Option<&'a RouteInfo>,
///     ) -> BoxFuture<'a, GuardResult> {
///         async move { Ok(!self.down) }.boxed()
///     }
///
///     fn name(&self) -> &'static str {
///         "MaintenanceGuard"
///     }
/// }
/// ```
pub trait RouteGuard: Send + Sync + 'static {
    /// Decide whether navigation from `from` to `to` may proceed.
    fn check<'a>(&'a self, to: &'a RouteInfo, from: Option<&'a RouteInfo>)
        -> BoxFuture<'a, GuardResult>;

    /// Guard name for logs and [`NavigationResult::Blocked`](crate::NavigationResult::Blocked).
    fn name(&self) -> &'static str {
        "RouteGuard"
    }
}

// ============================================================================
// Closure guards
// ============================================================================

/// Create a guard from a synchronous predicate.
///
/// ```
/// use polyshell::guard_fn;
///
/// let guard = guard_fn(|to, _from| to.meta.get("disabled").is_none());
/// # let _ = guard;
/// ```
pub const fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(&RouteInfo, Option<&RouteInfo>) -> bool + Send + Sync + 'static,
{
    FnGuard { f }
}

/// Guard created by [`guard_fn`].
pub struct FnGuard<F> {
    f: F,
}

impl<F> RouteGuard for FnGuard<F>
where
    F: Fn(&RouteInfo, Option<&RouteInfo>) -> bool + Send + Sync + 'static,
{
    fn check<'a>(
        &'a self,
        to: &'a RouteInfo,
        from: Option<&'a RouteInfo>,
    ) -> BoxFuture<'a, GuardResult> {
        future::ready(Ok((self.f)(to, from))).boxed()
    }
}

/// Create a guard from a closure returning a future.
///
/// The closure receives owned copies of the routes so the future can be
/// `'static` (e.g. a token refresh awaiting the network).
///
/// ```
/// use polyshell::async_guard_fn;
///
/// let guard = async_guard_fn(|to, _from| async move { Ok(to.path != "/locked") });
/// # let _ = guard;
/// ```
pub const fn async_guard_fn<F, Fut>(f: F) -> AsyncFnGuard<F>
where
    F: Fn(RouteInfo, Option<RouteInfo>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GuardResult> + Send + 'static,
{
    AsyncFnGuard { f }
}

/// Guard created by [`async_guard_fn`].
pub struct AsyncFnGuard<F> {
    f: F,
}

impl<F, Fut> RouteGuard for AsyncFnGuard<F>
where
    F: Fn(RouteInfo, Option<RouteInfo>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GuardResult> + Send + 'static,
{
    fn check<'a>(
        &'a self,
        to: &'a RouteInfo,
        from: Option<&'a RouteInfo>,
    ) -> BoxFuture<'a, GuardResult> {
        (self.f)(to.clone(), from.cloned()).boxed()
    }
}

// ============================================================================
// AuthGuard
// ============================================================================

/// Function type for authentication checks.
pub type AuthCheckFn = Box<dyn Fn() -> bool + Send + Sync>;

/// Vetoes navigation when the user is not logged in.
///
/// By default it protects every route. With
/// [`only_for_meta`](Self::only_for_meta) it only protects routes whose
/// metadata has the given key set to `true`.
pub struct AuthGuard {
    check_fn: AuthCheckFn,
    meta_flag: Option<String>,
}

impl AuthGuard {
    /// Create an auth guard with a login check.
    pub fn new<F>(check_fn: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            check_fn: Box::new(check_fn),
            meta_flag: None,
        }
    }

    /// Only guard routes whose `meta[flag]` is `true`.
    #[must_use]
    pub fn only_for_meta(mut self, flag: impl Into<String>) -> Self {
        self.meta_flag = Some(flag.into());
        self
    }

    fn applies_to(&self, route: &RouteInfo) -> bool {
        self.meta_flag.as_ref().map_or(true, |flag| {
            route
                .meta
                .get(flag)
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
        })
    }
}

impl RouteGuard for AuthGuard {
    fn check<'a>(
        &'a self,
        to: &'a RouteInfo,
        _from: Option<&'a RouteInfo>,
    ) -> BoxFuture<'a, GuardResult> {
        let allowed = !self.applies_to(to) || (self.check_fn)();
        future::ready(Ok(allowed)).boxed()
    }

    fn name(&self) -> &'static str {
        "AuthGuard"
    }
}

// ============================================================================
// Guard Composition
// ============================================================================

/// Combines guards with AND logic, in order, short-circuiting on the first
/// veto or error.
///
/// # Example
///
/// ```
/// use polyshell::{guard_fn, AuthGuard, Guards};
///
/// let guard = Guards::builder()
///     .guard(AuthGuard::new(|| true))
///     .guard(guard_fn(|to, _| to.path != "/maintenance"))
///     .build();
/// # let _ = guard;
/// ```
pub struct Guards {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl Guards {
    /// Create a composition from boxed guards.
    #[must_use]
    pub fn new(guards: Vec<Box<dyn RouteGuard>>) -> Self {
        Self { guards }
    }

    /// Start building a composition.
    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }
}

impl RouteGuard for Guards {
    fn check<'a>(
        &'a self,
        to: &'a RouteInfo,
        from: Option<&'a RouteInfo>,
    ) -> BoxFuture<'a, GuardResult> {
        async move {
            for guard in &self.guards {
                if !guard.check(to, from).await? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        .boxed()
    }

    fn name(&self) -> &'static str {
        "Guards"
    }
}

/// Builder for [`Guards`].
#[must_use]
pub struct GuardBuilder {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl GuardBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    /// Add a guard to the composition.
    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Build the final [`Guards`].
    #[must_use]
    pub fn build(self) -> Guards {
        Guards::new(self.guards)
    }
}

impl Default for GuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// NotGuard
// ============================================================================

/// Inverts a guard: allow becomes veto and veto becomes allow.
///
/// Errors stay errors (and therefore vetoes).
pub struct NotGuard {
    guard: Box<dyn RouteGuard>,
}

impl NotGuard {
    /// Wrap the given guard.
    pub fn new<G: RouteGuard>(guard: G) -> Self {
        Self {
            guard: Box::new(guard),
        }
    }
}

impl RouteGuard for NotGuard {
    fn check<'a>(
        &'a self,
        to: &'a RouteInfo,
        from: Option<&'a RouteInfo>,
    ) -> BoxFuture<'a, GuardResult> {
        self.guard.check(to, from).map(|result| result.map(|allowed| !allowed)).boxed()
    }

    fn name(&self) -> &'static str {
        "NotGuard"
    }
}

// ============================================================================
// Tests
// ============================================================================
