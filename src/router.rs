//! Navigation orchestration.
//!
//! The [`Router`] owns the route table, the current route, the guard list and
//! the listener list, and drives every navigation through the same pipeline:
//!
//! 1. Resolve the target against the route table (fail fast with
//!    [`NavigationError::RouteNotFound`]).
//! 2. Run guards in registration order; the first veto ends the navigation
//!    with [`NavigationResult::Blocked`] and nothing else happens.
//! 3. Hand the URL to the [`HostNavigator`] and await its answer.
//! 4. On success commit the route and notify listeners; on failure return
//!    [`NavigationError::AdapterFailure`] and leave state untouched.
//!
//! Navigations are not queued. Each one gets a sequence number when it passes
//! its guards and is handed to the host; vetoed navigations never get one.
//! With [`CommitPolicy::LatestIssued`] an adapter success is reported as
//! [`NavigationResult::Superseded`] only when a navigation dispatched after it
//! has already committed. A later navigation that fails never hides an
//! earlier success.
//!
//! `navigate_back` goes straight to the host and does not touch the current
//! route: the host owns the page stack.
//!
//! # Example
//!
//! ```
//! use polyshell::{MemoryNavigator, RouteConfig, Router, RouterOptions};
//! use std::sync::Arc;
//!
//! let host = Arc::new(MemoryNavigator::new());
//! let router = Router::new(host.clone(), RouterOptions::default());
//! router.register(RouteConfig::new("/orders/:orderId", "pages/orders/detail"));
//!
//! let result = pollster::block_on(router.navigate_to("/orders/42?ref=push")).unwrap();
//! let route = result.route().unwrap();
//! assert_eq!(route.params.get("orderId"), Some("42"));
//! assert_eq!(host.pages(), vec!["/orders/42?ref=push".to_string()]);
//! ```

use crate::error::{HostError, NavigationError, NavigationResult};
use crate::guards::RouteGuard;
use crate::host::{BackOptions, HostNavigator, NavigateOptions};
use crate::matching::{match_route, normalize_path, MatchStrategy, RouteMatch};
use crate::params::{split_url, QueryParams, RouteParams};
use crate::registry::{Registration, Registry};
use crate::route::{RouteConfig, RouteInfo, RouteTable};
use crate::state::{CommitPolicy, RouterPhase, RouterState};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Callback fired after a navigation commits: `(to, from)`.
pub type RouteListener = Arc<dyn Fn(&RouteInfo, Option<&RouteInfo>) + Send + Sync>;

// ============================================================================
// Options and intents
// ============================================================================

/// Router behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Exact-first or pure registration-order matching.
    pub match_strategy: MatchStrategy,
    /// Which adapter success may commit when navigations overlap.
    pub commit_policy: CommitPolicy,
}

/// Kind of navigation, matching the host API verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Push a page (`navigateTo`).
    Push,
    /// Replace the current page (`redirectTo`).
    Replace,
    /// Switch tab (`switchTab`).
    SwitchTab,
    /// Pop pages (`navigateBack`).
    Back,
}

/// A request to navigate, consumed by [`Router::navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Push `path`, appending `params` to its query string.
    Push {
        /// Target path, optionally with a query string.
        path: String,
        /// Extra query parameters.
        params: QueryParams,
    },
    /// Replace the current page with `path`.
    Replace {
        /// Target path, optionally with a query string.
        path: String,
        /// Extra query parameters.
        params: QueryParams,
    },
    /// Switch to the tab page at `path`.
    SwitchTab {
        /// Target tab path.
        path: String,
        /// Extra query parameters.
        params: QueryParams,
    },
    /// Pop `delta` pages.
    Back {
        /// Pages to pop; 0 is treated as 1.
        delta: u32,
    },
}

impl NavigationIntent {
    /// Push intent without extra params.
    pub fn push(path: impl Into<String>) -> Self {
        Self::Push {
            path: path.into(),
            params: QueryParams::new(),
        }
    }

    /// Replace intent without extra params.
    pub fn replace(path: impl Into<String>) -> Self {
        Self::Replace {
            path: path.into(),
            params: QueryParams::new(),
        }
    }

    /// Switch-tab intent.
    pub fn switch_tab(path: impl Into<String>) -> Self {
        Self::SwitchTab {
            path: path.into(),
            params: QueryParams::new(),
        }
    }

    /// Back intent.
    pub fn back(delta: u32) -> Self {
        Self::Back { delta }
    }

    /// Append an extra query parameter. No effect on [`Back`](Self::Back).
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self {
            Self::Push { params, .. } | Self::Replace { params, .. } | Self::SwitchTab { params, .. } => {
                params.insert(key, value);
            }
            Self::Back { .. } => {}
        }
        self
    }

    /// The host verb this intent maps to.
    pub fn kind(&self) -> NavigationKind {
        match self {
            Self::Push { .. } => NavigationKind::Push,
            Self::Replace { .. } => NavigationKind::Replace,
            Self::SwitchTab { .. } => NavigationKind::SwitchTab,
            Self::Back { .. } => NavigationKind::Back,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

struct Shared {
    table: RwLock<RouteTable>,
    state: Mutex<RouterState>,
    guards: Registry<Arc<dyn RouteGuard>>,
    listeners: Registry<RouteListener>,
    host: Arc<dyn HostNavigator>,
    options: RouterOptions,
}

/// The navigation engine.
///
/// Cheap to clone; clones share routes, state, guards and listeners.
#[derive(Clone)]
pub struct Router {
    shared: Arc<Shared>,
}

impl Router {
    /// Create a router that drives `host`.
    pub fn new(host: Arc<dyn HostNavigator>, options: RouterOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                table: RwLock::new(RouteTable::new()),
                state: Mutex::new(RouterState::new()),
                guards: Registry::new(),
                listeners: Registry::new(),
                host,
                options,
            }),
        }
    }

    /// Options this router was built with.
    pub fn options(&self) -> RouterOptions {
        self.shared.options
    }

    // ========================================================================
    // Routes
    // ========================================================================

    /// Register a route and its children.
    pub fn register(&self, route: RouteConfig) {
        self.shared.table.write().register(route);
    }

    /// Register several routes in order.
    pub fn register_all(&self, routes: impl IntoIterator<Item = RouteConfig>) {
        self.shared.table.write().register_all(routes);
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> Vec<Arc<RouteConfig>> {
        self.shared.table.read().routes().to_vec()
    }

    /// Match a path (query string ignored) against the route table.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let (path, _) = split_url(path);
        match_route(&self.shared.table.read(), path, self.shared.options.match_strategy)
    }

    /// Build the [`RouteInfo`] a push to `target` would commit, without
    /// running guards or calling the host.
    pub fn resolve(&self, target: &str, params: &QueryParams) -> Result<RouteInfo, NavigationError> {
        let (path, raw_query) = split_url(target);
        let path = normalize_path(path);
        let Some(matched) = self.match_path(&path) else {
            warn_log!("No route matches '{}'", path);
            return Err(NavigationError::RouteNotFound {
                path: path.into_owned(),
            });
        };

        let mut query = QueryParams::from_query_string(raw_query);
        query.extend(params);

        Ok(RouteInfo {
            path: path.into_owned(),
            params: matched.params,
            query,
            view_id: matched.route.view_id.clone(),
            meta: matched.route.meta.clone(),
        })
    }

    // ========================================================================
    // Guards and listeners
    // ========================================================================

    /// Append a guard. Guards run in the order they were added.
    pub fn add_guard<G: RouteGuard>(&self, guard: G) -> Registration {
        debug_log!("Adding guard '{}'", guard.name());
        self.shared.guards.add(Arc::new(guard))
    }

    /// Append a listener fired after every committed navigation.
    pub fn add_listener<F>(&self, listener: F) -> Registration
    where
        F: Fn(&RouteInfo, Option<&RouteInfo>) + Send + Sync + 'static,
    {
        self.shared.listeners.add(Arc::new(listener))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Push `path` (may include a query string).
    pub async fn navigate_to(&self, path: &str) -> Result<NavigationResult, NavigationError> {
        self.transition(Verb::NavigateTo, path, &QueryParams::new()).await
    }

    /// Push `path`, appending `params` to its query string.
    pub async fn navigate_to_with(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<NavigationResult, NavigationError> {
        self.transition(Verb::NavigateTo, path, params).await
    }

    /// Replace the current page with `path`.
    pub async fn redirect_to(&self, path: &str) -> Result<NavigationResult, NavigationError> {
        self.transition(Verb::RedirectTo, path, &QueryParams::new()).await
    }

    /// Switch to the tab page at `path`. The committed route has no path params.
    pub async fn switch_tab(&self, path: &str) -> Result<NavigationResult, NavigationError> {
        self.transition(Verb::SwitchTab, path, &QueryParams::new()).await
    }

    /// Pop `delta` pages (0 is treated as 1).
    ///
    /// The current route is left as it is; the host owns the page stack.
    pub async fn navigate_back(&self, delta: u32) -> Result<(), NavigationError> {
        let (options, outcome) = BackOptions::bridged(delta);
        info_log!("Navigation back by {}", options.delta);
        self.shared.host.navigate_back(options);

        match outcome.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => {
                warn_log!("Host failed to navigate back: {}", error);
                Err(error.into())
            }
            Err(_) => Err(dropped_callbacks().into()),
        }
    }

    /// Dispatch a [`NavigationIntent`].
    pub async fn navigate(
        &self,
        intent: NavigationIntent,
    ) -> Result<NavigationResult, NavigationError> {
        match intent {
            NavigationIntent::Push { path, params } => {
                self.transition(Verb::NavigateTo, &path, &params).await
            }
            NavigationIntent::Replace { path, params } => {
                self.transition(Verb::RedirectTo, &path, &params).await
            }
            NavigationIntent::SwitchTab { path, params } => {
                self.transition(Verb::SwitchTab, &path, &params).await
            }
            NavigationIntent::Back { delta } => {
                self.navigate_back(delta).await?;
                Ok(NavigationResult::WentBack {
                    delta: delta.max(1),
                })
            }
        }
    }

    async fn transition(
        &self,
        verb: Verb,
        target: &str,
        params: &QueryParams,
    ) -> Result<NavigationResult, NavigationError> {
        let mut to = self.resolve(target, params)?;
        if verb == Verb::SwitchTab {
            to.params = RouteParams::new();
        }

        let mut pending = Pending::begin(&self.shared.state);
        let from = self.current_route();
        info_log!(
            "Navigation {:?}: '{}' -> '{}'",
            verb,
            from.as_ref().map_or("<none>", |r| r.path.as_str()),
            to.path
        );

        if let Some(blocked) = self.run_guards(&to, from.as_ref()).await {
            return Ok(blocked);
        }

        let nav_id = pending.dispatch();
        let (options, outcome) = NavigateOptions::bridged(to.url());
        trace_log!("Calling host {:?} with '{}' (#{})", verb, options.url, nav_id);
        match verb {
            Verb::NavigateTo => self.shared.host.navigate_to(options),
            Verb::RedirectTo => self.shared.host.redirect_to(options),
            Verb::SwitchTab => self.shared.host.switch_tab(options),
        }

        let outcome = outcome.await.unwrap_or_else(|_| Err(dropped_callbacks()));
        if let Err(error) = outcome {
            warn_log!("Host rejected navigation #{} to '{}': {}", nav_id, to.path, error);
            return Err(error.into());
        }

        Ok(self.commit(pending, nav_id, to))
    }

    /// Run guards in order. Returns the `Blocked` result of the first veto.
    async fn run_guards(&self, to: &RouteInfo, from: Option<&RouteInfo>) -> Option<NavigationResult> {
        let guards = self.shared.guards.snapshot();
        debug_log!("Running {} guards for '{}'", guards.len(), to.path);

        for guard in &guards {
            let name = guard.name();
            let verdict = match panic::catch_unwind(AssertUnwindSafe(|| guard.check(to, from))) {
                Ok(check) => AssertUnwindSafe(check).catch_unwind().await,
                Err(payload) => Err(payload),
            };

            let reason = match verdict {
                Ok(Ok(true)) => {
                    trace_log!("Guard '{}' approved '{}'", name, to.path);
                    continue;
                }
                Ok(Ok(false)) => None,
                Ok(Err(error)) => {
                    warn_log!("Guard '{}' failed on '{}': {}", name, to.path, error);
                    Some(error.message)
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error_log!("Guard '{}' panicked on '{}': {}", name, to.path, message);
                    Some(format!("guard panicked: {message}"))
                }
            };

            warn_log!("Navigation to '{}' vetoed by '{}'", to.path, name);
            return Some(NavigationResult::Blocked {
                guard: name.to_string(),
                reason,
            });
        }

        None
    }

    fn commit(&self, pending: Pending<'_>, nav_id: u64, to: RouteInfo) -> NavigationResult {
        let policy = self.shared.options.commit_policy;
        let previous = match pending.complete(nav_id, to.clone(), policy) {
            Ok(previous) => previous,
            Err(route) => {
                debug_log!(
                    "Navigation #{} to '{}' superseded by #{}",
                    nav_id,
                    route.path,
                    self.shared.state.lock().committed_id()
                );
                return NavigationResult::Superseded { route };
            }
        };

        info_log!("Navigation #{} committed: '{}'", nav_id, to.path);
        self.notify(&to, previous.as_ref());
        NavigationResult::Success { route: to }
    }

    fn notify(&self, to: &RouteInfo, from: Option<&RouteInfo>) {
        for listener in self.shared.listeners.snapshot() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener(to, from))) {
                error_log!(
                    "Route listener panicked while handling '{}': {}",
                    to.path,
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The committed route, `None` before the first successful navigation.
    pub fn current_route(&self) -> Option<RouteInfo> {
        self.shared.state.lock().current().cloned()
    }

    /// What the router is doing across all pending navigations.
    pub fn phase(&self) -> RouterPhase {
        self.shared.state.lock().phase()
    }

    /// Number of registered guards.
    pub fn guard_count(&self) -> usize {
        self.shared.guards.len()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.len()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.shared.table.read().len())
            .field("guards", &self.shared.guards.len())
            .field("listeners", &self.shared.listeners.len())
            .field("options", &self.shared.options)
            .finish_non_exhaustive()
    }
}

/// Host API verb for path-based navigations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    NavigateTo,
    RedirectTo,
    SwitchTab,
}

/// A navigation's slot in [`RouterState`], released on drop so a cancelled
/// or failed navigation never leaves the phase stuck.
struct Pending<'a> {
    state: &'a Mutex<RouterState>,
    stage: Stage,
}

#[derive(Clone, Copy)]
enum Stage {
    Resolving,
    InFlight,
    Settled,
}

impl<'a> Pending<'a> {
    fn begin(state: &'a Mutex<RouterState>) -> Self {
        state.lock().begin_resolving();
        Self {
            state,
            stage: Stage::Resolving,
        }
    }

    fn dispatch(&mut self) -> u64 {
        self.stage = Stage::InFlight;
        self.state.lock().dispatch()
    }

    fn complete(
        mut self,
        nav_id: u64,
        route: RouteInfo,
        policy: CommitPolicy,
    ) -> Result<Option<RouteInfo>, RouteInfo> {
        self.stage = Stage::Settled;
        self.state.lock().complete(nav_id, route, policy)
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        match self.stage {
            Stage::Resolving => self.state.lock().end_resolving(),
            Stage::InFlight => self.state.lock().fail(),
            Stage::Settled => {}
        }
    }
}

fn dropped_callbacks() -> HostError {
    HostError::new("host adapter dropped the navigation callbacks without answering")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
