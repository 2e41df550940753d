//! Test utilities for navigation and style tests
//!
//! Provides route fixtures, a host that answers on demand, and recording
//! guards and listeners.

#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use polyshell::*;
use std::sync::Arc;

/// Route table used by most navigation tests
pub fn shop_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/", "pages/index"),
        RouteConfig::new("/home", "pages/home"),
        RouteConfig::new("/cart", "pages/cart"),
        RouteConfig::new("/orders", "pages/orders/index")
            .meta("requiresAuth", true)
            .child(RouteConfig::new(":orderId", "pages/orders/detail")),
        RouteConfig::new("/tabs/:tab", "pages/tabs"),
    ]
}

/// Router over a [`MemoryNavigator`] with [`shop_routes`] registered
pub fn memory_router(options: RouterOptions) -> (Router, Arc<MemoryNavigator>) {
    let host = Arc::new(MemoryNavigator::new());
    let router = Router::new(host.clone(), options);
    router.register_all(shop_routes());
    (router, host)
}

/// Router over a [`ManualNavigator`] with [`shop_routes`] registered
pub fn manual_router(options: RouterOptions) -> (Router, Arc<ManualNavigator>) {
    let host = Arc::new(ManualNavigator::default());
    let router = Router::new(host.clone(), options);
    router.register_all(shop_routes());
    (router, host)
}

/// A host call waiting for an answer
pub enum Pending {
    /// `navigate_to`, `redirect_to` or `switch_tab`
    Navigate(HostCall, NavigateOptions),
    /// `navigate_back`
    Back(BackOptions),
}

/// Host that parks every call until the test answers it
///
/// Lets tests complete navigations out of order.
#[derive(Default)]
pub struct ManualNavigator {
    pending: Mutex<Vec<Option<Pending>>>,
}

impl ManualNavigator {
    /// Number of calls received so far (answered or not)
    pub fn received(&self) -> usize {
        self.pending.lock().len()
    }

    /// Answer call `index` with success
    pub fn succeed(&self, index: usize) {
        match self.take(index) {
            Pending::Navigate(_, options) => options.succeed(),
            Pending::Back(options) => options.succeed(),
        }
    }

    /// Answer call `index` with failure
    pub fn fail(&self, index: usize, message: &str) {
        match self.take(index) {
            Pending::Navigate(_, options) => options.fail(HostError::new(message)),
            Pending::Back(options) => options.fail(HostError::new(message)),
        }
    }

    /// Drop call `index` without answering
    pub fn drop_call(&self, index: usize) {
        drop(self.take(index));
    }

    /// The host call made at `index`
    pub fn call(&self, index: usize) -> Option<HostCall> {
        self.pending.lock().get(index).and_then(|slot| match slot {
            Some(Pending::Navigate(call, _)) => Some(call.clone()),
            Some(Pending::Back(options)) => Some(HostCall::NavigateBack(options.delta)),
            None => None,
        })
    }

    fn take(&self, index: usize) -> Pending {
        self.pending.lock()[index]
            .take()
            .unwrap_or_else(|| panic!("call {index} was already answered"))
    }

    fn park(&self, pending: Pending) {
        self.pending.lock().push(Some(pending));
    }
}

impl HostNavigator for ManualNavigator {
    fn navigate_to(&self, options: NavigateOptions) {
        self.park(Pending::Navigate(HostCall::NavigateTo(options.url.clone()), options));
    }

    fn redirect_to(&self, options: NavigateOptions) {
        self.park(Pending::Navigate(HostCall::RedirectTo(options.url.clone()), options));
    }

    fn switch_tab(&self, options: NavigateOptions) {
        self.park(Pending::Navigate(HostCall::SwitchTab(options.url.clone()), options));
    }

    fn navigate_back(&self, options: BackOptions) {
        self.park(Pending::Back(options));
    }
}

/// Guard that records its id in `log` and answers `allow`
pub struct RecordingGuard {
    pub id: usize,
    pub allow: bool,
    pub log: Arc<Mutex<Vec<usize>>>,
}

impl RouteGuard for RecordingGuard {
    fn check<'a>(
        &'a self,
        _to: &'a RouteInfo,
        _from: Option<&'a RouteInfo>,
    ) -> BoxFuture<'a, GuardResult> {
        async move {
            self.log.lock().push(self.id);
            Ok(self.allow)
        }
        .boxed()
    }

    fn name(&self) -> &'static str {
        "RecordingGuard"
    }
}

/// Attach a listener recording `(to, from)` paths
pub fn record_transitions(router: &Router) -> Arc<Mutex<Vec<(String, Option<String>)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    router.add_listener(move |to, from| {
        sink.lock()
            .push((to.path.clone(), from.map(|route| route.path.clone())));
    });
    seen
}

/// Assert that route parameters contain expected key-value pair
pub fn assert_param_equals(params: &RouteParams, key: &str, expected: &str) {
    let value = params.get(key);
    assert!(
        value.is_some(),
        "Parameter '{}' not found in RouteParams",
        key
    );
    assert_eq!(value.unwrap(), expected, "Parameter '{}' has wrong value", key);
}

/// Path of the router's current route
pub fn current_path(router: &Router) -> Option<String> {
    router.current_route().map(|route| route.path)
}
