//! Host navigation adapters.
//!
//! A [`HostNavigator`] is the only code that touches a platform's navigation
//! globals (`wx.navigateTo`, `my.redirectTo`, `history.pushState`, a React
//! Native navigation container, ...). The router hands it fully built URLs in
//! callback-style options, mirroring the mini-program API shape:
//!
//! ```text
//! navigateTo({ url, success, fail, complete })
//! ```
//!
//! [`NavigateOptions::succeed`] and [`NavigateOptions::fail`] consume the
//! options, so an adapter can answer at most once. An adapter that drops the
//! options without answering is reported to the caller as an adapter failure.
//!
//! [`MemoryNavigator`] is an in-memory host with mini-program page-stack
//! semantics, for tests and for headless hosts.

use crate::error::HostError;
use crate::matching::normalize_path;
use crate::params::split_url;
use crate::{debug_log, warn_log};
use futures::channel::oneshot;
use parking_lot::Mutex;

/// Success callback.
pub type SuccessCallback = Box<dyn FnOnce() + Send>;
/// Failure callback.
pub type FailCallback = Box<dyn FnOnce(&HostError) + Send>;
/// Completion callback, run after either of the others.
pub type CompleteCallback = Box<dyn FnOnce() + Send>;

/// Callback set shared by every host call.
#[derive(Default)]
struct Callbacks {
    success: Option<SuccessCallback>,
    fail: Option<FailCallback>,
    complete: Option<CompleteCallback>,
}

impl Callbacks {
    fn succeed(self) {
        if let Some(success) = self.success {
            success();
        }
        if let Some(complete) = self.complete {
            complete();
        }
    }

    fn fail(self, error: &HostError) {
        if let Some(fail) = self.fail {
            fail(error);
        }
        if let Some(complete) = self.complete {
            complete();
        }
    }

    fn add_success(&mut self, f: SuccessCallback) {
        self.success = Some(match self.success.take() {
            Some(prev) => Box::new(move || {
                prev();
                f();
            }),
            None => f,
        });
    }

    fn add_fail(&mut self, f: FailCallback) {
        self.fail = Some(match self.fail.take() {
            Some(prev) => Box::new(move |error: &HostError| {
                prev(error);
                f(error);
            }),
            None => f,
        });
    }

    fn add_complete(&mut self, f: CompleteCallback) {
        self.complete = Some(match self.complete.take() {
            Some(prev) => Box::new(move || {
                prev();
                f();
            }),
            None => f,
        });
    }

    fn bridged() -> (Self, oneshot::Receiver<Result<(), HostError>>) {
        let (tx, rx) = oneshot::channel();
        let tx = std::sync::Arc::new(Mutex::new(Some(tx)));
        let on_fail = std::sync::Arc::clone(&tx);
        let callbacks = Self {
            success: Some(Box::new(move || {
                if let Some(tx) = tx.lock().take() {
                    let _ = tx.send(Ok(()));
                }
            })),
            fail: Some(Box::new(move |error: &HostError| {
                if let Some(tx) = on_fail.lock().take() {
                    let _ = tx.send(Err(error.clone()));
                }
            })),
            complete: None,
        };
        (callbacks, rx)
    }
}

// ============================================================================
// NavigateOptions / BackOptions
// ============================================================================

/// Options for `navigate_to`, `redirect_to` and `switch_tab`.
pub struct NavigateOptions {
    /// Target URL: normalized path plus percent-encoded query string.
    pub url: String,
    callbacks: Callbacks,
}

impl NavigateOptions {
    /// Options with no callbacks attached.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            callbacks: Callbacks::default(),
        }
    }

    /// Options whose outcome is delivered through the returned receiver.
    pub(crate) fn bridged(url: impl Into<String>) -> (Self, oneshot::Receiver<Result<(), HostError>>) {
        let (callbacks, rx) = Callbacks::bridged();
        (
            Self {
                url: url.into(),
                callbacks,
            },
            rx,
        )
    }

    /// Attach a success callback, run after any already attached.
    #[must_use]
    pub fn on_success(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.callbacks.add_success(Box::new(f));
        self
    }

    /// Attach a failure callback, run after any already attached.
    #[must_use]
    pub fn on_fail(mut self, f: impl FnOnce(&HostError) + Send + 'static) -> Self {
        self.callbacks.add_fail(Box::new(f));
        self
    }

    /// Attach a completion callback, run after any already attached.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.callbacks.add_complete(Box::new(f));
        self
    }

    /// Report success: runs `success` then `complete`.
    pub fn succeed(self) {
        self.callbacks.succeed();
    }

    /// Report failure: runs `fail` then `complete`.
    pub fn fail(self, error: HostError) {
        self.callbacks.fail(&error);
    }
}

impl std::fmt::Debug for NavigateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigateOptions")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Options for `navigate_back`.
pub struct BackOptions {
    /// Number of pages to pop (at least 1).
    pub delta: u32,
    callbacks: Callbacks,
}

impl BackOptions {
    /// Options with no callbacks attached. A `delta` of 0 is raised to 1.
    pub fn new(delta: u32) -> Self {
        Self {
            delta: delta.max(1),
            callbacks: Callbacks::default(),
        }
    }

    pub(crate) fn bridged(delta: u32) -> (Self, oneshot::Receiver<Result<(), HostError>>) {
        let (callbacks, rx) = Callbacks::bridged();
        (
            Self {
                delta: delta.max(1),
                callbacks,
            },
            rx,
        )
    }

    /// Attach a success callback, run after any already attached.
    #[must_use]
    pub fn on_success(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.callbacks.add_success(Box::new(f));
        self
    }

    /// Attach a failure callback, run after any already attached.
    #[must_use]
    pub fn on_fail(mut self, f: impl FnOnce(&HostError) + Send + 'static) -> Self {
        self.callbacks.add_fail(Box::new(f));
        self
    }

    /// Attach a completion callback, run after any already attached.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.callbacks.add_complete(Box::new(f));
        self
    }

    /// Report success: runs `success` then `complete`.
    pub fn succeed(self) {
        self.callbacks.succeed();
    }

    /// Report failure: runs `fail` then `complete`.
    pub fn fail(self, error: HostError) {
        self.callbacks.fail(&error);
    }
}

impl std::fmt::Debug for BackOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackOptions")
            .field("delta", &self.delta)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// HostNavigator trait
// ============================================================================

/// Per-platform navigation backend.
///
/// Implementations must eventually call exactly one of
/// [`succeed`](NavigateOptions::succeed) or [`fail`](NavigateOptions::fail)
/// on the options they receive. They may do so synchronously or later, from
/// any thread.
pub trait HostNavigator: Send + Sync + 'static {
    /// Push a new page.
    fn navigate_to(&self, options: NavigateOptions);

    /// Replace the current page.
    fn redirect_to(&self, options: NavigateOptions);

    /// Switch to a tab page, closing every non-tab page.
    fn switch_tab(&self, options: NavigateOptions);

    /// Pop `delta` pages.
    fn navigate_back(&self, options: BackOptions);
}

// ============================================================================
// MemoryNavigator
// ============================================================================

/// Mini-program page stack limit.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// A host call recorded by [`MemoryNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `navigate_to(url)`
    NavigateTo(String),
    /// `redirect_to(url)`
    RedirectTo(String),
    /// `switch_tab(url)`
    SwitchTab(String),
    /// `navigate_back(delta)`
    NavigateBack(u32),
}

#[derive(Debug, Default)]
struct PageStack {
    pages: Vec<String>,
    calls: Vec<HostCall>,
}

/// In-memory host with mini-program page-stack semantics.
///
/// - `navigate_to` pushes, failing once the stack holds `max_depth` pages.
/// - `redirect_to` replaces the top page.
/// - `switch_tab` resets the stack to the tab page. When tab pages are
///   configured, any other target fails.
/// - `navigate_back` pops `min(delta, depth - 1)` pages and fails at the root.
///
/// Every call is recorded, successful or not. Answers are synchronous.
///
/// # Example
///
/// ```
/// use polyshell::host::{HostNavigator, MemoryNavigator, NavigateOptions};
///
/// let host = MemoryNavigator::new();
/// host.navigate_to(NavigateOptions::new("/orders/42"));
/// assert_eq!(host.pages(), vec!["/orders/42".to_string()]);
/// ```
#[derive(Debug)]
pub struct MemoryNavigator {
    stack: Mutex<PageStack>,
    tab_pages: Vec<String>,
    max_depth: usize,
}

impl MemoryNavigator {
    /// Empty stack, no tab bar, depth limit of [`DEFAULT_MAX_DEPTH`].
    pub fn new() -> Self {
        Self {
            stack: Mutex::new(PageStack::default()),
            tab_pages: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Configure the tab bar pages accepted by `switch_tab`.
    #[must_use]
    pub fn with_tab_pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tab_pages = pages
            .into_iter()
            .map(|p| normalize_path(p.as_ref()).into_owned())
            .collect();
        self
    }

    /// Override the page stack limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Current page stack, bottom first.
    pub fn pages(&self) -> Vec<String> {
        self.stack.lock().pages.clone()
    }

    /// URL of the top page.
    pub fn current_page(&self) -> Option<String> {
        self.stack.lock().pages.last().cloned()
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.stack.lock().calls.clone()
    }

    fn is_tab_page(&self, url: &str) -> bool {
        let (path, _) = split_url(url);
        self.tab_pages.is_empty() || self.tab_pages.iter().any(|tab| *tab == normalize_path(path))
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl HostNavigator for MemoryNavigator {
    fn navigate_to(&self, options: NavigateOptions) {
        let outcome = {
            let mut stack = self.stack.lock();
            stack.calls.push(HostCall::NavigateTo(options.url.clone()));
            if stack.pages.len() >= self.max_depth {
                Err(HostError::new(format!(
                    "navigateTo:fail page stack limit of {} reached",
                    self.max_depth
                )))
            } else {
                stack.pages.push(options.url.clone());
                Ok(())
            }
        };
        answer(options, outcome);
    }

    fn redirect_to(&self, options: NavigateOptions) {
        {
            let mut stack = self.stack.lock();
            stack.calls.push(HostCall::RedirectTo(options.url.clone()));
            stack.pages.pop();
            stack.pages.push(options.url.clone());
        }
        debug_log!("MemoryNavigator redirected to '{}'", options.url);
        options.succeed();
    }

    fn switch_tab(&self, options: NavigateOptions) {
        let outcome = {
            let mut stack = self.stack.lock();
            stack.calls.push(HostCall::SwitchTab(options.url.clone()));
            if self.is_tab_page(&options.url) {
                stack.pages.clear();
                stack.pages.push(options.url.clone());
                Ok(())
            } else {
                Err(HostError::new(format!(
                    "switchTab:fail can not switch to no-tabBar page '{}'",
                    options.url
                )))
            }
        };
        answer(options, outcome);
    }

    fn navigate_back(&self, options: BackOptions) {
        let outcome = {
            let mut stack = self.stack.lock();
            stack.calls.push(HostCall::NavigateBack(options.delta));
            let depth = stack.pages.len();
            if depth <= 1 {
                Err(HostError::new("navigateBack:fail cannot navigate back at first page"))
            } else {
                let pop = (options.delta as usize).min(depth - 1);
                stack.pages.truncate(depth - pop);
                Ok(())
            }
        };
        match outcome {
            Ok(()) => options.succeed(),
            Err(error) => {
                warn_log!("MemoryNavigator: {}", error);
                options.fail(error);
            }
        }
    }
}

fn answer(options: NavigateOptions, outcome: Result<(), HostError>) {
    match outcome {
        Ok(()) => {
            debug_log!("MemoryNavigator accepted '{}'", options.url);
            options.succeed();
        }
        Err(error) => {
            warn_log!("MemoryNavigator: {}", error);
            options.fail(error);
        }
    }
}
