//! Application context.
//!
//! An [`AppContext`] bundles one engine instance: the [`Router`], the shared
//! [`ThemeStore`] and the [`StyleResolver`] for the active platform. It is
//! built explicitly with [`AppContextBuilder`] and passed to whatever needs
//! it; nothing here is global, so several independent contexts can coexist
//! (one per test, one per embedded app).
//!
//! # Example
//!
//! ```
//! use polyshell::{AppContext, MemoryNavigator, Platform, RouteConfig};
//! use std::sync::Arc;
//!
//! let host = Arc::new(MemoryNavigator::new());
//! let app = AppContext::builder()
//!     .platform(Platform::Weapp)
//!     .navigator(host.clone())
//!     .route(RouteConfig::new("/", "pages/index"))
//!     .build()
//!     .unwrap();
//!
//! pollster::block_on(app.router().navigate_to("/")).unwrap();
//! assert_eq!(host.pages(), vec!["/".to_string()]);
//! assert_eq!(app.styles().platform(), Platform::Weapp);
//! ```

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::host::{HostNavigator, MemoryNavigator};
use crate::platform::Platform;
use crate::route::RouteConfig;
use crate::router::Router;
use crate::style::{ResolvedStyle, StyleDescriptor, StyleResolver};
use crate::theme::ThemeStore;
use crate::info_log;
use std::sync::Arc;

/// One engine instance.
#[derive(Debug)]
pub struct AppContext {
    config: EngineConfig,
    router: Router,
    theme: Arc<ThemeStore>,
    styles: StyleResolver,
}

impl AppContext {
    /// Start building a context.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::new()
    }

    /// The active platform.
    pub fn platform(&self) -> Platform {
        self.config.platform
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The theme store shared with the style resolver.
    pub fn theme(&self) -> &Arc<ThemeStore> {
        &self.theme
    }

    /// The style resolver.
    pub fn styles(&self) -> &StyleResolver {
        &self.styles
    }

    /// Shorthand for `styles().resolve(..)`.
    pub fn resolve_style(
        &self,
        descriptor: &StyleDescriptor,
        component_name: Option<&str>,
    ) -> Arc<ResolvedStyle> {
        self.styles.resolve(descriptor, component_name)
    }
}

/// Builder for [`AppContext`].
///
/// Without a navigator the context drives a [`MemoryNavigator`]; without a
/// theme it uses [`ThemeStore::with_defaults`].
#[derive(Default)]
pub struct AppContextBuilder {
    config: EngineConfig,
    navigator: Option<Arc<dyn HostNavigator>>,
    theme: Option<Arc<ThemeStore>>,
    routes: Vec<RouteConfig>,
}

impl AppContextBuilder {
    /// Builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the platform.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.config.platform = platform;
        self
    }

    /// Set the host navigation adapter.
    pub fn navigator(mut self, navigator: Arc<dyn HostNavigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Share an existing theme store.
    pub fn theme(mut self, theme: Arc<ThemeStore>) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Register a route at build time.
    pub fn route(mut self, route: RouteConfig) -> Self {
        self.routes.push(route);
        self
    }

    /// Register several routes at build time.
    pub fn routes(mut self, routes: impl IntoIterator<Item = RouteConfig>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Validate the configuration and assemble the context.
    pub fn build(self) -> Result<AppContext, ConfigError> {
        self.config.validate()?;

        let theme = self
            .theme
            .unwrap_or_else(|| Arc::new(ThemeStore::with_defaults()));
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(MemoryNavigator::new()) as Arc<dyn HostNavigator>);

        let styles = StyleResolver::new(self.config.platform, Arc::clone(&theme), self.config.style)?;
        let router = Router::new(navigator, self.config.router);
        router.register_all(self.routes);

        info_log!(
            "App context ready for {} ({} routes)",
            self.config.platform,
            router.routes().len()
        );

        Ok(AppContext {
            config: self.config,
            router,
            theme,
            styles,
        })
    }
}

impl std::fmt::Debug for AppContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContextBuilder")
            .field("config", &self.config)
            .field("navigator", &self.navigator.is_some())
            .field("theme", &self.theme.is_some())
            .field("routes", &self.routes.len())
            .finish()
    }
}
