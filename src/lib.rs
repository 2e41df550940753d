//! # polyshell
//!
//! Navigation and style resolution engine for cross-platform app shells.
//!
//! One component source runs on a browser (H5), React Native and several
//! mini-program runtimes. This crate is the part of the shell that has to
//! know the difference:
//!
//! - **Navigation.** A single route table and router translate every
//!   navigation (push, replace, switch tab, back) into the host's API call
//!   through a [`HostNavigator`], running [`RouteGuard`]s first and notifying
//!   listeners after.
//! - **Styles.** A [`StyleResolver`] turns a platform-agnostic
//!   [`StyleDescriptor`] into host-correct values (units, property names,
//!   unsupported properties dropped, theme variables substituted) and caches
//!   the result.
//!
//! Both live in an [`AppContext`], built explicitly and passed around; there
//! are no globals.
//!
//! # Quick start
//!
//! ```
//! use polyshell::{
//!     guard_fn, AppContext, MemoryNavigator, NavigationResult, Platform, RouteConfig,
//!     StyleDescriptor,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let host = Arc::new(MemoryNavigator::new());
//! let app = AppContext::builder()
//!     .platform(Platform::Weapp)
//!     .navigator(host.clone())
//!     .routes([
//!         RouteConfig::new("/", "pages/index"),
//!         RouteConfig::new("/orders/:orderId", "pages/orders/detail"),
//!         RouteConfig::new("/admin", "pages/admin").meta("requiresAuth", true),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! app.router()
//!     .add_guard(guard_fn(|to, _from| to.meta.get("requiresAuth").is_none()));
//!
//! let result = pollster::block_on(app.router().navigate_to("/orders/42?ref=push")).unwrap();
//! assert_eq!(result.route().unwrap().params.get("orderId"), Some("42"));
//! assert_eq!(host.current_page().as_deref(), Some("/orders/42?ref=push"));
//!
//! let blocked = pollster::block_on(app.router().navigate_to("/admin")).unwrap();
//! assert!(matches!(blocked, NavigationResult::Blocked { .. }));
//!
//! let card = StyleDescriptor::from_value(json!({ "width": 100, "opacity": 0.5 })).unwrap();
//! let resolved = app.resolve_style(&card, Some("Card"));
//! assert_eq!(resolved.get("width"), Some(&json!("200rpx")));
//! ```
//!
//! # Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `log` | yes | log through the `log` crate |
//! | `tracing` | no | log through the `tracing` crate |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod guards;
pub mod host;
pub mod logging;
pub mod matching;
pub mod params;
pub mod platform;
pub mod properties;
pub mod registry;
pub mod route;
pub mod router;
pub mod state;
pub mod style;
pub mod theme;

pub use cache::{CacheKey, CacheStats, StyleCache};
pub use config::EngineConfig;
pub use context::{AppContext, AppContextBuilder};
pub use error::{
    ConfigError, GuardError, HostError, NavigationError, NavigationResult, StyleError, ThemeError,
};
pub use guards::{
    async_guard_fn, guard_fn, AuthGuard, GuardBuilder, GuardResult, Guards, NotGuard, RouteGuard,
};
pub use host::{BackOptions, HostCall, HostNavigator, MemoryNavigator, NavigateOptions};
pub use matching::{match_route, normalize_path, MatchStrategy, RouteMatch};
pub use params::{QueryParams, RouteParams};
pub use platform::{MiniProgramAdapter, NativeAdapter, Platform, PlatformAdapter, WebAdapter};
pub use registry::Registration;
pub use route::{RouteConfig, RouteInfo, RouteMeta, RouteTable, ViewId};
pub use router::{NavigationIntent, NavigationKind, Router, RouterOptions};
pub use state::{CommitPolicy, RouterPhase};
pub use style::{ResolvedStyle, StyleDescriptor, StyleObject, StyleOptions, StyleResolver};
pub use theme::ThemeStore;
