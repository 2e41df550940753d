//! Engine configuration.
//!
//! [`EngineConfig`] gathers the settings an [`AppContext`](crate::AppContext)
//! is built from. Every field has a default, so a partial JSON document is
//! enough:
//!
//! ```
//! use polyshell::{CommitPolicy, EngineConfig, Platform};
//!
//! let config = EngineConfig::from_json(r#"{
//!     "platform": "weapp",
//!     "router": { "commit_policy": "latest_completed" }
//! }"#)
//! .unwrap();
//!
//! assert_eq!(config.platform, Platform::Weapp);
//! assert_eq!(config.router.commit_policy, CommitPolicy::LatestCompleted);
//! assert_eq!(config.style.cache_capacity, 1000);
//! ```

use crate::error::ConfigError;
use crate::platform::Platform;
use crate::router::RouterOptions;
use crate::style::StyleOptions;
use serde::{Deserialize, Serialize};

/// Settings for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Host the engine runs on.
    pub platform: Platform,
    /// Matching and commit behavior.
    pub router: RouterOptions,
    /// Style cache and unit settings.
    pub style: StyleOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            platform: Platform::H5,
            router: RouterOptions::default(),
            style: StyleOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Config for `platform` with every other setting at its default.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.style.cache_capacity == 0 {
            return Err(ConfigError::ZeroCacheCapacity);
        }
        Ok(())
    }
}
