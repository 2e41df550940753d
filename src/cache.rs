//! Style resolution caching.
//!
//! This module provides [`StyleCache`], an LRU cache of resolved styles built
//! on the [`lru`] crate. Entries are keyed either by component name or by the
//! structural key of the descriptor (see [`CacheKey`]).
//!
//! The cache remembers the theme version its entries were computed under.
//! [`StyleCache::sync_theme`] clears everything when it sees a different
//! version, so a theme change never serves stale values.
//!
//! [`CacheStats`] tracks hits, misses, invalidations and unresolved theme
//! variables.
//!
//! # Examples
//!
//! ```
//! use polyshell::cache::{CacheKey, StyleCache};
//! use polyshell::style::ResolvedStyle;
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//!
//! let mut cache = StyleCache::new(NonZeroUsize::new(16).unwrap());
//! let key = CacheKey::component("Button");
//! cache.insert(key.clone(), Arc::new(ResolvedStyle::default()));
//!
//! assert!(cache.get(&key).is_some());
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::style::ResolvedStyle;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default number of cached styles.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Cache key for a resolved style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Caller-supplied component name.
    Component(String),
    /// Stable serialization of the descriptor.
    Structural(String),
}

impl CacheKey {
    /// Key for a named component.
    pub fn component(name: impl Into<String>) -> Self {
        CacheKey::Component(name.into())
    }

    /// Key for an anonymous descriptor.
    pub fn structural(key: impl Into<String>) -> Self {
        CacheKey::Structural(key.into())
    }
}

/// Counters tracking cache effectiveness and theme lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that had to resolve.
    pub misses: usize,
    /// Full cache clears (theme changes and explicit clears).
    pub invalidations: usize,
    /// `$` references that did not resolve against the theme.
    pub unresolved_variables: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of resolved styles, tagged with a theme version.
#[derive(Debug)]
pub struct StyleCache {
    entries: LruCache<CacheKey, Arc<ResolvedStyle>>,
    theme_version: u64,
    stats: CacheStats,
}

impl StyleCache {
    /// Create a cache holding at most `capacity` styles.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            theme_version: 0,
            stats: CacheStats::default(),
        }
    }

    /// Clear the cache if `version` differs from the one its entries were
    /// built with. Returns `true` if it cleared.
    pub fn sync_theme(&mut self, version: u64) -> bool {
        if version == self.theme_version {
            return false;
        }
        trace_log!(
            "Theme version {} -> {}, invalidating style cache",
            self.theme_version,
            version
        );
        self.theme_version = version;
        self.clear();
        true
    }

    /// Theme version the current entries were built with.
    pub fn theme_version(&self) -> u64 {
        self.theme_version
    }

    /// Remove every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Style cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            removed,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Look up a style. Updates hit/miss stats.
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<ResolvedStyle>> {
        if let Some(style) = self.entries.get(key) {
            self.stats.hits += 1;
            trace_log!("Style cache hit for {:?}", key);
            Some(Arc::clone(style))
        } else {
            self.stats.misses += 1;
            trace_log!("Style cache miss for {:?}", key);
            None
        }
    }

    /// Store a style, evicting the least recently used one if full.
    pub fn insert(&mut self, key: CacheKey, style: Arc<ResolvedStyle>) {
        if let Some((evicted, _)) = self.entries.push(key.clone(), style) {
            if evicted != key {
                trace_log!("Style cache evicted {:?}", evicted);
            }
        }
    }

    /// Count `count` unresolved theme variables.
    pub fn record_unresolved(&mut self, count: usize) {
        self.stats.unresolved_variables += count;
    }

    /// Return a reference to the current statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset all counters to zero.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Number of cached styles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached styles.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}
