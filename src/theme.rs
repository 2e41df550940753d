//! Theme variables.
//!
//! A [`ThemeStore`] holds a JSON tree of design tokens grouped by category
//! (`colors`, `spacing`, ...). Style values of the form `"$colors.primary"`
//! are looked up here by dot path.
//!
//! The tree is only changed through [`ThemeStore::set_theme`], which merges
//! one level below each category and bumps a version counter. Resolvers
//! compare that counter against the one their cache was built with.
//!
//! # Example
//!
//! ```
//! use polyshell::ThemeStore;
//! use serde_json::json;
//!
//! let theme = ThemeStore::new(json!({ "colors": { "primary": "#111", "text": "#333" } }));
//! theme.set_theme(&json!({ "colors": { "primary": "#222" } })).unwrap();
//!
//! assert_eq!(theme.lookup("colors.primary"), Some(json!("#222")));
//! assert_eq!(theme.lookup("colors.text"), Some(json!("#333")));
//! assert_eq!(theme.version(), 1);
//! ```

use crate::error::{json_type_name, ThemeError};
use crate::{debug_log, trace_log};
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared, versioned theme variables.
#[derive(Debug)]
pub struct ThemeStore {
    theme: RwLock<Arc<Value>>,
    version: AtomicU64,
}

impl ThemeStore {
    /// Store holding `theme` at version 0.
    pub fn new(theme: Value) -> Self {
        Self {
            theme: RwLock::new(Arc::new(theme)),
            version: AtomicU64::new(0),
        }
    }

    /// Store holding [`default_theme`].
    pub fn with_defaults() -> Self {
        Self::new(default_theme())
    }

    /// Snapshot of the current theme.
    pub fn get_theme(&self) -> Arc<Value> {
        self.theme.read().clone()
    }

    /// Incremented by every [`set_theme`](Self::set_theme).
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Merge `partial` into the theme.
    ///
    /// For each top-level category: if both sides are objects, the partial's
    /// entries replace same-named entries inside the category; otherwise the
    /// partial's value replaces the category.
    pub fn set_theme(&self, partial: &Value) -> Result<(), ThemeError> {
        let Value::Object(partial) = partial else {
            return Err(ThemeError::NotAnObject {
                found: json_type_name(partial),
            });
        };

        let version = {
            let mut guard = self.theme.write();
            let theme = Arc::make_mut(&mut *guard);
            if !theme.is_object() {
                *theme = Value::Object(Map::new());
            }
            if let Value::Object(categories) = theme {
                merge_categories(categories, partial);
            }
            self.version.fetch_add(1, Ordering::SeqCst) + 1
        };

        debug_log!(
            "Theme updated ({} categories touched), version {}",
            partial.len(),
            version
        );
        Ok(())
    }

    /// Value at a dot-separated path, e.g. `colors.primary`.
    ///
    /// Numeric segments index into arrays.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        let theme = self.get_theme();
        let found = lookup_path(&theme, path).cloned();
        if found.is_none() {
            trace_log!("Theme lookup missed '{}'", path);
        }
        found
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn merge_categories(categories: &mut Map<String, Value>, partial: &Map<String, Value>) {
    for (name, value) in partial {
        match (categories.get_mut(name), value) {
            (Some(Value::Object(existing)), Value::Object(update)) => {
                for (key, token) in update {
                    existing.insert(key.clone(), token.clone());
                }
            }
            _ => {
                categories.insert(name.clone(), value.clone());
            }
        }
    }
}

/// Walk `root` along a dot path.
pub fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// The built-in token set: colors, spacing, radii, font sizes and weights,
/// line heights, shadows and z-index tiers.
///
/// Shadow tokens are elevation levels, meant for `"elevation": "$shadows.md"`.
pub fn default_theme() -> Value {
    json!({
        "colors": {
            "primary": "#0085ff",
            "primaryLight": "#4da9ff",
            "primaryDark": "#005fb8",
            "secondary": "#6b7280",
            "success": "#20bc07",
            "warning": "#f59e0b",
            "error": "#ec4868",
            "text": "#111827",
            "textSecondary": "#6b7280",
            "textInverse": "#ffffff",
            "background": "#ffffff",
            "backgroundSecondary": "#f3f4f6",
            "border": "#e5e7eb",
            "overlay": "rgba(0, 0, 0, 0.5)"
        },
        "spacing": {
            "2xs": 2,
            "xs": 4,
            "sm": 8,
            "md": 12,
            "lg": 16,
            "xl": 20,
            "2xl": 24,
            "3xl": 32,
            "4xl": 40,
            "5xl": 48
        },
        "radii": {
            "none": 0,
            "sm": 4,
            "md": 8,
            "lg": 12,
            "xl": 16,
            "2xl": 24,
            "full": 9999
        },
        "fontSizes": {
            "xs": 11,
            "sm": 13,
            "md": 15,
            "lg": 17,
            "xl": 20,
            "2xl": 24,
            "3xl": 30
        },
        "fontWeights": {
            "normal": "400",
            "medium": "500",
            "semibold": "600",
            "bold": "700"
        },
        "lineHeights": {
            "tight": 1.15,
            "normal": 1.4,
            "relaxed": 1.6
        },
        "shadows": {
            "none": 0,
            "sm": 1,
            "md": 3,
            "lg": 6,
            "xl": 12
        },
        "zIndices": {
            "base": 0,
            "dropdown": 100,
            "sticky": 200,
            "overlay": 300,
            "modal": 400,
            "toast": 500
        }
    })
}
