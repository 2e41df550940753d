//! Platform-agnostic style resolution.
//!
//! A [`StyleDescriptor`] is a JSON object of style properties written once,
//! React Native style (camelCase names, unitless lengths in design pixels).
//! [`StyleResolver::resolve`] turns it into what the active host expects.
//!
//! # Resolution
//!
//! For every style object, nested ones included:
//!
//! 1. **Platform overlay.** An object with a `default` key or any platform
//!    tag key (`h5`, `rn`, `weapp`, ...) is a platform style set: start from
//!    `default` and overlay the active platform's object key by key.
//! 2. **Denylist.** Properties the host does not support are dropped.
//! 3. **Theme variables.** `"$colors.primary"` is replaced by the theme
//!    value. Unknown paths log a warning and keep the literal.
//! 4. **Shadows.** On CSS hosts `shadowColor`, `shadowOffset`,
//!    `shadowOpacity` and `shadowRadius` become one `box-shadow`, and
//!    `elevation` is approximated when no explicit shadow is set.
//! 5. **Units.** Lengths become host units (`100` is `"100px"` on H5 and
//!    `"200rpx"` on mini-programs). Non-length properties are untouched,
//!    except that a `lineHeight` given as a `px` string is converted too.
//! 6. **Names.** CSS hosts get kebab-case names with React Native shorthands
//!    expanded; React Native gets camelCase. Keys of nested objects are
//!    converted the same way; selector keys like `:hover` are left alone.
//!
//! Results are cached per component name, or per structural key for
//! anonymous descriptors, and dropped wholesale on theme change.
//!
//! # Example
//!
//! ```
//! use polyshell::{Platform, StyleDescriptor, StyleOptions, StyleResolver, ThemeStore};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let theme = Arc::new(ThemeStore::new(json!({ "colors": { "primary": "#111" } })));
//! let resolver = StyleResolver::new(Platform::Weapp, theme, StyleOptions::default()).unwrap();
//!
//! let style = StyleDescriptor::from_value(json!({
//!     "width": 100,
//!     "opacity": 0.5,
//!     "backgroundColor": "$colors.primary",
//! }))
//! .unwrap();
//! let resolved = resolver.resolve(&style, None);
//!
//! assert_eq!(resolved.get("width"), Some(&json!("200rpx")));
//! assert_eq!(resolved.get("opacity"), Some(&json!(0.5)));
//! assert_eq!(resolved.get("background-color"), Some(&json!("#111")));
//! ```

use crate::cache::{CacheKey, CacheStats, StyleCache, DEFAULT_CAPACITY};
use crate::error::{json_type_name, ConfigError, StyleError};
use crate::platform::{length_text, Platform, PlatformAdapter, DEFAULT_RPX_SCALE};
use crate::properties::{format_number, is_shadow_property, to_camel_case};
use crate::theme::{lookup_path, ThemeStore};
use crate::{debug_log, trace_log, warn_log};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// A style object: property name to value.
pub type StyleObject = Map<String, Value>;

/// Key selecting the base object of a platform style set.
pub const DEFAULT_KEY: &str = "default";

// ============================================================================
// Descriptor and output
// ============================================================================

/// A style description, flat or a platform style set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleDescriptor(StyleObject);

impl StyleDescriptor {
    /// Wrap a style object.
    pub fn new(style: StyleObject) -> Self {
        Self(style)
    }

    /// Build from any JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self, StyleError> {
        match value {
            Value::Object(style) => Ok(Self(style)),
            other => Err(StyleError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// The raw style object.
    pub fn as_object(&self) -> &StyleObject {
        &self.0
    }

    /// Return `true` if this is a platform style set.
    pub fn is_platform_set(&self) -> bool {
        is_platform_set(&self.0)
    }

    /// Stable serialization used as the anonymous cache key.
    ///
    /// Object keys are sorted, so descriptors that differ only in key order
    /// share a key.
    pub fn structural_key(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<StyleObject> for StyleDescriptor {
    fn from(style: StyleObject) -> Self {
        Self(style)
    }
}

impl TryFrom<Value> for StyleDescriptor {
    type Error = StyleError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Host-ready style produced by [`StyleResolver::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedStyle(StyleObject);

impl ResolvedStyle {
    /// Value of a property, under its host name.
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.0.get(property)
    }

    /// Every property.
    pub fn as_map(&self) -> &StyleObject {
        &self.0
    }

    /// The style as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if no property survived resolution.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Style resolver settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    /// Maximum number of cached styles (non-zero).
    pub cache_capacity: usize,
    /// `rpx` per design pixel on mini-program hosts.
    pub rpx_scale: f64,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            rpx_scale: DEFAULT_RPX_SCALE,
        }
    }
}

/// Resolves style descriptors for one platform, with caching.
#[derive(Debug)]
pub struct StyleResolver {
    adapter: Box<dyn PlatformAdapter>,
    theme: Arc<ThemeStore>,
    cache: Mutex<StyleCache>,
}

impl StyleResolver {
    /// Resolver for `platform`, reading variables from `theme`.
    pub fn new(
        platform: Platform,
        theme: Arc<ThemeStore>,
        options: StyleOptions,
    ) -> Result<Self, ConfigError> {
        Self::with_adapter(platform.adapter(options.rpx_scale), theme, options.cache_capacity)
    }

    /// Resolver driven by a custom adapter.
    pub fn with_adapter(
        adapter: Box<dyn PlatformAdapter>,
        theme: Arc<ThemeStore>,
        cache_capacity: usize,
    ) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(cache_capacity).ok_or(ConfigError::ZeroCacheCapacity)?;
        let mut cache = StyleCache::new(capacity);
        cache.sync_theme(theme.version());
        cache.reset_stats();
        Ok(Self {
            adapter,
            theme,
            cache: Mutex::new(cache),
        })
    }

    /// The platform styles are resolved for.
    pub fn platform(&self) -> Platform {
        self.adapter.platform()
    }

    /// The theme variables are read from.
    pub fn theme(&self) -> &Arc<ThemeStore> {
        &self.theme
    }

    /// Resolve `descriptor`, caching under `component_name` if given.
    ///
    /// A cache hit returns the same `Arc` as the original resolution.
    pub fn resolve(
        &self,
        descriptor: &StyleDescriptor,
        component_name: Option<&str>,
    ) -> Arc<ResolvedStyle> {
        let key = match component_name {
            Some(name) => CacheKey::component(name),
            None => CacheKey::structural(descriptor.structural_key()),
        };
        let version = self.theme.version();

        {
            let mut cache = self.cache.lock();
            cache.sync_theme(version);
            if let Some(style) = cache.get(&key) {
                return style;
            }
        }

        let theme = self.theme.get_theme();
        let mut pass = Pass {
            adapter: self.adapter.as_ref(),
            theme: &theme,
            unresolved: 0,
        };
        let resolved = Arc::new(ResolvedStyle(pass.resolve_object(descriptor.as_object())));
        debug_log!(
            "Resolved {:?} for {} ({} properties)",
            key,
            self.adapter.platform(),
            resolved.len()
        );

        let mut cache = self.cache.lock();
        cache.record_unresolved(pass.unresolved);
        cache.sync_theme(self.theme.version());
        if cache.theme_version() == version {
            cache.insert(key, Arc::clone(&resolved));
        }
        resolved
    }

    /// Resolve without touching the cache.
    pub fn resolve_uncached(&self, descriptor: &StyleDescriptor) -> ResolvedStyle {
        let theme = self.theme.get_theme();
        let mut pass = Pass {
            adapter: self.adapter.as_ref(),
            theme: &theme,
            unresolved: 0,
        };
        let resolved = ResolvedStyle(pass.resolve_object(descriptor.as_object()));
        self.cache.lock().record_unresolved(pass.unresolved);
        resolved
    }

    /// Snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.cache.lock().stats().clone()
    }

    /// Number of cached styles.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Drop every cached style.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}

// ============================================================================
// Resolution pass
// ============================================================================

/// One resolution over a theme snapshot.
struct Pass<'a> {
    adapter: &'a dyn PlatformAdapter,
    theme: &'a Value,
    unresolved: usize,
}

impl Pass<'_> {
    fn resolve_object(&mut self, style: &StyleObject) -> StyleObject {
        let style = self.overlay(style);
        let mut out = StyleObject::new();
        let mut shadow = Shadow::default();
        let string_shadow = self.adapter.uses_string_shadow();

        for (key, value) in &style {
            let property = to_camel_case(key);
            if self.adapter.is_unsupported(&property) {
                trace_log!(
                    "Dropping '{}': unsupported on {}",
                    key,
                    self.adapter.platform()
                );
                continue;
            }

            let value = self.substitute(&property, value);

            if string_shadow && (is_shadow_property(&property) || property == "elevation") {
                shadow.collect(&property, value);
                continue;
            }

            if let Value::Object(nested) = value {
                let name = self.adapter.property_name(&property);
                out.insert(name, Value::Object(self.resolve_object(&nested)));
                continue;
            }

            let value = self.adapter.adapt_value(&property, value);
            self.adapter.emit(&property, value, &mut out);
        }

        if string_shadow && !out.contains_key("box-shadow") {
            if let Some(box_shadow) = shadow.to_css(self.adapter) {
                out.insert("box-shadow".to_string(), Value::String(box_shadow));
            }
        }
        out
    }

    /// Apply the platform overlay if `style` is a platform style set.
    fn overlay(&self, style: &StyleObject) -> StyleObject {
        if !is_platform_set(style) {
            return style.clone();
        }

        let active = self.adapter.platform().tag();
        let mut merged = StyleObject::new();
        for layer in [DEFAULT_KEY, active] {
            match style.get(layer) {
                Some(Value::Object(props)) => {
                    for (key, value) in props {
                        merged.insert(key.clone(), value.clone());
                    }
                }
                Some(other) => {
                    warn_log!(
                        "Ignoring '{}' in platform style set: expected an object, got {}",
                        layer,
                        json_type_name(other)
                    );
                }
                None => {}
            }
        }

        for key in style.keys() {
            if key != DEFAULT_KEY && Platform::from_tag(key).is_none() {
                warn_log!("Ignoring '{}' in platform style set: not a platform tag", key);
            }
        }
        merged
    }

    /// Replace a `$path` reference with its theme value.
    fn substitute(&mut self, property: &str, value: &Value) -> Value {
        let Some(path) = value.as_str().and_then(|s| s.strip_prefix('$')) else {
            return value.clone();
        };
        match lookup_path(self.theme, path) {
            Some(resolved) => {
                trace_log!("'{}': ${} -> {}", property, path, resolved);
                resolved.clone()
            }
            None => {
                warn_log!("Unresolved theme variable '${}' for '{}'", path, property);
                self.unresolved += 1;
                value.clone()
            }
        }
    }
}

/// Return `true` if `style` has a `default` key or any platform tag key.
pub fn is_platform_set(style: &StyleObject) -> bool {
    style
        .keys()
        .any(|key| key == DEFAULT_KEY || Platform::from_tag(key).is_some())
}

/// Shadow components collected from one style object.
#[derive(Debug, Default)]
struct Shadow {
    color: Option<Value>,
    offset: Option<Value>,
    opacity: Option<f64>,
    radius: Option<f64>,
    elevation: Option<f64>,
}

impl Shadow {
    const MAX_ELEVATION_ALPHA: f64 = 0.24;
    const ELEVATION_ALPHA_STEP: f64 = 0.04;

    fn collect(&mut self, property: &str, value: Value) {
        match property {
            "shadowColor" => self.color = Some(value),
            "shadowOffset" => self.offset = Some(value),
            "shadowOpacity" => self.opacity = value.as_f64(),
            "shadowRadius" => self.radius = value.as_f64(),
            "elevation" => self.elevation = value.as_f64(),
            _ => {}
        }
    }

    fn is_explicit(&self) -> bool {
        self.color.is_some() || self.offset.is_some() || self.opacity.is_some() || self.radius.is_some()
    }

    fn to_css(&self, adapter: &dyn PlatformAdapter) -> Option<String> {
        let len = |px: f64| length_text(&adapter.length(px));

        if self.is_explicit() {
            let (x, y) = match &self.offset {
                Some(Value::Object(offset)) => (
                    offset.get("width").and_then(Value::as_f64).unwrap_or(0.0),
                    offset.get("height").and_then(Value::as_f64).unwrap_or(0.0),
                ),
                _ => (0.0, 0.0),
            };
            let color = self.color.as_ref().and_then(Value::as_str).unwrap_or("#000");
            let color = match self.opacity {
                Some(opacity) => with_alpha(color, opacity),
                None => color.to_string(),
            };
            return Some(format!(
                "{} {} {} {}",
                len(x),
                len(y),
                len(self.radius.unwrap_or(0.0)),
                color
            ));
        }

        let elevation = self.elevation.filter(|e| *e > 0.0)?;
        let alpha = (elevation * Self::ELEVATION_ALPHA_STEP).min(Self::MAX_ELEVATION_ALPHA);
        Some(format!(
            "0 {} {} rgba(0, 0, 0, {})",
            len(elevation),
            len(elevation * 4.0),
            format_number(alpha)
        ))
    }
}

/// Apply `alpha` to a `#rgb` / `#rrggbb` color. Other colors are returned
/// unchanged.
fn with_alpha(color: &str, alpha: f64) -> String {
    let Some(hex) = color.strip_prefix('#').filter(|hex| hex.is_ascii()) else {
        return color.to_string();
    };
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return color.to_string(),
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => {
            format!("rgba({r}, {g}, {b}, {})", format_number(alpha.clamp(0.0, 1.0)))
        }
        _ => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver(platform: Platform) -> StyleResolver {
        let theme = Arc::new(ThemeStore::new(json!({ "colors": { "primary": "#111" } })));
        StyleResolver::new(platform, theme, StyleOptions::default()).unwrap()
    }

    fn descriptor(value: Value) -> StyleDescriptor {
        StyleDescriptor::from_value(value).unwrap()
    }

    #[test]
    fn test_descriptor_rejects_non_objects() {
        assert_eq!(
            StyleDescriptor::from_value(json!("red")),
            Err(StyleError::NotAnObject { found: "string" })
        );
    }

    #[test]
    fn test_structural_key_ignores_key_order() {
        let a = descriptor(json!({ "width": 1, "height": 2 }));
        let b = descriptor(json!({ "height": 2, "width": 1 }));
        assert_eq!(a.structural_key(), b.structural_key());
        assert_ne!(a.structural_key(), descriptor(json!({ "width": 2 })).structural_key());
    }

    #[test]
    fn test_platform_set_detection() {
        assert!(descriptor(json!({ "default": {} })).is_platform_set());
        assert!(descriptor(json!({ "weapp": { "width": 1 } })).is_platform_set());
        assert!(!descriptor(json!({ "width": 1 })).is_platform_set());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let theme = Arc::new(ThemeStore::with_defaults());
        let options = StyleOptions {
            cache_capacity: 0,
            ..StyleOptions::default()
        };
        assert!(matches!(
            StyleResolver::new(Platform::H5, theme, options),
            Err(ConfigError::ZeroCacheCapacity)
        ));
    }

    #[test]
    fn test_nested_objects_are_resolved() {
        let resolved = resolver(Platform::H5).resolve_uncached(&descriptor(json!({
            ":hover": { "backgroundColor": "$colors.primary", "marginTop": 4 }
        })));
        assert_eq!(
            resolved.to_value(),
            json!({ ":hover": { "background-color": "#111", "margin-top": "4px" } })
        );
    }

    #[test]
    fn test_nested_object_keys_follow_host_naming() {
        let native = resolver(Platform::Rn).resolve_uncached(&descriptor(json!({
            "pressed-state": { "font-size": 12 }
        })));
        assert_eq!(native.to_value(), json!({ "pressedState": { "fontSize": 12 } }));

        let web = resolver(Platform::H5).resolve_uncached(&descriptor(json!({
            "pressedState": { "fontSize": 12 }
        })));
        assert_eq!(web.to_value(), json!({ "pressed-state": { "font-size": "12px" } }));
    }

    #[test]
    fn test_explicit_shadow_on_css_host() {
        let resolved = resolver(Platform::H5).resolve_uncached(&descriptor(json!({
            "shadowColor": "#000",
            "shadowOffset": { "width": 0, "height": 2 },
            "shadowOpacity": 0.25,
            "shadowRadius": 4,
            "elevation": 8
        })));
        assert_eq!(
            resolved.to_value(),
            json!({ "box-shadow": "0px 2px 4px rgba(0, 0, 0, 0.25)" })
        );
    }

    #[test]
    fn test_native_keeps_shadow_props() {
        let resolved = resolver(Platform::Rn).resolve_uncached(&descriptor(json!({
            "shadowOpacity": 0.25,
            "elevation": 3
        })));
        assert_eq!(resolved.to_value(), json!({ "shadowOpacity": 0.25, "elevation": 3 }));
    }

    #[test]
    fn test_explicit_box_shadow_wins() {
        let resolved = resolver(Platform::Weapp).resolve_uncached(&descriptor(json!({
            "boxShadow": "none",
            "elevation": 2
        })));
        assert_eq!(resolved.to_value(), json!({ "box-shadow": "none" }));
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha("#fff", 0.5), "rgba(255, 255, 255, 0.5)");
        assert_eq!(with_alpha("#102030", 1.0), "rgba(16, 32, 48, 1)");
        assert_eq!(with_alpha("red", 0.5), "red");
        assert_eq!(with_alpha("#zzzzzz", 0.5), "#zzzzzz");
    }
}
