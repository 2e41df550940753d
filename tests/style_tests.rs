//! Style resolution across platforms, theming and caching

use polyshell::*;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const MINI_PROGRAMS: [Platform; 6] = [
    Platform::Weapp,
    Platform::Alipay,
    Platform::Tt,
    Platform::Qq,
    Platform::Jd,
    Platform::Swan,
];

fn theme() -> Arc<ThemeStore> {
    Arc::new(ThemeStore::new(json!({
        "colors": { "primary": "#111", "border": "#eee" },
        "spacing": { "md": 12 },
        "shadows": { "md": 3 }
    })))
}

fn resolver(platform: Platform) -> StyleResolver {
    StyleResolver::new(platform, theme(), StyleOptions::default()).unwrap()
}

fn style(value: Value) -> StyleDescriptor {
    StyleDescriptor::from_value(value).unwrap()
}

fn resolve(platform: Platform, value: Value) -> Value {
    resolver(platform).resolve(&style(value), None).to_value()
}

// ---- units ----

#[test]
fn test_width_becomes_rpx_on_mini_programs() {
    for platform in MINI_PROGRAMS {
        assert_eq!(
            resolve(platform, json!({ "width": 100 })),
            json!({ "width": "200rpx" }),
            "{platform}"
        );
    }
    assert_eq!(resolve(Platform::H5, json!({ "width": 100 })), json!({ "width": "100px" }));
    assert_eq!(resolve(Platform::Rn, json!({ "width": 100 })), json!({ "width": 100 }));
}

#[test]
fn test_non_length_numbers_are_unchanged_everywhere() {
    for platform in Platform::ALL {
        let resolved = resolve(
            platform,
            json!({ "opacity": 0.5, "zIndex": 10, "flex": 1, "fontWeight": 600, "lineHeight": 1.4 }),
        );
        let get = |name: &str| resolved.get(name).cloned();

        assert_eq!(get("opacity"), Some(json!(0.5)), "{platform}");
        assert_eq!(get("flex"), Some(json!(1)), "{platform}");
        if platform == Platform::Rn {
            assert_eq!(get("zIndex"), Some(json!(10)));
            assert_eq!(get("lineHeight"), Some(json!(1.4)));
        } else {
            assert_eq!(get("z-index"), Some(json!(10)), "{platform}");
            assert_eq!(get("font-weight"), Some(json!(600)), "{platform}");
            assert_eq!(get("line-height"), Some(json!(1.4)), "{platform}");
        }
    }
}

#[test]
fn test_px_strings_are_converted_token_by_token() {
    assert_eq!(
        resolve(Platform::Weapp, json!({ "margin": "10px 0 4px auto" })),
        json!({ "margin": "20rpx 0 8rpx auto" })
    );
    assert_eq!(resolve(Platform::Rn, json!({ "padding": "10px" })), json!({ "padding": 10 }));
    assert_eq!(resolve(Platform::H5, json!({ "padding": "10px" })), json!({ "padding": "10px" }));
}

#[test]
fn test_line_height_px_strings_get_host_units() {
    assert_eq!(
        resolve(Platform::Weapp, json!({ "lineHeight": "20px" })),
        json!({ "line-height": "40rpx" })
    );
    assert_eq!(resolve(Platform::Rn, json!({ "lineHeight": "20px" })), json!({ "lineHeight": 20 }));
    assert_eq!(
        resolve(Platform::H5, json!({ "line-height": "20px" })),
        json!({ "line-height": "20px" })
    );
}

#[test]
fn test_custom_rpx_scale() {
    let options = StyleOptions {
        rpx_scale: 1.0,
        ..StyleOptions::default()
    };
    let resolver = StyleResolver::new(Platform::Alipay, theme(), options).unwrap();
    let resolved = resolver.resolve(&style(json!({ "height": 44 })), None);
    assert_eq!(resolved.get("height"), Some(&json!("44rpx")));
}

// ---- theme variables ----

#[test]
fn test_theme_variable_is_substituted() {
    let resolver = resolver(Platform::H5);
    let resolved = resolver.resolve(
        &style(json!({ "color": "$colors.primary", "padding": "$spacing.md" })),
        None,
    );

    assert_eq!(resolved.get("color"), Some(&json!("#111")));
    // Substituted numbers still get units.
    assert_eq!(resolved.get("padding"), Some(&json!("12px")));
    assert_eq!(resolver.stats().unresolved_variables, 0);
}

#[test]
fn test_unresolved_variable_keeps_literal_and_counts() {
    let resolver = resolver(Platform::Weapp);
    let resolved = resolver.resolve(&style(json!({ "color": "$colors.missing" })), None);

    assert_eq!(resolved.get("color"), Some(&json!("$colors.missing")));
    assert_eq!(resolver.stats().unresolved_variables, 1);
}

#[test]
fn test_set_theme_invalidates_cache() {
    let theme = theme();
    let resolver = StyleResolver::new(Platform::H5, Arc::clone(&theme), StyleOptions::default())
        .unwrap();
    let button = style(json!({ "backgroundColor": "$colors.primary" }));

    let before = resolver.resolve(&button, Some("Button"));
    theme.set_theme(&json!({ "colors": { "primary": "#222" } })).unwrap();
    let after = resolver.resolve(&button, Some("Button"));

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before.get("background-color"), Some(&json!("#111")));
    assert_eq!(after.get("background-color"), Some(&json!("#222")));
    assert_eq!(resolver.stats().invalidations, 1);
    assert_eq!(resolver.stats().misses, 2);
}

// ---- caching ----

#[test]
fn test_cache_hit_returns_same_arc() {
    let resolver = resolver(Platform::Weapp);
    let card = style(json!({ "width": 100, "borderRadius": 8 }));

    let first = resolver.resolve(&card, None);
    let second = resolver.resolve(&card, None);

    assert!(Arc::ptr_eq(&first, &second));
    let stats = resolver.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(resolver.cached_len(), 1);
}

/// Web adapter that counts value conversions.
#[derive(Debug)]
struct CountingAdapter {
    inner: WebAdapter,
    calls: Arc<AtomicUsize>,
}

impl PlatformAdapter for CountingAdapter {
    fn platform(&self) -> Platform {
        self.inner.platform()
    }

    fn length(&self, px: f64) -> Value {
        self.inner.length(px)
    }

    fn is_unsupported(&self, property: &str) -> bool {
        self.inner.is_unsupported(property)
    }

    fn uses_string_shadow(&self) -> bool {
        self.inner.uses_string_shadow()
    }

    fn emit(&self, property: &str, value: Value, out: &mut StyleObject) {
        self.inner.emit(property, value, out);
    }

    fn adapt_value(&self, property: &str, value: Value) -> Value {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.adapt_value(property, value)
    }
}

#[test]
fn test_cache_hit_skips_the_adapter() {
    let calls = Arc::new(AtomicUsize::new(0));
    let adapter = CountingAdapter {
        inner: WebAdapter,
        calls: Arc::clone(&calls),
    };
    let resolver = StyleResolver::with_adapter(Box::new(adapter), theme(), 16).unwrap();
    let card = style(json!({ "width": 100, "height": 40, "opacity": 0.5 }));

    let first = resolver.resolve(&card, Some("Card"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let second = resolver.resolve(&card, Some("Card"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.get("width"), Some(&json!("100px")));
}

#[test]
fn test_structural_key_ignores_key_order() {
    let resolver = resolver(Platform::H5);
    let a = resolver.resolve(&style(json!({ "width": 1, "height": 2 })), None);
    let b = resolver.resolve(&style(json!({ "height": 2, "width": 1 })), None);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_component_name_is_the_cache_key() {
    let resolver = resolver(Platform::H5);
    let first = resolver.resolve(&style(json!({ "width": 1 })), Some("Card"));
    // Same name, different descriptor: the cached entry wins.
    let second = resolver.resolve(&style(json!({ "width": 2 })), Some("Card"));

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.get("width"), Some(&json!("1px")));
}

// ---- names ----

#[test]
fn test_css_hosts_rename_properties() {
    let input = json!({
        "backgroundColor": "#fff",
        "marginHorizontal": 8,
        "paddingVertical": 4,
        "marginStart": 2,
        "textAlignVertical": "center",
        "WebkitLineClamp": 2,
        "--brand": "#f00"
    });

    assert_eq!(
        resolve(Platform::H5, input.clone()),
        json!({
            "background-color": "#fff",
            "margin-left": "2px",
            "margin-right": "8px",
            "padding-top": "4px",
            "padding-bottom": "4px",
            "vertical-align": "middle",
            "-webkit-line-clamp": 2,
            "--brand": "#f00"
        })
    );
}

#[test]
fn test_nested_object_keys_are_renamed() {
    assert_eq!(
        resolve(Platform::Rn, json!({ "pressed-state": { "font-size": 12 } })),
        json!({ "pressedState": { "fontSize": 12 } })
    );
    assert_eq!(
        resolve(Platform::Swan, json!({ "pressedState": { "fontSize": 12 } })),
        json!({ "pressed-state": { "font-size": "24rpx" } })
    );
    assert_eq!(
        resolve(Platform::H5, json!({ ":hover": { "opacity": 0.8 } })),
        json!({ ":hover": { "opacity": 0.8 } })
    );
}

#[test]
fn test_native_converts_kebab_case_to_camel_case() {
    assert_eq!(
        resolve(Platform::Rn, json!({ "background-color": "#fff", "font-size": 14 })),
        json!({ "backgroundColor": "#fff", "fontSize": 14 })
    );
}

// ---- denylists ----

#[test]
fn test_unsupported_properties_are_stripped() {
    let input = json!({
        "color": "#000",
        "cursor": "pointer",
        "userSelect": "none",
        "transition": "all 0.2s",
        "white-space": "nowrap"
    });

    assert_eq!(resolve(Platform::Rn, input.clone()), json!({ "color": "#000" }));
    assert_eq!(
        resolve(Platform::Weapp, input.clone()),
        json!({ "color": "#000", "transition": "all 0.2s", "white-space": "nowrap" })
    );
    assert_eq!(resolve(Platform::H5, input).as_object().map(|o| o.len()), Some(5));
}

// ---- shadows ----

#[test]
fn test_elevation_becomes_box_shadow_on_css_hosts() {
    assert_eq!(
        resolve(Platform::H5, json!({ "elevation": 2 })),
        json!({ "box-shadow": "0 2px 8px rgba(0, 0, 0, 0.08)" })
    );
    assert_eq!(
        resolve(Platform::Weapp, json!({ "elevation": "$shadows.md" })),
        json!({ "box-shadow": "0 6rpx 24rpx rgba(0, 0, 0, 0.12)" })
    );
    // Alpha is capped.
    assert_eq!(
        resolve(Platform::H5, json!({ "elevation": 10 })),
        json!({ "box-shadow": "0 10px 40px rgba(0, 0, 0, 0.24)" })
    );
    assert_eq!(resolve(Platform::Rn, json!({ "elevation": 2 })), json!({ "elevation": 2 }));
}

#[test]
fn test_shadow_props_are_combined() {
    assert_eq!(
        resolve(
            Platform::Weapp,
            json!({
                "shadowColor": "#000",
                "shadowOffset": { "width": 0, "height": 1 },
                "shadowOpacity": 0.2,
                "shadowRadius": 3
            })
        ),
        json!({ "box-shadow": "0rpx 2rpx 6rpx rgba(0, 0, 0, 0.2)" })
    );
}

// ---- platform style sets ----

#[test]
fn test_platform_overlay() {
    let set = json!({
        "default": { "width": 100, "color": "$colors.primary" },
        "rn": { "width": 50 },
        "weapp": { "color": "#0f0" }
    });

    assert_eq!(
        resolve(Platform::Rn, set.clone()),
        json!({ "width": 50, "color": "#111" })
    );
    assert_eq!(
        resolve(Platform::Weapp, set.clone()),
        json!({ "width": "200rpx", "color": "#0f0" })
    );
    assert_eq!(
        resolve(Platform::H5, set),
        json!({ "width": "100px", "color": "#111" })
    );
}

#[test]
fn test_platform_set_without_default() {
    let set = json!({ "h5": { "cursor": "pointer" } });
    assert_eq!(resolve(Platform::H5, set.clone()), json!({ "cursor": "pointer" }));
    assert_eq!(resolve(Platform::Alipay, set), json!({}));
}

#[test]
fn test_stray_keys_in_platform_set_are_ignored() {
    let set = json!({ "default": { "width": 1 }, "symbian": { "width": 9 }, "height": 3 });
    assert_eq!(resolve(Platform::H5, set), json!({ "width": "1px" }));
}

#[test]
fn test_nested_objects_get_overlay_and_adaptation() {
    let input = json!({
        "width": 10,
        "pressed": {
            "default": { "opacity": 0.8 },
            "rn": { "opacity": 0.6 },
            "marginTop": 2
        }
    });

    assert_eq!(
        resolve(Platform::Rn, input.clone()),
        json!({ "width": 10, "pressed": { "opacity": 0.6 } })
    );
    assert_eq!(
        resolve(Platform::Tt, input),
        json!({ "width": "20rpx", "pressed": { "opacity": 0.8 } })
    );
}

// ---- context ----

#[test]
fn test_app_context_resolves_with_its_platform() {
    let app = AppContext::builder()
        .config(EngineConfig::for_platform(Platform::Swan))
        .theme(theme())
        .build()
        .unwrap();

    let resolved = app.resolve_style(&style(json!({ "fontSize": 14 })), Some("Label"));
    assert_eq!(resolved.get("font-size"), Some(&json!("28rpx")));
}
