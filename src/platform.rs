//! Host platforms and their style adapters.
//!
//! Each [`Platform`] maps to one [`PlatformAdapter`] chosen once at
//! construction:
//!
//! | Platform | Adapter | Lengths | Names | Shadows |
//! |----------|---------|---------|-------|---------|
//! | `rn` | [`NativeAdapter`] | raw numbers | camelCase | native props |
//! | `h5` | [`WebAdapter`] | `px` | kebab-case | `box-shadow` |
//! | mini-programs | [`MiniProgramAdapter`] | `rpx` (× scale) | kebab-case | `box-shadow` |

use crate::properties::{
    accepts_px_string, css_expansion, format_number, is_length_property, number_value, parse_px,
    rewrite_px_tokens, to_camel_case, to_kebab_case, MINI_PROGRAM_UNSUPPORTED, NATIVE_UNSUPPORTED,
};
use crate::style::StyleObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default `rpx` per `px` on mini-program hosts (750rpx design width).
pub const DEFAULT_RPX_SCALE: f64 = 2.0;

/// A host environment the shell runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Browser.
    H5,
    /// React Native.
    Rn,
    /// WeChat mini-program.
    Weapp,
    /// Alipay mini-program.
    Alipay,
    /// ByteDance mini-program.
    Tt,
    /// QQ mini-program.
    Qq,
    /// JD mini-program.
    Jd,
    /// Baidu smart program.
    Swan,
}

impl Platform {
    /// Every platform, in tag order.
    pub const ALL: [Platform; 8] = [
        Platform::H5,
        Platform::Rn,
        Platform::Weapp,
        Platform::Alipay,
        Platform::Tt,
        Platform::Qq,
        Platform::Jd,
        Platform::Swan,
    ];

    /// The platform's tag as used in platform style sets.
    pub fn tag(self) -> &'static str {
        match self {
            Platform::H5 => "h5",
            Platform::Rn => "rn",
            Platform::Weapp => "weapp",
            Platform::Alipay => "alipay",
            Platform::Tt => "tt",
            Platform::Qq => "qq",
            Platform::Jd => "jd",
            Platform::Swan => "swan",
        }
    }

    /// Look a platform up by tag.
    pub fn from_tag(tag: &str) -> Option<Platform> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }

    /// Return `true` for the mini-program runtimes.
    pub fn is_mini_program(self) -> bool {
        !matches!(self, Platform::H5 | Platform::Rn)
    }

    /// Build this platform's style adapter.
    pub fn adapter(self, rpx_scale: f64) -> Box<dyn PlatformAdapter> {
        match self {
            Platform::Rn => Box::new(NativeAdapter),
            Platform::H5 => Box::new(WebAdapter),
            mini => Box::new(MiniProgramAdapter::new(mini, rpx_scale)),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

/// Per-platform style value and name conversion.
///
/// Property names passed in are camelCase.
pub trait PlatformAdapter: Send + Sync + fmt::Debug {
    /// The platform served.
    fn platform(&self) -> Platform;

    /// Render a length given in design pixels.
    fn length(&self, px: f64) -> Value;

    /// Return `true` if the host does not support `property`.
    fn is_unsupported(&self, property: &str) -> bool;

    /// Return `true` if shadows must be folded into a `box-shadow` string.
    fn uses_string_shadow(&self) -> bool;

    /// Write `property: value` into `out` under the host's name(s).
    fn emit(&self, property: &str, value: Value, out: &mut StyleObject);

    /// Host name for a key that is not a single property, such as a nested
    /// style object.
    fn property_name(&self, property: &str) -> String {
        to_kebab_case(property)
    }

    /// Convert a value for `property`.
    ///
    /// Numbers change only for length properties; `px` strings also change
    /// for `lineHeight`, whose bare numbers are multipliers.
    fn adapt_value(&self, property: &str, value: Value) -> Value {
        match value {
            Value::Number(n) if is_length_property(property) => match n.as_f64() {
                Some(px) => self.length(px),
                None => Value::Number(n),
            },
            Value::String(s) if accepts_px_string(property) => {
                self.adapt_px_string(&s).unwrap_or(Value::String(s))
            }
            other => other,
        }
    }

    /// Rewrite `px` tokens in a length string. `None` leaves it unchanged.
    fn adapt_px_string(&self, value: &str) -> Option<Value> {
        rewrite_px_tokens(value, |px| length_text(&self.length(px))).map(Value::String)
    }
}

/// Text form of a length produced by [`PlatformAdapter::length`].
pub fn length_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_number),
        other => other.to_string(),
    }
}

/// React Native: raw numbers, camelCase names, native shadow props.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeAdapter;

impl PlatformAdapter for NativeAdapter {
    fn platform(&self) -> Platform {
        Platform::Rn
    }

    fn length(&self, px: f64) -> Value {
        number_value(px)
    }

    fn is_unsupported(&self, property: &str) -> bool {
        NATIVE_UNSUPPORTED.contains(&property)
    }

    fn uses_string_shadow(&self) -> bool {
        false
    }

    fn emit(&self, property: &str, value: Value, out: &mut StyleObject) {
        out.insert(self.property_name(property), value);
    }

    fn property_name(&self, property: &str) -> String {
        to_camel_case(property)
    }

    // Only a lone "10px" can become a number; RN has no multi-value lengths.
    fn adapt_px_string(&self, value: &str) -> Option<Value> {
        parse_px(value.trim()).map(number_value)
    }
}

/// Browser: `px` strings and CSS property names.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebAdapter;

impl PlatformAdapter for WebAdapter {
    fn platform(&self) -> Platform {
        Platform::H5
    }

    fn length(&self, px: f64) -> Value {
        Value::String(format!("{}px", format_number(px)))
    }

    fn is_unsupported(&self, _property: &str) -> bool {
        false
    }

    fn uses_string_shadow(&self) -> bool {
        true
    }

    fn emit(&self, property: &str, value: Value, out: &mut StyleObject) {
        emit_css(property, value, out);
    }

    fn adapt_px_string(&self, _value: &str) -> Option<Value> {
        None
    }
}

/// Mini-program runtimes: `rpx` strings and CSS property names.
#[derive(Debug, Clone, Copy)]
pub struct MiniProgramAdapter {
    platform: Platform,
    rpx_scale: f64,
}

impl MiniProgramAdapter {
    /// Adapter for `platform` converting `1px` to `rpx_scale` rpx.
    pub fn new(platform: Platform, rpx_scale: f64) -> Self {
        Self { platform, rpx_scale }
    }

    /// rpx per px.
    pub fn rpx_scale(&self) -> f64 {
        self.rpx_scale
    }
}

impl PlatformAdapter for MiniProgramAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn length(&self, px: f64) -> Value {
        Value::String(format!("{}rpx", format_number(px * self.rpx_scale)))
    }

    fn is_unsupported(&self, property: &str) -> bool {
        MINI_PROGRAM_UNSUPPORTED.contains(&property)
    }

    fn uses_string_shadow(&self) -> bool {
        true
    }

    fn emit(&self, property: &str, value: Value, out: &mut StyleObject) {
        emit_css(property, value, out);
    }
}

fn emit_css(property: &str, value: Value, out: &mut StyleObject) {
    let Some(names) = css_expansion(property) else {
        out.insert(to_kebab_case(property), value);
        return;
    };

    let value = match (property, value) {
        ("textAlignVertical", Value::String(s)) if s == "center" => Value::String("middle".into()),
        (_, value) => value,
    };
    for name in names {
        out.insert((*name).to_string(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tags_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_tag(platform.tag()), Some(platform));
        }
        assert_eq!(Platform::from_tag("default"), None);
        assert_eq!(Platform::Weapp.to_string(), "weapp");
    }

    #[test]
    fn test_adapter_selection() {
        assert_eq!(Platform::Rn.adapter(2.0).platform(), Platform::Rn);
        assert_eq!(Platform::Alipay.adapter(2.0).platform(), Platform::Alipay);
        assert!(Platform::Swan.is_mini_program());
        assert!(!Platform::H5.is_mini_program());
    }

    #[test]
    fn test_lengths() {
        assert_eq!(NativeAdapter.adapt_value("width", json!(100)), json!(100));
        assert_eq!(WebAdapter.adapt_value("width", json!(100)), json!("100px"));
        let mini = MiniProgramAdapter::new(Platform::Weapp, 2.0);
        assert_eq!(mini.adapt_value("width", json!(100)), json!("200rpx"));
        assert_eq!(mini.adapt_value("fontSize", json!(13.5)), json!("27rpx"));
    }

    #[test]
    fn test_non_lengths_pass_through() {
        let mini = MiniProgramAdapter::new(Platform::Tt, 2.0);
        for adapter in [&NativeAdapter as &dyn PlatformAdapter, &WebAdapter, &mini] {
            assert_eq!(adapter.adapt_value("opacity", json!(0.5)), json!(0.5));
            assert_eq!(adapter.adapt_value("zIndex", json!(10)), json!(10));
            assert_eq!(adapter.adapt_value("flex", json!(1)), json!(1));
        }
    }

    #[test]
    fn test_px_strings() {
        let mini = MiniProgramAdapter::new(Platform::Weapp, 2.0);
        assert_eq!(mini.adapt_value("padding", json!("10px 4px")), json!("20rpx 8rpx"));
        assert_eq!(NativeAdapter.adapt_value("padding", json!("10px")), json!(10));
        assert_eq!(NativeAdapter.adapt_value("padding", json!("10px 4px")), json!("10px 4px"));
        assert_eq!(WebAdapter.adapt_value("width", json!("10px")), json!("10px"));
        assert_eq!(mini.adapt_value("width", json!("50%")), json!("50%"));
    }

    #[test]
    fn test_line_height_px_strings() {
        let mini = MiniProgramAdapter::new(Platform::Weapp, 2.0);
        assert_eq!(mini.adapt_value("lineHeight", json!("20px")), json!("40rpx"));
        assert_eq!(NativeAdapter.adapt_value("lineHeight", json!("20px")), json!(20));
        assert_eq!(WebAdapter.adapt_value("lineHeight", json!("20px")), json!("20px"));
        assert_eq!(mini.adapt_value("lineHeight", json!(1.5)), json!(1.5));
        assert_eq!(WebAdapter.adapt_value("lineHeight", json!(1.5)), json!(1.5));
        assert_eq!(mini.adapt_value("lineHeight", json!("normal")), json!("normal"));
    }

    #[test]
    fn test_property_names() {
        assert_eq!(NativeAdapter.property_name("pressed-state"), "pressedState");
        assert_eq!(WebAdapter.property_name("pressedState"), "pressed-state");
        let mini = MiniProgramAdapter::new(Platform::Jd, 2.0);
        assert_eq!(mini.property_name("pressedState"), "pressed-state");
    }

    #[test]
    fn test_emit_names() {
        let mut out = StyleObject::new();
        WebAdapter.emit("paddingHorizontal", json!("4px"), &mut out);
        WebAdapter.emit("backgroundColor", json!("#fff"), &mut out);
        WebAdapter.emit("textAlignVertical", json!("center"), &mut out);
        assert_eq!(
            Value::Object(out),
            json!({
                "padding-left": "4px",
                "padding-right": "4px",
                "background-color": "#fff",
                "vertical-align": "middle"
            })
        );

        let mut out = StyleObject::new();
        NativeAdapter.emit("paddingHorizontal", json!(4), &mut out);
        assert_eq!(Value::Object(out), json!({ "paddingHorizontal": 4 }));
    }

    #[test]
    fn test_denylists() {
        assert!(NativeAdapter.is_unsupported("whiteSpace"));
        assert!(MiniProgramAdapter::new(Platform::Qq, 2.0).is_unsupported("cursor"));
        assert!(!MiniProgramAdapter::new(Platform::Qq, 2.0).is_unsupported("transition"));
        assert!(!WebAdapter.is_unsupported("cursor"));
    }
}
