//! Style property tables and name conversions.
//!
//! Everything here is keyed by the camelCase property name; callers convert
//! kebab-case input with [`to_camel_case`] before looking anything up.

use serde_json::{Number, Value};

/// Properties whose numeric values are lengths and get host units.
///
/// Anything not listed (opacity, zIndex, flex, fontWeight, lineHeight, ...)
/// passes through unchanged. See [`PX_STRING_PROPERTIES`] for the exceptions
/// that only convert explicit `px` strings.
pub const LENGTH_PROPERTIES: &[&str] = &[
    "width",
    "height",
    "minWidth",
    "maxWidth",
    "minHeight",
    "maxHeight",
    "margin",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
    "marginHorizontal",
    "marginVertical",
    "marginStart",
    "marginEnd",
    "padding",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "paddingHorizontal",
    "paddingVertical",
    "paddingStart",
    "paddingEnd",
    "top",
    "right",
    "bottom",
    "left",
    "start",
    "end",
    "borderRadius",
    "borderTopLeftRadius",
    "borderTopRightRadius",
    "borderBottomLeftRadius",
    "borderBottomRightRadius",
    "borderWidth",
    "borderTopWidth",
    "borderRightWidth",
    "borderBottomWidth",
    "borderLeftWidth",
    "fontSize",
    "letterSpacing",
    "gap",
    "rowGap",
    "columnGap",
    "flexBasis",
];

/// Properties whose bare numbers are unitless but whose `px` strings are
/// lengths (`lineHeight: 1.5` vs `lineHeight: "20px"`).
pub const PX_STRING_PROPERTIES: &[&str] = &["lineHeight"];

/// Properties React Native does not implement.
pub const NATIVE_UNSUPPORTED: &[&str] = &["cursor", "userSelect", "transition", "animation", "whiteSpace"];

/// Properties mini-program renderers ignore or reject.
pub const MINI_PROGRAM_UNSUPPORTED: &[&str] = &["cursor", "userSelect"];

/// Shadow properties combined into `box-shadow` on CSS hosts.
pub const SHADOW_PROPERTIES: &[&str] = &["shadowColor", "shadowOffset", "shadowOpacity", "shadowRadius"];

/// Return `true` if `property` (camelCase) takes a length.
pub fn is_length_property(property: &str) -> bool {
    LENGTH_PROPERTIES.contains(&property)
}

/// Return `true` if a `px` string for `property` (camelCase) is a length.
pub fn accepts_px_string(property: &str) -> bool {
    is_length_property(property) || PX_STRING_PROPERTIES.contains(&property)
}

/// Return `true` if `property` (camelCase) is a shadow component.
pub fn is_shadow_property(property: &str) -> bool {
    SHADOW_PROPERTIES.contains(&property)
}

/// CSS names for React Native shorthands that have no CSS counterpart.
///
/// Returns `None` for properties that only need kebab-casing.
pub fn css_expansion(property: &str) -> Option<&'static [&'static str]> {
    let names: &'static [&'static str] = match property {
        "marginHorizontal" => &["margin-left", "margin-right"],
        "marginVertical" => &["margin-top", "margin-bottom"],
        "paddingHorizontal" => &["padding-left", "padding-right"],
        "paddingVertical" => &["padding-top", "padding-bottom"],
        "marginStart" => &["margin-left"],
        "marginEnd" => &["margin-right"],
        "paddingStart" => &["padding-left"],
        "paddingEnd" => &["padding-right"],
        "textAlignVertical" => &["vertical-align"],
        _ => return None,
    };
    Some(names)
}

/// Convert a camelCase property name to kebab-case.
///
/// A leading capital marks a vendor prefix (`WebkitTransform` becomes
/// `-webkit-transform`), as does a leading `ms`. Custom properties (`--x`)
/// and names already in kebab-case are returned as-is.
///
/// # Examples
///
/// ```
/// use polyshell::properties::to_kebab_case;
///
/// assert_eq!(to_kebab_case("backgroundColor"), "background-color");
/// assert_eq!(to_kebab_case("WebkitLineClamp"), "-webkit-line-clamp");
/// assert_eq!(to_kebab_case("msFlex"), "-ms-flex");
/// assert_eq!(to_kebab_case("--brandColor"), "--brandColor");
/// ```
pub fn to_kebab_case(property: &str) -> String {
    if property.starts_with("--") || !property.chars().any(|c| c.is_ascii_uppercase()) {
        return property.to_string();
    }

    let mut out = String::with_capacity(property.len() + 4);
    if property.starts_with("ms") && property[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        out.push('-');
    }
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a kebab-case property name to camelCase.
///
/// `-webkit-transform` becomes `WebkitTransform`; `-ms-` prefixes become
/// `ms`. Custom properties are returned as-is.
///
/// # Examples
///
/// ```
/// use polyshell::properties::to_camel_case;
///
/// assert_eq!(to_camel_case("background-color"), "backgroundColor");
/// assert_eq!(to_camel_case("-webkit-transform"), "WebkitTransform");
/// assert_eq!(to_camel_case("-ms-flex"), "msFlex");
/// assert_eq!(to_camel_case("fontSize"), "fontSize");
/// ```
pub fn to_camel_case(property: &str) -> String {
    if property.starts_with("--") || !property.contains('-') {
        return property.to_string();
    }

    let (body, vendor) = match property.strip_prefix('-') {
        Some(rest) if rest.starts_with("ms-") => (rest, false),
        Some(rest) => (rest, true),
        None => (property, false),
    };

    let mut out = String::with_capacity(body.len());
    for (i, part) in body.split('-').filter(|p| !p.is_empty()).enumerate() {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            if i == 0 && !vendor {
                out.push(first);
            } else {
                out.push(first.to_ascii_uppercase());
            }
            out.extend(chars);
        }
    }
    out
}

/// Format a number for a CSS value: at most four decimals, trailing zeros
/// trimmed.
///
/// # Examples
///
/// ```
/// use polyshell::properties::format_number;
///
/// assert_eq!(format_number(200.0), "200");
/// assert_eq!(format_number(0.5), "0.5");
/// assert_eq!(format_number(0.123456), "0.1235");
/// ```
pub fn format_number(value: f64) -> String {
    let formatted = format!("{value:.4}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// JSON number for `value`, as an integer when it has no fraction.
#[allow(clippy::cast_possible_truncation)]
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        return Value::from(value as i64);
    }
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// Rewrite every `<n>px` token in `value` with `convert`.
///
/// Returns `None` when no token was rewritten.
pub fn rewrite_px_tokens(value: &str, convert: impl Fn(f64) -> String) -> Option<String> {
    let mut changed = false;
    let tokens: Vec<String> = value
        .split_whitespace()
        .map(|token| match parse_px(token) {
            Some(n) => {
                changed = true;
                convert(n)
            }
            None => token.to_string(),
        })
        .collect();
    changed.then(|| tokens.join(" "))
}

/// Parse a single `<n>px` token.
pub fn parse_px(token: &str) -> Option<f64> {
    token.strip_suffix("px")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_allow_list() {
        assert!(is_length_property("width"));
        assert!(is_length_property("borderTopLeftRadius"));
        assert!(!is_length_property("opacity"));
        assert!(!is_length_property("zIndex"));
        assert!(!is_length_property("lineHeight"));
        assert!(!is_length_property("fontWeight"));
    }

    #[test]
    fn test_px_string_properties() {
        assert!(accepts_px_string("width"));
        assert!(accepts_px_string("lineHeight"));
        assert!(!accepts_px_string("opacity"));
    }

    #[test]
    fn test_css_expansion() {
        assert_eq!(
            css_expansion("paddingHorizontal"),
            Some(&["padding-left", "padding-right"][..])
        );
        assert_eq!(css_expansion("textAlignVertical"), Some(&["vertical-align"][..]));
        assert_eq!(css_expansion("color"), None);
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("color"), "color");
        assert_eq!(to_kebab_case("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(to_kebab_case("background-color"), "background-color");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("border-top-left-radius"), "borderTopLeftRadius");
        assert_eq!(to_camel_case("--brand"), "--brand");
    }

    #[test]
    fn test_case_conversion_round_trips_vendor_prefix() {
        assert_eq!(to_camel_case(&to_kebab_case("WebkitTransform")), "WebkitTransform");
        assert_eq!(to_kebab_case(&to_camel_case("-ms-overflow-style")), "-ms-overflow-style");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(0.00001), "0");
    }

    #[test]
    fn test_number_value() {
        assert_eq!(number_value(10.0), serde_json::json!(10));
        assert_eq!(number_value(0.5), serde_json::json!(0.5));
    }

    #[test]
    fn test_rewrite_px_tokens() {
        let doubled = |n: f64| format!("{}rpx", format_number(n * 2.0));
        assert_eq!(rewrite_px_tokens("10px 4px", doubled), Some("20rpx 8rpx".to_string()));
        assert_eq!(rewrite_px_tokens("1px solid #eee", doubled), Some("2rpx solid #eee".to_string()));
        assert_eq!(rewrite_px_tokens("auto", doubled), None);
        assert_eq!(rewrite_px_tokens("50%", doubled), None);
    }
}
