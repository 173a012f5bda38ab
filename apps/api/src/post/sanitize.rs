//! Input sanitization: untrusted JSON → a fully validated `PostContent`.
//!
//! Every field is validated, truncated or defaulted here; nothing downstream
//! sees raw input. Only two conditions reject the request outright —
//! oversized canvas dimensions and non-string/oversized body text. Every
//! other invalid field is silently replaced by its fallback.

use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;

// Sample-author defaults, substituted when a field is absent.
pub const DEFAULT_DISPLAY_NAME: &str = "Alex Johnson";
pub const DEFAULT_HANDLE: &str = "@userhandle";
pub const DEFAULT_AVATAR_URL: &str =
    "https://images.unsplash.com/photo-1633332755192-727a05c4013d?q=80&w=200";
pub const DEFAULT_BODY_TEXT: &str =
    "Just finished reading an amazing book on web development! \u{1F4DA}";

// Fallbacks for present-but-invalid name/handle values. Distinct from the
// absent-field defaults above: a wrong type is replaced, not rejected.
pub const FALLBACK_DISPLAY_NAME: &str = "Anonymous";
pub const FALLBACK_HANDLE: &str = "@user";

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_HANDLE_CHARS: usize = 20;
pub const MAX_BODY_CHARS: usize = 800;
pub const MAX_CANVAS_DIMENSION: u64 = 2000;
pub const DEFAULT_CANVAS_WIDTH: u32 = 1000;

/// Validated post content. Immutable, constructed once per request.
#[derive(Debug, Clone, Serialize)]
pub struct PostContent {
    pub display_name: String,
    pub handle: String,
    pub body_text: String,
    pub avatar_url: String,
    pub embedded_image_url: Option<String>,
    pub verified: bool,
    pub dark_theme: bool,
    pub timestamp_label: String,
}

/// Canvas dimension inputs taken from the request. A zero width or height is
/// treated as absent.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CanvasParams {
    pub width: u32,
    /// Replaces the computed height entirely when present.
    pub height_override: Option<u32>,
}

/// Output format accepted in the request. Only PNG is ever produced; the
/// field is parsed for interface parity and ignored downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

#[derive(Debug, Clone)]
pub struct SanitizedRequest {
    pub content: PostContent,
    pub canvas: CanvasParams,
    #[allow(dead_code)]
    pub format: OutputFormat,
}

/// Sanitizes a raw (possibly non-object) JSON value into a render request.
pub fn sanitize(raw: &Value) -> Result<SanitizedRequest, AppError> {
    let width_raw = raw.get("width").and_then(as_dimension);
    let height_raw = raw.get("height").and_then(as_dimension);
    if width_raw.is_some_and(|w| w > MAX_CANVAS_DIMENSION)
        || height_raw.is_some_and(|h| h > MAX_CANVAS_DIMENSION)
    {
        return Err(AppError::DimensionsTooLarge);
    }

    let body_text = match raw.get("text") {
        None => DEFAULT_BODY_TEXT.to_string(),
        Some(Value::String(s)) => {
            if s.chars().count() > MAX_BODY_CHARS {
                return Err(AppError::TextTooLong);
            }
            // Defensive: truncate even though the length was just checked.
            truncate_chars(s, MAX_BODY_CHARS)
        }
        Some(_) => return Err(AppError::TextTooLong),
    };

    let display_name = sanitize_label(
        raw.get("name"),
        DEFAULT_DISPLAY_NAME,
        FALLBACK_DISPLAY_NAME,
        MAX_NAME_CHARS,
    );
    let handle = sanitize_label(
        raw.get("handle"),
        DEFAULT_HANDLE,
        FALLBACK_HANDLE,
        MAX_HANDLE_CHARS,
    );

    let avatar_url = match raw.get("avatar") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => DEFAULT_AVATAR_URL.to_string(),
    };

    let embedded_image_url = match raw.get("image") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };

    let timestamp_label = match raw.get("timestamp") {
        Some(Value::String(s)) => s.clone(),
        _ => default_timestamp_label(),
    };

    let verified = raw.get("verified").and_then(Value::as_bool).unwrap_or(false);
    let dark_theme = raw.get("dark").and_then(Value::as_bool).unwrap_or(false);

    let format = match raw.get("format") {
        Some(Value::String(s)) if s.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
        _ => OutputFormat::Png,
    };

    Ok(SanitizedRequest {
        content: PostContent {
            display_name,
            handle,
            body_text,
            avatar_url,
            embedded_image_url,
            verified,
            dark_theme,
            timestamp_label,
        },
        canvas: CanvasParams {
            width: width_raw
                .filter(|w| *w > 0)
                .map(|w| w as u32)
                .unwrap_or(DEFAULT_CANVAS_WIDTH),
            height_override: height_raw.filter(|h| *h > 0).map(|h| h as u32),
        },
        format,
    })
}

/// Absent → default; wrong type → fallback literal; valid → truncated.
fn sanitize_label(value: Option<&Value>, default: &str, fallback: &str, max_chars: usize) -> String {
    match value {
        None => default.to_string(),
        Some(Value::String(s)) => truncate_chars(s, max_chars),
        Some(_) => fallback.to_string(),
    }
}

/// Char-based truncation; never splits a UTF-8 code point.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

fn as_dimension(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f.round() as u64)
    })
}

/// Formats the current local time like `3:45 PM · Aug 30, 2026`.
fn default_timestamp_label() -> String {
    chrono::Local::now().format("%-I:%M %p · %b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_gets_all_defaults() {
        let req = sanitize(&json!({})).unwrap();
        assert_eq!(req.content.display_name, DEFAULT_DISPLAY_NAME);
        assert_eq!(req.content.handle, DEFAULT_HANDLE);
        assert_eq!(req.content.body_text, DEFAULT_BODY_TEXT);
        assert_eq!(req.content.avatar_url, DEFAULT_AVATAR_URL);
        assert!(req.content.embedded_image_url.is_none());
        assert!(!req.content.verified);
        assert!(!req.content.dark_theme);
        assert_eq!(req.canvas.width, DEFAULT_CANVAS_WIDTH);
        assert!(req.canvas.height_override.is_none());
        assert_eq!(req.format, OutputFormat::Png);
    }

    #[test]
    fn test_non_object_body_gets_all_defaults() {
        let req = sanitize(&json!([1, 2, 3])).unwrap();
        assert_eq!(req.content.display_name, DEFAULT_DISPLAY_NAME);
        assert_eq!(req.canvas.width, DEFAULT_CANVAS_WIDTH);
    }

    #[test]
    fn test_valid_text_is_kept_and_never_grows() {
        for len in [0, 1, 799, 800] {
            let text = "a".repeat(len);
            let req = sanitize(&json!({ "text": text })).unwrap();
            assert_eq!(req.content.body_text.chars().count(), len.min(800));
        }
    }

    #[test]
    fn test_oversized_text_is_rejected() {
        let text = "a".repeat(801);
        let err = sanitize(&json!({ "text": text })).unwrap_err();
        assert!(matches!(err, AppError::TextTooLong));
    }

    #[test]
    fn test_non_string_text_is_rejected() {
        for value in [json!({ "text": 42 }), json!({ "text": null }), json!({ "text": ["a"] })] {
            let err = sanitize(&value).unwrap_err();
            assert!(matches!(err, AppError::TextTooLong), "value={value}");
        }
    }

    #[test]
    fn test_non_string_name_gets_fallback_not_default() {
        let req = sanitize(&json!({ "name": 99 })).unwrap();
        assert_eq!(req.content.display_name, FALLBACK_DISPLAY_NAME);
        let req = sanitize(&json!({ "handle": false })).unwrap();
        assert_eq!(req.content.handle, FALLBACK_HANDLE);
    }

    #[test]
    fn test_oversized_name_and_handle_are_truncated() {
        let req = sanitize(&json!({ "name": "n".repeat(80), "handle": "h".repeat(40) })).unwrap();
        assert_eq!(req.content.display_name.chars().count(), MAX_NAME_CHARS);
        assert_eq!(req.content.handle.chars().count(), MAX_HANDLE_CHARS);
    }

    #[test]
    fn test_multibyte_name_truncation_is_char_safe() {
        let req = sanitize(&json!({ "name": "é".repeat(60) })).unwrap();
        assert_eq!(req.content.display_name.chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        let err = sanitize(&json!({ "width": 3000 })).unwrap_err();
        assert!(matches!(err, AppError::DimensionsTooLarge));
        let err = sanitize(&json!({ "height": 2001 })).unwrap_err();
        assert!(matches!(err, AppError::DimensionsTooLarge));
    }

    #[test]
    fn test_boundary_dimensions_are_accepted() {
        let req = sanitize(&json!({ "width": 2000, "height": 2000 })).unwrap();
        assert_eq!(req.canvas.width, 2000);
        assert_eq!(req.canvas.height_override, Some(2000));
    }

    #[test]
    fn test_zero_dimensions_fall_back() {
        let req = sanitize(&json!({ "width": 0, "height": 0 })).unwrap();
        assert_eq!(req.canvas.width, DEFAULT_CANVAS_WIDTH);
        assert!(req.canvas.height_override.is_none());
    }

    #[test]
    fn test_non_numeric_dimensions_fall_back() {
        let req = sanitize(&json!({ "width": "wide", "height": true })).unwrap();
        assert_eq!(req.canvas.width, DEFAULT_CANVAS_WIDTH);
        assert!(req.canvas.height_override.is_none());
    }

    #[test]
    fn test_boolean_flags_ignore_invalid_types() {
        let req = sanitize(&json!({ "verified": "yes", "dark": 1 })).unwrap();
        assert!(!req.content.verified);
        assert!(!req.content.dark_theme);

        let req = sanitize(&json!({ "verified": true, "dark": true })).unwrap();
        assert!(req.content.verified);
        assert!(req.content.dark_theme);
    }

    #[test]
    fn test_empty_image_url_means_no_image() {
        let req = sanitize(&json!({ "image": "" })).unwrap();
        assert!(req.content.embedded_image_url.is_none());
        let req = sanitize(&json!({ "image": "https://example.com/a.png" })).unwrap();
        assert_eq!(
            req.content.embedded_image_url.as_deref(),
            Some("https://example.com/a.png")
        );
    }

    #[test]
    fn test_format_parsing() {
        let req = sanitize(&json!({ "format": "svg" })).unwrap();
        assert_eq!(req.format, OutputFormat::Svg);
        let req = sanitize(&json!({ "format": "bmp" })).unwrap();
        assert_eq!(req.format, OutputFormat::Png);
    }

    #[test]
    fn test_custom_timestamp_passes_through() {
        let req = sanitize(&json!({ "timestamp": "yesterday" })).unwrap();
        assert_eq!(req.content.timestamp_label, "yesterday");
    }
}
