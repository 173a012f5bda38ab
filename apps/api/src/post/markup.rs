//! SVG markup construction for the post card.
//!
//! Builds the declarative document the rasterizer consumes: header row
//! (avatar, name, badge, handle, platform glyph), wrapped body text, the
//! optional embedded-image block and the timestamp. Fetched avatar/image
//! bytes are embedded as base64 data URIs — the rasterizer resolves no
//! remote references.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::layout::canvas::{CANVAS_PADDING, LINE_HEIGHT};
use crate::layout::{wrap_lines, LayoutResult};
use crate::post::sanitize::PostContent;
use crate::probe::sniff_mime;

struct Theme {
    background: &'static str,
    border: &'static str,
    primary_text: &'static str,
    muted_text: &'static str,
    accent: &'static str,
}

const LIGHT: Theme = Theme {
    background: "#ffffff",
    border: "#e5e7eb",
    primary_text: "#111827",
    muted_text: "#6b7280",
    accent: "#3b82f6",
};

const DARK: Theme = Theme {
    background: "#15202b",
    border: "#38444d",
    primary_text: "#f7f9f9",
    muted_text: "#8b98a5",
    accent: "#3b82f6",
};

const AVATAR_SIZE: u32 = 96;
const HEADER_GAP: u32 = 16;
/// Vertical margin between header, content and image blocks.
const BLOCK_MARGIN: u32 = 16;
const NAME_FONT: u32 = 32;
const HANDLE_FONT: u32 = 28;
const BODY_FONT: u32 = 28;
const TIMESTAMP_FONT: u32 = 24;
/// Rough glyph advance per name character at the 32 px bold face (0.56 em).
/// Only positions the verified badge; good enough for a static card.
const NAME_CHAR_ADVANCE: u32 = 18;

const FONT_STACK: &str =
    "system-ui, -apple-system, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif";

/// Verified-badge check mark, 24-unit viewBox.
const VERIFIED_BADGE_PATH: &str = "M22.5 12.5c0-1.58-.875-2.95-2.148-3.6.154-.435.238-.905.238-1.4 0-2.21-1.71-3.998-3.818-3.998-.47 0-.92.084-1.336.25C14.818 2.415 13.51 1.5 12 1.5s-2.816.917-3.437 2.25c-.415-.165-.866-.25-1.336-.25-2.11 0-3.818 1.79-3.818 4 0 .494.083.964.237 1.4-1.272.65-2.147 2.018-2.147 3.6 0 1.495.782 2.798 1.942 3.486-.02.17-.032.34-.032.514 0 2.21 1.708 4 3.818 4 .47 0 .92-.086 1.335-.25.62 1.334 1.926 2.25 3.437 2.25 1.512 0 2.818-.916 3.437-2.25.415.163.865.248 1.336.248 2.11 0 3.818-1.79 3.818-4 0-.174-.012-.344-.033-.513 1.158-.687 1.943-1.99 1.943-3.484zm-6.616-3.334l-4.334 6.5c-.145.217-.382.334-.625.334-.143 0-.288-.04-.416-.126l-.115-.094-2.415-2.415c-.293-.293-.293-.768 0-1.06s.768-.294 1.06 0l1.77 1.767 3.825-5.74c.23-.345.696-.436 1.04-.207.346.23.44.696.21 1.04z";

/// Platform glyph shown at the card's top-right, 24-unit viewBox.
const PLATFORM_LOGO_PATH: &str = "M18.244 2.25h3.308l-7.227 8.26 8.502 11.24H16.17l-5.214-6.817L4.99 21.75H1.68l7.73-8.835L1.254 2.25H8.08l4.713 6.231zm-1.161 17.52h1.833L7.084 4.126H5.117z";

/// Builds the complete SVG document for one post card.
///
/// `avatar` and `embedded_image` carry the fetched bytes when available; a
/// missing avatar renders as a neutral circle, a missing embedded image (with
/// the block still reserved by the layout) as an empty framed box.
pub fn build_markup(
    content: &PostContent,
    layout: &LayoutResult,
    avatar: Option<&[u8]>,
    embedded_image: Option<&[u8]>,
) -> String {
    let theme = if content.dark_theme { &DARK } else { &LIGHT };
    let width = layout.canvas_width_px;
    let height = layout.canvas_height_px;
    let pad = CANVAS_PADDING;
    let content_width = width.saturating_sub(2 * pad);

    let lines = wrap_lines(&content.body_text);
    let content_top = pad + AVATAR_SIZE + BLOCK_MARGIN;
    let text_block = lines.len() as u32 * LINE_HEIGHT;
    let after_text = if lines.is_empty() {
        content_top
    } else {
        content_top + text_block + BLOCK_MARGIN
    };

    let avatar_center = pad + AVATAR_SIZE / 2;
    let text_x = pad + AVATAR_SIZE + HEADER_GAP;

    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{FONT_STACK}">"#
    ));

    // Clip paths for the circular avatar and the rounded image block.
    svg.push_str("<defs>");
    svg.push_str(&format!(
        r#"<clipPath id="avatar-clip"><circle cx="{avatar_center}" cy="{avatar_center}" r="{r}"/></clipPath>"#,
        r = AVATAR_SIZE / 2
    ));
    if let Some(image_height) = layout.image_display_height_px {
        svg.push_str(&format!(
            r#"<clipPath id="embed-clip"><rect x="{pad}" y="{after_text}" width="{content_width}" height="{image_height}" rx="12"/></clipPath>"#
        ));
    }
    svg.push_str("</defs>");

    // Card background and border.
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#,
        bg = theme.background
    ));
    svg.push_str(&format!(
        r#"<rect x="1" y="1" width="{w}" height="{h}" fill="none" stroke="{border}" stroke-width="2"/>"#,
        w = width.saturating_sub(2),
        h = height.saturating_sub(2),
        border = theme.border
    ));

    // Avatar: fetched bytes clipped to a circle, or a neutral placeholder.
    match avatar {
        Some(bytes) => {
            svg.push_str(&format!(
                r#"<image x="{pad}" y="{pad}" width="{AVATAR_SIZE}" height="{AVATAR_SIZE}" clip-path="url(#avatar-clip)" preserveAspectRatio="xMidYMid slice" href="{uri}"/>"#,
                uri = data_uri(bytes)
            ));
        }
        None => {
            svg.push_str(&format!(
                r#"<circle cx="{avatar_center}" cy="{avatar_center}" r="{r}" fill="{fill}"/>"#,
                r = AVATAR_SIZE / 2,
                fill = theme.border
            ));
        }
    }
    svg.push_str(&format!(
        r#"<circle cx="{avatar_center}" cy="{avatar_center}" r="{r}" fill="none" stroke="{border}" stroke-width="2"/>"#,
        r = AVATAR_SIZE / 2,
        border = theme.border
    ));

    // Name row with optional verified badge, handle beneath.
    svg.push_str(&format!(
        r#"<text x="{text_x}" y="{y}" font-size="{NAME_FONT}" font-weight="700" fill="{fill}">{name}</text>"#,
        y = pad + 36,
        fill = theme.primary_text,
        name = escape_xml(&content.display_name)
    ));
    if content.verified {
        let badge_x = text_x + content.display_name.chars().count() as u32 * NAME_CHAR_ADVANCE + 8;
        svg.push_str(&format!(
            r#"<g transform="translate({badge_x},{y}) scale(1.3333)" fill="{fill}"><path d="{VERIFIED_BADGE_PATH}"/></g>"#,
            y = pad + 10,
            fill = theme.accent
        ));
    }
    svg.push_str(&format!(
        r#"<text x="{text_x}" y="{y}" font-size="{HANDLE_FONT}" fill="{fill}">{handle}</text>"#,
        y = pad + 74,
        fill = theme.muted_text,
        handle = escape_xml(&content.handle)
    ));

    // Platform glyph, top-right.
    svg.push_str(&format!(
        r#"<g transform="translate({x},{pad}) scale(1.6667)" fill="{fill}"><path d="{PLATFORM_LOGO_PATH}"/></g>"#,
        x = width.saturating_sub(pad + 40),
        fill = theme.accent
    ));

    // Body text, one element per wrapped line; blank text renders nothing.
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        svg.push_str(&format!(
            r#"<text x="{pad}" y="{y}" font-size="{BODY_FONT}" fill="{fill}">{text}</text>"#,
            y = content_top + BODY_FONT + i as u32 * LINE_HEIGHT,
            fill = theme.primary_text,
            text = escape_xml(line)
        ));
    }

    // Embedded image block at the probed (or fallback) display height.
    let mut block_end = after_text;
    if let Some(image_height) = layout.image_display_height_px {
        if let Some(bytes) = embedded_image {
            svg.push_str(&format!(
                r#"<image x="{pad}" y="{after_text}" width="{content_width}" height="{image_height}" clip-path="url(#embed-clip)" preserveAspectRatio="xMidYMid slice" href="{uri}"/>"#,
                uri = data_uri(bytes)
            ));
        }
        svg.push_str(&format!(
            r#"<rect x="{pad}" y="{after_text}" width="{content_width}" height="{image_height}" rx="12" fill="none" stroke="{border}" stroke-width="2"/>"#,
            border = theme.border
        ));
        block_end = after_text + image_height + BLOCK_MARGIN;
    }

    // Timestamp.
    svg.push_str(&format!(
        r#"<text x="{pad}" y="{y}" font-size="{TIMESTAMP_FONT}" fill="{fill}">{label}</text>"#,
        y = block_end + TIMESTAMP_FONT,
        fill = theme.muted_text,
        label = escape_xml(&content.timestamp_label)
    ));

    svg.push_str("</svg>");
    svg
}

fn data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_mime(bytes), BASE64.encode(bytes))
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
