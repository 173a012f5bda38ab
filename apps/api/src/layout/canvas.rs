//! Canvas height composition.
//!
//! Combines the line estimate and the optional embedded-image display height
//! into final canvas dimensions. An explicit caller height replaces the
//! computed value entirely — no blending, no validation against the computed
//! minimum.

use serde::Serialize;

use crate::probe::ImageProbeResult;

/// Fixed space for the avatar/name/handle/badge row.
pub const BASE_HEADER_HEIGHT: u32 = 180;
/// Vertical advance per estimated text line.
pub const LINE_HEIGHT: u32 = 40;
/// Fixed padding below the content.
pub const BASE_BUFFER: u32 = 32;
/// Extra breathing room per line once text exceeds `EXTRA_BUFFER_FREE_LINES`;
/// longer bodies accumulate more wrapping error.
pub const EXTRA_BUFFER_PER_LINE: u32 = 8;
pub const EXTRA_BUFFER_FREE_LINES: usize = 3;
/// Horizontal card padding on each side.
pub const CANVAS_PADDING: u32 = 24;
/// Vertical space reserved under an embedded image block.
pub const IMAGE_BLOCK_MARGIN: u32 = 24;
/// Display height used when the embedded image's aspect ratio is unknown.
pub const FALLBACK_IMAGE_HEIGHT: u32 = 400;
pub const MIN_IMAGE_HEIGHT: u32 = 200;
pub const MAX_IMAGE_HEIGHT: u32 = 800;

/// Final per-request canvas dimensions. Computed fresh for every request,
/// never cached.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    pub estimated_line_count: usize,
    /// Present only when an embedded image block will be rendered.
    pub image_display_height_px: Option<u32>,
    pub canvas_width_px: u32,
    pub canvas_height_px: u32,
}

/// Maps a probed aspect ratio to the embedded image's display height.
///
/// `round(available_width / aspect)` clamped to [200, 800], where the
/// available width is the canvas width minus the horizontal padding
/// (952 px at the default 1000 px canvas). An unknown aspect ratio falls
/// back to a fixed 400.
pub fn image_display_height(canvas_width: u32, probe: Option<&ImageProbeResult>) -> u32 {
    match probe {
        Some(probed) => {
            let available = canvas_width.saturating_sub(2 * CANVAS_PADDING) as f64;
            let height = (available / probed.aspect_ratio()).round() as u32;
            height.clamp(MIN_IMAGE_HEIGHT, MAX_IMAGE_HEIGHT)
        }
        None => FALLBACK_IMAGE_HEIGHT,
    }
}

/// Composes the final canvas dimensions.
///
/// `height = 180 + lines·40 + 32 + max(0, lines−3)·8 + image block`, where
/// the image block is `display height + 24` when an embedded image is
/// present. `height_override` passes through unclamped when supplied.
pub fn compose_layout(
    width: u32,
    height_override: Option<u32>,
    estimated_line_count: usize,
    image_display_height_px: Option<u32>,
) -> LayoutResult {
    let extra_lines = estimated_line_count.saturating_sub(EXTRA_BUFFER_FREE_LINES) as u32;
    let image_block = image_display_height_px
        .map(|h| h + IMAGE_BLOCK_MARGIN)
        .unwrap_or(0);

    let dynamic_height = BASE_HEADER_HEIGHT
        + estimated_line_count as u32 * LINE_HEIGHT
        + BASE_BUFFER
        + extra_lines * EXTRA_BUFFER_PER_LINE
        + image_block;

    LayoutResult {
        estimated_line_count,
        image_display_height_px,
        canvas_width_px: width,
        canvas_height_px: height_override.unwrap_or(dynamic_height),
    }
}
