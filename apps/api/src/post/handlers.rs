use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::AppError;
use crate::layout::{compose_layout, estimate_lines, image_display_height};
use crate::post::markup::build_markup;
use crate::post::sanitize::sanitize;
use crate::probe::{fetch_image, sniff_dimensions};
use crate::state::AppState;

const CACHE_CONTROL_VALUE: &str = "public, max-age=3600, s-maxage=86400";

/// POST /render
///
/// Renders the post card described by the JSON body and returns PNG bytes.
/// A malformed body degrades to an empty object (all defaults) rather than
/// failing; only oversized dimensions or invalid body text reject the
/// request.
pub async fn render_post(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let raw = parse_lenient(&body);
    let request = sanitize(&raw)?;

    // Probe the embedded image before layout. The bytes are kept for the
    // markup builder; a failed fetch or unrecognized header falls back to
    // the fixed display height.
    let image_bytes = match &request.content.embedded_image_url {
        Some(url) => fetch_image(&state.http, url).await,
        None => None,
    };
    let probe = image_bytes.as_deref().and_then(sniff_dimensions);
    if let Some(probed) = &probe {
        debug!(
            "embedded image probed at {}x{}",
            probed.width_px, probed.height_px
        );
    }

    let avatar_bytes = fetch_image(&state.http, &request.content.avatar_url).await;

    let image_height = request
        .content
        .embedded_image_url
        .as_ref()
        .map(|_| image_display_height(request.canvas.width, probe.as_ref()));
    let layout = compose_layout(
        request.canvas.width,
        request.canvas.height_override,
        estimate_lines(&request.content.body_text),
        image_height,
    );

    let svg = build_markup(
        &request.content,
        &layout,
        avatar_bytes.as_deref(),
        image_bytes.as_deref(),
    );

    // Rasterization is CPU-bound; keep it off the async workers.
    let renderer = state.renderer.clone();
    let (width, height) = (layout.canvas_width_px, layout.canvas_height_px);
    let png = tokio::task::spawn_blocking(move || renderer.render(&svg, width, height))
        .await
        .map_err(|e| AppError::Render(anyhow!("render task panicked: {e}")))?
        .map_err(|e| AppError::Render(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, CACHE_CONTROL_VALUE),
        ],
        png,
    )
        .into_response())
}

/// Parses the request body, substituting an empty object for malformed JSON
/// so a broken payload renders the all-defaults card instead of failing.
fn parse_lenient(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| json!({}))
}

/// GET /render
/// Static usage document for the render endpoint; no business logic.
pub async fn render_usage() -> Json<Value> {
    Json(json!({
        "message": "Post image generator API",
        "usage": "POST to this endpoint with JSON data",
        "fields": {
            "name": "string (max 50 chars)",
            "handle": "string (max 20 chars)",
            "avatar": "string (image URL)",
            "text": "string (max 800 chars)",
            "timestamp": "string",
            "width": "number (max 2000)",
            "height": "number (max 2000)",
            "format": "string (png or svg)",
            "verified": "boolean (show verified badge)",
            "image": "string (image URL, optional)",
            "dark": "boolean (dark theme)"
        }
    }))
}
