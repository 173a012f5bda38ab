use std::sync::Arc;

use crate::render::ImageRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Requests are stateless; these are the only cross-request values and both
/// are immutable.
#[derive(Clone)]
pub struct AppState {
    /// Shared HTTP client for best-effort avatar and embedded-image fetches.
    pub http: reqwest::Client,
    /// Pluggable rasterizer. Default: resvg-backed `SvgRasterizer`; tests
    /// swap in a stub so no fonts or pixmaps are involved.
    pub renderer: Arc<dyn ImageRenderer>,
}
