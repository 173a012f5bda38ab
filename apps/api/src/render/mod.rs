//! Rasterization boundary.
//!
//! Everything upstream hands a finished SVG document plus exact pixel
//! dimensions across the `ImageRenderer` trait; handlers never touch resvg
//! directly, and tests swap in a stub. Rasterization is the only CPU-bound
//! step in the service and must run inside `tokio::task::spawn_blocking`.

use resvg::{tiny_skia, usvg};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("could not allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("PNG encode error: {0}")]
    Encode(String),
}

/// Renders a markup tree at the given canvas size into encoded PNG bytes.
pub trait ImageRenderer: Send + Sync {
    fn render(&self, svg: &str, width: u32, height: u32) -> Result<Vec<u8>, RenderError>;
}

/// resvg-backed renderer. Loads system fonts once at construction and is
/// shared across requests behind an `Arc`.
pub struct SvgRasterizer {
    options: usvg::Options<'static>,
}

impl SvgRasterizer {
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        Self { options }
    }

    pub fn font_count(&self) -> usize {
        self.options.fontdb.faces().count()
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageRenderer for SvgRasterizer {
    fn render(&self, svg: &str, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| RenderError::Parse(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or(RenderError::Pixmap { width, height })?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 4] = [0x89, b'P', b'N', b'G'];

    #[test]
    fn test_renders_simple_document_to_png() {
        let rasterizer = SvgRasterizer::new();
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><rect width="8" height="8" fill="#ff0000"/></svg>"##;
        let png = rasterizer.render(svg, 8, 8).unwrap();
        assert!(png.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_invalid_svg_is_a_parse_error() {
        let rasterizer = SvgRasterizer::new();
        let err = rasterizer.render("not an svg document", 8, 8).unwrap_err();
        assert!(matches!(err, RenderError::Parse(_)));
    }

    #[test]
    fn test_zero_size_pixmap_is_rejected() {
        let rasterizer = SvgRasterizer::new();
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"/>"#;
        let err = rasterizer.render(svg, 0, 8).unwrap_err();
        assert!(matches!(err, RenderError::Pixmap { .. }));
    }
}
