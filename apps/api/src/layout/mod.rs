// Canvas sizing heuristics: line-wrap estimation and height composition.
// Pure functions, no I/O — real glyph shaping happens in the rasterizer,
// these only size the canvas ahead of time.

pub mod canvas;
pub mod line_wrap;

// Re-export the public API consumed by other modules (handlers, markup).
pub use canvas::{compose_layout, image_display_height, LayoutResult};
pub use line_wrap::{estimate_lines, wrap_lines};
