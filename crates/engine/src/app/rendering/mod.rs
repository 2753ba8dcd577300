mod raster;
mod renderer;
mod text;

pub use renderer::{RenderError, Renderer};
pub use text::{text_width_px, wrap_text, GLYPH_ADVANCE_PX, LINE_HEIGHT_PX};
