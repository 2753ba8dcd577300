mod camera;
mod frame;
mod game;
mod geometry;
mod input;
mod loop_runner;
mod metrics;
mod rendering;

pub use camera::{compute_view_origin, Camera2D, ViewSize};
pub use frame::{DrawCommand, DrawItem, RenderFrame, Rgba, ZOrder};
pub use game::Game;
pub use geometry::{Rect, Vec2};
pub use input::{Key, KeyEvent, KeyState};
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    text_width_px, wrap_text, RenderError, Renderer, GLYPH_ADVANCE_PX, LINE_HEIGHT_PX,
};
