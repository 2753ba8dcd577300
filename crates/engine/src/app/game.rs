use std::time::Duration;

use super::{KeyEvent, RenderFrame};

/// The contract between the host loop and a game.
///
/// The host delivers filtered key events as they arrive, advances the
/// simulation in fixed steps, and asks for a draw list once per presented
/// frame.
pub trait Game {
    fn handle_key(&mut self, event: KeyEvent);

    fn update(&mut self, fixed_dt: Duration);

    fn render(&self, frame: &mut RenderFrame);

    /// Host-level debug switch (F3).
    fn toggle_debug(&mut self) {}

    /// Window title override, re-applied only when it changes.
    fn window_title(&self) -> Option<String> {
        None
    }

    fn shutdown(&mut self) {}
}
