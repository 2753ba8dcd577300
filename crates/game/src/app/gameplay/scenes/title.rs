use std::time::Duration;

use engine::{KeyEvent, RenderFrame};

use super::super::hud;
use super::super::timers::RepeatTimer;
use super::{SceneCommand, SceneId};

const BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub(crate) struct TitleScene {
    blink: RepeatTimer,
    prompt_visible: bool,
    pub(crate) debug: bool,
}

impl TitleScene {
    pub(crate) fn new(debug: bool) -> Self {
        Self {
            blink: RepeatTimer::new(BLINK_INTERVAL),
            prompt_visible: true,
            debug,
        }
    }

    pub(crate) fn initialize(&mut self) {
        self.prompt_visible = true;
        self.blink.start();
    }

    pub(crate) fn handle_key(&mut self, event: KeyEvent) -> SceneCommand {
        if event.is_press() && event.key.is_confirm() {
            SceneCommand::ChangeScene(SceneId::Laboratory)
        } else {
            SceneCommand::None
        }
    }

    pub(crate) fn update(&mut self, dt: Duration) -> SceneCommand {
        if self.blink.tick(dt) % 2 == 1 {
            self.prompt_visible = !self.prompt_visible;
        }
        SceneCommand::None
    }

    pub(crate) fn cleanup(&mut self) {
        self.blink.stop();
    }

    pub(crate) fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    pub(crate) fn render(&self, frame: &mut RenderFrame) {
        hud::draw_title(frame, self.prompt_visible());
    }
}
