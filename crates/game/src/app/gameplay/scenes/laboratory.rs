use std::time::Duration;

use engine::{KeyEvent, Rect, RenderFrame, ZOrder, LINE_HEIGHT_PX};
use tracing::info;

use super::super::dialogue::DialogueEvent;
use super::super::hud::world_rect;
use super::super::interaction::{try_interact, InteractionResult};
use super::super::maps::MapDefinition;
use super::super::movement::StepOutcome;
use super::super::session::SessionState;
use super::{Overworld, OverworldInput, SceneCommand, SceneId};

pub(crate) const ALREADY_CHOSEN_TEXT: &str = "You have already chosen your starter Pokémon.";
const BALL_SIZE: f32 = 20.0;
const BALL_SPRITE: &str = "items/pokeball";
const BALL_FALLBACK: [u8; 4] = [224, 48, 48, 255];
const BALL_LABEL: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug)]
pub(crate) struct LaboratoryScene {
    pub(crate) world: Overworld,
    /// Table slot emptied by the starter pick.
    taken_ball: Option<usize>,
}

impl LaboratoryScene {
    pub(crate) fn new(map: MapDefinition, debug: bool) -> Self {
        Self {
            world: Overworld::new(map, debug),
            taken_ball: None,
        }
    }

    pub(crate) fn initialize(&mut self, session: &mut SessionState, arrival: Option<SceneId>) {
        session.starter_options();
        self.world.enter(session, arrival);
    }

    pub(crate) fn handle_key(&mut self, event: KeyEvent, session: &mut SessionState) -> SceneCommand {
        match self.world.handle_key(event, session, false) {
            OverworldInput::Stepped(StepOutcome::Moved) => self.world.portal_command(session),
            OverworldInput::Dialogue(DialogueEvent::StarterChosen(index)) => {
                self.choose_starter(index, session);
                SceneCommand::None
            }
            OverworldInput::Interact => {
                self.interact(session);
                SceneCommand::None
            }
            _ => SceneCommand::None,
        }
    }

    pub(crate) fn update(&mut self, dt: Duration, session: &mut SessionState) -> SceneCommand {
        self.world
            .update(dt, session, false, |world, session| world.portal_command(session))
    }

    fn interact(&mut self, session: &mut SessionState) {
        match try_interact(&session.player, &self.world.map, &mut []) {
            InteractionResult::OpenDialogue(lines) => self.world.dialogue.open(lines),
            InteractionResult::StartStarterSelection if session.starter_chosen => {
                self.world.dialogue.open_line(ALREADY_CHOSEN_TEXT);
            }
            InteractionResult::StartStarterSelection => {
                let options = session.starter_options();
                let prompt = format!(
                    "Choose your Pokemon: Press 1 for {}, 2 for {}, or 3 for {}.",
                    options[0].name(),
                    options[1].name(),
                    options[2].name()
                );
                self.world
                    .dialogue
                    .open_starter_selection(prompt, options.len());
            }
            _ => {}
        }
    }

    fn choose_starter(&mut self, index: usize, session: &mut SessionState) {
        let Some(starter) = session.choose_starter(index) else {
            self.world.dialogue.open_line(ALREADY_CHOSEN_TEXT);
            return;
        };
        let name = starter.name.clone();
        info!(species = %name, index, "starter_chosen");
        self.taken_ball = Some(index);
        self.world
            .dialogue
            .open_line(format!("You chose {name} as your partner!"));
    }

    pub(crate) fn render(&self, session: &SessionState, frame: &mut RenderFrame) {
        self.world.render_map(frame);
        let selecting = self.world.dialogue.is_selecting_starter();
        if let Some(table) = &self.world.map.starter_table {
            for (index, ball) in table.balls.iter().enumerate() {
                if self.taken_ball == Some(index) {
                    continue;
                }
                let rect = world_rect(
                    &self.world.camera,
                    Rect::new(ball.x, ball.y, BALL_SIZE, BALL_SIZE),
                );
                frame.sprite(ZOrder::PROPS, BALL_SPRITE, rect, BALL_FALLBACK);
                if selecting {
                    frame.text(
                        ZOrder::OVERLAY_TEXT,
                        rect.x + 6.0,
                        rect.y - LINE_HEIGHT_PX as f32,
                        (index + 1).to_string(),
                        BALL_LABEL,
                    );
                }
            }
        }
        self.world.render_overlays(session, frame);
    }
}
