use std::time::Duration;

use engine::{KeyEvent, RenderFrame, ZOrder};
use tracing::info;

use super::super::containers::{generate_boxes, ContainerBox};
use super::super::hud::world_rect;
use super::super::interaction::{try_interact, InteractionResult};
use super::super::maps::MapDefinition;
use super::super::movement::StepOutcome;
use super::super::session::SessionState;
use super::{Overworld, OverworldInput, SceneCommand, SceneId};

const BOX_SPRITE: &str = "props/box";
const OPENED_BOX_SPRITE: &str = "props/box_open";
const BOX_FALLBACK: [u8; 4] = [176, 120, 64, 255];

#[derive(Debug)]
pub(crate) struct TownScene {
    pub(crate) world: Overworld,
}

impl TownScene {
    pub(crate) fn new(map: MapDefinition, debug: bool) -> Self {
        Self {
            world: Overworld::new(map, debug),
        }
    }

    pub(crate) fn initialize(&mut self, session: &mut SessionState, arrival: Option<SceneId>) {
        let map = &self.world.map;
        let blockers = map
            .barriers
            .iter()
            .copied()
            .chain(map.interactables.iter().map(|interactable| interactable.rect))
            .chain(map.portals.iter().map(|portal| portal.rect))
            .collect::<Vec<_>>();
        let (width, height) = (map.size.width, map.size.height);
        session.town_boxes_or_insert_with(|rng| {
            let boxes = generate_boxes(rng, width, height, &blockers);
            info!(count = boxes.len(), "town_boxes_generated");
            boxes
        });
        self.world.enter(session, arrival);
    }

    pub(crate) fn handle_key(&mut self, event: KeyEvent, session: &mut SessionState) -> SceneCommand {
        match self.world.handle_key(event, session, false) {
            OverworldInput::Stepped(StepOutcome::Moved) => self.world.portal_command(session),
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
        let boxes: &mut [ContainerBox] = session.town_boxes.as_deref_mut().unwrap_or_default();
        match try_interact(&session.player, &self.world.map, boxes) {
            InteractionResult::OpenDialogue(lines) => self.world.dialogue.open(lines),
            InteractionResult::GrantItem { item, quantity } => {
                session.inventory.add(item, quantity);
                info!(item = %item, count = session.inventory.count(item), "box_opened");
                self.world.dialogue.open_line(format!("You got {item}!"));
            }
            _ => {}
        }
    }

    pub(crate) fn render(&self, session: &SessionState, frame: &mut RenderFrame) {
        self.world.render_map(frame);
        for container in session.town_boxes.iter().flatten() {
            let sprite = if container.is_opened() {
                OPENED_BOX_SPRITE
            } else {
                BOX_SPRITE
            };
            frame.sprite(
                ZOrder::PROPS,
                sprite,
                world_rect(&self.world.camera, container.rect()),
                BOX_FALLBACK,
            );
        }
        self.world.render_overlays(session, frame);
    }
}
