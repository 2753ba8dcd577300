use std::fmt;
use std::time::Duration;

use engine::{Camera2D, KeyEvent, RenderFrame, ViewSize};
use serde::Deserialize;

use super::collision::CollisionModel;
use super::dialogue::{DialogueController, DialogueEvent};
use super::hud;
use super::interaction::{passive_trigger, InteractionResult};
use super::maps::{MapCatalog, MapDefinition};
use super::movement::{advance_step, Direction, MovementController, StepOutcome, StepRequest};
use super::session::SessionState;
use super::timers::RepeatTimer;
use super::{VIEW_HEIGHT, VIEW_WIDTH};

mod grassland;
mod laboratory;
mod title;
mod town;

pub(crate) use grassland::GrasslandScene;
#[cfg(test)]
pub(crate) use grassland::WildCreature;
pub(crate) use laboratory::LaboratoryScene;
pub(crate) use title::TitleScene;
pub(crate) use town::TownScene;

pub(crate) const SCENE_TICK: Duration = Duration::from_millis(16);
pub(crate) const NO_PARTY_TEXT: &str = "You don't have any Pokémon yet!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SceneId {
    Title,
    Laboratory,
    Town,
    Grassland,
}

impl SceneId {
    pub(crate) fn name(self) -> &'static str {
        match self {
            SceneId::Title => "title",
            SceneId::Laboratory => "laboratory",
            SceneId::Town => "town",
            SceneId::Grassland => "grassland",
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SceneCommand {
    None,
    ChangeScene(SceneId),
}

/// Closed set of scenes dispatched by the state machine.
#[derive(Debug)]
pub(crate) enum Scene {
    Title(TitleScene),
    Laboratory(LaboratoryScene),
    Town(TownScene),
    Grassland(GrasslandScene),
}

impl Scene {
    pub(crate) fn build(id: SceneId, maps: &MapCatalog, session: &SessionState) -> Self {
        let debug = session.debug_default;
        match id {
            SceneId::Title => Scene::Title(TitleScene::new(debug)),
            SceneId::Laboratory => {
                Scene::Laboratory(LaboratoryScene::new(maps.laboratory.clone(), debug))
            }
            SceneId::Town => Scene::Town(TownScene::new(maps.town.clone(), debug)),
            SceneId::Grassland => {
                Scene::Grassland(GrasslandScene::new(maps.grassland.clone(), debug))
            }
        }
    }

    pub(crate) fn id(&self) -> SceneId {
        match self {
            Scene::Title(_) => SceneId::Title,
            Scene::Laboratory(_) => SceneId::Laboratory,
            Scene::Town(_) => SceneId::Town,
            Scene::Grassland(_) => SceneId::Grassland,
        }
    }

    pub(crate) fn initialize(&mut self, session: &mut SessionState, arrival: Option<SceneId>) {
        match self {
            Scene::Title(scene) => scene.initialize(),
            Scene::Laboratory(scene) => scene.initialize(session, arrival),
            Scene::Town(scene) => scene.initialize(session, arrival),
            Scene::Grassland(scene) => scene.initialize(session, arrival),
        }
    }

    pub(crate) fn handle_key(&mut self, event: KeyEvent, session: &mut SessionState) -> SceneCommand {
        match self {
            Scene::Title(scene) => scene.handle_key(event),
            Scene::Laboratory(scene) => scene.handle_key(event, session),
            Scene::Town(scene) => scene.handle_key(event, session),
            Scene::Grassland(scene) => scene.handle_key(event, session),
        }
    }

    pub(crate) fn update(&mut self, dt: Duration, session: &mut SessionState) -> SceneCommand {
        match self {
            Scene::Title(scene) => scene.update(dt),
            Scene::Laboratory(scene) => scene.update(dt, session),
            Scene::Town(scene) => scene.update(dt, session),
            Scene::Grassland(scene) => scene.update(dt, session),
        }
    }

    pub(crate) fn cleanup(&mut self, session: &mut SessionState) {
        match self {
            Scene::Title(scene) => scene.cleanup(),
            Scene::Laboratory(scene) => scene.world.cleanup(session),
            Scene::Town(scene) => scene.world.cleanup(session),
            Scene::Grassland(scene) => scene.cleanup(session),
        }
    }

    pub(crate) fn render(&self, session: &SessionState, frame: &mut RenderFrame) {
        match self {
            Scene::Title(scene) => scene.render(frame),
            Scene::Laboratory(scene) => scene.render(session, frame),
            Scene::Town(scene) => scene.render(session, frame),
            Scene::Grassland(scene) => scene.render(session, frame),
        }
    }

    /// Returns the new debug flag.
    pub(crate) fn toggle_debug(&mut self) -> bool {
        let debug = match self {
            Scene::Title(scene) => &mut scene.debug,
            Scene::Laboratory(scene) => &mut scene.world.debug,
            Scene::Town(scene) => &mut scene.world.debug,
            Scene::Grassland(scene) => &mut scene.world.debug,
        };
        *debug = !*debug;
        *debug
    }
}

/// What an overworld scene should do with a key after the shared handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OverworldInput {
    Consumed,
    Stepped(StepOutcome),
    Dialogue(DialogueEvent),
    Interact,
    Ignored,
}

/// State shared by the three map scenes: geometry, held keys, camera and
/// the dialogue and bag overlays.
#[derive(Debug)]
pub(crate) struct Overworld {
    pub(crate) map: MapDefinition,
    pub(crate) collision: CollisionModel,
    pub(crate) movement: MovementController,
    pub(crate) dialogue: DialogueController,
    pub(crate) bag_open: bool,
    pub(crate) camera: Camera2D,
    pub(crate) debug: bool,
    scene_tick: RepeatTimer,
}

impl Overworld {
    pub(crate) fn new(map: MapDefinition, debug: bool) -> Self {
        let collision = CollisionModel::new(map.barriers.clone(), map.ledges.clone());
        let movement = MovementController::new(map.movement);
        Self {
            map,
            collision,
            movement,
            dialogue: DialogueController::default(),
            bag_open: false,
            camera: Camera2D::default(),
            debug,
            scene_tick: RepeatTimer::new(SCENE_TICK),
        }
    }

    pub(crate) fn enter(&mut self, session: &mut SessionState, arrival: Option<SceneId>) {
        session.player.position = self.map.spawn_for(arrival);
        session.player.stand_still();
        self.movement.reset();
        self.follow_player(session);
        self.scene_tick.start();
    }

    pub(crate) fn cleanup(&mut self, session: &mut SessionState) {
        self.movement.reset();
        self.dialogue.close();
        self.bag_open = false;
        self.scene_tick.stop();
        session.player.stand_still();
    }

    pub(crate) fn is_suspended(&self) -> bool {
        self.dialogue.is_open() || self.bag_open
    }

    pub(crate) fn follow_player(&mut self, session: &SessionState) {
        self.camera.follow(
            session.player.center(),
            ViewSize::new(VIEW_WIDTH, VIEW_HEIGHT),
            self.map.view_size(),
        );
    }

    pub(crate) fn step(&mut self, session: &mut SessionState, request: StepRequest) -> StepOutcome {
        let outcome = advance_step(
            &mut session.player,
            request,
            &self.collision,
            self.map.walk_bounds,
        );
        if outcome == StepOutcome::Moved {
            self.follow_player(session);
        }
        outcome
    }

    /// Shared key handling. `blocked` suspends movement and interaction on
    /// top of the overlays, for an active battle.
    pub(crate) fn handle_key(
        &mut self,
        event: KeyEvent,
        session: &mut SessionState,
        blocked: bool,
    ) -> OverworldInput {
        let direction = Direction::from_key(event.key);
        if !event.is_press() {
            if let Some(direction) = direction {
                self.movement.key_up(direction);
                if !self.movement.is_moving() {
                    session.player.stand_still();
                }
            }
            return OverworldInput::Consumed;
        }
        if blocked {
            return OverworldInput::Ignored;
        }
        if self.bag_open {
            if event.key == engine::Key::B {
                self.bag_open = false;
            }
            return OverworldInput::Consumed;
        }
        if self.dialogue.is_open() {
            return OverworldInput::Dialogue(self.dialogue.handle_key(event.key));
        }
        if let Some(direction) = direction {
            let request = self.movement.key_down(direction);
            let outcome = self.step(session, request);
            self.movement.record(outcome);
            return OverworldInput::Stepped(outcome);
        }
        match event.key {
            engine::Key::B => {
                if session.has_party() {
                    self.bag_open = true;
                } else {
                    self.dialogue.open_line(NO_PARTY_TEXT);
                }
                OverworldInput::Consumed
            }
            key if key.is_confirm() => OverworldInput::Interact,
            _ => OverworldInput::Ignored,
        }
    }

    /// Runs due repeat steps and scene ticks. `check_triggers` runs after each
    /// committed step and on each scene tick; the first command other than
    /// `None` stops the update.
    pub(crate) fn update(
        &mut self,
        dt: Duration,
        session: &mut SessionState,
        blocked: bool,
        mut check_triggers: impl FnMut(&mut Self, &mut SessionState) -> SceneCommand,
    ) -> SceneCommand {
        if blocked || self.is_suspended() {
            self.movement.suspend();
            return SceneCommand::None;
        }

        let due = self.movement.tick(dt);
        for _ in 0..due {
            let Some(request) = self.movement.next_repeat_step() else {
                break;
            };
            let outcome = self.step(session, request);
            self.movement.record(outcome);
            if outcome == StepOutcome::Moved {
                let command = check_triggers(self, session);
                if command != SceneCommand::None {
                    return command;
                }
            }
        }

        for _ in 0..self.scene_tick.tick(dt) {
            let command = check_triggers(self, session);
            if command != SceneCommand::None {
                return command;
            }
        }
        SceneCommand::None
    }

    /// Portal check shared by every map scene.
    pub(crate) fn portal_command(&self, session: &SessionState) -> SceneCommand {
        match passive_trigger(&session.player, &self.map) {
            InteractionResult::ChangeScene(target) => SceneCommand::ChangeScene(target),
            _ => SceneCommand::None,
        }
    }

    pub(crate) fn render_map(&self, frame: &mut RenderFrame) {
        hud::draw_map(frame, &self.camera, &self.map);
    }

    pub(crate) fn render_overlays(&self, session: &SessionState, frame: &mut RenderFrame) {
        hud::draw_player(frame, &self.camera, &session.player);
        if self.debug {
            hud::draw_debug(frame, &self.camera, &self.map, &session.player);
        }
        if let Some(text) = self.dialogue.current_text() {
            hud::draw_dialogue(frame, text);
        }
        if self.bag_open {
            hud::draw_bag(frame, session);
        }
    }
}
