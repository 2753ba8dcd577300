use std::collections::HashMap;
use std::time::Duration;

use engine::{Game, KeyEvent, RenderFrame};
use tracing::{info, warn};

use super::maps::MapCatalog;
use super::scenes::{Scene, SceneCommand, SceneId};
use super::session::SessionState;

const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

fn is_allowed_transition(from: SceneId, to: SceneId) -> bool {
    matches!(
        (from, to),
        (SceneId::Title, SceneId::Laboratory)
            | (SceneId::Laboratory, SceneId::Town)
            | (SceneId::Town, SceneId::Laboratory)
            | (SceneId::Town, SceneId::Grassland)
            | (SceneId::Grassland, SceneId::Town)
    )
}

/// Top-level game: owns the session and every visited scene, routes input to
/// the active one and applies the scene transitions it requests.
#[derive(Debug)]
pub(crate) struct SceneStateMachine {
    maps: MapCatalog,
    session: SessionState,
    scenes: HashMap<SceneId, Scene>,
    current: SceneId,
}

impl SceneStateMachine {
    pub(crate) fn new(maps: MapCatalog, mut session: SessionState) -> Self {
        let mut title = Scene::build(SceneId::Title, &maps, &session);
        title.initialize(&mut session, None);
        let mut scenes = HashMap::new();
        scenes.insert(SceneId::Title, title);
        Self {
            maps,
            session,
            scenes,
            current: SceneId::Title,
        }
    }

    pub(crate) fn current(&self) -> SceneId {
        self.current
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &SessionState {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    #[cfg(test)]
    pub(crate) fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(&id)
    }

    #[cfg(test)]
    pub(crate) fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(&id)
    }

    /// Switches scenes when the transition table allows it. Returns whether
    /// the switch happened.
    pub(crate) fn change_scene(&mut self, target: SceneId) -> bool {
        let from = self.current;
        if !is_allowed_transition(from, target) {
            warn!(from = %from, to = %target, "scene_change_ignored");
            return false;
        }

        if let Some(outgoing) = self.scenes.get_mut(&from) {
            outgoing.cleanup(&mut self.session);
        }
        let maps = &self.maps;
        let session = &mut self.session;
        let incoming = self
            .scenes
            .entry(target)
            .or_insert_with(|| Scene::build(target, maps, session));
        incoming.initialize(session, Some(from));
        self.current = target;

        info!(from = %from, to = %target, "scene_changed");
        true
    }

    fn apply(&mut self, command: SceneCommand) {
        if let SceneCommand::ChangeScene(target) = command {
            self.change_scene(target);
        }
    }
}

impl Game for SceneStateMachine {
    fn handle_key(&mut self, event: KeyEvent) {
        let Some(scene) = self.scenes.get_mut(&self.current) else {
            return;
        };
        let command = scene.handle_key(event, &mut self.session);
        self.apply(command);
    }

    fn update(&mut self, fixed_dt: Duration) {
        let Some(scene) = self.scenes.get_mut(&self.current) else {
            return;
        };
        let command = scene.update(fixed_dt, &mut self.session);
        self.apply(command);
    }

    fn render(&self, frame: &mut RenderFrame) {
        frame.set_clear_color(CLEAR_COLOR);
        if let Some(scene) = self.scenes.get(&self.current) {
            scene.render(&self.session, frame);
        }
    }

    fn toggle_debug(&mut self) {
        if let Some(scene) = self.scenes.get_mut(&self.current) {
            let enabled = scene.toggle_debug();
            info!(scene = %scene.id(), enabled, "debug_toggled");
        }
    }

    fn window_title(&self) -> Option<String> {
        Some(format!("Pallet - {}", self.current()))
    }

    fn shutdown(&mut self) {
        if let Some(scene) = self.scenes.get_mut(&self.current) {
            scene.cleanup(&mut self.session);
        }
        info!(
            scene = %self.current,
            party = self.session.party.len(),
            items = self.session.inventory.total(),
            "session_summary"
        );
    }
}
