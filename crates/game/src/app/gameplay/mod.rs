use tracing::info;

mod battle;
mod collision;
mod containers;
mod creature;
mod dialogue;
mod hud;
mod interaction;
mod inventory;
mod maps;
mod movement;
mod scenes;
mod session;
mod state_machine;
mod timers;

pub(crate) use maps::MapDataError;
pub(crate) use state_machine::SceneStateMachine;

use maps::MapCatalog;
use session::SessionState;

/// Logical view size every scene draws into.
pub(crate) const VIEW_WIDTH: f32 = 525.0;
pub(crate) const VIEW_HEIGHT: f32 = 450.0;

pub(crate) fn build_game(seed: Option<u64>, debug: bool) -> Result<SceneStateMachine, MapDataError> {
    let maps = MapCatalog::builtin()?;
    info!(
        laboratory_barriers = maps.laboratory.barriers.len(),
        town_barriers = maps.town.barriers.len(),
        grassland_barriers = maps.grassland.barriers.len(),
        "maps_loaded"
    );
    Ok(SceneStateMachine::new(maps, SessionState::new(seed, debug)))
}
