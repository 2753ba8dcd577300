use std::time::Duration;

use engine::{KeyEvent, Rect, RenderFrame, ZOrder};
use rand::Rng;
use tracing::info;

use super::super::battle::{BattleOutcome, BattleSession};
use super::super::collision::feet_rect;
use super::super::creature::{Creature, Species};
use super::super::hud::{self, world_rect};
use super::super::interaction::{try_interact, wild_contact, InteractionResult};
use super::super::maps::MapDefinition;
use super::super::movement::StepOutcome;
use super::super::session::SessionState;
use super::{Overworld, OverworldInput, SceneCommand, SceneId, NO_PARTY_TEXT};

pub(crate) const WILDS_PER_ZONE: usize = 2;
pub(crate) const WILD_SIZE: f32 = 40.0;
pub(crate) const PARTY_FAINTED_TEXT: &str = "Your Pokémon are too weak to battle!";
const GRASS_SPRITE: &str = "props/tall_grass";
const GRASS_FALLBACK: [u8; 4] = [56, 136, 56, 255];

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WildCreature {
    pub(crate) species: Species,
    pub(crate) rect: Rect,
    pub(crate) encountered: bool,
}

/// Wild creatures, per-zone spawn flags and the running battle.
#[derive(Debug, Default)]
pub(crate) struct Encounters {
    pub(crate) wilds: Vec<WildCreature>,
    zones_spawned: Vec<bool>,
    pub(crate) battle: Option<BattleSession>,
}

impl Encounters {
    fn check_triggers(&mut self, world: &mut Overworld, session: &mut SessionState) -> SceneCommand {
        let command = world.portal_command(session);
        if command != SceneCommand::None {
            return command;
        }
        let feet = feet_rect(session.player.position);
        self.spawn_in_entered_zones(&world.map, &feet, session);

        if self.battle.is_some() {
            return SceneCommand::None;
        }
        let hitboxes = self
            .wilds
            .iter()
            .enumerate()
            .filter(|(_, wild)| !wild.encountered)
            .map(|(index, wild)| (index, wild.rect));
        if let InteractionResult::StartBattle(index) = wild_contact(&session.player, hitboxes) {
            self.encounter(index, world, session);
        }
        SceneCommand::None
    }

    fn spawn_in_entered_zones(&mut self, map: &MapDefinition, feet: &Rect, session: &mut SessionState) {
        self.zones_spawned.resize(map.grass_zones.len(), false);
        for (zone, spawned) in map.grass_zones.iter().zip(self.zones_spawned.iter_mut()) {
            if *spawned || !feet.intersects(zone) {
                continue;
            }
            *spawned = true;
            for _ in 0..WILDS_PER_ZONE {
                let wild = spawn_wild(&mut session.rng, zone);
                info!(species = wild.species.name(), x = wild.rect.x, y = wild.rect.y, "wild_spawned");
                self.wilds.push(wild);
            }
        }
    }

    fn encounter(&mut self, index: usize, world: &mut Overworld, session: &mut SessionState) {
        let Some(wild) = self.wilds.get_mut(index) else {
            return;
        };
        wild.encountered = true;
        let species = wild.species;

        world.movement.reset();
        session.player.stand_still();
        match BattleSession::start(species, &mut session.party) {
            Some(battle) => {
                info!(species = species.name(), "battle_started");
                self.battle = Some(battle);
            }
            None if session.has_party() => world.dialogue.open_line(PARTY_FAINTED_TEXT),
            None => world.dialogue.open_line(NO_PARTY_TEXT),
        }
    }

    /// A lost battle sends the player back to the map with the party restored.
    fn finish_battle_if_over(&mut self, party: &mut [Creature]) {
        let Some(outcome) = self.battle.as_ref().and_then(BattleSession::outcome) else {
            return;
        };
        info!(outcome = ?outcome, "battle_finished");
        self.battle = None;
        if outcome == BattleOutcome::Lost {
            party.iter_mut().for_each(Creature::restore_fully);
            info!(party = party.len(), "party_restored");
        }
    }
}

fn spawn_wild<R: Rng>(rng: &mut R, zone: &Rect) -> WildCreature {
    let max_x = (zone.right() - WILD_SIZE).max(zone.left());
    let max_y = (zone.bottom() - WILD_SIZE).max(zone.top());
    let species = Species::ALL[rng.random_range(0..Species::ALL.len())];
    WildCreature {
        species,
        rect: Rect::new(
            rng.random_range(zone.left()..=max_x),
            rng.random_range(zone.top()..=max_y),
            WILD_SIZE,
            WILD_SIZE,
        ),
        encountered: false,
    }
}

#[derive(Debug)]
pub(crate) struct GrasslandScene {
    pub(crate) world: Overworld,
    pub(crate) encounters: Encounters,
}

impl GrasslandScene {
    pub(crate) fn new(map: MapDefinition, debug: bool) -> Self {
        Self {
            world: Overworld::new(map, debug),
            encounters: Encounters::default(),
        }
    }

    pub(crate) fn initialize(&mut self, session: &mut SessionState, arrival: Option<SceneId>) {
        self.world.enter(session, arrival);
    }

    pub(crate) fn handle_key(&mut self, event: KeyEvent, session: &mut SessionState) -> SceneCommand {
        if let Some(battle) = &mut self.encounters.battle {
            if event.is_press() {
                battle.handle_key(event.key, &mut session.party, &mut session.inventory);
                self.encounters.finish_battle_if_over(&mut session.party);
            } else {
                self.world.handle_key(event, session, true);
            }
            return SceneCommand::None;
        }

        match self.world.handle_key(event, session, false) {
            OverworldInput::Stepped(StepOutcome::Moved) => {
                self.encounters.check_triggers(&mut self.world, session)
            }
            OverworldInput::Interact => {
                if let InteractionResult::OpenDialogue(lines) =
                    try_interact(&session.player, &self.world.map, &mut [])
                {
                    self.world.dialogue.open(lines);
                }
                SceneCommand::None
            }
            _ => SceneCommand::None,
        }
    }

    pub(crate) fn update(&mut self, dt: Duration, session: &mut SessionState) -> SceneCommand {
        if let Some(battle) = &mut self.encounters.battle {
            battle.update(dt, &mut session.party);
            self.encounters.finish_battle_if_over(&mut session.party);
        }
        let Self { world, encounters } = self;
        let in_battle = encounters.battle.is_some();
        world.update(dt, session, in_battle, |world, session| {
            encounters.check_triggers(world, session)
        })
    }

    pub(crate) fn cleanup(&mut self, session: &mut SessionState) {
        if let Some(mut battle) = self.encounters.battle.take() {
            battle.cancel();
            info!(outcome = ?battle.outcome(), "battle_finished");
        }
        self.world.cleanup(session);
    }

    pub(crate) fn render(&self, session: &SessionState, frame: &mut RenderFrame) {
        if let Some(battle) = &self.encounters.battle {
            hud::draw_battle(frame, battle, &session.party);
            return;
        }
        self.world.render_map(frame);
        let camera = &self.world.camera;
        for zone in &self.world.map.grass_zones {
            frame.sprite(ZOrder::PROPS, GRASS_SPRITE, world_rect(camera, *zone), GRASS_FALLBACK);
        }
        for wild in self.encounters.wilds.iter().filter(|wild| !wild.encountered) {
            frame.sprite(
                ZOrder::ACTORS,
                wild.species.sprite_id(),
                world_rect(camera, wild.rect),
                wild.species.placeholder_color(),
            );
        }
        self.world.render_overlays(session, frame);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn wilds_spawn_inside_their_zone() {
        let zone = Rect::new(600.0, 1300.0, 250.0, 200.0);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let wild = spawn_wild(&mut rng, &zone);
            assert!(wild.rect.left() >= zone.left() && wild.rect.right() <= zone.right());
            assert!(wild.rect.top() >= zone.top() && wild.rect.bottom() <= zone.bottom());
            assert!(!wild.encountered);
        }
    }
}
