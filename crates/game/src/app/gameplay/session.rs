use engine::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::containers::ContainerBox;
use super::creature::{Creature, Species};
use super::inventory::Inventory;
use super::movement::Direction;

pub(crate) const MAX_PARTY_SIZE: usize = 4;
/// Ball order on the laboratory table, left to right.
pub(crate) const STARTER_ORDER: [Species; 3] =
    [Species::Squirtle, Species::Charmander, Species::Bulbasaur];

const SPRITE_CENTER_X: f32 = 17.5;
const SPRITE_CENTER_Y: f32 = 24.0;
const WALK_FRAMES: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlayerState {
    /// Sprite top-left in map space.
    pub(crate) position: Vec2,
    pub(crate) facing: Direction,
    pub(crate) walk_frame: u8,
}

impl PlayerState {
    pub(crate) fn at(position: Vec2) -> Self {
        Self {
            position,
            facing: Direction::Down,
            walk_frame: 0,
        }
    }

    pub(crate) fn center(&self) -> Vec2 {
        self.position.offset(SPRITE_CENTER_X, SPRITE_CENTER_Y)
    }

    pub(crate) fn advance_walk_frame(&mut self) {
        self.walk_frame = (self.walk_frame + 1) % WALK_FRAMES;
    }

    pub(crate) fn stand_still(&mut self) {
        self.walk_frame = 0;
    }

    pub(crate) fn sprite_id(&self) -> String {
        let letter = self.facing.sprite_letter();
        if self.walk_frame == 0 {
            format!("player/player_{letter}")
        } else {
            format!("player/player_{letter}W{}", self.walk_frame)
        }
    }
}

/// Everything that outlives a single scene visit.
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) player: PlayerState,
    pub(crate) party: Vec<Creature>,
    pub(crate) inventory: Inventory,
    pub(crate) starter_chosen: bool,
    starter_options: Option<[Species; 3]>,
    pub(crate) town_boxes: Option<Vec<ContainerBox>>,
    pub(crate) rng: StdRng,
    /// Debug overlays start enabled on every scene when set.
    pub(crate) debug_default: bool,
}

impl SessionState {
    pub(crate) fn new(seed: Option<u64>, debug_default: bool) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            player: PlayerState::at(Vec2::ZERO),
            party: Vec::with_capacity(MAX_PARTY_SIZE),
            inventory: Inventory::default(),
            starter_chosen: false,
            starter_options: None,
            town_boxes: None,
            rng,
            debug_default,
        }
    }

    /// Starter species on the laboratory table, fixed on first request.
    pub(crate) fn starter_options(&mut self) -> [Species; 3] {
        *self.starter_options.get_or_insert(STARTER_ORDER)
    }

    /// Adds the chosen starter to the party. `None` when already chosen or
    /// the index is not on the table.
    pub(crate) fn choose_starter(&mut self, index: usize) -> Option<&Creature> {
        if self.starter_chosen {
            return None;
        }
        let species = *self.starter_options().get(index)?;
        if !self.add_to_party(Creature::new(species)) {
            return None;
        }
        self.starter_chosen = true;
        self.party.last()
    }

    /// Returns false when the party is full.
    pub(crate) fn add_to_party(&mut self, creature: Creature) -> bool {
        if self.party.len() >= MAX_PARTY_SIZE {
            return false;
        }
        self.party.push(creature);
        true
    }

    pub(crate) fn has_party(&self) -> bool {
        !self.party.is_empty()
    }

    /// Town boxes, generated on first request and kept for the session.
    pub(crate) fn town_boxes_or_insert_with(
        &mut self,
        generate: impl FnOnce(&mut StdRng) -> Vec<ContainerBox>,
    ) -> &mut Vec<ContainerBox> {
        let rng = &mut self.rng;
        self.town_boxes.get_or_insert_with(|| generate(rng))
    }
}
