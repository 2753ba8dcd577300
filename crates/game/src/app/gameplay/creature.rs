pub(crate) const STARTING_LEVEL: u32 = 1;
pub(crate) const BASE_ATTACK: u32 = 5;
pub(crate) const BASE_DEFENSE: u32 = 5;
pub(crate) const BASE_MAX_HP: u32 = 30;
pub(crate) const WILD_MOVE_NAME: &str = "Tackle";
pub(crate) const WILD_MOVE_POWER: u32 = 10;
/// Creatures below this level only know their first move.
const FULL_MOVESET_LEVEL: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Species {
    Charmander,
    Squirtle,
    Bulbasaur,
}

impl Species {
    pub(crate) const ALL: [Species; 3] = [Species::Charmander, Species::Squirtle, Species::Bulbasaur];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Species::Charmander => "Charmander",
            Species::Squirtle => "Squirtle",
            Species::Bulbasaur => "Bulbasaur",
        }
    }

    pub(crate) fn sprite_id(self) -> &'static str {
        match self {
            Species::Charmander => "creatures/charmander",
            Species::Squirtle => "creatures/squirtle",
            Species::Bulbasaur => "creatures/bulbasaur",
        }
    }

    pub(crate) fn placeholder_color(self) -> [u8; 4] {
        match self {
            Species::Charmander => [232, 120, 56, 255],
            Species::Squirtle => [84, 150, 230, 255],
            Species::Bulbasaur => [96, 184, 120, 255],
        }
    }

    fn learnset(self) -> [(&'static str, u32, u32); 2] {
        match self {
            Species::Charmander => [("Scratch", 10, 20), ("Growl", 15, 20)],
            Species::Squirtle => [("Tackle", 10, 20), ("Tail Whip", 15, 20)],
            Species::Bulbasaur => [("Tackle", 10, 20), ("Growl", 15, 20)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Move {
    pub(crate) name: &'static str,
    pub(crate) power: u32,
    pub(crate) pp_remaining: u32,
    pub(crate) pp_max: u32,
}

impl Move {
    pub(crate) fn new(name: &'static str, power: u32, pp_max: u32) -> Self {
        Self {
            name,
            power,
            pp_remaining: pp_max,
            pp_max,
        }
    }

    /// Spends one PP. Returns false, leaving the move untouched, when none is left.
    pub(crate) fn consume_pp(&mut self) -> bool {
        if self.pp_remaining == 0 {
            return false;
        }
        self.pp_remaining -= 1;
        true
    }

    pub(crate) fn restore_pp(&mut self) {
        self.pp_remaining = self.pp_max;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Creature {
    pub(crate) species: Species,
    pub(crate) name: String,
    pub(crate) level: u32,
    pub(crate) attack: u32,
    pub(crate) defense: u32,
    pub(crate) max_hp: u32,
    current_hp: u32,
    pub(crate) moves: Vec<Move>,
}

impl Creature {
    pub(crate) fn new(species: Species) -> Self {
        Self {
            species,
            name: species.name().to_string(),
            level: STARTING_LEVEL,
            attack: BASE_ATTACK,
            defense: BASE_DEFENSE,
            max_hp: BASE_MAX_HP,
            current_hp: BASE_MAX_HP,
            moves: species
                .learnset()
                .into_iter()
                .map(|(name, power, pp)| Move::new(name, power, pp))
                .collect(),
        }
    }

    pub(crate) fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub(crate) fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub(crate) fn is_at_full_hp(&self) -> bool {
        self.current_hp >= self.max_hp
    }

    /// Returns the HP left after the hit.
    pub(crate) fn take_damage(&mut self, damage: u32) -> u32 {
        self.current_hp = self.current_hp.saturating_sub(damage);
        self.current_hp
    }

    /// Returns how much HP was actually restored.
    pub(crate) fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
        self.current_hp - before
    }

    pub(crate) fn restore_all_pp(&mut self) {
        for mv in &mut self.moves {
            mv.restore_pp();
        }
    }

    /// Full HP and PP, keeping level.
    pub(crate) fn restore_fully(&mut self) {
        self.current_hp = self.max_hp;
        self.restore_all_pp();
    }

    pub(crate) fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    /// Moves offered in battle at the current level.
    pub(crate) fn known_move_count(&self) -> usize {
        if self.level >= FULL_MOVESET_LEVEL {
            self.moves.len()
        } else {
            self.moves.len().min(1)
        }
    }

    pub(crate) fn known_moves(&self) -> &[Move] {
        &self.moves[..self.known_move_count()]
    }

    pub(crate) fn known_move_mut(&mut self, index: usize) -> Option<&mut Move> {
        if index >= self.known_move_count() {
            return None;
        }
        self.moves.get_mut(index)
    }
}

/// `max(1, (power + attack - defense) * level)`.
pub(crate) fn compute_damage(power: u32, attack: u32, defense: u32, level: u32) -> u32 {
    let raw = (power as i64 + attack as i64 - defense as i64) * level as i64;
    raw.clamp(1, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_matches_reference_values() {
        assert_eq!(compute_damage(10, 5, 5, 1), 10);
        assert_eq!(compute_damage(15, 5, 5, 2), 30);
    }

    #[test]
    fn damage_never_drops_below_one() {
        assert_eq!(compute_damage(0, 0, 100, 1), 1);
        assert_eq!(compute_damage(0, 0, 0, 0), 1);
    }

    #[test]
    fn new_creature_has_default_stats() {
        let creature = Creature::new(Species::Bulbasaur);
        assert_eq!(creature.name, "Bulbasaur");
        assert_eq!(creature.level, 1);
        assert_eq!((creature.attack, creature.defense), (5, 5));
        assert_eq!((creature.current_hp(), creature.max_hp), (30, 30));
        assert_eq!(creature.moves.len(), 2);
    }

    #[test]
    fn learnsets_follow_species() {
        let names = |species| {
            Creature::new(species)
                .moves
                .iter()
                .map(|mv| mv.name)
                .collect::<Vec<_>>()
        };
        assert_eq!(names(Species::Charmander), vec!["Scratch", "Growl"]);
        assert_eq!(names(Species::Squirtle), vec!["Tackle", "Tail Whip"]);
        assert_eq!(names(Species::Bulbasaur), vec!["Tackle", "Growl"]);
    }

    #[test]
    fn pp_never_goes_negative() {
        let mut mv = Move::new("Tackle", 10, 20);
        for n in 1..=25u32 {
            mv.consume_pp();
            assert_eq!(mv.pp_remaining, 20u32.saturating_sub(n));
        }
        assert_eq!(mv.pp_remaining, 0);
        assert!(!mv.consume_pp());
    }

    #[test]
    fn hp_is_clamped_for_damage_and_healing() {
        let mut creature = Creature::new(Species::Squirtle);
        assert_eq!(creature.take_damage(12), 18);
        assert_eq!(creature.heal(100), 12);
        assert_eq!(creature.current_hp(), 30);
        assert_eq!(creature.take_damage(500), 0);
        assert!(creature.is_fainted());
    }

    #[test]
    fn level_gates_known_moves() {
        let mut creature = Creature::new(Species::Charmander);
        assert_eq!(creature.known_moves().len(), 1);
        assert!(creature.known_move_mut(1).is_none());

        creature.level_up();
        assert_eq!(creature.known_moves().len(), 2);
        assert!(creature.known_move_mut(1).is_some());
    }

    #[test]
    fn restore_all_pp_refills_every_move() {
        let mut creature = Creature::new(Species::Bulbasaur);
        creature.moves[0].pp_remaining = 0;
        creature.moves[1].pp_remaining = 3;
        creature.restore_all_pp();
        assert!(creature.moves.iter().all(|mv| mv.pp_remaining == mv.pp_max));
    }

    #[test]
    fn restore_fully_revives_a_fainted_creature_at_its_level() {
        let mut creature = Creature::new(Species::Squirtle);
        creature.level_up();
        creature.take_damage(BASE_MAX_HP);
        creature.moves[0].pp_remaining = 1;
        assert!(creature.is_fainted());

        creature.restore_fully();

        assert_eq!(creature.current_hp(), creature.max_hp);
        assert_eq!(creature.moves[0].pp_remaining, creature.moves[0].pp_max);
        assert_eq!(creature.level, 2);
    }
}
