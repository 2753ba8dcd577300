use std::time::Duration;

use engine::Key;

use super::creature::{compute_damage, Creature, Species, WILD_MOVE_NAME, WILD_MOVE_POWER};
use super::inventory::{Inventory, Item};
use super::timers::PendingTimer;

pub(crate) const OPPONENT_TURN_DELAY: Duration = Duration::from_millis(1000);
pub(crate) const EXIT_DELAY: Duration = Duration::from_millis(2000);
pub(crate) const POTION_HEAL: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuOption {
    Fight,
    Bag,
    Pokemon,
    Run,
}

impl MenuOption {
    /// Grid layout: `[[Fight, Bag], [Pokemon, Run]]`.
    fn cell(self) -> (usize, usize) {
        match self {
            MenuOption::Fight => (0, 0),
            MenuOption::Bag => (0, 1),
            MenuOption::Pokemon => (1, 0),
            MenuOption::Run => (1, 1),
        }
    }

    fn from_cell(row: usize, col: usize) -> Self {
        match (row % 2, col % 2) {
            (0, 0) => MenuOption::Fight,
            (0, _) => MenuOption::Bag,
            (_, 0) => MenuOption::Pokemon,
            _ => MenuOption::Run,
        }
    }

    fn toggle_row(self) -> Self {
        let (row, col) = self.cell();
        Self::from_cell(row + 1, col)
    }

    fn toggle_column(self) -> Self {
        let (row, col) = self.cell();
        Self::from_cell(row, col + 1)
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuOption::Fight => "FIGHT",
            MenuOption::Bag => "BAG",
            MenuOption::Pokemon => "POKEMON",
            MenuOption::Run => "RUN",
        }
    }

    pub(crate) const GRID: [[MenuOption; 2]; 2] = [
        [MenuOption::Fight, MenuOption::Bag],
        [MenuOption::Pokemon, MenuOption::Run],
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BattleOutcome {
    Won,
    Lost,
    Fled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BattlePhase {
    MainMenu,
    MoveSelect,
    BagOpen,
    PokemonSelect,
    /// Player acted; waiting on the opponent turn.
    Resolving,
    Ending(BattleOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    OpponentTurn,
    Exit(BattleOutcome),
}

/// One wild encounter. Party and inventory are lent in on every call.
#[derive(Debug, Clone)]
pub(crate) struct BattleSession {
    wild: Creature,
    phase: BattlePhase,
    selection: MenuOption,
    message: String,
    pending: PendingTimer<PendingAction>,
    outcome: Option<BattleOutcome>,
}

impl BattleSession {
    /// Brings the first healthy creature to the front. `None` when nobody can fight.
    pub(crate) fn start(species: Species, party: &mut [Creature]) -> Option<Self> {
        let healthy = party.iter().position(|creature| !creature.is_fainted())?;
        party.swap(0, healthy);
        let wild = Creature::new(species);
        let message = format!("A wild {} appeared!", wild.name);
        Some(Self {
            wild,
            phase: BattlePhase::MainMenu,
            selection: MenuOption::Fight,
            message,
            pending: PendingTimer::default(),
            outcome: None,
        })
    }

    pub(crate) fn wild(&self) -> &Creature {
        &self.wild
    }

    pub(crate) fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub(crate) fn selection(&self) -> MenuOption {
        self.selection
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    /// Set once the battle is over and the scene should drop it.
    pub(crate) fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub(crate) fn is_waiting(&self) -> bool {
        self.pending.is_pending()
    }

    /// Abandons the battle without resolving anything.
    pub(crate) fn cancel(&mut self) {
        self.pending.cancel();
        self.outcome.get_or_insert(BattleOutcome::Fled);
    }

    pub(crate) fn handle_key(&mut self, key: Key, party: &mut [Creature], inventory: &mut Inventory) {
        if self.pending.is_pending() || self.outcome.is_some() {
            return;
        }
        match self.phase {
            BattlePhase::MainMenu => self.handle_main_menu(key),
            BattlePhase::MoveSelect => self.handle_move_select(key, party),
            BattlePhase::BagOpen => self.handle_bag(key, party, inventory),
            BattlePhase::PokemonSelect => self.handle_pokemon_select(key, party),
            BattlePhase::Resolving | BattlePhase::Ending(_) => {}
        }
    }

    pub(crate) fn update(&mut self, dt: Duration, party: &mut [Creature]) {
        match self.pending.tick(dt) {
            Some(PendingAction::OpponentTurn) => self.opponent_turn(party),
            Some(PendingAction::Exit(outcome)) => self.outcome = Some(outcome),
            None => {}
        }
    }

    fn handle_main_menu(&mut self, key: Key) {
        match key {
            Key::Left | Key::Right => self.selection = self.selection.toggle_column(),
            Key::Up | Key::Down => self.selection = self.selection.toggle_row(),
            key if key.is_confirm() => match self.selection {
                MenuOption::Fight => self.phase = BattlePhase::MoveSelect,
                MenuOption::Bag => self.phase = BattlePhase::BagOpen,
                MenuOption::Pokemon => self.phase = BattlePhase::PokemonSelect,
                MenuOption::Run => {
                    self.pending.cancel();
                    self.outcome = Some(BattleOutcome::Fled);
                }
            },
            _ => {}
        }
    }

    fn handle_move_select(&mut self, key: Key, party: &mut [Creature]) {
        if matches!(key, Key::B | Key::Escape) {
            self.phase = BattlePhase::MainMenu;
            return;
        }
        let Some(active) = party.first_mut() else {
            return;
        };
        if key == Key::C {
            self.message = format!("{} is watching carefully.", active.name);
            self.begin_opponent_turn();
            return;
        }
        let Some(index) = key.digit_index() else {
            return;
        };
        let attacker_name = active.name.clone();
        let (attack, level) = (active.attack, active.level);
        let Some(mv) = active.known_move_mut(index) else {
            return;
        };
        if !mv.consume_pp() {
            self.message = format!("{} has no PP left!", mv.name);
            return;
        }
        let damage = compute_damage(mv.power, attack, self.wild.defense, level);
        let move_name = mv.name;
        self.wild.take_damage(damage);
        self.message = format!("{attacker_name} used {move_name}! It dealt {damage} damage.");
        self.after_player_action(party);
    }

    fn handle_bag(&mut self, key: Key, party: &mut [Creature], inventory: &mut Inventory) {
        if matches!(key, Key::B | Key::Escape) {
            self.phase = BattlePhase::MainMenu;
            return;
        }
        let item = match key.digit_index() {
            Some(0) => Item::PokeBall,
            Some(1) => Item::Potion,
            Some(2) => Item::Ether,
            _ => return,
        };
        let Some(active) = party.first_mut() else {
            return;
        };
        if inventory.count(item) == 0 {
            self.message = format!("You don't have any {item}!");
            return;
        }
        match item {
            Item::PokeBall => {
                self.message = "Poké Balls can't be thrown yet!".to_string();
            }
            Item::Potion if active.is_at_full_hp() => {
                self.message = format!("{}'s HP is already full!", active.name);
            }
            Item::Potion => {
                inventory.take_one(item);
                let healed = active.heal(POTION_HEAL);
                self.message = format!("{} recovered {healed} HP!", active.name);
                self.begin_opponent_turn();
            }
            Item::Ether => {
                inventory.take_one(item);
                active.restore_all_pp();
                self.message = format!("{}'s PP was restored!", active.name);
                self.begin_opponent_turn();
            }
        }
    }

    fn handle_pokemon_select(&mut self, key: Key, party: &mut [Creature]) {
        if matches!(key, Key::B | Key::Escape) {
            self.phase = BattlePhase::MainMenu;
            return;
        }
        let Some(index) = key.digit_index() else {
            return;
        };
        let Some(chosen) = party.get(index) else {
            return;
        };
        if index == 0 {
            self.message = format!("{} is already in battle!", chosen.name);
            return;
        }
        if chosen.is_fainted() {
            self.message = format!("{} can't battle!", chosen.name);
            return;
        }
        party.swap(0, index);
        self.message = format!("Go, {}!", party[0].name);
        self.begin_opponent_turn();
    }

    fn after_player_action(&mut self, party: &mut [Creature]) {
        if !self.wild.is_fainted() {
            self.begin_opponent_turn();
            return;
        }
        if let Some(active) = party.first_mut() {
            active.level_up();
            self.message = format!(
                "Wild {} fainted! {} grew to level {}!",
                self.wild.name, active.name, active.level
            );
        }
        self.end(BattleOutcome::Won);
    }

    fn begin_opponent_turn(&mut self) {
        self.phase = BattlePhase::Resolving;
        self.pending
            .schedule(OPPONENT_TURN_DELAY, PendingAction::OpponentTurn);
    }

    fn opponent_turn(&mut self, party: &mut [Creature]) {
        let Some(active) = party.first_mut() else {
            self.end(BattleOutcome::Fled);
            return;
        };
        let damage = compute_damage(
            WILD_MOVE_POWER,
            self.wild.attack,
            active.defense,
            self.wild.level,
        );
        active.take_damage(damage);
        if active.is_fainted() {
            self.message = format!("{} fainted! You lost the battle.", active.name);
            self.end(BattleOutcome::Lost);
        } else {
            self.message = format!(
                "Wild {} used {WILD_MOVE_NAME}! It dealt {damage} damage.",
                self.wild.name
            );
            self.phase = BattlePhase::MainMenu;
        }
    }

    fn end(&mut self, outcome: BattleOutcome) {
        self.phase = BattlePhase::Ending(outcome);
        self.pending.schedule(EXIT_DELAY, PendingAction::Exit(outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party() -> Vec<Creature> {
        vec![Creature::new(Species::Bulbasaur)]
    }

    fn battle(party: &mut [Creature]) -> BattleSession {
        BattleSession::start(Species::Charmander, party).expect("party can fight")
    }

    fn press(battle: &mut BattleSession, keys: &[Key], party: &mut [Creature], inventory: &mut Inventory) {
        for key in keys {
            battle.handle_key(*key, party, inventory);
        }
    }

    #[test]
    fn menu_cursor_never_leaves_the_grid() {
        let mut party = party();
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        assert_eq!(battle.selection(), MenuOption::Fight);

        press(&mut battle, &[Key::Right], &mut party, &mut inventory);
        assert_eq!(battle.selection(), MenuOption::Bag);
        press(&mut battle, &[Key::Down], &mut party, &mut inventory);
        assert_eq!(battle.selection(), MenuOption::Run);
        press(&mut battle, &[Key::Right, Key::Up], &mut party, &mut inventory);
        assert_eq!(battle.selection(), MenuOption::Fight);
        press(&mut battle, &[Key::Up], &mut party, &mut inventory);
        assert_eq!(battle.selection(), MenuOption::Pokemon);
    }

    #[test]
    fn run_exits_immediately() {
        let mut party = party();
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::Down, Key::Right, Key::A], &mut party, &mut inventory);

        assert_eq!(battle.outcome(), Some(BattleOutcome::Fled));
        assert!(!battle.is_waiting());
    }

    #[test]
    fn attack_then_opponent_turn_after_delay() {
        let mut party = party();
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::A, Key::Digit1], &mut party, &mut inventory);

        assert_eq!(battle.wild().current_hp(), 20);
        assert_eq!(party[0].moves[0].pp_remaining, 19);
        assert_eq!(battle.phase(), BattlePhase::Resolving);

        battle.update(Duration::from_millis(999), &mut party);
        assert_eq!(party[0].current_hp(), 30);
        battle.update(Duration::from_millis(1), &mut party);
        assert_eq!(party[0].current_hp(), 20);
        assert_eq!(battle.phase(), BattlePhase::MainMenu);
        assert!(battle.message().contains("Tackle"));
    }

    #[test]
    fn input_is_ignored_while_timer_is_pending() {
        let mut party = party();
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::A, Key::Digit1], &mut party, &mut inventory);
        press(&mut battle, &[Key::B, Key::A, Key::Digit1], &mut party, &mut inventory);

        assert_eq!(battle.wild().current_hp(), 20);
        assert_eq!(battle.phase(), BattlePhase::Resolving);
    }

    #[test]
    fn level_one_knows_only_first_move() {
        let mut party = party();
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::A, Key::Digit2], &mut party, &mut inventory);

        assert_eq!(battle.phase(), BattlePhase::MoveSelect);
        assert_eq!(battle.wild().current_hp(), 30);
        assert!(!battle.is_waiting());
    }

    #[test]
    fn empty_pp_move_deals_no_damage_and_keeps_turn() {
        let mut party = party();
        party[0].moves[0].pp_remaining = 0;
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::A, Key::Digit1], &mut party, &mut inventory);

        assert_eq!(battle.wild().current_hp(), 30);
        assert_eq!(battle.phase(), BattlePhase::MoveSelect);
        assert!(battle.message().contains("no PP"));
    }

    #[test]
    fn back_from_move_select_keeps_turn() {
        let mut party = party();
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::A, Key::Escape], &mut party, &mut inventory);

        assert_eq!(battle.phase(), BattlePhase::MainMenu);
        assert!(!battle.is_waiting());
    }

    #[test]
    fn c_passes_the_turn() {
        let mut party = party();
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::A, Key::C], &mut party, &mut inventory);

        assert_eq!(battle.wild().current_hp(), 30);
        assert!(battle.is_waiting());
        battle.update(OPPONENT_TURN_DELAY, &mut party);
        assert_eq!(party[0].current_hp(), 20);
    }

    #[test]
    fn knocking_out_the_wild_levels_up_and_exits_later() {
        let mut party = party();
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        battle.wild.take_damage(25);
        press(&mut battle, &[Key::A, Key::Digit1], &mut party, &mut inventory);

        assert_eq!(battle.phase(), BattlePhase::Ending(BattleOutcome::Won));
        assert_eq!(party[0].level, 2);
        assert_eq!(battle.outcome(), None);

        battle.update(Duration::from_millis(1999), &mut party);
        assert_eq!(battle.outcome(), None);
        battle.update(Duration::from_millis(1), &mut party);
        assert_eq!(battle.outcome(), Some(BattleOutcome::Won));
    }

    #[test]
    fn fainting_loses_the_battle() {
        let mut party = party();
        party[0].take_damage(25);
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::A, Key::C], &mut party, &mut inventory);
        battle.update(OPPONENT_TURN_DELAY, &mut party);

        assert!(party[0].is_fainted());
        assert_eq!(battle.phase(), BattlePhase::Ending(BattleOutcome::Lost));
        battle.update(EXIT_DELAY, &mut party);
        assert_eq!(battle.outcome(), Some(BattleOutcome::Lost));
    }

    #[test]
    fn potion_heals_and_is_consumed() {
        let mut party = party();
        party[0].take_damage(25);
        let mut inventory = Inventory::default();
        inventory.add(Item::Potion, 1);
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::Right, Key::A, Key::Digit2], &mut party, &mut inventory);

        assert_eq!(party[0].current_hp(), 25);
        assert_eq!(inventory.count(Item::Potion), 0);
        assert!(battle.is_waiting());
    }

    #[test]
    fn potion_at_full_hp_is_not_consumed() {
        let mut party = party();
        let mut inventory = Inventory::default();
        inventory.add(Item::Potion, 1);
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::Right, Key::A, Key::Digit2], &mut party, &mut inventory);

        assert_eq!(inventory.count(Item::Potion), 1);
        assert_eq!(battle.phase(), BattlePhase::BagOpen);
        assert!(!battle.is_waiting());
    }

    #[test]
    fn ether_restores_pp() {
        let mut party = party();
        party[0].moves[0].pp_remaining = 2;
        let mut inventory = Inventory::default();
        inventory.add(Item::Ether, 2);
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::Right, Key::A, Key::Digit3], &mut party, &mut inventory);

        assert_eq!(party[0].moves[0].pp_remaining, 20);
        assert_eq!(inventory.count(Item::Ether), 1);
    }

    #[test]
    fn poke_ball_is_a_placeholder() {
        let mut party = party();
        let mut inventory = Inventory::default();
        inventory.add(Item::PokeBall, 3);
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::Right, Key::A, Key::Digit1], &mut party, &mut inventory);

        assert_eq!(inventory.count(Item::PokeBall), 3);
        assert_eq!(battle.wild().current_hp(), 30);
        assert!(!battle.is_waiting());
    }

    #[test]
    fn switching_creature_consumes_the_turn() {
        let mut party = vec![Creature::new(Species::Bulbasaur), Creature::new(Species::Squirtle)];
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::Down, Key::A, Key::Digit2], &mut party, &mut inventory);

        assert_eq!(party[0].species, Species::Squirtle);
        assert!(battle.is_waiting());
    }

    #[test]
    fn fainted_creature_cannot_be_sent_out() {
        let mut party = vec![Creature::new(Species::Bulbasaur), Creature::new(Species::Squirtle)];
        party[1].take_damage(100);
        let mut inventory = Inventory::default();
        let mut battle = battle(&mut party);
        press(&mut battle, &[Key::Down, Key::A, Key::Digit2], &mut party, &mut inventory);

        assert_eq!(party[0].species, Species::Bulbasaur);
        assert!(!battle.is_waiting());
    }

    #[test]
    fn start_brings_healthy_creature_forward_or_refuses() {
        let mut party = vec![Creature::new(Species::Bulbasaur), Creature::new(Species::Squirtle)];
        party[0].take_damage(100);
        assert!(BattleSession::start(Species::Charmander, &mut party).is_some());
        assert_eq!(party[0].species, Species::Squirtle);

        party[0].take_damage(100);
        assert!(BattleSession::start(Species::Charmander, &mut party).is_none());
        assert!(BattleSession::start(Species::Charmander, &mut []).is_none());
    }
}
