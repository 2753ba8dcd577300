use std::collections::BTreeMap;
use std::fmt;

/// Poké Ball counts above this are still stored but shown capped.
pub(crate) const POKE_BALL_DISPLAY_CAP: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Item {
    PokeBall,
    Potion,
    Ether,
}

impl Item {
    pub(crate) const ALL: [Item; 3] = [Item::PokeBall, Item::Potion, Item::Ether];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Item::PokeBall => "Poké Ball",
            Item::Potion => "Potion",
            Item::Ether => "Ether",
        }
    }

    pub(crate) fn sprite_id(self) -> &'static str {
        match self {
            Item::PokeBall => "icons/pokeball_bag",
            Item::Potion => "icons/potion_bag",
            Item::Ether => "icons/ether_bag",
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Item counts. A key is present only while its count is positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Inventory {
    counts: BTreeMap<Item, u32>,
}

impl Inventory {
    pub(crate) fn add(&mut self, item: Item, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let count = self.counts.entry(item).or_insert(0);
        *count = count.saturating_add(quantity);
    }

    /// Removes one unit. Returns false when there was nothing to remove.
    pub(crate) fn take_one(&mut self, item: Item) -> bool {
        let Some(count) = self.counts.get_mut(&item) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.counts.remove(&item);
        }
        true
    }

    pub(crate) fn count(&self, item: Item) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    pub(crate) fn display_count(&self, item: Item) -> u32 {
        match item {
            Item::PokeBall => self.count(item).min(POKE_BALL_DISPLAY_CAP),
            _ => self.count(item),
        }
    }

    pub(crate) fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates_per_item() {
        let mut inventory = Inventory::default();
        inventory.add(Item::Potion, 1);
        inventory.add(Item::Potion, 2);
        inventory.add(Item::Ether, 1);

        assert_eq!(inventory.count(Item::Potion), 3);
        assert_eq!(inventory.count(Item::Ether), 1);
        assert_eq!(inventory.count(Item::PokeBall), 0);
        assert_eq!(inventory.total(), 4);
    }

    #[test]
    fn taking_last_unit_removes_the_key() {
        let mut inventory = Inventory::default();
        inventory.add(Item::Ether, 1);

        assert!(inventory.take_one(Item::Ether));
        assert!(!inventory.take_one(Item::Ether));
        assert_eq!(inventory.count(Item::Ether), 0);
        assert_eq!(inventory, Inventory::default());
    }

    #[test]
    fn poke_ball_display_is_capped() {
        let mut inventory = Inventory::default();
        inventory.add(Item::PokeBall, 5);
        inventory.add(Item::Potion, 7);

        assert_eq!(inventory.display_count(Item::PokeBall), 3);
        assert_eq!(inventory.count(Item::PokeBall), 5);
        assert_eq!(inventory.display_count(Item::Potion), 7);
    }

    #[test]
    fn zero_quantity_add_is_ignored() {
        let mut inventory = Inventory::default();
        inventory.add(Item::Potion, 0);
        assert_eq!(inventory, Inventory::default());
    }
}
