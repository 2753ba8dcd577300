use engine::{Rect, Vec2};
use rand::seq::SliceRandom;
use rand::Rng;

use super::collision::intersects;
use super::inventory::Item;

pub(crate) const BOX_SIZE: f32 = 40.0;
pub(crate) const BOX_COUNT: usize = 12;
const BOX_MARGIN: i32 = 100;
const MIN_CENTER_DISTANCE: f32 = 50.0;
const MAX_PLACEMENT_ATTEMPTS: usize = 100;
const PINNED_POKE_BALLS: usize = 3;
const POTIONS_IN_POOL: usize = 9;
const ETHERS_IN_POOL: usize = 3;

/// Collectible box in town. Holds at most one item and hands it out once.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ContainerBox {
    pub(crate) position: Vec2,
    opened: bool,
    contents: Option<Item>,
}

impl ContainerBox {
    pub(crate) fn new(position: Vec2, contents: Option<Item>) -> Self {
        Self {
            position,
            opened: false,
            contents,
        }
    }

    pub(crate) fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, BOX_SIZE, BOX_SIZE)
    }

    pub(crate) fn is_opened(&self) -> bool {
        self.opened
    }

    #[cfg(test)]
    pub(crate) fn contents(&self) -> Option<Item> {
        self.contents
    }

    /// Yields the contents on the first open only.
    pub(crate) fn open(&mut self) -> Option<Item> {
        if self.opened {
            return None;
        }
        self.opened = true;
        self.contents.take()
    }
}

/// Places up to `BOX_COUNT` boxes by rejection sampling inside the map,
/// keeping clear of `blockers` and of each other. Boxes that find no spot
/// within the attempt budget are skipped.
pub(crate) fn generate_boxes<R: Rng>(
    rng: &mut R,
    map_width: f32,
    map_height: f32,
    blockers: &[Rect],
) -> Vec<ContainerBox> {
    let max_x = (map_width as i32 - BOX_SIZE as i32 - BOX_MARGIN).max(BOX_MARGIN);
    let max_y = (map_height as i32 - BOX_SIZE as i32 - BOX_MARGIN).max(BOX_MARGIN);

    let mut placed: Vec<Rect> = Vec::with_capacity(BOX_COUNT);
    for _ in 0..BOX_COUNT {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let candidate = Rect::new(
                rng.random_range(BOX_MARGIN..=max_x) as f32,
                rng.random_range(BOX_MARGIN..=max_y) as f32,
                BOX_SIZE,
                BOX_SIZE,
            );
            if intersects(&candidate, blockers) {
                continue;
            }
            let crowded = placed
                .iter()
                .any(|other| other.center().distance(candidate.center()) < MIN_CENTER_DISTANCE);
            if crowded {
                continue;
            }
            placed.push(candidate);
            break;
        }
    }

    let items = box_contents(rng, placed.len());
    placed
        .into_iter()
        .zip(items)
        .map(|(rect, item)| ContainerBox::new(rect.origin(), Some(item)))
        .collect()
}

/// Three Poké Balls always make it in; the rest is drawn from the shuffled
/// Potion/Ether pool.
fn box_contents<R: Rng>(rng: &mut R, box_count: usize) -> Vec<Item> {
    let mut filler = std::iter::repeat(Item::Potion)
        .take(POTIONS_IN_POOL)
        .chain(std::iter::repeat(Item::Ether).take(ETHERS_IN_POOL))
        .collect::<Vec<_>>();
    filler.shuffle(rng);

    let mut items = vec![Item::PokeBall; PINNED_POKE_BALLS.min(box_count)];
    items.extend(filler.into_iter().take(box_count - items.len()));
    items.shuffle(rng);
    items
}
