use engine::{Rect, Vec2};

use super::movement::Direction;

pub(crate) const PLAYER_WIDTH: f32 = 35.0;
pub(crate) const PLAYER_HEIGHT: f32 = 48.0;

const FEET_OFFSET_X: f32 = 5.0;
const FEET_OFFSET_Y: f32 = 30.0;
const FEET_WIDTH: f32 = 25.0;
const FEET_HEIGHT: f32 = 18.0;

/// Collision footprint of a player sprite whose top-left corner is `position`.
pub(crate) fn feet_rect(position: Vec2) -> Rect {
    Rect::new(
        position.x + FEET_OFFSET_X,
        position.y + FEET_OFFSET_Y,
        FEET_WIDTH,
        FEET_HEIGHT,
    )
}

pub(crate) fn intersects(candidate: &Rect, barriers: &[Rect]) -> bool {
    barriers.iter().any(|barrier| candidate.intersects(barrier))
}

/// Walking up into a ledge from below it.
pub(crate) fn is_ledge_blocking(prev: &Rect, next: &Rect, ledge: &Rect, moving_up: bool) -> bool {
    moving_up
        && next.overlaps_horizontally(ledge)
        && prev.bottom() > ledge.bottom()
        && next.top() < ledge.bottom()
}

/// Hopping down off a ledge the feet started above.
pub(crate) fn is_ledge_jumpable(prev: &Rect, next: &Rect, ledge: &Rect, moving_down: bool) -> bool {
    moving_down && prev.bottom() <= ledge.top() && next.overlaps_horizontally(ledge)
}

/// Static blocking geometry for one map.
#[derive(Debug, Clone, Default)]
pub(crate) struct CollisionModel {
    pub(crate) barriers: Vec<Rect>,
    pub(crate) ledges: Vec<Rect>,
}

impl CollisionModel {
    pub(crate) fn new(barriers: Vec<Rect>, ledges: Vec<Rect>) -> Self {
        Self { barriers, ledges }
    }

    /// Whether moving the feet rect from `prev` to `next` is refused.
    pub(crate) fn blocks(&self, prev: &Rect, next: &Rect, direction: Direction) -> bool {
        if intersects(next, &self.barriers) {
            return true;
        }
        let moving_down = direction == Direction::Down;
        let moving_up = direction == Direction::Up;
        self.ledges.iter().any(|ledge| {
            !is_ledge_jumpable(prev, next, ledge, moving_down)
                && is_ledge_blocking(prev, next, ledge, moving_up)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledge() -> Rect {
        Rect::new(100.0, 200.0, 200.0, 12.0)
    }

    #[test]
    fn feet_rect_sits_at_bottom_of_sprite() {
        let feet = feet_rect(Vec2::new(10.0, 20.0));
        assert_eq!(feet, Rect::new(15.0, 50.0, 25.0, 18.0));
        assert_eq!(feet.bottom(), 20.0 + PLAYER_HEIGHT);
    }

    #[test]
    fn touching_a_barrier_is_not_a_collision() {
        let barrier = Rect::new(0.0, 0.0, 100.0, 100.0);
        let touching = Rect::new(100.0, 10.0, 25.0, 18.0);
        let overlapping = Rect::new(99.0, 10.0, 25.0, 18.0);

        assert!(!intersects(&touching, &[barrier]));
        assert!(intersects(&overlapping, &[barrier]));
    }

    #[test]
    fn barriers_block_every_direction() {
        let model = CollisionModel::new(vec![Rect::new(0.0, 0.0, 100.0, 100.0)], Vec::new());
        let prev = Rect::new(100.0, 40.0, 25.0, 18.0);
        let next = prev.translated(-5.0, 0.0);

        for direction in Direction::ALL {
            assert!(model.blocks(&prev, &next, direction), "{direction:?}");
        }
    }

    #[test]
    fn climbing_a_ledge_from_below_is_blocked() {
        let model = CollisionModel::new(Vec::new(), vec![ledge()]);
        let prev = Rect::new(150.0, 200.0, 25.0, 18.0);
        assert!(prev.bottom() > ledge().bottom());
        let next = prev.translated(0.0, -8.0);

        assert!(model.blocks(&prev, &next, Direction::Up));
    }

    #[test]
    fn jumping_down_a_ledge_from_above_is_allowed() {
        let model = CollisionModel::new(Vec::new(), vec![ledge()]);
        let prev = Rect::new(150.0, 180.0, 25.0, 18.0);
        assert!(prev.bottom() <= ledge().top());

        let mut current = prev;
        for _ in 0..10 {
            let next = current.translated(0.0, 10.0);
            assert!(!model.blocks(&prev, &next, Direction::Down));
            current = next;
        }
    }

    #[test]
    fn ledge_outside_horizontal_span_never_blocks() {
        let model = CollisionModel::new(Vec::new(), vec![ledge()]);
        let prev = Rect::new(320.0, 220.0, 25.0, 18.0);
        let next = prev.translated(0.0, -30.0);

        assert!(!model.blocks(&prev, &next, Direction::Up));
    }

    #[test]
    fn sideways_movement_through_a_ledge_is_free() {
        let model = CollisionModel::new(Vec::new(), vec![ledge()]);
        let prev = Rect::new(80.0, 195.0, 25.0, 18.0);
        let next = prev.translated(10.0, 0.0);

        assert!(!model.blocks(&prev, &next, Direction::Right));
    }
}
