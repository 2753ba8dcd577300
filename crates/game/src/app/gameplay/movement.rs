use std::time::Duration;

use engine::{Key, Rect, Vec2};
use serde::Deserialize;

use super::collision::{feet_rect, CollisionModel};
use super::session::PlayerState;
use super::timers::RepeatTimer;

pub(crate) const MICRO_STEP_PX: f32 = 5.0;
pub(crate) const REPEAT_INTERVAL: Duration = Duration::from_millis(100);
/// Repeat steps taken at base speed before switching to the ramp speed.
const RAMP_AFTER_STEPS: u32 = 3;
/// Walk bounds keep this much of the sprite inside on the right and bottom.
const BOUNDS_SPRITE_WIDTH: f32 = 25.0;
const BOUNDS_SPRITE_HEIGHT: f32 = 48.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub(crate) const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub(crate) fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }

    pub(crate) fn unit(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }

    /// Letter used in player sprite ids: Front, Back, Left, Right.
    pub(crate) fn sprite_letter(self) -> char {
        match self {
            Direction::Up => 'B',
            Direction::Down => 'F',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MovementProfile {
    pub(crate) base_speed: f32,
    pub(crate) ramp_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StepRequest {
    pub(crate) direction: Direction,
    pub(crate) distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    Moved,
    Blocked,
}

/// Held-key bookkeeping for one scene. The controller decides when and how
/// far to step; `advance_step` decides whether the step lands.
#[derive(Debug, Clone)]
pub(crate) struct MovementController {
    profile: MovementProfile,
    held: Vec<Direction>,
    step_counter: u32,
    repeat: RepeatTimer,
}

impl MovementController {
    pub(crate) fn new(profile: MovementProfile) -> Self {
        Self {
            profile,
            held: Vec::with_capacity(Direction::ALL.len()),
            step_counter: 0,
            repeat: RepeatTimer::new(REPEAT_INTERVAL),
        }
    }

    /// Registers a pressed direction and returns the immediate micro-step.
    pub(crate) fn key_down(&mut self, direction: Direction) -> StepRequest {
        self.held.retain(|held| *held != direction);
        self.held.push(direction);
        self.repeat.start();
        StepRequest {
            direction,
            distance: MICRO_STEP_PX,
        }
    }

    pub(crate) fn key_up(&mut self, direction: Direction) {
        self.held.retain(|held| *held != direction);
        if self.held.is_empty() {
            self.repeat.stop();
            self.step_counter = 0;
        }
    }

    /// Most recently pressed direction that is still held.
    pub(crate) fn active(&self) -> Option<Direction> {
        self.held.last().copied()
    }

    pub(crate) fn is_moving(&self) -> bool {
        !self.held.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn step_counter(&self) -> u32 {
        self.step_counter
    }

    /// Returns how many repeat steps are due.
    pub(crate) fn tick(&mut self, dt: Duration) -> u32 {
        self.repeat.tick(dt)
    }

    pub(crate) fn next_repeat_step(&mut self) -> Option<StepRequest> {
        let direction = self.active()?;
        let distance = if self.step_counter > RAMP_AFTER_STEPS {
            self.profile.ramp_speed
        } else {
            self.profile.base_speed
        };
        self.step_counter += 1;
        Some(StepRequest { direction, distance })
    }

    pub(crate) fn record(&mut self, outcome: StepOutcome) {
        if outcome == StepOutcome::Blocked {
            self.step_counter = 0;
        }
    }

    /// Called every tick while an overlay holds input.
    pub(crate) fn suspend(&mut self) {
        self.step_counter = 0;
    }

    pub(crate) fn reset(&mut self) {
        self.held.clear();
        self.repeat.stop();
        self.step_counter = 0;
    }
}

pub(crate) fn clamp_to_bounds(position: Vec2, bounds: Rect) -> Vec2 {
    let max_x = (bounds.right() - BOUNDS_SPRITE_WIDTH).max(bounds.left());
    let max_y = (bounds.bottom() - BOUNDS_SPRITE_HEIGHT).max(bounds.top());
    Vec2::new(
        position.x.clamp(bounds.left(), max_x),
        position.y.clamp(bounds.top(), max_y),
    )
}

/// The single path every player step takes, micro or repeat.
pub(crate) fn advance_step(
    player: &mut PlayerState,
    request: StepRequest,
    collision: &CollisionModel,
    walk_bounds: Rect,
) -> StepOutcome {
    player.facing = request.direction;
    let (ux, uy) = request.direction.unit();
    let candidate = clamp_to_bounds(
        player
            .position
            .offset(ux * request.distance, uy * request.distance),
        walk_bounds,
    );
    if candidate == player.position {
        return StepOutcome::Blocked;
    }

    let prev_feet = feet_rect(player.position);
    let next_feet = feet_rect(candidate);
    if collision.blocks(&prev_feet, &next_feet, request.direction) {
        return StepOutcome::Blocked;
    }

    player.position = candidate;
    player.advance_walk_frame();
    StepOutcome::Moved
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: MovementProfile = MovementProfile {
        base_speed: 8.0,
        ramp_speed: 10.0,
    };

    fn open_field() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 1000.0)
    }

    #[test]
    fn latest_pressed_direction_wins() {
        let mut controller = MovementController::new(PROFILE);
        controller.key_down(Direction::Up);
        controller.key_down(Direction::Left);
        assert_eq!(controller.active(), Some(Direction::Left));

        controller.key_up(Direction::Left);
        assert_eq!(controller.active(), Some(Direction::Up));
        assert!(controller.is_moving());

        controller.key_up(Direction::Up);
        assert_eq!(controller.active(), None);
        assert!(!controller.is_moving());
    }

    #[test]
    fn releasing_an_inactive_key_keeps_direction() {
        let mut controller = MovementController::new(PROFILE);
        controller.key_down(Direction::Up);
        controller.key_down(Direction::Right);
        controller.key_up(Direction::Up);

        assert_eq!(controller.active(), Some(Direction::Right));
    }

    #[test]
    fn key_down_yields_micro_step() {
        let mut controller = MovementController::new(PROFILE);
        let step = controller.key_down(Direction::Down);
        assert_eq!(
            step,
            StepRequest {
                direction: Direction::Down,
                distance: MICRO_STEP_PX
            }
        );
    }

    #[test]
    fn repeat_steps_ramp_after_three() {
        let mut controller = MovementController::new(PROFILE);
        controller.key_down(Direction::Right);
        assert_eq!(controller.tick(Duration::from_millis(99)), 0);
        assert_eq!(controller.tick(Duration::from_millis(1)), 1);

        let distances = (0..6)
            .map(|_| {
                controller
                    .next_repeat_step()
                    .expect("a direction is held")
                    .distance
            })
            .collect::<Vec<_>>();
        assert_eq!(distances, vec![8.0, 8.0, 8.0, 8.0, 10.0, 10.0]);
    }

    #[test]
    fn blocked_step_resets_ramp() {
        let mut controller = MovementController::new(PROFILE);
        controller.key_down(Direction::Right);
        for _ in 0..5 {
            controller.next_repeat_step();
        }
        controller.record(StepOutcome::Blocked);

        assert_eq!(controller.step_counter(), 0);
        let step = controller.next_repeat_step().expect("a direction is held");
        assert_eq!(step.distance, PROFILE.base_speed);
    }

    #[test]
    fn releasing_all_keys_stops_repeats() {
        let mut controller = MovementController::new(PROFILE);
        controller.key_down(Direction::Left);
        controller.next_repeat_step();
        controller.key_up(Direction::Left);

        assert_eq!(controller.step_counter(), 0);
        assert_eq!(controller.tick(Duration::from_secs(1)), 0);
        assert!(controller.next_repeat_step().is_none());
    }

    #[test]
    fn step_into_barrier_reverts() {
        let collision = CollisionModel::new(vec![Rect::new(0.0, 0.0, 1000.0, 100.0)], Vec::new());
        let mut player = PlayerState::at(Vec2::new(500.0, 72.0));
        let request = StepRequest {
            direction: Direction::Up,
            distance: 8.0,
        };

        let outcome = advance_step(&mut player, request, &collision, open_field());

        assert_eq!(outcome, StepOutcome::Blocked);
        assert_eq!(player.position, Vec2::new(500.0, 72.0));
        assert_eq!(player.facing, Direction::Up);
        assert_eq!(player.walk_frame, 0);
    }

    #[test]
    fn committed_step_advances_walk_frame() {
        let collision = CollisionModel::default();
        let mut player = PlayerState::at(Vec2::new(500.0, 500.0));
        let request = StepRequest {
            direction: Direction::Left,
            distance: 5.0,
        };

        for expected_frame in [1, 2, 0] {
            assert_eq!(
                advance_step(&mut player, request, &collision, open_field()),
                StepOutcome::Moved
            );
            assert_eq!(player.walk_frame, expected_frame);
        }
        assert_eq!(player.position, Vec2::new(485.0, 500.0));
    }

    #[test]
    fn position_is_clamped_to_walk_bounds() {
        let bounds = Rect::new(100.0, 100.0, 200.0, 200.0);
        assert_eq!(
            clamp_to_bounds(Vec2::new(90.0, 400.0), bounds),
            Vec2::new(100.0, 252.0)
        );
        assert_eq!(
            clamp_to_bounds(Vec2::new(290.0, 50.0), bounds),
            Vec2::new(275.0, 100.0)
        );
    }

    #[test]
    fn no_step_ever_leaves_player_feet_in_a_barrier() {
        let barriers = vec![
            Rect::new(200.0, 200.0, 100.0, 100.0),
            Rect::new(400.0, 0.0, 20.0, 1000.0),
        ];
        let collision = CollisionModel::new(barriers.clone(), Vec::new());
        let mut player = PlayerState::at(Vec2::new(150.0, 150.0));
        let pattern = [
            Direction::Right,
            Direction::Down,
            Direction::Right,
            Direction::Up,
            Direction::Down,
            Direction::Left,
        ];

        for (index, direction) in pattern.iter().cycle().take(300).enumerate() {
            let request = StepRequest {
                direction: *direction,
                distance: if index % 3 == 0 { 5.0 } else { 10.0 },
            };
            advance_step(&mut player, request, &collision, open_field());
            let feet = feet_rect(player.position);
            assert!(barriers.iter().all(|barrier| !feet.intersects(barrier)));
        }
    }
}
