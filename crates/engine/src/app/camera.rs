use super::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSize {
    pub width: f32,
    pub height: f32,
}

impl ViewSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Follow camera. `origin` is the top-left corner of the visible window in
/// map space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera2D {
    pub origin: Vec2,
}

impl Camera2D {
    pub fn follow(&mut self, entity_center: Vec2, viewport: ViewSize, map: ViewSize) {
        self.origin = compute_view_origin(entity_center, viewport, map);
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2 {
            x: world.x - self.origin.x,
            y: world.y - self.origin.y,
        }
    }
}

/// Centers the viewport on `entity_center` and clamps each axis into
/// `[0, map - viewport]`. An axis where the map is not larger than the
/// viewport collapses to zero.
pub fn compute_view_origin(entity_center: Vec2, viewport: ViewSize, map: ViewSize) -> Vec2 {
    Vec2 {
        x: clamp_axis(entity_center.x - viewport.width * 0.5, map.width - viewport.width),
        y: clamp_axis(
            entity_center.y - viewport.height * 0.5,
            map.height - viewport.height,
        ),
    }
}

fn clamp_axis(value: f32, max: f32) -> f32 {
    let max = max.max(0.0);
    value.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: ViewSize = ViewSize::new(525.0, 450.0);

    #[test]
    fn centers_on_entity_away_from_edges() {
        let origin = compute_view_origin(
            Vec2::new(500.0, 500.0),
            VIEW,
            ViewSize::new(1000.0, 1000.0),
        );
        assert_eq!(origin, Vec2::new(237.5, 275.0));
    }

    #[test]
    fn clamps_at_map_edges() {
        let map = ViewSize::new(1000.0, 1667.0);
        let top_left = compute_view_origin(Vec2::new(10.0, 10.0), VIEW, map);
        let bottom_right = compute_view_origin(Vec2::new(990.0, 1660.0), VIEW, map);

        assert_eq!(top_left, Vec2::ZERO);
        assert_eq!(bottom_right, Vec2::new(475.0, 1217.0));
    }

    #[test]
    fn small_map_axis_collapses_to_zero() {
        let origin = compute_view_origin(
            Vec2::new(300.0, 300.0),
            VIEW,
            ViewSize::new(438.0, 455.0),
        );
        assert_eq!(origin.x, 0.0);
        assert!((0.0..=5.0).contains(&origin.y));
    }

    #[test]
    fn origin_stays_in_bounds_for_sampled_positions() {
        let map = ViewSize::new(1000.0, 1667.0);
        let mut camera = Camera2D::default();
        for ix in 0..=20 {
            for iy in 0..=20 {
                let center = Vec2::new(ix as f32 * 55.0 - 50.0, iy as f32 * 90.0 - 50.0);
                camera.follow(center, VIEW, map);
                assert!((0.0..=map.width - VIEW.width).contains(&camera.origin.x));
                assert!((0.0..=map.height - VIEW.height).contains(&camera.origin.y));
            }
        }
    }

    #[test]
    fn to_screen_subtracts_origin() {
        let camera = Camera2D {
            origin: Vec2::new(100.0, 40.0),
        };
        assert_eq!(camera.to_screen(Vec2::new(150.0, 50.0)), Vec2::new(50.0, 10.0));
    }
}
