//! Spatial mover and collision resolver.
//!
//! Movement is axis-separated: the hitbox moves horizontally and is resolved
//! against the obstacle set, then the same happens vertically. The order is
//! fixed (horizontal first) so that diagonal moves into a corner always end
//! in the same place.
//!
//! Resolution along an axis is swept. Every obstacle that lies ahead of the
//! leading edge and intersects the swept region is a candidate, and the
//! leading edge is clamped to the nearest candidate edge. Obstacles the
//! hitbox already overlaps before the step are not corrected.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::AABB;

/// A read-only collection of static obstacle hitboxes.
pub trait ObstacleSet {
    /// Iterates every obstacle hitbox.
    fn hitboxes(&self) -> impl Iterator<Item = &AABB>;
}

impl ObstacleSet for [AABB] {
    fn hitboxes(&self) -> impl Iterator<Item = &AABB> {
        self.iter()
    }
}

impl ObstacleSet for Vec<AABB> {
    fn hitboxes(&self) -> impl Iterator<Item = &AABB> {
        self.iter()
    }
}

/// Hitbox inset relative to the visual bounds, as total width/height change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxInset {
    /// Change in width
    pub dw: f32,
    /// Change in height
    pub dh: f32,
}

impl HitboxInset {
    /// Player hitbox inset.
    pub const PLAYER: Self = Self::new(-6.0, -26.0);
    /// Enemy hitbox inset.
    pub const ENEMY: Self = Self::new(0.0, -10.0);
    /// Large object inset.
    pub const OBJECT: Self = Self::new(0.0, -40.0);
    /// Grass tile inset.
    pub const GRASS: Self = Self::new(0.0, -10.0);
    /// Invisible boundary inset.
    pub const NONE: Self = Self::new(0.0, 0.0);

    /// Creates a new inset.
    #[must_use]
    pub const fn new(dw: f32, dh: f32) -> Self {
        Self { dw, dh }
    }

    /// Applies the inset to visual bounds.
    #[must_use]
    pub fn apply(self, rect: &AABB) -> AABB {
        rect.inflated(self.dw, self.dh)
    }
}

/// Moves `hitbox` by `direction * speed` against `obstacles` and returns the
/// resolved hitbox.
///
/// `direction` is normalized first; a zero direction produces no movement.
#[must_use]
pub fn move_and_collide<O: ObstacleSet + ?Sized>(
    hitbox: AABB,
    direction: Vec2,
    speed: f32,
    obstacles: &O,
) -> AABB {
    let direction = direction.normalize_or_zero();
    let mut resolved = hitbox;
    sweep_horizontal(&mut resolved, direction.x * speed, obstacles);
    sweep_vertical(&mut resolved, direction.y * speed, obstacles);
    resolved
}

fn sweep_horizontal<O: ObstacleSet + ?Sized>(hitbox: &mut AABB, dx: f32, obstacles: &O) {
    if dx == 0.0 {
        return;
    }
    let start = *hitbox;
    let moved = start.translated(Vec2::new(dx, 0.0));
    let swept = AABB::new(
        start.min_x.min(moved.min_x),
        start.min_y,
        start.max_x.max(moved.max_x),
        start.max_y,
    );
    *hitbox = moved;

    if dx > 0.0 {
        let limit = obstacles
            .hitboxes()
            .filter(|obstacle| obstacle.min_x >= start.max_x && obstacle.overlaps(&swept))
            .map(|obstacle| obstacle.min_x)
            .fold(moved.max_x, f32::min);
        if limit <= start.max_x {
            *hitbox = start;
        } else if limit < moved.max_x {
            hitbox.set_right(limit);
        }
    } else {
        let limit = obstacles
            .hitboxes()
            .filter(|obstacle| obstacle.max_x <= start.min_x && obstacle.overlaps(&swept))
            .map(|obstacle| obstacle.max_x)
            .fold(moved.min_x, f32::max);
        if limit >= start.min_x {
            *hitbox = start;
        } else if limit > moved.min_x {
            hitbox.set_left(limit);
        }
    }
}

fn sweep_vertical<O: ObstacleSet + ?Sized>(hitbox: &mut AABB, dy: f32, obstacles: &O) {
    if dy == 0.0 {
        return;
    }
    let start = *hitbox;
    let moved = start.translated(Vec2::new(0.0, dy));
    let swept = AABB::new(
        start.min_x,
        start.min_y.min(moved.min_y),
        start.max_x,
        start.max_y.max(moved.max_y),
    );
    *hitbox = moved;

    if dy > 0.0 {
        let limit = obstacles
            .hitboxes()
            .filter(|obstacle| obstacle.min_y >= start.max_y && obstacle.overlaps(&swept))
            .map(|obstacle| obstacle.min_y)
            .fold(moved.max_y, f32::min);
        if limit <= start.max_y {
            *hitbox = start;
        } else if limit < moved.max_y {
            hitbox.set_bottom(limit);
        }
    } else {
        let limit = obstacles
            .hitboxes()
            .filter(|obstacle| obstacle.max_y <= start.min_y && obstacle.overlaps(&swept))
            .map(|obstacle| obstacle.max_y)
            .fold(moved.min_y, f32::max);
        if limit >= start.min_y {
            *hitbox = start;
        } else if limit > moved.min_y {
            hitbox.set_top(limit);
        }
    }
}

/// Movement capability shared by every actor kind.
///
/// A body couples the visual bounds with the (smaller) collision hitbox and
/// keeps them centered on each other after every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Visual bounds (sprite rectangle)
    pub rect: AABB,
    /// Collision hitbox
    pub hitbox: AABB,
    /// Requested movement direction; normalized when applied
    pub direction: Vec2,
}

impl Body {
    /// Creates a body from its visual bounds and class inset.
    #[must_use]
    pub fn new(rect: AABB, inset: HitboxInset) -> Self {
        Self {
            rect,
            hitbox: inset.apply(&rect),
            direction: Vec2::ZERO,
        }
    }

    /// Creates a body whose `size`-sized visual bounds start at `top_left`.
    #[must_use]
    pub fn at(top_left: Vec2, size: Vec2, inset: HitboxInset) -> Self {
        Self::new(AABB::from_top_left(top_left, size.x, size.y), inset)
    }

    /// Center of the body.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.hitbox.center()
    }

    /// Moves the body along its direction and recenters the visual bounds.
    pub fn step<O: ObstacleSet + ?Sized>(&mut self, speed: f32, obstacles: &O) {
        self.hitbox = move_and_collide(self.hitbox, self.direction, speed, obstacles);
        self.rect = self.rect.recentered(self.hitbox.center());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(x: f32, y: f32, size: f32) -> AABB {
        AABB::from_top_left(Vec2::new(x, y), size, size)
    }

    #[test]
    fn test_zero_direction_does_not_move() {
        let hitbox = square(0.0, 0.0, 10.0);
        let obstacles: Vec<AABB> = Vec::new();
        let moved = move_and_collide(hitbox, Vec2::ZERO, 5.0, &obstacles);
        assert_eq!(moved, hitbox);
    }

    #[test]
    fn test_direction_is_normalized() {
        let hitbox = square(0.0, 0.0, 10.0);
        let obstacles: Vec<AABB> = Vec::new();
        let moved = move_and_collide(hitbox, Vec2::new(3.0, 4.0), 5.0, &obstacles);
        assert!((moved.min_x - 3.0).abs() < 1e-4);
        assert!((moved.min_y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamps_against_wall_moving_right() {
        let hitbox = square(0.0, 0.0, 10.0);
        let wall = vec![square(12.0, 0.0, 10.0)];
        let moved = move_and_collide(hitbox, Vec2::X, 5.0, &wall);
        assert_eq!(moved.max_x, 12.0);
        assert!(!moved.overlaps(&wall[0]));
    }

    #[test]
    fn test_clamps_against_wall_moving_up() {
        let hitbox = square(0.0, 20.0, 10.0);
        let wall = vec![square(0.0, 0.0, 18.0)];
        let moved = move_and_collide(hitbox, Vec2::NEG_Y, 5.0, &wall);
        assert_eq!(moved.min_y, 18.0);
    }

    #[test]
    fn test_does_not_tunnel_through_thin_wall() {
        let hitbox = square(0.0, 0.0, 10.0);
        let wall = vec![AABB::new(30.0, -50.0, 31.0, 50.0)];
        let moved = move_and_collide(hitbox, Vec2::X, 100.0, &wall);
        assert_eq!(moved.max_x, 30.0);
    }

    #[test]
    fn test_nearest_obstacle_wins_regardless_of_order() {
        let hitbox = square(0.0, 0.0, 10.0);
        let near = square(15.0, 0.0, 10.0);
        let far = square(18.0, 0.0, 10.0);
        let a = move_and_collide(hitbox, Vec2::X, 20.0, &vec![near, far]);
        let b = move_and_collide(hitbox, Vec2::X, 20.0, &vec![far, near]);
        assert_eq!(a, b);
        assert_eq!(a.max_x, 15.0);
    }

    #[test]
    fn test_slides_along_wall() {
        // Wall on the right; diagonal move keeps the vertical component.
        let hitbox = square(0.0, 0.0, 10.0);
        let wall = vec![AABB::new(10.0, -100.0, 20.0, 100.0)];
        let moved = move_and_collide(hitbox, Vec2::new(1.0, 1.0), 10.0, &wall);
        assert_eq!(moved.max_x, 10.0);
        assert!(moved.min_y > 0.0);
    }

    #[test]
    fn test_corner_resolution_is_deterministic() {
        // Approaching the top-left corner of a block diagonally.
        let block = vec![square(20.0, 20.0, 20.0)];
        let start = square(5.0, 5.0, 10.0);
        let first = move_and_collide(start, Vec2::new(1.0, 1.0), 12.0, &block);
        for _ in 0..10 {
            assert_eq!(
                move_and_collide(start, Vec2::new(1.0, 1.0), 12.0, &block),
                first
            );
        }
        // Horizontal first: x moves freely (no vertical overlap yet), then y is clamped.
        assert!(!first.overlaps(&block[0]));
        assert_eq!(first.max_y, 20.0);
    }

    #[test]
    fn test_spawn_overlap_is_not_corrected() {
        let obstacle = square(0.0, 0.0, 20.0);
        let hitbox = square(5.0, 5.0, 5.0);
        let moved = move_and_collide(hitbox, Vec2::X, 1.0, &vec![obstacle]);
        assert_eq!(moved.min_x, 6.0);
    }

    #[test]
    fn test_body_recenters_visual_rect() {
        let mut body = Body::at(Vec2::ZERO, Vec2::splat(64.0), HitboxInset::PLAYER);
        body.direction = Vec2::new(1.0, 0.0);
        body.step(5.0, &Vec::<AABB>::new());
        assert_eq!(body.rect.center(), body.hitbox.center());
        assert_eq!(body.rect.width(), 64.0);
        assert!((body.rect.min_x - 5.0).abs() < 1e-4);
    }

    fn obstacle_strategy() -> impl Strategy<Value = AABB> {
        (-200.0f32..200.0, -200.0f32..200.0, 1.0f32..80.0, 1.0f32..80.0)
            .prop_map(|(x, y, w, h)| AABB::from_top_left(Vec2::new(x, y), w, h))
    }

    proptest! {
        #[test]
        fn prop_hitbox_never_overlaps_after_step(
            obstacles in prop::collection::vec(obstacle_strategy(), 0..12),
            start_x in -150.0f32..150.0,
            start_y in -150.0f32..150.0,
            size in 4.0f32..60.0,
            dir_x in -1.0f32..1.0,
            dir_y in -1.0f32..1.0,
            speed in 0.0f32..120.0,
        ) {
            let start = AABB::from_top_left(Vec2::new(start_x, start_y), size, size);
            prop_assume!(obstacles.iter().all(|o| !o.overlaps(&start)));

            let moved = move_and_collide(start, Vec2::new(dir_x, dir_y), speed, &obstacles);
            for obstacle in &obstacles {
                prop_assert!(!moved.overlaps(obstacle), "{moved:?} overlaps {obstacle:?}");
            }
        }

        #[test]
        fn prop_repeated_steps_keep_invariant(
            obstacles in prop::collection::vec(obstacle_strategy(), 0..8),
            dir_x in -1.0f32..1.0,
            dir_y in -1.0f32..1.0,
            speed in 0.5f32..20.0,
        ) {
            let start = AABB::from_top_left(Vec2::new(-2.0, -2.0), 4.0, 4.0);
            prop_assume!(obstacles.iter().all(|o| !o.overlaps(&start)));

            let mut hitbox = start;
            for _ in 0..30 {
                hitbox = move_and_collide(hitbox, Vec2::new(dir_x, dir_y), speed, &obstacles);
                for obstacle in &obstacles {
                    prop_assert!(!hitbox.overlaps(obstacle));
                }
            }
        }
    }
}
