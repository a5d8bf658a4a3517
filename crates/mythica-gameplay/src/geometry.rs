//! Axis-aligned rectangles for hitboxes and visual bounds.
//!
//! Rectangles store their edges rather than origin and size, so clamping an
//! edge to an obstacle's edge is exact and a clamped hitbox never overlaps
//! the obstacle it was clamped against.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box. `y` grows downwards (screen space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    /// Minimum X coordinate (left edge)
    pub min_x: f32,
    /// Minimum Y coordinate (top edge)
    pub min_y: f32,
    /// Maximum X coordinate (right edge)
    pub max_x: f32,
    /// Maximum Y coordinate (bottom edge)
    pub max_y: f32,
}

impl AABB {
    /// Creates a new AABB from its edges.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates an AABB from its top-left corner and size.
    #[must_use]
    pub fn from_top_left(top_left: Vec2, width: f32, height: f32) -> Self {
        Self::new(
            top_left.x,
            top_left.y,
            top_left.x + width,
            top_left.y + height,
        )
    }

    /// Creates an AABB from center and half-extents.
    #[must_use]
    pub fn from_center(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates an AABB whose left edge midpoint sits at `point`.
    #[must_use]
    pub fn from_mid_left(point: Vec2, width: f32, height: f32) -> Self {
        Self::from_top_left(Vec2::new(point.x, point.y - height / 2.0), width, height)
    }

    /// Creates an AABB whose right edge midpoint sits at `point`.
    #[must_use]
    pub fn from_mid_right(point: Vec2, width: f32, height: f32) -> Self {
        Self::from_top_left(
            Vec2::new(point.x - width, point.y - height / 2.0),
            width,
            height,
        )
    }

    /// Creates an AABB whose top edge midpoint sits at `point`.
    #[must_use]
    pub fn from_mid_top(point: Vec2, width: f32, height: f32) -> Self {
        Self::from_top_left(Vec2::new(point.x - width / 2.0, point.y), width, height)
    }

    /// Creates an AABB whose bottom edge midpoint sits at `point`.
    #[must_use]
    pub fn from_mid_bottom(point: Vec2, width: f32, height: f32) -> Self {
        Self::from_top_left(
            Vec2::new(point.x - width / 2.0, point.y - height),
            width,
            height,
        )
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the top-left corner.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.min_x, self.min_y)
    }

    /// Midpoint of the left edge.
    #[must_use]
    pub fn mid_left(&self) -> Vec2 {
        Vec2::new(self.min_x, self.center().y)
    }

    /// Midpoint of the right edge.
    #[must_use]
    pub fn mid_right(&self) -> Vec2 {
        Vec2::new(self.max_x, self.center().y)
    }

    /// Midpoint of the top edge.
    #[must_use]
    pub fn mid_top(&self) -> Vec2 {
        Vec2::new(self.center().x, self.min_y)
    }

    /// Midpoint of the bottom edge.
    #[must_use]
    pub fn mid_bottom(&self) -> Vec2 {
        Vec2::new(self.center().x, self.max_y)
    }

    /// Returns the width of the AABB.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the AABB.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Checks if this AABB overlaps with another. Touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &AABB) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Returns the AABB translated by a vector.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Grows (or with negative values, shrinks) the AABB around its center.
    /// `dw` and `dh` are the total change in width and height.
    #[must_use]
    pub fn inflated(&self, dw: f32, dh: f32) -> Self {
        let center = self.center();
        let half_width = ((self.width() + dw) / 2.0).max(0.0);
        let half_height = ((self.height() + dh) / 2.0).max(0.0);
        Self::from_center(center, half_width, half_height)
    }

    /// Returns the same-sized AABB moved so its center sits at `center`.
    #[must_use]
    pub fn recentered(&self, center: Vec2) -> Self {
        self.translated(center - self.center())
    }

    /// Moves the AABB horizontally so its right edge equals `x`.
    pub fn set_right(&mut self, x: f32) {
        let width = self.width();
        self.max_x = x;
        self.min_x = x - width;
    }

    /// Moves the AABB horizontally so its left edge equals `x`.
    pub fn set_left(&mut self, x: f32) {
        let width = self.width();
        self.min_x = x;
        self.max_x = x + width;
    }

    /// Moves the AABB vertically so its bottom edge equals `y`.
    pub fn set_bottom(&mut self, y: f32) {
        let height = self.height();
        self.max_y = y;
        self.min_y = y - height;
    }

    /// Moves the AABB vertically so its top edge equals `y`.
    pub fn set_top(&mut self, y: f32) {
        let height = self.height();
        self.min_y = y;
        self.max_y = y + height;
    }
}

impl Default for AABB {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}
