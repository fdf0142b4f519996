//! Axis-aligned integer rectangles.
//!
//! [`TextRect`] is the single geometric primitive of the pipeline. Rectangles
//! are half-open: a rectangle covers columns `x..x + width` and rows
//! `y..y + height`. Coordinates are signed so that inflation near the image
//! border can be expressed before clamping.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl TextRect {
    /// Creates a rectangle from its origin and size.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from half-open edges. Inverted edges yield an
    /// empty rectangle anchored at `left, top`.
    #[inline]
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, (right - left).max(0), (bottom - top).max(0))
    }

    /// Creates the rectangle covering the inclusive pixel span `min..=max`.
    #[inline]
    pub fn from_inclusive(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self::from_edges(min_x, min_y, max_x + 1, max_y + 1)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Area in pixels; zero for empty rectangles.
    #[inline]
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Returns true if the rectangle covers no pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Width divided by height, or 0.0 for a rectangle without height.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height <= 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Vertical center.
    pub fn center_y(&self) -> f32 {
        self.y as f32 + self.height as f32 / 2.0
    }

    /// Grows the rectangle by `amount` pixels on every side.
    pub fn inflate(&self, amount: i32) -> Self {
        Self::from_edges(
            self.left() - amount,
            self.top() - amount,
            self.right() + amount,
            self.bottom() + amount,
        )
    }

    /// Smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Overlapping part of both rectangles, if any.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let rect = Self::from_edges(
            self.left().max(other.left()),
            self.top().max(other.top()),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        );
        (!rect.is_empty()).then_some(rect)
    }

    /// Returns true if both rectangles share at least one pixel.
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersection(other).is_some()
    }

    /// Returns true if `other` lies completely inside this rectangle.
    pub fn contains(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Clips the rectangle to `0..width` x `0..height`. The result may be empty.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let (w, h) = (width as i32, height as i32);
        Self::from_edges(
            self.left().clamp(0, w),
            self.top().clamp(0, h),
            self.right().clamp(0, w),
            self.bottom().clamp(0, h),
        )
    }

    /// Number of rows shared by both rectangles.
    pub fn vertical_overlap(&self, other: &Self) -> i32 {
        (self.bottom().min(other.bottom()) - self.top().max(other.top())).max(0)
    }

    /// Shared rows relative to the smaller of both heights.
    pub fn vertical_overlap_ratio(&self, other: &Self) -> f32 {
        let min_height = self.height.min(other.height);
        if min_height <= 0 {
            return 0.0;
        }
        self.vertical_overlap(other) as f32 / min_height as f32
    }

    /// Empty columns between both rectangles; zero when they overlap horizontally.
    pub fn horizontal_gap(&self, other: &Self) -> i32 {
        (self.left().max(other.left()) - self.right().min(other.right())).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_area() {
        let rect = TextRect::new(10, 20, 30, 5);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.bottom(), 25);
        assert_eq!(rect.area(), 150);
        assert_eq!(TextRect::from_inclusive(0, 0, 0, 0), TextRect::new(0, 0, 1, 1));
    }

    #[test]
    fn test_touching_rectangles_do_not_intersect() {
        let a = TextRect::new(0, 0, 10, 10);
        let b = TextRect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(a.inflate(1).intersects(&b));
        assert_eq!(a.horizontal_gap(&b), 0);
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = TextRect::new(5, 5, 10, 10);
        assert_eq!(a.union(&TextRect::default()), a);
        assert_eq!(
            a.union(&TextRect::new(30, 0, 5, 5)),
            TextRect::from_edges(5, 0, 35, 15)
        );
    }

    #[test]
    fn test_clamp_to_image() {
        let rect = TextRect::new(-3, -3, 20, 20).clamp_to(10, 8);
        assert_eq!(rect, TextRect::new(0, 0, 10, 8));
        assert!(TextRect::new(50, 50, 5, 5).clamp_to(10, 10).is_empty());
    }

    #[test]
    fn test_overlap_ratio_uses_smaller_height() {
        let tall = TextRect::new(0, 0, 10, 40);
        let short = TextRect::new(20, 10, 10, 10);
        assert_eq!(tall.vertical_overlap(&short), 10);
        assert_eq!(tall.vertical_overlap_ratio(&short), 1.0);
        assert_eq!(tall.horizontal_gap(&short), 10);
    }
}
