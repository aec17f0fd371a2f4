//! Rectangle shape.

use super::{AnchorSide, ShapeId, ShapeTrait};
use crate::geometry::{anchor_point, point_in_rect};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A labelled box that connectors can attach to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Label text.
    #[serde(default)]
    pub text: String,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: width.max(0.0),
            height: height.max(0.0),
            text: String::new(),
        }
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// Replace position and size from a rect, normalizing negative extents.
    pub fn set_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        self.position = rect.origin();
        self.width = rect.width();
        self.height = rect.height();
    }

    /// Live position of the anchor on `side`.
    pub fn anchor(&self, side: AnchorSide) -> Point {
        anchor_point(self.as_rect(), side)
    }

    /// All four anchors in snap-resolution order.
    pub fn anchors(&self) -> [(AnchorSide, Point); 4] {
        AnchorSide::ALL.map(|side| (side, self.anchor(side)))
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_in_rect(point, self.as_rect(), tolerance)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
        assert!(rect.text.is_empty());
    }

    #[test]
    fn test_hit_test_with_buffer() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(rect.hit_test(Point::new(100.0, 100.0), 0.0)); // On the edge
        assert!(rect.hit_test(Point::new(105.0, 50.0), 5.0));
        assert!(!rect.hit_test(Point::new(105.0 + 1e-6, 50.0), 5.0));
    }

    #[test]
    fn test_zero_size_still_selectable() {
        let rect = Rectangle::new(Point::new(40.0, 40.0), 0.0, 0.0);
        assert!(rect.hit_test(Point::new(43.0, 37.0), 5.0));
    }

    #[test]
    fn test_set_rect_normalizes() {
        let mut rect = Rectangle::new(Point::ZERO, 10.0, 10.0);
        rect.set_rect(Rect::new(50.0, 60.0, 20.0, 30.0));
        assert_eq!(rect.position, Point::new(20.0, 30.0));
        assert!((rect.width - 30.0).abs() < f64::EPSILON);
        assert!((rect.height - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_anchors_follow_translate() {
        let mut rect = Rectangle::new(Point::ZERO, 100.0, 80.0);
        assert_eq!(rect.anchor(AnchorSide::Right), Point::new(100.0, 40.0));
        rect.translate(Vec2::new(50.0, 0.0));
        assert_eq!(rect.anchor(AnchorSide::Right), Point::new(150.0, 40.0));
    }
}
