//! Free-standing text label.

use super::{ShapeId, ShapeTrait};
use crate::geometry::point_in_rect;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text label occupying a box. Not connectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left corner of the text box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// The text content.
    #[serde(default)]
    pub content: String,
}

impl Text {
    /// Create a new text shape.
    pub fn new(position: Point, width: f64, height: f64, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: width.max(0.0),
            height: height.max(0.0),
            content,
        }
    }

    /// Get the text box as a kurbo Rect.
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
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_in_rect(point, self.as_rect(), tolerance)
    }

    // Glyphs are laid out by the renderer; the path is the text box.
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
    fn test_text_creation() {
        let text = Text::new(Point::new(5.0, 6.0), 80.0, 20.0, "label".to_string());
        assert_eq!(text.content, "label");
        assert_eq!(text.bounds(), Rect::new(5.0, 6.0, 85.0, 26.0));
    }

    #[test]
    fn test_text_hit_test() {
        let text = Text::new(Point::ZERO, 80.0, 20.0, String::new());
        assert!(text.hit_test(Point::new(40.0, 10.0), 0.0));
        assert!(text.hit_test(Point::new(84.0, 10.0), 5.0));
        assert!(!text.hit_test(Point::new(86.0, 10.0), 5.0));
    }
}
