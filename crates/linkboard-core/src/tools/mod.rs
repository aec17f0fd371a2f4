//! Drawing tools and the in-progress draw gesture.

use crate::shapes::{Arrow, Rectangle, Shape, ShapeId, Text};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Tools that create shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Rectangle,
    Arrow,
    Text,
}

impl ToolKind {
    /// Zero-size (or zero-length) shape seeded at `origin`.
    pub fn create_shape(self, origin: Point) -> Shape {
        match self {
            ToolKind::Rectangle => Shape::Rectangle(Rectangle::new(origin, 0.0, 0.0)),
            ToolKind::Arrow => Shape::Arrow(Arrow::new(origin, origin)),
            ToolKind::Text => Shape::Text(Text::new(origin, 0.0, 0.0, String::new())),
        }
    }
}

/// Descriptor of a draw gesture between pointer-down and pointer-up.
#[derive(Debug, Clone)]
pub struct DrawGesture {
    pub shape_id: ShapeId,
    pub tool: ToolKind,
    /// Fixed corner (or arrow start) where the gesture began.
    pub origin: Point,
    started_at: Instant,
}

impl DrawGesture {
    /// Start timing a gesture for `shape_id`.
    pub fn new(shape_id: ShapeId, tool: ToolKind, origin: Point) -> Self {
        Self {
            shape_id,
            tool,
            origin,
            started_at: Instant::now(),
        }
    }

    /// Time since the gesture began.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ShapeKind, ShapeTrait};

    #[test]
    fn test_create_shape_is_degenerate() {
        let origin = Point::new(12.0, 34.0);
        for (tool, kind) in [
            (ToolKind::Rectangle, ShapeKind::Rectangle),
            (ToolKind::Arrow, ShapeKind::Arrow),
            (ToolKind::Text, ShapeKind::Text),
        ] {
            let shape = tool.create_shape(origin);
            assert_eq!(shape.kind(), kind);
            let bounds = shape.bounds();
            assert_eq!(bounds.origin(), origin);
            assert!(bounds.area().abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_gesture_elapsed_is_monotonic() {
        let rect = Rectangle::new(Point::ZERO, 0.0, 0.0);
        let gesture = DrawGesture::new(rect.id(), ToolKind::Rectangle, Point::ZERO);
        let first = gesture.elapsed();
        assert!(gesture.elapsed() >= first);
    }
}
