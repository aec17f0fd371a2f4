//! Shape definitions for the diagram.

mod arrow;
mod rectangle;
mod text;

pub use arrow::{Arrow, Endpoint};
pub use rectangle::Rectangle;
pub use text::Text;

use crate::config::EditorConfig;
use crate::error::DiagramError;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Edge midpoint of a rectangle that a connector can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl AnchorSide {
    /// All sides, in snap-resolution order.
    pub const ALL: [AnchorSide; 4] = [
        AnchorSide::Left,
        AnchorSide::Right,
        AnchorSide::Top,
        AnchorSide::Bottom,
    ];

    /// Lowercase side name, as used in serialized anchors.
    pub fn name(self) -> &'static str {
        match self {
            AnchorSide::Left => "left",
            AnchorSide::Right => "right",
            AnchorSide::Top => "top",
            AnchorSide::Bottom => "bottom",
        }
    }
}

impl fmt::Display for AnchorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnchorSide {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(AnchorSide::Left),
            "right" => Ok(AnchorSide::Right),
            "top" => Ok(AnchorSide::Top),
            "bottom" => Ok(AnchorSide::Bottom),
            other => Err(DiagramError::InvalidAnchor(other.to_string())),
        }
    }
}

/// Weak reference from a connector endpoint to a rectangle's edge midpoint.
///
/// Stores no coordinates: the point is always resolved through the live
/// rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub shape_id: ShapeId,
    pub side: AnchorSide,
}

impl Anchor {
    /// Create an anchor on `side` of rectangle `shape_id`.
    pub fn new(shape_id: ShapeId, side: AnchorSide) -> Self {
        Self { shape_id, side }
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point hits this shape, allowing `tolerance` of slack.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Translate the shape by `delta`.
    fn translate(&mut self, delta: Vec2);
}

/// Discriminant of [`Shape`], used for tools and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Arrow,
    Text,
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Arrow(Arrow),
    Text(Text),
}

impl Shape {
    /// Get the shape's id.
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Arrow(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    /// Get the shape's kind.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    /// Raw hit test with an explicit tolerance.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Arrow(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
        }
    }

    /// Selectable-region test using the configured buffer and tolerances.
    ///
    /// Arrows hit on the shaft within `arrow_tolerance` or within
    /// `hit_buffer` of either endpoint, so endpoint handles stay grabbable.
    pub fn hits(&self, point: Point, config: &EditorConfig) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, config.hit_buffer),
            Shape::Text(s) => s.hit_test(point, config.hit_buffer),
            Shape::Arrow(s) => {
                s.hit_test(point, config.arrow_tolerance)
                    || s.endpoint_at(point, config.hit_buffer).is_some()
            }
        }
    }

    /// Outline path.
    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Arrow(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
        }
    }

    /// Translate every point of the shape by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rectangle(s) => s.translate(delta),
            Shape::Arrow(s) => s.translate(delta),
            Shape::Text(s) => s.translate(delta),
        }
    }

    /// Get the rectangle if this shape is a rectangle.
    pub fn as_rectangle(&self) -> Option<&Rectangle> {
        match self {
            Shape::Rectangle(r) => Some(r),
            _ => None,
        }
    }

    /// Get the arrow if this shape is an arrow.
    pub fn as_arrow(&self) -> Option<&Arrow> {
        match self {
            Shape::Arrow(a) => Some(a),
            _ => None,
        }
    }

    /// Get the mutable arrow if this shape is an arrow.
    pub fn as_arrow_mut(&mut self) -> Option<&mut Arrow> {
        match self {
            Shape::Arrow(a) => Some(a),
            _ => None,
        }
    }

    /// Check if this shape carries editable text.
    pub fn supports_text(&self) -> bool {
        matches!(self, Shape::Rectangle(_) | Shape::Text(_))
    }

    /// Text content, if this shape carries any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Shape::Rectangle(r) => Some(&r.text),
            Shape::Text(t) => Some(&t.content),
            Shape::Arrow(_) => None,
        }
    }

    /// Replace the text content. Returns false for shapes without text.
    pub fn set_text(&mut self, text: String) -> bool {
        match self {
            Shape::Rectangle(r) => {
                r.text = text;
                true
            }
            Shape::Text(t) => {
                t.content = text;
                true
            }
            Shape::Arrow(_) => false,
        }
    }

    /// Box geometry of a rectangle or text shape.
    pub fn frame(&self) -> Option<Rect> {
        match self {
            Shape::Rectangle(r) => Some(r.as_rect()),
            Shape::Text(t) => Some(t.as_rect()),
            Shape::Arrow(_) => None,
        }
    }

    /// Replace the box geometry of a rectangle or text shape.
    pub fn set_frame(&mut self, rect: Rect) -> bool {
        match self {
            Shape::Rectangle(r) => {
                r.set_rect(rect);
                true
            }
            Shape::Text(t) => {
                t.set_rect(rect);
                true
            }
            Shape::Arrow(_) => false,
        }
    }

    /// Regenerate the shape's ID with a new unique identifier.
    /// Used when duplicating or pasting shapes.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Rectangle(s) => s.id = new_id,
            Shape::Arrow(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
        }
    }

    /// Copy with a fresh id and no snap references, ready for insertion.
    pub fn detached_copy(&self) -> Shape {
        let mut copy = self.clone();
        copy.regenerate_id();
        if let Shape::Arrow(arrow) = &mut copy {
            arrow.clear_snaps();
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_side_parse() {
        assert_eq!("left".parse::<AnchorSide>().unwrap(), AnchorSide::Left);
        assert_eq!("bottom".parse::<AnchorSide>().unwrap(), AnchorSide::Bottom);
        assert!(matches!(
            "middle".parse::<AnchorSide>(),
            Err(DiagramError::InvalidAnchor(_))
        ));
    }

    #[test]
    fn test_anchor_side_name_roundtrip() {
        for side in AnchorSide::ALL {
            assert_eq!(side.name().parse::<AnchorSide>().unwrap(), side);
            assert_eq!(side.to_string(), side.name());
        }
    }

    #[test]
    fn test_text_access() {
        let mut rect = Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        let mut arrow = Shape::Arrow(Arrow::new(Point::ZERO, Point::new(10.0, 0.0)));

        assert!(rect.set_text("hello".to_string()));
        assert_eq!(rect.text(), Some("hello"));
        assert!(!arrow.set_text("ignored".to_string()));
        assert_eq!(arrow.text(), None);
    }

    #[test]
    fn test_detached_copy_strips_snaps() {
        let target = Rectangle::new(Point::ZERO, 100.0, 80.0);
        let mut arrow = Arrow::new(Point::ZERO, Point::new(100.0, 40.0));
        arrow.snapped_end = Some(Anchor::new(target.id(), AnchorSide::Right));
        let shape = Shape::Arrow(arrow);

        let copy = shape.detached_copy();
        assert_ne!(copy.id(), shape.id());
        let copied = copy.as_arrow().unwrap();
        assert!(copied.snapped_start.is_none());
        assert!(copied.snapped_end.is_none());
        assert_eq!(copied.end, Point::new(100.0, 40.0));
    }

    #[test]
    fn test_paths_cover_bounds() {
        let shapes = [
            Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 50.0)),
            Shape::Text(Text::new(Point::ZERO, 40.0, 20.0, "t".to_string())),
            Shape::Arrow(Arrow::new(Point::ZERO, Point::new(100.0, 0.0))),
        ];
        for shape in &shapes {
            let path = shape.to_path();
            assert!(path.elements().len() > 1);
            let path_bounds = kurbo::Shape::bounding_box(&path);
            assert!(path_bounds.union(shape.bounds()) == path_bounds);
        }
    }

    #[test]
    fn test_arrow_hits_near_endpoint() {
        let config = EditorConfig {
            arrow_tolerance: 1.0,
            hit_buffer: 5.0,
            ..EditorConfig::default()
        };
        let arrow = Shape::Arrow(Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
        // Beyond the shaft tolerance but within the endpoint buffer.
        assert!(arrow.hits(Point::new(103.0, 3.0), &config));
        assert!(!arrow.hits(Point::new(50.0, 3.0), &config));
    }
}
