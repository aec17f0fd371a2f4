//! Arrow shape.

use super::{Anchor, ShapeId, ShapeTrait};
use crate::geometry::point_segment_distance;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the two ends of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// The other end of the arrow.
    pub fn opposite(self) -> Endpoint {
        match self {
            Endpoint::Start => Endpoint::End,
            Endpoint::End => Endpoint::Start,
        }
    }
}

/// A straight connector with an arrowhead at `end`.
///
/// While an endpoint is snapped, its coordinate is a cache of the anchor's
/// live point and is refreshed by the diagram's cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point (where the arrowhead points).
    pub end: Point,
    #[serde(default)]
    pub snapped_start: Option<Anchor>,
    #[serde(default)]
    pub snapped_end: Option<Anchor>,
}

impl Arrow {
    /// Create a new unsnapped arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            snapped_start: None,
            snapped_end: None,
        }
    }

    /// Coordinate of `endpoint`.
    pub fn point(&self, endpoint: Endpoint) -> Point {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    /// Anchor `endpoint` is snapped to, if any.
    pub fn snap(&self, endpoint: Endpoint) -> Option<Anchor> {
        match endpoint {
            Endpoint::Start => self.snapped_start,
            Endpoint::End => self.snapped_end,
        }
    }

    /// Set an endpoint's coordinate and its snap reference together.
    pub fn set_endpoint(&mut self, endpoint: Endpoint, point: Point, snap: Option<Anchor>) {
        match endpoint {
            Endpoint::Start => {
                self.start = point;
                self.snapped_start = snap;
            }
            Endpoint::End => {
                self.end = point;
                self.snapped_end = snap;
            }
        }
    }

    /// Whether either endpoint references the shape `id`.
    pub fn is_attached_to(&self, id: ShapeId) -> bool {
        self.snapped_start.is_some_and(|a| a.shape_id == id)
            || self.snapped_end.is_some_and(|a| a.shape_id == id)
    }

    /// Detach both endpoints, keeping their coordinates.
    pub fn clear_snaps(&mut self) {
        self.snapped_start = None;
        self.snapped_end = None;
    }

    /// Translate only the endpoints that are not snapped.
    pub fn translate_free(&mut self, delta: Vec2) {
        if self.snapped_start.is_none() {
            self.start += delta;
        }
        if self.snapped_end.is_none() {
            self.end += delta;
        }
    }

    /// Endpoint within `radius` of `point`, preferring the end.
    pub fn endpoint_at(&self, point: Point, radius: f64) -> Option<Endpoint> {
        if (point - self.end).hypot() <= radius {
            Some(Endpoint::End)
        } else if (point - self.start).hypot() <= radius {
            Some(Endpoint::Start)
        } else {
            None
        }
    }

    /// Distance from start to end.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_segment_distance(point, self.start, self.end) <= tolerance
    }

    /// The shaft only. The head is sized by [`crate::EditorConfig`] and
    /// comes from [`crate::geometry::arrow_head_polygon`] at render time.
    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
