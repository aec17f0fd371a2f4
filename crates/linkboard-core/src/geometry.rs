//! Pure geometry helpers shared by shapes, snapping and hit testing.

use crate::error::DiagramResult;
use crate::shapes::AnchorSide;
use kurbo::{Point, Rect, Vec2};

/// Point on the boundary of `rect` at the midpoint of the edge named by `side`.
pub fn anchor_point(rect: Rect, side: AnchorSide) -> Point {
    let center = rect.center();
    match side {
        AnchorSide::Left => Point::new(rect.x0, center.y),
        AnchorSide::Right => Point::new(rect.x1, center.y),
        AnchorSide::Top => Point::new(center.x, rect.y0),
        AnchorSide::Bottom => Point::new(center.x, rect.y1),
    }
}

/// Like [`anchor_point`], but takes the side by name.
pub fn anchor_point_named(rect: Rect, side: &str) -> DiagramResult<Point> {
    let side: AnchorSide = side.parse()?;
    Ok(anchor_point(rect, side))
}

/// Distance from a point to a line segment (a→b).
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure to that endpoint. A zero-length segment measures to `a`.
pub fn point_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Whether `point` lies in `rect` grown by `buffer` on every side.
///
/// Edges are inclusive, unlike `Rect::contains`.
pub fn point_in_rect(point: Point, rect: Rect, buffer: f64) -> bool {
    point.x >= rect.x0 - buffer
        && point.x <= rect.x1 + buffer
        && point.y >= rect.y0 - buffer
        && point.y <= rect.y1 + buffer
}

/// Arrow-head triangle for a shaft from `start` to `end`.
///
/// The apex is `end`; the base sits `length` back along the shaft with each
/// corner `width` off the shaft. A zero-length shaft points along +x.
pub fn arrow_head_polygon(start: Point, end: Point, length: f64, width: f64) -> [Point; 3] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let (sin, cos) = angle.sin_cos();
    let back = Vec2::new(length * cos, length * sin);
    let across = Vec2::new(width * sin, -width * cos);
    [end, end - back + across, end - back - across]
}
