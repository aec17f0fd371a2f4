//! Selection and manipulation handle system.

use crate::shapes::{AnchorSide, Endpoint, Shape};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Corner resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    /// All handles in nw/ne/sw/se order.
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
    ];

    /// Position of this handle on `rect`.
    pub fn position(self, rect: Rect) -> Point {
        match self {
            ResizeHandle::Nw => Point::new(rect.x0, rect.y0),
            ResizeHandle::Ne => Point::new(rect.x1, rect.y0),
            ResizeHandle::Sw => Point::new(rect.x0, rect.y1),
            ResizeHandle::Se => Point::new(rect.x1, rect.y1),
        }
    }
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle for rectangles and text.
    Resize(ResizeHandle),
    /// Connection node on a rectangle's anchor; pressing it starts a new arrow.
    Node(AnchorSide),
    /// Arrow endpoint handle.
    Endpoint(Endpoint),
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point hits this handle.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        (point - self.position).hypot2() <= radius * radius
    }
}

/// The four resize handles of `rect`, in nw/ne/sw/se order.
pub fn resize_handles(rect: Rect) -> [(ResizeHandle, Point); 4] {
    ResizeHandle::ALL.map(|handle| (handle, handle.position(rect)))
}

/// Handles that are live for `shape`.
///
/// A selected rectangle or text gets resize corners; a rectangle gets its
/// connection nodes and an arrow its endpoint handles when selected or when
/// nodes are shown globally.
pub fn get_handles(shape: &Shape, selected: bool, show_nodes: bool) -> Vec<Handle> {
    let mut handles = Vec::new();
    match shape {
        Shape::Rectangle(rect) => {
            if selected {
                handles.extend(
                    resize_handles(rect.as_rect())
                        .map(|(h, p)| Handle::new(p, HandleKind::Resize(h))),
                );
            }
            if selected || show_nodes {
                handles.extend(rect.anchors().map(|(side, p)| Handle::new(p, HandleKind::Node(side))));
            }
        }
        Shape::Text(text) => {
            if selected {
                handles.extend(
                    resize_handles(text.as_rect())
                        .map(|(h, p)| Handle::new(p, HandleKind::Resize(h))),
                );
            }
        }
        Shape::Arrow(arrow) => {
            if selected || show_nodes {
                // End first so a zero-length arrow drags its tip.
                handles.push(Handle::new(arrow.end, HandleKind::Endpoint(Endpoint::End)));
                handles.push(Handle::new(arrow.start, HandleKind::Endpoint(Endpoint::Start)));
            }
        }
    }
    handles
}

/// Grab radius for the handles of a box shape.
///
/// Capped at a quarter of the shorter side so the handles never cover the
/// whole body of a small box.
fn box_handle_radius(frame: Rect, radius: f64) -> f64 {
    radius.min(frame.width().min(frame.height()) / 4.0)
}

/// Nearest live handle of `shape` within `radius` of `point`.
///
/// Corner and node handles of a box shrink with the box; arrow endpoints
/// always use `radius`.
pub fn hit_test_handles(
    shape: &Shape,
    point: Point,
    radius: f64,
    selected: bool,
    show_nodes: bool,
) -> Option<HandleKind> {
    let radius = shape.frame().map_or(radius, |frame| box_handle_radius(frame, radius));
    let mut best: Option<(f64, HandleKind)> = None;
    for handle in get_handles(shape, selected, show_nodes) {
        if !handle.hit_test(point, radius) {
            continue;
        }
        let dist_sq = (point - handle.position).hypot2();
        if best.is_none_or(|(d, _)| dist_sq < d) {
            best = Some((dist_sq, handle.kind));
        }
    }
    best.map(|(_, kind)| kind)
}

/// Resize `rect` by dragging `handle` by `delta`, keeping the opposite
/// corner fixed. Width and height never drop below `min_size`.
pub fn resize_rect(rect: Rect, handle: ResizeHandle, delta: Vec2, min_size: f64) -> Rect {
    let Rect { x0, y0, x1, y1 } = rect;
    match handle {
        ResizeHandle::Nw => Rect::new(
            (x0 + delta.x).min(x1 - min_size),
            (y0 + delta.y).min(y1 - min_size),
            x1,
            y1,
        ),
        ResizeHandle::Ne => Rect::new(
            x0,
            (y0 + delta.y).min(y1 - min_size),
            (x1 + delta.x).max(x0 + min_size),
            y1,
        ),
        ResizeHandle::Sw => Rect::new(
            (x0 + delta.x).min(x1 - min_size),
            y0,
            x1,
            (y1 + delta.y).max(y0 + min_size),
        ),
        ResizeHandle::Se => Rect::new(
            x0,
            y0,
            (x1 + delta.x).max(x0 + min_size),
            (y1 + delta.y).max(y0 + min_size),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Arrow, Rectangle, Text};

    fn assert_rect(actual: Rect, expected: Rect) {
        assert!((actual.x0 - expected.x0).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        assert!((actual.y0 - expected.y0).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        assert!((actual.x1 - expected.x1).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        assert!((actual.y1 - expected.y1).abs() < 1e-9, "{:?} != {:?}", actual, expected);
    }

    #[test]
    fn test_resize_se_grows() {
        let rect = Rect::new(0.0, 0.0, 100.0, 80.0);
        let resized = resize_rect(rect, ResizeHandle::Se, Vec2::new(20.0, 20.0), 10.0);
        assert_rect(resized, Rect::new(0.0, 0.0, 120.0, 100.0));
    }

    #[test]
    fn test_resize_nw_keeps_opposite_corner() {
        let rect = Rect::new(0.0, 0.0, 100.0, 80.0);
        let resized = resize_rect(rect, ResizeHandle::Nw, Vec2::new(10.0, -10.0), 10.0);
        assert_rect(resized, Rect::new(10.0, -10.0, 100.0, 80.0));
    }

    #[test]
    fn test_resize_clamps_to_min_size() {
        let rect = Rect::new(0.0, 0.0, 100.0, 80.0);

        let nw = resize_rect(rect, ResizeHandle::Nw, Vec2::new(500.0, 500.0), 10.0);
        assert_rect(nw, Rect::new(90.0, 70.0, 100.0, 80.0));

        let ne = resize_rect(rect, ResizeHandle::Ne, Vec2::new(-500.0, 500.0), 10.0);
        assert_rect(ne, Rect::new(0.0, 70.0, 10.0, 80.0));

        let sw = resize_rect(rect, ResizeHandle::Sw, Vec2::new(500.0, -500.0), 10.0);
        assert_rect(sw, Rect::new(90.0, 0.0, 100.0, 10.0));

        let se = resize_rect(rect, ResizeHandle::Se, Vec2::new(-500.0, -500.0), 10.0);
        assert_rect(se, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_rectangle_handles() {
        let shape = Shape::Rectangle(Rectangle::new(Point::ZERO, 100.0, 80.0));
        assert_eq!(get_handles(&shape, true, false).len(), 8);
        assert_eq!(get_handles(&shape, false, true).len(), 4);
        assert!(get_handles(&shape, false, false).is_empty());
    }

    #[test]
    fn test_text_has_no_nodes() {
        let shape = Shape::Text(Text::new(Point::ZERO, 100.0, 50.0, String::new()));
        assert_eq!(get_handles(&shape, true, true).len(), 4);
        assert!(get_handles(&shape, false, true).is_empty());
    }

    #[test]
    fn test_hit_test_handles_picks_nearest() {
        let shape = Shape::Rectangle(Rectangle::new(Point::ZERO, 100.0, 80.0));
        assert_eq!(
            hit_test_handles(&shape, Point::new(99.0, 79.0), 8.0, true, false),
            Some(HandleKind::Resize(ResizeHandle::Se))
        );
        assert_eq!(
            hit_test_handles(&shape, Point::new(102.0, 41.0), 8.0, true, false),
            Some(HandleKind::Node(AnchorSide::Right))
        );
        assert_eq!(hit_test_handles(&shape, Point::new(50.0, 40.0), 8.0, true, false), None);
    }

    #[test]
    fn test_small_box_handles_leave_body_free() {
        let shape = Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        // Center is 5 from every node and 7.07 from every corner.
        assert_eq!(hit_test_handles(&shape, Point::new(5.0, 5.0), 8.0, true, true), None);
        assert_eq!(
            hit_test_handles(&shape, Point::new(11.0, 5.0), 8.0, true, true),
            Some(HandleKind::Node(AnchorSide::Right))
        );
        assert_eq!(
            hit_test_handles(&shape, Point::new(9.0, 9.0), 8.0, true, false),
            Some(HandleKind::Resize(ResizeHandle::Se))
        );
    }

    #[test]
    fn test_arrow_endpoint_handles() {
        let shape = Shape::Arrow(Arrow::new(Point::ZERO, Point::new(100.0, 0.0)));
        assert_eq!(
            hit_test_handles(&shape, Point::new(2.0, 1.0), 8.0, true, false),
            Some(HandleKind::Endpoint(Endpoint::Start))
        );
        assert_eq!(hit_test_handles(&shape, Point::new(2.0, 1.0), 8.0, false, false), None);

        let zero = Shape::Arrow(Arrow::new(Point::ZERO, Point::ZERO));
        assert_eq!(
            hit_test_handles(&zero, Point::ZERO, 8.0, true, false),
            Some(HandleKind::Endpoint(Endpoint::End))
        );
    }
}
