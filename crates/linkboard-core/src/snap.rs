//! Snapping connector endpoints to rectangle anchors.

use crate::shapes::{Anchor, AnchorSide, Shape, ShapeId};
use kurbo::Point;

/// Result of a successful anchor snap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorSnap {
    /// Rectangle that owns the anchor.
    pub shape_id: ShapeId,
    pub side: AnchorSide,
    /// Live anchor point at the time of the snap.
    pub point: Point,
}

impl AnchorSnap {
    /// The weak reference to store on the connector endpoint.
    pub fn anchor(&self) -> Anchor {
        Anchor::new(self.shape_id, self.side)
    }
}

/// Find the anchor nearest to `point` among all rectangles except `exclude`.
///
/// Only anchors strictly closer than `max_distance` qualify. On equal
/// distances the first candidate in iteration order wins (shape order, then
/// left/right/top/bottom), so the result is deterministic for a given order.
pub fn find_nearest_anchor<'a>(
    point: Point,
    shapes: impl IntoIterator<Item = &'a Shape>,
    exclude: Option<ShapeId>,
    max_distance: f64,
) -> Option<AnchorSnap> {
    find_nearest_anchor_except(point, shapes, exclude, None, max_distance)
}

/// Like [`find_nearest_anchor`], but also skips the single anchor `taken`.
///
/// Used for an arrow endpoint, where `taken` is the anchor held by the
/// opposite end; both ends never share one anchor.
pub fn find_nearest_anchor_except<'a>(
    point: Point,
    shapes: impl IntoIterator<Item = &'a Shape>,
    exclude: Option<ShapeId>,
    taken: Option<Anchor>,
    max_distance: f64,
) -> Option<AnchorSnap> {
    let mut best: Option<AnchorSnap> = None;
    let mut best_dist_sq = max_distance * max_distance;

    for shape in shapes {
        let Some(rect) = shape.as_rectangle() else {
            continue;
        };
        let shape_id = shape.id();
        if exclude == Some(shape_id) {
            continue;
        }
        for (side, anchor) in rect.anchors() {
            if taken == Some(Anchor::new(shape_id, side)) {
                continue;
            }
            let dist_sq = (point - anchor).hypot2();
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best = Some(AnchorSnap {
                    shape_id,
                    side,
                    point: anchor,
                });
            }
        }
    }

    if let Some(snap) = &best {
        log::trace!("Snapped to {} anchor of {}", snap.side, snap.shape_id);
    }
    best
}
