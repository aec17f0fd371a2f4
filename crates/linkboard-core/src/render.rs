//! Renderer-facing view of the diagram.
//!
//! The core does no drawing. It hands the renderer one [`RenderItem`] per
//! shape, in paint order, with the derived geometry already computed.

use crate::config::EditorConfig;
use crate::diagram::Diagram;
use crate::geometry::arrow_head_polygon;
use crate::selection::{ResizeHandle, resize_handles};
use crate::shapes::{AnchorSide, Shape, ShapeId};
use kurbo::{Point, Rect};
use serde::Serialize;

/// One shape plus everything needed to paint it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenderItem {
    Rectangle {
        id: ShapeId,
        rect: Rect,
        text: String,
        anchors: [(AnchorSide, Point); 4],
        /// Present only while selected.
        resize_handles: Option<[(ResizeHandle, Point); 4]>,
        selected: bool,
        /// Whether connection nodes are drawn.
        show_nodes: bool,
    },
    Arrow {
        id: ShapeId,
        start: Point,
        end: Point,
        head: [Point; 3],
        /// Shaft and head extent, padded.
        bounds: Rect,
        selected: bool,
        show_endpoints: bool,
    },
    Text {
        id: ShapeId,
        rect: Rect,
        text: String,
        resize_handles: Option<[(ResizeHandle, Point); 4]>,
        selected: bool,
    },
}

impl RenderItem {
    /// Id of the shape this item paints.
    pub fn id(&self) -> ShapeId {
        match self {
            RenderItem::Rectangle { id, .. } | RenderItem::Arrow { id, .. } | RenderItem::Text { id, .. } => *id,
        }
    }
}

/// Render item for a single shape.
pub fn render_item(shape: &Shape, selected: bool, show_nodes: bool, config: &EditorConfig) -> RenderItem {
    match shape {
        Shape::Rectangle(rect) => RenderItem::Rectangle {
            id: shape.id(),
            rect: rect.as_rect(),
            text: rect.text.clone(),
            anchors: rect.anchors(),
            resize_handles: selected.then(|| resize_handles(rect.as_rect())),
            selected,
            show_nodes: selected || show_nodes,
        },
        Shape::Arrow(arrow) => {
            let head = arrow_head_polygon(
                arrow.start,
                arrow.end,
                config.arrow_head_length,
                config.arrow_head_width,
            );
            let padding = config.bounds_padding;
            let bounds = Rect::from_points(arrow.start, arrow.end)
                .union_pt(head[1])
                .union_pt(head[2])
                .inflate(padding, padding);
            RenderItem::Arrow {
                id: shape.id(),
                start: arrow.start,
                end: arrow.end,
                head,
                bounds,
                selected,
                show_endpoints: selected || show_nodes,
            }
        }
        Shape::Text(text) => RenderItem::Text {
            id: shape.id(),
            rect: text.as_rect(),
            text: text.content.clone(),
            resize_handles: selected.then(|| resize_handles(text.as_rect())),
            selected,
        },
    }
}

/// Render items for every shape in paint order.
pub fn render_items(diagram: &Diagram, show_nodes: bool) -> Vec<RenderItem> {
    let selected = diagram.selected_id();
    diagram
        .shapes_in_order()
        .map(|shape| render_item(shape, selected == Some(shape.id()), show_nodes, diagram.config()))
        .collect()
}
