//! Diagram store: the shape arena, selection, clipboard and every mutating operation.
//!
//! Each operation is atomic. It either leaves the diagram unchanged or
//! produces a new consistent state, with the cascade of snapped arrows applied
//! in the same step as the rectangle change that triggered it. Operations on
//! ids that are no longer present are silent no-ops.

use crate::config::EditorConfig;
use crate::error::{DiagramError, DiagramResult};
use crate::geometry::anchor_point;
use crate::selection::{ResizeHandle, resize_rect};
use crate::shapes::{Anchor, AnchorSide, Arrow, Endpoint, Shape, ShapeId, ShapeTrait};
use crate::snap::{find_nearest_anchor, find_nearest_anchor_except};
use crate::tools::{DrawGesture, ToolKind};
use kurbo::{Point, Rect, Vec2};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// A single store operation, as data.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddShape { shape: Shape },
    BeginDraw { tool: ToolKind, point: Point },
    UpdateDraw { id: ShapeId, point: Point },
    EndDraw { id: ShapeId },
    MoveShape { id: ShapeId, delta: Vec2 },
    ResizeShape { id: ShapeId, handle: ResizeHandle, delta: Vec2 },
    SetEndpointPosition { id: ShapeId, endpoint: Endpoint, point: Point },
    /// Start a new arrow snapped to a rectangle's anchor.
    ConnectFrom { id: ShapeId, side: AnchorSide },
    DeleteShape { id: ShapeId },
    Duplicate { id: ShapeId },
    Copy { id: ShapeId },
    Paste,
    SetText { id: ShapeId, text: String },
    Select { id: Option<ShapeId> },
}

/// What executing a [`Command`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Updated,
    Created(ShapeId),
}

impl Outcome {
    fn from_changed(changed: bool) -> Self {
        if changed { Outcome::Updated } else { Outcome::Unchanged }
    }

    fn from_created(id: Option<ShapeId>) -> Self {
        id.map_or(Outcome::Unchanged, Outcome::Created)
    }

    /// Whether the command changed anything.
    pub fn is_changed(self) -> bool {
        self != Outcome::Unchanged
    }

    /// Id of the shape the command created, if any.
    pub fn created(self) -> Option<ShapeId> {
        match self {
            Outcome::Created(id) => Some(id),
            _ => None,
        }
    }
}

/// Log and drop a stale-id error.
fn swallow<T>(op: &str, result: DiagramResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::trace!("{} ignored: {}", op, err);
            None
        }
    }
}

/// The shape collection plus selection, clipboard and draw state.
#[derive(Debug, Clone)]
pub struct Diagram {
    shapes: HashMap<ShapeId, Shape>,
    /// Creation order, which is also paint order (last is topmost).
    z_order: Vec<ShapeId>,
    /// Ids that were deleted and must never be reused.
    retired: HashSet<ShapeId>,
    selected: Option<ShapeId>,
    clipboard: Option<Shape>,
    drawing: Option<DrawGesture>,
    config: EditorConfig,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Diagram {
    /// Create an empty diagram using `config`.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            shapes: HashMap::new(),
            z_order: Vec::new(),
            retired: HashSet::new(),
            selected: None,
            clipboard: None,
            drawing: None,
            config,
        }
    }

    /// Editor configuration in effect.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    /// Whether the diagram has no shapes.
    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    /// Get a shape by id.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Whether a shape with `id` exists.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Shapes in paint order (bottom to top).
    pub fn shapes_in_order(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Read-only snapshot of the shapes in paint order.
    pub fn current_shapes(&self) -> Vec<&Shape> {
        self.shapes_in_order().collect()
    }

    /// Id of the selected shape.
    pub fn selected_id(&self) -> Option<ShapeId> {
        self.selected
    }

    /// Whether the clipboard holds a shape.
    pub fn clipboard_present(&self) -> bool {
        self.clipboard.is_some()
    }

    /// The draw gesture in progress, if any.
    pub fn drawing(&self) -> Option<&DrawGesture> {
        self.drawing.as_ref()
    }

    fn shape(&self, id: ShapeId) -> DiagramResult<&Shape> {
        self.shapes.get(&id).ok_or(DiagramError::UnknownShapeId(id))
    }

    fn shape_mut(&mut self, id: ShapeId) -> DiagramResult<&mut Shape> {
        self.shapes.get_mut(&id).ok_or(DiagramError::UnknownShapeId(id))
    }

    fn insert(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        log::debug!("Added {:?} {}", shape.kind(), id);
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    /// Insert an existing shape on top.
    ///
    /// A reused id is replaced with a fresh one. Arrow snaps are resolved
    /// against the live rectangles; snaps to missing rectangles are dropped.
    pub fn add_shape(&mut self, mut shape: Shape) -> ShapeId {
        let id = shape.id();
        if self.shapes.contains_key(&id) || self.retired.contains(&id) {
            shape.regenerate_id();
        }
        if let Shape::Arrow(arrow) = &mut shape {
            for endpoint in [Endpoint::Start, Endpoint::End] {
                let Some(anchor) = arrow.snap(endpoint) else {
                    continue;
                };
                match self.shapes.get(&anchor.shape_id).and_then(Shape::as_rectangle) {
                    Some(rect) => arrow.set_endpoint(endpoint, rect.anchor(anchor.side), Some(anchor)),
                    None => {
                        let point = arrow.point(endpoint);
                        arrow.set_endpoint(endpoint, point, None);
                    }
                }
            }
        }
        self.insert(shape)
    }

    /// Start a draw gesture with a degenerate shape at `point`.
    ///
    /// Returns `None` if a draw is already in progress. An arrow start snaps
    /// to a nearby anchor.
    pub fn begin_draw(&mut self, tool: ToolKind, point: Point) -> Option<ShapeId> {
        if let Some(gesture) = &self.drawing {
            log::trace!("begin_draw ignored: still drawing {}", gesture.shape_id);
            return None;
        }

        let mut shape = tool.create_shape(point);
        let mut origin = point;
        if let Shape::Arrow(arrow) = &mut shape {
            let snap = find_nearest_anchor(point, self.shapes_in_order(), None, self.config.snap_distance);
            if let Some(snap) = snap {
                arrow.set_endpoint(Endpoint::Start, snap.point, Some(snap.anchor()));
                arrow.end = snap.point;
                origin = snap.point;
            }
        }

        let id = self.insert(shape);
        self.drawing = Some(DrawGesture::new(id, tool, origin));
        Some(id)
    }

    /// Stretch the shape being drawn toward `point`.
    pub fn update_draw(&mut self, id: ShapeId, point: Point) -> bool {
        let Some(gesture) = self.drawing.as_ref().filter(|g| g.shape_id == id) else {
            log::trace!("update_draw ignored: {} is not being drawn", id);
            return false;
        };
        let (tool, origin) = (gesture.tool, gesture.origin);
        match tool {
            ToolKind::Arrow => self.set_endpoint_position(id, Endpoint::End, point),
            ToolKind::Rectangle | ToolKind::Text => {
                let frame = Rect::from_points(origin, point);
                swallow("update_draw", self.set_frame(id, frame)).unwrap_or(false)
            }
        }
    }

    /// Finish the draw gesture for `id`, timing it from its start.
    pub fn end_draw(&mut self, id: ShapeId) -> bool {
        let elapsed = match self.drawing.as_ref().filter(|g| g.shape_id == id) {
            Some(gesture) => gesture.elapsed(),
            None => {
                log::trace!("end_draw ignored: {} is not being drawn", id);
                return false;
            }
        };
        self.finish_draw(id, elapsed)
    }

    /// Finish the draw gesture as if it lasted `elapsed`.
    ///
    /// A degenerate shape from a quick click gets the default size.
    pub(crate) fn finish_draw(&mut self, id: ShapeId, elapsed: Duration) -> bool {
        let Some(gesture) = self.drawing.take_if(|g| g.shape_id == id) else {
            return false;
        };
        let quick = elapsed < Duration::from_millis(self.config.quick_click_ms);

        let default_size = (self.config.default_width, self.config.default_height);
        let default_length = self.config.default_arrow_length;
        let frame = match self.shapes.get_mut(&id) {
            Some(Shape::Arrow(arrow)) => {
                if quick && arrow.length() < f64::EPSILON {
                    let end = arrow.start + Vec2::new(default_length, 0.0);
                    arrow.set_endpoint(Endpoint::End, end, None);
                }
                None
            }
            Some(shape) => shape
                .frame()
                .filter(|frame| quick && frame.area().abs() < f64::EPSILON)
                .map(|frame| Rect::from_origin_size(frame.origin(), default_size)),
            None => {
                log::trace!("Drawn shape {} vanished before end_draw", id);
                None
            }
        };
        if let Some(frame) = frame {
            let _ = swallow("end_draw", self.set_frame(id, frame));
        }

        log::debug!("Finished drawing {:?} {}", gesture.tool, id);
        true
    }

    /// Replace the box of a rectangle or text and cascade.
    fn set_frame(&mut self, id: ShapeId, frame: Rect) -> DiagramResult<bool> {
        let shape = self.shape_mut(id)?;
        if !shape.set_frame(frame) {
            return Ok(false);
        }
        if shape.as_rectangle().is_some() {
            self.cascade(id);
        }
        Ok(true)
    }

    /// Translate a shape. Snapped arrow endpoints stay on their anchors.
    pub fn move_shape(&mut self, id: ShapeId, delta: Vec2) -> bool {
        swallow("move_shape", self.try_move_shape(id, delta)).unwrap_or(false)
    }

    fn try_move_shape(&mut self, id: ShapeId, delta: Vec2) -> DiagramResult<bool> {
        let shape = self.shape_mut(id)?;
        match &mut *shape {
            Shape::Arrow(arrow) => arrow.translate_free(delta),
            other => other.translate(delta),
        }
        if shape.as_rectangle().is_some() {
            self.cascade(id);
        }
        Ok(true)
    }

    /// Resize a rectangle or text by one of its corner handles.
    pub fn resize_shape(&mut self, id: ShapeId, handle: ResizeHandle, delta: Vec2) -> bool {
        swallow("resize_shape", self.try_resize_shape(id, handle, delta)).unwrap_or(false)
    }

    fn try_resize_shape(&mut self, id: ShapeId, handle: ResizeHandle, delta: Vec2) -> DiagramResult<bool> {
        let Some(frame) = self.shape(id)?.frame() else {
            return Ok(false);
        };
        let resized = resize_rect(frame, handle, delta, self.config.min_size);
        self.set_frame(id, resized)
    }

    /// Move an arrow endpoint, snapping it to a nearby anchor if one exists.
    pub fn set_endpoint_position(&mut self, id: ShapeId, endpoint: Endpoint, point: Point) -> bool {
        swallow("set_endpoint_position", self.try_set_endpoint(id, endpoint, point)).unwrap_or(false)
    }

    fn try_set_endpoint(&mut self, id: ShapeId, endpoint: Endpoint, point: Point) -> DiagramResult<bool> {
        let Some(arrow) = self.shape(id)?.as_arrow() else {
            return Ok(false);
        };
        let taken = arrow.snap(endpoint.opposite());
        let snap = find_nearest_anchor_except(
            point,
            self.shapes_in_order(),
            Some(id),
            taken,
            self.config.snap_distance,
        );
        let (target, anchor) = match snap {
            Some(snap) => (snap.point, Some(snap.anchor())),
            None => (point, None),
        };
        if let Some(arrow) = self.shape_mut(id)?.as_arrow_mut() {
            arrow.set_endpoint(endpoint, target, anchor);
        }
        Ok(true)
    }

    /// Create a zero-length arrow whose start is snapped to `side` of rectangle `id`.
    pub fn connect_from(&mut self, id: ShapeId, side: AnchorSide) -> Option<ShapeId> {
        swallow("connect_from", self.try_connect_from(id, side)).flatten()
    }

    fn try_connect_from(&mut self, id: ShapeId, side: AnchorSide) -> DiagramResult<Option<ShapeId>> {
        let Some(rect) = self.shape(id)?.as_rectangle() else {
            return Ok(None);
        };
        let start = rect.anchor(side);
        let mut arrow = Arrow::new(start, start);
        arrow.snapped_start = Some(Anchor::new(id, side));
        Ok(Some(self.insert(Shape::Arrow(arrow))))
    }

    /// Remove a shape. Deleting a rectangle also deletes every arrow snapped to it.
    pub fn delete_shape(&mut self, id: ShapeId) -> bool {
        swallow("delete_shape", self.try_delete_shape(id)).is_some()
    }

    fn try_delete_shape(&mut self, id: ShapeId) -> DiagramResult<Vec<ShapeId>> {
        let shape = self.shapes.remove(&id).ok_or(DiagramError::UnknownShapeId(id))?;
        let mut removed = vec![id];
        if shape.as_rectangle().is_some() {
            let dependents: Vec<ShapeId> = self
                .shapes
                .values()
                .filter_map(Shape::as_arrow)
                .filter(|arrow| arrow.is_attached_to(id))
                .map(|arrow| arrow.id())
                .collect();
            for dependent in dependents {
                self.shapes.remove(&dependent);
                removed.push(dependent);
            }
        }

        self.z_order.retain(|z| !removed.contains(z));
        self.retired.extend(removed.iter().copied());
        if self.selected.is_some_and(|s| removed.contains(&s)) {
            self.selected = None;
        }
        if self.drawing.as_ref().is_some_and(|g| removed.contains(&g.shape_id)) {
            self.drawing = None;
        }

        log::debug!("Deleted {} and {} connected arrows", id, removed.len() - 1);
        Ok(removed)
    }

    /// Copy a shape in place, offset and without snaps, and select the copy.
    pub fn duplicate(&mut self, id: ShapeId) -> Option<ShapeId> {
        let mut copy = swallow("duplicate", self.shape(id))?.detached_copy();
        copy.translate(self.config.duplicate_offset);
        let new_id = self.insert(copy);
        self.selected = Some(new_id);
        Some(new_id)
    }

    /// Put a detached copy of a shape on the clipboard.
    pub fn copy_to_clipboard(&mut self, id: ShapeId) -> bool {
        let Some(shape) = swallow("copy_to_clipboard", self.shape(id)) else {
            return false;
        };
        self.clipboard = Some(shape.detached_copy());
        true
    }

    /// Insert the clipboard shape at its position plus the offset and select it.
    ///
    /// The clipboard advances by the same offset, so repeated pastes cascade.
    pub fn paste(&mut self) -> Option<ShapeId> {
        let offset = self.config.duplicate_offset;
        let Some(clip) = self.clipboard.as_mut() else {
            log::trace!("paste ignored: clipboard is empty");
            return None;
        };
        clip.translate(offset);
        let mut shape = clip.clone();
        shape.regenerate_id();

        let id = self.insert(shape);
        self.selected = Some(id);
        log::debug!("Pasted {}", id);
        Some(id)
    }

    /// Replace the text of a rectangle or text shape. No-op for arrows.
    pub fn set_text(&mut self, id: ShapeId, text: String) -> bool {
        swallow("set_text", self.shape_mut(id))
            .map(|shape| shape.set_text(text))
            .unwrap_or(false)
    }

    /// Set or clear the selection. Unknown ids leave it untouched.
    pub fn select(&mut self, id: Option<ShapeId>) -> bool {
        match id {
            None => self.selected.take().is_some(),
            Some(id) if self.shapes.contains_key(&id) => {
                let changed = self.selected != Some(id);
                self.selected = Some(id);
                changed
            }
            Some(id) => {
                log::trace!("select ignored: {}", DiagramError::UnknownShapeId(id));
                false
            }
        }
    }

    /// Re-resolve every arrow endpoint snapped to rectangle `id`.
    ///
    /// Returns the number of endpoints updated.
    pub fn cascade(&mut self, id: ShapeId) -> usize {
        let Some(rect) = self.shapes.get(&id).and_then(Shape::as_rectangle).map(|r| r.as_rect()) else {
            return 0;
        };
        let mut updated = 0;
        for shape in self.shapes.values_mut() {
            let Some(arrow) = shape.as_arrow_mut() else {
                continue;
            };
            for endpoint in [Endpoint::Start, Endpoint::End] {
                if let Some(anchor) = arrow.snap(endpoint).filter(|a| a.shape_id == id) {
                    arrow.set_endpoint(endpoint, anchor_point(rect, anchor.side), Some(anchor));
                    updated += 1;
                }
            }
        }
        updated
    }

    /// Topmost shape whose selectable region contains `point`.
    pub fn shape_at_point(&self, point: Point) -> Option<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|id| self.shapes.get(id).is_some_and(|s| s.hits(point, &self.config)))
    }

    /// Execute one command in place.
    pub fn execute(&mut self, command: &Command) -> Outcome {
        match command {
            Command::AddShape { shape } => Outcome::Created(self.add_shape(shape.clone())),
            Command::BeginDraw { tool, point } => Outcome::from_created(self.begin_draw(*tool, *point)),
            Command::UpdateDraw { id, point } => Outcome::from_changed(self.update_draw(*id, *point)),
            Command::EndDraw { id } => Outcome::from_changed(self.end_draw(*id)),
            Command::MoveShape { id, delta } => Outcome::from_changed(self.move_shape(*id, *delta)),
            Command::ResizeShape { id, handle, delta } => {
                Outcome::from_changed(self.resize_shape(*id, *handle, *delta))
            }
            Command::SetEndpointPosition { id, endpoint, point } => {
                Outcome::from_changed(self.set_endpoint_position(*id, *endpoint, *point))
            }
            Command::ConnectFrom { id, side } => Outcome::from_created(self.connect_from(*id, *side)),
            Command::DeleteShape { id } => Outcome::from_changed(self.delete_shape(*id)),
            Command::Duplicate { id } => Outcome::from_created(self.duplicate(*id)),
            Command::Copy { id } => Outcome::from_changed(self.copy_to_clipboard(*id)),
            Command::Paste => Outcome::from_created(self.paste()),
            Command::SetText { id, text } => Outcome::from_changed(self.set_text(*id, text.clone())),
            Command::Select { id } => Outcome::from_changed(self.select(*id)),
        }
    }

    /// Pure form of [`Diagram::execute`]: returns the next snapshot and leaves `self` untouched.
    pub fn apply(&self, command: &Command) -> (Diagram, Outcome) {
        let mut next = self.clone();
        let outcome = next.execute(command);
        (next, outcome)
    }
}
