//! Interaction state machine.
//!
//! The [`Editor`] owns the [`Diagram`] and is the only place that threads it
//! through time: every input event is interpreted against the current
//! [`InteractionState`] and turned into store [`Command`]s.

use crate::config::EditorConfig;
use crate::diagram::{Command, Diagram, Outcome};
use crate::input::{KeyEvent, PointerEvent, TextEvent, ToolCommand};
use crate::render::{RenderItem, render_items};
use crate::selection::{HandleKind, ResizeHandle, hit_test_handles, resize_rect};
use crate::shapes::{Endpoint, Shape, ShapeId};
use crate::tools::ToolKind;
use kurbo::{Point, Rect, Vec2};

/// What the next pointer or keyboard event means.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    ToolArmed(ToolKind),
    Drawing(ShapeId),
    DraggingBody {
        id: ShapeId,
        /// Pointer position relative to the shape origin at press time.
        grab_offset: Vec2,
        /// Origin the shape would have if no endpoint were pinned.
        origin: Point,
        moved: bool,
        /// The press landed on the already-selected shape.
        toggle_on_release: bool,
    },
    DraggingEndpoint {
        id: ShapeId,
        endpoint: Endpoint,
        /// The arrow was created by this gesture from a connection node.
        created: bool,
        moved: bool,
    },
    Resizing {
        id: ShapeId,
        handle: ResizeHandle,
        press: Point,
        original: Rect,
    },
    EditingText {
        id: ShapeId,
        draft: String,
    },
}

impl InteractionState {
    /// State name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "Idle",
            InteractionState::ToolArmed(_) => "ToolArmed",
            InteractionState::Drawing(_) => "Drawing",
            InteractionState::DraggingBody { .. } => "DraggingBody",
            InteractionState::DraggingEndpoint { .. } => "DraggingEndpoint",
            InteractionState::Resizing { .. } => "Resizing",
            InteractionState::EditingText { .. } => "EditingText",
        }
    }

    /// Whether a pointer gesture is in progress.
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            InteractionState::Drawing(_)
                | InteractionState::DraggingBody { .. }
                | InteractionState::DraggingEndpoint { .. }
                | InteractionState::Resizing { .. }
        )
    }

    /// Whether a text draft is open.
    pub fn is_editing_text(&self) -> bool {
        matches!(self, InteractionState::EditingText { .. })
    }
}

/// Diagram editor: the diagram plus interaction and display state.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    diagram: Diagram,
    state: InteractionState,
    show_nodes: bool,
}

impl Editor {
    /// Create an editor over an empty diagram.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_diagram(Diagram::new(config))
    }

    /// Create an idle editor over an existing diagram.
    pub fn with_diagram(diagram: Diagram) -> Self {
        Self {
            diagram,
            state: InteractionState::Idle,
            show_nodes: false,
        }
    }

    /// The diagram being edited.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Current interaction state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Whether connection nodes are shown on every rectangle.
    pub fn show_nodes(&self) -> bool {
        self.show_nodes
    }

    /// Shapes in paint order.
    pub fn current_shapes(&self) -> Vec<&Shape> {
        self.diagram.current_shapes()
    }

    /// Id of the selected shape.
    pub fn selected_id(&self) -> Option<ShapeId> {
        self.diagram.selected_id()
    }

    /// Whether the clipboard holds a shape.
    pub fn clipboard_present(&self) -> bool {
        self.diagram.clipboard_present()
    }

    /// Whether the Delete control should be enabled.
    pub fn can_delete(&self) -> bool {
        self.selected_id().is_some() && !self.state.is_editing_text()
    }

    /// Whether the Copy control should be enabled.
    pub fn can_copy(&self) -> bool {
        self.can_delete()
    }

    /// Whether the Paste control should be enabled.
    pub fn can_paste(&self) -> bool {
        self.clipboard_present() && !self.state.is_editing_text()
    }

    /// Render items in paint order.
    pub fn render_items(&self) -> Vec<RenderItem> {
        render_items(&self.diagram, self.show_nodes)
    }

    /// Render items as JSON, for renderers across an FFI or wasm boundary.
    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.render_items())
    }

    fn run(&mut self, command: Command) -> Outcome {
        let outcome = self.diagram.execute(&command);
        log::trace!("{:?} -> {:?}", command, outcome);
        outcome
    }

    fn set_state(&mut self, next: InteractionState) {
        log::debug!("Interaction {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    /// Handle a pointer event.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Down { position, target } => self.pointer_down(*position, *target),
            PointerEvent::Move { position } => self.pointer_move(*position),
            PointerEvent::Up | PointerEvent::Leave => self.end_gesture(),
            PointerEvent::DoubleClick { position, target } => self.double_click(*position, *target),
        }
    }

    /// Handle a key event. While text is being edited only Escape is honored.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.state.is_editing_text() {
            if key == KeyEvent::Escape {
                log::debug!("Discarding text draft");
                self.set_state(InteractionState::Idle);
            }
            return;
        }

        match key {
            KeyEvent::Escape => {
                if self.state.is_gesture() {
                    self.end_gesture();
                } else if matches!(self.state, InteractionState::ToolArmed(_)) {
                    self.set_state(InteractionState::Idle);
                }
            }
            KeyEvent::Delete => {
                if let Some(id) = self.selected_id() {
                    self.run(Command::DeleteShape { id });
                }
            }
            KeyEvent::Copy => {
                if let Some(id) = self.selected_id() {
                    self.run(Command::Copy { id });
                }
            }
            KeyEvent::Paste => {
                self.run(Command::Paste);
            }
        }
    }

    /// Handle a toolbar command. Arming a tool mid-gesture is ignored.
    pub fn handle_tool(&mut self, command: ToolCommand) {
        match command {
            ToolCommand::ToggleShowNodes => {
                self.show_nodes = !self.show_nodes;
                log::debug!("Show nodes: {}", self.show_nodes);
            }
            ToolCommand::Arm(tool) => {
                if self.state.is_gesture() {
                    log::trace!("Ignoring {:?} tool during {}", tool, self.state.name());
                    return;
                }
                self.commit_text();
                self.set_state(InteractionState::ToolArmed(tool));
            }
        }
    }

    /// Handle an event from the text editor.
    pub fn handle_text(&mut self, event: TextEvent) {
        match event {
            TextEvent::Input(text) => {
                if let InteractionState::EditingText { draft, .. } = &mut self.state {
                    *draft = text;
                }
            }
            TextEvent::Commit | TextEvent::Blur => self.commit_text(),
        }
    }

    fn commit_text(&mut self) {
        let InteractionState::EditingText { id, draft } = &self.state else {
            return;
        };
        let command = Command::SetText {
            id: *id,
            text: draft.clone(),
        };
        self.run(command);
        self.set_state(InteractionState::Idle);
    }

    /// Resolve the shape under the pointer, trusting the host's target if it is still live.
    fn resolve_target(&self, position: Point, target: Option<ShapeId>) -> Option<ShapeId> {
        target
            .filter(|id| self.diagram.contains(*id))
            .or_else(|| self.diagram.shape_at_point(position))
    }

    fn pointer_down(&mut self, position: Point, target: Option<ShapeId>) {
        // A down without the matching up ends the stale gesture first.
        if self.state.is_gesture() {
            self.end_gesture();
        }
        self.commit_text();

        if let InteractionState::ToolArmed(tool) = self.state {
            if let Some(id) = self.run(Command::BeginDraw { tool, point: position }).created() {
                self.set_state(InteractionState::Drawing(id));
            }
            return;
        }

        if let Some((id, handle)) = self.handle_at(position) {
            self.press_handle(id, handle, position);
            return;
        }

        let Some(id) = self.resolve_target(position, target) else {
            self.run(Command::Select { id: None });
            return;
        };
        let Some(origin) = self.diagram.get(id).map(|shape| shape.bounds().origin()) else {
            return;
        };
        let toggle_on_release = self.selected_id() == Some(id);
        if !toggle_on_release {
            self.run(Command::Select { id: Some(id) });
        }
        self.set_state(InteractionState::DraggingBody {
            id,
            grab_offset: position - origin,
            origin,
            moved: false,
            toggle_on_release,
        });
    }

    /// Live handle under the pointer: the selected shape's first, then any
    /// connection node or endpoint while nodes are shown.
    fn handle_at(&self, position: Point) -> Option<(ShapeId, HandleKind)> {
        let radius = self.diagram.config().handle_radius;
        let selected = self
            .selected_id()
            .and_then(|id| self.diagram.get(id))
            .and_then(|shape| {
                hit_test_handles(shape, position, radius, true, self.show_nodes).map(|kind| (shape.id(), kind))
            });
        if selected.is_some() || !self.show_nodes {
            return selected;
        }

        self.diagram.current_shapes().into_iter().rev().find_map(|shape| {
            hit_test_handles(shape, position, radius, false, true).map(|kind| (shape.id(), kind))
        })
    }

    fn press_handle(&mut self, id: ShapeId, handle: HandleKind, position: Point) {
        match handle {
            HandleKind::Resize(handle) => {
                let Some(original) = self.diagram.get(id).and_then(Shape::frame) else {
                    return;
                };
                self.set_state(InteractionState::Resizing {
                    id,
                    handle,
                    press: position,
                    original,
                });
            }
            HandleKind::Node(side) => {
                if let Some(arrow) = self.run(Command::ConnectFrom { id, side }).created() {
                    self.set_state(InteractionState::DraggingEndpoint {
                        id: arrow,
                        endpoint: Endpoint::End,
                        created: true,
                        moved: false,
                    });
                }
            }
            HandleKind::Endpoint(endpoint) => {
                self.run(Command::Select { id: Some(id) });
                self.set_state(InteractionState::DraggingEndpoint {
                    id,
                    endpoint,
                    created: false,
                    moved: false,
                });
            }
        }
    }

    fn pointer_move(&mut self, position: Point) {
        match self.state.clone() {
            InteractionState::Drawing(id) => {
                self.run(Command::UpdateDraw { id, point: position });
            }
            InteractionState::DraggingBody {
                id,
                grab_offset,
                origin,
                ..
            } => {
                let next_origin = position - grab_offset;
                let delta = next_origin - origin;
                if delta == Vec2::ZERO {
                    return;
                }
                self.run(Command::MoveShape { id, delta });
                if let InteractionState::DraggingBody { origin, moved, .. } = &mut self.state {
                    *origin = next_origin;
                    *moved = true;
                }
            }
            InteractionState::DraggingEndpoint { id, endpoint, .. } => {
                self.run(Command::SetEndpointPosition {
                    id,
                    endpoint,
                    point: position,
                });
                let detached = self
                    .diagram
                    .get(id)
                    .and_then(Shape::as_arrow)
                    .is_some_and(|arrow| arrow.length() > f64::EPSILON);
                if let InteractionState::DraggingEndpoint { moved, .. } = &mut self.state {
                    *moved |= detached;
                }
            }
            InteractionState::Resizing {
                id,
                handle,
                press,
                original,
            } => {
                let Some(current) = self.diagram.get(id).and_then(Shape::frame) else {
                    return;
                };
                let target = resize_rect(original, handle, position - press, self.diagram.config().min_size);
                let delta = handle.position(target) - handle.position(current);
                self.run(Command::ResizeShape { id, handle, delta });
            }
            InteractionState::Idle | InteractionState::ToolArmed(_) | InteractionState::EditingText { .. } => {}
        }
    }

    /// Finish the current gesture. Pointer up, pointer leave and Escape all land here.
    fn end_gesture(&mut self) {
        match self.state.clone() {
            InteractionState::Drawing(id) => {
                self.run(Command::EndDraw { id });
            }
            InteractionState::DraggingBody {
                id,
                moved,
                toggle_on_release,
                ..
            } => {
                if toggle_on_release && !moved && self.selected_id() == Some(id) {
                    self.run(Command::Select { id: None });
                }
            }
            InteractionState::DraggingEndpoint { id, created: true, moved, .. } => {
                // A new connection survives only if its end ended up away from the node.
                let kept = moved
                    && self
                        .diagram
                        .get(id)
                        .and_then(Shape::as_arrow)
                        .is_some_and(|arrow| arrow.length() > f64::EPSILON);
                if kept {
                    self.run(Command::Select { id: Some(id) });
                } else {
                    self.run(Command::DeleteShape { id });
                }
            }
            InteractionState::DraggingEndpoint { created: false, .. } => {}
            InteractionState::Resizing { .. } => {}
            InteractionState::Idle | InteractionState::ToolArmed(_) | InteractionState::EditingText { .. } => {
                return;
            }
        }
        self.set_state(InteractionState::Idle);
    }

    fn double_click(&mut self, position: Point, target: Option<ShapeId>) {
        if !matches!(self.state, InteractionState::Idle | InteractionState::EditingText { .. }) {
            return;
        }
        self.commit_text();

        let Some(id) = self.resolve_target(position, target) else {
            return;
        };
        let Some(draft) = self.diagram.get(id).and_then(Shape::text).map(str::to_string) else {
            return;
        };
        self.run(Command::Select { id: Some(id) });
        self.set_state(InteractionState::EditingText { id, draft });
    }
}
