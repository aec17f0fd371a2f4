//! Linkboard Core Library
//!
//! Platform-agnostic diagram model and editing engine: rectangles, text
//! labels and connector arrows whose endpoints stay attached to rectangle
//! anchors as shapes move and resize.

pub mod config;
pub mod diagram;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod render;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod tools;

pub use config::EditorConfig;
pub use diagram::{Command, Diagram, Outcome};
pub use editor::{Editor, InteractionState};
pub use error::{ConfigError, DiagramError, DiagramResult};
pub use input::{KeyEvent, PointerEvent, TextEvent, ToolCommand};
pub use render::RenderItem;
pub use selection::{HandleKind, ResizeHandle};
pub use shapes::{Anchor, AnchorSide, Arrow, Endpoint, Rectangle, Shape, ShapeId, ShapeTrait, Text};
pub use snap::{AnchorSnap, find_nearest_anchor, find_nearest_anchor_except};
pub use tools::ToolKind;
