//! Error types for the diagram core.

use crate::shapes::ShapeId;
use thiserror::Error;

/// Errors raised by diagram lookups and geometry.
///
/// Store operations never surface these to callers: a stale id is a no-op.
/// They exist so internal helpers can use `?` and so anchor names coming from
/// outside the crate can be validated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("Invalid anchor side: {0}")]
    InvalidAnchor(String),
    #[error("Unknown shape id: {0}")]
    UnknownShapeId(ShapeId),
    #[error("Degenerate geometry")]
    DegenerateGeometry,
}

/// Result type for diagram operations.
pub type DiagramResult<T> = Result<T, DiagramError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
