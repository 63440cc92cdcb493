//! Error types for the gen-art core.

use thiserror::Error;

/// Errors produced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero (or overflowed) when creating a Field or canvas.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// Two fields had incompatible dimensions for an element-wise operation.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// No engine is registered under the requested name.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// The drawing has no points, so there is no bounding box to fit onto a page.
    #[error("nothing to export: the current frame has no geometry")]
    EmptyGeometry,

    /// Input that a geometric routine cannot handle (too few, duplicate or collinear points).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Writing an export or snapshot failed.
    #[error("i/o error: {0}")]
    Io(String),
}
