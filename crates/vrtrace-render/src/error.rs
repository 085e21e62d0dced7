//! Rendering error types.

use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Requested image size has a zero dimension.
    #[error("invalid render size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    /// Flat vertex or index arrays are not a multiple of three.
    #[error("{what} array length {len} is not a multiple of 3")]
    RaggedArray { what: &'static str, len: usize },

    /// Pixel buffer size does not match the destination.
    #[error("pixel buffer size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// A copy region lies outside its buffer.
    #[error("region {x},{y} {width}x{height} is outside a {buffer_width}x{buffer_height} buffer")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        buffer_width: u32,
        buffer_height: u32,
    },
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for vrtrace_core::VrTraceError {
    fn from(err: RenderError) -> Self {
        vrtrace_core::VrTraceError::Render(err.to_string())
    }
}
