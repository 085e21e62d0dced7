//! Error types for vrtrace.

use thiserror::Error;

/// The main error type for vrtrace operations.
#[derive(Error, Debug)]
pub enum VrTraceError {
    /// The up vector is parallel to the view direction, so no camera frame exists.
    #[error("degenerate camera frame: up vector is parallel to view direction")]
    DegenerateCameraFrame,

    /// The view direction has zero length.
    #[error("degenerate camera frame: view direction has zero length")]
    ZeroViewDirection,

    /// No camera model is registered under the given name.
    #[error("camera type '{0}' is not registered")]
    UnknownCameraType(String),

    /// A camera model with the given name already exists.
    #[error("camera type '{0}' already registered")]
    CameraTypeExists(String),

    /// A configuration value is out of range.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// The mesh file could not be loaded.
    #[error("failed to load mesh '{path}': {reason}")]
    MeshLoad { path: String, reason: String },

    /// The display backend failed during setup or while running.
    #[error("display error: {0}")]
    Display(String),

    /// The render backend failed.
    #[error("render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for vrtrace operations.
pub type Result<T> = std::result::Result<T, VrTraceError>;
