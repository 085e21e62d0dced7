//! Display backend error types.

use thiserror::Error;
use vrtrace_core::Eye;

/// Errors reported by pose sources, compositors and display backends.
#[derive(Error, Debug)]
pub enum HmdError {
    /// The runtime or device could not be opened.
    #[error("display unavailable: {0}")]
    Unavailable(String),

    /// The headset is connected but not tracking.
    #[error("headset is not tracking")]
    NotTracking,

    /// The runtime reported unusable eye intrinsics.
    #[error("invalid {eye} eye intrinsics: {reason}")]
    InvalidIntrinsics { eye: Eye, reason: String },

    /// The compositor rejected a submitted eye texture.
    #[error("{eye} eye submit failed: {reason}")]
    Submit { eye: Eye, reason: String },

    /// A headset setting is out of range.
    #[error("invalid headset setting '{name}': {reason}")]
    InvalidConfig { name: &'static str, reason: String },
}

/// A specialized Result type for display backend operations.
pub type HmdResult<T> = std::result::Result<T, HmdError>;

impl From<HmdError> for vrtrace_core::VrTraceError {
    fn from(err: HmdError) -> Self {
        vrtrace_core::VrTraceError::Display(err.to_string())
    }
}
