//! Rendering backend for vrtrace.
//!
//! This crate provides everything between a committed camera basis and the
//! pixels handed to a compositor:
//! - Triangle mesh scenes and a median-split BVH
//! - The [`RenderBackend`] trait and the reference CPU [`RaycastRenderer`]
//! - Pixel buffers, nearest-neighbor blits and side-by-side stereo targets
//! - PNG/JPEG export of frames and previews

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Buffer dimensions are u32 and index usize throughout
#![allow(clippy::cast_possible_truncation)]

pub mod backend;
pub mod bvh;
pub mod error;
pub mod pixels;
pub mod raycast;
pub mod scene;
pub mod screenshot;
pub mod target;

pub use backend::RenderBackend;
pub use bvh::{Aabb, BuildStats, Bvh, Hit};
pub use error::{RenderError, RenderResult};
pub use pixels::{blit, PixelBuffer, Rect, Rgba8};
pub use raycast::{RaycastRenderer, RaycastScene, ShadeMode};
pub use scene::TriangleMesh;
pub use screenshot::{save_image, save_to_buffer, ScreenshotError};
pub use target::{ResolveTarget, StereoTarget};
