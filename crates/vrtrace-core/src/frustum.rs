//! Asymmetric per-eye viewing frustums.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// How a display's raw `top`/`bottom` tangents map onto the image plane.
///
/// Runtimes that report raw projections in a y-down convention (OpenVR's
/// `GetProjectionRaw` returns a negative `top` for the upper half) need the
/// two values swapped before they can be used as lower/upper bounds in the
/// y-up camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalConvention {
    /// `bottom` is the lower bound and `top` the upper bound.
    Standard,
    /// `top` is the lower bound and `bottom` the upper bound (y-down runtimes).
    #[default]
    Swapped,
}

impl VerticalConvention {
    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            VerticalConvention::Standard => "standard",
            VerticalConvention::Swapped => "swapped",
        }
    }
}

/// Image-plane bounds at unit distance along the view direction.
///
/// `lower_left` maps to image coordinate `(0, 0)` and `upper_right` to `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrustumBounds {
    /// Lower-left corner of the image plane.
    pub lower_left: Vec2,
    /// Upper-right corner of the image plane.
    pub upper_right: Vec2,
}

impl FrustumBounds {
    /// Creates bounds from two corners.
    #[must_use]
    pub fn new(lower_left: Vec2, upper_right: Vec2) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    /// Symmetric bounds for a vertical field of view (degrees) and aspect ratio.
    #[must_use]
    pub fn symmetric(fov_vertical_degrees: f32, aspect_ratio: f32) -> Self {
        let half_height = (fov_vertical_degrees.to_radians() * 0.5).tan();
        let half_width = half_height * aspect_ratio;
        Self::new(
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, half_height),
        )
    }

    /// Extent of the image plane (`upper_right - lower_left`).
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.upper_right - self.lower_left
    }

    /// Width over height of the image plane, `None` for zero height.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f32> {
        let size = self.size();
        (size.y != 0.0).then(|| size.x / size.y)
    }

    /// Returns true if the image plane has zero area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        size.x == 0.0 || size.y == 0.0
    }
}

impl Default for FrustumBounds {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ONE)
    }
}

/// Static optics of one eye: raw projection tangents plus the optical center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeFrustum {
    /// Tangent of the left half-angle (usually negative).
    pub left: f32,
    /// Tangent of the right half-angle.
    pub right: f32,
    /// Tangent of the top half-angle, in the runtime's own sign convention.
    pub top: f32,
    /// Tangent of the bottom half-angle, in the runtime's own sign convention.
    pub bottom: f32,
    /// Eye optical center relative to the head origin.
    pub offset: Vec3,
}

impl EyeFrustum {
    /// Creates an eye frustum from raw tangents and an eye offset.
    #[must_use]
    pub fn new(left: f32, right: f32, top: f32, bottom: f32, offset: Vec3) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
            offset,
        }
    }

    /// Symmetric frustum with the given vertical fov (degrees), in the
    /// `Standard` convention.
    #[must_use]
    pub fn symmetric(fov_vertical_degrees: f32, aspect_ratio: f32, offset: Vec3) -> Self {
        let b = FrustumBounds::symmetric(fov_vertical_degrees, aspect_ratio);
        Self::new(
            b.lower_left.x,
            b.upper_right.x,
            b.upper_right.y,
            b.lower_left.y,
            offset,
        )
    }

    /// Image-plane bounds under the given vertical convention.
    #[must_use]
    pub fn bounds(&self, convention: VerticalConvention) -> FrustumBounds {
        let (lower, upper) = match convention {
            VerticalConvention::Standard => (self.bottom, self.top),
            VerticalConvention::Swapped => (self.top, self.bottom),
        };
        FrustumBounds::new(Vec2::new(self.left, lower), Vec2::new(self.right, upper))
    }
}
