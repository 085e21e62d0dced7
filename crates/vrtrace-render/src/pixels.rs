//! CPU-side pixel buffers and blits.
//!
//! Buffers store rows bottom to top: row 0 is image coordinate `t = 0`,
//! the same origin a ray-generation basis uses for `dir00`.

use bytemuck::{Pod, Zeroable};
use glam::{UVec2, Vec3};

use crate::error::{RenderError, RenderResult};

/// One 8-bit sRGB + alpha pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Creates a pixel from components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Encodes a linear color to opaque sRGB.
    #[must_use]
    pub fn from_linear(color: Vec3) -> Self {
        Self::new(
            encode_srgb(color.x),
            encode_srgb(color.y),
            encode_srgb(color.z),
            255,
        )
    }
}

#[allow(clippy::cast_sign_loss)]
fn encode_srgb(linear: f32) -> u8 {
    let c = linear.clamp(0.0, 1.0);
    let encoded = if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0 + 0.5) as u8
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole buffer of the given size.
    #[must_use]
    pub const fn full(size: UVec2) -> Self {
        Self::new(0, 0, size.x, size.y)
    }

    fn check_inside(&self, size: UVec2) -> RenderResult<()> {
        let fits_x = self.x.checked_add(self.width).is_some_and(|end| end <= size.x);
        let fits_y = self.y.checked_add(self.height).is_some_and(|end| end <= size.y);
        if fits_x && fits_y {
            Ok(())
        } else {
            Err(RenderError::RegionOutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                buffer_width: size.x,
                buffer_height: size.y,
            })
        }
    }
}

/// A width x height grid of [`Rgba8`] pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl PixelBuffer {
    /// Allocates a buffer filled with `fill`.
    pub fn new(size: UVec2, fill: Rgba8) -> RenderResult<Self> {
        if size.x == 0 || size.y == 0 {
            return Err(RenderError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }
        Ok(Self {
            width: size.x,
            height: size.y,
            pixels: vec![fill; size.x as usize * size.y as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Pixel at column `x`, row `y` (row 0 is the bottom).
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        (x < self.width && y < self.height)
            .then(|| self.pixels[self.index(x, y)])
    }

    /// Overwrites one pixel; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, pixel: Rgba8) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = pixel;
        }
    }

    /// Fills every pixel with one value.
    pub fn fill(&mut self, pixel: Rgba8) {
        self.pixels.fill(pixel);
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba8] {
        &mut self.pixels
    }

    /// Raw RGBA bytes, 4 per pixel, bottom row first.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[Rgba8] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Copies all of `src` into this buffer with its lower-left corner at `(x, y)`.
    pub fn write_region(&mut self, x: u32, y: u32, src: &PixelBuffer) -> RenderResult<()> {
        Rect::new(x, y, src.width, src.height).check_inside(self.size())?;
        let w = src.width as usize;
        for row in 0..src.height {
            let dst_start = self.index(x, y + row);
            self.pixels[dst_start..dst_start + w].copy_from_slice(src.row(row));
        }
        Ok(())
    }
}

/// Nearest-neighbor blit from `src_rect` of `src` into `dst_rect` of `dst`,
/// scaling as needed.
pub fn blit(
    src: &PixelBuffer,
    src_rect: Rect,
    dst: &mut PixelBuffer,
    dst_rect: Rect,
) -> RenderResult<()> {
    src_rect.check_inside(src.size())?;
    dst_rect.check_inside(dst.size())?;
    if src_rect.width == 0 || src_rect.height == 0 {
        return Ok(());
    }

    let same_size = src_rect.width == dst_rect.width && src_rect.height == dst_rect.height;
    for dy in 0..dst_rect.height {
        let sy = if same_size {
            dy
        } else {
            scale_coord(dy, dst_rect.height, src_rect.height)
        };
        let src_row = src.row(src_rect.y + sy);
        let dst_start = dst.index(dst_rect.x, dst_rect.y + dy);
        let dst_row = &mut dst.pixels[dst_start..dst_start + dst_rect.width as usize];
        if same_size {
            let start = src_rect.x as usize;
            dst_row.copy_from_slice(&src_row[start..start + src_rect.width as usize]);
        } else {
            for (dx, out) in dst_row.iter_mut().enumerate() {
                let sx = scale_coord(dx as u32, dst_rect.width, src_rect.width);
                *out = src_row[(src_rect.x + sx) as usize];
            }
        }
    }
    Ok(())
}

/// Maps a destination pixel center to the nearest source pixel.
fn scale_coord(dst: u32, dst_len: u32, src_len: u32) -> u32 {
    let mapped = (u64::from(dst) * 2 + 1) * u64::from(src_len) / (u64::from(dst_len) * 2);
    (mapped as u32).min(src_len - 1)
}
