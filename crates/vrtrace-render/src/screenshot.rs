//! Image export for rendered frames and previews.

use image::{ImageBuffer, Rgba};
use std::path::Path;

use crate::pixels::PixelBuffer;

/// Converts a bottom-up [`PixelBuffer`] into a top-down RGBA image.
fn to_image(buffer: &PixelBuffer) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, ScreenshotError> {
    // Pixel buffers store row 0 at the bottom; image files start at the top.
    let mut rgba_data: Vec<u8> = Vec::with_capacity(buffer.as_bytes().len());
    for y in (0..buffer.height()).rev() {
        rgba_data.extend_from_slice(bytemuck::cast_slice(buffer.row(y)));
    }

    ImageBuffer::from_raw(buffer.width(), buffer.height(), rgba_data)
        .ok_or(ScreenshotError::InvalidImageData)
}

/// Saves a pixel buffer to an image file.
///
/// # Arguments
/// * `path` - Output filename (supports .png, .jpg, .jpeg)
/// * `buffer` - Pixels to write, bottom row first
///
/// # Errors
/// Returns an error if the file cannot be written or format is unsupported.
pub fn save_image(path: impl AsRef<Path>, buffer: &PixelBuffer) -> Result<(), ScreenshotError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let img = to_image(buffer)?;

    match extension.as_str() {
        "png" => {
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
        "jpg" | "jpeg" => {
            // Convert to RGB for JPEG (no alpha)
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb_img.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => {
            return Err(ScreenshotError::UnsupportedFormat(extension));
        }
    }

    log::debug!(
        "saved {}x{} image to {}",
        buffer.width(),
        buffer.height(),
        path.display()
    );
    Ok(())
}

/// Encodes a pixel buffer as PNG in memory.
pub fn save_to_buffer(buffer: &PixelBuffer) -> Result<Vec<u8>, ScreenshotError> {
    let img = to_image(buffer)?;

    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)?;

    Ok(out.into_inner())
}

/// Error type for screenshot operations.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image data")]
    InvalidImageData,
}

impl From<ScreenshotError> for vrtrace_core::VrTraceError {
    fn from(err: ScreenshotError) -> Self {
        match err {
            ScreenshotError::IoError(e) => vrtrace_core::VrTraceError::IoError(e),
            other => vrtrace_core::VrTraceError::Render(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Rgba8;
    use glam::UVec2;

    #[test]
    fn test_png_is_flipped_top_down() {
        let mut buffer = PixelBuffer::new(UVec2::new(2, 2), Rgba8::BLACK).unwrap();
        buffer.set(0, 0, Rgba8::new(255, 0, 0, 255));

        let png = save_to_buffer(&buffer).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        // Bottom-left in the buffer is bottom-left in the image, i.e. last row.
        assert_eq!(decoded.get_pixel(0, 1).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_unsupported_extension() {
        let buffer = PixelBuffer::new(UVec2::new(1, 1), Rgba8::BLACK).unwrap();
        let path = std::env::temp_dir().join("vrtrace_screenshot_test.bmpx");
        assert!(matches!(
            save_image(&path, &buffer),
            Err(ScreenshotError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_save_png_file() {
        let buffer = PixelBuffer::new(UVec2::new(3, 2), Rgba8::new(10, 20, 30, 255)).unwrap();
        let path = std::env::temp_dir().join(format!(
            "vrtrace_screenshot_test_{}.png",
            std::process::id()
        ));
        save_image(&path, &buffer).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [10, 20, 30, 255]);
        let _ = std::fs::remove_file(&path);
    }
}
