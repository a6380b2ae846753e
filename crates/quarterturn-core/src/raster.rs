//! Pixel buffer shared by the rotation and codec modules.
//!
//! # Memory Layout
//!
//! Pixels are stored as RGB8 in a flat buffer in row-major order:
//!
//! ```text
//! pixels[(y * width + x) * 3 + channel]
//! ```

/// Number of bytes per pixel (RGB8).
pub const CHANNELS: usize = 3;

/// An in-memory image with RGB pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length is `width * height * 3`.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a new `Raster` from dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a `Raster` from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an `image::RgbImage`. Returns `None` if the buffer
    /// length does not match the dimensions.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// The RGB bytes of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        &self.pixels[idx..idx + CHANNELS]
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// True if the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
