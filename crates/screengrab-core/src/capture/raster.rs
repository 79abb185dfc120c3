//! In-memory raster produced by a capture
//!
//! [`RasterImage`] wraps `image::DynamicImage` so the pixel format travels
//! with the buffer. A raster is produced once per capture call and never
//! modified afterwards; encoding borrows it.

use image::GenericImageView;

/// Captured pixels plus their color type and dimensions
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    inner: image::DynamicImage,
}

impl RasterImage {
    /// Creates a new RasterImage from a DynamicImage
    ///
    /// # Examples
    ///
    /// ```
    /// use image::DynamicImage;
    /// use screengrab_core::capture::RasterImage;
    ///
    /// let raster = RasterImage::new(DynamicImage::new_rgb8(100, 100));
    /// assert_eq!(raster.dimensions(), (100, 100));
    /// ```
    pub fn new(image: image::DynamicImage) -> Self {
        Self { inner: image }
    }

    /// Wraps an RGBA8 buffer, the format every platform source produces
    pub fn from_rgba8(image: image::RgbaImage) -> Self {
        Self::new(image::DynamicImage::ImageRgba8(image))
    }

    /// Returns the dimensions of the image as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Returns the image width in pixels
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    /// Returns the image height in pixels
    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// Pixel format of the buffer
    pub fn color(&self) -> image::ColorType {
        self.inner.color()
    }

    /// Raw pixel bytes in the buffer's own color type
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    /// Creates a test pattern image with the specified dimensions
    ///
    /// Generates a vertical gradient from blue (top) to cyan (bottom), useful
    /// for exercising encoders and sinks without a display server.
    pub fn from_test_pattern(width: u32, height: u32) -> Self {
        use image::{ImageBuffer as ImgBuf, Rgba};

        let start_color = Rgba([0u8, 0u8, 255u8, 255u8]);
        let end_color = Rgba([0u8, 255u8, 255u8, 255u8]);

        let img = ImgBuf::from_fn(width, height, |_x, y| {
            let ratio = y as f32 / height.max(1) as f32;
            Rgba([
                (start_color[0] as f32 * (1.0 - ratio) + end_color[0] as f32 * ratio) as u8,
                (start_color[1] as f32 * (1.0 - ratio) + end_color[1] as f32 * ratio) as u8,
                (start_color[2] as f32 * (1.0 - ratio) + end_color[2] as f32 * ratio) as u8,
                255,
            ])
        });

        Self::from_rgba8(img)
    }

    /// Returns a reference to the inner DynamicImage
    pub fn inner(&self) -> &image::DynamicImage {
        &self.inner
    }

    /// Consumes self and returns the inner DynamicImage
    pub fn into_inner(self) -> image::DynamicImage {
        self.inner
    }
}
