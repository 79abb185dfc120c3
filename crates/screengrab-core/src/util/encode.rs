//! PNG encoding for captured rasters
//!
//! Rasters are written losslessly in their own color type: no resizing, no
//! color conversion and no metadata beyond what the PNG container requires.
//! The output decodes back to exactly the source pixels at every
//! [`CompressionLevel`].
//!
//! # Compression mapping
//!
//! | Level      | Deflate | Scanline filter |
//! |------------|---------|-----------------|
//! | `None`     | stored  | none            |
//! | `Fast`     | fast    | adaptive        |
//! | `Balanced` | default | adaptive        |
//! | `Best`     | best    | adaptive        |
//!
//! # Examples
//!
//! ```
//! use screengrab_core::{capture::RasterImage, model::CompressionLevel, util::encode::encode_png};
//!
//! let raster = RasterImage::from_test_pattern(320, 200);
//! let png = encode_png(&raster, CompressionLevel::Fast).unwrap();
//! assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
//! ```

use std::io::Write;

use image::ImageEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::capture::RasterImage;
use crate::error::{CaptureError, CaptureResult};
use crate::model::CompressionLevel;

/// Maps a [`CompressionLevel`] to the PNG codec's deflate and filter settings
///
/// `None` writes stored (uncompressed) deflate blocks without scanline
/// filtering, so the output is at least as large as the raw pixel data.
///
/// # Examples
///
/// ```
/// use image::codecs::png::{CompressionType, FilterType};
/// use screengrab_core::{model::CompressionLevel, util::encode::png_settings};
///
/// assert!(matches!(png_settings(CompressionLevel::Best), (CompressionType::Best, FilterType::Adaptive)));
/// assert!(matches!(png_settings(CompressionLevel::None), (CompressionType::Uncompressed, FilterType::NoFilter)));
/// ```
pub fn png_settings(level: CompressionLevel) -> (CompressionType, FilterType) {
    match level {
        CompressionLevel::None => (CompressionType::Uncompressed, FilterType::NoFilter),
        CompressionLevel::Fast => (CompressionType::Fast, FilterType::Adaptive),
        CompressionLevel::Balanced => (CompressionType::Default, FilterType::Adaptive),
        CompressionLevel::Best => (CompressionType::Best, FilterType::Adaptive),
    }
}

fn encoding_failed(reason: impl ToString) -> CaptureError {
    CaptureError::EncodingFailed {
        format: "png".to_string(),
        reason: reason.to_string(),
    }
}

/// Encodes `raster` as PNG at `level` and writes it to `sink`
///
/// The sink is not flushed; callers owning a buffered writer flush it
/// themselves.
///
/// # Errors
///
/// [`CaptureError::EncodingFailed`] when the codec rejects the raster or the
/// sink fails mid-stream.
pub fn encode_to<W: Write>(
    raster: &RasterImage,
    level: CompressionLevel,
    sink: W,
) -> CaptureResult<()> {
    let (compression, filter) = png_settings(level);
    let (width, height) = raster.dimensions();

    if width == 0 || height == 0 {
        return Err(encoding_failed(format!("cannot encode a {width}x{height} image")));
    }

    let encoder = PngEncoder::new_with_quality(sink, compression, filter);
    encoder
        .write_image(raster.as_bytes(), width, height, raster.color().into())
        .map_err(encoding_failed)?;

    tracing::debug!(width, height, %level, "Encoded PNG");
    Ok(())
}

/// Encodes `raster` as PNG into a new byte vector
pub fn encode_png(raster: &RasterImage, level: CompressionLevel) -> CaptureResult<Vec<u8>> {
    let mut output = Vec::new();
    encode_to(raster, level, &mut output)?;
    Ok(output)
}
