//! Assembling a capture rectangle from per-source images
//!
//! Source bounds are in logical virtual-screen units. The image captured for
//! a source may be denser than its bounds: macOS reports monitor bounds in
//! points while the captured image is in backing pixels. The canvas is always
//! in logical units and exactly `rect`-sized. Each overlap is cropped from its
//! source in the source's own pixel space, then resampled to the overlap's
//! logical size when the densities differ.
//!
//! Canvas pixels no source covers stay transparent black.

use image::{RgbaImage, imageops};

use crate::config;
use crate::error::{CaptureError, CaptureResult};
use crate::model::Rect;

/// Fails when a canvas for `rect` would exceed [`config::MAX_CAPTURE_PIXELS`]
pub fn check_canvas(strategy: &'static str, rect: Rect) -> CaptureResult<()> {
    let pixels = u64::from(rect.width) * u64::from(rect.height);
    if pixels > config::MAX_CAPTURE_PIXELS {
        return Err(CaptureError::backend(
            strategy,
            format!(
                "region {rect} needs {pixels} pixels, more than the {} pixel limit",
                config::MAX_CAPTURE_PIXELS
            ),
        ));
    }
    Ok(())
}

/// Wraps a raw RGBA buffer reported by `source`
///
/// # Errors
///
/// [`CaptureError::Backend`] when `raw` holds fewer than `width * height`
/// pixels.
pub fn rgba_from_raw(
    strategy: &'static str,
    source: &str,
    width: u32,
    height: u32,
    raw: Vec<u8>,
) -> CaptureResult<RgbaImage> {
    RgbaImage::from_raw(width, height, raw).ok_or_else(|| {
        CaptureError::backend(strategy, format!("{source} returned a truncated buffer"))
    })
}

/// Builds a `rect`-sized canvas from `sources`, each an image of the area
/// inside its bounds
///
/// Overlaps are computed before anything is allocated: a `rect` that touches
/// no source, or one whose canvas exceeds the pixel limit, fails without
/// allocating the canvas.
pub fn composite(
    strategy: &'static str,
    rect: Rect,
    sources: &[(Rect, RgbaImage)],
) -> CaptureResult<RgbaImage> {
    let overlaps: Vec<(Rect, Rect, &RgbaImage)> = sources
        .iter()
        .filter_map(|(bounds, image)| {
            rect.intersection(bounds).map(|overlap| (*bounds, overlap, image))
        })
        .collect();

    if overlaps.is_empty() {
        return Err(CaptureError::backend(
            strategy,
            format!("region {rect} does not intersect any monitor"),
        ));
    }
    check_canvas(strategy, rect)?;

    let mut canvas = RgbaImage::new(rect.width, rect.height);
    for (bounds, overlap, image) in overlaps {
        let Some(part) = source_region(bounds, overlap, image) else {
            tracing::debug!(strategy, %bounds, %overlap, "Source image does not cover its overlap");
            continue;
        };

        let dst_x = i64::from(overlap.x) - i64::from(rect.x);
        let dst_y = i64::from(overlap.y) - i64::from(rect.y);
        imageops::replace(&mut canvas, &part, dst_x, dst_y);
    }

    Ok(canvas)
}

/// The part of `image` showing `overlap`, at `overlap`'s logical size
fn source_region(bounds: Rect, overlap: Rect, image: &RgbaImage) -> Option<RgbaImage> {
    if bounds.is_empty() || image.width() == 0 || image.height() == 0 {
        return None;
    }

    let scale_x = f64::from(image.width()) / f64::from(bounds.width);
    let scale_y = f64::from(image.height()) / f64::from(bounds.height);

    let offset_x = (i64::from(overlap.x) - i64::from(bounds.x)) as f64;
    let offset_y = (i64::from(overlap.y) - i64::from(bounds.y)) as f64;

    let x0 = (offset_x * scale_x).floor() as u32;
    let y0 = (offset_y * scale_y).floor() as u32;
    let x1 = (((offset_x + f64::from(overlap.width)) * scale_x).ceil() as u32).min(image.width());
    let y1 = (((offset_y + f64::from(overlap.height)) * scale_y).ceil() as u32).min(image.height());

    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let part = imageops::crop_imm(image, x0, y0, x1 - x0, y1 - y0).to_image();
    if part.dimensions() == (overlap.width, overlap.height) {
        Some(part)
    } else {
        Some(imageops::resize(
            &part,
            overlap.width,
            overlap.height,
            imageops::FilterType::Triangle,
        ))
    }
}
