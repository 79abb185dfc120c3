//! Synthetic rasters and monitor layouts
//!
//! [`desktop_like`] imitates a real screenshot: a smooth background, flat
//! window rectangles with title bars and rows of repeated glyph-like marks.
//! It compresses well, which makes it the fixture for compression-level
//! comparisons. [`noise`] is the opposite: near-incompressible pixels.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use screengrab_core::capture::RasterImage;
use screengrab_core::model::{DisplayInfo, Rect};

/// A redundant, screenshot-like RGBA raster
pub fn desktop_like(width: u32, height: u32) -> RasterImage {
    let mut img = RgbaImage::from_fn(width, height, |x, y| {
        let shade = ((x + y) / 8 % 64) as u8;
        Rgba([30 + shade, 40 + shade, 70 + shade, 255])
    });

    // Windows tiled on a 240x160 grid, each with a title bar and text rows
    for (wx, wy) in (0..width).step_by(240).flat_map(|x| (0..height).step_by(160).map(move |y| (x, y))) {
        for y in wy + 8..(wy + 150).min(height) {
            for x in wx + 8..(wx + 230).min(width) {
                let local_y = y - wy - 8;
                let local_x = x - wx - 8;
                let pixel = if local_y < 18 {
                    Rgba([60, 60, 64, 255])
                } else if local_y % 12 < 7 && local_x % 7 < 4 && local_x > 6 {
                    Rgba([20, 20, 20, 255])
                } else {
                    Rgba([245, 245, 245, 255])
                };
                img.put_pixel(x, y, pixel);
            }
        }
    }

    RasterImage::from_rgba8(img)
}

/// A near-incompressible RGBA raster, deterministic for a given seed
pub fn noise(width: u32, height: u32, seed: u64) -> RasterImage {
    let mut state = seed.max(1);
    let img = RgbaImage::from_fn(width, height, |_, _| {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let [r, g, b, ..] = state.to_le_bytes();
        Rgba([r, g, b, 255])
    });
    RasterImage::from_rgba8(img)
}

/// Decodes PNG bytes, panicking with context on failure
pub fn decode_png(bytes: &[u8]) -> DynamicImage {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .unwrap_or_else(|e| panic!("failed to decode PNG ({} bytes): {e}", bytes.len()))
}

/// Two 1920x1080 monitors side by side
pub fn side_by_side_layout() -> Vec<DisplayInfo> {
    vec![
        DisplayInfo::new("DP-1", Rect::new(0, 0, 1920, 1080)),
        DisplayInfo::new("DP-2", Rect::new(1920, 0, 1920, 1080)),
    ]
}

/// Two monitors touching only at a corner, leaving two uncovered quadrants
/// inside their bounding box
pub fn diagonal_layout() -> Vec<DisplayInfo> {
    vec![
        DisplayInfo::new("eDP-1", Rect::new(0, 0, 1280, 1024)),
        DisplayInfo::new("HDMI-1", Rect::new(1280, 1024, 1920, 1080)),
    ]
}

/// A primary monitor with a secondary one above and to the left of it
pub fn negative_origin_layout() -> Vec<DisplayInfo> {
    vec![
        DisplayInfo::new("primary", Rect::new(0, 0, 2560, 1440)),
        DisplayInfo::new("secondary", Rect::new(-1920, -1080, 1920, 1080)),
    ]
}
