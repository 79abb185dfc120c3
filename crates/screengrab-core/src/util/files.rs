//! File output for captured screenshots
//!
//! [`write_to_file`] creates missing parent directories, truncates or creates
//! the target and closes it before returning on every path, so the file can
//! be renamed or deleted immediately afterwards.
//!
//! [`default_filename`] builds `<prefix>_<YYYY-MM-DD_HH-MM-SS>.png` from the
//! local clock. Two calls in the same second return the same name.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;

use super::encode::encode_to;
use crate::capture::RasterImage;
use crate::config;
use crate::error::{CaptureError, CaptureResult};
use crate::model::CompressionLevel;

/// Encodes `raster` as PNG and writes it to `path`
///
/// # Errors
///
/// - [`CaptureError::CreateDirectory`] when a parent directory cannot be
///   created
/// - [`CaptureError::WriteOutput`] when the file cannot be created, written or
///   flushed
/// - [`CaptureError::EncodingFailed`] when the codec rejects the raster
pub fn write_to_file(raster: &RasterImage, level: CompressionLevel, path: &Path) -> CaptureResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CaptureError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_failed = |source| CaptureError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_failed)?;
    let mut writer = BufWriter::new(file);
    encode_to(raster, level, &mut writer)?;
    writer.flush().map_err(write_failed)?;
    drop(writer);

    tracing::info!(path = %path.display(), %level, "Wrote screenshot");
    Ok(())
}

/// Generates `<prefix>_<local timestamp>.png`
///
/// An empty prefix is replaced with [`config::DEFAULT_FILENAME_PREFIX`].
///
/// # Examples
///
/// ```
/// use screengrab_core::util::files::default_filename;
///
/// assert!(default_filename("").starts_with("screenshot_"));
/// assert!(default_filename("desk").ends_with(".png"));
/// ```
pub fn default_filename(prefix: &str) -> String {
    let prefix = if prefix.is_empty() {
        config::DEFAULT_FILENAME_PREFIX
    } else {
        prefix
    };
    let timestamp = Local::now().format(config::FILENAME_TIMESTAMP_FORMAT);
    format!("{prefix}_{timestamp}.png")
}
