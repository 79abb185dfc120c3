//! Capture strategy for Windows and macOS desktops
//!
//! Both platforms address monitors directly, so there is no ambient display
//! target to scope. On macOS the first capture triggers the Screen Recording
//! permission prompt; until it is granted, captures fail with a backend error.

use super::{CaptureStrategy, RasterImage, xcap_source};
use crate::error::CaptureResult;
use crate::model::{DisplayInfo, Rect};

#[cfg(target_os = "windows")]
const NAME: &str = "windows";

#[cfg(target_os = "macos")]
const NAME: &str = "macos";

/// Native desktop capture strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopStrategy;

impl DesktopStrategy {
    /// Creates the strategy
    pub fn new() -> Self {
        Self
    }
}

impl CaptureStrategy for DesktopStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        let count = xcap_source::monitor_count();
        tracing::debug!(strategy = NAME, count, "Desktop monitor count");
        count > 0
    }

    fn displays(&self) -> CaptureResult<Vec<DisplayInfo>> {
        xcap_source::displays(NAME)
    }

    fn capture_rect(&self, rect: Rect) -> CaptureResult<RasterImage> {
        xcap_source::capture_rect(NAME, rect)
    }
}
