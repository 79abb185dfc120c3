//! Mock capture strategy for testing
//!
//! [`MockStrategy`] implements [`CaptureStrategy`] without a display server.
//! It reports a configurable display layout, renders a synthetic gradient for
//! every capture and records what it was asked to do, so tests can assert on
//! the exact rectangle the orchestrator resolved.
//!
//! # Features
//!
//! - **Configurable layout:** any list of [`DisplayInfo`], including none
//! - **Availability toggle:** exercise registry selection order
//! - **Error injection:** fail enumeration and capture independently
//! - **Ambient target:** an in-memory `DISPLAY` with fallback `:0`
//! - **Call recording:** requested rectangles and the target seen by each
//!   capture
//!
//! # Examples
//!
//! ```
//! use screengrab_core::capture::{CaptureStrategy, MockStrategy};
//! use screengrab_core::model::{DisplayInfo, Rect};
//!
//! let mock = MockStrategy::new().with_displays(vec![
//!     DisplayInfo::new("left", Rect::new(0, 0, 1920, 1080)),
//!     DisplayInfo::new("right", Rect::new(1920, 0, 1920, 1080)),
//! ]);
//!
//! let raster = mock.capture_rect(Rect::new(10, 10, 200, 100)).unwrap();
//! assert_eq!(raster.dimensions(), (200, 100));
//! assert_eq!(mock.captured_rects(), vec![Rect::new(10, 10, 200, 100)]);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{CaptureStrategy, DisplayTarget, MemoryTargetStore, RasterImage};
use crate::config;
use crate::error::{CaptureError, CaptureResult};
use crate::model::{DisplayInfo, Rect};

/// Mock capture strategy for tests and development
#[derive(Debug)]
pub struct MockStrategy {
    name:                &'static str,
    available:           bool,
    displays:            Vec<DisplayInfo>,
    /// Reason reported when enumeration is asked to fail
    enumeration_error:   Option<String>,
    /// Reason reported when capture is asked to fail
    capture_error:       Option<String>,
    target:              DisplayTarget,
    captured:            Mutex<Vec<Rect>>,
    targets_seen:        Mutex<Vec<Option<String>>>,
    enumerations:        AtomicUsize,
    availability_checks: AtomicUsize,
}

impl MockStrategy {
    /// Creates an available mock named `"mock"` with a single 1920x1080
    /// display at the origin and no ambient target configured
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Same as [`new`](Self::new) with a custom strategy name
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            available: true,
            displays: vec![DisplayInfo::new("MOCK-0", Rect::new(0, 0, 1920, 1080))],
            enumeration_error: None,
            capture_error: None,
            target: DisplayTarget::new(
                Arc::new(MemoryTargetStore::new(config::X11_DISPLAY_ENV, None)),
                config::FALLBACK_X11_DISPLAY,
            ),
            captured: Mutex::new(Vec::new()),
            targets_seen: Mutex::new(Vec::new()),
            enumerations: AtomicUsize::new(0),
            availability_checks: AtomicUsize::new(0),
        }
    }

    /// Sets whether the availability check passes
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Replaces the reported display layout
    pub fn with_displays(mut self, displays: Vec<DisplayInfo>) -> Self {
        self.displays = displays;
        self
    }

    /// Makes `displays()` fail with a backend error carrying `reason`
    pub fn with_enumeration_error(mut self, reason: impl Into<String>) -> Self {
        self.enumeration_error = Some(reason.into());
        self
    }

    /// Makes `capture_rect()` fail with a backend error carrying `reason`
    pub fn with_capture_error(mut self, reason: impl Into<String>) -> Self {
        self.capture_error = Some(reason.into());
        self
    }

    /// Sets the initial ambient target value (`None` = unset)
    pub fn with_ambient_target(self, value: Option<&str>) -> Self {
        self.target.store().set(value);
        self
    }

    /// Current ambient target value as stored, without fallback
    pub fn ambient_target(&self) -> Option<String> {
        self.target.store().get()
    }

    /// Every rectangle passed to `capture_rect`, in call order
    pub fn captured_rects(&self) -> Vec<Rect> {
        self.captured.lock().clone()
    }

    /// The ambient target value observed during each capture, in call order
    pub fn targets_seen(&self) -> Vec<Option<String>> {
        self.targets_seen.lock().clone()
    }

    /// Number of `displays()` calls
    pub fn enumeration_count(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }

    /// Number of `is_available()` calls
    pub fn availability_checks(&self) -> usize {
        self.availability_checks.load(Ordering::SeqCst)
    }
}

impl Default for MockStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStrategy for MockStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_available(&self) -> bool {
        self.availability_checks.fetch_add(1, Ordering::SeqCst);
        self.available
    }

    fn displays(&self) -> CaptureResult<Vec<DisplayInfo>> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.enumeration_error {
            return Err(CaptureError::backend(self.name, reason));
        }
        Ok(self.displays.clone())
    }

    fn capture_rect(&self, rect: Rect) -> CaptureResult<RasterImage> {
        self.captured.lock().push(rect);
        self.targets_seen.lock().push(self.target.store().get());

        if let Some(reason) = &self.capture_error {
            return Err(CaptureError::backend(self.name, reason));
        }
        Ok(RasterImage::from_test_pattern(rect.width, rect.height))
    }

    fn display_target(&self) -> Option<&DisplayTarget> {
        Some(&self.target)
    }
}
