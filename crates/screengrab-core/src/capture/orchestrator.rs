//! Capture orchestrator
//!
//! [`Capturer`] turns a [`CaptureRequest`] into a [`RasterImage`] using the
//! first available strategy of its registry. It is mechanism-agnostic: all
//! platform knowledge lives behind [`CaptureStrategy`].
//!
//! # Request resolution
//!
//! 1. Select the active strategy.
//! 2. Enter the strategy's display-target scope (override, or fallback when
//!    nothing is configured). The scope is held until the capture returns.
//! 3. A region is captured as-is; monitor enumeration is skipped.
//! 4. Otherwise enumerate displays and resolve the rectangle with
//!    [`resolve_capture_rect`].
//!
//! "All monitors" is the bounding box of every display, so pixels in gaps
//! between non-adjacent monitors are whatever the mechanism returns for them.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{CaptureStrategy, RasterImage, StrategyRegistry, TargetScope, create_default_registry};
use crate::error::{CaptureError, CaptureResult};
use crate::model::{CaptureRequest, CompressionLevel, DisplayInfo, Monitor, MonitorSelection, Rect};
use crate::util::files;

/// A registered strategy together with its current availability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyStatus {
    /// Strategy identifier
    pub name:      &'static str,
    /// Result of the availability check
    pub available: bool,
}

/// Resolves the rectangle to capture for a monitor selection.
///
/// `strategy` names the mechanism that produced `displays` and is only used
/// for error reporting.
///
/// # Errors
///
/// - [`CaptureError::NoActiveDisplays`] when `displays` is empty
/// - [`CaptureError::MonitorOutOfRange`] when an index is outside
///   `0..displays.len()`
///
/// # Examples
///
/// ```
/// use screengrab_core::capture::resolve_capture_rect;
/// use screengrab_core::model::{DisplayInfo, MonitorSelection, Rect};
///
/// let displays = [
///     DisplayInfo::new("left", Rect::new(0, 0, 1920, 1080)),
///     DisplayInfo::new("right", Rect::new(1920, 0, 1920, 1080)),
/// ];
///
/// let all = resolve_capture_rect("x11", MonitorSelection::All, &displays).unwrap();
/// assert_eq!(all, Rect::new(0, 0, 3840, 1080));
///
/// let right = resolve_capture_rect("x11", MonitorSelection::Index(1), &displays).unwrap();
/// assert_eq!(right, Rect::new(1920, 0, 1920, 1080));
/// ```
pub fn resolve_capture_rect(
    strategy: &'static str,
    selection: MonitorSelection,
    displays: &[DisplayInfo],
) -> CaptureResult<Rect> {
    if displays.is_empty() {
        return Err(CaptureError::NoActiveDisplays { strategy });
    }

    match selection {
        MonitorSelection::All => Rect::bounding_box(displays.iter().map(|d| d.bounds))
            .ok_or(CaptureError::NoActiveDisplays { strategy }),
        MonitorSelection::Index(index) => usize::try_from(index)
            .ok()
            .and_then(|i| displays.get(i))
            .map(|d| d.bounds)
            .ok_or(CaptureError::MonitorOutOfRange {
                index,
                count: displays.len(),
            }),
    }
}

/// Enters the strategy's display-target scope, if it has one.
fn enter_target<'a>(
    strategy: &'a dyn CaptureStrategy,
    display_override: Option<&str>,
) -> Option<TargetScope<'a>> {
    match strategy.display_target() {
        Some(target) => Some(target.scope(display_override)),
        None => {
            if let Some(display_name) = display_override {
                warn!(
                    strategy = strategy.name(),
                    display = display_name, "Strategy has no display target, ignoring display override"
                );
            }
            None
        }
    }
}

/// Capture orchestrator over a [`StrategyRegistry`]
#[derive(Debug, Clone)]
pub struct Capturer {
    registry: StrategyRegistry,
}

impl Capturer {
    /// Creates a capturer over an explicit registry
    pub fn new(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Creates a capturer over the strategies compiled in for this platform
    pub fn with_default_strategies() -> Self {
        Self::new(create_default_registry())
    }

    /// The underlying registry
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Every registered strategy with its current availability
    pub fn strategies(&self) -> Vec<StrategyStatus> {
        self.registry
            .all()
            .iter()
            .map(|s| StrategyStatus {
                name:      s.name(),
                available: s.is_available(),
            })
            .collect()
    }

    /// Captures the area described by `request`.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::NoStrategyAvailable`] when no mechanism is usable
    /// - [`CaptureError::NoActiveDisplays`] when enumeration is empty
    /// - [`CaptureError::MonitorOutOfRange`] for an invalid monitor index
    /// - [`CaptureError::Backend`] for any mechanism failure
    pub fn capture(&self, request: &CaptureRequest) -> CaptureResult<RasterImage> {
        let strategy = self.registry.active_strategy()?;
        Self::capture_with(&strategy, request)
    }

    fn capture_with(
        strategy: &Arc<dyn CaptureStrategy>,
        request: &CaptureRequest,
    ) -> CaptureResult<RasterImage> {
        let name = strategy.name();
        let _target = enter_target(strategy.as_ref(), request.display_override());

        let rect = match request.region() {
            Some(region) => {
                debug!(strategy = name, %region, "Capturing explicit region");
                region
            }
            None => {
                let displays = strategy.displays()?;
                debug!(strategy = name, count = displays.len(), "Enumerated displays");
                resolve_capture_rect(name, request.monitor(), &displays)?
            }
        };

        let raster = strategy.capture_rect(rect)?;
        info!(strategy = name, %rect, "Captured screenshot");
        Ok(raster)
    }

    /// Enumerates monitors on the ambient display target
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoActiveDisplays`] when enumeration is empty, plus the
    /// strategy selection and mechanism errors of [`capture`](Self::capture).
    pub fn list_monitors(&self) -> CaptureResult<Vec<Monitor>> {
        self.list_monitors_on(None)
    }

    /// Enumerates monitors, addressing `display_override` for this call only
    pub fn list_monitors_on(&self, display_override: Option<&str>) -> CaptureResult<Vec<Monitor>> {
        let strategy = self.registry.active_strategy()?;
        let _target = enter_target(strategy.as_ref(), display_override);

        let displays = strategy.displays()?;
        if displays.is_empty() {
            return Err(CaptureError::NoActiveDisplays {
                strategy: strategy.name(),
            });
        }

        Ok(displays
            .into_iter()
            .enumerate()
            .map(|(index, display)| Monitor {
                index,
                display_name: display.name,
                bounds: display.bounds,
            })
            .collect())
    }

    /// Captures `request` and writes it to `path` as PNG
    pub fn capture_to_file(
        &self,
        request: &CaptureRequest,
        level: CompressionLevel,
        path: &Path,
    ) -> CaptureResult<()> {
        let raster = self.capture(request)?;
        files::write_to_file(&raster, level, path)
    }
}
