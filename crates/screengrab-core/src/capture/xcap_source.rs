//! Monitor enumeration and rectangle capture through `xcap`
//!
//! `xcap` captures whole monitors. An arbitrary virtual-screen rectangle is
//! produced by capturing only the monitors that intersect it and handing the
//! images to [`composite`](super::composite::composite).

use xcap::Monitor;

use super::RasterImage;
use super::composite;
use crate::error::{CaptureError, CaptureResult};
use crate::model::{DisplayInfo, Rect};

/// A monitor paired with its virtual-screen bounds
struct Located {
    monitor: Monitor,
    name:    String,
    bounds:  Rect,
}

fn locate_all(strategy: &'static str) -> CaptureResult<Vec<Located>> {
    let monitors = Monitor::all().map_err(|e| CaptureError::backend(strategy, e))?;

    monitors
        .into_iter()
        .map(|monitor| -> CaptureResult<Located> {
            let bounds = Rect::new(
                monitor.x().map_err(|e| CaptureError::backend(strategy, e))?,
                monitor.y().map_err(|e| CaptureError::backend(strategy, e))?,
                monitor.width().map_err(|e| CaptureError::backend(strategy, e))?,
                monitor.height().map_err(|e| CaptureError::backend(strategy, e))?,
            );
            let name = monitor.name().map_err(|e| CaptureError::backend(strategy, e))?;
            Ok(Located {
                monitor,
                name,
                bounds,
            })
        })
        .collect()
}

/// Lists monitors in the order the OS reports them
pub fn displays(strategy: &'static str) -> CaptureResult<Vec<DisplayInfo>> {
    let displays: Vec<DisplayInfo> = locate_all(strategy)?
        .into_iter()
        .map(|located| DisplayInfo::new(located.name, located.bounds))
        .collect();

    tracing::debug!(strategy, count = displays.len(), "xcap enumerated monitors");
    Ok(displays)
}

/// Number of monitors the OS reports, or 0 when enumeration fails
pub fn monitor_count() -> usize {
    Monitor::all().map(|monitors| monitors.len()).unwrap_or(0)
}

/// Captures `rect` from every monitor it touches
pub fn capture_rect(strategy: &'static str, rect: Rect) -> CaptureResult<RasterImage> {
    let touched: Vec<Located> = locate_all(strategy)?
        .into_iter()
        .filter(|located| rect.intersection(&located.bounds).is_some())
        .collect();

    if touched.is_empty() {
        return Err(CaptureError::backend(
            strategy,
            format!("region {rect} does not intersect any monitor"),
        ));
    }
    composite::check_canvas(strategy, rect)?;

    let mut sources = Vec::with_capacity(touched.len());
    for located in touched {
        let shot = located
            .monitor
            .capture_image()
            .map_err(|e| CaptureError::backend(strategy, e))?;
        let (width, height) = (shot.width(), shot.height());
        let shot = composite::rgba_from_raw(strategy, &located.name, width, height, shot.into_raw())?;

        tracing::debug!(
            strategy,
            monitor = %located.name,
            bounds = %located.bounds,
            width,
            height,
            "Captured monitor"
        );
        sources.push((located.bounds, shot));
    }

    let canvas = composite::composite(strategy, rect, &sources)?;
    Ok(RasterImage::from_rgba8(canvas))
}
