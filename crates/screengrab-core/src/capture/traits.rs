//! Capability trait implemented by every capture mechanism
//!
//! A strategy is one platform-specific way of acquiring pixels from the
//! display system. The orchestrator only ever talks to strategies through
//! [`CaptureStrategy`]; new mechanisms are added by registering another
//! implementation, never by branching on platform inside the orchestrator.
//!
//! # Compiled-in strategies
//!
//! | Strategy | Platform | Ambient target |
//! |----------|----------|----------------|
//! | `x11`    | Linux    | `DISPLAY` (fallback `:0`) |
//! | `windows`| Windows  | - |
//! | `macos`  | macOS    | - |
//! | `mock`   | all      | in-memory |

use crate::error::CaptureResult;
use crate::model::{DisplayInfo, Rect};

use super::{DisplayTarget, RasterImage};

/// Capability: acquire pixels from a display system.
///
/// Implementations are constructed once at process start and reused for every
/// capture in that run.
pub trait CaptureStrategy: Send + Sync {
    /// Short stable identifier (`"x11"`, `"windows"`, ...)
    fn name(&self) -> &'static str;

    /// Whether the mechanism can reach its display system right now.
    ///
    /// Probing must be cheap and must not change process-wide state.
    fn is_available(&self) -> bool;

    /// Enumerates active displays in the mechanism's own order.
    ///
    /// The position in the returned list is the monitor index users see.
    fn displays(&self) -> CaptureResult<Vec<DisplayInfo>>;

    /// Captures exactly `rect`, in virtual-screen coordinates.
    ///
    /// The returned raster has the dimensions of `rect`. Mechanism failures
    /// are reported as [`CaptureError::Backend`](crate::error::CaptureError::Backend)
    /// with the mechanism's message verbatim.
    fn capture_rect(&self, rect: Rect) -> CaptureResult<RasterImage>;

    /// The ambient display target this mechanism reads, if it has one.
    ///
    /// Strategies that address displays through process-wide state (such as
    /// the `DISPLAY` environment variable) return it here so the orchestrator
    /// can scope overrides and fallbacks around each call.
    fn display_target(&self) -> Option<&DisplayTarget> {
        None
    }
}
