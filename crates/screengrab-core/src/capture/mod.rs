//! Capture strategies, the strategy registry and the capture orchestrator
//!
//! # Architecture
//!
//! - [`CaptureStrategy`] - one platform mechanism for acquiring pixels
//! - [`StrategyRegistry`] - priority-ordered candidates; the first available
//!   one is used
//! - [`Capturer`] - turns a [`CaptureRequest`](crate::model::CaptureRequest)
//!   into a [`RasterImage`]
//! - [`DisplayTarget`] - ambient display target with scoped override
//! - [`composite`] - builds a rectangle from per-monitor images
//!
//! ## Recommended Usage
//!
//! ```rust,no_run
//! use screengrab_core::capture::Capturer;
//! use screengrab_core::model::CaptureRequest;
//!
//! let capturer = Capturer::with_default_strategies();
//! let request = CaptureRequest::builder().monitor(0).build()?;
//! let raster = capturer.capture(&request)?;
//! println!("captured {}x{}", raster.width(), raster.height());
//! # Ok::<(), screengrab_core::error::CaptureError>(())
//! ```
//!
//! ## Strategies per platform
//!
//! | Platform | Registered (priority order) | Mechanism |
//! |----------|-----------------------------|-----------|
//! | Linux    | `x11` | x11rb: RandR monitors, root-window `GetImage` |
//! | Windows  | `windows` | xcap |
//! | macOS    | `macos` | xcap |
//!
//! [`MockStrategy`] is always compiled but never registered by default.

pub mod composite;
#[cfg(any(target_os = "windows", target_os = "macos"))]
pub mod desktop_backend;
pub mod display_target;
pub mod mock;
pub mod orchestrator;
pub mod raster;
pub mod registry;
pub mod traits;
#[cfg(target_os = "linux")]
pub mod x11_backend;
#[cfg(any(target_os = "windows", target_os = "macos"))]
mod xcap_source;

#[cfg(any(target_os = "windows", target_os = "macos"))]
pub use desktop_backend::DesktopStrategy;
pub use display_target::{
    DisplayTarget, EnvTargetStore, MemoryTargetStore, TargetScope, TargetStore,
};
pub use mock::MockStrategy;
pub use orchestrator::{Capturer, StrategyStatus, resolve_capture_rect};
pub use raster::RasterImage;
pub use registry::StrategyRegistry;
pub use traits::CaptureStrategy;
#[cfg(target_os = "linux")]
pub use x11_backend::X11Strategy;

/// Builds the registry of strategies compiled in for the current platform.
///
/// The registry may be empty on unsupported platforms, in which case every
/// capture fails with
/// [`CaptureError::NoStrategyAvailable`](crate::error::CaptureError::NoStrategyAvailable).
pub fn create_default_registry() -> StrategyRegistry {
    #[allow(unused_mut)]
    let mut registry = StrategyRegistry::new();

    #[cfg(target_os = "linux")]
    registry.register(std::sync::Arc::new(X11Strategy::new()));

    #[cfg(any(target_os = "windows", target_os = "macos"))]
    registry.register(std::sync::Arc::new(DesktopStrategy::new()));

    registry
}
