//! Centralized defaults for capture and output.
//!
//! # Runtime Configuration
//!
//! Defaults can be overridden at runtime via environment variables:
//!
//! | Environment Variable | Default | Description |
//! |---------------------|---------|-------------|
//! | `SCREENGRAB_FALLBACK_DISPLAY` | `:0` | X11 display used when `DISPLAY` is unset |
//! | `SCREENGRAB_FILENAME_PREFIX` | `screenshot` | Prefix for generated filenames |
//!
//! Empty or whitespace-only values are ignored.

/// Environment variable naming the X11 display to address.
pub const X11_DISPLAY_ENV: &str = "DISPLAY";

/// Conventional identifier of the primary local X11 display.
///
/// Applied when no display is configured at all, which is the normal state
/// for cron jobs and other detached sessions.
pub const FALLBACK_X11_DISPLAY: &str = ":0";

/// Prefix used by generated output filenames.
pub const DEFAULT_FILENAME_PREFIX: &str = "screenshot";

/// Timestamp layout embedded in generated filenames (`chrono` syntax).
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Largest capture canvas, in pixels, a strategy will allocate.
///
/// 2^28 pixels is 1 GiB of RGBA, enough for a 16384x16384 virtual screen.
pub const MAX_CAPTURE_PIXELS: u64 = 1 << 28;

/// Override variable for [`FALLBACK_X11_DISPLAY`].
pub const FALLBACK_DISPLAY_ENV: &str = "SCREENGRAB_FALLBACK_DISPLAY";

/// Override variable for [`DEFAULT_FILENAME_PREFIX`].
pub const FILENAME_PREFIX_ENV: &str = "SCREENGRAB_FILENAME_PREFIX";

fn get_string_from_env(env_var: &str, default: &str) -> String {
    std::env::var(env_var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Get the fallback X11 display, checking the environment override.
///
/// Override with: `SCREENGRAB_FALLBACK_DISPLAY`
///
/// # Example
///
/// ```bash
/// # Headless box where the capture target is a virtual framebuffer on :99
/// export SCREENGRAB_FALLBACK_DISPLAY=:99
/// ```
pub fn fallback_x11_display() -> String {
    get_string_from_env(FALLBACK_DISPLAY_ENV, FALLBACK_X11_DISPLAY)
}

/// Get the generated-filename prefix, checking the environment override.
///
/// Override with: `SCREENGRAB_FILENAME_PREFIX`
pub fn filename_prefix() -> String {
    get_string_from_env(FILENAME_PREFIX_ENV, DEFAULT_FILENAME_PREFIX)
}
