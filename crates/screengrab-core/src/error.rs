//! Error types for screenshot capture operations
//!
//! Every failure path in the core returns a [`CaptureError`]. Each variant
//! carries the context needed to explain what went wrong and exposes an
//! actionable remediation hint via [`CaptureError::remediation_hint`].
//!
//! Nothing in the core retries. A failed pixel acquisition is not assumed to
//! be transient, so every error is terminal for the current invocation and
//! retrying is left to the caller.

use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// High-level error category for filtering and exit-code selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Target not found (display, monitor index)
    NotFound,
    /// Invalid parameters supplied by the request layer
    InvalidInput,
    /// No capture mechanism usable in this environment
    Unavailable,
    /// I/O or system error
    SystemError,
    /// Encoding or raster acquisition error
    ProcessingError,
}

/// Comprehensive error type for screenshot capture operations
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// None of the registered strategies passed its availability check
    #[error("No screenshot strategy available (tried: {})", display_list(.tried))]
    NoStrategyAvailable {
        /// Names of the strategies that were checked, in priority order
        tried: Vec<&'static str>,
    },

    /// The strategy is usable but reports zero displays
    #[error("No active displays found by the {strategy} strategy")]
    NoActiveDisplays {
        /// Strategy that enumerated nothing
        strategy: &'static str,
    },

    /// Requested monitor index is not in `0..count`
    #[error("Monitor {index} out of range (0-{})", .count.saturating_sub(1))]
    MonitorOutOfRange {
        /// The offending index as given by the caller
        index: i32,
        /// Number of enumerated displays
        count: usize,
    },

    /// Malformed or zero-area region specification
    #[error("Invalid region '{input}': {reason}")]
    InvalidRegion {
        /// The region as the user wrote it
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// The underlying pixel-acquisition mechanism failed
    #[error("{strategy} capture failed: {reason}")]
    Backend {
        /// Strategy whose mechanism failed
        strategy: &'static str,
        /// Message reported by the mechanism, verbatim
        reason: String,
    },

    /// Image encoding failed
    #[error("Failed to encode image as {format}: {reason}")]
    EncodingFailed {
        /// Image format that failed
        format: String,
        /// Reason for encoding failure
        reason: String,
    },

    /// Output directory could not be created
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDirectory {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be created or written
    #[error("Failed to write {}: {source}", .path.display())]
    WriteOutput {
        /// File that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error on a stream sink
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn display_list(names: &[&'static str]) -> String {
    if names.is_empty() {
        "none registered".to_string()
    } else {
        names.join(", ")
    }
}

impl CaptureError {
    /// Shorthand for wrapping a mechanism failure.
    pub fn backend(strategy: &'static str, reason: impl ToString) -> Self {
        CaptureError::Backend {
            strategy,
            reason: reason.to_string(),
        }
    }

    /// Shorthand for a rejected region.
    pub fn invalid_region(input: impl Into<String>, reason: impl Into<String>) -> Self {
        CaptureError::InvalidRegion {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Valid monitor indices for a [`CaptureError::MonitorOutOfRange`] error.
    pub fn valid_range(&self) -> Option<RangeInclusive<usize>> {
        match self {
            CaptureError::MonitorOutOfRange { count, .. } if *count > 0 => Some(0..=count - 1),
            _ => None,
        }
    }

    /// Returns the category this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            CaptureError::NoStrategyAvailable { .. } => ErrorCategory::Unavailable,
            CaptureError::NoActiveDisplays { .. } => ErrorCategory::NotFound,
            CaptureError::MonitorOutOfRange { .. } | CaptureError::InvalidRegion { .. } => {
                ErrorCategory::InvalidInput
            }
            CaptureError::Backend { .. } | CaptureError::EncodingFailed { .. } => {
                ErrorCategory::ProcessingError
            }
            CaptureError::CreateDirectory { .. }
            | CaptureError::WriteOutput { .. }
            | CaptureError::IoError(_) => ErrorCategory::SystemError,
        }
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use screengrab_core::error::CaptureError;
    ///
    /// let error = CaptureError::MonitorOutOfRange { index: 5, count: 2 };
    /// assert!(error.remediation_hint().contains("--list"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            CaptureError::NoStrategyAvailable { .. } => {
                "No capture mechanism could reach a display. On Linux make sure an X server is \
                 running and reachable (set DISPLAY or pass --display). Wayland-only sessions are \
                 not supported."
            }
            CaptureError::NoActiveDisplays { .. } => {
                "The display server reported no active monitors. Check that a monitor is \
                 connected and powered, or that the virtual framebuffer was started with a screen."
            }
            CaptureError::MonitorOutOfRange { .. } => {
                "Use --list to see available monitors and their indices, or pass -m -1 to capture \
                 all monitors."
            }
            CaptureError::InvalidRegion { .. } => {
                "Regions are written as x,y,width,height with integer values and a positive \
                 width and height, e.g. --region 100,100,500,400."
            }
            CaptureError::Backend { strategy, .. } => match *strategy {
                "x11" => {
                    "The X server refused the capture. Check DISPLAY, xhost/Xauthority settings, \
                     and that the session is still running."
                }
                "macos" => {
                    "Grant screen recording permission in System Settings > Privacy & Security > \
                     Screen Recording."
                }
                _ => "The platform capture mechanism failed. Retry once the display is available.",
            },
            CaptureError::EncodingFailed { .. } => {
                "Image encoding failed. The captured raster may use a color type PNG cannot store."
            }
            CaptureError::CreateDirectory { .. } => {
                "Could not create the output directory. Check permissions on the parent path."
            }
            CaptureError::WriteOutput { .. } => {
                "Could not write the output file. Check file permissions and disk space."
            }
            CaptureError::IoError(_) => {
                "Writing to the output stream failed. Check that the receiving process is still \
                 reading."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_strategy_available_lists_tried() {
        let error = CaptureError::NoStrategyAvailable {
            tried: vec!["x11", "mock"],
        };

        let msg = error.to_string();
        assert!(msg.contains("No screenshot strategy available"));
        assert!(msg.contains("x11, mock"));
        assert_eq!(error.category(), ErrorCategory::Unavailable);
    }

    #[test]
    fn test_no_strategy_available_empty_registry() {
        let error = CaptureError::NoStrategyAvailable { tried: vec![] };
        assert!(error.to_string().contains("none registered"));
    }

    #[test]
    fn test_monitor_out_of_range_message() {
        let error = CaptureError::MonitorOutOfRange { index: 5, count: 2 };

        assert_eq!(error.to_string(), "Monitor 5 out of range (0-1)");
        assert_eq!(error.valid_range(), Some(0..=1));
        assert_eq!(error.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_valid_range_only_for_out_of_range() {
        let error = CaptureError::NoActiveDisplays { strategy: "x11" };
        assert!(error.valid_range().is_none());
    }

    #[test]
    fn test_invalid_region_message() {
        let error = CaptureError::invalid_region("1,2,3", "expected x,y,width,height");

        let msg = error.to_string();
        assert!(msg.contains("Invalid region '1,2,3'"));
        assert!(msg.contains("expected x,y,width,height"));
        assert!(error.remediation_hint().contains("x,y,width,height"));
    }

    #[test]
    fn test_backend_error_is_verbatim() {
        let error = CaptureError::backend("x11", "XGetImage failed: BadMatch");

        assert_eq!(error.to_string(), "x11 capture failed: XGetImage failed: BadMatch");
        assert!(error.remediation_hint().contains("DISPLAY"));
        assert_eq!(error.category(), ErrorCategory::ProcessingError);
    }

    #[test]
    fn test_backend_hint_macos() {
        let error = CaptureError::backend("macos", "permission denied");
        assert!(error.remediation_hint().contains("Screen Recording"));
    }

    #[test]
    fn test_write_output_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = CaptureError::WriteOutput {
            path: PathBuf::from("/root/shot.png"),
            source: io,
        };

        assert!(error.to_string().contains("/root/shot.png"));
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(error.category(), ErrorCategory::SystemError);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: CaptureError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.remediation_hint().contains("stream"));
    }
}
