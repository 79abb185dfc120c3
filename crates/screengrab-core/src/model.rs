//! Data models and type definitions for screengrab
//!
//! This module defines the core types used throughout the library:
//! - Virtual-screen geometry ([`Rect`])
//! - Capture requests and monitor targeting
//! - Monitor descriptions returned by enumeration
//! - The symbolic PNG compression preference

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};

/// A pixel rectangle in the combined virtual-screen coordinate space
///
/// The origin may be negative (monitors left of or above the primary one).
/// `right()` and `bottom()` are exclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x:      i32,
    /// Top edge
    pub y:      i32,
    /// Width in pixels
    pub width:  u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from its four edges. Returns `None` when the edges
    /// describe an empty or inverted area.
    pub fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> Option<Self> {
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self {
            x:      i32::try_from(left).ok()?,
            y:      i32::try_from(top).ok()?,
            width:  u32::try_from(right - left).ok()?,
            height: u32::try_from(bottom - top).ok()?,
        })
    }

    /// Exclusive right edge
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// True when the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The overlapping area of two rectangles, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        Rect::from_edges(
            i64::from(self.x.max(other.x)),
            i64::from(self.y.max(other.y)),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        )
    }

    /// Minimal rectangle containing every input rectangle.
    ///
    /// This is a plain left/top/right/bottom reduction: gaps between
    /// non-adjacent rectangles are part of the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use screengrab_core::model::Rect;
    ///
    /// let left = Rect::new(0, 0, 1920, 1080);
    /// let right = Rect::new(1920, 0, 1920, 1080);
    /// assert_eq!(Rect::bounding_box([left, right]), Some(Rect::new(0, 0, 3840, 1080)));
    /// ```
    pub fn bounding_box<I>(rects: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Rect>,
    {
        let mut edges: Option<(i64, i64, i64, i64)> = None;
        for rect in rects {
            let (l, t, r, b) = (i64::from(rect.x), i64::from(rect.y), rect.right(), rect.bottom());
            edges = Some(match edges {
                None => (l, t, r, b),
                Some((min_x, min_y, max_x, max_y)) => {
                    (min_x.min(l), min_y.min(t), max_x.max(r), max_y.max(b))
                }
            });
        }
        let (left, top, right, bottom) = edges?;
        Rect::from_edges(left, top, right, bottom)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} at {},{}", self.width, self.height, self.x, self.y)
    }
}

impl FromStr for Rect {
    type Err = CaptureError;

    /// Parses `"x,y,width,height"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(CaptureError::invalid_region(s, "expected x,y,width,height"));
        }

        let mut values = [0i64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|_| CaptureError::invalid_region(s, format!("invalid number: {part}")))?;
        }

        let [x, y, width, height] = values;
        if width <= 0 || height <= 0 {
            return Err(CaptureError::invalid_region(s, "width and height must be positive"));
        }

        let out_of_range = || CaptureError::invalid_region(s, "value out of range");
        Ok(Rect {
            x:      i32::try_from(x).map_err(|_| out_of_range())?,
            y:      i32::try_from(y).map_err(|_| out_of_range())?,
            width:  u32::try_from(width).map_err(|_| out_of_range())?,
            height: u32::try_from(height).map_err(|_| out_of_range())?,
        })
    }
}

/// Which monitor(s) a non-region capture targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorSelection {
    /// Bounding box of every enumerated display
    #[default]
    All,
    /// One display by enumeration order. Negative values are kept so the
    /// orchestrator can report them as out of range.
    Index(i32),
}

impl From<i32> for MonitorSelection {
    fn from(value: i32) -> Self {
        if value == -1 {
            MonitorSelection::All
        } else {
            MonitorSelection::Index(value)
        }
    }
}

/// A single capture request, immutable once built
///
/// When `region` is present it overrides monitor targeting entirely.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptureRequest {
    monitor:          MonitorSelection,
    region:           Option<Rect>,
    display_override: Option<String>,
}

impl CaptureRequest {
    /// Creates a builder for CaptureRequest
    pub fn builder() -> CaptureRequestBuilder {
        CaptureRequestBuilder::default()
    }

    /// A request for the bounding box of all monitors on the ambient display
    pub fn all_monitors() -> Self {
        Self::default()
    }

    /// Monitor targeting (ignored when a region is set)
    pub fn monitor(&self) -> MonitorSelection {
        self.monitor
    }

    /// Explicit capture region, if any
    pub fn region(&self) -> Option<Rect> {
        self.region
    }

    /// Display to address for this call only, if any
    pub fn display_override(&self) -> Option<&str> {
        self.display_override.as_deref()
    }
}

/// Builder for [`CaptureRequest`]
#[derive(Debug, Default)]
pub struct CaptureRequestBuilder {
    monitor:          MonitorSelection,
    region:           Option<Rect>,
    display_override: Option<String>,
}

impl CaptureRequestBuilder {
    /// Sets monitor targeting from the CLI convention (-1 = all)
    pub fn monitor(mut self, monitor: impl Into<MonitorSelection>) -> Self {
        self.monitor = monitor.into();
        self
    }

    /// Sets an explicit region
    pub fn region(mut self, region: Rect) -> Self {
        self.region = Some(region);
        self
    }

    /// Sets an optional region
    pub fn maybe_region(mut self, region: Option<Rect>) -> Self {
        self.region = region;
        self
    }

    /// Sets the display override. Empty strings mean "no override".
    pub fn display(mut self, display: impl Into<String>) -> Self {
        let display = display.into();
        self.display_override = (!display.trim().is_empty()).then_some(display);
        self
    }

    /// Builds the request, rejecting zero-area regions
    pub fn build(self) -> CaptureResult<CaptureRequest> {
        if let Some(region) = self.region {
            if region.is_empty() {
                return Err(CaptureError::invalid_region(
                    format!("{},{},{},{}", region.x, region.y, region.width, region.height),
                    "width and height must be positive",
                ));
            }
        }

        Ok(CaptureRequest {
            monitor:          self.monitor,
            region:           self.region,
            display_override: self.display_override,
        })
    }
}

/// A display as reported by a capture strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    /// Human-readable label from the windowing system
    pub name:   String,
    /// Bounds in virtual-screen coordinates
    pub bounds: Rect,
}

impl DisplayInfo {
    /// Creates a new DisplayInfo
    pub fn new(name: impl Into<String>, bounds: Rect) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

/// A monitor as returned by enumeration
///
/// `index` is the enumeration order and is only stable for the duration of
/// one process run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    /// 0-based enumeration index
    pub index:        usize,
    /// Human-readable label
    pub display_name: String,
    /// Bounds in virtual-screen coordinates
    pub bounds:       Rect,
}

/// PNG compression preference, ordered from fastest/largest to slowest/smallest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CompressionLevel {
    /// No compression effort
    None,
    /// Fastest compressed mode
    #[default]
    Fast,
    /// Default codec compression
    Balanced,
    /// Maximum compression
    Best,
}

impl CompressionLevel {
    /// All levels in increasing compression order
    pub const ALL: [CompressionLevel; 4] = [
        CompressionLevel::None,
        CompressionLevel::Fast,
        CompressionLevel::Balanced,
        CompressionLevel::Best,
    ];

    /// Maps a numeric level (0 = none .. 3 = best). Anything outside that
    /// range is treated as [`CompressionLevel::Fast`].
    pub fn from_numeric(level: i64) -> Self {
        match level {
            0 => CompressionLevel::None,
            1 => CompressionLevel::Fast,
            2 => CompressionLevel::Balanced,
            3 => CompressionLevel::Best,
            _ => CompressionLevel::Fast,
        }
    }

    /// Maps the `-r` flag and the number of `-c` repetitions.
    ///
    /// # Examples
    ///
    /// ```
    /// use screengrab_core::model::CompressionLevel;
    ///
    /// assert_eq!(CompressionLevel::from_flags(false, 0), CompressionLevel::Fast);
    /// assert_eq!(CompressionLevel::from_flags(false, 2), CompressionLevel::Balanced);
    /// assert_eq!(CompressionLevel::from_flags(false, 7), CompressionLevel::Best);
    /// assert_eq!(CompressionLevel::from_flags(true, 3), CompressionLevel::None);
    /// ```
    pub fn from_flags(raw: bool, count: u8) -> Self {
        if raw {
            return CompressionLevel::None;
        }
        match count {
            0 => CompressionLevel::Fast,
            n => CompressionLevel::from_numeric(i64::from(n.min(3))),
        }
    }

    /// Returns the level as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionLevel::None => "none",
            CompressionLevel::Fast => "fast",
            CompressionLevel::Balanced => "balanced",
            CompressionLevel::Best => "best",
        }
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
