//! X11 capture strategy
//!
//! Every call opens its own `x11rb` connection to the display named by the
//! strategy's target, read at call time. `DISPLAY` is the ambient target; the
//! orchestrator scopes overrides and the `:0` fallback around each call, so no
//! call reuses a display an earlier call addressed.
//!
//! Monitors come from RandR 1.5 `GetMonitors`. Servers without it report the
//! root window as a single display. Pixels are read from the root window with
//! `GetImage` in Z-pixmap format and converted to RGBA.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use x11rb::connection::Connection as _;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto::{
    ConnectionExt as _, ImageFormat, ImageOrder, Screen, Setup, Visualid, Window,
};
use x11rb::rust_connection::RustConnection;

use super::{CaptureStrategy, DisplayTarget, EnvTargetStore, RasterImage, composite};
use crate::config;
use crate::error::{CaptureError, CaptureResult};
use crate::model::{DisplayInfo, Rect};

const NAME: &str = "x11";

/// X11 capture strategy
#[derive(Debug, Clone)]
pub struct X11Strategy {
    target: DisplayTarget,
}

/// One connection, alive for a single strategy call
struct Session {
    conn:    RustConnection,
    display: String,
    screen:  usize,
    root:    Window,
    bounds:  Rect,
}

impl Session {
    fn screen(&self) -> CaptureResult<&Screen> {
        self.conn.setup().roots.get(self.screen).ok_or_else(|| {
            CaptureError::backend(NAME, format!("display {} has no screen {}", self.display, self.screen))
        })
    }
}

impl X11Strategy {
    /// Creates a strategy reading `DISPLAY`, falling back to
    /// [`config::fallback_x11_display`] when it is unset
    pub fn new() -> Self {
        Self::with_target(DisplayTarget::new(
            Arc::new(EnvTargetStore::new(config::X11_DISPLAY_ENV)),
            config::fallback_x11_display(),
        ))
    }

    /// Creates a strategy over an explicit target description
    pub fn with_target(target: DisplayTarget) -> Self {
        Self { target }
    }

    /// Connects to the display the target names right now
    fn connect(&self) -> CaptureResult<Session> {
        let display_name = self.target.effective();
        let (conn, screen) = x11rb::connect(Some(&display_name)).map_err(|e| {
            CaptureError::backend(NAME, format!("cannot connect to display {display_name}: {e}"))
        })?;

        let (root, bounds) = match conn.setup().roots.get(screen) {
            Some(s) => (
                s.root,
                Rect::new(0, 0, u32::from(s.width_in_pixels), u32::from(s.height_in_pixels)),
            ),
            None => {
                return Err(CaptureError::backend(
                    NAME,
                    format!("display {display_name} has no screen {screen}"),
                ));
            }
        };

        tracing::debug!(display = %display_name, screen, %bounds, "Connected to X server");
        Ok(Session {
            conn,
            display: display_name,
            screen,
            root,
            bounds,
        })
    }

    /// RandR monitors, or an error string when the server cannot list them
    fn randr_monitors(session: &Session) -> Result<Vec<DisplayInfo>, String> {
        let conn = &session.conn;
        let version = conn
            .randr_query_version(1, 5)
            .map_err(|e| e.to_string())?
            .reply()
            .map_err(|e| e.to_string())?;
        if (version.major_version, version.minor_version) < (1, 5) {
            return Err(format!(
                "RandR {}.{} has no GetMonitors",
                version.major_version, version.minor_version
            ));
        }

        let reply = conn
            .randr_get_monitors(session.root, true)
            .map_err(|e| e.to_string())?
            .reply()
            .map_err(|e| e.to_string())?;

        reply
            .monitors
            .iter()
            .map(|monitor| -> Result<DisplayInfo, String> {
                let name = conn
                    .get_atom_name(monitor.name)
                    .map_err(|e| e.to_string())?
                    .reply()
                    .map_err(|e| e.to_string())?
                    .name;
                let bounds = Rect::new(
                    i32::from(monitor.x),
                    i32::from(monitor.y),
                    u32::from(monitor.width),
                    u32::from(monitor.height),
                );
                Ok(DisplayInfo::new(String::from_utf8_lossy(&name).into_owned(), bounds))
            })
            .collect()
    }
}

impl Default for X11Strategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStrategy for X11Strategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        match self.connect() {
            Ok(session) => {
                tracing::debug!(display = %session.display, "X11 display reachable");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "X11 display unreachable");
                false
            }
        }
    }

    fn displays(&self) -> CaptureResult<Vec<DisplayInfo>> {
        let session = self.connect()?;

        let displays = match Self::randr_monitors(&session) {
            Ok(monitors) if !monitors.is_empty() => monitors,
            Ok(_) => {
                tracing::debug!(display = %session.display, "RandR reported no monitors, using the root window");
                vec![DisplayInfo::new(format!("screen{}", session.screen), session.bounds)]
            }
            Err(reason) => {
                tracing::debug!(display = %session.display, %reason, "RandR unavailable, using the root window");
                vec![DisplayInfo::new(format!("screen{}", session.screen), session.bounds)]
            }
        };

        tracing::debug!(display = %session.display, count = displays.len(), "X11 enumerated monitors");
        Ok(displays)
    }

    fn capture_rect(&self, rect: Rect) -> CaptureResult<RasterImage> {
        let session = self.connect()?;

        let Some(visible) = rect.intersection(&session.bounds) else {
            return Err(CaptureError::backend(
                NAME,
                format!(
                    "region {rect} does not intersect any monitor (root window of {} is {})",
                    session.display, session.bounds
                ),
            ));
        };
        composite::check_canvas(NAME, rect)?;

        let out_of_range = |_: std::num::TryFromIntError| {
            CaptureError::backend(NAME, format!("region {visible} exceeds X11 coordinates"))
        };
        let x = i16::try_from(visible.x).map_err(out_of_range)?;
        let y = i16::try_from(visible.y).map_err(out_of_range)?;
        let width = u16::try_from(visible.width).map_err(out_of_range)?;
        let height = u16::try_from(visible.height).map_err(out_of_range)?;

        let reply = session
            .conn
            .get_image(ImageFormat::Z_PIXMAP, session.root, x, y, width, height, !0)
            .map_err(|e| CaptureError::backend(NAME, e))?
            .reply()
            .map_err(|e| CaptureError::backend(NAME, e))?;

        let layout = PixelLayout::resolve(session.conn.setup(), session.screen()?, reply.depth, reply.visual)?;
        let pixels = layout
            .to_rgba(&reply.data, visible.width, visible.height)
            .ok_or_else(|| CaptureError::backend(NAME, format!("{} returned a truncated image", session.display)))?;

        tracing::debug!(display = %session.display, %visible, depth = reply.depth, "Read root window pixels");

        let canvas = composite::composite(NAME, rect, &[(visible, pixels)])?;
        Ok(RasterImage::from_rgba8(canvas))
    }

    fn display_target(&self) -> Option<&DisplayTarget> {
        Some(&self.target)
    }
}

/// How a Z-pixmap image stores its pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelLayout {
    bits_per_pixel: u8,
    scanline_pad:   u8,
    msb_first:      bool,
    red_mask:       u32,
    green_mask:     u32,
    blue_mask:      u32,
}

impl PixelLayout {
    fn resolve(setup: &Setup, screen: &Screen, depth: u8, visual: Visualid) -> CaptureResult<Self> {
        let format = setup
            .pixmap_formats
            .iter()
            .find(|f| f.depth == depth)
            .ok_or_else(|| CaptureError::backend(NAME, format!("no pixmap format for depth {depth}")))?;

        let visual = screen
            .allowed_depths
            .iter()
            .flat_map(|d| &d.visuals)
            .find(|v| v.visual_id == visual)
            .ok_or_else(|| CaptureError::backend(NAME, format!("unknown visual {visual:#x}")))?;

        if !matches!(format.bits_per_pixel, 16 | 24 | 32) {
            return Err(CaptureError::backend(
                NAME,
                format!("unsupported pixel size of {} bits", format.bits_per_pixel),
            ));
        }

        Ok(Self {
            bits_per_pixel: format.bits_per_pixel,
            scanline_pad:   format.scanline_pad,
            msb_first:      setup.image_byte_order == ImageOrder::MSB_FIRST,
            red_mask:       visual.red_mask,
            green_mask:     visual.green_mask,
            blue_mask:      visual.blue_mask,
        })
    }

    /// Bytes per scanline, including padding
    fn stride(&self, width: u32) -> usize {
        let bits = width as usize * usize::from(self.bits_per_pixel);
        let pad = usize::from(self.scanline_pad).max(8);
        bits.div_ceil(pad) * pad / 8
    }

    /// Converts `data` to opaque RGBA; `None` when it is too short
    fn to_rgba(&self, data: &[u8], width: u32, height: u32) -> Option<RgbaImage> {
        let stride = self.stride(width);
        let bytes = usize::from(self.bits_per_pixel / 8);
        if stride == 0 || data.len() < stride * height as usize {
            return None;
        }

        let mut image = RgbaImage::new(width, height);
        for (y, row) in data.chunks_exact(stride).take(height as usize).enumerate() {
            for (x, px) in row.chunks_exact(bytes).take(width as usize).enumerate() {
                let value = if self.msb_first {
                    px.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
                } else {
                    px.iter().rev().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
                };
                image.put_pixel(
                    x as u32,
                    y as u32,
                    Rgba([
                        channel(value, self.red_mask),
                        channel(value, self.green_mask),
                        channel(value, self.blue_mask),
                        255,
                    ]),
                );
            }
        }
        Some(image)
    }
}

/// Extracts the channel selected by `mask`, scaled to 8 bits
fn channel(value: u32, mask: u32) -> u8 {
    if mask == 0 {
        return 0;
    }
    let bits = mask.count_ones();
    let raw = (value & mask) >> mask.trailing_zeros();
    if bits >= 8 {
        (raw >> (bits - 8)) as u8
    } else {
        (raw * 255 / ((1 << bits) - 1)) as u8
    }
}
