//! screengrab-core: cross-platform screenshot capture library
//!
//! This library captures a monitor, all monitors or an explicit region of the
//! virtual screen and writes the result as PNG. Platform mechanisms sit behind
//! a strategy registry; the orchestrator picks the first available one.

pub mod capture;
pub mod config;
pub mod error;
pub mod model;
pub mod util;
