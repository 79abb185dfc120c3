//! Test utilities for screengrab integration tests
//!
//! This crate provides shared helpers for integration tests and benches
//! across the screengrab workspace.
//!
//! # Usage
//!
//! Add to your crate's dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! screengrab-test-utils = { path = "../screengrab-test-utils" }
//! ```
//!
//! # Modules
//!
//! - [`fixtures`]: Synthetic rasters, monitor layouts and PNG decoding
//! - [`timing`]: Wall-clock budgets for slow paths
//!
//! # Example
//!
//! ```
//! use screengrab_core::model::CompressionLevel;
//! use screengrab_core::util::encode::encode_png;
//! use screengrab_test_utils::fixtures::{decode_png, desktop_like};
//!
//! let raster = desktop_like(320, 200);
//! let png = encode_png(&raster, CompressionLevel::Fast).unwrap();
//! assert_eq!(decode_png(&png).as_bytes(), raster.as_bytes());
//! ```

pub mod fixtures;
pub mod timing;
