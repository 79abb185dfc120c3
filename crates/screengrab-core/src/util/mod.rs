//! Utility modules for encoding and file output

pub mod encode;
pub mod files;
