//! Serialization of flat patterns for downstream fabrication tools.

pub mod dxf;

pub use dxf::{export_pattern, write_pattern};
