//! Slicer configuration
//!
//! - `SliceConfig`: what the slicer follows and how far
//! - `Preset`: canonical configurations
//! - YAML loading (versioned schema) with validation

pub mod error;
pub mod preset;
pub mod slicing;

pub use error::{ConfigError, ConfigResult};
pub use preset::Preset;
pub use slicing::{AttributeCoverage, SliceConfig};
