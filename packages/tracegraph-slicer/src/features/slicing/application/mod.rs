//! Slicing Application Layer
//!
//! Main entry point: `DynamicSlicer::slice()`

pub use crate::features::slicing::infrastructure::DynamicSlicer;
