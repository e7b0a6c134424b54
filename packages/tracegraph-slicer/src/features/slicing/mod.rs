//! Dynamic backward slicing
//!
//! Hexagonal layout:
//! - `domain`: `Slice`, `SlicingCriterion`
//! - `ports`: `SlicerPort`
//! - `application`: entry point re-exports
//! - `infrastructure`: `DynamicSlicer` (worklist fixpoint)

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{Slice, SliceType, SlicingCriterion, UnresolvedUse};
pub use infrastructure::DynamicSlicer;
pub use ports::SlicerPort;
