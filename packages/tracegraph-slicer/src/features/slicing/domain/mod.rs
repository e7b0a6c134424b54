//! Slicing domain models

pub mod criterion;
pub mod slice;

pub use criterion::SlicingCriterion;
pub use slice::{Slice, SliceType, UnresolvedUse};
