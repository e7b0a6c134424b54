//! Slicing Ports
//!
//! Implementation: `DynamicSlicer` (infrastructure/slicer.rs)

use crate::config::SliceConfig;
use crate::features::slicing::domain::{Slice, SlicingCriterion};
use crate::features::trace::domain::Trace;
use crate::shared::models::Result;

/// Backward slicer over a finalized trace
///
/// Implementors are read-only with respect to the trace, so one slicer can
/// serve concurrent queries.
pub trait SlicerPort: Send + Sync {
    /// Backward slice under the slicer's configuration
    fn backward_slice(&self, trace: &Trace, criterion: &SlicingCriterion) -> Result<Slice>;

    /// Backward slice following data dependencies only
    fn data_slice(&self, trace: &Trace, criterion: &SlicingCriterion) -> Result<Slice>;

    fn slice_config(&self) -> &SliceConfig;
}
