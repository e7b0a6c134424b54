//! Slicing criteria

use crate::features::trace::domain::Trace;
use crate::shared::models::{CodeUnitId, InstructionRef, OccurrenceId, Result, SlicerError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Occurrence whose causal history is reconstructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlicingCriterion {
    /// Explicit occurrence (sequence index)
    Occurrence(OccurrenceId),
    /// Last execution of a static instruction
    LastOf { code_unit: CodeUnitId, position: usize },
    /// Last executed `Return` of a code unit
    LastReturnOf(CodeUnitId),
}

impl SlicingCriterion {
    /// Concrete occurrence in `trace`; a criterion that never executed is a usage error
    pub fn resolve(&self, trace: &Trace) -> Result<OccurrenceId> {
        let found = match *self {
            SlicingCriterion::Occurrence(id) => trace.get(id).map(|occ| occ.id),
            SlicingCriterion::LastOf {
                code_unit,
                position,
            } => trace.last_occurrence_of(InstructionRef::new(code_unit, position)),
            SlicingCriterion::LastReturnOf(code_unit) => trace.last_return_of(code_unit),
        };

        found.ok_or_else(|| {
            SlicerError::usage(format!(
                "criterion {} has no occurrence in the trace ({} occurrences)",
                self,
                trace.len()
            ))
        })
    }
}

impl From<OccurrenceId> for SlicingCriterion {
    fn from(id: OccurrenceId) -> Self {
        SlicingCriterion::Occurrence(id)
    }
}

impl fmt::Display for SlicingCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlicingCriterion::Occurrence(id) => write!(f, "{}", id),
            SlicingCriterion::LastOf {
                code_unit,
                position,
            } => write!(f, "last {}", InstructionRef::new(*code_unit, *position)),
            SlicingCriterion::LastReturnOf(code_unit) => write!(f, "last return of {}", code_unit),
        }
    }
}
