//! Slice: ordered, deduplicated causal explanation of a criterion

use crate::features::dependency::domain::DependencyEdge;
use crate::features::trace::domain::{BindingKey, Occurrence};
use crate::shared::models::{Instruction, OccurrenceId, Program, Result, SlicerError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SliceType {
    /// Data and control dependencies
    Full,
    /// Data dependencies only
    Thin,
    /// Control dependencies only
    ControlOnly,
}

impl SliceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SliceType::Full => "full",
            SliceType::Thin => "thin",
            SliceType::ControlOnly => "control_only",
        }
    }

    pub(crate) fn from_flags(include_data: bool, include_control: bool) -> Self {
        match (include_data, include_control) {
            (true, false) => SliceType::Thin,
            (false, true) => SliceType::ControlOnly,
            _ => SliceType::Full,
        }
    }
}

/// Use whose definition is not in the trace (incompleteness marker)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedUse {
    pub occurrence: OccurrenceId,
    pub key: BindingKey,
    /// Owner-origin occurrence included instead, under over-approximating coverage
    pub fallback: Option<OccurrenceId>,
}

/// Result of one slicing query
///
/// Occurrences are in execution order. Two slices are equal iff they hold
/// the same occurrences in the same order; edges and markers are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slice {
    criterion: OccurrenceId,
    slice_type: SliceType,
    occurrences: Vec<Occurrence>,
    edges: Vec<DependencyEdge>,
    unresolved: Vec<UnresolvedUse>,
    truncated: bool,
}

impl Slice {
    pub(crate) fn new(
        criterion: OccurrenceId,
        slice_type: SliceType,
        occurrences: Vec<Occurrence>,
        edges: Vec<DependencyEdge>,
        unresolved: Vec<UnresolvedUse>,
        truncated: bool,
    ) -> Self {
        Self {
            criterion,
            slice_type,
            occurrences,
            edges,
            unresolved,
            truncated,
        }
    }

    pub fn criterion(&self) -> OccurrenceId {
        self.criterion
    }

    pub fn slice_type(&self) -> SliceType {
        self.slice_type
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn contains(&self, id: OccurrenceId) -> bool {
        self.occurrences
            .binary_search_by_key(&id, |occ| occ.id)
            .is_ok()
    }

    pub fn occurrence_ids(&self) -> Vec<OccurrenceId> {
        self.occurrences.iter().map(|occ| occ.id).collect()
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn unresolved(&self) -> &[UnresolvedUse] {
        &self.unresolved
    }

    /// Traversal stopped at `max_depth` with dependencies left unexplored
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Every dependency was traced (or covered by a fallback) and nothing was cut
    pub fn is_complete(&self) -> bool {
        !self.truncated && self.unresolved.iter().all(|u| u.fallback.is_some())
    }

    /// Static instructions of the slice, in execution order
    pub fn instructions<'p>(&self, program: &'p Program) -> Result<Vec<&'p Instruction>> {
        self.occurrences
            .iter()
            .map(|occ| {
                program.instruction(occ.instruction).ok_or_else(|| {
                    SlicerError::usage(format!(
                        "{} not in the supplied program",
                        occ.instruction
                    ))
                })
            })
            .collect()
    }

    /// Same length and same `(op, operand)` pairwise
    pub fn matches_instructions(&self, program: &Program, expected: &[Instruction]) -> bool {
        match self.instructions(program) {
            Ok(actual) => {
                actual.len() == expected.len()
                    && actual.iter().zip(expected).all(|(a, e)| *a == e)
            }
            Err(_) => false,
        }
    }
}

impl PartialEq for Slice {
    fn eq(&self, other: &Self) -> bool {
        self.occurrences == other.occurrences
    }
}

impl Eq for Slice {}
