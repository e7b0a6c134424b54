//! Occurrences and frames

use super::binding::{BindingKey, BoundOperand};
use crate::shared::models::{CodeUnitId, FrameId, InstructionRef, ModuleId, OccurrenceId};
use serde::{Deserialize, Serialize};

/// One concrete execution of a static instruction
///
/// `id` doubles as the sequence index: occurrences are numbered in the
/// order they executed, across all frames and modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub id: OccurrenceId,
    pub instruction: InstructionRef,
    pub frame: FrameId,
    pub bound_operands: Vec<BoundOperand>,
    /// Frame entered by this occurrence (calls, imports that run a module body)
    pub callee_frame: Option<FrameId>,
}

impl Occurrence {
    pub fn sequence_index(&self) -> usize {
        self.id.index()
    }

    pub fn code_unit(&self) -> CodeUnitId {
        self.instruction.code_unit
    }

    pub fn position(&self) -> usize {
        self.instruction.position
    }

    pub fn uses(&self) -> impl Iterator<Item = &BindingKey> {
        self.bound_operands
            .iter()
            .filter(|op| op.is_use())
            .map(|op| &op.key)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &BindingKey> {
        self.bound_operands
            .iter()
            .filter(|op| op.is_define())
            .map(|op| &op.key)
    }
}

/// Single activation of a code unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    pub code_unit: CodeUnitId,
    pub module: ModuleId,
    /// Occurrence that entered this frame (`None` for the root frame)
    pub call_site: Option<OccurrenceId>,
    pub parent: Option<FrameId>,
}

impl Frame {
    pub fn is_root(&self) -> bool {
        self.call_site.is_none()
    }
}
