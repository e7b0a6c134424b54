//! Finalized trace
//!
//! Immutable once built by `TraceBuilder::finish`. All per-key indices are
//! computed at that point and only read afterwards, so queries need no
//! locking and a `Trace` can be shared across slicing threads.
//!
//! The definition reaching each recorded use is resolved during that same
//! pass, so the resolver's per-use lookup is a table read. Arbitrary
//! `(key, before)` queries go through the per-key index instead and cost a
//! binary search.

use super::binding::BindingKey;
use super::occurrence::{Frame, Occurrence};
use crate::shared::models::{
    BlockId, CodeUnitId, FrameId, InstructionRef, ObjectId, OccurrenceId, OpKind, Program,
    Result, SlicerError,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct Trace {
    pub(crate) program: Arc<Program>,
    pub(crate) occurrences: Vec<Occurrence>,
    pub(crate) frames: Vec<Frame>,
    /// Defining occurrences per binding key, ascending
    pub(crate) definitions: FxHashMap<BindingKey, Vec<OccurrenceId>>,
    /// Reaching definition per bound operand, aligned with `bound_operands`
    /// (always `None` for definitions)
    pub(crate) reaching: Vec<Vec<Option<OccurrenceId>>>,
    /// Block of each occurrence's instruction (indexed by occurrence)
    pub(crate) blocks: Vec<BlockId>,
    /// Terminator executions per (frame, block), ascending
    pub(crate) terminators: FxHashMap<(FrameId, BlockId), Vec<OccurrenceId>>,
    /// Producers of the values each occurrence popped (indexed by occurrence)
    pub(crate) stack_producers: Vec<Vec<OccurrenceId>>,
    /// Occurrences per frame, ascending (indexed by frame)
    pub(crate) frame_occurrences: Vec<Vec<OccurrenceId>>,
    /// Last `Return` executed in each frame (indexed by frame)
    pub(crate) returns: Vec<Option<OccurrenceId>>,
    pub(crate) instruction_occurrences: FxHashMap<InstructionRef, Vec<OccurrenceId>>,
    pub(crate) object_origins: FxHashMap<ObjectId, OccurrenceId>,
}

impl Trace {
    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn get(&self, id: OccurrenceId) -> Option<&Occurrence> {
        self.occurrences.get(id.index())
    }

    /// Like `get`, but an absent occurrence is a usage error
    pub fn require(&self, id: OccurrenceId) -> Result<&Occurrence> {
        self.get(id).ok_or_else(|| {
            SlicerError::usage(format!(
                "occurrence {} not in trace ({} occurrences)",
                id,
                self.len()
            ))
        })
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(id.index())
    }

    pub fn block_of(&self, id: OccurrenceId) -> Option<BlockId> {
        self.blocks.get(id.index()).copied()
    }

    /// Most recent definition of `key` strictly before `before`
    ///
    /// Binary search over the key's index; keys never seen resolve to `None`.
    pub fn last_definition_before(
        &self,
        key: &BindingKey,
        before: OccurrenceId,
    ) -> Option<OccurrenceId> {
        latest_before(self.definitions.get(key)?, before)
    }

    /// Each use of `id` with the definition reaching it
    ///
    /// Precomputed when the trace was finished; `None` marks a use whose
    /// definition is not in the trace.
    pub fn reaching_definitions(
        &self,
        id: OccurrenceId,
    ) -> impl Iterator<Item = (&BindingKey, Option<OccurrenceId>)> + '_ {
        let reaching = self
            .reaching
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        self.get(id)
            .into_iter()
            .flat_map(|occ| occ.bound_operands.iter())
            .zip(reaching.iter().copied())
            .filter(|(operand, _)| operand.is_use())
            .map(|(operand, def)| (&operand.key, def))
    }

    pub fn definitions_of(&self, key: &BindingKey) -> &[OccurrenceId] {
        self.definitions
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Most recent execution of `block`'s terminator in `frame` before `before`
    pub fn last_terminator_before(
        &self,
        frame: FrameId,
        block: BlockId,
        before: OccurrenceId,
    ) -> Option<OccurrenceId> {
        latest_before(self.terminators.get(&(frame, block))?, before)
    }

    pub fn stack_producers(&self, id: OccurrenceId) -> &[OccurrenceId] {
        self.stack_producers
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn frame_occurrences(&self, frame: FrameId) -> &[OccurrenceId] {
        self.frame_occurrences
            .get(frame.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Last `Return` executed by `frame`
    pub fn return_of(&self, frame: FrameId) -> Option<OccurrenceId> {
        self.returns.get(frame.index()).copied().flatten()
    }

    pub fn object_origin(&self, object: ObjectId) -> Option<OccurrenceId> {
        self.object_origins.get(&object).copied()
    }

    /// Last execution of a static instruction
    pub fn last_occurrence_of(&self, instruction: InstructionRef) -> Option<OccurrenceId> {
        self.instruction_occurrences
            .get(&instruction)
            .and_then(|ids| ids.last().copied())
    }

    /// Last `Return` executed by any frame running `code_unit`
    pub fn last_return_of(&self, code_unit: CodeUnitId) -> Option<OccurrenceId> {
        self.occurrences
            .iter()
            .rev()
            .find(|occ| {
                occ.code_unit() == code_unit
                    && self
                        .program
                        .instruction(occ.instruction)
                        .is_some_and(|i| i.op == OpKind::Return)
            })
            .map(|occ| occ.id)
    }
}

fn latest_before(ids: &[OccurrenceId], before: OccurrenceId) -> Option<OccurrenceId> {
    let idx = ids.partition_point(|id| *id < before);
    idx.checked_sub(1).map(|i| ids[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_before() {
        let ids = [OccurrenceId(2), OccurrenceId(5), OccurrenceId(9)];
        assert_eq!(latest_before(&ids, OccurrenceId(2)), None);
        assert_eq!(latest_before(&ids, OccurrenceId(3)), Some(OccurrenceId(2)));
        assert_eq!(latest_before(&ids, OccurrenceId(9)), Some(OccurrenceId(5)));
        assert_eq!(latest_before(&ids, OccurrenceId(100)), Some(OccurrenceId(9)));
        assert_eq!(latest_before(&[], OccurrenceId(1)), None);
    }
}
