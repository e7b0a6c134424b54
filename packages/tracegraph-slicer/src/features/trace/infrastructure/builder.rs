/*
 * Trace Builder
 *
 * Append-only recording surface for the tracer. Occurrences are numbered in
 * arrival order; `finish` validates nothing further and builds the read-only
 * indices the resolver queries:
 *
 * - definitions per binding key, and the definition reaching every use
 * - block per occurrence, terminator executions per (frame, block)
 * - stack producers (operand stack replay)
 * - occurrences and last return per frame
 * - occurrences per static instruction
 */

use super::stack;
use crate::features::trace::domain::{BindingKey, BoundOperand, Frame, Occurrence, Trace};
use crate::shared::models::{
    CodeUnitId, FrameId, InstructionRef, ObjectId, OccurrenceId, OpKind, Program, Result,
    SlicerError,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct TraceBuilder {
    program: Arc<Program>,
    occurrences: Vec<Occurrence>,
    frames: Vec<Frame>,
    next_object: u32,
    object_origins: FxHashMap<ObjectId, OccurrenceId>,
}

impl TraceBuilder {
    pub fn new(program: Arc<Program>) -> Self {
        Self {
            program,
            occurrences: Vec::new(),
            frames: Vec::new(),
            next_object: 0,
            object_origins: FxHashMap::default(),
        }
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Start a new activation of `code_unit`
    ///
    /// `call_site` is the `Call`/`ImportName` occurrence that entered it;
    /// `None` starts a root frame (module body run directly by the tracer).
    pub fn enter_frame(
        &mut self,
        code_unit: CodeUnitId,
        call_site: Option<OccurrenceId>,
    ) -> Result<FrameId> {
        let unit = self.program.code_unit(code_unit).ok_or_else(|| {
            SlicerError::trace(format!("frame for unknown code unit {}", code_unit))
        })?;
        let module = unit.module;
        let id = FrameId(self.frames.len() as u32);

        let parent = match call_site {
            Some(site) => {
                let occ = self.occurrences.get(site.index()).ok_or_else(|| {
                    SlicerError::trace(format!("call site {} not recorded yet", site))
                })?;
                let op = self
                    .program
                    .instruction(occ.instruction)
                    .map(|i| i.op)
                    .ok_or_else(|| SlicerError::internal(format!("{} lost its instruction", site)))?;
                if !op.can_enter_frame() {
                    return Err(SlicerError::trace(format!(
                        "{} ({}) cannot enter a frame",
                        site, op
                    )));
                }
                if let Some(existing) = occ.callee_frame {
                    return Err(SlicerError::trace(format!(
                        "{} already entered {}",
                        site, existing
                    )));
                }
                Some(occ.frame)
            }
            None => None,
        };

        if let Some(site) = call_site {
            self.occurrences[site.index()].callee_frame = Some(id);
        }

        self.frames.push(Frame {
            id,
            code_unit,
            module,
            call_site,
            parent,
        });
        Ok(id)
    }

    /// Record one execution of the instruction at `position` in `frame`
    pub fn record(
        &mut self,
        frame: FrameId,
        position: usize,
        bound_operands: Vec<BoundOperand>,
    ) -> Result<OccurrenceId> {
        let code_unit = self
            .frames
            .get(frame.index())
            .map(|f| f.code_unit)
            .ok_or_else(|| SlicerError::trace(format!("unknown {}", frame)))?;
        self.record_occurrence(
            frame,
            InstructionRef::new(code_unit, position),
            bound_operands,
        )
    }

    /// Record an occurrence given its full static identity
    pub fn record_occurrence(
        &mut self,
        frame: FrameId,
        instruction: InstructionRef,
        bound_operands: Vec<BoundOperand>,
    ) -> Result<OccurrenceId> {
        let owner = self
            .frames
            .get(frame.index())
            .ok_or_else(|| SlicerError::trace(format!("unknown {}", frame)))?;
        if owner.code_unit != instruction.code_unit {
            return Err(SlicerError::trace(format!(
                "{} runs {} but occurrence is {}",
                frame, owner.code_unit, instruction
            )));
        }
        if self.program.instruction(instruction).is_none() {
            return Err(SlicerError::trace(format!(
                "position out of range: {}",
                instruction
            )));
        }

        let id = OccurrenceId(self.occurrences.len());
        self.occurrences.push(Occurrence {
            id,
            instruction,
            frame,
            bound_operands,
            callee_frame: None,
        });
        Ok(id)
    }

    /// Attach more bound operands to an already recorded occurrence
    ///
    /// Used for parameter passing: the call occurrence defines the callee's
    /// parameters, which are only keyable once the callee frame exists.
    pub fn bind_operands(
        &mut self,
        occurrence: OccurrenceId,
        operands: impl IntoIterator<Item = BoundOperand>,
    ) -> Result<()> {
        let occ = self
            .occurrences
            .get_mut(occurrence.index())
            .ok_or_else(|| SlicerError::trace(format!("unknown {}", occurrence)))?;
        occ.bound_operands.extend(operands);
        Ok(())
    }

    /// Fresh owner identity for attribute keys
    pub fn new_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        id
    }

    /// Remember which occurrence created `object`
    pub fn record_object_origin(&mut self, object: ObjectId, origin: OccurrenceId) -> Result<()> {
        if origin.index() >= self.occurrences.len() {
            return Err(SlicerError::trace(format!(
                "origin {} of {} not recorded",
                origin, object
            )));
        }
        if object.0 >= self.next_object {
            return Err(SlicerError::trace(format!("unknown {}", object)));
        }
        self.object_origins.insert(object, origin);
        Ok(())
    }

    /// Freeze the trace and build its indices
    pub fn finish(self) -> Result<Trace> {
        let program = self.program;
        let occurrences = self.occurrences;
        let frames = self.frames;

        let mut definitions: FxHashMap<BindingKey, Vec<OccurrenceId>> = FxHashMap::default();
        let mut latest: FxHashMap<&BindingKey, OccurrenceId> = FxHashMap::default();
        let mut reaching = Vec::with_capacity(occurrences.len());
        let mut blocks = Vec::with_capacity(occurrences.len());
        let mut terminators = FxHashMap::default();
        let mut frame_occurrences = vec![Vec::new(); frames.len()];
        let mut returns = vec![None; frames.len()];
        let mut instruction_occurrences: FxHashMap<InstructionRef, Vec<OccurrenceId>> =
            FxHashMap::default();

        for occ in &occurrences {
            let cfg = program.cfg(occ.code_unit())?;
            let block = cfg.block_of(occ.position()).ok_or_else(|| {
                SlicerError::internal(format!("{} has no basic block", occ.instruction))
            })?;
            blocks.push(block);

            if cfg.block(block).and_then(|b| b.terminator) == Some(occ.position()) {
                terminators
                    .entry((occ.frame, block))
                    .or_insert_with(Vec::new)
                    .push(occ.id);
            }

            if program.instruction(occ.instruction).map(|i| i.op) == Some(OpKind::Return) {
                returns[occ.frame.index()] = Some(occ.id);
            }

            // uses first: a definition never reaches a use in its own occurrence
            reaching.push(
                occ.bound_operands
                    .iter()
                    .map(|operand| {
                        operand
                            .is_use()
                            .then(|| latest.get(&operand.key).copied())
                            .flatten()
                    })
                    .collect::<Vec<_>>(),
            );

            for key in occ.definitions() {
                latest.insert(key, occ.id);
                let ids = definitions.entry(key.clone()).or_default();
                if ids.last() != Some(&occ.id) {
                    ids.push(occ.id);
                }
            }

            frame_occurrences[occ.frame.index()].push(occ.id);
            instruction_occurrences
                .entry(occ.instruction)
                .or_default()
                .push(occ.id);
        }
        drop(latest);

        let stack_producers = stack::replay(&program, &occurrences, frames.len())?;

        debug!(
            occurrences = occurrences.len(),
            frames = frames.len(),
            binding_keys = definitions.len(),
            "trace finished"
        );

        Ok(Trace {
            program,
            occurrences,
            frames,
            definitions,
            reaching,
            blocks,
            terminators,
            stack_producers,
            frame_occurrences,
            returns,
            instruction_occurrences,
            object_origins: self.object_origins,
        })
    }
}
