//! Code units and the program registry
//!
//! A code unit is one function/method/class/module body. It is built once,
//! before execution, and shared read-only by every frame that runs it.

use super::error::{Result, SlicerError};
use super::ids::{CodeUnitId, InstructionRef, ModuleId};
use super::instruction::Instruction;
use crate::features::flow_graph::domain::ControlFlowGraph;
use crate::features::flow_graph::infrastructure::CfgCache;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One function/method/module body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeUnit {
    pub id: CodeUnitId,
    pub name: String,
    /// Module whose namespace this code unit's globals live in
    pub module: ModuleId,
    pub instructions: Vec<Instruction>,
}

impl CodeUnit {
    pub fn new(
        id: CodeUnitId,
        name: impl Into<String>,
        module: ModuleId,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            module,
            instructions,
        }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instruction(&self, position: usize) -> Option<&Instruction> {
        self.instructions.get(position)
    }

    /// Reject malformed bodies: empty, bad operands, branch targets out of range
    pub fn validate(&self) -> Result<()> {
        if self.instructions.is_empty() {
            return Err(SlicerError::construction(format!(
                "code unit '{}' ({}) has no instructions",
                self.name, self.id
            )));
        }

        for (position, instruction) in self.instructions.iter().enumerate() {
            instruction.validate().map_err(|e| {
                SlicerError::construction(format!(
                    "{} at {}: {}",
                    self.name,
                    InstructionRef::new(self.id, position),
                    e.message
                ))
            })?;

            if let Some(target) = instruction.jump_target() {
                if target >= self.instructions.len() {
                    return Err(SlicerError::construction(format!(
                        "branch target {} outside code unit '{}' ({} instructions) at {}",
                        target,
                        self.name,
                        self.instructions.len(),
                        InstructionRef::new(self.id, position)
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Registry of every code unit a traced execution may touch
///
/// CFGs are built lazily per code unit and cached; the registry is
/// read-only once handed to a trace, so it can be shared across threads.
#[derive(Debug, Default)]
pub struct Program {
    units: FxHashMap<CodeUnitId, Arc<CodeUnit>>,
    cfgs: CfgCache,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a set of code units
    pub fn from_units(units: impl IntoIterator<Item = CodeUnit>) -> Result<Self> {
        let mut program = Self::new();
        for unit in units {
            program.add_code_unit(unit)?;
        }
        Ok(program)
    }

    /// Register a code unit; ids must be unique
    pub fn add_code_unit(&mut self, unit: CodeUnit) -> Result<()> {
        unit.validate()?;
        if self.units.contains_key(&unit.id) {
            return Err(SlicerError::construction(format!(
                "duplicate code unit id {} ('{}')",
                unit.id, unit.name
            )));
        }
        self.units.insert(unit.id, Arc::new(unit));
        Ok(())
    }

    pub fn code_unit(&self, id: CodeUnitId) -> Option<&Arc<CodeUnit>> {
        self.units.get(&id)
    }

    /// Like `code_unit`, but an unknown id is a usage error
    pub fn require(&self, id: CodeUnitId) -> Result<&Arc<CodeUnit>> {
        self.units
            .get(&id)
            .ok_or_else(|| SlicerError::usage(format!("unknown code unit {}", id)))
    }

    pub fn instruction(&self, at: InstructionRef) -> Option<&Instruction> {
        self.units
            .get(&at.code_unit)
            .and_then(|unit| unit.instruction(at.position))
    }

    /// CFG for a code unit, built on first request
    pub fn cfg(&self, id: CodeUnitId) -> Result<Arc<ControlFlowGraph>> {
        let unit = self.require(id)?;
        self.cfgs.get_or_build(unit)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of CFGs built so far
    pub fn cached_cfg_count(&self) -> usize {
        self.cfgs.len()
    }
}
