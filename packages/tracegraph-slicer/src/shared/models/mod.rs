//! Shared models

mod code_unit;
mod error;
mod ids;
mod instruction;

pub use code_unit::{CodeUnit, Program};
pub use error::{ErrorKind, Result, SlicerError};
pub use ids::{BlockId, CodeUnitId, FrameId, InstructionRef, ModuleId, ObjectId, OccurrenceId};
pub use instruction::{Constant, Instruction, OpKind, Operand, StackEffect};
