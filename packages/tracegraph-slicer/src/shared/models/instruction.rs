//! Static instruction model
//!
//! A closed stack-machine instruction set. Each instruction is immutable and
//! owned by exactly one code unit; its identity is `(code unit, position)`
//! (see `InstructionRef`). Stack effects are derived from the op and its
//! operand so the trace store can replay the evaluation stack.

use super::error::{Result, SlicerError};
use super::ids::CodeUnitId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    LoadConst,
    LoadLocal,
    StoreLocal,
    LoadGlobal,
    StoreGlobal,
    LoadAttr,
    StoreAttr,
    LoadMethod,
    ImportName,
    ImportFrom,
    BinaryOp,
    UnaryOp,
    Compare,
    Build,
    Call,
    Pop,
    Dup,
    Jump,
    BranchIfTrue,
    BranchIfFalse,
    Return,
    Raise,
    Nop,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::LoadConst => "LOAD_CONST",
            OpKind::LoadLocal => "LOAD_LOCAL",
            OpKind::StoreLocal => "STORE_LOCAL",
            OpKind::LoadGlobal => "LOAD_GLOBAL",
            OpKind::StoreGlobal => "STORE_GLOBAL",
            OpKind::LoadAttr => "LOAD_ATTR",
            OpKind::StoreAttr => "STORE_ATTR",
            OpKind::LoadMethod => "LOAD_METHOD",
            OpKind::ImportName => "IMPORT_NAME",
            OpKind::ImportFrom => "IMPORT_FROM",
            OpKind::BinaryOp => "BINARY_OP",
            OpKind::UnaryOp => "UNARY_OP",
            OpKind::Compare => "COMPARE",
            OpKind::Build => "BUILD",
            OpKind::Call => "CALL",
            OpKind::Pop => "POP",
            OpKind::Dup => "DUP",
            OpKind::Jump => "JUMP",
            OpKind::BranchIfTrue => "BRANCH_IF_TRUE",
            OpKind::BranchIfFalse => "BRANCH_IF_FALSE",
            OpKind::Return => "RETURN",
            OpKind::Raise => "RAISE",
            OpKind::Nop => "NOP",
        }
    }

    /// Jumps and conditional branches
    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            OpKind::Jump | OpKind::BranchIfTrue | OpKind::BranchIfFalse
        )
    }

    pub fn is_conditional_branch(&self) -> bool {
        matches!(self, OpKind::BranchIfTrue | OpKind::BranchIfFalse)
    }

    /// Leaves the code unit; zero successors
    pub fn is_terminator(&self) -> bool {
        matches!(self, OpKind::Return | OpKind::Raise)
    }

    /// Ops that may run another code unit in a fresh frame
    pub fn can_enter_frame(&self) -> bool {
        matches!(self, OpKind::Call | OpKind::ImportName)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constant values carried by `LoadConst`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    Tuple(Vec<Constant>),
    Code(CodeUnitId),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::None => f.write_str("None"),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Int(i) => write!(f, "{}", i),
            Constant::Str(s) => write!(f, "{:?}", s),
            Constant::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            Constant::Code(unit) => write!(f, "<code {}>", unit),
        }
    }
}

/// Static operand of an instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    None,
    /// Variable, attribute, module or operator name
    Name(String),
    Const(Constant),
    /// Branch target (instruction position in the same code unit)
    Target(usize),
    /// Argument or element count
    Count(u32),
}

/// Values popped and pushed by one execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackEffect {
    pub pops: usize,
    pub pushes: usize,
}

impl StackEffect {
    const fn new(pops: usize, pushes: usize) -> Self {
        Self { pops, pushes }
    }
}

/// Static instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    pub op: OpKind,
    pub operand: Operand,
}

impl Instruction {
    pub fn new(op: OpKind, operand: Operand) -> Self {
        Self { op, operand }
    }

    /// Instruction without operand (`Return`, `Pop`, ...)
    pub fn simple(op: OpKind) -> Self {
        Self::new(op, Operand::None)
    }

    pub fn named(op: OpKind, name: impl Into<String>) -> Self {
        Self::new(op, Operand::Name(name.into()))
    }

    pub fn constant(value: Constant) -> Self {
        Self::new(OpKind::LoadConst, Operand::Const(value))
    }

    pub fn int(value: i64) -> Self {
        Self::constant(Constant::Int(value))
    }

    pub fn branch(op: OpKind, target: usize) -> Self {
        Self::new(op, Operand::Target(target))
    }

    pub fn counted(op: OpKind, count: u32) -> Self {
        Self::new(op, Operand::Count(count))
    }

    pub fn name(&self) -> Option<&str> {
        match &self.operand {
            Operand::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn jump_target(&self) -> Option<usize> {
        match self.operand {
            Operand::Target(target) if self.op.is_branch() => Some(target),
            _ => None,
        }
    }

    pub fn is_branch(&self) -> bool {
        self.op.is_branch()
    }

    pub fn is_terminator(&self) -> bool {
        self.op.is_terminator()
    }

    /// Stack effect of one execution
    ///
    /// `Build` and `Call` need a `Count` operand; branches need a `Target`.
    pub fn stack_effect(&self) -> Result<StackEffect> {
        let effect = match self.op {
            OpKind::LoadConst | OpKind::LoadLocal | OpKind::LoadGlobal | OpKind::ImportName => {
                StackEffect::new(0, 1)
            }
            OpKind::StoreLocal | OpKind::StoreGlobal | OpKind::Pop => StackEffect::new(1, 0),
            OpKind::LoadAttr | OpKind::LoadMethod | OpKind::UnaryOp => StackEffect::new(1, 1),
            OpKind::StoreAttr => StackEffect::new(2, 0),
            OpKind::BinaryOp | OpKind::Compare => StackEffect::new(2, 1),
            // module stays on the stack below the imported name
            OpKind::Dup | OpKind::ImportFrom => StackEffect::new(1, 2),
            OpKind::Build => StackEffect::new(self.count()? as usize, 1),
            OpKind::Call => StackEffect::new(self.count()? as usize + 1, 1),
            OpKind::Jump | OpKind::Nop => StackEffect::new(0, 0),
            OpKind::BranchIfTrue | OpKind::BranchIfFalse | OpKind::Return | OpKind::Raise => {
                StackEffect::new(1, 0)
            }
        };
        Ok(effect)
    }

    /// Structural checks that do not need the surrounding code unit
    pub fn validate(&self) -> Result<()> {
        if self.op.is_branch() && self.jump_target().is_none() {
            return Err(SlicerError::construction(format!(
                "{} requires a branch target operand, got {:?}",
                self.op, self.operand
            )));
        }
        self.stack_effect().map(|_| ())
    }

    fn count(&self) -> Result<u32> {
        match self.operand {
            Operand::Count(n) => Ok(n),
            _ => Err(SlicerError::construction(format!(
                "{} requires a count operand, got {:?}",
                self.op, self.operand
            ))),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Operand::None => write!(f, "{}", self.op),
            Operand::Name(name) => write!(f, "{} {}", self.op, name),
            Operand::Const(value) => write!(f, "{} {}", self.op, value),
            Operand::Target(target) => write!(f, "{} ->{}", self.op, target),
            Operand::Count(n) => write!(f, "{} {}", self.op, n),
        }
    }
}
