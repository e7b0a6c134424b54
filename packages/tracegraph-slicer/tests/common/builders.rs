//! Test data builders

use std::sync::Arc;
use tracegraph_slicer::{
    BindingKey, BoundOperand, CodeUnit, CodeUnitId, Constant, FrameId, Instruction, ModuleId,
    ObjectId, OccurrenceId, OpKind, Program, Trace, TraceBuilder,
};

/// Fluent builder for one code unit body
#[derive(Debug)]
pub struct UnitBuilder {
    id: CodeUnitId,
    name: String,
    module: ModuleId,
    instructions: Vec<Instruction>,
}

impl UnitBuilder {
    pub fn new(id: u32, name: &str, module: u32) -> Self {
        Self {
            id: CodeUnitId(id),
            name: name.to_string(),
            module: ModuleId(module),
            instructions: Vec::new(),
        }
    }

    pub fn push(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn int(self, value: i64) -> Self {
        self.push(Instruction::int(value))
    }

    pub fn constant(self, value: Constant) -> Self {
        self.push(Instruction::constant(value))
    }

    pub fn none(self) -> Self {
        self.constant(Constant::None)
    }

    pub fn load(self, name: &str) -> Self {
        self.push(Instruction::named(OpKind::LoadLocal, name))
    }

    pub fn store(self, name: &str) -> Self {
        self.push(Instruction::named(OpKind::StoreLocal, name))
    }

    pub fn load_global(self, name: &str) -> Self {
        self.push(Instruction::named(OpKind::LoadGlobal, name))
    }

    pub fn store_global(self, name: &str) -> Self {
        self.push(Instruction::named(OpKind::StoreGlobal, name))
    }

    pub fn load_attr(self, name: &str) -> Self {
        self.push(Instruction::named(OpKind::LoadAttr, name))
    }

    pub fn store_attr(self, name: &str) -> Self {
        self.push(Instruction::named(OpKind::StoreAttr, name))
    }

    pub fn load_method(self, name: &str) -> Self {
        self.push(Instruction::named(OpKind::LoadMethod, name))
    }

    pub fn import_name(self, module: &str) -> Self {
        self.push(Instruction::named(OpKind::ImportName, module))
    }

    pub fn import_from(self, name: &str) -> Self {
        self.push(Instruction::named(OpKind::ImportFrom, name))
    }

    pub fn binary(self, operator: &str) -> Self {
        self.push(Instruction::named(OpKind::BinaryOp, operator))
    }

    pub fn compare(self, operator: &str) -> Self {
        self.push(Instruction::named(OpKind::Compare, operator))
    }

    pub fn build(self, count: u32) -> Self {
        self.push(Instruction::counted(OpKind::Build, count))
    }

    pub fn call(self, argc: u32) -> Self {
        self.push(Instruction::counted(OpKind::Call, argc))
    }

    pub fn pop(self) -> Self {
        self.push(Instruction::simple(OpKind::Pop))
    }

    pub fn jump(self, target: usize) -> Self {
        self.push(Instruction::branch(OpKind::Jump, target))
    }

    pub fn branch_if_false(self, target: usize) -> Self {
        self.push(Instruction::branch(OpKind::BranchIfFalse, target))
    }

    pub fn branch_if_true(self, target: usize) -> Self {
        self.push(Instruction::branch(OpKind::BranchIfTrue, target))
    }

    pub fn ret(self) -> Self {
        self.push(Instruction::simple(OpKind::Return))
    }

    pub fn finish(self) -> CodeUnit {
        CodeUnit::new(self.id, self.name, self.module, self.instructions)
    }
}

pub fn program(units: impl IntoIterator<Item = CodeUnit>) -> Arc<Program> {
    Arc::new(Program::from_units(units).expect("valid code units"))
}

/// Plays the tracer: records executed positions frame by frame
///
/// Local and global operands are bound automatically from the executing
/// frame; attribute accesses and cross-module reads use `step_with`.
pub struct Recorder {
    program: Arc<Program>,
    builder: TraceBuilder,
    /// (code unit, module) per frame, in creation order
    frames: Vec<(CodeUnitId, ModuleId)>,
}

impl Recorder {
    pub fn new(program: Arc<Program>) -> Self {
        Self {
            builder: TraceBuilder::new(Arc::clone(&program)),
            program,
            frames: Vec::new(),
        }
    }

    pub fn root(&mut self, unit: u32) -> FrameId {
        self.enter_frame(unit, None)
    }

    /// Enter `unit` from `call_site`, binding `params` in the new frame
    pub fn enter(&mut self, unit: u32, call_site: OccurrenceId, params: &[&str]) -> FrameId {
        let frame = self.enter_frame(unit, Some(call_site));
        let operands = params
            .iter()
            .map(|p| BoundOperand::defines(BindingKey::local(*p, frame)));
        self.builder
            .bind_operands(call_site, operands)
            .expect("call site recorded");
        frame
    }

    fn enter_frame(&mut self, unit: u32, call_site: Option<OccurrenceId>) -> FrameId {
        let frame = self
            .builder
            .enter_frame(CodeUnitId(unit), call_site)
            .expect("frame entered");
        let module = self
            .program
            .code_unit(CodeUnitId(unit))
            .expect("known unit")
            .module;
        self.frames.push((CodeUnitId(unit), module));
        frame
    }

    pub fn step(&mut self, frame: FrameId, position: usize) -> OccurrenceId {
        let operands = self.default_operands(frame, position);
        self.step_with(frame, position, operands)
    }

    pub fn step_with(
        &mut self,
        frame: FrameId,
        position: usize,
        operands: Vec<BoundOperand>,
    ) -> OccurrenceId {
        self.builder
            .record(frame, position, operands)
            .expect("occurrence recorded")
    }

    /// Attribute access on `owner` (load uses, store defines)
    pub fn step_attr(&mut self, frame: FrameId, position: usize, owner: ObjectId) -> OccurrenceId {
        let instruction = self.instruction(frame, position);
        let key = BindingKey::attribute(instruction.name().expect("named attribute op"), owner);
        let operand = match instruction.op {
            OpKind::StoreAttr => BoundOperand::defines(key),
            _ => BoundOperand::uses(key),
        };
        self.step_with(frame, position, vec![operand])
    }

    /// Record a contiguous run of positions with default operands
    pub fn run(
        &mut self,
        frame: FrameId,
        positions: impl IntoIterator<Item = usize>,
    ) -> Vec<OccurrenceId> {
        positions
            .into_iter()
            .map(|position| self.step(frame, position))
            .collect()
    }

    pub fn new_object(&mut self) -> ObjectId {
        self.builder.new_object()
    }

    pub fn origin(&mut self, object: ObjectId, occurrence: OccurrenceId) {
        self.builder
            .record_object_origin(object, occurrence)
            .expect("origin recorded");
    }

    pub fn finish(self) -> Trace {
        self.builder.finish().expect("trace finished")
    }

    fn instruction(&self, frame: FrameId, position: usize) -> Instruction {
        let (unit, _) = self.frames[frame.index()];
        self.program
            .code_unit(unit)
            .and_then(|u| u.instruction(position))
            .expect("valid position")
            .clone()
    }

    fn default_operands(&self, frame: FrameId, position: usize) -> Vec<BoundOperand> {
        let instruction = self.instruction(frame, position);
        let (_, module) = self.frames[frame.index()];
        let Some(name) = instruction.name() else {
            return Vec::new();
        };
        match instruction.op {
            OpKind::LoadLocal => vec![BoundOperand::uses(BindingKey::local(name, frame))],
            OpKind::StoreLocal => vec![BoundOperand::defines(BindingKey::local(name, frame))],
            OpKind::LoadGlobal => vec![BoundOperand::uses(BindingKey::global(name, module))],
            OpKind::StoreGlobal => vec![BoundOperand::defines(BindingKey::global(name, module))],
            _ => Vec::new(),
        }
    }
}
