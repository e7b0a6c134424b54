/*
 * Tracegraph Slicer - Dynamic Backward Slicing over Execution Traces
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Instruction model, code units, ids, errors
 * - features/    : Vertical slices (flow_graph -> trace -> dependency -> slicing)
 * - config/      : SliceConfig, presets, YAML loading
 *
 * Pipeline:
 *   tracer (external) -> TraceBuilder -> Trace (indexed, immutable)
 *   -> DynamicSlicer (worklist over DependencyResolver + per-unit CFGs)
 *   -> Slice (ordered by sequence index)
 *
 * Concurrency:
 * - CFGs cached per code unit in a DashMap, shared via Arc
 * - Rayon for independent criteria (`slice_many`)
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

pub mod config;
pub mod features;
pub mod shared;

pub use config::{AttributeCoverage, ConfigError, Preset, SliceConfig};
pub use features::dependency::{DependencyEdge, DependencyKind, DependencyReason, DependencyResolver};
pub use features::flow_graph::{build_cfg, BasicBlock, CfgEdgeKind, ControlFlowGraph};
pub use features::slicing::{DynamicSlicer, Slice, SliceType, SlicerPort, SlicingCriterion, UnresolvedUse};
pub use features::trace::{Access, BindingKey, BoundOperand, Frame, Occurrence, Trace, TraceBuilder};
pub use shared::models::{
    BlockId, CodeUnit, CodeUnitId, Constant, ErrorKind, FrameId, Instruction, InstructionRef,
    ModuleId, ObjectId, OccurrenceId, OpKind, Operand, Program, Result, SlicerError,
};
