//! Control Flow Graph blocks and edges

use crate::shared::models::{BlockId, CodeUnitId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CfgEdgeKind {
    /// Fall through into the next block (no branch taken)
    Fallthrough,
    /// Unconditional jump
    Jump,
    /// Condition evaluated true
    TrueBranch,
    /// Condition evaluated false
    FalseBranch,
}

impl CfgEdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CfgEdgeKind::Fallthrough => "FALLTHROUGH",
            CfgEdgeKind::Jump => "JUMP",
            CfgEdgeKind::TrueBranch => "TRUE",
            CfgEdgeKind::FalseBranch => "FALSE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfgEdge {
    pub source: BlockId,
    pub target: BlockId,
    pub kind: CfgEdgeKind,
}

/// Maximal straight-line run of instructions
///
/// Only the last instruction may branch or terminate; every other
/// instruction falls through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub code_unit: CodeUnitId,
    /// First instruction position (inclusive)
    pub start: usize,
    /// One past the last instruction position
    pub end: usize,
    pub successors: Vec<BlockId>,
    pub predecessors: Vec<BlockId>,
    /// Position of the branch/terminator ending this block, if any
    pub terminator: Option<usize>,
    /// Terminator is a conditional branch
    pub is_branch: bool,
}

impl BasicBlock {
    pub fn positions(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn last_position(&self) -> usize {
        self.end - 1
    }
}

/// CFG of one code unit plus its static control dependence relation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFlowGraph {
    pub code_unit: CodeUnitId,
    pub blocks: Vec<BasicBlock>,
    pub edges: Vec<CfgEdge>,
    /// Block owning each instruction position
    pub(crate) block_of: Vec<BlockId>,
    /// Immediate post-dominator per block (`None`: virtual exit / no path to exit)
    pub(crate) post_dominators: Vec<Option<BlockId>>,
    /// Blocks each block is statically control dependent on
    pub(crate) control_dependencies: Vec<Vec<BlockId>>,
}

impl ControlFlowGraph {
    pub fn entry(&self) -> BlockId {
        BlockId(0)
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index())
    }

    pub fn block_of(&self, position: usize) -> Option<BlockId> {
        self.block_of.get(position).copied()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Branch blocks whose outcome decides whether `block` executes
    pub fn control_dependencies(&self, block: BlockId) -> &[BlockId] {
        self.control_dependencies
            .get(block.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn immediate_post_dominator(&self, block: BlockId) -> Option<BlockId> {
        self.post_dominators.get(block.index()).copied().flatten()
    }

    /// Blocks ending in a conditional branch
    pub fn branch_blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.iter().filter(|b| b.is_branch)
    }

    pub fn edges_from(&self, block: BlockId) -> impl Iterator<Item = &CfgEdge> {
        self.edges.iter().filter(move |e| e.source == block)
    }
}
