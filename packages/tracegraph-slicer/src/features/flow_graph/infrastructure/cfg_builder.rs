/*
 * CFG Builder
 *
 * Partitions a code unit's instruction list into basic blocks and connects
 * them with successor/predecessor edges.
 *
 * Block boundaries:
 * - position 0
 * - every branch target
 * - right after every branch or terminator
 *
 * Successors:
 * - conditional branch: taken + not-taken (two edges)
 * - unconditional jump: one edge
 * - return/raise: none
 * - anything else: fall through to the next block
 */

use super::control_dependence;
use crate::features::flow_graph::domain::{BasicBlock, CfgEdge, CfgEdgeKind, ControlFlowGraph};
use crate::shared::models::{BlockId, CodeUnit, Instruction, OpKind, Result, SlicerError};
use std::collections::BTreeSet;
use tracing::debug;

/// Build the CFG of one code unit
///
/// Fails only on malformed input (empty body, bad operands, branch target
/// outside the code unit). No partial CFG is ever returned.
pub fn build_cfg(unit: &CodeUnit) -> Result<ControlFlowGraph> {
    unit.validate()?;

    let instructions = &unit.instructions;
    let leaders = find_leaders(instructions);
    let starts: Vec<usize> = leaders.into_iter().collect();

    let mut blocks = Vec::with_capacity(starts.len());
    let mut block_of = vec![BlockId(0); instructions.len()];

    for (index, &start) in starts.iter().enumerate() {
        let end = starts
            .get(index + 1)
            .copied()
            .unwrap_or(instructions.len());
        let id = BlockId(index);
        for slot in &mut block_of[start..end] {
            *slot = id;
        }

        let last = &instructions[end - 1];
        let terminator = (last.is_branch() || last.is_terminator()).then_some(end - 1);

        blocks.push(BasicBlock {
            id,
            code_unit: unit.id,
            start,
            end,
            successors: Vec::new(),
            predecessors: Vec::new(),
            terminator,
            is_branch: last.op.is_conditional_branch(),
        });
    }

    let edges = build_edges(instructions, &blocks, &block_of)?;

    for edge in &edges {
        let source = &mut blocks[edge.source.index()];
        if !source.successors.contains(&edge.target) {
            source.successors.push(edge.target);
        }
        let target = &mut blocks[edge.target.index()];
        if !target.predecessors.contains(&edge.source) {
            target.predecessors.push(edge.source);
        }
    }

    let (post_dominators, control_dependencies) = control_dependence::compute(&blocks);

    debug!(
        code_unit = %unit.id,
        name = %unit.name,
        blocks = blocks.len(),
        edges = edges.len(),
        "built control flow graph"
    );

    Ok(ControlFlowGraph {
        code_unit: unit.id,
        blocks,
        edges,
        block_of,
        post_dominators,
        control_dependencies,
    })
}

/// First instruction of every block, in position order
fn find_leaders(instructions: &[Instruction]) -> BTreeSet<usize> {
    let mut leaders = BTreeSet::new();
    leaders.insert(0);

    for (position, instruction) in instructions.iter().enumerate() {
        if let Some(target) = instruction.jump_target() {
            leaders.insert(target);
        }
        if (instruction.is_branch() || instruction.is_terminator())
            && position + 1 < instructions.len()
        {
            leaders.insert(position + 1);
        }
    }

    leaders
}

fn build_edges(
    instructions: &[Instruction],
    blocks: &[BasicBlock],
    block_of: &[BlockId],
) -> Result<Vec<CfgEdge>> {
    let mut edges = Vec::new();

    for block in blocks {
        let last = &instructions[block.last_position()];
        let next = block_of.get(block.end).copied();
        let target = || -> Result<BlockId> {
            last.jump_target()
                .and_then(|t| block_of.get(t).copied())
                .ok_or_else(|| {
                    SlicerError::construction(format!(
                        "{} at position {} has no resolvable target",
                        last.op,
                        block.last_position()
                    ))
                })
        };

        let mut push = |target: BlockId, kind: CfgEdgeKind| {
            edges.push(CfgEdge {
                source: block.id,
                target,
                kind,
            })
        };

        match last.op {
            OpKind::Jump => push(target()?, CfgEdgeKind::Jump),
            OpKind::BranchIfTrue => {
                push(target()?, CfgEdgeKind::TrueBranch);
                if let Some(next) = next {
                    push(next, CfgEdgeKind::FalseBranch);
                }
            }
            OpKind::BranchIfFalse => {
                push(target()?, CfgEdgeKind::FalseBranch);
                if let Some(next) = next {
                    push(next, CfgEdgeKind::TrueBranch);
                }
            }
            OpKind::Return | OpKind::Raise => {}
            _ => {
                if let Some(next) = next {
                    push(next, CfgEdgeKind::Fallthrough);
                }
            }
        }
    }

    Ok(edges)
}
