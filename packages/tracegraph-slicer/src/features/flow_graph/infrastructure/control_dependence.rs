/*
 * Static Control Dependence
 *
 * Post-dominators come from petgraph's dominator algorithm run on the
 * reversed CFG, rooted at a virtual exit node that every zero-successor
 * block flows into.
 *
 * Control dependence (Ferrante/Ottenstein/Warren):
 *   for each edge A -> S where S does not post-dominate A,
 *   every block on the post-dominator tree path from S up to (excluding)
 *   ipdom(A) is control dependent on A.
 */

use crate::features::flow_graph::domain::BasicBlock;
use crate::shared::models::BlockId;
use petgraph::algo::dominators::{simple_fast, Dominators};
use petgraph::graph::{DiGraph, NodeIndex};

/// Immediate post-dominator and control dependencies per block
pub(crate) fn compute(blocks: &[BasicBlock]) -> (Vec<Option<BlockId>>, Vec<Vec<BlockId>>) {
    let exit = blocks.len();
    let post_doms = post_dominator_tree(blocks);

    let ipdom = |block: usize| -> Option<usize> {
        post_doms
            .immediate_dominator(NodeIndex::new(block))
            .map(|node| node.index())
    };

    let post_dominates = |by: usize, block: usize| -> bool {
        post_doms
            .dominators(NodeIndex::new(block))
            .map(|mut chain| chain.any(|node| node.index() == by))
            .unwrap_or(false)
    };

    let mut control_dependencies: Vec<Vec<BlockId>> = vec![Vec::new(); blocks.len()];

    for block in blocks {
        let a = block.id.index();
        for successor in &block.successors {
            let s = successor.index();
            if post_dominates(s, a) {
                continue;
            }

            let stop = ipdom(a);
            let mut runner = Some(s);
            while let Some(current) = runner {
                if Some(current) == stop || current == exit {
                    break;
                }
                let deps = &mut control_dependencies[current];
                if !deps.contains(&block.id) {
                    deps.push(block.id);
                }
                runner = ipdom(current);
            }
        }
    }

    for deps in &mut control_dependencies {
        deps.sort();
    }

    let post_dominators = (0..blocks.len())
        .map(|block| ipdom(block).filter(|&d| d != exit).map(BlockId))
        .collect();

    (post_dominators, control_dependencies)
}

fn post_dominator_tree(blocks: &[BasicBlock]) -> Dominators<NodeIndex> {
    let edge_count: usize = blocks.iter().map(|b| b.successors.len() + 1).sum();
    let mut reversed: DiGraph<(), ()> = DiGraph::with_capacity(blocks.len() + 1, edge_count);
    for _ in 0..=blocks.len() {
        reversed.add_node(());
    }
    let exit = NodeIndex::new(blocks.len());

    for block in blocks {
        let node = NodeIndex::new(block.id.index());
        if block.successors.is_empty() {
            reversed.add_edge(exit, node, ());
        }
        for successor in &block.successors {
            reversed.add_edge(NodeIndex::new(successor.index()), node, ());
        }
    }

    simple_fast(&reversed, exit)
}
