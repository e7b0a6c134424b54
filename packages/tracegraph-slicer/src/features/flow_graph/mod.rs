//! Per-code-unit control flow graphs
//!
//! - `domain`: blocks, edges, the graph itself
//! - `infrastructure`: builder, post-dominator based control dependence, cache

pub mod domain;
pub mod infrastructure;

pub use domain::{BasicBlock, CfgEdge, CfgEdgeKind, ControlFlowGraph};
pub use infrastructure::{build_cfg, CfgCache};
