/*
 * CFG Cache
 *
 * One CFG per code unit, built on first request and shared through `Arc`.
 * DashMap keeps concurrent slicers from serializing on a single lock.
 */

use super::cfg_builder::build_cfg;
use crate::features::flow_graph::domain::ControlFlowGraph;
use crate::shared::models::{CodeUnit, CodeUnitId, Result};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Default)]
pub struct CfgCache {
    cfgs: DashMap<CodeUnitId, Arc<ControlFlowGraph>>,
}

impl CfgCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached CFG for `unit`, building it if absent
    ///
    /// Two threads racing on the same unit may both build; the first insert
    /// wins and both callers get the same `Arc`.
    pub fn get_or_build(&self, unit: &CodeUnit) -> Result<Arc<ControlFlowGraph>> {
        if let Some(cfg) = self.cfgs.get(&unit.id) {
            trace!(code_unit = %unit.id, "cfg cache hit");
            return Ok(Arc::clone(cfg.value()));
        }

        let built = Arc::new(build_cfg(unit)?);
        let cfg = self.cfgs.entry(unit.id).or_insert(built);
        Ok(Arc::clone(cfg.value()))
    }

    pub fn get(&self, id: CodeUnitId) -> Option<Arc<ControlFlowGraph>> {
        self.cfgs.get(&id).map(|cfg| Arc::clone(cfg.value()))
    }

    pub fn len(&self) -> usize {
        self.cfgs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cfgs.is_empty()
    }

    pub fn clear(&self) {
        self.cfgs.clear();
    }
}
