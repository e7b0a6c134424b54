/*
 * Dependency Resolver
 *
 * Answers, for one occurrence, "which earlier occurrences does it depend
 * on?" using only the trace's read-only indices:
 *
 * Data:
 * - each named use -> nearest preceding definition of the exact same key
 * - each popped stack value -> the occurrence that pushed it
 * - a consumed value pushed by a call/import that entered a frame ->
 *   that frame's last return
 *
 * Control:
 * - most recent in-frame execution of a branch the occurrence's block is
 *   statically control dependent on
 * - otherwise, the call site that entered the frame
 *
 * The resolver never guesses: a use with no definition is reported back as
 * unresolved.
 */

use crate::features::dependency::domain::{DependencyEdge, DependencyReason};
use crate::features::trace::domain::{BindingKey, Occurrence, Trace};
use crate::shared::models::{OccurrenceId, Result};
use tracing::trace;

/// Data dependencies of one occurrence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataDependencies {
    pub edges: Vec<DependencyEdge>,
    /// Uses with no definition in the trace
    pub unresolved: Vec<BindingKey>,
}

#[derive(Debug, Clone, Copy)]
pub struct DependencyResolver<'t> {
    trace: &'t Trace,
}

impl<'t> DependencyResolver<'t> {
    pub fn new(trace: &'t Trace) -> Self {
        Self { trace }
    }

    pub fn trace(&self) -> &'t Trace {
        self.trace
    }

    /// Definition of `key` with the largest sequence index below the use
    pub fn resolve_definition(
        &self,
        use_occurrence: OccurrenceId,
        key: &BindingKey,
    ) -> Option<OccurrenceId> {
        self.trace.last_definition_before(key, use_occurrence)
    }

    pub fn data_dependencies(&self, occ: &Occurrence, interprocedural: bool) -> DataDependencies {
        let mut deps = DataDependencies::default();

        for (key, reaching) in self.trace.reaching_definitions(occ.id) {
            match reaching {
                Some(def) => {
                    trace!(from = %occ.id, to = %def, key = %key, "binding dependency");
                    deps.edges.push(DependencyEdge::data(
                        occ.id,
                        def,
                        DependencyReason::Binding(key.clone()),
                    ));
                }
                None => {
                    trace!(occurrence = %occ.id, key = %key, "unresolved use");
                    deps.unresolved.push(key.clone());
                }
            }
        }

        for &producer in self.trace.stack_producers(occ.id) {
            deps.edges
                .push(DependencyEdge::data(occ.id, producer, DependencyReason::Stack));

            if interprocedural {
                if let Some(ret) = self.call_result(producer) {
                    if ret < occ.id {
                        deps.edges
                            .push(DependencyEdge::data(occ.id, ret, DependencyReason::CallResult));
                    }
                }
            }
        }

        deps
    }

    /// Return executed by the frame `producer` entered, if it entered one
    pub fn call_result(&self, producer: OccurrenceId) -> Option<OccurrenceId> {
        self.trace
            .get(producer)
            .and_then(|p| p.callee_frame)
            .and_then(|frame| self.trace.return_of(frame))
    }

    /// Nearest occurrence whose outcome decided that `occ` executed
    pub fn control_dependency(
        &self,
        occ: &Occurrence,
        interprocedural: bool,
    ) -> Result<Option<DependencyEdge>> {
        if let Some(branch) = self.controlling_branch(occ)? {
            return Ok(Some(DependencyEdge::control(
                occ.id,
                branch,
                DependencyReason::Branch,
            )));
        }

        if !interprocedural {
            return Ok(None);
        }

        Ok(self
            .trace
            .frame(occ.frame)
            .and_then(|frame| frame.call_site)
            .map(|site| DependencyEdge::control(occ.id, site, DependencyReason::CallSite)))
    }

    /// Most recent in-frame branch execution controlling `occ`'s block
    pub fn controlling_branch(&self, occ: &Occurrence) -> Result<Option<OccurrenceId>> {
        let Some(block) = self.trace.block_of(occ.id) else {
            return Ok(None);
        };
        let cfg = self.trace.program().cfg(occ.code_unit())?;

        Ok(cfg
            .control_dependencies(block)
            .iter()
            .filter_map(|&controller| {
                self.trace
                    .last_terminator_before(occ.frame, controller, occ.id)
            })
            .max())
    }
}
