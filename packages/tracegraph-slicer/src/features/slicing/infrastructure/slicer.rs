/*
 * Dynamic Backward Slicer
 *
 * Worklist fixpoint over a finalized trace:
 * 1. seed with the criterion occurrence
 * 2. pop an occurrence, resolve its data dependencies (named uses, stack
 *    values, call results) and its control dependency (controlling branch
 *    or call site)
 * 3. every dependency not yet in the slice joins it and the worklist
 * 4. emit the slice in execution order, not discovery order
 *
 * No occurrence is pushed twice, so the loop is bounded by trace length.
 * Each query owns its worklist and membership set; the slicer itself holds
 * only configuration and can serve queries from many threads.
 */

use crate::config::{AttributeCoverage, SliceConfig};
use crate::features::dependency::domain::{DependencyEdge, DependencyReason};
use crate::features::dependency::infrastructure::DependencyResolver;
use crate::features::slicing::domain::{Slice, SliceType, SlicingCriterion, UnresolvedUse};
use crate::features::slicing::ports::SlicerPort;
use crate::features::trace::domain::{BindingKey, Trace};
use crate::shared::models::{OccurrenceId, Result, SlicerError};
use rayon::prelude::*;
use std::collections::VecDeque;
use tracing::{debug, trace};

#[derive(Debug, Clone, Default)]
pub struct DynamicSlicer {
    config: SliceConfig,
}

impl DynamicSlicer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slicer with a validated configuration
    pub fn with_config(config: SliceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    /// Backward slice of `criterion` under this slicer's configuration
    pub fn slice(&self, trace: &Trace, criterion: impl Into<SlicingCriterion>) -> Result<Slice> {
        self.run(trace, criterion.into(), &self.config)
    }

    /// Thin slice: data dependencies only
    pub fn thin_slice(
        &self,
        trace: &Trace,
        criterion: impl Into<SlicingCriterion>,
    ) -> Result<Slice> {
        let config = self.config.clone().include_data(true).include_control(false);
        self.run(trace, criterion.into(), &config)
    }

    /// Independent slices of several criteria, computed in parallel
    pub fn slice_many(&self, trace: &Trace, criteria: &[SlicingCriterion]) -> Vec<Result<Slice>> {
        criteria
            .par_iter()
            .map(|criterion| self.run(trace, *criterion, &self.config))
            .collect()
    }

    fn run(&self, trace: &Trace, criterion: SlicingCriterion, config: &SliceConfig) -> Result<Slice> {
        let start = criterion.resolve(trace)?;
        let resolver = DependencyResolver::new(trace);

        let mut in_slice = vec![false; trace.len()];
        let mut worklist: VecDeque<(OccurrenceId, usize)> = VecDeque::new();
        let mut edges: Vec<DependencyEdge> = Vec::new();
        let mut unresolved: Vec<UnresolvedUse> = Vec::new();
        let mut truncated = false;

        in_slice[start.index()] = true;
        worklist.push_back((start, 0));

        while let Some((id, depth)) = worklist.pop_front() {
            let occ = trace.get(id).ok_or_else(|| {
                SlicerError::internal(format!("{} vanished from the trace", id))
            })?;

            let mut dependencies = Vec::new();

            if config.include_data {
                let data = resolver.data_dependencies(occ, config.interprocedural);
                dependencies.extend(data.edges);

                for key in data.unresolved {
                    let fallback = match config.attribute_coverage {
                        AttributeCoverage::Strict => None,
                        AttributeCoverage::OverApproximate => {
                            coverage_fallback(trace, id, &key, &mut dependencies)
                        }
                    };
                    unresolved.push(UnresolvedUse {
                        occurrence: id,
                        key,
                        fallback,
                    });
                }
            }

            if config.include_control {
                if let Some(edge) = resolver.control_dependency(occ, config.interprocedural)? {
                    dependencies.push(edge);
                }
            }

            let at_limit = config.max_depth.is_some_and(|max| depth >= max);

            for edge in dependencies {
                let target = edge.to;
                let seen = in_slice.get_mut(target.index()).ok_or_else(|| {
                    SlicerError::internal(format!("{} points outside the trace", edge))
                })?;

                if !*seen {
                    if at_limit {
                        truncated = true;
                        continue;
                    }
                    *seen = true;
                    worklist.push_back((target, depth + 1));
                }

                trace!(edge = %edge, "dependency");
                edges.push(edge);
            }
        }

        let occurrences: Vec<_> = trace
            .occurrences()
            .iter()
            .filter(|occ| in_slice[occ.id.index()])
            .cloned()
            .collect();

        debug!(
            criterion = %criterion,
            occurrences = occurrences.len(),
            edges = edges.len(),
            unresolved = unresolved.len(),
            truncated,
            "slice computed"
        );

        Ok(Slice::new(
            start,
            SliceType::from_flags(config.include_data, config.include_control),
            occurrences,
            edges,
            unresolved,
            truncated,
        ))
    }
}

/// Over-approximate an untraced attribute by the owner's creation
///
/// Adds the origin occurrence plus everything its initializer frame executed
/// before `user`. Returns the origin, or `None` when the trace never saw the
/// owner being created.
fn coverage_fallback(
    trace: &Trace,
    user: OccurrenceId,
    key: &BindingKey,
    dependencies: &mut Vec<DependencyEdge>,
) -> Option<OccurrenceId> {
    let BindingKey::Attribute { owner, .. } = key else {
        return None;
    };
    let origin = trace.object_origin(*owner).filter(|origin| *origin < user)?;

    dependencies.push(DependencyEdge::data(user, origin, DependencyReason::Coverage));

    if let Some(initializer) = trace.get(origin).and_then(|occ| occ.callee_frame) {
        dependencies.extend(
            trace
                .frame_occurrences(initializer)
                .iter()
                .filter(|member| **member < user)
                .map(|&member| DependencyEdge::data(user, member, DependencyReason::Coverage)),
        );
    }

    Some(origin)
}

impl SlicerPort for DynamicSlicer {
    fn backward_slice(&self, trace: &Trace, criterion: &SlicingCriterion) -> Result<Slice> {
        self.slice(trace, *criterion)
    }

    fn data_slice(&self, trace: &Trace, criterion: &SlicingCriterion) -> Result<Slice> {
        self.thin_slice(trace, *criterion)
    }

    fn slice_config(&self) -> &SliceConfig {
        &self.config
    }
}
