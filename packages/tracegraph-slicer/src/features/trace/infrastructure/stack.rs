/*
 * Operand Stack Replay
 *
 * Re-executes the stack effects of every occurrence, one stack per frame,
 * to recover which occurrence produced each value an occurrence consumed.
 * These producers are the implicit data dependencies (RETURN depends on
 * whatever pushed the returned value, STORE on whatever pushed the stored
 * value, ...).
 *
 * A pop on an empty frame stack means the value was produced outside traced
 * coverage; the pop is recorded with fewer producers and the replay goes on.
 */

use crate::features::trace::domain::Occurrence;
use crate::shared::models::{OccurrenceId, Program, Result, SlicerError};
use tracing::{debug, warn};

pub(crate) fn replay(
    program: &Program,
    occurrences: &[Occurrence],
    frame_count: usize,
) -> Result<Vec<Vec<OccurrenceId>>> {
    let mut stacks: Vec<Vec<OccurrenceId>> = vec![Vec::new(); frame_count];
    let mut producers = Vec::with_capacity(occurrences.len());
    let mut underflows = 0usize;

    for occ in occurrences {
        let instruction = program.instruction(occ.instruction).ok_or_else(|| {
            SlicerError::internal(format!("{} references missing {}", occ.id, occ.instruction))
        })?;
        let effect = instruction.stack_effect()?;
        let stack = stacks.get_mut(occ.frame.index()).ok_or_else(|| {
            SlicerError::internal(format!("{} runs in unknown {}", occ.id, occ.frame))
        })?;

        let available = effect.pops.min(stack.len());
        if available < effect.pops {
            underflows += 1;
            debug!(
                occurrence = %occ.id,
                frame = %occ.frame,
                instruction = %instruction,
                missing = effect.pops - available,
                "stack underflow"
            );
        }

        let popped = stack.split_off(stack.len() - available);
        stack.extend(std::iter::repeat(occ.id).take(effect.pushes));
        producers.push(popped);
    }

    if underflows > 0 {
        warn!(
            underflows,
            "operand stack underflow during replay; some values originate outside the trace"
        );
    }

    Ok(producers)
}
