//! Completion simulation

use crate::order::{LowestIndexFirst, ScanOrder};
use crate::report::SafetyReport;
use banker_state::SystemState;
use banker_types::{copy_vector, fits_within, ProcessId};
use tracing::{info, trace};

/// Whether every process in `state` can run to completion
///
/// Never mutates `state`; the simulation works on its own copy of the
/// available vector.
#[must_use]
pub fn is_safe(state: &SystemState) -> bool {
    analyze(state).safe
}

/// Simulate completions lowest index first and report the sequence found
#[must_use]
pub fn analyze(state: &SystemState) -> SafetyReport {
    analyze_with(state, &mut LowestIndexFirst)
}

/// Simulate completions, letting `order` choose which pending process is
/// examined first in each round
///
/// Ids that `order` places in the pending slice but that are out of range or
/// already completed are skipped.
pub fn analyze_with<O>(state: &SystemState, order: &mut O) -> SafetyReport
where
    O: ScanOrder + ?Sized,
{
    let processes = state.process_count();
    let mut available = vec![0; state.resource_count()];
    copy_vector(state.resource_available(), &mut available);
    let mut completed = vec![false; processes];
    let mut completion_order = Vec::with_capacity(processes);
    let mut pending = Vec::with_capacity(processes);

    loop {
        pending.clear();
        pending.extend(ProcessId::range(processes).filter(|p| !completed[p.index()]));
        if pending.is_empty() {
            break;
        }
        order.arrange(&mut pending);

        let candidate = pending.iter().copied().find(|p| {
            p.index() < processes
                && !completed[p.index()]
                && state
                    .need_of(*p)
                    .is_ok_and(|need| fits_within(need, &available))
        });
        let Some(process) = candidate else {
            break;
        };
        if state.release_into(process, &mut available).is_err() {
            break;
        }
        completed[process.index()] = true;
        completion_order.push(process);
        trace!(%process, available = ?available, "Simulated process completion");
    }

    let blocked: Vec<ProcessId> = ProcessId::range(processes)
        .filter(|p| !completed[p.index()])
        .collect();
    let safe = blocked.is_empty();
    info!(
        safe,
        completed = completion_order.len(),
        blocked = blocked.len(),
        "Safety check finished"
    );

    SafetyReport {
        safe,
        completion_order,
        blocked,
        final_available: available,
    }
}
