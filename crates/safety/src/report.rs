//! Safety analysis results

use banker_types::ProcessId;
use serde::Serialize;

/// Outcome of simulating process completions on a state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyReport {
    /// Every process completed
    pub safe: bool,
    /// Processes in the order the simulation completed them
    pub completion_order: Vec<ProcessId>,
    /// Processes that could never obtain their need, in index order
    pub blocked: Vec<ProcessId>,
    /// Working availability once the simulation halted
    pub final_available: Vec<i64>,
}

impl SafetyReport {
    /// The completion order, if it is a safe sequence
    #[must_use]
    pub fn safe_sequence(&self) -> Option<&[ProcessId]> {
        self.safe.then_some(self.completion_order.as_slice())
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completion_order.len()
    }
}
