//! Candidate scan order

use banker_types::ProcessId;

/// Decides which pending process the checker examines first in each round
///
/// The checker completes the first process in the arranged slice whose need
/// fits the working availability, then starts a new round. The verdict does
/// not depend on the order; only the completion sequence does.
pub trait ScanOrder {
    /// Reorder `pending`, which arrives in increasing index order
    fn arrange(&mut self, pending: &mut [ProcessId]);
}

/// Scan from `P0` upwards every round
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestIndexFirst;

impl ScanOrder for LowestIndexFirst {
    fn arrange(&mut self, _pending: &mut [ProcessId]) {}
}
