//! System state store
//!
//! Holds the claim, allocation and need matrices together with the total and
//! available resource vectors. `need` and `available` are always derived from
//! the other three in the same step that installs them, so they can never be
//! observed stale.

use crate::parser::{self, Description};
use crate::validate::{self, Violation};
use banker_errors::{IndexError, StateLoadError};
use banker_types::{add_into, Matrix, ProcessId};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Largest process and resource counts a description may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub max_processes: usize,
    pub max_resources: usize,
}

impl Capacity {
    #[must_use]
    pub const fn new(max_processes: usize, max_resources: usize) -> Self {
        Self {
            max_processes,
            max_resources,
        }
    }

    /// Fail with [`StateLoadError::CapacityExceeded`] if either count is over its bound
    ///
    /// # Errors
    ///
    /// Returns an error when `processes > max_processes`, `resources > max_resources`,
    /// or the matrix cell count `processes * resources` does not fit in `usize`.
    pub fn check(self, processes: usize, resources: usize) -> Result<(), StateLoadError> {
        if processes > self.max_processes
            || resources > self.max_resources
            || processes.checked_mul(resources).is_none()
        {
            return Err(StateLoadError::CapacityExceeded {
                processes,
                resources,
                max_processes: self.max_processes,
                max_resources: self.max_resources,
            });
        }
        Ok(())
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self::new(20, 20)
    }
}

/// How a [`SystemState`] treats the descriptions it loads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub capacity: Capacity,
    /// Reject states that break `0 <= allocation <= claim` or over-allocate a resource
    pub strict: bool,
}

/// Resource state of a simulated system
///
/// A default-constructed state is empty: zero processes, zero resources and
/// no cells. It only becomes populated through one of the `load_*` methods,
/// each of which resets first and installs a complete, derived state or
/// nothing at all.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemState {
    #[serde(skip)]
    options: LoadOptions,
    #[serde(skip)]
    populated: bool,
    claim: Matrix,
    allocation: Matrix,
    need: Matrix,
    resource_total: Vec<i64>,
    resource_available: Vec<i64>,
}

impl SystemState {
    /// Create an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty state that loads with the given options
    #[must_use]
    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Return to the empty state
    pub fn reset(&mut self) {
        self.populated = false;
        self.claim.clear();
        self.allocation.clear();
        self.need.clear();
        self.resource_total.clear();
        self.resource_available.clear();
    }

    /// Load a state description from a file
    ///
    /// # Errors
    ///
    /// Returns [`StateLoadError::NotFound`] if the file does not exist,
    /// [`StateLoadError::Unreadable`] if it cannot be read, and the parse or
    /// validation errors of [`SystemState::load_str`] otherwise. On any error
    /// the state is left empty.
    pub fn load_path(&mut self, path: &Path) -> Result<(), StateLoadError> {
        self.reset();
        debug!(path = %path.display(), "Loading system state");

        let input = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StateLoadError::NotFound {
                path: path.display().to_string(),
            },
            _ => StateLoadError::Unreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })?;
        self.load_str(&input)
    }

    /// Load a state description from any reader
    ///
    /// # Errors
    ///
    /// Returns [`StateLoadError::Unreadable`] if reading fails (including
    /// invalid UTF-8), and the parse or validation errors of
    /// [`SystemState::load_str`] otherwise. On any error the state is left empty.
    pub fn load_reader<R: Read>(&mut self, mut reader: R) -> Result<(), StateLoadError> {
        self.reset();
        let mut input = String::new();
        reader
            .read_to_string(&mut input)
            .map_err(|e| StateLoadError::Unreadable {
                path: "<reader>".to_string(),
                message: e.to_string(),
            })?;
        self.load_str(&input)
    }

    /// Load a state description held in memory
    ///
    /// # Errors
    ///
    /// Returns an error if the declared counts exceed the capacity, a value is
    /// missing or not an integer, or (in strict mode) the state is
    /// inconsistent. On any error the state is left empty.
    pub fn load_str(&mut self, input: &str) -> Result<(), StateLoadError> {
        self.reset();
        let description = parser::parse(input, self.options.capacity)?;
        self.install(description)
    }

    /// Load already-parsed totals, claims and allocations
    ///
    /// # Errors
    ///
    /// Returns [`StateLoadError::ShapeMismatch`] when the matrices and the
    /// totals do not agree on their dimensions, plus the capacity and strict
    /// validation errors of [`SystemState::load_str`].
    pub fn load_parts(
        &mut self,
        resource_total: Vec<i64>,
        claim: Matrix,
        allocation: Matrix,
    ) -> Result<(), StateLoadError> {
        self.reset();
        if claim.cols() != resource_total.len() {
            return Err(shape_mismatch("claim matrix", &claim, claim.rows(), resource_total.len()));
        }
        if allocation.rows() != claim.rows() || allocation.cols() != claim.cols() {
            return Err(shape_mismatch(
                "allocation matrix",
                &allocation,
                claim.rows(),
                claim.cols(),
            ));
        }
        self.options.capacity.check(claim.rows(), claim.cols())?;
        self.install(Description {
            totals: resource_total,
            claim,
            allocation,
        })
    }

    fn install(&mut self, description: Description) -> Result<(), StateLoadError> {
        let Description {
            totals,
            claim,
            allocation,
        } = description;

        if self.options.strict {
            let violations = validate::check(&totals, &claim, &allocation);
            if !violations.is_empty() {
                let message = violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(StateLoadError::Inconsistent { message });
            }
        }

        self.resource_total = totals;
        self.claim = claim;
        self.allocation = allocation;
        if let Err(e) = self.derive_need_and_available() {
            self.reset();
            return Err(e);
        }
        self.populated = true;

        debug!(
            processes = self.process_count(),
            resources = self.resource_count(),
            "Loaded system state"
        );
        if self.need.iter_rows().flatten().any(|v| *v < 0)
            || self.resource_available.iter().any(|v| *v < 0)
        {
            warn!("Loaded state has negative need or available values");
        }
        Ok(())
    }

    /// Recompute `need = claim - allocation` and
    /// `available = total - column sums of allocation`
    fn derive_need_and_available(&mut self) -> Result<(), StateLoadError> {
        if !self.claim.same_shape(&self.allocation) {
            return Err(shape_mismatch(
                "allocation matrix",
                &self.allocation,
                self.claim.rows(),
                self.claim.cols(),
            ));
        }
        if self.claim.cols() != self.resource_total.len() {
            return Err(shape_mismatch(
                "claim matrix",
                &self.claim,
                self.claim.rows(),
                self.resource_total.len(),
            ));
        }

        self.need = self
            .claim
            .difference(&self.allocation)
            .ok_or_else(|| overflow("need matrix C-A"))?;

        let allocated = self
            .allocation
            .column_sums()
            .ok_or_else(|| overflow("allocated total per resource"))?;
        self.resource_available = self
            .resource_total
            .iter()
            .zip(&allocated)
            .map(|(total, used)| total.checked_sub(*used))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| overflow("available vector"))?;
        Ok(())
    }

    /// Whether a load has completed since the last reset
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    #[must_use]
    pub fn process_count(&self) -> usize {
        self.claim.rows()
    }

    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resource_total.len()
    }

    #[must_use]
    pub fn claim(&self) -> &Matrix {
        &self.claim
    }

    #[must_use]
    pub fn allocation(&self) -> &Matrix {
        &self.allocation
    }

    #[must_use]
    pub fn need(&self) -> &Matrix {
        &self.need
    }

    #[must_use]
    pub fn resource_total(&self) -> &[i64] {
        &self.resource_total
    }

    #[must_use]
    pub fn resource_available(&self) -> &[i64] {
        &self.resource_available
    }

    /// Remaining demand of one process, one entry per resource type
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ProcessOutOfRange`] for an unknown process.
    pub fn need_of(&self, process: ProcessId) -> Result<&[i64], IndexError> {
        self.need
            .row(process.index())
            .ok_or(IndexError::ProcessOutOfRange {
                index: process.index(),
                count: self.process_count(),
            })
    }

    /// Current holdings of one process, one entry per resource type
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ProcessOutOfRange`] for an unknown process.
    pub fn allocation_of(&self, process: ProcessId) -> Result<&[i64], IndexError> {
        self.allocation
            .row(process.index())
            .ok_or(IndexError::ProcessOutOfRange {
                index: process.index(),
                count: self.process_count(),
            })
    }

    /// Add everything `process` holds into `available`, as if it had finished
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ProcessOutOfRange`] for an unknown process and
    /// [`IndexError::LengthMismatch`] if `available` is not one entry per
    /// resource type. `available` is untouched on error.
    pub fn release_into(&self, process: ProcessId, available: &mut [i64]) -> Result<(), IndexError> {
        let held = self.allocation_of(process)?;
        if available.len() != held.len() {
            return Err(IndexError::LengthMismatch {
                expected: held.len(),
                actual: available.len(),
            });
        }
        add_into(available, held);
        Ok(())
    }

    /// Every consistency rule the loaded state breaks
    ///
    /// Empty for a consistent state. Strict loading rejects any state for
    /// which this is non-empty.
    #[must_use]
    pub fn validate(&self) -> Vec<Violation> {
        validate::check(&self.resource_total, &self.claim, &self.allocation)
    }
}

fn shape_mismatch(block: &str, found: &Matrix, rows: usize, cols: usize) -> StateLoadError {
    StateLoadError::ShapeMismatch {
        block: block.to_string(),
        expected: format!("{rows}x{cols}"),
        found: format!("{}x{}", found.rows(), found.cols()),
    }
}

fn overflow(quantity: &str) -> StateLoadError {
    StateLoadError::Overflow {
        quantity: quantity.to_string(),
    }
}
