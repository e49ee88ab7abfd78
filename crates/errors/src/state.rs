//! System state error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Failure to populate a system state from a description source
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StateLoadError {
    #[error("state file not found, could not open system state file: {path}")]
    NotFound { path: String },

    #[error("could not read system state from {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error(
        "maximum exceeded, requested numProcesses = {processes} numResources = {resources}, \
         maximum = {max_processes}, {max_resources}"
    )]
    CapacityExceeded {
        processes: usize,
        resources: usize,
        max_processes: usize,
        max_resources: usize,
    },

    #[error("malformed {block} at line {line}: expected {expected}, found `{found}`")]
    Malformed {
        block: String,
        line: usize,
        expected: String,
        found: String,
    },

    #[error("{block} has shape {found}, expected {expected}")]
    ShapeMismatch {
        block: String,
        expected: String,
        found: String,
    },

    #[error("truncated {block}: expected {expected} but input ended")]
    Truncated { block: String, expected: String },

    #[error("inconsistent state: {message}")]
    Inconsistent { message: String },

    #[error("{quantity} overflows a signed 64-bit value")]
    Overflow { quantity: String },
}

impl UserFacingError for StateLoadError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Check the path to the state description file."),
            Self::Unreadable { .. } => Some("Ensure the state file is readable and retry."),
            Self::CapacityExceeded { .. } => Some(
                "Raise `max_processes` / `max_resources` in the [limits] config section or via flags.",
            ),
            Self::Malformed { .. } | Self::Truncated { .. } | Self::ShapeMismatch { .. } => Some(
                "The file must hold `n m`, the resource totals, then n claim rows and n allocation rows.",
            ),
            Self::Inconsistent { .. } => {
                Some("Fix the allocations or disable strict validation to accept the state as-is.")
            }
            Self::Overflow { .. } => {
                Some("Keep claims, allocations and totals small enough that C-A and R-sum(A) fit in 64 bits.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreadable { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::NotFound { .. } => "state.not_found",
            Self::Unreadable { .. } => "state.unreadable",
            Self::CapacityExceeded { .. } => "state.capacity_exceeded",
            Self::Malformed { .. } => "state.malformed",
            Self::ShapeMismatch { .. } => "state.shape_mismatch",
            Self::Truncated { .. } => "state.truncated",
            Self::Inconsistent { .. } => "state.inconsistent",
            Self::Overflow { .. } => "state.overflow",
        })
    }
}

/// Index contract violation on a loaded state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("process index {index} out of range for {count} processes")]
    ProcessOutOfRange { index: usize, count: usize },

    #[error("vector length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl UserFacingError for IndexError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::ProcessOutOfRange { .. } => "index.process",
            Self::LengthMismatch { .. } => "index.length",
        })
    }
}
