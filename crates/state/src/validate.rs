//! Consistency rules for loaded states

use banker_types::{Matrix, ProcessId, ResourceId};
use serde::Serialize;
use std::fmt;

/// Table a value was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    ResourceTotal,
    Claim,
    Allocation,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceTotal => write!(f, "resource total"),
            Self::Claim => write!(f, "claim"),
            Self::Allocation => write!(f, "allocation"),
        }
    }
}

/// One broken consistency rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A loaded cell is below zero
    Negative {
        table: Table,
        process: Option<ProcessId>,
        resource: ResourceId,
        value: i64,
    },
    /// A process holds more of a resource than it ever claimed
    AllocationExceedsClaim {
        process: ProcessId,
        resource: ResourceId,
        allocation: i64,
        claim: i64,
    },
    /// More units of a resource are allocated than exist
    ///
    /// `allocated` saturates at the `i64` bounds.
    OverAllocated {
        resource: ResourceId,
        allocated: i64,
        total: i64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative {
                table,
                process: Some(process),
                resource,
                value,
            } => write!(f, "negative {table} {value} for {process} {resource}"),
            Self::Negative {
                table,
                process: None,
                resource,
                value,
            } => write!(f, "negative {table} {value} for {resource}"),
            Self::AllocationExceedsClaim {
                process,
                resource,
                allocation,
                claim,
            } => write!(
                f,
                "{process} holds {allocation} of {resource} but claims only {claim}"
            ),
            Self::OverAllocated {
                resource,
                allocated,
                total,
            } => write!(f, "{allocated} units of {resource} allocated but only {total} exist"),
        }
    }
}

pub(crate) fn check(totals: &[i64], claim: &Matrix, allocation: &Matrix) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (resource, &value) in totals.iter().enumerate() {
        if value < 0 {
            violations.push(Violation::Negative {
                table: Table::ResourceTotal,
                process: None,
                resource: ResourceId::new(resource),
                value,
            });
        }
    }

    for (table, matrix) in [(Table::Claim, claim), (Table::Allocation, allocation)] {
        for (process, row) in matrix.iter_rows().enumerate() {
            for (resource, &value) in row.iter().enumerate() {
                if value < 0 {
                    violations.push(Violation::Negative {
                        table,
                        process: Some(ProcessId::new(process)),
                        resource: ResourceId::new(resource),
                        value,
                    });
                }
            }
        }
    }

    for (process, (held, claimed)) in allocation.iter_rows().zip(claim.iter_rows()).enumerate() {
        for (resource, (&allocation, &claim)) in held.iter().zip(claimed).enumerate() {
            if allocation > claim {
                violations.push(Violation::AllocationExceedsClaim {
                    process: ProcessId::new(process),
                    resource: ResourceId::new(resource),
                    allocation,
                    claim,
                });
            }
        }
    }

    for (resource, (allocated, &total)) in wide_column_sums(allocation).zip(totals).enumerate() {
        if allocated > i128::from(total) {
            violations.push(Violation::OverAllocated {
                resource: ResourceId::new(resource),
                allocated: saturate(allocated),
                total,
            });
        }
    }

    violations
}

/// Column sums that cannot overflow for any number of `i64` rows
fn wide_column_sums(matrix: &Matrix) -> impl Iterator<Item = i128> + '_ {
    (0..matrix.cols()).map(move |col| {
        matrix
            .iter_rows()
            .map(|row| i128::from(row[col]))
            .sum::<i128>()
    })
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value > 0 { i64::MAX } else { i64::MIN })
}
