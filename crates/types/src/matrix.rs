//! Process × resource matrices and resource vectors
//!
//! A [`Matrix`] stores its cells in one flat buffer indexed by row stride and
//! is sized exactly to the loaded process/resource counts, so there are no
//! unused cells to mark. Resource vectors are plain `[i64]` slices; the free
//! functions below are the vector counterparts of the matrix methods.

use serde::{Serialize, Serializer};
use std::fmt::Write as _;

/// Width of every rendered column, including the `P`/`R` label columns
const COLUMN_WIDTH: usize = 4;

/// Dense row-major matrix, rows are processes and columns are resource types
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl Matrix {
    /// Zero-filled matrix of the given shape
    #[must_use]
    pub fn zeroed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Build from a flat row-major buffer
    ///
    /// Returns `None` when `data.len() != rows * cols`.
    #[must_use]
    pub fn from_flat(rows: usize, cols: usize, data: Vec<i64>) -> Option<Self> {
        (rows.checked_mul(cols) == Some(data.len())).then_some(Self { rows, cols, data })
    }

    /// Build from nested rows; `None` if the rows are ragged
    #[must_use]
    pub fn from_rows(rows: &[Vec<i64>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        let data = rows.iter().flatten().copied().collect();
        Some(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drop every cell and shrink the shape to 0 × 0, keeping the allocation
    pub fn clear(&mut self) {
        self.rows = 0;
        self.cols = 0;
        self.data.clear();
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[i64]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Iterate over rows in process order
    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &[i64]> + '_ {
        // chunks_exact(0) panics, an empty-column matrix still has `rows` rows
        (0..self.rows).map(move |row| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// Cell-wise `self - other`
    ///
    /// Returns `None` when the shapes differ or any cell overflows.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Option<Self> {
        if !self.same_shape(other) {
            return None;
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(lhs, rhs)| lhs.checked_sub(*rhs))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Sum of every column, one entry per resource type
    ///
    /// Returns `None` if any sum overflows.
    #[must_use]
    pub fn column_sums(&self) -> Option<Vec<i64>> {
        let mut sums = vec![0i64; self.cols];
        for row in self.iter_rows() {
            for (sum, value) in sums.iter_mut().zip(row) {
                *sum = sum.checked_add(*value)?;
            }
        }
        Some(sums)
    }

    /// Render with an `R0 R1 ...` header and one `Pn` labelled line per row
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = resource_header(self.cols);
        for (process, row) in self.iter_rows().enumerate() {
            let _ = write!(out, "P{process:<width$}", width = COLUMN_WIDTH - 1);
            for value in row {
                let _ = write!(out, "{value:<COLUMN_WIDTH$}");
            }
            out.push('\n');
        }
        out
    }
}

impl Serialize for Matrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter_rows())
    }
}

/// Overwrite `dst` with the first `dst.len()` values of `src`
///
/// # Panics
///
/// Panics if `src` is shorter than `dst`.
pub fn copy_vector(src: &[i64], dst: &mut [i64]) {
    dst.copy_from_slice(&src[..dst.len()]);
}

/// Element-wise `dst += src` over the common prefix, saturating at the `i64` bounds
pub fn add_into(dst: &mut [i64], src: &[i64]) {
    for (slot, value) in dst.iter_mut().zip(src) {
        *slot = slot.saturating_add(*value);
    }
}

/// True when every element of `demand` is `<=` the matching element of `supply`
#[must_use]
pub fn fits_within(demand: &[i64], supply: &[i64]) -> bool {
    demand.iter().zip(supply).all(|(need, have)| need <= have)
}

/// Render a resource vector under an `R0 R1 ...` header
#[must_use]
pub fn render_vector(values: &[i64]) -> String {
    let mut out = resource_header(values.len());
    let _ = write!(out, "{:<COLUMN_WIDTH$}", " ");
    for value in values {
        let _ = write!(out, "{value:<COLUMN_WIDTH$}");
    }
    out.push('\n');
    out
}

fn resource_header(count: usize) -> String {
    let mut out = format!("{:<COLUMN_WIDTH$}", " ");
    for resource in 0..count {
        let _ = write!(out, "R{resource:<width$}", width = COLUMN_WIDTH - 1);
    }
    out.push('\n');
    out
}
