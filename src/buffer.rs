//! Owned storage for the access kernels.
//!
//! Both types allocate through `try_reserve_exact`, so an oversized request
//! comes back as [`KernelError::AllocationFailure`] instead of aborting.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use crate::error::{KernelError, Precondition, Result};
use crate::invariant_ppt::{assert_invariant, BUFFER_ALLOCATED};

/// Allocate a `Vec` with exactly `len` slots, reporting failure as an error.
pub(crate) fn try_alloc<T>(len: usize) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| KernelError::AllocationFailure { requested: len })?;
    Ok(data)
}

/// A fixed-length, contiguous buffer of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    data: Vec<f64>,
}

impl Buffer {
    /// A buffer of `len` zeros.
    pub fn zeroed(len: usize) -> Result<Self> {
        Self::from_fn(len, |_| 0.0)
    }

    /// A buffer whose element `i` is `f(i)`.
    pub fn from_fn(len: usize, f: impl FnMut(usize) -> f64) -> Result<Self> {
        let mut data = try_alloc(len)?;
        data.extend((0..len).map(f));
        assert_invariant(
            BUFFER_ALLOCATED,
            data.len() == len,
            "buffer holds exactly the requested length",
            Some("Buffer::from_fn"),
        );
        Ok(Self { data })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the samples.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Borrow the samples mutably. The length stays fixed.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl From<Vec<f64>> for Buffer {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

impl AsRef<[f64]> for Buffer {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}

/// A square matrix stored row-major in one contiguous allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// An `n × n` matrix of zeros.
    pub fn zeroed(n: usize) -> Result<Self> {
        Self::from_fn(n, |_, _| 0.0)
    }

    /// An `n × n` matrix whose element `(i, j)` is `f(i, j)`.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> f64) -> Result<Self> {
        let len = n
            .checked_mul(n)
            .ok_or(KernelError::AllocationFailure { requested: usize::MAX })?;
        let mut data = try_alloc(len)?;
        for i in 0..n {
            for j in 0..n {
                data.push(f(i, j));
            }
        }
        assert_invariant(
            BUFFER_ALLOCATED,
            data.len() == len,
            "matrix holds n * n elements",
            Some("Matrix::from_fn"),
        );
        Ok(Self { n, data })
    }

    /// The `n × n` identity.
    pub fn identity(n: usize) -> Result<Self> {
        Self::from_fn(n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Build from explicit rows. Every row must have as many entries as there are rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(Precondition::NonSquare {
                rows: n,
                cols: bad.len(),
            }
            .into());
        }
        Self::from_fn(n, |i, j| rows[i][j])
    }

    /// Dimension `n` of the `n × n` matrix.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Element at row `i`, column `j`. Panics when out of range, like slice indexing.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Overwrite the element at row `i`, column `j`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    /// Borrow row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Borrow the row-major backing storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Borrow the row-major backing storage mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Copy out as a vector of rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n).map(|i| self.row(i).to_vec()).collect()
    }

    /// Element-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.n == other.n
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_from_fn_fills_in_order() {
        let buf = Buffer::from_fn(4, |i| i as f64 * 1.5).unwrap();
        assert_eq!(buf.as_slice(), &[0.0, 1.5, 3.0, 4.5]);
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn empty_buffer_is_fine() {
        let buf = Buffer::zeroed(0).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn huge_buffer_reports_allocation_failure() {
        let err = Buffer::zeroed(usize::MAX / 4).unwrap_err();
        assert!(matches!(err, KernelError::AllocationFailure { .. }));
    }

    #[test]
    fn overflowing_matrix_reports_allocation_failure() {
        let err = Matrix::zeroed(usize::MAX / 2).unwrap_err();
        assert!(matches!(err, KernelError::AllocationFailure { .. }));
    }

    #[test]
    fn matrix_is_row_major() {
        let m = Matrix::from_fn(3, |i, j| (i * 10 + j) as f64).unwrap();
        assert_eq!(m.get(1, 2), 12.0);
        assert_eq!(m.as_slice()[5], 12.0);
        assert_eq!(m.row(2), &[20.0, 21.0, 22.0]);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            Matrix::from_rows(&rows),
            Err(KernelError::PreconditionViolation(Precondition::NonSquare {
                rows: 2,
                cols: 1
            }))
        );
    }

    #[test]
    fn from_rows_round_trips_through_to_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let m = Matrix::from_rows(&rows).unwrap();
        assert_eq!(m.to_rows(), rows);
    }

    #[test]
    fn set_then_get() {
        let mut m = Matrix::zeroed(2).unwrap();
        m.set(1, 0, 7.5);
        assert_eq!(m.get(1, 0), 7.5);
        assert!(!m.approx_eq(&Matrix::zeroed(2).unwrap(), 1e-9));
    }
}
