//! Sparse matrix operations.
//!
//! Turns the 1-based triplets written by the assembler into 0-based CSR
//! matrices and dense residual vectors. Duplicate entries are summed.
//! Entries are never dropped, however small.

use crate::error::{Error, Result};
use nalgebra_sparse::coo::CooMatrix;
use nalgebra_sparse::csr::CsrMatrix as NalgebraCsr;

/// Compressed Sparse Row matrix.
pub type CsrMatrix = NalgebraCsr<f64>;

/// Builder for assembling a sparse matrix from triplets (COO format).
///
/// Accumulates 0-based (row, col, value) triplets and converts to CSR when
/// complete.
#[derive(Debug, Clone)]
pub struct TripletMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl TripletMatrix {
    /// Create a new triplet matrix builder.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self::with_capacity(n_rows, n_cols, 0)
    }

    /// Create with estimated capacity.
    pub fn with_capacity(n_rows: usize, n_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: Vec::with_capacity(nnz_estimate),
            cols: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Build a square `n x n` matrix from 1-based triplets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Assembly`] if the slices differ in length or an
    /// index lies outside `1..=n`.
    pub fn from_one_based(
        n: usize,
        rows: &[usize],
        cols: &[usize],
        values: &[f64],
    ) -> Result<Self> {
        if rows.len() != values.len() || cols.len() != values.len() {
            return Err(Error::Assembly(format!(
                "triplet lengths differ: {} rows, {} cols, {} values",
                rows.len(),
                cols.len(),
                values.len()
            )));
        }
        let mut triplets = Self::with_capacity(n, n, values.len());
        for ((&row, &col), &value) in rows.iter().zip(cols).zip(values) {
            triplets.add(to_zero_based(row, n)?, to_zero_based(col, n)?, value);
        }
        Ok(triplets)
    }

    /// Add a value at (row, col). Duplicates are summed during conversion.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.n_rows, "Row index out of bounds");
        debug_assert!(col < self.n_cols, "Column index out of bounds");
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    /// Number of stored triplets.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Convert to CSR format, summing duplicate entries.
    pub fn to_csr(self) -> Result<CsrMatrix> {
        let coo = CooMatrix::try_from_triplets(
            self.n_rows,
            self.n_cols,
            self.rows,
            self.cols,
            self.values,
        )
        .map_err(|e| Error::Assembly(format!("invalid triplet data: {}", e)))?;
        Ok(CsrMatrix::from(&coo))
    }
}

/// Dense accumulator for residual assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualVector {
    values: Vec<f64>,
}

impl ResidualVector {
    /// Create a zero vector of given size.
    pub fn zeros(size: usize) -> Self {
        Self {
            values: vec![0.0; size],
        }
    }

    /// Sum 1-based `(row, value)` pairs into a vector of length `n`.
    pub fn from_one_based(n: usize, rows: &[usize], values: &[f64]) -> Result<Self> {
        if rows.len() != values.len() {
            return Err(Error::Assembly(format!(
                "{} residual rows for {} values",
                rows.len(),
                values.len()
            )));
        }
        let mut vector = Self::zeros(n);
        for (&row, &value) in rows.iter().zip(values) {
            vector.add(to_zero_based(row, n)?, value);
        }
        Ok(vector)
    }

    /// Add a value at the given index.
    pub fn add(&mut self, index: usize, value: f64) {
        self.values[index] += value;
    }

    /// Get the underlying dense vector.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consume and return the dense vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

fn to_zero_based(index: usize, n: usize) -> Result<usize> {
    if index == 0 || index > n {
        return Err(Error::Assembly(format!(
            "index {} outside 1..={}",
            index, n
        )));
    }
    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    #[test]
    fn test_triplet_to_csr() {
        let mut triplets = TripletMatrix::new(3, 3);
        triplets.add(0, 0, 1.0);
        triplets.add(1, 1, 2.0);
        triplets.add(2, 2, 3.0);
        triplets.add(0, 1, 0.5);
        triplets.add(1, 0, 0.5);

        let csr = triplets.to_csr().unwrap();
        assert_eq!(csr.nrows(), 3);
        assert_eq!(csr.ncols(), 3);
        assert_eq!(csr.nnz(), 5);
    }

    #[test]
    fn test_duplicate_summation() {
        let mut triplets = TripletMatrix::new(2, 2);
        triplets.add(0, 0, 1.0);
        triplets.add(0, 0, 2.0);
        triplets.add(0, 0, 3.0);

        let csr = triplets.to_csr().unwrap();
        let dense = DMatrix::from(&csr);
        assert_relative_eq!(dense[(0, 0)], 6.0);
    }

    #[test]
    fn test_tiny_values_kept() {
        let mut triplets = TripletMatrix::new(2, 2);
        triplets.add(1, 0, 1e-300);
        assert_eq!(triplets.nnz(), 1);
        let dense = DMatrix::from(&triplets.to_csr().unwrap());
        assert_eq!(dense[(1, 0)], 1e-300);
    }

    #[test]
    fn test_from_one_based() {
        let triplets =
            TripletMatrix::from_one_based(2, &[1, 2, 2], &[2, 1, 2], &[4.0, 5.0, 6.0]).unwrap();
        let dense = DMatrix::from(&triplets.to_csr().unwrap());
        assert_eq!(dense[(0, 0)], 0.0);
        assert_eq!(dense[(0, 1)], 4.0);
        assert_eq!(dense[(1, 0)], 5.0);
        assert_eq!(dense[(1, 1)], 6.0);
    }

    #[test]
    fn test_from_one_based_rejects_bad_indices() {
        assert!(matches!(
            TripletMatrix::from_one_based(2, &[0], &[1], &[1.0]),
            Err(Error::Assembly(_))
        ));
        assert!(TripletMatrix::from_one_based(2, &[1], &[3], &[1.0]).is_err());
        assert!(TripletMatrix::from_one_based(2, &[1, 2], &[1], &[1.0]).is_err());
    }

    #[test]
    fn test_residual_vector_sums_duplicates() {
        let v = ResidualVector::from_one_based(3, &[1, 3, 1], &[1.0, 2.0, 0.5]).unwrap();
        assert_eq!(v.as_slice(), &[1.5, 0.0, 2.0]);
        assert!(ResidualVector::from_one_based(3, &[4], &[1.0]).is_err());
    }
}
