//! Square sparse matrix that accumulates contributions.
//!
//! Every `add_*` call sums into the existing entry instead of overwriting
//! it, so terms can be discretized independently and their contributions
//! merged in any order. Rows are kept as ordered maps, which makes row
//! iteration deterministic and cheap for the face-by-face access pattern of
//! finite-volume assembly.

use std::collections::BTreeMap;

use crate::core::traits::MatVec;

#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    rows: Vec<BTreeMap<usize, f64>>,
}

impl SparseMatrix {
    /// An all-zero `size × size` matrix.
    pub fn new(size: usize) -> Self {
        Self { rows: vec![BTreeMap::new(); size] }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// `A[row, col] += value`.
    ///
    /// # Panics
    /// Panics if either index is outside the matrix.
    pub fn add_at(&mut self, row: usize, col: usize, value: f64) {
        let n = self.size();
        assert!(row < n && col < n, "entry ({row}, {col}) outside {n}x{n} matrix");
        *self.rows[row].entry(col).or_insert(0.0) += value;
    }

    /// `A[i, i] += diag[i]` for every row.
    pub fn add_at_diagonal(&mut self, diag: &[f64]) {
        assert_eq!(diag.len(), self.size(), "diagonal has incorrect length");
        for (i, &d) in diag.iter().enumerate() {
            *self.rows[i].entry(i).or_insert(0.0) += d;
        }
    }

    /// Sum every entry of `other` into `self`.
    pub fn add_matrix(&mut self, other: &SparseMatrix) {
        assert_eq!(self.size(), other.size(), "matrices have different sizes");
        for (row, entries) in other.rows.iter().enumerate() {
            for (&col, &v) in entries {
                *self.rows[row].entry(col).or_insert(0.0) += v;
            }
        }
    }

    /// Entry `A[row, col]`, zero when nothing was accumulated there.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row].get(&col).copied().unwrap_or(0.0)
    }

    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.size()).map(|i| self.get(i, i)).collect()
    }

    /// Stored `(column, value)` pairs of one row, in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows[row].iter().map(|(&c, &v)| (c, v))
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(BTreeMap::len).sum()
    }
}

impl MatVec<[f64]> for SparseMatrix {
    fn matvec(&self, x: &[f64], y: &mut [f64]) {
        assert_eq!(self.size(), y.len(), "Output vector y has incorrect length");
        assert_eq!(self.size(), x.len(), "Input vector x has incorrect length");
        for (yi, entries) in y.iter_mut().zip(&self.rows) {
            *yi = entries.iter().map(|(&j, &a)| a * x[j]).sum();
        }
    }
}

/// An assembled system `A·x = b`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    pub matrix: SparseMatrix,
    pub rhs: Vec<f64>,
}

impl LinearSystem {
    pub fn new(size: usize) -> Self {
        Self { matrix: SparseMatrix::new(size), rhs: vec![0.0; size] }
    }

    pub fn size(&self) -> usize {
        self.rhs.len()
    }

    /// Sum another contribution into this one.
    pub fn accumulate(&mut self, other: &LinearSystem) {
        self.matrix.add_matrix(&other.matrix);
        assert_eq!(self.rhs.len(), other.rhs.len(), "right-hand sides have different sizes");
        for (b, o) in self.rhs.iter_mut().zip(&other.rhs) {
            *b += o;
        }
    }

    /// Residual vector `A·x − b`.
    pub fn residual(&self, x: &[f64]) -> Vec<f64> {
        let mut r = vec![0.0; self.size()];
        self.matrix.matvec(x, r.as_mut_slice());
        for (ri, bi) in r.iter_mut().zip(&self.rhs) {
            *ri -= bi;
        }
        r
    }
}
