//! Implementations of the core traits for plain `f64` slices.
//!
//! Solvers work on `[f64]` so they can read the right-hand side of a
//! [`LinearSystem`](crate::matrix::LinearSystem) and write straight into a
//! variable's scratch buffer. With the `rayon` feature the reductions run in
//! parallel; the reduction order then differs from the serial one, so norms may
//! differ in the last bits between the two builds.

use crate::core::traits::InnerProduct;

impl InnerProduct<[f64]> for () {
    type Scalar = f64;

    fn dot(&self, x: &[f64], y: &[f64]) -> f64 {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            x.par_iter().zip(y.par_iter()).map(|(xi, yi)| xi * yi).sum()
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.iter().zip(y.iter()).map(|(xi, yi)| xi * yi).sum()
        }
    }

    fn norm(&self, x: &[f64]) -> f64 {
        self.dot(x, x).sqrt()
    }
}

/// Maximum absolute entry, `‖x‖∞`.
pub fn max_abs(x: &[f64]) -> f64 {
    x.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}
