//! LU solver with iterative refinement.
//!
//! The system is factorized once with Faer's full-pivoting LU. The first
//! solution is then refined against its own residual,
//! `x ← x − LU⁻¹ (A·x − b)`, until the largest correction drops to the
//! tolerance or the refinement budget runs out. Exhausting the budget is
//! reported through [`SolveStats::converged`], not as an error; a factor
//! that produces non-finite values is reported as
//! [`FvError::SingularMatrix`].
//!
//! Only suitable for small systems: the sparse matrix is copied into a
//! dense one before factorization.

use faer::linalg::solvers::{FullPivLu, SolveCore};
use faer::{Conj, MatMut};
use log::debug;

use crate::core::traits::InnerProduct;
use crate::core::wrappers::max_abs;
use crate::error::FvError;
use crate::matrix::{LinearSystem, SparseMatrix};
use crate::solver::{LinearSolver, check_system};
use crate::utils::convergence::SolveStats;

/// Pivots below `n · this · max pivot` count as zero.
const SINGULAR_PIVOT_RATIO: f64 = 1e3 * f64::EPSILON;

pub struct LinearLuSolver {
    /// Largest acceptable refinement correction.
    pub tolerance: f64,
    /// Maximum number of refinement steps.
    pub iterations: usize,
}

impl LinearLuSolver {
    pub fn new(tolerance: f64, iterations: usize) -> Self {
        Self { tolerance, iterations }
    }

    /// Rejects a factorization whose smallest pivot is roundoff relative
    /// to the largest one.
    fn check_pivots(factor: &FullPivLu<f64>) -> Result<(), FvError> {
        let u = factor.U();
        let n = u.nrows();
        let (min, max) = u
            .diagonal()
            .column_vector()
            .iter()
            .fold((f64::INFINITY, 0.0_f64), |(lo, hi), d| (lo.min(d.abs()), hi.max(d.abs())));
        if !(max > 0.0 && max.is_finite() && min > SINGULAR_PIVOT_RATIO * n as f64 * max) {
            return Err(FvError::SingularMatrix);
        }
        Ok(())
    }

    fn solve_with(factor: &FullPivLu<f64>, rhs: &mut [f64]) -> Result<(), FvError> {
        let n = rhs.len();
        let rhs_mat = MatMut::from_column_major_slice_mut(rhs, n, 1);
        factor.solve_in_place_with_conj(Conj::No, rhs_mat);
        if rhs.iter().all(|v| v.is_finite()) { Ok(()) } else { Err(FvError::SingularMatrix) }
    }
}

impl Default for LinearLuSolver {
    fn default() -> Self {
        Self::new(1e-10, 10)
    }
}

impl LinearSolver<SparseMatrix, [f64]> for LinearLuSolver {
    type Error = FvError;
    type Scalar = f64;

    fn solve(&mut self, a: &SparseMatrix, b: &[f64], x: &mut [f64]) -> Result<SolveStats<f64>, FvError> {
        check_system(a, b, x)?;
        if a.size() == 0 {
            return Ok(SolveStats { iterations: 0, final_residual: 0.0, converged: true });
        }
        let dense = a.to_dense();
        let factor = FullPivLu::new(dense.as_ref());
        Self::check_pivots(&factor)?;
        x.copy_from_slice(b);
        Self::solve_with(&factor, x)?;

        let system = LinearSystem { matrix: a.clone(), rhs: b.to_vec() };
        let mut tol = self.tolerance + 1.0;
        let mut iterations = 0;
        while iterations < self.iterations && tol > self.tolerance {
            let mut correction = system.residual(x);
            Self::solve_with(&factor, &mut correction)?;
            for (xi, ci) in x.iter_mut().zip(&correction) {
                *xi -= ci;
            }
            tol = max_abs(&correction);
            iterations += 1;
            debug!("LU refinement step {iterations}: max correction {tol:e}");
        }

        let final_residual = ().norm(system.residual(x).as_slice());
        Ok(SolveStats { iterations, final_residual, converged: tol <= self.tolerance })
    }
}
