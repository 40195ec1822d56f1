//! Linear solver interface and the solvers shipped with the crate.
//!
//! Equations only see the [`LinearSolver`] trait, so any algorithm that
//! turns an assembled [`SparseMatrix`] and right-hand side into a solution
//! plus [`SolveStats`] can be plugged in.

use crate::error::FvError;
use crate::matrix::SparseMatrix;
use crate::utils::convergence::SolveStats;

/// Common interface for any direct or iterative solver.
pub trait LinearSolver<M: ?Sized, V: ?Sized> {
    type Error;
    type Scalar: Copy + PartialOrd + From<f64>;
    /// Solve A·x = b, writing result into `x`. On entry `x` holds the
    /// initial guess. Returns iteration stats (including convergence info).
    fn solve(&mut self, a: &M, b: &V, x: &mut V) -> Result<SolveStats<Self::Scalar>, Self::Error>;
}

/// Solver over the assembled finite-volume systems, as stored by equations.
pub type BoxedSolver = Box<dyn LinearSolver<SparseMatrix, [f64], Error = FvError, Scalar = f64>>;

pub mod direct_lu;
pub use direct_lu::LinearLuSolver;

pub mod pcg;
pub use pcg::PcgSolver;

pub(crate) fn check_system(a: &SparseMatrix, b: &[f64], x: &[f64]) -> Result<(), FvError> {
    for len in [b.len(), x.len()] {
        if len != a.size() {
            return Err(FvError::DimensionMismatch { expected: a.size(), actual: len });
        }
    }
    Ok(())
}
