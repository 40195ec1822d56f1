//! Options for building solvers and choosing the assembly backend.
//!
//! This module provides the `SolverOptions` struct, which selects one of the
//! shipped linear solvers together with its tolerance and iteration budget,
//! and the `AccumulationStrategy` switch used by the terms when they compute
//! their coefficients.

use crate::solver::{BoxedSolver, LinearLuSolver, PcgSolver};

/// Which linear solver an equation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverKind {
    /// Dense LU factorization with iterative refinement.
    #[default]
    Lu,
    /// Conjugate gradient without preconditioning.
    Cg,
    /// Conjugate gradient with a Jacobi preconditioner.
    JacobiPcg,
}

/// Solver type & parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub kind: SolverKind,
    /// Refinement tolerance for `Lu`, relative residual for the CG kinds.
    pub tolerance: f64,
    /// Refinement steps for `Lu`, iterations for the CG kinds.
    pub iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { kind: SolverKind::Lu, tolerance: 1e-10, iterations: 10 }
    }
}

impl SolverOptions {
    pub fn new(kind: SolverKind) -> Self {
        match kind {
            SolverKind::Lu => Self::default(),
            SolverKind::Cg | SolverKind::JacobiPcg => Self { kind, tolerance: 1e-10, iterations: 1000 },
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn build(&self) -> BoxedSolver {
        match self.kind {
            SolverKind::Lu => Box::new(LinearLuSolver::new(self.tolerance, self.iterations)),
            SolverKind::Cg => Box::new(PcgSolver::new(self.tolerance, self.iterations)),
            SolverKind::JacobiPcg => {
                Box::new(PcgSolver::new(self.tolerance, self.iterations).with_jacobi())
            }
        }
    }
}

/// How per-face and per-cell coefficients are evaluated during assembly.
///
/// Both strategies accumulate into the matrix in the same order, so the
/// assembled systems are bit-identical; `Parallel` only spreads the
/// coefficient evaluation over the rayon pool. Without the `rayon` feature
/// it behaves like `Serial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccumulationStrategy {
    #[default]
    Serial,
    Parallel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SparseMatrix;

    #[test]
    fn every_kind_builds_a_working_solver() {
        let mut a = SparseMatrix::new(2);
        a.add_at_diagonal(&[2.0, 2.0]);
        a.add_at(0, 1, -1.0);
        a.add_at(1, 0, -1.0);
        for kind in [SolverKind::Lu, SolverKind::Cg, SolverKind::JacobiPcg] {
            let mut solver = SolverOptions::new(kind).with_tolerance(1e-12).build();
            let mut x = vec![0.0; 2];
            let stats = solver.solve(&a, &[1.0, 1.0][..], &mut x[..]).unwrap();
            assert!(stats.converged, "{kind:?}");
            assert!((x[0] - 1.0).abs() < 1e-9 && (x[1] - 1.0).abs() < 1e-9, "{kind:?}: {x:?}");
        }
    }
}
