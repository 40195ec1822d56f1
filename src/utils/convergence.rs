//! Convergence tracking & tolerance checks for iterative solvers.

/// Stopping criteria & stats.
#[derive(Debug, Clone, Copy)]
pub struct Convergence<T> {
    pub tol: T,
    pub max_iters: usize,
}

/// Outcome of one linear solve.
///
/// `converged == false` is not an error: the solution vector still holds
/// the best estimate reached within the iteration budget.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveStats<T> {
    pub iterations: usize,
    pub final_residual: T,
    pub converged: bool,
}

impl<T: Copy + num_traits::Float> Convergence<T> {
    /// Returns (should_stop, stats) given current `res_norm` and iteration `i`.
    ///
    /// The tolerance is relative to `res0_norm`; a zero initial residual
    /// counts as converged.
    pub fn check(&self, res_norm: T, res0_norm: T, i: usize) -> (bool, SolveStats<T>) {
        let converged = if res0_norm == T::zero() {
            true
        } else {
            res_norm / res0_norm <= self.tol
        };
        (
            converged || i >= self.max_iters,
            SolveStats { iterations: i, final_residual: res_norm, converged },
        )
    }
}
