//! Preconditioners for the iterative solvers.

use crate::error::FvError;

/// A preconditioner M ≈ A⁻¹.
pub trait Preconditioner<M: ?Sized, V: ?Sized> {
    /// Apply M⁻¹ to r, writing z = M⁻¹ r
    fn apply(&self, r: &V, z: &mut V) -> Result<(), FvError>;
    /// Optionally: setup/factorize from A
    fn setup(&mut self, _a: &M) -> Result<(), FvError> {
        Ok(())
    }
}

pub mod jacobi;

pub use jacobi::Jacobi;
