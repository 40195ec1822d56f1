//! Linear-algebra seams between assembled systems and the solvers.
//!
//! Solvers are generic over the operator and vector types they act on;
//! the crate implements both traits for [`SparseMatrix`](crate::matrix::SparseMatrix)
//! and `[f64]`.

/// Apply an operator: `y ← A·x`.
pub trait MatVec<V: ?Sized> {
    fn matvec(&self, x: &V, y: &mut V);
}

/// Reductions over solution vectors.
pub trait InnerProduct<V: ?Sized> {
    type Scalar: Copy + PartialOrd + From<f64>;
    fn dot(&self, x: &V, y: &V) -> Self::Scalar;
    /// Euclidean norm, `‖x‖₂`.
    fn norm(&self, x: &V) -> Self::Scalar;
}
