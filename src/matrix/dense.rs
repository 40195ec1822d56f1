//! Dense view of an assembled system on top of Faer, used by the direct solvers.

use faer::Mat;

use crate::matrix::SparseMatrix;

impl SparseMatrix {
    /// Copy into a dense Faer matrix.
    pub fn to_dense(&self) -> Mat<f64> {
        let n = self.size();
        let mut dense = Mat::<f64>::zeros(n, n);
        for i in 0..n {
            for (j, v) in self.row(i) {
                dense[(i, j)] = v;
            }
        }
        dense
    }
}
