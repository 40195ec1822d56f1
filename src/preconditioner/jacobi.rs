// Jacobi preconditioner implementation

use crate::error::FvError;
use crate::matrix::SparseMatrix;
use crate::preconditioner::Preconditioner;

/// Jacobi preconditioner: M⁻¹ = D⁻¹
#[derive(Debug, Clone, Default)]
pub struct Jacobi {
    pub(crate) inv_diag: Vec<f64>,
}

impl Jacobi {
    /// new with empty state; user must call `setup`.
    pub fn new() -> Self {
        Self { inv_diag: Vec::new() }
    }
}

impl Preconditioner<SparseMatrix, [f64]> for Jacobi {
    fn setup(&mut self, a: &SparseMatrix) -> Result<(), FvError> {
        self.inv_diag = a
            .diagonal()
            .into_iter()
            .enumerate()
            .map(|(i, d)| if d != 0.0 { Ok(1.0 / d) } else { Err(FvError::ZeroPivot(i)) })
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) -> Result<(), FvError> {
        if x.len() != self.inv_diag.len() {
            return Err(FvError::DimensionMismatch { expected: self.inv_diag.len(), actual: x.len() });
        }
        for ((yi, xi), d) in y.iter_mut().zip(x).zip(&self.inv_diag) {
            *yi = d * xi;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_inverse_diagonal() {
        let mut a = SparseMatrix::new(2);
        a.add_at_diagonal(&[2.0, 4.0]);
        a.add_at(0, 1, 7.0);
        let mut pc = Jacobi::new();
        pc.setup(&a).unwrap();
        let mut z = [0.0; 2];
        pc.apply(&[1.0, 1.0][..], &mut z[..]).unwrap();
        assert_eq!(z, [0.5, 0.25]);
    }

    #[test]
    fn zero_diagonal_is_a_zero_pivot() {
        let mut a = SparseMatrix::new(2);
        a.add_at(0, 0, 1.0);
        a.add_at(1, 0, 1.0);
        assert_eq!(Jacobi::new().setup(&a), Err(FvError::ZeroPivot(1)));
    }
}
