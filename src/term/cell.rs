//! Terms that act cell by cell: transient, explicit and implicit sources.

use std::sync::Arc;

use crate::error::{FvError, Result};
use crate::matrix::LinearSystem;
use crate::mesh::Mesh;
use crate::parallel::map_indexed;
use crate::term::AssemblyContext;
use crate::term::coefficient::Coefficient;

/// How a cell coefficient enters the system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellWeight {
    /// Implicit, time-step independent: matrix diagonal.
    pub diagonal: f64,
    /// Previous time level: right-hand side, divided by `dt`.
    pub old_value: f64,
    /// Explicit: right-hand side.
    pub b_vector: f64,
    /// New time level: matrix diagonal, divided by `dt`.
    pub new_value: f64,
}

impl CellWeight {
    /// Implicit Euler `c·(φ − φ_old)/dt`.
    pub const TRANSIENT: Self = Self { diagonal: 0.0, old_value: 1.0, b_vector: 0.0, new_value: 1.0 };
    /// Explicit source `S`.
    pub const SOURCE: Self = Self { diagonal: 0.0, old_value: 0.0, b_vector: 1.0, new_value: 0.0 };
    /// Implicit linear sink `k·φ`.
    pub const IMPLICIT_SOURCE: Self = Self { diagonal: 1.0, old_value: 0.0, b_vector: 0.0, new_value: 0.0 };
}

/// Volume-integrated cell contribution with four coefficient fields.
#[derive(Debug, Clone)]
pub struct CellTerm {
    mesh: Arc<dyn Mesh>,
    diag_coeff: Vec<f64>,
    old_coeff: Vec<f64>,
    b_coeff: Vec<f64>,
    new_coeff: Vec<f64>,
}

impl CellTerm {
    /// Coefficients are `coeff · volume · weight` per cell.
    pub fn new(mesh: Arc<dyn Mesh>, coeff: impl Into<Coefficient>, weight: CellWeight) -> Result<Self> {
        let coeff = coeff.into();
        let n = mesh.num_cells();
        coeff.check_len(n)?;
        let integrated: Vec<f64> = (0..n).map(|c| coeff.at(c) * mesh.cell_volume(c)).collect();
        let scaled = |w: f64| integrated.iter().map(|c| c * w).collect::<Vec<_>>();
        Ok(Self {
            diag_coeff: scaled(weight.diagonal),
            old_coeff: scaled(weight.old_value),
            b_coeff: scaled(weight.b_vector),
            new_coeff: scaled(weight.new_value),
            mesh,
        })
    }

    pub fn transient(mesh: Arc<dyn Mesh>, coeff: impl Into<Coefficient>) -> Result<Self> {
        Self::new(mesh, coeff, CellWeight::TRANSIENT)
    }

    pub fn source(mesh: Arc<dyn Mesh>, coeff: impl Into<Coefficient>) -> Result<Self> {
        Self::new(mesh, coeff, CellWeight::SOURCE)
    }

    pub fn implicit_source(mesh: Arc<dyn Mesh>, coeff: impl Into<Coefficient>) -> Result<Self> {
        Self::new(mesh, coeff, CellWeight::IMPLICIT_SOURCE)
    }

    pub fn mesh(&self) -> &Arc<dyn Mesh> {
        &self.mesh
    }

    fn is_transient(&self) -> bool {
        self.new_coeff.iter().chain(&self.old_coeff).any(|&c| c != 0.0)
    }

    /// diag += new/(s·dt) + diag/s, rhs += old·φ_old/(s·v·dt) + b/s with
    /// `v = var_scale` and `s = coeff_scale · v`: the previous time level is
    /// stored unscaled, so it carries the variable scale once more.
    pub fn build_matrix(&self, ctx: &AssemblyContext<'_>) -> Result<LinearSystem> {
        let n = self.mesh.num_cells();
        ctx.check_old(n)?;
        let inv_dt = if self.is_transient() {
            if !(ctx.dt > 0.0 && ctx.dt.is_finite()) {
                return Err(FvError::InvalidTimeStep(ctx.dt));
            }
            1.0 / ctx.dt
        } else {
            0.0
        };
        let s = ctx.scale();
        let entries = map_indexed(ctx.strategy, n, |i| {
            let diag = self.new_coeff[i] * inv_dt / s + self.diag_coeff[i] / s;
            let rhs = ctx.old[i] * self.old_coeff[i] * inv_dt / (s * ctx.var_scale) + self.b_coeff[i] / s;
            (diag, rhs)
        });
        let mut system = LinearSystem::new(n);
        let diag: Vec<f64> = entries.iter().map(|e| e.0).collect();
        system.matrix.add_at_diagonal(&diag);
        for (b, e) in system.rhs.iter_mut().zip(&entries) {
            *b += e.1;
        }
        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryConditions;
    use crate::mesh::Grid2D;
    use crate::term::AssemblyContext;
    use approx::assert_abs_diff_eq;

    fn mesh() -> Arc<dyn Mesh> {
        Arc::new(Grid2D::new(0.5, 2.0, 3, 1))
    }

    #[test]
    fn transient_term_is_implicit_euler() {
        let term = CellTerm::transient(mesh(), 2.0).unwrap();
        let bcs = BoundaryConditions::new();
        let old = [1.0, 2.0, 3.0];
        let ctx = AssemblyContext::new(&old, 0.5, &bcs);
        let sys = term.build_matrix(&ctx).unwrap();
        // coeff · volume / dt = 2 · 1 / 0.5
        for i in 0..3 {
            assert_abs_diff_eq!(sys.matrix.get(i, i), 4.0, epsilon = 1e-12);
            assert_abs_diff_eq!(sys.rhs[i], 4.0 * old[i], epsilon = 1e-12);
        }
        assert_eq!(sys.matrix.nnz(), 3);
    }

    #[test]
    fn sources_and_scaling() {
        let bcs = BoundaryConditions::new();
        let old = [0.0; 3];
        let ctx = AssemblyContext::new(&old, 1.0, &bcs).with_scales(2.0, 5.0);
        let source = CellTerm::source(mesh(), vec![1.0, 2.0, 3.0]).unwrap().build_matrix(&ctx).unwrap();
        assert_abs_diff_eq!(source.rhs[2], 3.0 / 10.0, epsilon = 1e-12);
        assert_eq!(source.matrix.get(2, 2), 0.0);
        let sink = CellTerm::implicit_source(mesh(), 4.0).unwrap().build_matrix(&ctx).unwrap();
        assert_abs_diff_eq!(sink.matrix.get(1, 1), 4.0 / 10.0, epsilon = 1e-12);
        assert_eq!(sink.rhs, vec![0.0; 3]);
    }

    #[test]
    fn old_values_carry_the_variable_scale_twice() {
        let mesh: Arc<dyn Mesh> = Arc::new(Grid2D::line(1.0, 1));
        let term = CellTerm::transient(mesh, 1.0).unwrap();
        let bcs = BoundaryConditions::new();
        let old = [1.0];
        let sys = term
            .build_matrix(&AssemblyContext::new(&old, 1.0, &bcs).with_scales(1.0, 2.0))
            .unwrap();
        assert_abs_diff_eq!(sys.matrix.get(0, 0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sys.rhs[0], 0.25, epsilon = 1e-12);

        let sys = term
            .build_matrix(&AssemblyContext::new(&old, 0.5, &bcs).with_scales(3.0, 2.0))
            .unwrap();
        // 1 / (6 · 0.5) and 1 / (6 · 2 · 0.5)
        assert_abs_diff_eq!(sys.matrix.get(0, 0), 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sys.rhs[0], 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn transient_term_needs_a_positive_time_step() {
        let term = CellTerm::transient(mesh(), 1.0).unwrap();
        let bcs = BoundaryConditions::new();
        let old = [0.0; 3];
        let err = term.build_matrix(&AssemblyContext::new(&old, 0.0, &bcs)).unwrap_err();
        assert_eq!(err, FvError::InvalidTimeStep(0.0));
        // a source never looks at dt
        let source = CellTerm::source(mesh(), 1.0).unwrap();
        assert!(source.build_matrix(&AssemblyContext::new(&old, 0.0, &bcs)).is_ok());
    }

    #[test]
    fn zero_transient_coefficient_contributes_nothing() {
        let term = CellTerm::transient(mesh(), 0.0).unwrap();
        let bcs = BoundaryConditions::new();
        let old = [1.0; 3];
        let sys = term.build_matrix(&AssemblyContext::new(&old, 0.0, &bcs)).unwrap();
        assert_eq!(sys.matrix.diagonal(), vec![0.0; 3]);
        assert_eq!(sys.rhs, vec![0.0; 3]);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(CellTerm::source(mesh(), vec![1.0; 2]).is_err());
        let term = CellTerm::transient(mesh(), 1.0).unwrap();
        let bcs = BoundaryConditions::new();
        let old = [0.0; 2];
        let err = term.build_matrix(&AssemblyContext::new(&old, 1.0, &bcs)).unwrap_err();
        assert_eq!(err, FvError::DimensionMismatch { expected: 3, actual: 2 });
    }
}
