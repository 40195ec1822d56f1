//! Discretized terms of a conservation equation.
//!
//! Every term turns itself into a [`LinearSystem`] contribution over the
//! cells of its mesh. An equation sums the contributions of its terms.

use std::sync::Arc;

use crate::boundary::BoundaryConditions;
use crate::config::AccumulationStrategy;
use crate::error::{FvError, Result};
use crate::matrix::LinearSystem;
use crate::mesh::Mesh;

pub mod cell;
pub mod coefficient;
pub mod convection;
pub mod diffusion;

pub use cell::{CellTerm, CellWeight};
pub use coefficient::{Coefficient, Velocity};
pub use convection::{ConvectionScheme, ConvectionTerm};
pub use diffusion::DiffusionTerm;

/// Everything a term needs besides itself to assemble.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyContext<'a> {
    /// Values at the previous time level.
    pub old: &'a [f64],
    pub dt: f64,
    pub boundary: &'a BoundaryConditions,
    pub coeff_scale: f64,
    pub var_scale: f64,
    pub strategy: AccumulationStrategy,
}

impl<'a> AssemblyContext<'a> {
    pub fn new(old: &'a [f64], dt: f64, boundary: &'a BoundaryConditions) -> Self {
        Self {
            old,
            dt,
            boundary,
            coeff_scale: 1.0,
            var_scale: 1.0,
            strategy: AccumulationStrategy::default(),
        }
    }

    pub fn with_scales(mut self, coeff_scale: f64, var_scale: f64) -> Self {
        self.coeff_scale = coeff_scale;
        self.var_scale = var_scale;
        self
    }

    pub fn with_strategy(mut self, strategy: AccumulationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Every contribution is divided by this.
    pub fn scale(&self) -> f64 {
        self.coeff_scale * self.var_scale
    }

    pub(crate) fn check_old(&self, num_cells: usize) -> Result<()> {
        if self.old.len() != num_cells {
            return Err(FvError::DimensionMismatch { expected: num_cells, actual: self.old.len() });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Term {
    Cell(CellTerm),
    Diffusion(DiffusionTerm),
    Convection(ConvectionTerm),
}

impl Term {
    pub fn mesh(&self) -> &Arc<dyn Mesh> {
        match self {
            Term::Cell(t) => t.mesh(),
            Term::Diffusion(t) => t.mesh(),
            Term::Convection(t) => t.mesh(),
        }
    }

    pub fn build_matrix(&self, ctx: &AssemblyContext<'_>) -> Result<LinearSystem> {
        match self {
            Term::Cell(t) => t.build_matrix(ctx),
            Term::Diffusion(t) => t.build_matrix(ctx),
            Term::Convection(t) => t.build_matrix(ctx),
        }
    }
}

impl From<CellTerm> for Term {
    fn from(t: CellTerm) -> Self {
        Term::Cell(t)
    }
}

impl From<DiffusionTerm> for Term {
    fn from(t: DiffusionTerm) -> Self {
        Term::Diffusion(t)
    }
}

impl From<ConvectionTerm> for Term {
    fn from(t: ConvectionTerm) -> Self {
        Term::Convection(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Grid2D;
    use approx::assert_abs_diff_eq;

    #[test]
    fn strategies_assemble_the_same_system() {
        let mesh: Arc<dyn Mesh> = Arc::new(Grid2D::new(0.1, 0.2, 120, 90));
        let n = mesh.num_cells();
        let gamma: Vec<f64> = (0..mesh.num_faces()).map(|f| 1.0 + (f % 7) as f64).collect();
        let terms: Vec<Term> = vec![
            DiffusionTerm::new(mesh.clone(), gamma).unwrap().into(),
            ConvectionTerm::new(mesh.clone(), [0.3, -0.7], ConvectionScheme::Central).unwrap().into(),
            CellTerm::transient(mesh.clone(), 2.0).unwrap().into(),
        ];
        let old: Vec<f64> = (0..n).map(|i| (i as f64).cos()).collect();
        let bcs = BoundaryConditions::new();
        let serial = AssemblyContext::new(&old, 0.1, &bcs);
        let parallel = serial.with_strategy(AccumulationStrategy::Parallel);
        for term in &terms {
            assert_eq!(term.build_matrix(&serial).unwrap(), term.build_matrix(&parallel).unwrap());
        }
    }

    #[test]
    fn terms_report_their_mesh() {
        let mesh: Arc<dyn Mesh> = Arc::new(Grid2D::line(1.0, 4));
        let term: Term = DiffusionTerm::new(mesh.clone(), 1.0).unwrap().into();
        assert!(crate::mesh::same_mesh(term.mesh(), &mesh));
    }

    #[test]
    fn scaling_divides_every_contribution() {
        let mesh: Arc<dyn Mesh> = Arc::new(Grid2D::line(1.0, 3));
        let term: Term = DiffusionTerm::new(mesh, 4.0).unwrap().into();
        let bcs = BoundaryConditions::new();
        let old = [0.0; 3];
        let plain = term.build_matrix(&AssemblyContext::new(&old, 1.0, &bcs)).unwrap();
        let scaled = term
            .build_matrix(&AssemblyContext::new(&old, 1.0, &bcs).with_scales(2.0, 2.0))
            .unwrap();
        for i in 0..3 {
            for (j, v) in plain.matrix.row(i) {
                assert_abs_diff_eq!(scaled.matrix.get(i, j), v / 4.0, epsilon = 1e-12);
            }
        }
    }
}
