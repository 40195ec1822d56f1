//! Convection `∇·(uφ)` with upwind or central face interpolation.

use std::sync::Arc;

use crate::boundary::BoundaryCondition;
use crate::error::Result;
use crate::matrix::LinearSystem;
use crate::mesh::{Mesh, dot};
use crate::parallel::map_indexed;
use crate::term::AssemblyContext;
use crate::term::coefficient::Velocity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvectionScheme {
    /// Face value taken from the cell the flow comes from.
    #[default]
    Upwind,
    /// Distance-weighted mean of the two cells.
    Central,
}

#[derive(Debug, Clone)]
pub struct ConvectionTerm {
    mesh: Arc<dyn Mesh>,
    velocity: Velocity,
    scheme: ConvectionScheme,
}

impl ConvectionTerm {
    pub fn new(mesh: Arc<dyn Mesh>, velocity: impl Into<Velocity>, scheme: ConvectionScheme) -> Result<Self> {
        let velocity = velocity.into();
        velocity.check_len(mesh.num_faces())?;
        Ok(Self { mesh, velocity, scheme })
    }

    pub fn mesh(&self) -> &Arc<dyn Mesh> {
        &self.mesh
    }

    pub fn scheme(&self) -> ConvectionScheme {
        self.scheme
    }

    /// Face flux `F = (u·n)·A` is positive from the first cell to the second,
    /// and outward on the boundary.
    pub fn build_matrix(&self, ctx: &AssemblyContext<'_>) -> Result<LinearSystem> {
        let mesh = &*self.mesh;
        let n = mesh.num_cells();
        ctx.check_old(n)?;
        let s = ctx.scale();
        let flux = map_indexed(ctx.strategy, mesh.num_faces(), |f| {
            dot(self.velocity.at(f), mesh.face_normal(f)) * mesh.face_area(f) / s
        });

        let mut system = LinearSystem::new(n);
        for &f in mesh.interior_faces() {
            let cells = mesh.face_cells(f);
            let (p, q) = match cells.second {
                Some(q) => (cells.first, q),
                None => continue,
            };
            let flow = flux[f];
            // weight of the second cell in the face value
            let alpha = match self.scheme {
                ConvectionScheme::Upwind if flow >= 0.0 => 0.0,
                ConvectionScheme::Upwind => 1.0,
                ConvectionScheme::Central => mesh.face_to_cell_distance_ratio(f),
            };
            // F·φ_f leaves p and enters q
            system.matrix.add_at(p, p, flow * (1.0 - alpha));
            system.matrix.add_at(p, q, flow * alpha);
            system.matrix.add_at(q, p, -flow * (1.0 - alpha));
            system.matrix.add_at(q, q, -flow * alpha);
        }
        for &f in mesh.exterior_faces() {
            let p = mesh.face_cells(f).first;
            let flow = flux[f];
            match (ctx.boundary.lookup(f), self.scheme) {
                (Some(BoundaryCondition::FixedValue { value, .. }), ConvectionScheme::Central) => {
                    system.rhs[p] -= flow * value;
                }
                (Some(BoundaryCondition::FixedValue { value, .. }), ConvectionScheme::Upwind) if flow < 0.0 => {
                    system.rhs[p] -= flow * value;
                }
                // outflow, or no prescribed value: face carries the cell value
                _ => system.matrix.add_at(p, p, flow),
            }
        }
        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryConditions;
    use crate::mesh::{Grid2D, Sides};
    use approx::assert_abs_diff_eq;

    fn line(nx: usize) -> (Grid2D, Arc<dyn Mesh>) {
        let grid = Grid2D::line(1.0, nx);
        (grid.clone(), Arc::new(grid))
    }

    #[test]
    fn upwind_follows_the_flow() {
        let (_, mesh) = line(3);
        let term = ConvectionTerm::new(mesh, [2.0, 0.0], ConvectionScheme::Upwind).unwrap();
        let bcs = BoundaryConditions::new();
        let old = [0.0; 3];
        let sys = term.build_matrix(&AssemblyContext::new(&old, 1.0, &bcs)).unwrap();
        // each cell sends 2φ_i downstream and receives 2φ_{i-1}
        assert_abs_diff_eq!(sys.matrix.get(1, 1), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sys.matrix.get(1, 0), -2.0, epsilon = 1e-12);
        assert_eq!(sys.matrix.get(1, 2), 0.0);
        // the left face is inflow with the cell value: -2 + 2
        assert_abs_diff_eq!(sys.matrix.get(0, 0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sys.matrix.get(2, 2), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn reversed_flow_mirrors_upwind_entries() {
        let (_, mesh) = line(2);
        let term = ConvectionTerm::new(mesh, [-1.0, 0.0], ConvectionScheme::Upwind).unwrap();
        let bcs = BoundaryConditions::new();
        let old = [0.0; 2];
        let sys = term.build_matrix(&AssemblyContext::new(&old, 1.0, &bcs)).unwrap();
        assert_abs_diff_eq!(sys.matrix.get(0, 1), -1.0, epsilon = 1e-12);
        assert_eq!(sys.matrix.get(1, 0), 0.0);
    }

    #[test]
    fn inflow_value_goes_to_rhs() {
        let (grid, mesh) = line(2);
        let bcs = BoundaryConditions::new()
            .with(BoundaryCondition::fixed_value(grid.faces(Sides::LEFT), 5.0))
            .with(BoundaryCondition::fixed_value(grid.faces(Sides::RIGHT), 7.0));
        let term = ConvectionTerm::new(mesh, [1.0, 0.0], ConvectionScheme::Upwind).unwrap();
        let old = [0.0; 2];
        let sys = term.build_matrix(&AssemblyContext::new(&old, 1.0, &bcs)).unwrap();
        assert_abs_diff_eq!(sys.rhs[0], 5.0, epsilon = 1e-12);
        // outflow face ignores its prescribed value
        assert_eq!(sys.rhs[1], 0.0);
        assert_abs_diff_eq!(sys.matrix.get(1, 1), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn central_scheme_splits_the_face_value() {
        let (_, mesh) = line(2);
        let term = ConvectionTerm::new(mesh, [1.0, 0.0], ConvectionScheme::Central).unwrap();
        let bcs = BoundaryConditions::new();
        let old = [0.0; 2];
        let sys = term.build_matrix(&AssemblyContext::new(&old, 1.0, &bcs)).unwrap();
        assert_abs_diff_eq!(sys.matrix.get(0, 1), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sys.matrix.get(1, 0), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn columns_conserve_without_boundary_flow() {
        // flow along y never crosses the left and right faces
        let mesh: Arc<dyn Mesh> = Arc::new(Grid2D::new(1.0, 1.0, 3, 3));
        let term = ConvectionTerm::new(mesh.clone(), [0.0, 1.5], ConvectionScheme::Upwind).unwrap();
        let bcs = BoundaryConditions::new();
        let old = vec![0.0; 9];
        let sys = term.build_matrix(&AssemblyContext::new(&old, 1.0, &bcs)).unwrap();
        // inflow at the bottom balances outflow at the top
        let total: f64 = (0..9).flat_map(|i| sys.matrix.row(i).collect::<Vec<_>>()).map(|(_, v)| v).sum();
        assert_abs_diff_eq!(total, 0.0, epsilon = 1e-12);
    }
}
