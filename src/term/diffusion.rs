//! Two-point flux diffusion `∇·(Γ∇φ)`, written on the left-hand side as
//! `−∇·(Γ∇φ)` so the assembled matrix is an M-matrix.

use std::sync::Arc;

use log::trace;

use crate::boundary::BoundaryCondition;
use crate::error::Result;
use crate::matrix::LinearSystem;
use crate::mesh::Mesh;
use crate::parallel::map_indexed;
use crate::term::AssemblyContext;
use crate::term::coefficient::Coefficient;

/// Diffusion with a face coefficient `Γ`.
#[derive(Debug, Clone)]
pub struct DiffusionTerm {
    mesh: Arc<dyn Mesh>,
    coeff: Coefficient,
}

impl DiffusionTerm {
    /// `coeff` is uniform or given on every face.
    pub fn new(mesh: Arc<dyn Mesh>, coeff: impl Into<Coefficient>) -> Result<Self> {
        let coeff = coeff.into();
        coeff.check_len(mesh.num_faces())?;
        Ok(Self { mesh, coeff })
    }

    pub fn mesh(&self) -> &Arc<dyn Mesh> {
        &self.mesh
    }

    pub fn coefficient(&self) -> &Coefficient {
        &self.coeff
    }

    pub fn build_matrix(&self, ctx: &AssemblyContext<'_>) -> Result<LinearSystem> {
        let mesh = &*self.mesh;
        let n = mesh.num_cells();
        ctx.check_old(n)?;
        let s = ctx.scale();
        // Γ·A/d per face, d being center-to-face on the boundary
        let conductance = map_indexed(ctx.strategy, mesh.num_faces(), |f| {
            self.coeff.at(f) * mesh.face_area(f) / mesh.cell_distance(f) / s
        });

        let mut system = LinearSystem::new(n);
        for &f in mesh.interior_faces() {
            let cells = mesh.face_cells(f);
            let (p, q) = match cells.second {
                Some(q) => (cells.first, q),
                None => continue,
            };
            let c = conductance[f];
            system.matrix.add_at(p, p, c);
            system.matrix.add_at(q, q, c);
            system.matrix.add_at(p, q, -c);
            system.matrix.add_at(q, p, -c);
        }
        for &f in mesh.exterior_faces() {
            let p = mesh.face_cells(f).first;
            match ctx.boundary.lookup(f) {
                Some(BoundaryCondition::FixedValue { value, .. }) => {
                    let c = conductance[f];
                    system.matrix.add_at(p, p, c);
                    system.rhs[p] += c * value;
                }
                // outward flux density leaves the cell
                Some(BoundaryCondition::FixedFlux { flux, .. }) => {
                    system.rhs[p] -= flux * mesh.face_area(f) / s;
                }
                None => {}
            }
        }
        trace!("diffusion: {} cells, {} nonzeros", n, system.matrix.nnz());
        Ok(system)
    }
}
