//! Read-only mesh topology and geometry.
//!
//! Assembly and the derived variable quantities only ever talk to a mesh
//! through the [`Mesh`] trait; [`Grid2D`] is the structured implementation
//! shipped with the crate.

pub mod grid;

pub use grid::{Grid2D, Sides};

use std::sync::Arc;

/// A 2-component vector (gradients, normals, velocities).
pub type Vec2 = [f64; 2];

/// The cells on either side of a face. `second` is `None` on the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCells {
    pub first: usize,
    pub second: Option<usize>,
}

/// Topology and geometric coefficients of a finite-volume mesh.
///
/// Face normals point from `first` to `second`, and outward on exterior
/// faces. All quantities are immutable once the mesh is built.
pub trait Mesh: Send + Sync + std::fmt::Debug {
    fn num_cells(&self) -> usize;
    fn num_faces(&self) -> usize;
    /// Faces with two real neighbours.
    fn interior_faces(&self) -> &[usize];
    /// Faces on the domain boundary.
    fn exterior_faces(&self) -> &[usize];
    fn face_cells(&self, face: usize) -> FaceCells;
    fn face_area(&self, face: usize) -> f64;
    fn face_normal(&self, face: usize) -> Vec2;
    /// Centre-to-centre distance; centre-to-face on exterior faces.
    fn cell_distance(&self, face: usize) -> f64;
    /// Distance from the first cell's centre to the face over
    /// [`cell_distance`](Mesh::cell_distance); 1 on exterior faces.
    fn face_to_cell_distance_ratio(&self, face: usize) -> f64;
    fn cell_volume(&self, cell: usize) -> f64;
    fn cell_center(&self, cell: usize) -> Vec2;
    fn face_center(&self, face: usize) -> Vec2;

    fn is_exterior(&self, face: usize) -> bool {
        self.face_cells(face).second.is_none()
    }

    /// Unit tangent, the normal rotated a quarter turn counter-clockwise.
    fn face_tangent(&self, face: usize) -> Vec2 {
        let [nx, ny] = self.face_normal(face);
        [-ny, nx]
    }
}

/// Identity comparison of two shared meshes.
pub fn same_mesh(a: &Arc<dyn Mesh>, b: &Arc<dyn Mesh>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

pub(crate) fn dot(a: Vec2, b: Vec2) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}
