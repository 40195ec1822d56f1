//! Face interpolation and gradient reconstruction for cell-centred fields.

use crate::boundary::BoundaryConditions;
use crate::mesh::{Mesh, Vec2, dot};
use crate::variable::domain::Domain;

/// Interior faces interpolate between their two cells; exterior faces
/// take the fixed boundary value when one is attached, else the cell value.
pub(crate) fn face_values<D: Domain>(
    mesh: &dyn Mesh,
    values: &[f64],
    boundary: &BoundaryConditions,
) -> Vec<f64> {
    (0..mesh.num_faces())
        .map(|face| {
            let cells = mesh.face_cells(face);
            let p = values[cells.first];
            match cells.second {
                Some(n) => D::interpolate(p, values[n], mesh.face_to_cell_distance_ratio(face)),
                None => boundary.fixed_value(face).unwrap_or(p),
            }
        })
        .collect()
}

/// Face field from an arbitrary function of the two adjacent cell values.
/// Exterior faces see their single cell on both sides.
pub(crate) fn face_values_by(
    mesh: &dyn Mesh,
    values: &[f64],
    f: impl Fn(f64, f64) -> f64,
) -> Vec<f64> {
    (0..mesh.num_faces())
        .map(|face| {
            let cells = mesh.face_cells(face);
            let p = values[cells.first];
            f(p, cells.second.map_or(p, |n| values[n]))
        })
        .collect()
}

/// Green-Gauss cell gradients, `Σ v_f A_f n_f / V`.
///
/// Each face value is taken on the branch nearest the owning cell's value,
/// so periodic fields do not pick up a full period across the cut.
pub(crate) fn cell_grads<D: Domain>(mesh: &dyn Mesh, values: &[f64], faces: &[f64]) -> Vec<Vec2> {
    let mut grad = vec![[0.0; 2]; mesh.num_cells()];
    for face in 0..mesh.num_faces() {
        let cells = mesh.face_cells(face);
        let area = mesh.face_area(face);
        let [nx, ny] = mesh.face_normal(face);
        let p = cells.first;
        let vp = D::relative_to(faces[face], values[p]);
        grad[p][0] += vp * area * nx;
        grad[p][1] += vp * area * ny;
        if let Some(n) = cells.second {
            let vn = D::relative_to(faces[face], values[n]);
            grad[n][0] -= vn * area * nx;
            grad[n][1] -= vn * area * ny;
        }
    }
    for (cell, g) in grad.iter_mut().enumerate() {
        let volume = mesh.cell_volume(cell);
        g[0] /= volume;
        g[1] /= volume;
    }
    grad
}

/// Face gradients: the normal derivative across the face plus the
/// tangential component of the averaged neighbouring cell gradients.
pub(crate) fn face_grads<D: Domain>(
    mesh: &dyn Mesh,
    values: &[f64],
    boundary: &BoundaryConditions,
    cell_grads: &[Vec2],
) -> Vec<Vec2> {
    (0..mesh.num_faces())
        .map(|face| {
            let cells = mesh.face_cells(face);
            let p = cells.first;
            let n = cells.second.unwrap_or(p);
            let normal_derivative = match cells.second {
                Some(n) => D::difference(values[n], values[p]) / mesh.cell_distance(face),
                None => boundary
                    .fixed_value(face)
                    .map_or(0.0, |v| D::difference(v, values[p]) / mesh.cell_distance(face)),
            };
            let normal = mesh.face_normal(face);
            let tangent = mesh.face_tangent(face);
            let tangential = 0.5 * (dot(tangent, cell_grads[p]) + dot(tangent, cell_grads[n]));
            [
                normal[0] * normal_derivative + tangent[0] * tangential,
                normal[1] * normal_derivative + tangent[1] * tangential,
            ]
        })
        .collect()
}
