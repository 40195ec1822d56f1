//! Cell-centred field storage with lazily derived face and gradient fields.
//!
//! A [`CellVariable`] owns one value per mesh cell. Its derived quantities
//! ([`face_value`](CellVariable::face_value), [`grad`](CellVariable::grad),
//! [`face_grad`](CellVariable::face_grad)) are computed on first request and
//! memoized against a version counter that every mutation bumps, so repeated
//! reads between mutations cost nothing.
//!
//! The value domain is a type parameter: [`Linear`] for ordinary fields and
//! [`Modular`] for angles. [`ModularVariable`] keeps every value in
//! `[-π, π)` and uses shortest-arc arithmetic for interpolation,
//! differencing and subtraction; [`ModularVariable::no_modular`] gives a
//! view of the same values with ordinary arithmetic.

pub mod domain;
pub mod memo;
pub mod no_modular;
mod derived;

pub use domain::{Domain, Linear, Modular, wrap};
pub use memo::Memo;
pub use no_modular::NoModular;

use std::marker::PhantomData;
use std::ops::Sub;
use std::rc::Rc;
use std::sync::Arc;

use crate::boundary::BoundaryConditions;
use crate::error::{FvError, Result};
use crate::mesh::{Mesh, Vec2, same_mesh};

#[derive(Debug, Clone)]
pub struct CellVariable<D: Domain = Linear> {
    name: String,
    mesh: Arc<dyn Mesh>,
    value: Vec<f64>,
    boundary: BoundaryConditions,
    version: u64,
    face_value: Memo<Vec<f64>>,
    grad: Memo<Vec<Vec2>>,
    face_grad: Memo<Vec<Vec2>>,
    _domain: PhantomData<D>,
}

/// Angle-valued cell variable, canonical range `[-π, π)`.
pub type ModularVariable = CellVariable<Modular>;

impl<D: Domain> CellVariable<D> {
    /// Every cell set to `value`.
    pub fn new(mesh: Arc<dyn Mesh>, value: f64) -> Self {
        let n = mesh.num_cells();
        Self::build(mesh, vec![D::normalize(value); n])
    }

    /// One value per cell.
    pub fn from_values(mesh: Arc<dyn Mesh>, values: Vec<f64>) -> Result<Self> {
        check_len(mesh.num_cells(), values.len())?;
        Ok(Self::build(mesh, values.into_iter().map(D::normalize).collect()))
    }

    fn build(mesh: Arc<dyn Mesh>, value: Vec<f64>) -> Self {
        Self {
            name: String::new(),
            mesh,
            value,
            boundary: BoundaryConditions::default(),
            version: 0,
            face_value: Memo::new(),
            grad: Memo::new(),
            face_grad: Memo::new(),
            _domain: PhantomData,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &Arc<dyn Mesh> {
        &self.mesh
    }

    pub fn is_periodic(&self) -> bool {
        D::PERIODIC
    }

    /// Bumped by every mutation; derived caches are keyed on it.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn value(&self) -> &[f64] {
        &self.value
    }

    /// Overwrite every cell.
    pub fn set_value(&mut self, values: &[f64]) -> Result<()> {
        check_len(self.value.len(), values.len())?;
        for (dst, &src) in self.value.iter_mut().zip(values) {
            *dst = D::normalize(src);
        }
        self.touch();
        Ok(())
    }

    pub fn set_uniform(&mut self, value: f64) {
        self.value.fill(D::normalize(value));
        self.touch();
    }

    /// Overwrite the cells where `mask` is true.
    pub fn set_masked(&mut self, mask: &[bool], value: f64) -> Result<()> {
        check_len(self.value.len(), mask.len())?;
        let value = D::normalize(value);
        for (dst, _) in self.value.iter_mut().zip(mask).filter(|(_, m)| **m) {
            *dst = value;
        }
        self.touch();
        Ok(())
    }

    pub fn set_value_at(&mut self, cell: usize, value: f64) -> Result<()> {
        let len = self.value.len();
        let slot = self
            .value
            .get_mut(cell)
            .ok_or(FvError::IndexOutOfRange { index: cell, len })?;
        *slot = D::normalize(value);
        self.touch();
        Ok(())
    }

    /// Boundary conditions used for exterior face values and gradients.
    /// Fixed values are stored normalized into the variable's domain.
    pub fn set_boundary_conditions(&mut self, boundary: BoundaryConditions) -> Result<()> {
        boundary.validate(self.mesh.as_ref())?;
        self.boundary = boundary.normalized(D::normalize);
        self.touch();
        Ok(())
    }

    pub fn boundary_conditions(&self) -> &BoundaryConditions {
        &self.boundary
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    /// Values interpolated onto every face.
    pub fn face_value(&self) -> Rc<Vec<f64>> {
        self.face_value.get_or_compute(self.version, || {
            derived::face_values::<D>(self.mesh.as_ref(), &self.value, &self.boundary)
        })
    }

    /// Green-Gauss gradient in every cell.
    pub fn grad(&self) -> Rc<Vec<Vec2>> {
        self.grad.get_or_compute(self.version, || {
            let faces = self.face_value();
            derived::cell_grads::<D>(self.mesh.as_ref(), &self.value, &faces)
        })
    }

    /// Gradient on every face.
    pub fn face_grad(&self) -> Rc<Vec<Vec2>> {
        self.face_grad.get_or_compute(self.version, || {
            let grads = self.grad();
            derived::face_grads::<D>(self.mesh.as_ref(), &self.value, &self.boundary, &grads)
        })
    }

    /// Face field computed from the two neighbouring cell values by `f`,
    /// e.g. a harmonic mean for a diffusivity. Not cached.
    pub fn face_value_by(&self, f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        derived::face_values_by(self.mesh.as_ref(), &self.value, f)
    }

    /// How many times each derived quantity has been computed, as
    /// `(face value, grad, face grad)`.
    pub fn evaluations(&self) -> (usize, usize, usize) {
        (self.face_value.evaluations(), self.grad.evaluations(), self.face_grad.evaluations())
    }
}

impl ModularVariable {
    /// View of the same values with ordinary, non-periodic arithmetic.
    pub fn no_modular(&self) -> NoModular<'_> {
        NoModular::new(self)
    }
}

/// Cell-wise difference; shortest signed arc for modular variables.
///
/// # Panics
/// Panics if the operands live on different meshes.
impl<D: Domain> Sub for &CellVariable<D> {
    type Output = CellVariable<D>;

    fn sub(self, rhs: Self) -> CellVariable<D> {
        assert!(same_mesh(&self.mesh, &rhs.mesh), "cannot subtract variables on different meshes");
        let value = self
            .value
            .iter()
            .zip(&rhs.value)
            .map(|(&a, &b)| D::difference(a, b))
            .collect();
        CellVariable::build(Arc::clone(&self.mesh), value)
            .with_name(format!("{} - {}", self.name, rhs.name))
    }
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(FvError::DimensionMismatch { expected, actual })
    }
}
