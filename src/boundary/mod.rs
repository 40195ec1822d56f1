//! Boundary conditions attached to exterior faces.
//!
//! A condition binds a set of exterior faces to either a fixed value
//! (Dirichlet) or a fixed outward flux density (Neumann). Faces covered by
//! no condition behave as zero-flux boundaries.

use std::collections::HashMap;

use crate::error::{FvError, Result};
use crate::mesh::Mesh;

#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryCondition {
    /// Prescribed value on the faces.
    FixedValue { faces: Vec<usize>, value: f64 },
    /// Prescribed outward flux density `-Γ ∇φ · n` on the faces.
    FixedFlux { faces: Vec<usize>, flux: f64 },
}

impl BoundaryCondition {
    pub fn fixed_value(faces: impl Into<Vec<usize>>, value: f64) -> Self {
        Self::FixedValue { faces: faces.into(), value }
    }

    pub fn fixed_flux(faces: impl Into<Vec<usize>>, flux: f64) -> Self {
        Self::FixedFlux { faces: faces.into(), flux }
    }

    pub fn faces(&self) -> &[usize] {
        match self {
            Self::FixedValue { faces, .. } | Self::FixedFlux { faces, .. } => faces,
        }
    }
}

/// The boundary conditions of one equation / variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryConditions {
    conditions: Vec<BoundaryCondition>,
    /// Face to the index of the last condition covering it.
    by_face: HashMap<usize, usize>,
}

impl BoundaryConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, condition: BoundaryCondition) -> Self {
        self.push(condition);
        self
    }

    pub fn push(&mut self, condition: BoundaryCondition) {
        let index = self.conditions.len();
        for &face in condition.faces() {
            self.by_face.insert(face, index);
        }
        self.conditions.push(condition);
    }

    /// Fixed values passed through `normalize`, e.g. wrapped onto the
    /// canonical branch of an angle field.
    pub(crate) fn normalized(mut self, normalize: impl Fn(f64) -> f64) -> Self {
        for condition in &mut self.conditions {
            if let BoundaryCondition::FixedValue { value, .. } = condition {
                *value = normalize(*value);
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundaryCondition> {
        self.conditions.iter()
    }

    /// The condition covering `face`; when several do, the last added wins.
    pub fn lookup(&self, face: usize) -> Option<&BoundaryCondition> {
        self.by_face.get(&face).map(|&i| &self.conditions[i])
    }

    /// Fixed value on `face`, if a Dirichlet condition covers it.
    pub fn fixed_value(&self, face: usize) -> Option<f64> {
        match self.lookup(face) {
            Some(BoundaryCondition::FixedValue { value, .. }) => Some(*value),
            _ => None,
        }
    }

    /// Check that every referenced face exists and lies on the boundary.
    pub fn validate(&self, mesh: &dyn Mesh) -> Result<()> {
        for &face in self.conditions.iter().flat_map(BoundaryCondition::faces) {
            if face >= mesh.num_faces() {
                return Err(FvError::IndexOutOfRange { index: face, len: mesh.num_faces() });
            }
            if !mesh.is_exterior(face) {
                return Err(FvError::NotExteriorFace(face));
            }
        }
        Ok(())
    }
}

impl FromIterator<BoundaryCondition> for BoundaryConditions {
    fn from_iter<I: IntoIterator<Item = BoundaryCondition>>(iter: I) -> Self {
        let mut conditions = Self::new();
        for condition in iter {
            conditions.push(condition);
        }
        conditions
    }
}
