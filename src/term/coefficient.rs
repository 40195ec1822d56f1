//! Physical coefficients: one value everywhere, or one per cell / face.

use crate::error::{FvError, Result};
use crate::mesh::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub enum Coefficient {
    Uniform(f64),
    Field(Vec<f64>),
}

impl Coefficient {
    pub fn at(&self, i: usize) -> f64 {
        match self {
            Self::Uniform(c) => *c,
            Self::Field(values) => values[i],
        }
    }

    /// A field coefficient must have exactly `len` entries.
    pub(crate) fn check_len(&self, len: usize) -> Result<()> {
        match self {
            Self::Field(values) if values.len() != len => {
                Err(FvError::DimensionMismatch { expected: len, actual: values.len() })
            }
            _ => Ok(()),
        }
    }
}

impl From<f64> for Coefficient {
    fn from(c: f64) -> Self {
        Self::Uniform(c)
    }
}

impl From<Vec<f64>> for Coefficient {
    fn from(values: Vec<f64>) -> Self {
        Self::Field(values)
    }
}

/// Convective velocity, uniform or given on every face.
#[derive(Debug, Clone, PartialEq)]
pub enum Velocity {
    Uniform(Vec2),
    Faces(Vec<Vec2>),
}

impl Velocity {
    pub fn at(&self, face: usize) -> Vec2 {
        match self {
            Self::Uniform(u) => *u,
            Self::Faces(values) => values[face],
        }
    }

    pub(crate) fn check_len(&self, len: usize) -> Result<()> {
        match self {
            Self::Faces(values) if values.len() != len => {
                Err(FvError::DimensionMismatch { expected: len, actual: values.len() })
            }
            _ => Ok(()),
        }
    }
}

impl From<Vec2> for Velocity {
    fn from(u: Vec2) -> Self {
        Self::Uniform(u)
    }
}

impl From<Vec<Vec2>> for Velocity {
    fn from(values: Vec<Vec2>) -> Self {
        Self::Faces(values)
    }
}
