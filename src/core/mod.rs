//! Core traits and their implementations for slices and vectors.

pub mod traits;
pub mod wrappers;

pub use traits::{InnerProduct, MatVec};
