//! Configuration: solver selection and assembly strategy.

pub mod options;

pub use options::{AccumulationStrategy, SolverKind, SolverOptions};
