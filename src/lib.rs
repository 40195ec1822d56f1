//! fvkit: finite-volume term assembly and iteration over Faer
//!
//! This crate discretizes conservation equations on cell-centred meshes:
//! cell variables (including angle-valued, modular ones) with lazily derived
//! face values and gradients, transient / source / diffusion / convection
//! terms assembled into sparse linear systems, pluggable linear solvers, and
//! an iterator that advances coupled equations step by step.

pub mod parallel;

pub mod boundary;
pub mod config;
pub mod core;
pub mod equation;
pub mod error;
pub mod iterator;
pub mod matrix;
pub mod mesh;
pub mod preconditioner;
pub mod solver;
pub mod term;
pub mod utils;
pub mod variable;

// Re-exports for convenience
pub use crate::boundary::{BoundaryCondition, BoundaryConditions};
pub use crate::config::{AccumulationStrategy, SolverKind, SolverOptions};
pub use crate::equation::{Equation, Sweep, SweepReport};
pub use crate::error::{FvError, Result};
pub use crate::iterator::{EquationIterator, IterationReport, IteratorState};
pub use crate::matrix::{LinearSystem, SparseMatrix};
pub use crate::mesh::{FaceCells, Grid2D, Mesh, Sides, Vec2};
pub use crate::preconditioner::{Jacobi, Preconditioner};
pub use crate::solver::{BoxedSolver, LinearLuSolver, LinearSolver, PcgSolver};
pub use crate::term::{
    AssemblyContext, CellTerm, CellWeight, Coefficient, ConvectionScheme, ConvectionTerm,
    DiffusionTerm, Term, Velocity,
};
pub use crate::variable::{CellVariable, Domain, Linear, Modular, ModularVariable, NoModular};

// Re-export SolveStats at the crate root for convenience
pub use crate::utils::convergence::SolveStats;
