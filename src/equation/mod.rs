//! An equation: a variable, the terms acting on it, and the solver that
//! advances it.
//!
//! [`Equation::sweep`] assembles every term into one [`LinearSystem`] with
//! the current values as the previous time level, solves it warm-started
//! from those values, and writes the solution back into the variable.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::boundary::BoundaryConditions;
use crate::config::{AccumulationStrategy, SolverOptions};
use crate::core::traits::InnerProduct;
use crate::error::{FvError, Result};
use crate::matrix::LinearSystem;
use crate::mesh::{Mesh, same_mesh};
use crate::solver::BoxedSolver;
use crate::term::{AssemblyContext, CellTerm, Coefficient, DiffusionTerm, Term};
use crate::utils::convergence::SolveStats;
use crate::variable::{CellVariable, Domain, Linear};

/// Outcome of one assemble-and-solve pass over an equation.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    pub equation: String,
    pub stats: SolveStats<f64>,
    /// ‖A·x − b‖₂ of the solution before it was written back.
    pub residual: f64,
}

/// Anything the iterator can advance by one step.
pub trait Sweep {
    fn name(&self) -> &str;
    /// Assemble the system for a step of length `dt` at the current values.
    fn assemble(&self, dt: f64) -> Result<LinearSystem>;
    /// Solve `system` and store the solution.
    fn solve_system(&mut self, system: &LinearSystem) -> Result<SweepReport>;

    fn sweep(&mut self, dt: f64) -> Result<SweepReport> {
        let system = self.assemble(dt)?;
        self.solve_system(&system)
    }
}

pub struct Equation<D: Domain = Linear> {
    var: CellVariable<D>,
    terms: Vec<Term>,
    solver: BoxedSolver,
    coeff_scale: f64,
    var_scale: f64,
    strategy: AccumulationStrategy,
}

impl<D: Domain> Equation<D> {
    /// Attaches `boundary` to `var` after checking it against the mesh.
    pub fn new(
        mut var: CellVariable<D>,
        terms: Vec<Term>,
        boundary: BoundaryConditions,
        solver: BoxedSolver,
    ) -> Result<Self> {
        for term in &terms {
            check_mesh(var.mesh(), term)?;
        }
        var.set_boundary_conditions(boundary)?;
        Ok(Self {
            var,
            terms,
            solver,
            coeff_scale: 1.0,
            var_scale: 1.0,
            strategy: AccumulationStrategy::default(),
        })
    }

    /// `transient·∂φ/∂t = ∇·(Γ∇φ)` with an LU solver configured by `options`.
    pub fn diffusion(
        var: CellVariable<D>,
        transient: impl Into<Coefficient>,
        gamma: impl Into<Coefficient>,
        boundary: BoundaryConditions,
        options: SolverOptions,
    ) -> Result<Self> {
        let mesh = var.mesh().clone();
        let terms = vec![
            CellTerm::transient(mesh.clone(), transient)?.into(),
            DiffusionTerm::new(mesh, gamma)?.into(),
        ];
        Self::new(var, terms, boundary, options.build())
    }

    /// # Panics
    /// Panics unless both scales are positive and finite.
    pub fn with_scales(mut self, coeff_scale: f64, var_scale: f64) -> Self {
        assert!(
            coeff_scale > 0.0 && coeff_scale.is_finite() && var_scale > 0.0 && var_scale.is_finite(),
            "scales must be positive and finite"
        );
        self.coeff_scale = coeff_scale;
        self.var_scale = var_scale;
        self
    }

    pub fn with_strategy(mut self, strategy: AccumulationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_solver(mut self, solver: BoxedSolver) -> Self {
        self.solver = solver;
        self
    }

    pub fn variable(&self) -> &CellVariable<D> {
        &self.var
    }

    pub fn variable_mut(&mut self) -> &mut CellVariable<D> {
        &mut self.var
    }

    pub fn into_variable(self) -> CellVariable<D> {
        self.var
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn push_term(&mut self, term: impl Into<Term>) -> Result<()> {
        let term = term.into();
        check_mesh(self.var.mesh(), &term)?;
        self.terms.push(term);
        Ok(())
    }

    pub fn mesh(&self) -> &Arc<dyn Mesh> {
        self.var.mesh()
    }

    pub fn strategy(&self) -> AccumulationStrategy {
        self.strategy
    }

    /// Sum of every term's contribution.
    pub fn build_matrix(&self, dt: f64) -> Result<LinearSystem> {
        let ctx = AssemblyContext::new(self.var.value(), dt, self.var.boundary_conditions())
            .with_scales(self.coeff_scale, self.var_scale)
            .with_strategy(self.strategy);
        let mut system = LinearSystem::new(self.var.mesh().num_cells());
        for term in &self.terms {
            system.accumulate(&term.build_matrix(&ctx)?);
        }
        Ok(system)
    }

    /// ‖A·x − b‖₂ of the system for `dt` at the current values.
    pub fn residual(&self, dt: f64) -> Result<f64> {
        let system = self.build_matrix(dt)?;
        Ok(().norm(system.residual(self.var.value()).as_slice()))
    }
}

impl<D: Domain> Sweep for Equation<D> {
    fn name(&self) -> &str {
        self.var.name()
    }

    fn assemble(&self, dt: f64) -> Result<LinearSystem> {
        self.build_matrix(dt)
    }

    fn solve_system(&mut self, system: &LinearSystem) -> Result<SweepReport> {
        let mut x = self.var.value().to_vec();
        let stats = self.solver.solve(&system.matrix, &system.rhs[..], &mut x[..])?;
        let residual = ().norm(system.residual(&x).as_slice());
        self.var.set_value(&x)?;
        if stats.converged {
            debug!(
                "{}: solved in {} iterations, residual {:e}",
                self.var.name(),
                stats.iterations,
                residual
            );
        } else {
            warn!(
                "{}: solver stopped after {} iterations without converging (residual {:e})",
                self.var.name(),
                stats.iterations,
                residual
            );
        }
        Ok(SweepReport { equation: self.var.name().to_string(), stats, residual })
    }
}

impl<D: Domain> fmt::Debug for Equation<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equation")
            .field("var", &self.var)
            .field("terms", &self.terms)
            .field("coeff_scale", &self.coeff_scale)
            .field("var_scale", &self.var_scale)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

fn check_mesh(mesh: &Arc<dyn Mesh>, term: &Term) -> Result<()> {
    if !same_mesh(mesh, term.mesh()) {
        return Err(FvError::MeshMismatch("term is defined on another mesh"));
    }
    Ok(())
}
