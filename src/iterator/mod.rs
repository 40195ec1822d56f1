//! Drives one or more equations through a number of time steps.
//!
//! Every step sweeps each equation once, in order, so later equations see
//! the values earlier ones just solved for (Picard coupling). The
//! [`EquationIterator`] records where it is in this cycle as an
//! [`IteratorState`]; when a step fails, the state tells which phase it
//! failed in.

use log::{debug, warn};

use crate::equation::{Sweep, SweepReport};
use crate::error::Result;

/// Default hard ceiling on the total number of steps.
pub const DEFAULT_MAX_STEPS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IteratorState {
    #[default]
    Idle,
    Assembling,
    Solving,
    /// Every solver converged in the last step.
    Converged,
    /// Some solver exhausted its budget, or the step ceiling was hit.
    MaxIterationsReached,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    /// Steps performed by this call.
    pub steps: usize,
    /// Requested steps were cut short by the step ceiling.
    pub truncated: bool,
    pub state: IteratorState,
    /// One report per equation for the last step performed.
    pub last_sweep: Vec<SweepReport>,
}

impl IterationReport {
    pub fn converged(&self) -> bool {
        self.state == IteratorState::Converged
    }
}

pub struct EquationIterator<'a> {
    equations: Vec<&'a mut dyn Sweep>,
    max_steps: usize,
    steps_taken: usize,
    state: IteratorState,
}

impl<'a> EquationIterator<'a> {
    pub fn new(equations: Vec<&'a mut dyn Sweep>) -> Self {
        Self { equations, max_steps: DEFAULT_MAX_STEPS, steps_taken: 0, state: IteratorState::Idle }
    }

    /// Total number of steps this iterator will ever perform.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn state(&self) -> IteratorState {
        self.state
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Advance every equation by `steps` steps of length `dt`.
    ///
    /// Solver errors abort the call at once, leaving the state at the phase
    /// that failed.
    pub fn iterate(&mut self, steps: usize, dt: f64) -> Result<IterationReport> {
        let allowed = self.max_steps.saturating_sub(self.steps_taken);
        let truncated = steps > allowed;
        let steps = steps.min(allowed);
        let mut last_sweep = Vec::with_capacity(self.equations.len());

        for step in 0..steps {
            last_sweep.clear();
            for eq in self.equations.iter_mut() {
                self.state = IteratorState::Assembling;
                let system = eq.assemble(dt)?;
                self.state = IteratorState::Solving;
                last_sweep.push(eq.solve_system(&system)?);
            }
            self.steps_taken += 1;
            self.state = if last_sweep.iter().all(|r| r.stats.converged) {
                IteratorState::Converged
            } else {
                IteratorState::MaxIterationsReached
            };
            debug!("step {} of {}: {:?}", step + 1, steps, self.state);
        }

        if truncated {
            warn!("step ceiling of {} reached after {} steps", self.max_steps, self.steps_taken);
            self.state = IteratorState::MaxIterationsReached;
        }
        Ok(IterationReport { steps, truncated, state: self.state, last_sweep })
    }
}
