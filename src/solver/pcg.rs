//! Preconditioned Conjugate Gradient (PCG) per Saad §9.2
//!
//! For the symmetric systems produced by diffusion and transient terms.
//! The initial guess is whatever `x` holds on entry, so warm starts from
//! the previous time step are free.

use log::trace;

use crate::core::traits::{InnerProduct, MatVec};
use crate::error::FvError;
use crate::matrix::SparseMatrix;
use crate::preconditioner::{Jacobi, Preconditioner};
use crate::solver::{LinearSolver, check_system};
use crate::utils::convergence::{Convergence, SolveStats};

pub struct PcgSolver {
    pub conv: Convergence<f64>,
    pub pc: Option<Box<dyn Preconditioner<SparseMatrix, [f64]>>>,
    pub monitor: Option<Box<dyn FnMut(usize, f64)>>,
    pub residual_history: Vec<f64>,
}

impl PcgSolver {
    pub fn new(tol: f64, max_iters: usize) -> Self {
        Self {
            conv: Convergence { tol, max_iters },
            pc: None,
            monitor: None,
            residual_history: Vec::new(),
        }
    }

    pub fn with_preconditioner<P>(mut self, pc: P) -> Self
    where
        P: Preconditioner<SparseMatrix, [f64]> + 'static,
    {
        self.pc = Some(Box::new(pc));
        self
    }

    pub fn with_jacobi(self) -> Self {
        self.with_preconditioner(Jacobi::new())
    }

    pub fn with_monitor<F>(mut self, f: F) -> Self
    where
        F: FnMut(usize, f64) + 'static,
    {
        self.monitor = Some(Box::new(f));
        self
    }

    pub fn clear_history(&mut self) {
        self.residual_history.clear();
    }

    fn record(&mut self, i: usize, res_norm: f64) {
        if let Some(ref mut monitor) = self.monitor {
            monitor(i, res_norm);
        }
        self.residual_history.push(res_norm);
    }

    fn precondition(&self, r: &[f64], z: &mut [f64]) -> Result<(), FvError> {
        match &self.pc {
            Some(pc) => pc.apply(r, z),
            None => {
                z.copy_from_slice(r);
                Ok(())
            }
        }
    }
}

impl LinearSolver<SparseMatrix, [f64]> for PcgSolver {
    type Error = FvError;
    type Scalar = f64;

    fn solve(&mut self, a: &SparseMatrix, b: &[f64], x: &mut [f64]) -> Result<SolveStats<f64>, FvError> {
        check_system(a, b, x)?;
        if let Some(pc) = self.pc.as_mut() {
            pc.setup(a)?;
        }
        let n = b.len();
        let ip = ();
        let mut r = vec![0.0; n];
        a.matvec(&*x, r.as_mut_slice());
        for (ri, bi) in r.iter_mut().zip(b) {
            *ri = bi - *ri;
        }
        let mut z = vec![0.0; n];
        self.precondition(&r, &mut z)?;
        let mut p = z.clone();
        let mut rz = ip.dot(r.as_slice(), z.as_slice());
        let res0 = ip.norm(r.as_slice());
        self.record(0, res0);
        let mut stats = SolveStats { iterations: 0, final_residual: res0, converged: false };
        if res0 == 0.0 {
            stats.converged = true;
            return Ok(stats);
        }

        let mut ap = vec![0.0; n];
        for i in 0..self.conv.max_iters {
            a.matvec(p.as_slice(), ap.as_mut_slice());
            let p_dot_ap = ip.dot(p.as_slice(), ap.as_slice());
            // Indefinite-matrix detection
            if p_dot_ap <= 0.0 {
                return Err(FvError::IndefiniteMatrix);
            }
            let alpha = rz / p_dot_ap;
            for (xj, pj) in x.iter_mut().zip(&p) {
                *xj += alpha * pj;
            }
            for (rj, apj) in r.iter_mut().zip(&ap) {
                *rj -= alpha * apj;
            }
            self.precondition(&r, &mut z)?;
            let rz_new = ip.dot(r.as_slice(), z.as_slice());
            let res_norm = ip.norm(r.as_slice());
            self.record(i + 1, res_norm);
            let (stop, s) = self.conv.check(res_norm, res0, i + 1);
            stats = s;
            if stop {
                break;
            }
            let beta = rz_new / rz;
            for (pj, zj) in p.iter_mut().zip(&z) {
                *pj = zj + beta * *pj;
            }
            rz = rz_new;
        }
        trace!("PCG finished after {} iterations, residual {:e}", stats.iterations, stats.final_residual);
        Ok(stats)
    }
}
