//! Properties of assembled systems and the solvers that consume them.

use std::sync::Arc;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use fvkit::{
    AccumulationStrategy, AssemblyContext, BoundaryCondition, BoundaryConditions, CellTerm,
    ConvectionScheme, ConvectionTerm, DiffusionTerm, Grid2D, LinearLuSolver, LinearSolver, Mesh,
    PcgSolver, Sides, Term,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_grid(rng: &mut StdRng) -> Grid2D {
    Grid2D::new(rng.gen_range(0.1..2.0), rng.gen_range(0.1..2.0), rng.gen_range(1..12), rng.gen_range(1..12))
}

#[test]
fn insulated_diffusion_conserves_on_random_grids() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..25 {
        let mesh: Arc<dyn Mesh> = Arc::new(random_grid(&mut rng));
        let gamma: Vec<f64> = (0..mesh.num_faces()).map(|_| rng.gen_range(0.1..10.0)).collect();
        let term = DiffusionTerm::new(mesh.clone(), gamma).unwrap();
        let old = vec![0.0; mesh.num_cells()];
        let bcs = BoundaryConditions::new();
        let sys = term.build_matrix(&AssemblyContext::new(&old, 1.0, &bcs)).unwrap();
        for i in 0..mesh.num_cells() {
            let sum: f64 = sys.matrix.row(i).map(|(_, v)| v).sum();
            assert_abs_diff_eq!(sum, 0.0, epsilon = 1e-9 * sys.matrix.get(i, i).max(1.0));
        }
    }
}

#[test]
fn boundary_flux_sums_into_the_rhs() {
    let grid = Grid2D::new(0.5, 0.25, 4, 3);
    let flux = 2.0;
    let faces = grid.faces(Sides::TOP | Sides::RIGHT);
    let area: f64 = 4.0 * 0.5 + 3.0 * 0.25;
    let mesh: Arc<dyn Mesh> = Arc::new(grid);
    let bcs = BoundaryConditions::new().with(BoundaryCondition::fixed_flux(faces, flux));
    let term = DiffusionTerm::new(mesh.clone(), 3.0).unwrap();
    let old = vec![0.0; mesh.num_cells()];
    let sys = term.build_matrix(&AssemblyContext::new(&old, 1.0, &bcs)).unwrap();
    assert_relative_eq!(sys.rhs.iter().sum::<f64>(), -flux * area, epsilon = 1e-12);
}

#[test]
fn lu_refinement_converges_on_a_reaction_diffusion_system() {
    let grid = Grid2D::new(0.1, 0.1, 8, 8);
    let bcs = BoundaryConditions::new().with(BoundaryCondition::fixed_value(grid.faces(Sides::all()), 1.0));
    let mesh: Arc<dyn Mesh> = Arc::new(grid);
    let terms: Vec<Term> = vec![
        DiffusionTerm::new(mesh.clone(), 1.0).unwrap().into(),
        CellTerm::implicit_source(mesh.clone(), 5.0).unwrap().into(),
        CellTerm::source(mesh.clone(), 2.0).unwrap().into(),
    ];
    let old = vec![0.0; mesh.num_cells()];
    let ctx = AssemblyContext::new(&old, 1.0, &bcs);
    let mut system = fvkit::LinearSystem::new(mesh.num_cells());
    for term in &terms {
        system.accumulate(&term.build_matrix(&ctx).unwrap());
    }

    let mut x_lu = vec![0.0; mesh.num_cells()];
    let stats = LinearLuSolver::default().solve(&system.matrix, &system.rhs[..], &mut x_lu[..]).unwrap();
    assert!(stats.converged);
    assert!(stats.iterations <= 10);
    assert!(stats.final_residual < 1e-10);

    let mut x_cg = vec![0.0; mesh.num_cells()];
    let stats = PcgSolver::new(1e-12, 500)
        .with_jacobi()
        .solve(&system.matrix, &system.rhs[..], &mut x_cg[..])
        .unwrap();
    assert!(stats.converged);
    for (a, b) in x_lu.iter().zip(&x_cg) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }
}

#[test]
fn upwind_convection_diffusion_stays_bounded() {
    // strong flow to the right: the solution must stay between the inlet
    // and outlet values with no overshoot
    let grid = Grid2D::line(0.05, 20);
    let bcs = BoundaryConditions::new()
        .with(BoundaryCondition::fixed_value(grid.faces(Sides::LEFT), 1.0))
        .with(BoundaryCondition::fixed_value(grid.faces(Sides::RIGHT), 0.0));
    let mesh: Arc<dyn Mesh> = Arc::new(grid);
    let terms: Vec<Term> = vec![
        DiffusionTerm::new(mesh.clone(), 0.01).unwrap().into(),
        ConvectionTerm::new(mesh.clone(), [1.0, 0.0], ConvectionScheme::Upwind).unwrap().into(),
    ];
    let old = vec![0.0; 20];
    let ctx = AssemblyContext::new(&old, 1.0, &bcs).with_strategy(AccumulationStrategy::Parallel);
    let mut system = fvkit::LinearSystem::new(20);
    for term in &terms {
        system.accumulate(&term.build_matrix(&ctx).unwrap());
    }
    let mut x = vec![0.0; 20];
    let stats = LinearLuSolver::default().solve(&system.matrix, &system.rhs[..], &mut x[..]).unwrap();
    assert!(stats.converged);
    assert!(x.iter().all(|&v| (-1e-12..=1.0 + 1e-12).contains(&v)));
    assert!(x.windows(2).all(|w| w[1] <= w[0] + 1e-12));
}
