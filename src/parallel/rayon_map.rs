// rayon-based coefficient evaluation

use rayon::prelude::*;

/// Threads available to the global rayon pool.
pub fn workers() -> usize {
    rayon::current_num_threads().min(num_cpus::get()).max(1)
}

/// Order-preserving parallel map over `0..n`.
pub fn par_map<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..n).into_par_iter().map(f).collect()
}
