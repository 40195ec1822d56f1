//! Backends for evaluating per-face and per-cell coefficients.
//!
//! Each coefficient depends only on its own index, so the parallel path
//! produces exactly the values of the serial path in the same order.

use crate::config::AccumulationStrategy;

#[cfg(feature = "rayon")]
pub mod rayon_map;

/// Below this many items per worker the rayon path is not worth it.
#[cfg(feature = "rayon")]
const MIN_ITEMS_PER_WORKER: usize = 256;

/// `(0..n).map(f).collect()` on the backend chosen by `strategy`.
pub fn map_indexed<T, F>(strategy: AccumulationStrategy, n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    match strategy {
        #[cfg(feature = "rayon")]
        AccumulationStrategy::Parallel if n >= MIN_ITEMS_PER_WORKER * rayon_map::workers() => {
            rayon_map::par_map(n, f)
        }
        _ => (0..n).map(f).collect(),
    }
}
