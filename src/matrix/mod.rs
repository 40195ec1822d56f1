//! Matrix module: the sparse accumulation matrix and its dense view.

pub mod dense;
pub mod sparse;

pub use sparse::{LinearSystem, SparseMatrix};
