//! Version-keyed memoization of derived field quantities.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Caches one derived value together with the version of the data it was
/// computed from. A lookup with a different version recomputes.
pub struct Memo<T> {
    slot: RefCell<Option<(u64, Rc<T>)>>,
    evaluations: Cell<usize>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self { slot: RefCell::new(None), evaluations: Cell::new(0) }
    }

    pub fn get_or_compute(&self, version: u64, compute: impl FnOnce() -> T) -> Rc<T> {
        if let Some((cached, value)) = self.slot.borrow().as_ref() {
            if *cached == version {
                return Rc::clone(value);
            }
        }
        let value = Rc::new(compute());
        self.evaluations.set(self.evaluations.get() + 1);
        *self.slot.borrow_mut() = Some((version, Rc::clone(&value)));
        value
    }

    /// How many times the value has been computed.
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

// A clone starts cold; it shares nothing with the original.
impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("cached_version", &self.slot.borrow().as_ref().map(|(v, _)| *v))
            .field("evaluations", &self.evaluations.get())
            .finish()
    }
}
