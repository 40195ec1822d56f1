//! Non-periodic view of a modular variable.

use std::rc::Rc;

use crate::mesh::Vec2;
use crate::variable::domain::Linear;
use crate::variable::memo::Memo;
use crate::variable::{ModularVariable, derived};

/// Reads a [`ModularVariable`] as if it were an ordinary field: face values
/// are plain averages and gradients use raw differences, with no correction
/// across the branch cut. The view borrows the variable; its caches live as
/// long as the view and are keyed on the variable's version.
#[derive(Debug)]
pub struct NoModular<'a> {
    var: &'a ModularVariable,
    face_value: Memo<Vec<f64>>,
    grad: Memo<Vec<Vec2>>,
    face_grad: Memo<Vec<Vec2>>,
}

impl<'a> NoModular<'a> {
    pub fn new(var: &'a ModularVariable) -> Self {
        Self { var, face_value: Memo::new(), grad: Memo::new(), face_grad: Memo::new() }
    }

    pub fn inner(&self) -> &'a ModularVariable {
        self.var
    }

    pub fn value(&self) -> &'a [f64] {
        self.var.value()
    }

    pub fn face_value(&self) -> Rc<Vec<f64>> {
        self.face_value.get_or_compute(self.var.version(), || {
            derived::face_values::<Linear>(
                self.var.mesh().as_ref(),
                self.var.value(),
                self.var.boundary_conditions(),
            )
        })
    }

    pub fn grad(&self) -> Rc<Vec<Vec2>> {
        self.grad.get_or_compute(self.var.version(), || {
            let faces = self.face_value();
            derived::cell_grads::<Linear>(self.var.mesh().as_ref(), self.var.value(), &faces)
        })
    }

    pub fn face_grad(&self) -> Rc<Vec<Vec2>> {
        self.face_grad.get_or_compute(self.var.version(), || {
            let grads = self.grad();
            derived::face_grads::<Linear>(
                self.var.mesh().as_ref(),
                self.var.value(),
                self.var.boundary_conditions(),
                &grads,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Grid2D, Mesh};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;
    use std::sync::Arc;

    #[test]
    fn view_uses_plain_averages() {
        let mesh: Arc<dyn Mesh> = Arc::new(Grid2D::new(1.0, 1.0, 2, 1));
        let theta = ModularVariable::from_values(mesh, vec![2.0 * PI / 3.0, -2.0 * PI / 3.0]).unwrap();
        let plain = theta.no_modular();
        let interior = theta.mesh().interior_faces()[0];
        assert_abs_diff_eq!(plain.face_value()[interior], 0.0, epsilon = 1e-12);
        assert_eq!(plain.value(), theta.value());
        assert!(std::ptr::eq(plain.inner(), &theta));
    }
}
