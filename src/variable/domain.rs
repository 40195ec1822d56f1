//! Value domains of a cell variable: the ordinary real line or the circle.

use std::f64::consts::PI;
use std::fmt::Debug;

const TWO_PI: f64 = 2.0 * PI;

/// Maps any angle onto the canonical range `[-π, π)`.
pub fn wrap(angle: f64) -> f64 {
    let mut w = angle - TWO_PI * ((angle + PI) / TWO_PI).floor();
    // floor() can land one ulp on the wrong side of the cut
    if w >= PI {
        w -= TWO_PI;
    } else if w < -PI {
        w += TWO_PI;
    }
    w
}

/// Arithmetic that differs between ordinary and periodic fields.
pub trait Domain: Copy + Default + Debug + Send + Sync + 'static {
    /// Whether values live on a circle of period 2π.
    const PERIODIC: bool;

    /// Bring a value into the canonical range of the domain.
    fn normalize(value: f64) -> f64;

    /// `to − from`; the shortest signed arc on a periodic domain.
    fn difference(to: f64, from: f64) -> f64;

    /// Value a fraction `ratio` of the way from `from` towards `to`.
    fn interpolate(from: f64, to: f64, ratio: f64) -> f64 {
        Self::normalize(from + ratio * Self::difference(to, from))
    }

    /// `value` re-expressed on the branch closest to `anchor`, so that
    /// `relative_to(v, a) - a` never jumps by a full period.
    fn relative_to(value: f64, anchor: f64) -> f64 {
        anchor + Self::difference(value, anchor)
    }
}

/// Ordinary real-valued field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

/// Angle-valued field with period 2π and canonical range `[-π, π)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modular;

impl Domain for Linear {
    const PERIODIC: bool = false;

    fn normalize(value: f64) -> f64 {
        value
    }

    fn difference(to: f64, from: f64) -> f64 {
        to - from
    }
}

impl Domain for Modular {
    const PERIODIC: bool = true;

    fn normalize(value: f64) -> f64 {
        wrap(value)
    }

    fn difference(to: f64, from: f64) -> f64 {
        wrap(to - from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::Rng;

    #[test]
    fn wrap_lands_in_canonical_range() {
        assert_eq!(wrap(PI), -PI);
        assert_eq!(wrap(-PI), -PI);
        assert_abs_diff_eq!(wrap(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap(5.0 * PI / 2.0), PI / 2.0, epsilon = 1e-12);
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let x: f64 = rng.gen_range(-100.0..100.0);
            let w = wrap(x);
            assert!((-PI..PI).contains(&w), "wrap({x}) = {w}");
            let turns = (x - w) / TWO_PI;
            assert_abs_diff_eq!(turns, turns.round(), epsilon = 1e-9);
        }
    }

    #[test]
    fn modular_difference_is_shortest_arc() {
        assert_abs_diff_eq!(
            Modular::difference(2.0 * PI / 3.0, -2.0 * PI / 3.0),
            -2.0 * PI / 3.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(Linear::difference(1.0, 3.0), -2.0);
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let a: f64 = rng.gen_range(-PI..PI);
            let b: f64 = rng.gen_range(-PI..PI);
            assert!(Modular::difference(a, b).abs() <= PI);
        }
    }

    #[test]
    fn interpolation_crosses_the_branch_cut() {
        let mid = Modular::interpolate(3.0 * PI / 4.0, -3.0 * PI / 4.0, 0.5);
        assert!((-PI..PI).contains(&mid));
        assert_abs_diff_eq!(Modular::difference(mid, -PI), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Linear::interpolate(3.0 * PI / 4.0, -3.0 * PI / 4.0, 0.5), 0.0);
        assert_abs_diff_eq!(Modular::relative_to(-PI, 2.0 * PI / 3.0), PI, epsilon = 1e-12);
    }
}
