//! Quintic Hermite interpolation over the unit interval

use nalgebra::{Matrix3, Vector3};

use crate::autodiff::{CurveParam, DualNum};
use crate::geometry::Vector2Dual;
use crate::paths::PositionPath;

/// Quintic polynomial over t in [0, 1] matching value, first, and second
/// derivative at both endpoints.
#[derive(Debug, Clone, Copy)]
pub struct QuinticPolynomial {
    a0: f64,
    a1: f64,
    a2: f64,
    a3: f64,
    a4: f64,
    a5: f64,
}

impl QuinticPolynomial {
    /// Fits the unique quintic to the endpoint triples `(value, d1, d2)`
    /// given as dual numbers of length at least 3.
    pub fn new(begin: DualNum<CurveParam>, end: DualNum<CurveParam>) -> Self {
        assert!(begin.len() >= 3 && end.len() >= 3);

        let a0 = begin.value();
        let a1 = begin[1];
        let a2 = 0.5 * begin[2];

        // remaining coefficients solve
        //   [1  1  1] [a3]   [x(1) - a0 - a1 - a2]
        //   [3  4  5] [a4] = [x'(1) - a1 - 2 a2 ]
        //   [6 12 20] [a5]   [x''(1) - 2 a2     ]
        let a = Matrix3::new(1.0, 1.0, 1.0, 3.0, 4.0, 5.0, 6.0, 12.0, 20.0);
        let b = Vector3::new(
            end.value() - a0 - a1 - a2,
            end[1] - a1 - 2.0 * a2,
            end[2] - 2.0 * a2,
        );
        let det = a.determinant();

        let solve_col = |i: usize| {
            let mut m = a;
            m.set_column(i, &b);
            m.determinant() / det
        };

        Self {
            a0,
            a1,
            a2,
            a3: solve_col(0),
            a4: solve_col(1),
            a5: solve_col(2),
        }
    }

    /// Evaluates the polynomial and up to three derivatives at `t`.
    pub fn get(&self, t: f64, n: usize) -> DualNum<CurveParam> {
        assert!(n <= 4);
        let mut values = [0.0; 4];
        if n >= 1 {
            values[0] = self.a0
                + t * (self.a1 + t * (self.a2 + t * (self.a3 + t * (self.a4 + t * self.a5))));
        }
        if n >= 2 {
            values[1] = self.a1
                + t * (2.0 * self.a2
                    + t * (3.0 * self.a3 + t * (4.0 * self.a4 + t * 5.0 * self.a5)));
        }
        if n >= 3 {
            values[2] =
                2.0 * self.a2 + t * (6.0 * self.a3 + t * (12.0 * self.a4 + t * 20.0 * self.a5));
        }
        if n >= 4 {
            values[3] = 6.0 * self.a3 + t * (24.0 * self.a4 + t * 60.0 * self.a5);
        }
        DualNum::new(&values[..n])
    }
}

/// Planar curve with quintic coordinate polynomials over t in [0, 1]
#[derive(Debug, Clone, Copy)]
pub struct QuinticSpline2 {
    pub x: QuinticPolynomial,
    pub y: QuinticPolynomial,
}

impl QuinticSpline2 {
    pub fn new(begin: Vector2Dual<CurveParam>, end: Vector2Dual<CurveParam>) -> Self {
        Self {
            x: QuinticPolynomial::new(begin.x, end.x),
            y: QuinticPolynomial::new(begin.y, end.y),
        }
    }
}

impl PositionPath<CurveParam> for QuinticSpline2 {
    fn length(&self) -> f64 {
        1.0
    }

    fn get(&self, t: f64, n: usize) -> Vector2Dual<CurveParam> {
        Vector2Dual::new(self.x.get(t, n), self.y.get(t, n))
    }
}
