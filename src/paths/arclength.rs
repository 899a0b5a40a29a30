//! Arc-length reparameterization of an internally parameterized curve

use crate::autodiff::{Arclength, CurveParam, DualNum};
use crate::geometry::Vector2Dual;
use crate::math::{integral_scan, lerp_lookup, IntegralScan};
use crate::paths::PositionPath;

/// Wraps a curve parameterized by [`CurveParam`] and exposes it by arc
/// length, so unit-speed traversal holds to quadrature accuracy.
pub struct ArclengthReparamCurve2 {
    curve: Box<dyn PositionPath<CurveParam>>,
    samples: IntegralScan,
    length: f64,
}

impl ArclengthReparamCurve2 {
    /// Tabulates the arc length of `curve` by adaptive quadrature with
    /// tolerance `eps`.
    pub fn new(curve: impl PositionPath<CurveParam> + 'static, eps: f64) -> Self {
        let samples = integral_scan(0.0, curve.length(), eps, |t| {
            curve.get(t, 2).drop_first(1).value().norm()
        });
        let length = match samples.sums.last() {
            Some(&sum) => sum,
            None => 0.0,
        };
        Self {
            curve: Box::new(curve),
            samples,
            length,
        }
    }

    /// The internal parameter corresponding to arc length `s`.
    pub fn reparam(&self, s: f64) -> f64 {
        lerp_lookup(&self.samples.sums, &self.samples.values, s)
    }
}

impl PositionPath<Arclength> for ArclengthReparamCurve2 {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Vector2Dual<Arclength> {
        let t = self.reparam(s);
        let point = self.curve.get(t, n);

        // Derivatives of t with respect to s are recovered order by order:
        // dt/ds = 1 / |dc/dt|, and each higher derivative is the previous
        // order's chain-rule expansion of that same reciprocal norm.
        let mut t_values = vec![t];
        if n >= 2 {
            let t_derivs = point.drop_first(1);
            t_values.push(1.0 / t_derivs.value().norm());
            for order in 2..n {
                let t_dual = DualNum::<Arclength>::new(&t_values);
                let speed = t_derivs.reparam(t_dual).norm();
                t_values.push(speed.recip()[order - 1]);
            }
        }
        point.reparam(DualNum::new(&t_values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rotation2, Vector2};
    use crate::paths::QuinticSpline2;
    use rand::prelude::*;

    fn rand_spline(rng: &mut StdRng) -> ArclengthReparamCurve2 {
        let begin_pos = Vector2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let end_pos = Vector2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let dist = (end_pos - begin_pos).norm();
        let begin_tangent = Rotation2::exp(rng.gen_range(-3.0..3.0)).vec() * dist;
        let end_tangent = Rotation2::exp(rng.gen_range(-3.0..3.0)).vec() * dist;

        let spline = QuinticSpline2::new(
            Vector2Dual::new(
                DualNum::new(&[begin_pos.x, begin_tangent.x, 0.0]),
                DualNum::new(&[begin_pos.y, begin_tangent.y, 0.0]),
            ),
            Vector2Dual::new(
                DualNum::new(&[end_pos.x, end_tangent.x, 0.0]),
                DualNum::new(&[end_pos.y, end_tangent.y, 0.0]),
            ),
        );
        ArclengthReparamCurve2::new(spline, 1e-8)
    }

    #[test]
    fn test_unit_speed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let curve = rand_spline(&mut rng);
            for i in 0..50 {
                let s = curve.length() * (i as f64 + 0.5) / 50.0;
                let speed = curve.get(s, 2).drop_first(1).value().norm();
                assert!((speed - 1.0).abs() < 1e-3, "speed {} at s = {}", speed, s);
            }
        }
    }

    #[test]
    fn test_length_at_least_chord() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20 {
            let curve = rand_spline(&mut rng);
            let chord = (curve.end(1).value() - curve.begin(1).value()).norm();
            assert!(curve.length() >= chord - 1e-6);
        }
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        // the inverse-length lookup is piecewise linear, so difference
        // stencils straddling a quadrature knot see an amplified kink; a
        // few samples may miss the tight tolerance, but never by much
        let mut rng = StdRng::seed_from_u64(9);
        let mut checked = 0usize;
        let mut rough = 0usize;
        for _ in 0..25 {
            let curve = rand_spline(&mut rng);
            let h = 1e-5 * curve.length();
            for i in 0..40 {
                let s = curve.length() * (i as f64 + 0.5) / 40.0;
                if s - 2.0 * h <= 0.0 || s + 2.0 * h >= curve.length() {
                    continue;
                }

                let d = curve.get(s, 4);
                let plus = curve.get(s + h, 3);
                let minus = curve.get(s - h, 3);
                for k in 0..2 {
                    let numeric_x = (plus.x[k] - minus.x[k]) / (2.0 * h);
                    let numeric_y = (plus.y[k] - minus.y[k]) / (2.0 * h);
                    for (analytic, numeric, axis) in [
                        (d.x[k + 1], numeric_x, "x"),
                        (d.y[k + 1], numeric_y, "y"),
                    ] {
                        let err = (analytic - numeric).abs() / (1.0 + analytic.abs());
                        assert!(
                            err < 0.2,
                            "{} order {} at s = {}: {} vs {}",
                            axis,
                            k + 1,
                            s,
                            analytic,
                            numeric
                        );
                        checked += 1;
                        if err >= 1e-2 {
                            rough += 1;
                        }
                    }
                }
            }
        }
        assert!(
            rough * 50 <= checked,
            "{} of {} samples outside the tight tolerance",
            rough,
            checked
        );
    }
}
