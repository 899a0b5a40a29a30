//! Numeric helpers: sampling grids, interpolating lookups, and adaptive
//! quadrature

/// Signed tiebreaker used to avoid 0/0 in small-angle formulas.
const SNZ_EPS: f64 = 2.2e-15;

pub(crate) fn snz(x: f64) -> f64 {
    if x >= 0.0 {
        SNZ_EPS
    } else {
        -SNZ_EPS
    }
}

pub fn lerp(x: f64, from_lo: f64, from_hi: f64, to_lo: f64, to_hi: f64) -> f64 {
    if from_lo == from_hi {
        0.0
    } else {
        to_lo + (x - from_lo) * (to_hi - to_lo) / (from_hi - from_lo)
    }
}

/// `n + 1` evenly spaced values over `[begin, end]`, endpoints included.
pub fn range(begin: f64, end: f64, samples: usize) -> Vec<f64> {
    assert!(samples >= 2);
    let dx = (end - begin) / (samples - 1) as f64;
    (0..samples).map(|i| begin + dx * i as f64).collect()
}

/// Midpoints of `samples` equal subintervals of `[begin, end]`.
pub fn range_centered(begin: f64, end: f64, samples: usize) -> Vec<f64> {
    assert!(samples >= 1);
    let dx = (end - begin) / samples as f64;
    (0..samples).map(|i| begin + dx * (i as f64 + 0.5)).collect()
}

/// Linearly interpolates `target` at the position of `query` within the
/// sorted table `source`, clamping outside the table.
pub fn lerp_lookup(source: &[f64], target: &[f64], query: f64) -> f64 {
    assert_eq!(source.len(), target.len());
    assert!(!source.is_empty());

    match source.binary_search_by(|v| v.total_cmp(&query)) {
        Ok(index) => target[index],
        Err(ins_index) => {
            if ins_index == 0 {
                target[0]
            } else if ins_index >= source.len() {
                *target.last().unwrap()
            } else {
                lerp(
                    query,
                    source[ins_index - 1],
                    source[ins_index],
                    target[ins_index - 1],
                    target[ins_index],
                )
            }
        }
    }
}

pub fn lerp_lookup_map(source: &[f64], target: &[f64], queries: &[f64]) -> Vec<f64> {
    queries
        .iter()
        .map(|&q| lerp_lookup(source, target, q))
        .collect()
}

/// Interval of feasible accelerations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Cumulative integral table produced by [`integral_scan`]: `sums[i]` is the
/// integral of `f` over `[a, values[i]]`.
#[derive(Debug, Clone)]
pub struct IntegralScan {
    pub values: Vec<f64>,
    pub sums: Vec<f64>,
}

const MAX_QUADRATURE_DEPTH: u32 = 30;

/// Adaptive Simpson quadrature of `f` over `[a, b]` with global tolerance
/// `eps`, recording a cumulative table at every accepted subinterval.
///
/// The recursion depth is bounded so pathological integrands terminate.
pub fn integral_scan<F: Fn(f64) -> f64>(a: f64, b: f64, eps: f64, f: F) -> IntegralScan {
    let m = 0.5 * (a + b);
    let fa = f(a);
    let fm = f(m);
    let fb = f(b);
    let whole = (b - a) / 6.0 * (fa + 4.0 * fm + fb);

    let mut out = IntegralScan {
        values: vec![a],
        sums: vec![0.0],
    };
    scan_helper(
        &f,
        a,
        m,
        b,
        fa,
        fm,
        fb,
        whole,
        eps,
        MAX_QUADRATURE_DEPTH,
        &mut out,
    );
    out
}

#[allow(clippy::too_many_arguments)]
fn scan_helper<F: Fn(f64) -> f64>(
    f: &F,
    a: f64,
    m: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
    eps: f64,
    depth: u32,
    out: &mut IntegralScan,
) {
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = f(lm);
    let frm = f(rm);

    let left = (m - a) / 6.0 * (fa + 4.0 * flm + fm);
    let right = (b - m) / 6.0 * (fm + 4.0 * frm + fb);
    let delta = left + right - whole;

    if depth == 0 || delta.abs() <= 15.0 * eps {
        let base = *out.sums.last().unwrap();
        out.values.push(m);
        out.sums.push(base + left + 0.5 * delta / 15.0);
        out.values.push(b);
        out.sums.push(base + left + right + delta / 15.0);
    } else {
        scan_helper(f, a, lm, m, fa, flm, fm, left, 0.5 * eps, depth - 1, out);
        scan_helper(f, m, rm, b, fm, frm, fb, right, 0.5 * eps, depth - 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_endpoints() {
        let r = range(0.0, 10.0, 11);
        assert_eq!(r.len(), 11);
        assert!((r[0] - 0.0).abs() < 1e-12);
        assert!((r[10] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_range_centered() {
        let r = range_centered(0.0, 10.0, 5);
        assert_eq!(r.len(), 5);
        assert!((r[0] - 1.0).abs() < 1e-12);
        assert!((r[4] - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_lerp_lookup_clamps() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 10.0, 40.0];
        assert!((lerp_lookup(&xs, &ys, -1.0) - 0.0).abs() < 1e-12);
        assert!((lerp_lookup(&xs, &ys, 3.0) - 40.0).abs() < 1e-12);
        assert!((lerp_lookup(&xs, &ys, 0.5) - 5.0).abs() < 1e-12);
        assert!((lerp_lookup(&xs, &ys, 1.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_integral_scan_polynomial() {
        // integral of x^2 over [0, 3] = 9; Simpson is exact for quadratics
        let scan = integral_scan(0.0, 3.0, 1e-9, |x| x * x);
        assert!((scan.sums.last().unwrap() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_integral_scan_transcendental() {
        // integral of sin over [0, pi] = 2
        let scan = integral_scan(0.0, std::f64::consts::PI, 1e-9, f64::sin);
        assert!((scan.sums.last().unwrap() - 2.0).abs() < 1e-6);
        // table is monotone in both columns
        for w in scan.values.windows(2) {
            assert!(w[0] < w[1]);
        }
        for w in scan.sums.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }
}
