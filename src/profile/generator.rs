//! Forward/backward sweeps and their merge into time-optimal profiles

use itertools::izip;
use ordered_float::OrderedFloat;

use crate::math::{integral_scan, lerp_lookup_map, range_centered};
use crate::paths::PosePath;
use crate::profile::constraints::{AccelConstraint, VelConstraint};
use crate::profile::displacement::{CancelableProfile, DisplacementProfile};

/// Sampling densities for constraint evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileParams {
    /// Maximum gap between displacement samples
    pub disp_resolution: f64,
    /// Maximum swept angle between rotation samples
    pub ang_resolution: f64,
    /// Quadrature tolerance for the rotation sampling scan
    pub ang_sampling_eps: f64,
}

/// Displacements spaced so that the heading sweeps at most `ang_resolution`
/// between consecutive samples.
pub fn sample_path_by_rotation(path: &dyn PosePath, ang_resolution: f64, eps: f64) -> Vec<f64> {
    let scan = integral_scan(0.0, path.length(), eps, |s| {
        path.get(s, 2).heading.velocity().value().abs()
    });
    let total = scan.sums[scan.sums.len() - 1];
    let samples = (total / ang_resolution).ceil().max(1.0) as usize;
    lerp_lookup_map(
        &scan.sums,
        &scan.values,
        &range_centered(0.0, total, samples),
    )
}

/// Computes an approximately time-optimal profile for `path`, sampling the
/// constraints by displacement and by swept rotation.
pub fn profile(
    params: &ProfileParams,
    path: &dyn PosePath,
    begin_end_vel: f64,
    vel_constraint: &dyn VelConstraint,
    accel_constraint: &dyn AccelConstraint,
) -> CancelableProfile {
    let len = path.length();
    let disp_count = (len / params.disp_resolution).ceil().max(1.0) as usize;
    let mut samples = range_centered(0.0, len, disp_count);
    samples.extend(sample_path_by_rotation(
        path,
        params.ang_resolution,
        params.ang_sampling_eps,
    ));
    samples.sort_by_key(|&s| OrderedFloat(s));

    let mut max_vels = Vec::with_capacity(samples.len());
    let mut min_accels = Vec::with_capacity(samples.len());
    let mut max_accels = Vec::with_capacity(samples.len());
    for &s in &samples {
        let pose = path.get(s, 2);
        max_vels.push(vel_constraint.max_robot_vel(&pose, path, s));
        let min_max = accel_constraint.min_max_profile_accel(&pose, path, s);
        min_accels.push(min_max.min);
        max_accels.push(min_max.max);
    }

    let mut disps = vec![0.0];
    disps.extend(samples.windows(2).map(|w| 0.5 * (w[0] + w[1])));
    disps.push(len);

    profile_sampled(&disps, begin_end_vel, &max_vels, &min_accels, &max_accels)
}

/// Computes an exact, time-optimal profile under constant constraints.
///
/// `begin_end_vel` is both the beginning and ending velocity; keeping them
/// equal guarantees feasibility.
pub fn constant_profile(
    length: f64,
    begin_end_vel: f64,
    max_vel: f64,
    min_accel: f64,
    max_accel: f64,
) -> CancelableProfile {
    assert!(length > 0.0);
    profile_sampled(
        &[0.0, length],
        begin_end_vel,
        &[max_vel],
        &[min_accel],
        &[max_accel],
    )
}

/// Computes an approximately time-optimal profile from center-sampled
/// constraints over the grid `disps`.
pub fn profile_sampled(
    disps: &[f64],
    begin_end_vel: f64,
    max_vels: &[f64],
    min_accels: &[f64],
    max_accels: &[f64],
) -> CancelableProfile {
    assert_eq!(max_vels.len(), min_accels.len());
    assert_eq!(max_vels.len(), max_accels.len());

    CancelableProfile::new(
        merge(
            &forward_profile_sampled(disps, begin_end_vel, max_vels, max_accels),
            &backward_profile_sampled(disps, max_vels, begin_end_vel, min_accels),
        ),
        disps.to_vec(),
        min_accels.to_vec(),
    )
}

/// Sweeps forward from `begin_vel`, accelerating as hard as allowed and
/// splitting intervals where a velocity cap is crossed.
///
/// The procedure is a variant of the approach described in section 14.6.3.5
/// of LaValle's "Planning Algorithms".
pub fn forward_profile_sampled(
    disps: &[f64],
    begin_vel: f64,
    max_vels: &[f64],
    max_accels: &[f64],
) -> DisplacementProfile {
    assert!(begin_vel >= 0.0);
    assert!(max_vels.iter().all(|&v| v > 0.0));
    assert!(max_accels.iter().all(|&a| a > 0.0));
    assert_eq!(disps.len(), max_vels.len() + 1);

    let mut new_disps = vec![0.0];
    let mut vels = vec![begin_vel];
    let mut accels = Vec::new();

    for (&begin_disp, &end_disp, &max_vel, &max_accel) in
        izip!(disps, &disps[1..], max_vels, max_accels)
    {
        let begin_vel = vels[vels.len() - 1];
        if begin_vel >= max_vel {
            new_disps.push(end_disp);
            vels.push(max_vel);
            accels.push(0.0);
        } else {
            let end_vel = (begin_vel * begin_vel + 2.0 * max_accel * (end_disp - begin_disp)).sqrt();
            if end_vel <= max_vel {
                new_disps.push(end_disp);
                vels.push(end_vel);
                accels.push(max_accel);
            } else {
                let accel_dx = (max_vel * max_vel - begin_vel * begin_vel) / (2.0 * max_accel);

                new_disps.push(begin_disp + accel_dx);
                vels.push(max_vel);
                accels.push(max_accel);

                new_disps.push(end_disp);
                vels.push(max_vel);
                accels.push(0.0);
            }
        }
    }

    DisplacementProfile::new(new_disps, vels, accels)
}

/// Sweeps backward from `end_vel` by running the forward sweep on the
/// reversed grid and flipping the result.
pub fn backward_profile_sampled(
    disps: &[f64],
    max_vels: &[f64],
    end_vel: f64,
    min_accels: &[f64],
) -> DisplacementProfile {
    let length = disps[disps.len() - 1];
    let rev_disps: Vec<f64> = disps.iter().rev().map(|&x| length - x).collect();
    let rev_max_vels: Vec<f64> = max_vels.iter().rev().cloned().collect();
    let rev_accels: Vec<f64> = min_accels.iter().rev().map(|&a| -a).collect();

    let p = forward_profile_sampled(&rev_disps, end_vel, &rev_max_vels, &rev_accels);
    DisplacementProfile::new(
        p.disps.iter().rev().map(|&x| p.length - x).collect(),
        p.vels.iter().rev().cloned().collect(),
        p.accels.iter().rev().map(|&a| -a).collect(),
    )
}

/// Merges two profiles over the same interval into one with the pointwise
/// minimum velocity, inserting a sample where the winner changes.
pub fn merge(p1: &DisplacementProfile, p2: &DisplacementProfile) -> DisplacementProfile {
    let mut disps = vec![0.0];
    let mut vels = vec![p1.vels[0].min(p2.vels[0])];
    let mut accels = Vec::new();

    let mut last_min1 = p1.vels[0] < p2.vels[0];

    let mut i = 1;
    let mut j = 1;
    while i < p1.disps.len() && j < p2.disps.len() {
        let end_disp = p1.disps[i].min(p2.disps[j]);
        let accel1 = p1.accels[i - 1];
        let accel2 = p2.accels[j - 1];

        // intermediate velocities are computed backward from the later
        // sample to accumulate less error
        let (end_vel1, end_vel2) = if p1.disps[i] == p2.disps[j] {
            let p = (p1.vels[i], p2.vels[j]);
            i += 1;
            j += 1;
            p
        } else if p1.disps[i] < p2.disps[j] {
            let v2 = (p2.vels[j] * p2.vels[j] - 2.0 * accel2 * (p2.disps[j] - p1.disps[i]))
                .max(0.0)
                .sqrt();
            let p = (p1.vels[i], v2);
            i += 1;
            p
        } else {
            let v1 = (p1.vels[i] * p1.vels[i] - 2.0 * accel1 * (p1.disps[i] - p2.disps[j]))
                .max(0.0)
                .sqrt();
            let p = (v1, p2.vels[j]);
            j += 1;
            p
        };

        let min1 = end_vel1 < end_vel2;
        if min1 == last_min1 {
            disps.push(end_disp);
            if min1 {
                vels.push(end_vel1);
                accels.push(accel1);
            } else {
                vels.push(end_vel2);
                accels.push(accel2);
            }
        } else if accel1 == accel2 {
            // equal accelerations leave no crossing point to solve for
            disps.push(end_disp);
            vels.push(end_vel1.min(end_vel2));
            accels.push(accel1);
        } else {
            let dx = (end_vel2 * end_vel2 - end_vel1 * end_vel1) / (2.0 * (accel2 - accel1));
            disps.push(end_disp - dx);
            vels.push((end_vel1 * end_vel1 - 2.0 * accel1 * dx).max(0.0).sqrt());
            accels.push(accel1.max(accel2));

            disps.push(end_disp);
            vels.push(end_vel1.min(end_vel2));
            accels.push(accel1.min(accel2));
        }

        last_min1 = min1;
    }

    DisplacementProfile::new(disps, vels, accels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::displacement::TimeProfile;
    use rand::prelude::*;

    fn check_profile_invariants(p: &DisplacementProfile, max_vel: f64) {
        for w in p.disps.windows(2) {
            assert!(w[0] <= w[1] + 1e-12);
        }
        for &v in &p.vels {
            assert!(v <= max_vel + 1e-9, "vel {} above cap {}", v, max_vel);
            assert!(v >= -1e-9);
        }
        // velocities are consistent with the accelerations over each interval
        for i in 0..p.accels.len() {
            let dx = p.disps[i + 1] - p.disps[i];
            let expected = (p.vels[i] * p.vels[i] + 2.0 * p.accels[i] * dx).max(0.0).sqrt();
            assert!(
                (p.vels[i + 1] - expected).abs() < 1e-6,
                "interval {}: {} vs {}",
                i,
                p.vels[i + 1],
                expected
            );
        }
    }

    #[test]
    fn test_constant_profile_trapezoid() {
        // long enough to reach the cruise velocity
        let p = constant_profile(10.0, 0.0, 2.0, -1.0, 1.0).base_profile;
        check_profile_invariants(&p, 2.0);
        assert!((p.length - 10.0).abs() < 1e-12);
        assert!(p.vels[0].abs() < 1e-12);
        assert!(p.vels[p.vels.len() - 1].abs() < 1e-12);
        assert!(p.vels.iter().any(|&v| (v - 2.0).abs() < 1e-9));

        let tp = TimeProfile::new(p);
        // 2s accel + 3s cruise + 2s decel
        assert!((tp.duration - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_profile_triangle() {
        // too short to reach the cap: the peak stays strictly below it
        let p = constant_profile(1.0, 0.0, 10.0, -1.0, 1.0).base_profile;
        check_profile_invariants(&p, 10.0);
        let peak = p.vels.iter().cloned().fold(0.0, f64::max);
        assert!((peak - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_forward_respects_begin_vel() {
        let disps = [0.0, 1.0, 2.0, 3.0];
        let p = forward_profile_sampled(&disps, 1.5, &[2.0, 2.0, 2.0], &[1.0, 1.0, 1.0]);
        assert!((p.vels[0] - 1.5).abs() < 1e-12);
        check_profile_invariants(&p, 2.0);
    }

    #[test]
    fn test_backward_mirrors_forward() {
        let disps = [0.0, 1.0, 2.0, 3.0];
        let fwd = forward_profile_sampled(&disps, 0.5, &[3.0, 3.0, 3.0], &[2.0, 2.0, 2.0]);
        let bwd = backward_profile_sampled(&disps, &[3.0, 3.0, 3.0], 0.5, &[-2.0, -2.0, -2.0]);

        // backward profile ends at the end velocity and is the forward
        // profile of the reversed problem
        assert!((bwd.vels[bwd.vels.len() - 1] - 0.5).abs() < 1e-12);
        assert!((bwd.vels[0] - fwd.vels[fwd.vels.len() - 1]).abs() < 1e-12);
        for &a in &bwd.accels {
            assert!(a <= 1e-12);
        }
    }

    #[test]
    fn test_merge_is_pointwise_minimum() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..50 {
            let n = rng.gen_range(2..6);
            let disps: Vec<f64> = (0..=n).map(|i| i as f64).collect();
            let grid1 = disps.clone();
            let grid2 = disps.clone();

            // one constant cap per profile keeps each forward sweep
            // self-consistent so the pointwise comparison below is exact
            let cap1 = rng.gen_range(1.0..3.0);
            let cap2 = rng.gen_range(1.0..3.0);
            let max_vels1: Vec<f64> = vec![cap1; n];
            let max_vels2: Vec<f64> = vec![cap2; n];
            let accels1: Vec<f64> = (0..n).map(|_| rng.gen_range(0.5..2.0)).collect();
            let accels2: Vec<f64> = (0..n).map(|_| rng.gen_range(0.5..2.0)).collect();

            let p1 = forward_profile_sampled(&grid1, 0.0, &max_vels1, &accels1);
            let p2 = forward_profile_sampled(&grid2, 0.0, &max_vels2, &accels2);
            let m = merge(&p1, &p2);

            for i in 0..100 {
                let x = n as f64 * i as f64 / 99.0;
                let expected = p1.get(x)[1].min(p2.get(x)[1]);
                let actual = m.get(x)[1];
                assert!(
                    (actual - expected).abs() < 1e-6,
                    "x = {}: {} vs {}",
                    x,
                    actual,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_merge_mismatched_grids() {
        // the two profiles share [0, 4] but sample it differently
        let p1 = forward_profile_sampled(&[0.0, 1.3, 2.1, 4.0], 0.0, &[2.0; 3], &[1.0; 3]);
        let p2 = forward_profile_sampled(&[0.0, 0.7, 4.0], 0.0, &[1.5; 2], &[0.8; 2]);
        let m = merge(&p1, &p2);
        check_profile_invariants(&m, 2.0);

        for i in 0..200 {
            let x = 4.0 * i as f64 / 199.0;
            let expected = p1.get(x)[1].min(p2.get(x)[1]);
            assert!((m.get(x)[1] - expected).abs() < 1e-6, "x = {}", x);
        }
    }

    #[test]
    fn test_sampled_profile_under_varying_caps() {
        // slow middle section forces a dip
        let disps = [0.0, 2.0, 4.0, 6.0];
        let cp = profile_sampled(
            &disps,
            0.0,
            &[3.0, 0.5, 3.0],
            &[-1.0, -1.0, -1.0],
            &[1.0, 1.0, 1.0],
        );
        let p = &cp.base_profile;
        check_profile_invariants(p, 3.0);

        // mid-segment velocities honor the tighter cap
        for (i, &x) in p.disps.iter().enumerate() {
            if x > 2.0 && x < 4.0 {
                assert!(p.vels[i] <= 0.5 + 1e-9);
            }
        }
        assert!(p.vels[0].abs() < 1e-12);
        assert!(p.vels[p.vels.len() - 1].abs() < 1e-12);
    }
}
