//! Profiles sampled over displacement and their time parameterization

use crate::autodiff::{DualNum, Time};

/// Piecewise-constant-acceleration velocity profile over displacement.
///
/// `disps` is an increasing grid starting at 0; `vels[i]` is the velocity
/// at `disps[i]`, and `accels[i]` applies over `[disps[i], disps[i + 1]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementProfile {
    pub disps: Vec<f64>,
    pub vels: Vec<f64>,
    pub accels: Vec<f64>,
    pub length: f64,
}

impl DisplacementProfile {
    pub fn new(disps: Vec<f64>, vels: Vec<f64>, accels: Vec<f64>) -> Self {
        assert!(!disps.is_empty());
        assert_eq!(disps.len(), vels.len());
        assert_eq!(disps.len(), accels.len() + 1);
        let length = disps[disps.len() - 1];
        Self {
            disps,
            vels,
            accels,
            length,
        }
    }

    /// Displacement, velocity, and acceleration at `x`, clamping outside
    /// the grid to the boundary velocity with zero acceleration.
    pub fn get(&self, x: f64) -> DualNum<Time> {
        let last = self.disps.len() - 1;
        match self.disps.binary_search_by(|v| v.total_cmp(&x)) {
            Ok(index) if index >= last => DualNum::new(&[x, self.vels[index], 0.0]),
            Ok(index) => DualNum::new(&[x, self.vels[index], self.accels[index]]),
            Err(ins) if ins == 0 => DualNum::new(&[x, self.vels[0], 0.0]),
            Err(ins) if ins > last => DualNum::new(&[x, self.vels[last], 0.0]),
            Err(ins) => {
                let dx = x - self.disps[ins - 1];
                let v0 = self.vels[ins - 1];
                let a = self.accels[ins - 1];
                DualNum::new(&[x, (v0 * v0 + 2.0 * a * dx).sqrt(), a])
            }
        }
    }
}

/// Profile that can be canceled at any displacement, yielding a braking
/// profile that reaches the final velocity as soon as the per-interval
/// minimum accelerations allow.
///
/// `disps` is the constraint sample grid, with `min_accels[i]` admissible
/// over `[disps[i], disps[i + 1]]`. Cancellation leaves the base profile
/// untouched, so a profile can be canceled more than once.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelableProfile {
    pub base_profile: DisplacementProfile,
    pub disps: Vec<f64>,
    pub min_accels: Vec<f64>,
}

impl CancelableProfile {
    pub fn new(base_profile: DisplacementProfile, disps: Vec<f64>, min_accels: Vec<f64>) -> Self {
        assert_eq!(disps.len(), min_accels.len() + 1);
        Self {
            base_profile,
            disps,
            min_accels,
        }
    }

    /// The braking profile beginning at displacement `x` of the base
    /// profile. Its displacements restart at zero.
    pub fn cancel(&self, x: f64) -> DisplacementProfile {
        let mut new_disps = vec![0.0];
        let mut vels = vec![self.base_profile.get(x)[1]];
        let mut accels = Vec::new();

        let begin_index = match self.disps.binary_search_by(|v| v.total_cmp(&x)) {
            Ok(index) => index,
            Err(ins) => ins,
        };
        if begin_index == 0 {
            return DisplacementProfile::new(vec![0.0], vec![vels[0]], vec![]);
        }

        let target_vel = self.base_profile.vels[self.base_profile.vels.len() - 1];
        for index in begin_index..self.disps.len() {
            let v = vels[vels.len() - 1];
            let a = self.min_accels[index - 1];

            let last_disp = new_disps[new_disps.len() - 1];
            let target_disp = last_disp + (target_vel * target_vel - v * v) / (2.0 * a);
            if x + target_disp > self.disps[index] {
                new_disps.push(self.disps[index] - x);
                vels.push(
                    (v * v + 2.0 * a * (self.disps[index] - self.disps[index - 1]))
                        .max(0.0)
                        .sqrt(),
                );
                accels.push(a);
            } else {
                new_disps.push(target_disp);
                vels.push(target_vel);
                accels.push(a);
                break;
            }
        }

        DisplacementProfile::new(new_disps, vels, accels)
    }
}

fn time_scan(p: &DisplacementProfile) -> Vec<f64> {
    let mut times = vec![0.0];
    for i in 0..p.accels.len() {
        let last = times[times.len() - 1];
        times.push(
            last + if p.accels[i] == 0.0 {
                (p.disps[i + 1] - p.disps[i]) / p.vels[i]
            } else {
                (p.vels[i + 1] - p.vels[i]) / p.accels[i]
            },
        );
    }
    times
}

/// Time parameterization of a displacement profile
#[derive(Debug, Clone, PartialEq)]
pub struct TimeProfile {
    pub disp_profile: DisplacementProfile,
    pub times: Vec<f64>,
    pub duration: f64,
}

impl TimeProfile {
    pub fn new(disp_profile: DisplacementProfile) -> Self {
        let times = time_scan(&disp_profile);
        let duration = times[times.len() - 1];
        Self {
            disp_profile,
            times,
            duration,
        }
    }

    /// Displacement, velocity, and acceleration at time `t`, extrapolating
    /// at the boundary velocity outside `[0, duration]`.
    pub fn get(&self, t: f64) -> DualNum<Time> {
        let last = self.times.len() - 1;
        match self.times.binary_search_by(|v| v.total_cmp(&t)) {
            Ok(index) if index >= last => DualNum::new(&[
                self.disp_profile.disps[index],
                self.disp_profile.vels[index],
                0.0,
            ]),
            Ok(index) => DualNum::new(&[
                self.disp_profile.disps[index],
                self.disp_profile.vels[index],
                self.disp_profile.accels[index],
            ]),
            Err(ins) if ins == 0 => {
                let v = self.disp_profile.vels[0];
                DualNum::new(&[v * t, v, 0.0])
            }
            Err(ins) if ins > last => {
                let v = self.disp_profile.vels[last];
                DualNum::new(&[self.disp_profile.length + v * (t - self.duration), v, 0.0])
            }
            Err(ins) => {
                let dt = t - self.times[ins - 1];
                let x0 = self.disp_profile.disps[ins - 1];
                let v0 = self.disp_profile.vels[ins - 1];
                let a = self.disp_profile.accels[ins - 1];
                DualNum::new(&[(0.5 * a * dt + v0) * dt + x0, a * dt + v0, a])
            }
        }
    }

    /// The time at which displacement `x` is reached, clamping outside
    /// `[0, length]`.
    pub fn inverse(&self, x: f64) -> f64 {
        let disps = &self.disp_profile.disps;
        let last = disps.len() - 1;
        match disps.binary_search_by(|v| v.total_cmp(&x)) {
            Ok(index) => self.times[index],
            Err(ins) if ins == 0 => 0.0,
            Err(ins) if ins > last => self.duration,
            Err(ins) => {
                let dx = x - disps[ins - 1];
                let t0 = self.times[ins - 1];
                let v0 = self.disp_profile.vels[ins - 1];
                let a = self.disp_profile.accels[ins - 1];
                if a == 0.0 {
                    t0 + dx / v0
                } else {
                    t0 + ((v0 * v0 / a + 2.0 * dx) / a).sqrt().copysign(a) - v0 / a
                }
            }
        }
    }
}
