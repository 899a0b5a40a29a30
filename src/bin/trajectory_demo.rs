// Trajectory planning demo: spline path with heading interpolation and a
// constraint-limited motion profile.
use gnuplot::{AxesCommon, Caption, Color, Figure, LineWidth};
use std::sync::Arc;

use motion_planning::profile::{
    AngularVelConstraint, MinVelConstraint, ProfileAccelConstraint, ProfileParams,
    TranslationalVelConstraint,
};
use motion_planning::{Pose2, Rotation2, TrajectoryBuilder, TrajectoryBuilderParams, Vector2};

fn main() {
    let params = TrajectoryBuilderParams {
        arc_length_sampling_eps: 1e-6,
        profile_params: ProfileParams {
            disp_resolution: 0.25,
            ang_resolution: 0.1,
            ang_sampling_eps: 1e-2,
        },
    };
    let vel_constraint = MinVelConstraint {
        constraints: vec![
            Arc::new(TranslationalVelConstraint::new(2.0)),
            Arc::new(AngularVelConstraint::new(1.5)),
        ],
    };

    let trajectories = TrajectoryBuilder::new(
        params,
        Pose2::identity(),
        0.0,
        Arc::new(vel_constraint),
        Arc::new(ProfileAccelConstraint::new(-1.5, 1.0)),
    )
    .line_to_x(4.0, None, None)
    .spline_to(
        Vector2::new(8.0, 4.0),
        Rotation2::exp(std::f64::consts::FRAC_PI_2),
        None,
        None,
    )
    .spline_to_spline_heading(
        Pose2::new(Vector2::new(4.0, 8.0), Rotation2::exp(std::f64::consts::PI)),
        Rotation2::exp(std::f64::consts::PI),
        None,
        None,
    )
    .build()
    .unwrap();

    let traj = trajectories[0].to_time();
    println!("duration: {:.3} s, length: {:.3} m", traj.duration(), traj.path.length());

    let n = 200;
    let mut xs = Vec::with_capacity(n + 1);
    let mut ys = Vec::with_capacity(n + 1);
    let mut ts = Vec::with_capacity(n + 1);
    let mut speeds = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let t = traj.duration() * i as f64 / n as f64;
        let pose = traj.get(t);
        xs.push(pose.position.x.value());
        ys.push(pose.position.y.value());
        ts.push(t);
        speeds.push(pose.velocity().line.value().norm());
    }

    let crate_dir = option_env!("CARGO_MANIFEST_DIR").unwrap();

    let mut fg = Figure::new();
    fg.axes2d()
        .set_x_label("x [m]", &[])
        .set_y_label("y [m]", &[])
        .lines(&xs, &ys, &[Caption("path"), Color("#35C788"), LineWidth(2.0)]);
    let _ = fg.save_to_svg(
        format!("{}/img/trajectory_demo.svg", crate_dir).as_str(),
        800,
        600,
    );

    let mut fg = Figure::new();
    fg.axes2d()
        .set_x_label("t [s]", &[])
        .set_y_label("speed [m/s]", &[])
        .lines(&ts, &speeds, &[Caption("speed"), Color("#DD3355"), LineWidth(2.0)]);
    let _ = fg.save_to_svg(
        format!("{}/img/trajectory_profile.svg", crate_dir).as_str(),
        800,
        600,
    );
}
