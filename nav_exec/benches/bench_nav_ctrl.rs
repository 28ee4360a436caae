//! # Navigation Control Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use nav_lib::{
    nav_ctrl::{NavCtrl, NavInput, Params, Pose},
    route::{FixedShapeSource, RetryParams, RouteSelector, ShapeCatalog, WaypointQueue},
};
use util::module::State;

fn nav_ctrl_benchmark(c: &mut Criterion) {
    // Controller part way along the first leg of the square route
    let mut nav_ctrl = NavCtrl::new(
        Params::default(),
        WaypointQueue::new(ShapeCatalog::builtin()),
        RouteSelector::blocking(
            FixedShapeSource::new(Some(String::from("square"))),
            RetryParams::default(),
        ),
    );

    nav_ctrl.on_pose(Pose::new(0.0, 0.0, std::f64::consts::FRAC_PI_4));
    nav_ctrl.step();

    let input = NavInput {
        pose: Some(Pose::new(0.3, 0.32, 0.8)),
    };

    c.bench_function("NavCtrl::proc", |b| {
        b.iter(|| nav_ctrl.proc(black_box(&input)).unwrap())
    });

    c.bench_function("NavCtrl::step", |b| b.iter(|| black_box(nav_ctrl.step())));
}

criterion_group!(benches, nav_ctrl_benchmark);
criterion_main!(benches);
