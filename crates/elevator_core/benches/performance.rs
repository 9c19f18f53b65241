//! Performance benchmarks for elevator_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use elevator_core::config::{DispatchStrategy, SystemConfig};
use elevator_core::dispatch::{create_policy, HallCall};
use elevator_core::request::Direction;
use elevator_core::scenario::{run_scenario, ScenarioParams};
use elevator_core::test_helpers::build_system;
use elevator_core::visualizer::{render, RenderOptions};

fn bench_scenario_run(c: &mut Criterion) {
    let scenarios = vec![("light", 0.1), ("medium", 0.4), ("heavy", 0.9)];

    let mut group = c.benchmark_group("scenario_run");
    for (name, probability) in scenarios {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &probability,
            |b, &probability| {
                b.iter(|| {
                    let mut system = build_system(SystemConfig::default());
                    let params = ScenarioParams::default()
                        .with_seed(42)
                        .with_ticks(2_000)
                        .with_call_probability(probability);
                    black_box(run_scenario(&mut system, &params));
                });
            },
        );
    }
    group.finish();
}

fn bench_dispatch_policies(c: &mut Criterion) {
    // A busy building: every car holds a few stops.
    let mut system = build_system(SystemConfig::default());
    for (car, floor) in [(1, 12), (2, 4), (3, 30), (4, 22), (5, 48), (6, 40)] {
        system.add_internal_request(car, floor).expect("car call");
    }
    for _ in 0..3 {
        system.step();
    }
    let call = HallCall {
        floor: 15,
        direction: Direction::Down,
    };

    let mut group = c.benchmark_group("dispatch_policies");
    for strategy in [DispatchStrategy::ZonedScan, DispatchStrategy::NearestCar] {
        let policy = create_policy(strategy);
        group.bench_function(policy.name(), |b| {
            b.iter(|| black_box(policy.rank(&call, system.elevators(), 150)));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut system = build_system(SystemConfig::default());
    run_scenario(&mut system, &ScenarioParams::default().with_ticks(100));
    let snapshot = system.get_status();
    let options = RenderOptions::default();

    c.bench_function("render_reference_building", |b| {
        b.iter(|| black_box(render(&snapshot, &options)));
    });
}

criterion_group!(benches, bench_scenario_run, bench_dispatch_policies, bench_render);
criterion_main!(benches);
