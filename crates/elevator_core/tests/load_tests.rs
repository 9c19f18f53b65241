//! Load tests for elevator_core: throughput of the dispatcher under heavy traffic.

use std::time::Instant;

use elevator_core::config::SystemConfig;
use elevator_core::scenario::{run_scenario, ScenarioParams};
use elevator_core::test_helpers::build_system;

#[test]
#[ignore] // Only run explicitly: cargo test --package elevator_core --test load_tests -- --ignored
fn test_sustained_load() {
    let mut system = build_system(SystemConfig::default().with_journal_capacity(1_000));
    let params = ScenarioParams::default()
        .with_seed(42)
        .with_ticks(200_000)
        .with_call_probability(0.9);

    let start = Instant::now();
    let report = run_scenario(&mut system, &params);
    let duration = start.elapsed();

    let ticks_per_sec = report.ticks as f64 / duration.as_secs_f64();
    println!(
        "Sustained load test: {} ticks, {} hall calls in {:.2}s ({:.0} ticks/sec)",
        report.ticks,
        report.hall_calls,
        duration.as_secs_f64(),
        ticks_per_sec
    );

    assert!(
        ticks_per_sec > 10_000.0,
        "Should process >10000 ticks/sec, got {:.0}",
        ticks_per_sec
    );
    assert!(system.journal().dropped() > 0);
}

#[test]
#[ignore]
fn test_tall_building() {
    use elevator_core::config::{CarConfig, Zone};

    // 200 floors split into eight banks of two cars.
    let cars = (0..16u32)
        .map(|i| {
            let bank = i / 2;
            let lowest = bank * 25 + 1;
            CarConfig::new(i + 1, Zone::new(format!("bank_{bank}"), lowest, lowest + 24))
        })
        .collect();
    let config = SystemConfig::default()
        .with_floors(200)
        .with_cars(cars)
        .with_journal_capacity(1_000);
    let mut system = build_system(config);

    let start = Instant::now();
    let report = run_scenario(
        &mut system,
        &ScenarioParams::default().with_ticks(50_000).with_call_probability(1.0),
    );
    println!(
        "Tall building: {} ticks, {} completed stops in {:.2}s",
        report.ticks,
        report.completed,
        start.elapsed().as_secs_f64()
    );
    assert!(report.completed > 0);
}
