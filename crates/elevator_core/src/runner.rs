//! Drives an [`ElevatorSystem`] forward in whole ticks.

use crate::system::ElevatorSystem;

/// Steps exactly `ticks` times.
pub fn run_ticks(system: &mut ElevatorSystem, ticks: u64) {
    for _ in 0..ticks {
        system.step();
    }
}

/// Steps until every car is idle with nothing pending, or `max_ticks` is reached.
/// Returns the number of ticks run.
pub fn run_until_idle(system: &mut ElevatorSystem, max_ticks: u64) -> u64 {
    run_until_idle_with_hook(system, max_ticks, |_| {})
}

/// Like [`run_until_idle`], calling `hook` after every step.
///
/// Stops early while in emergency, since nothing can move until service resumes.
pub fn run_until_idle_with_hook<F>(system: &mut ElevatorSystem, max_ticks: u64, mut hook: F) -> u64
where
    F: FnMut(&ElevatorSystem),
{
    let mut ticks = 0;
    while ticks < max_ticks && !system.is_idle() && !system.is_emergency() {
        system.step();
        ticks += 1;
        hook(system);
    }
    ticks
}
