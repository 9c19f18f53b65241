//! Seeded random traffic for demos, benches and soak tests.
//!
//! Each tick a call is issued with probability `call_probability`. A `lobby_share`
//! fraction of calls are lobby up-calls; the rest are down-calls from a random floor
//! above the lobby. Riders wait until a car completes the stop at their floor and then
//! press a destination: a floor in that car's zone for lobby calls, the lobby for
//! down-calls.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::Zone;
use crate::events::SystemEventKind;
use crate::request::{Direction, ElevatorId};
use crate::system::{CallOutcome, ElevatorSystem};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioParams {
    pub ticks: u64,
    pub call_probability: f64,
    pub seed: u64,
    pub lobby_share: f64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            ticks: 200,
            call_probability: 0.2,
            seed: 42,
            lobby_share: 0.5,
        }
    }
}

impl ScenarioParams {
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn with_call_probability(mut self, probability: f64) -> Self {
        self.call_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_lobby_share(mut self, share: f64) -> Self {
        self.lobby_share = share.clamp(0.0, 1.0);
        self
    }
}

/// A hall call drawn by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedCall {
    pub floor: u32,
    pub direction: Direction,
}

#[derive(Debug)]
pub struct TrafficGenerator {
    rng: StdRng,
    call_probability: f64,
    lobby_share: f64,
}

impl TrafficGenerator {
    pub fn new(params: &ScenarioParams) -> Self {
        Self {
            rng: StdRng::seed_from_u64(params.seed),
            call_probability: params.call_probability.clamp(0.0, 1.0),
            lobby_share: params.lobby_share.clamp(0.0, 1.0),
        }
    }

    /// Draws this tick's hall call, if any.
    pub fn next_call(&mut self, num_floors: u32, lobby: u32) -> Option<PlannedCall> {
        if !self.rng.gen_bool(self.call_probability) {
            return None;
        }
        let can_go_up = lobby < num_floors;
        if can_go_up && self.rng.gen_bool(self.lobby_share) {
            return Some(PlannedCall {
                floor: lobby,
                direction: Direction::Up,
            });
        }
        if !can_go_up {
            return None;
        }
        Some(PlannedCall {
            floor: self.rng.gen_range(lobby + 1..=num_floors),
            direction: Direction::Down,
        })
    }

    /// Destination above the lobby inside `zone`, or `None` when the zone has none.
    pub fn destination_in(&mut self, zone: &Zone, lobby: u32) -> Option<u32> {
        let lowest = zone.lowest.max(lobby + 1);
        (lowest <= zone.highest).then(|| self.rng.gen_range(lowest..=zone.highest))
    }
}

/// Totals for one scenario run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub ticks: u64,
    pub hall_calls: u64,
    pub assigned: u64,
    pub queued: u64,
    pub duplicates: u64,
    /// Riders who boarded and pressed a destination.
    pub car_calls: u64,
    pub rejected: u64,
    pub completed: u64,
    /// Riders still waiting at a hall button when the run ended.
    pub waiting: u64,
}

/// Riders waiting at hall buttons, boarded when a car completes their stop.
#[derive(Debug, Default)]
struct WaitingRiders {
    waiting: BTreeMap<(u32, Direction), u64>,
    mark: u64,
}

impl WaitingRiders {
    fn new(system: &ElevatorSystem) -> Self {
        Self {
            waiting: BTreeMap::new(),
            mark: system.journal().mark(),
        }
    }

    fn wait(&mut self, floor: u32, direction: Direction) {
        *self.waiting.entry((floor, direction)).or_default() += 1;
    }

    fn count(&self) -> u64 {
        self.waiting.values().sum()
    }

    /// Boards riders at every stop completed since the last call and sends their car
    /// calls.
    fn board(
        &mut self,
        system: &mut ElevatorSystem,
        traffic: &mut TrafficGenerator,
        report: &mut ScenarioReport,
    ) {
        let arrivals: Vec<(ElevatorId, u32, Direction)> = system
            .journal()
            .since(self.mark)
            .filter_map(|event| match event.kind {
                SystemEventKind::RequestCompleted {
                    elevator,
                    floor,
                    direction,
                    ..
                } => Some((elevator, floor, direction)),
                _ => None,
            })
            .collect();
        self.mark = system.journal().mark();

        let lobby = system.config().lobby_floor;
        for (elevator, floor, direction) in arrivals {
            let Some(riders) = self.waiting.remove(&(floor, direction)) else {
                continue;
            };
            for _ in 0..riders {
                let destination = match direction {
                    Direction::Down => Some(lobby),
                    _ => system
                        .elevator(elevator)
                        .map(|car| car.zone().clone())
                        .and_then(|zone| traffic.destination_in(&zone, lobby)),
                };
                let Some(target) = destination else {
                    continue;
                };
                report.car_calls += 1;
                if let Err(err) = system.add_internal_request(elevator, target) {
                    log::debug!("car call to F{target} on E{elevator} refused: {err}");
                    report.rejected += 1;
                }
            }
        }
    }
}

pub fn run_scenario(system: &mut ElevatorSystem, params: &ScenarioParams) -> ScenarioReport {
    run_scenario_with_hook(system, params, |_| {})
}

/// Runs `params.ticks` ticks of random traffic, calling `hook` after every step.
pub fn run_scenario_with_hook<F>(
    system: &mut ElevatorSystem,
    params: &ScenarioParams,
    mut hook: F,
) -> ScenarioReport
where
    F: FnMut(&ElevatorSystem),
{
    let mut traffic = TrafficGenerator::new(params);
    let mut riders = WaitingRiders::new(system);
    let mut report = ScenarioReport::default();
    let completed_before = system.stats().requests_completed;
    let num_floors = system.config().num_floors;
    let lobby = system.config().lobby_floor;

    for _ in 0..params.ticks {
        if let Some(call) = traffic.next_call(num_floors, lobby) {
            report.hall_calls += 1;
            match system.add_external_request(call.floor, call.direction) {
                Ok(outcome) => {
                    match outcome {
                        CallOutcome::Assigned { .. } => report.assigned += 1,
                        CallOutcome::Queued(_) => report.queued += 1,
                        CallOutcome::AlreadyRequested => report.duplicates += 1,
                    }
                    riders.wait(call.floor, call.direction);
                }
                Err(err) => {
                    log::debug!("hall call F{} refused: {err}", call.floor);
                    report.rejected += 1;
                }
            }
        }

        system.step();
        report.ticks += 1;
        riders.board(system, &mut traffic, &mut report);
        hook(system);
    }

    report.completed = system.stats().requests_completed - completed_before;
    report.waiting = riders.count();
    log::info!(
        "scenario finished: {} ticks, {} hall calls, {} completed stops",
        report.ticks,
        report.hall_calls,
        report.completed
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::test_helpers::{build_system, single_car_config};

    fn completed_floors(system: &ElevatorSystem) -> Vec<u32> {
        system
            .journal()
            .iter()
            .filter_map(|event| match event.kind {
                SystemEventKind::RequestCompleted { floor, .. } => Some(floor),
                _ => None,
            })
            .collect()
    }

    fn drive(
        system: &mut ElevatorSystem,
        riders: &mut WaitingRiders,
        ticks: u64,
    ) -> ScenarioReport {
        let mut traffic = TrafficGenerator::new(&ScenarioParams::default());
        let mut report = ScenarioReport::default();
        for _ in 0..ticks {
            system.step();
            riders.board(system, &mut traffic, &mut report);
        }
        report
    }

    #[test]
    fn down_rider_is_picked_up_before_the_lobby_stop() {
        let mut system = build_system(single_car_config(10));
        let mut riders = WaitingRiders::new(&system);
        let outcome = system
            .add_external_request(10, Direction::Down)
            .expect("hall call");
        assert_eq!(outcome.elevator(), Some(1));
        riders.wait(10, Direction::Down);

        let report = drive(&mut system, &mut riders, 60);
        assert_eq!(completed_floors(&system), vec![10, 1]);
        assert_eq!(system.elevator(1).expect("E1").current_floor(), 1);
        assert_eq!(report.car_calls, 1);
        assert_eq!(riders.count(), 0);
    }

    #[test]
    fn lobby_rider_presses_a_floor_once_aboard() {
        let mut system = build_system(single_car_config(10));
        let mut riders = WaitingRiders::new(&system);
        system
            .add_external_request(1, Direction::Up)
            .expect("hall call");
        riders.wait(1, Direction::Up);

        drive(&mut system, &mut riders, 60);
        let floors = completed_floors(&system);
        assert_eq!(floors.len(), 2, "{floors:?}");
        assert_eq!(floors[0], 1);
        assert!((2..=10).contains(&floors[1]));
    }

    #[test]
    fn riders_sharing_a_button_board_the_same_car() {
        let mut system = build_system(single_car_config(10));
        let mut riders = WaitingRiders::new(&system);
        system
            .add_external_request(6, Direction::Down)
            .expect("first press");
        assert_eq!(
            system.add_external_request(6, Direction::Down),
            Ok(CallOutcome::AlreadyRequested)
        );
        riders.wait(6, Direction::Down);
        riders.wait(6, Direction::Down);

        let report = drive(&mut system, &mut riders, 60);
        assert_eq!(report.car_calls, 2);
        assert_eq!(completed_floors(&system), vec![6, 1]);
    }

    #[test]
    fn same_seed_same_calls() {
        let params = ScenarioParams::default().with_seed(7).with_call_probability(0.5);
        let draw = |params: &ScenarioParams| {
            let mut traffic = TrafficGenerator::new(params);
            (0..50)
                .map(|_| traffic.next_call(50, 1))
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(&params), draw(&params));
    }

    #[test]
    fn calls_stay_inside_the_building() {
        let params = ScenarioParams::default().with_call_probability(1.0);
        let mut traffic = TrafficGenerator::new(&params);
        for _ in 0..200 {
            let call = traffic.next_call(10, 1).expect("always calls");
            match call.direction {
                Direction::Up => assert_eq!(call.floor, 1),
                Direction::Down => assert!((2..=10).contains(&call.floor)),
                Direction::Idle => panic!("idle call generated"),
            }
        }
    }

    #[test]
    fn destinations_skip_the_lobby() {
        let mut traffic = TrafficGenerator::new(&ScenarioParams::default());
        for _ in 0..100 {
            let floor = traffic
                .destination_in(&Zone::low_rise(), 1)
                .expect("zone above lobby");
            assert!((2..=20).contains(&floor));
        }
        assert_eq!(traffic.destination_in(&Zone::new("lobby", 1, 1), 1), None);
    }

    #[test]
    fn scenario_is_reproducible() {
        let params = ScenarioParams::default().with_ticks(300).with_seed(11);
        let run = || {
            let mut system = ElevatorSystem::new(SystemConfig::default()).expect("config");
            let report = run_scenario(&mut system, &params);
            (report, system.get_status())
        };
        let (first, first_status) = run();
        let (second, second_status) = run();
        assert_eq!(first, second);
        assert_eq!(first_status, second_status);
        assert_eq!(first.ticks, 300);
        assert!(first.hall_calls > 0);
        assert!(first.completed > 0);
        assert!(first.car_calls <= first.hall_calls);
    }
}
