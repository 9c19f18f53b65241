#![allow(dead_code)]

use elevator_core::elevator::ElevatorState;
use elevator_core::events::{SystemEvent, SystemEventKind};
use elevator_core::request::ElevatorId;
use elevator_core::system::ElevatorSystem;
use elevator_core::test_helpers::assert_invariants;

/// Steps `ticks` times, checking invariants after every step.
pub fn step_checked(system: &mut ElevatorSystem, ticks: u64) {
    for _ in 0..ticks {
        system.step();
        assert_invariants(system);
    }
}

pub fn state_of(system: &ElevatorSystem, id: ElevatorId) -> ElevatorState {
    system.elevator(id).expect("known elevator").state()
}

pub fn floor_of(system: &ElevatorSystem, id: ElevatorId) -> u32 {
    system.elevator(id).expect("known elevator").current_floor()
}

/// Floors of every completed stop, in completion order.
pub fn completed_floors(events: &[SystemEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match &event.kind {
            SystemEventKind::RequestCompleted { floor, .. } => Some(*floor),
            _ => None,
        })
        .collect()
}

/// Short names of event kinds, for order assertions.
pub fn kind_names(events: &[SystemEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|event| match &event.kind {
            SystemEventKind::FloorChanged { .. } => "floor",
            SystemEventKind::DirectionChanged { .. } => "direction",
            SystemEventKind::StateChanged { .. } => "state",
            SystemEventKind::RequestAssigned { .. } => "assigned",
            SystemEventKind::RequestQueued { .. } => "queued",
            SystemEventKind::RequestRejected { .. } => "rejected",
            SystemEventKind::RequestCompleted { .. } => "completed",
            SystemEventKind::EmergencyStopped => "emergency",
            SystemEventKind::ServiceResumed => "resumed",
        })
        .collect()
}
