use crate::elevator::{Elevator, ElevatorState};
use crate::request::ElevatorId;

use super::policy::{approaching, is_eligible, DispatchPolicy, HallCall};

/// Zone-aware scan dispatch.
///
/// Candidates are ranked in tiers, nearest first inside a tier, lowest id on ties:
///
/// 1. cars already stopping at the floor for this direction, or holding doors open there
/// 2. cars travelling toward the floor in the call direction that have not passed it
/// 3. idle cars
///
/// Busy cars heading elsewhere are not offered the call; it waits in the pending queue
/// until a car frees up.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZonedScanDispatch;

impl ZonedScanDispatch {
    fn tier(car: &Elevator, call: &HallCall) -> Option<u8> {
        let at_floor = car.current_floor() == call.floor;
        if car.stop_at(call.floor).is_some() || (at_floor && car.door_open()) {
            return Some(0);
        }
        if car.state() != ElevatorState::Idle && approaching(car, call.floor, call.direction) {
            return Some(1);
        }
        if car.state() == ElevatorState::Idle {
            return Some(2);
        }
        None
    }
}

impl DispatchPolicy for ZonedScanDispatch {
    fn name(&self) -> &'static str {
        "zoned_scan"
    }

    fn rank(&self, call: &HallCall, cars: &[Elevator], occupant_weight: u32) -> Vec<ElevatorId> {
        let mut scored: Vec<(u8, u32, ElevatorId)> = cars
            .iter()
            .filter(|car| is_eligible(car, call, occupant_weight))
            .filter_map(|car| {
                Self::tier(car, call)
                    .map(|tier| (tier, car.current_floor().abs_diff(call.floor), car.id()))
            })
            .collect();
        scored.sort_unstable();
        scored.into_iter().map(|(_, _, id)| id).collect()
    }
}
