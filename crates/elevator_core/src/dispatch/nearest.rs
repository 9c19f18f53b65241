use crate::elevator::Elevator;
use crate::request::ElevatorId;

use super::policy::{is_eligible, DispatchPolicy, HallCall};

/// Nearest-car dispatch: every eligible car, closest first, lowest id on ties.
///
/// Ignores heading and state, so a busy car may collect a call behind it and serve it
/// on the way back. Useful as a baseline against [`super::ZonedScanDispatch`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestCarDispatch;

impl DispatchPolicy for NearestCarDispatch {
    fn name(&self) -> &'static str {
        "nearest_car"
    }

    fn rank(&self, call: &HallCall, cars: &[Elevator], occupant_weight: u32) -> Vec<ElevatorId> {
        let mut scored: Vec<(u32, ElevatorId)> = cars
            .iter()
            .filter(|car| is_eligible(car, call, occupant_weight))
            .map(|car| (car.current_floor().abs_diff(call.floor), car.id()))
            .collect();
        scored.sort_unstable();
        scored.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DoorTimings, Zone};
    use crate::request::Direction;

    #[test]
    fn offers_busy_cars_too() {
        let mut busy = Elevator::new(1, Zone::low_rise(), 1, 10, 2200);
        busy.add_request(18, Direction::Up, 150).expect("accept");
        busy.advance(&DoorTimings::default());
        let idle = Elevator::new(2, Zone::low_rise(), 1, 1, 2200);

        let call = HallCall {
            floor: 8,
            direction: Direction::Up,
        };
        assert_eq!(NearestCarDispatch.rank(&call, &[busy, idle], 150), vec![1, 2]);
    }
}
