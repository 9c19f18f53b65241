use crate::elevator::{Elevator, ElevatorState};
use crate::request::{Direction, ElevatorId};

/// A hall call waiting for a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HallCall {
    pub floor: u32,
    pub direction: Direction,
}

/// Ranks cars for hall calls.
///
/// The dispatcher offers the call to the ranked cars in order and stops at the first
/// that accepts it, so a policy only decides preference. Cars left out of the ranking
/// are never tried; an empty ranking leaves the call pending.
///
/// # Examples
///
/// ```rust
/// use elevator_core::config::Zone;
/// use elevator_core::dispatch::{DispatchPolicy, HallCall, ZonedScanDispatch};
/// use elevator_core::elevator::Elevator;
/// use elevator_core::request::Direction;
///
/// let cars = vec![
///     Elevator::new(1, Zone::low_rise(), 1, 1, 2200),
///     Elevator::new(3, Zone::mid_rise(), 1, 21, 2200),
/// ];
/// let call = HallCall { floor: 25, direction: Direction::Up };
/// assert_eq!(ZonedScanDispatch.rank(&call, &cars, 150), vec![3]);
/// ```
pub trait DispatchPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Cars to try for `call`, best first.
    fn rank(&self, call: &HallCall, cars: &[Elevator], occupant_weight: u32) -> Vec<ElevatorId>;
}

/// Whether `car` may be offered `call` at all.
///
/// The car must serve the floor, be out of emergency, have room for one more occupant
/// unless it already stops there, and must not hold a stop at that floor for the
/// opposite direction.
pub fn is_eligible(car: &Elevator, call: &HallCall, occupant_weight: u32) -> bool {
    if !car.can_serve_floor(call.floor) || car.state() == ElevatorState::Emergency {
        return false;
    }
    match car.stop_at(call.floor) {
        Some(stop) => stop.direction == call.direction || stop.direction == Direction::Idle,
        None => car.has_room_for(occupant_weight),
    }
}

/// Whether a travelling car will still pass `floor` heading in `direction`.
pub fn approaching(car: &Elevator, floor: u32, direction: Direction) -> bool {
    if car.direction() != direction {
        return false;
    }
    match direction {
        Direction::Up => car.current_floor() <= floor,
        Direction::Down => car.current_floor() >= floor,
        Direction::Idle => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Zone;

    #[test]
    fn ineligible_outside_zone_or_in_emergency() {
        let mut car = Elevator::new(1, Zone::low_rise(), 1, 1, 2200);
        let call = HallCall {
            floor: 25,
            direction: Direction::Up,
        };
        assert!(!is_eligible(&car, &call, 150));

        let lobby = HallCall {
            floor: 1,
            direction: Direction::Up,
        };
        assert!(is_eligible(&car, &lobby, 150));
        car.emergency_stop();
        assert!(!is_eligible(&car, &lobby, 150));
    }

    #[test]
    fn full_car_only_takes_calls_it_already_stops_for() {
        let mut car = Elevator::new(1, Zone::low_rise(), 1, 1, 150);
        car.add_request(6, Direction::Up, 150).expect("fill");

        let same = HallCall {
            floor: 6,
            direction: Direction::Up,
        };
        let opposite = HallCall {
            floor: 6,
            direction: Direction::Down,
        };
        let other = HallCall {
            floor: 7,
            direction: Direction::Up,
        };
        assert!(is_eligible(&car, &same, 150));
        assert!(!is_eligible(&car, &opposite, 150));
        assert!(!is_eligible(&car, &other, 150));
    }

    #[test]
    fn approaching_requires_matching_heading() {
        let mut car = Elevator::new(1, Zone::low_rise(), 1, 5, 2200);
        car.add_request(12, Direction::Up, 150).expect("accept");
        assert!(approaching(&car, 9, Direction::Up));
        assert!(approaching(&car, 5, Direction::Up));
        assert!(!approaching(&car, 4, Direction::Up));
        assert!(!approaching(&car, 9, Direction::Down));
    }
}
