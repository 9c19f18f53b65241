//! Shared fixtures and checks for unit tests, integration tests and benches.

use crate::config::{CarConfig, SystemConfig, Zone};
use crate::elevator::ElevatorState;
use crate::request::{Direction, RequestKind};
use crate::system::ElevatorSystem;

/// One car serving every floor of a `num_floors` building.
pub fn single_car_config(num_floors: u32) -> SystemConfig {
    SystemConfig::default()
        .with_floors(num_floors)
        .with_cars(vec![CarConfig::new(1, Zone::new("all", 1, num_floors))])
}

/// Reference 50-floor building with car 1 in the low-rise zone and car 3 parked at the
/// bottom of the mid-rise zone.
pub fn two_zone_config() -> SystemConfig {
    SystemConfig::default().with_cars(vec![
        CarConfig::new(1, Zone::low_rise()),
        CarConfig::new(3, Zone::mid_rise()).starting_at(21),
    ])
}

/// Builds a system from a fixture config.
///
/// # Panics
///
/// Panics if the configuration is invalid.
pub fn build_system(config: SystemConfig) -> ElevatorSystem {
    ElevatorSystem::new(config).expect("fixture config should be valid")
}

/// Checks the invariants that must hold between any two calls.
///
/// # Panics
///
/// Panics with a description of the first violated invariant.
pub fn assert_invariants(system: &ElevatorSystem) {
    let config = system.config();
    for car in system.elevators() {
        let id = car.id();
        assert!(
            config.is_valid_floor(car.current_floor()),
            "E{id} left the building at F{}",
            car.current_floor()
        );
        assert!(
            car.can_serve_floor(car.current_floor()),
            "E{id} is outside its zone at F{}",
            car.current_floor()
        );
        assert!(
            car.weight() <= car.max_weight(),
            "E{id} carries {} lbs over its {} lbs limit",
            car.weight(),
            car.max_weight()
        );
        assert_eq!(
            car.direction() == Direction::Idle,
            !car.has_targets(),
            "E{id} heads {} with stops {:?}",
            car.direction(),
            car.target_floors()
        );
        for floor in car.target_floors() {
            assert!(car.can_serve_floor(floor), "E{id} holds unserviceable stop F{floor}");
        }
        if system.is_emergency() {
            assert_eq!(
                car.state(),
                ElevatorState::Emergency,
                "E{id} is not frozen during emergency"
            );
        }
        if !car.state().is_door_phase() {
            assert_eq!(car.door_ticks(), 0, "E{id} has a door timer outside a door phase");
        }
    }
    for request in system.pending_requests() {
        if request.kind == RequestKind::External {
            let lit = system
                .floor(request.source_floor)
                .is_some_and(|floor| floor.is_pressed(request.direction));
            assert!(lit, "pending hall call F{} has no lit button", request.source_floor);
        }
    }
}
