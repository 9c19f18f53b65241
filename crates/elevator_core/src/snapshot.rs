//! Immutable views of the dispatcher for status polling, rendering and export.

use serde::{Deserialize, Serialize};

use crate::elevator::{Elevator, ElevatorState};
use crate::floor::Floor;
use crate::request::{Direction, ElevatorId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevatorSnapshot {
    pub id: ElevatorId,
    pub zone: String,
    pub zone_range: (u32, u32),
    pub floor: u32,
    pub direction: Direction,
    pub state: ElevatorState,
    pub weight: u32,
    pub max_weight: u32,
    pub targets: Vec<u32>,
    pub door_open: bool,
}

impl From<&Elevator> for ElevatorSnapshot {
    fn from(car: &Elevator) -> Self {
        Self {
            id: car.id(),
            zone: car.zone().name.clone(),
            zone_range: (car.zone().lowest, car.zone().highest),
            floor: car.current_floor(),
            direction: car.direction(),
            state: car.state(),
            weight: car.weight(),
            max_weight: car.max_weight(),
            targets: car.target_floors(),
            door_open: car.door_open(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSnapshot {
    pub number: u32,
    pub up_pressed: bool,
    pub down_pressed: bool,
}

impl From<&Floor> for FloorSnapshot {
    fn from(floor: &Floor) -> Self {
        Self {
            number: floor.number(),
            up_pressed: floor.up_pressed(),
            down_pressed: floor.down_pressed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub tick: u64,
    pub emergency: bool,
    pub pending: usize,
    pub elevators: Vec<ElevatorSnapshot>,
    pub floors: Vec<FloorSnapshot>,
}

impl SystemSnapshot {
    pub fn elevator(&self, id: ElevatorId) -> Option<&ElevatorSnapshot> {
        self.elevators.iter().find(|car| car.id == id)
    }

    pub fn floor(&self, number: u32) -> Option<&FloorSnapshot> {
        self.floors.iter().find(|floor| floor.number == number)
    }

    pub fn num_floors(&self) -> u32 {
        self.floors.len() as u32
    }

    /// Cars per state, in a fixed state order.
    pub fn state_counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for car in &self.elevators {
            counts.add(car.state);
        }
        counts
    }
}

/// Aggregated car states at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub idle: usize,
    pub moving: usize,
    pub door_cycle: usize,
    pub emergency: usize,
}

impl StateCounts {
    pub fn add(&mut self, state: ElevatorState) {
        match state {
            ElevatorState::Idle => self.idle += 1,
            ElevatorState::Moving => self.moving += 1,
            ElevatorState::DoorOpening | ElevatorState::DoorOpen | ElevatorState::DoorClosing => {
                self.door_cycle += 1
            }
            ElevatorState::Emergency => self.emergency += 1,
        }
    }
}

/// Running counters kept by the dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_floors: u32,
    pub total_elevators: usize,
    pub ticks: u64,
    pub requests_received: u64,
    pub requests_assigned: u64,
    pub requests_completed: u64,
    pub requests_rejected: u64,
    pub pending: usize,
}
