//! Per-car state machine: scan movement, door cycling, load and zone checks.
//!
//! A car is a plain record owned by the dispatcher. It never reaches back into its
//! owner: [`Elevator::advance`] reports an [`Arrival`] and the dispatcher turns that
//! into button clears and notifications.
//!
//! ```text
//! idle ──targets──▶ moving ──at stop──▶ door_opening ──▶ door_open ──▶ door_closing
//!   ▲                 ▲                                                   │
//!   └──── no targets ─┴──────────────── targets remain ◀──────────────────┘
//! any ──emergency_stop──▶ emergency ──resume_service──▶ idle
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{DoorTimings, Zone};
use crate::error::DispatchError;
use crate::request::{Direction, ElevatorId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevatorState {
    Idle,
    Moving,
    DoorOpening,
    DoorOpen,
    DoorClosing,
    Emergency,
}

impl ElevatorState {
    pub fn as_str(self) -> &'static str {
        match self {
            ElevatorState::Idle => "idle",
            ElevatorState::Moving => "moving",
            ElevatorState::DoorOpening => "door_opening",
            ElevatorState::DoorOpen => "door_open",
            ElevatorState::DoorClosing => "door_closing",
            ElevatorState::Emergency => "emergency",
        }
    }

    pub fn is_door_phase(self) -> bool {
        matches!(
            self,
            ElevatorState::DoorOpening | ElevatorState::DoorOpen | ElevatorState::DoorClosing
        )
    }
}

impl std::fmt::Display for ElevatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled stop: the direction it was requested for and the load it reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub direction: Direction,
    pub load: u32,
}

/// How an accepted request landed on the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// New stop added and load reserved.
    Added,
    /// The floor was already a stop; nothing changed.
    AlreadyStopping,
    /// The car is standing at that floor with doors opening or open.
    Absorbed,
}

/// A stop that was just reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub floor: u32,
    /// Direction the stop was requested for.
    pub direction: Direction,
}

#[derive(Debug, Clone)]
pub struct Elevator {
    id: ElevatorId,
    zone: Zone,
    lobby_floor: u32,
    current_floor: u32,
    direction: Direction,
    state: ElevatorState,
    targets: BTreeMap<u32, Stop>,
    weight: u32,
    max_weight: u32,
    door_ticks: u32,
}

impl Elevator {
    pub fn new(
        id: ElevatorId,
        zone: Zone,
        lobby_floor: u32,
        start_floor: u32,
        max_weight: u32,
    ) -> Self {
        Self {
            id,
            zone,
            lobby_floor,
            current_floor: start_floor,
            direction: Direction::Idle,
            state: ElevatorState::Idle,
            targets: BTreeMap::new(),
            weight: 0,
            max_weight,
            door_ticks: 0,
        }
    }

    pub fn id(&self) -> ElevatorId {
        self.id
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn current_floor(&self) -> u32 {
        self.current_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> ElevatorState {
        self.state
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn max_weight(&self) -> u32 {
        self.max_weight
    }

    /// Ticks left in the current door phase; zero outside door phases.
    pub fn door_ticks(&self) -> u32 {
        self.door_ticks
    }

    /// Doors opening or fully open.
    pub fn door_open(&self) -> bool {
        matches!(
            self.state,
            ElevatorState::DoorOpening | ElevatorState::DoorOpen
        )
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn target_floors(&self) -> Vec<u32> {
        self.targets.keys().copied().collect()
    }

    pub fn stop_at(&self, floor: u32) -> Option<&Stop> {
        self.targets.get(&floor)
    }

    pub fn can_serve_floor(&self, floor: u32) -> bool {
        self.zone.contains(floor) || floor == self.lobby_floor
    }

    pub fn has_room_for(&self, load: u32) -> bool {
        self.weight.saturating_add(load) <= self.max_weight
    }

    /// Schedules a stop at `floor`, reserving `load` pounds.
    ///
    /// Zone and load checks run first; a rejected call leaves the car untouched.
    pub fn add_request(
        &mut self,
        floor: u32,
        direction: Direction,
        load: u32,
    ) -> Result<Admission, DispatchError> {
        if !self.can_serve_floor(floor) {
            return Err(DispatchError::ZoneViolation {
                elevator: Some(self.id),
                floor,
            });
        }
        if self.state == ElevatorState::Emergency {
            return Err(DispatchError::EmergencyActive);
        }
        if self.door_open() && floor == self.current_floor && self.heading_compatible(direction)
        {
            return Ok(Admission::Absorbed);
        }
        if let Some(stop) = self.targets.get_mut(&floor) {
            // Only a car call for the car's own floor is keyed idle; a hall call keys it
            // so arrival clears that button.
            if stop.direction == Direction::Idle {
                stop.direction = direction;
            }
            return Ok(Admission::AlreadyStopping);
        }
        if !self.has_room_for(load) {
            return Err(DispatchError::OverCapacity {
                elevator: self.id,
                requested: self.weight.saturating_add(load),
                max_weight: self.max_weight,
            });
        }

        self.targets.insert(floor, Stop { direction, load });
        self.weight += load;
        if self.direction == Direction::Idle {
            self.direction = self.scan_direction();
        }
        if self.state == ElevatorState::Idle {
            self.state = ElevatorState::Moving;
        }
        Ok(Admission::Added)
    }

    /// Advances the car by one tick. At most one state transition happens per call.
    pub fn advance(&mut self, door: &DoorTimings) -> Option<Arrival> {
        match self.state {
            ElevatorState::Emergency => None,
            ElevatorState::Idle => {
                // Cars resumed from an emergency still hold their stops.
                if self.has_targets() {
                    self.direction = self.scan_direction();
                    self.state = ElevatorState::Moving;
                }
                None
            }
            ElevatorState::Moving => self.step_moving(door),
            ElevatorState::DoorOpening => {
                if self.tick_door() {
                    self.state = ElevatorState::DoorOpen;
                    self.door_ticks = door.open_ticks;
                }
                None
            }
            ElevatorState::DoorOpen => {
                if self.tick_door() {
                    self.state = ElevatorState::DoorClosing;
                    self.door_ticks = door.closing_ticks;
                }
                None
            }
            ElevatorState::DoorClosing => {
                if self.tick_door() {
                    if self.has_targets() {
                        self.direction = self.scan_direction();
                        self.state = ElevatorState::Moving;
                    } else {
                        self.direction = Direction::Idle;
                        self.state = ElevatorState::Idle;
                    }
                }
                None
            }
        }
    }

    /// Freezes the car. Stops are kept; a door phase in progress is abandoned.
    pub fn emergency_stop(&mut self) -> ElevatorState {
        let previous = self.state;
        self.state = ElevatorState::Emergency;
        self.door_ticks = 0;
        previous
    }

    /// Returns `true` when the car left the emergency state.
    pub fn resume_service(&mut self) -> bool {
        if self.state != ElevatorState::Emergency {
            return false;
        }
        self.state = ElevatorState::Idle;
        true
    }

    fn step_moving(&mut self, door: &DoorTimings) -> Option<Arrival> {
        if !self.has_targets() {
            self.direction = Direction::Idle;
            self.state = ElevatorState::Idle;
            return None;
        }
        if self.targets.contains_key(&self.current_floor) {
            return self.arrive(door);
        }

        self.direction = self.scan_direction();
        match self.direction {
            Direction::Up => self.current_floor += 1,
            Direction::Down => self.current_floor = self.current_floor.saturating_sub(1),
            Direction::Idle => {}
        }

        if self.targets.contains_key(&self.current_floor) {
            self.arrive(door)
        } else {
            None
        }
    }

    fn arrive(&mut self, door: &DoorTimings) -> Option<Arrival> {
        let stop = self.targets.remove(&self.current_floor)?;
        self.weight = self.weight.saturating_sub(stop.load);
        self.state = ElevatorState::DoorOpening;
        self.door_ticks = door.opening_ticks;
        self.direction = self.scan_direction();
        Some(Arrival {
            floor: self.current_floor,
            direction: stop.direction,
        })
    }

    /// Counts down the door timer; `true` once the phase has elapsed.
    fn tick_door(&mut self) -> bool {
        self.door_ticks = self.door_ticks.saturating_sub(1);
        self.door_ticks == 0
    }

    fn heading_compatible(&self, direction: Direction) -> bool {
        self.direction == Direction::Idle
            || direction == Direction::Idle
            || self.direction == direction
    }

    /// Keeps the current heading while any stop lies ahead, otherwise reverses.
    fn scan_direction(&self) -> Direction {
        if self.targets.is_empty() {
            return Direction::Idle;
        }
        let floor = self.current_floor;
        let ahead_up = self.targets.range(floor + 1..).next().is_some();
        let ahead_down = self.targets.range(..floor).next().is_some();

        match self.direction {
            Direction::Up if ahead_up => Direction::Up,
            Direction::Up if ahead_down => Direction::Down,
            Direction::Up => Direction::Up,
            Direction::Down if ahead_down => Direction::Down,
            Direction::Down if ahead_up => Direction::Up,
            Direction::Down => Direction::Down,
            Direction::Idle => self.heading_to_nearest(),
        }
    }

    fn heading_to_nearest(&self) -> Direction {
        let floor = self.current_floor;
        let nearest = self
            .targets
            .iter()
            .min_by_key(|(target, _)| (target.abs_diff(floor), **target));
        match nearest {
            None => Direction::Idle,
            Some((target, stop)) if *target == floor => match stop.direction {
                Direction::Down => Direction::Down,
                _ => Direction::Up,
            },
            Some((target, _)) => Direction::between(floor, *target),
        }
    }
}
