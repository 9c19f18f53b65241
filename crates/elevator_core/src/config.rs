//! System configuration: building size, zones, door timing and load limits.
//!
//! A [`SystemConfig`] is built once (defaults, builder methods or a JSON file) and
//! handed to [`crate::system::ElevatorSystem::new`]. The dispatcher never reads
//! tunables from anywhere else.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::request::ElevatorId;

const DEFAULT_NUM_FLOORS: u32 = 50;
const DEFAULT_LOBBY_FLOOR: u32 = 1;
/// Car capacity in pounds.
const DEFAULT_MAX_WEIGHT: u32 = 2200;
/// Load reserved per accepted stop, in pounds.
const DEFAULT_OCCUPANT_WEIGHT: u32 = 150;
const DEFAULT_JOURNAL_CAPACITY: usize = 10_000;

/// Contiguous floor range a car is restricted to. The lobby is always allowed on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub lowest: u32,
    pub highest: u32,
}

impl Zone {
    pub fn new(name: impl Into<String>, lowest: u32, highest: u32) -> Self {
        Self {
            name: name.into(),
            lowest,
            highest,
        }
    }

    pub fn low_rise() -> Self {
        Self::new("low_rise", 1, 20)
    }

    pub fn mid_rise() -> Self {
        Self::new("mid_rise", 21, 35)
    }

    pub fn high_rise() -> Self {
        Self::new("high_rise", 36, 50)
    }

    pub fn contains(&self, floor: u32) -> bool {
        (self.lowest..=self.highest).contains(&floor)
    }
}

/// Tick counts for each door phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorTimings {
    pub opening_ticks: u32,
    pub open_ticks: u32,
    pub closing_ticks: u32,
}

impl Default for DoorTimings {
    fn default() -> Self {
        Self {
            opening_ticks: 2,
            open_ticks: 3,
            closing_ticks: 2,
        }
    }
}

impl DoorTimings {
    /// Ticks from arrival until the car is idle or moving again.
    pub fn cycle_ticks(&self) -> u32 {
        self.opening_ticks + self.open_ticks + self.closing_ticks
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarConfig {
    pub id: ElevatorId,
    pub zone: Zone,
    /// Starting floor; the lobby when absent.
    #[serde(default)]
    pub start_floor: Option<u32>,
}

impl CarConfig {
    pub fn new(id: ElevatorId, zone: Zone) -> Self {
        Self {
            id,
            zone,
            start_floor: None,
        }
    }

    pub fn starting_at(mut self, floor: u32) -> Self {
        self.start_floor = Some(floor);
        self
    }
}

/// Which [`crate::dispatch::DispatchPolicy`] ranks cars for hall calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStrategy {
    #[default]
    ZonedScan,
    NearestCar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub num_floors: u32,
    pub lobby_floor: u32,
    pub door: DoorTimings,
    pub max_weight: u32,
    pub occupant_weight: u32,
    pub cars: Vec<CarConfig>,
    pub dispatch: DispatchStrategy,
    /// Number of events kept for [`crate::system::ElevatorSystem::drain_events`].
    pub event_journal_capacity: usize,
}

impl Default for SystemConfig {
    /// Reference building: 50 floors, two cars per zone.
    fn default() -> Self {
        Self {
            num_floors: DEFAULT_NUM_FLOORS,
            lobby_floor: DEFAULT_LOBBY_FLOOR,
            door: DoorTimings::default(),
            max_weight: DEFAULT_MAX_WEIGHT,
            occupant_weight: DEFAULT_OCCUPANT_WEIGHT,
            cars: vec![
                CarConfig::new(1, Zone::low_rise()),
                CarConfig::new(2, Zone::low_rise()),
                CarConfig::new(3, Zone::mid_rise()),
                CarConfig::new(4, Zone::mid_rise()),
                CarConfig::new(5, Zone::high_rise()),
                CarConfig::new(6, Zone::high_rise()),
            ],
            dispatch: DispatchStrategy::default(),
            event_journal_capacity: DEFAULT_JOURNAL_CAPACITY,
        }
    }
}

impl SystemConfig {
    pub fn with_floors(mut self, num_floors: u32) -> Self {
        self.num_floors = num_floors;
        self
    }

    pub fn with_lobby(mut self, lobby_floor: u32) -> Self {
        self.lobby_floor = lobby_floor;
        self
    }

    pub fn with_cars(mut self, cars: Vec<CarConfig>) -> Self {
        self.cars = cars;
        self
    }

    pub fn with_door_timings(mut self, door: DoorTimings) -> Self {
        self.door = door;
        self
    }

    /// Car capacity and the load reserved per accepted stop, both in pounds.
    pub fn with_weights(mut self, max_weight: u32, occupant_weight: u32) -> Self {
        self.max_weight = max_weight;
        self.occupant_weight = occupant_weight;
        self
    }

    pub fn with_dispatch(mut self, dispatch: DispatchStrategy) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_journal_capacity(mut self, capacity: usize) -> Self {
        self.event_journal_capacity = capacity;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn is_valid_floor(&self, floor: u32) -> bool {
        (1..=self.num_floors).contains(&floor)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_floors < 2 {
            return Err(ConfigError::TooFewFloors(self.num_floors));
        }
        if !self.is_valid_floor(self.lobby_floor) {
            return Err(ConfigError::LobbyOutOfRange {
                lobby: self.lobby_floor,
                num_floors: self.num_floors,
            });
        }
        if self.cars.is_empty() {
            return Err(ConfigError::NoElevators);
        }
        for (phase, ticks) in [
            ("opening", self.door.opening_ticks),
            ("open", self.door.open_ticks),
            ("closing", self.door.closing_ticks),
        ] {
            if ticks == 0 {
                return Err(ConfigError::ZeroDoorPhase(phase));
            }
        }
        if self.occupant_weight > self.max_weight {
            return Err(ConfigError::OccupantTooHeavy {
                occupant: self.occupant_weight,
                max: self.max_weight,
            });
        }

        let mut seen = BTreeSet::new();
        for car in &self.cars {
            if !seen.insert(car.id) {
                return Err(ConfigError::DuplicateElevator(car.id));
            }
            let zone = &car.zone;
            if zone.lowest > zone.highest
                || !self.is_valid_floor(zone.lowest)
                || !self.is_valid_floor(zone.highest)
            {
                return Err(ConfigError::ZoneOutOfRange {
                    elevator: car.id,
                    zone: zone.name.clone(),
                    lowest: zone.lowest,
                    highest: zone.highest,
                    num_floors: self.num_floors,
                });
            }
            let start = car.start_floor.unwrap_or(self.lobby_floor);
            if !self.is_valid_floor(start) || !(zone.contains(start) || start == self.lobby_floor)
            {
                return Err(ConfigError::BadStartFloor {
                    elevator: car.id,
                    floor: start,
                });
            }
        }
        Ok(())
    }
}
