use thiserror::Error;

use crate::request::{Direction, ElevatorId};

/// Rejections reported by request submission. Every variant is raised before
/// any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// `elevator` is `None` when no car in the roster serves the floor.
    #[error("floor {floor} is outside the zone served by {}", zone_owner(.elevator))]
    ZoneViolation {
        elevator: Option<ElevatorId>,
        floor: u32,
    },
    #[error("elevator {elevator} would exceed {max_weight} lbs carrying {requested} lbs")]
    OverCapacity {
        elevator: ElevatorId,
        requested: u32,
        max_weight: u32,
    },
    #[error("floor {floor} is outside the building (1..={num_floors})")]
    InvalidFloor { floor: u32, num_floors: u32 },
    #[error("cannot call {direction} at floor {floor}")]
    InvalidDirection { floor: u32, direction: Direction },
    #[error("unknown elevator {0}")]
    UnknownElevator(ElevatorId),
    #[error("emergency stop is active; resume service first")]
    EmergencyActive,
}

impl DispatchError {
    /// Short machine-readable tag used in events and session logs.
    pub fn reason(&self) -> &'static str {
        match self {
            DispatchError::ZoneViolation { .. } => "zone_violation",
            DispatchError::OverCapacity { .. } => "over_capacity",
            DispatchError::InvalidFloor { .. } => "invalid_floor",
            DispatchError::InvalidDirection { .. } => "invalid_direction",
            DispatchError::UnknownElevator(_) => "unknown_elevator",
            DispatchError::EmergencyActive => "emergency_active",
        }
    }

    pub fn is_zone_violation(&self) -> bool {
        matches!(self, DispatchError::ZoneViolation { .. })
    }
}

fn zone_owner(elevator: &Option<ElevatorId>) -> String {
    match elevator {
        Some(id) => format!("elevator {id}"),
        None => "any elevator".to_string(),
    }
}

/// Problems found while loading or validating a [`crate::config::SystemConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("building needs at least 2 floors, got {0}")]
    TooFewFloors(u32),
    #[error("lobby floor {lobby} is outside 1..={num_floors}")]
    LobbyOutOfRange { lobby: u32, num_floors: u32 },
    #[error("configuration has no elevators")]
    NoElevators,
    #[error("elevator id {0} appears more than once")]
    DuplicateElevator(ElevatorId),
    #[error("zone `{zone}` of elevator {elevator} spans {lowest}..={highest}, outside 1..={num_floors}")]
    ZoneOutOfRange {
        elevator: ElevatorId,
        zone: String,
        lowest: u32,
        highest: u32,
        num_floors: u32,
    },
    #[error("elevator {elevator} cannot start at floor {floor}")]
    BadStartFloor { elevator: ElevatorId, floor: u32 },
    #[error("door phase `{0}` must last at least one tick")]
    ZeroDoorPhase(&'static str),
    #[error("occupant weight {occupant} exceeds car capacity {max}")]
    OccupantTooHeavy { occupant: u32, max: u32 },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
