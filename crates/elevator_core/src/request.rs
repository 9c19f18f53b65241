//! Calls and the value types shared by floors, cars and the dispatcher.

use serde::{Deserialize, Serialize};

/// Identifier of one car. Ids come from the configuration and are unique per system.
pub type ElevatorId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    /// Direction of travel from `from` to `to`; `Idle` when they are the same floor.
    pub fn between(from: u32, to: u32) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => Direction::Idle,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Idle => "idle",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "idle" => Ok(Direction::Idle),
            other => Err(format!("unknown direction `{other}`")),
        }
    }
}

/// Where a call came from. Internal calls are pressed inside a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Internal,
    External,
}

impl RequestKind {
    /// Queue priority: higher is served first.
    pub fn priority(self) -> u8 {
        match self {
            RequestKind::Internal => 1,
            RequestKind::External => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Internal => "internal",
            RequestKind::External => "external",
        }
    }
}

/// Monotonic creation counter. Owned by the dispatcher and threaded through
/// every place that mints a [`Request`].
#[derive(Debug, Default, Clone)]
pub struct SequenceCounter {
    next: u64,
}

impl SequenceCounter {
    pub fn next(&mut self) -> u64 {
        let seq = self.next;
        self.next += 1;
        seq
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// An immutable call. External calls carry only the hall floor and direction;
/// internal calls are bound to the car they were pressed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub seq: u64,
    pub source_floor: u32,
    pub target_floor: Option<u32>,
    pub direction: Direction,
    pub kind: RequestKind,
    pub elevator_id: Option<ElevatorId>,
}

impl Request {
    pub fn external(seq: u64, floor: u32, direction: Direction) -> Self {
        Self {
            seq,
            source_floor: floor,
            target_floor: None,
            direction,
            kind: RequestKind::External,
            elevator_id: None,
        }
    }

    pub fn internal(seq: u64, elevator_id: ElevatorId, current_floor: u32, target: u32) -> Self {
        Self {
            seq,
            source_floor: current_floor,
            target_floor: Some(target),
            direction: Direction::between(current_floor, target),
            kind: RequestKind::Internal,
            elevator_id: Some(elevator_id),
        }
    }

    /// Floor the assigned car has to stop at.
    pub fn stop_floor(&self) -> u32 {
        self.target_floor.unwrap_or(self.source_floor)
    }
}
