//! Hall buttons and weight sensors for one floor.

use std::collections::BTreeMap;

use crate::request::{Direction, ElevatorId, Request, SequenceCounter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floor {
    number: u32,
    up_pressed: bool,
    down_pressed: bool,
    /// Last load reading per car, taken when that car stopped here.
    weight_sensors: BTreeMap<ElevatorId, u32>,
}

impl Floor {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            up_pressed: false,
            down_pressed: false,
            weight_sensors: BTreeMap::new(),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn up_pressed(&self) -> bool {
        self.up_pressed
    }

    pub fn down_pressed(&self) -> bool {
        self.down_pressed
    }

    pub fn is_pressed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up_pressed,
            Direction::Down => self.down_pressed,
            Direction::Idle => false,
        }
    }

    /// Presses the hall button. Returns `None` while that button is already lit,
    /// so repeated presses never mint a second request.
    pub fn request_elevator(
        &mut self,
        direction: Direction,
        seq: &mut SequenceCounter,
    ) -> Option<Request> {
        let button = match direction {
            Direction::Up => &mut self.up_pressed,
            Direction::Down => &mut self.down_pressed,
            Direction::Idle => return None,
        };
        if *button {
            return None;
        }
        *button = true;
        Some(Request::external(seq.next(), self.number, direction))
    }

    pub fn clear_button(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.up_pressed = false,
            Direction::Down => self.down_pressed = false,
            Direction::Idle => {}
        }
    }

    pub fn record_weight(&mut self, elevator: ElevatorId, weight: u32) {
        self.weight_sensors.insert(elevator, weight);
    }

    pub fn weight_reading(&self, elevator: ElevatorId) -> Option<u32> {
        self.weight_sensors.get(&elevator).copied()
    }
}
