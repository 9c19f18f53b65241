//! Fixed-width ASCII rendering of a [`SystemSnapshot`].
//!
//! One row per floor, top floor first. Each car owns a column; the row where it stands
//! shows its door glyph, other rows show `*` where the car has a stop. Lit hall buttons
//! appear as `U`/`D` next to the floor number and moving cars get `^`/`v` at the row end.

use crate::elevator::ElevatorState;
use crate::request::Direction;
use crate::snapshot::{ElevatorSnapshot, SystemSnapshot};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: usize,
    pub title: String,
    pub show_status: bool,
    pub show_legend: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            title: "Elevator System".to_string(),
            show_status: true,
            show_legend: true,
        }
    }
}

impl RenderOptions {
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Building rows only.
    pub fn compact(mut self) -> Self {
        self.show_status = false;
        self.show_legend = false;
        self
    }
}

/// Door glyph for a car standing on its floor.
pub fn car_glyph(car: &ElevatorSnapshot) -> String {
    let doors = match car.state {
        ElevatorState::Idle | ElevatorState::Moving => "||||",
        ElevatorState::DoorOpening => " |>",
        ElevatorState::DoorOpen => " ||",
        ElevatorState::DoorClosing => "<| ",
        ElevatorState::Emergency => "!!!!",
    };
    format!("[E{}{}]", car.id, doors)
}

pub fn render(snapshot: &SystemSnapshot, options: &RenderOptions) -> String {
    let width = options.width.max(20);
    let mut lines = Vec::with_capacity(snapshot.floors.len() + snapshot.elevators.len() + 10);

    lines.push("=".repeat(width));
    let mut title = format!("{} - tick {}", options.title, snapshot.tick);
    if snapshot.emergency {
        title.push_str(" - EMERGENCY");
    }
    lines.push(center(&title, width));
    lines.push("=".repeat(width));

    if options.show_status {
        lines.push("Elevator Status:".to_string());
        for car in &snapshot.elevators {
            lines.push(format!(
                "#{}: Floor {}, Direction: {}, State: {}, Weight: {}lbs, Targets: {:?}",
                car.id, car.floor, car.direction, car.state, car.weight, car.targets
            ));
        }
        if snapshot.pending > 0 {
            lines.push(format!("Pending requests: {}", snapshot.pending));
        }
        lines.push("-".repeat(width));
    }

    let cell = snapshot
        .elevators
        .iter()
        .map(|car| car_glyph(car).len())
        .max()
        .unwrap_or(8);

    for floor in snapshot.floors.iter().rev() {
        let up = if floor.up_pressed { 'U' } else { ' ' };
        let down = if floor.down_pressed { 'D' } else { ' ' };
        let cells: Vec<String> = snapshot
            .elevators
            .iter()
            .map(|car| {
                if car.floor == floor.number {
                    format!("{:<cell$}", car_glyph(car))
                } else if car.targets.contains(&floor.number) {
                    center("*", cell)
                } else {
                    " ".repeat(cell)
                }
            })
            .collect();
        let markers: String = snapshot
            .elevators
            .iter()
            .filter(|car| car.floor == floor.number)
            .filter_map(|car| match car.direction {
                Direction::Up => Some('^'),
                Direction::Down => Some('v'),
                Direction::Idle => None,
            })
            .collect();

        let mut row = format!("{:>2} |{up}{down} {}", floor.number, cells.join(" "));
        if !markers.is_empty() {
            let pad = width.saturating_sub(row.chars().count() + markers.len()).max(1);
            row.push_str(&" ".repeat(pad));
            row.push_str(&markers);
        }
        lines.push(row.trim_end().to_string());
    }
    lines.push("=".repeat(width));

    if options.show_legend {
        lines.push("Legend:".to_string());
        lines.push(
            "[E#||||] closed  [E# |>] opening  [E# ||] open  [E#<| ] closing  [E#!!!!] emergency"
                .to_string(),
        );
        lines.push("* target floor  ^/v moving up/down  U/D hall call up/down".to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FloorSnapshot;

    fn car(id: u32, floor: u32, state: ElevatorState) -> ElevatorSnapshot {
        ElevatorSnapshot {
            id,
            zone: "low_rise".to_string(),
            zone_range: (1, 5),
            floor,
            direction: Direction::Idle,
            state,
            weight: 0,
            max_weight: 2200,
            targets: Vec::new(),
            door_open: false,
        }
    }

    fn building(elevators: Vec<ElevatorSnapshot>) -> SystemSnapshot {
        SystemSnapshot {
            tick: 4,
            emergency: false,
            pending: 0,
            elevators,
            floors: (1..=5)
                .map(|number| FloorSnapshot {
                    number,
                    up_pressed: false,
                    down_pressed: false,
                })
                .collect(),
        }
    }

    #[test]
    fn glyph_follows_door_phase() {
        assert_eq!(car_glyph(&car(1, 1, ElevatorState::Idle)), "[E1||||]");
        assert_eq!(car_glyph(&car(1, 1, ElevatorState::DoorOpening)), "[E1 |>]");
        assert_eq!(car_glyph(&car(1, 1, ElevatorState::DoorOpen)), "[E1 ||]");
        assert_eq!(car_glyph(&car(1, 1, ElevatorState::DoorClosing)), "[E1<| ]");
        assert_eq!(car_glyph(&car(2, 1, ElevatorState::Emergency)), "[E2!!!!]");
    }

    #[test]
    fn renders_rows_top_down_with_markers() {
        let mut moving = car(1, 2, ElevatorState::Moving);
        moving.direction = Direction::Up;
        moving.targets = vec![4];
        let mut snapshot = building(vec![moving, car(2, 5, ElevatorState::Idle)]);
        snapshot.floors[2].down_pressed = true;

        let text = render(&snapshot, &RenderOptions::default().compact());
        let rows: Vec<&str> = text.lines().skip(3).take(5).collect();

        assert!(rows[0].starts_with(" 5 |"));
        assert!(rows[0].contains("[E2||||]"));
        assert!(rows[1].starts_with(" 4 |"));
        assert!(rows[1].contains('*'));
        assert!(rows[2].starts_with(" 3 | D"));
        assert!(rows[3].contains("[E1||||]"));
        assert!(rows[3].ends_with('^'));
        assert!(rows[4].starts_with(" 1 |"));
    }

    #[test]
    fn header_flags_emergency() {
        let mut snapshot = building(vec![car(1, 1, ElevatorState::Emergency)]);
        snapshot.emergency = true;
        let text = render(&snapshot, &RenderOptions::default());
        assert!(text.contains("tick 4 - EMERGENCY"));
        assert!(text.contains("[E1!!!!]"));
        assert!(text.contains("Legend:"));
    }
}
