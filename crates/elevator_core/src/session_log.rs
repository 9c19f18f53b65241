//! Human-readable session log built from dispatcher events.

use crate::events::{EventSink, SystemEvent, SystemEventKind};

/// Log target used for every session line, so a host can route them to their own file.
pub const SESSION_TARGET: &str = "elevator::session";

/// Writes one session line per event through the `log` facade.
///
/// Rejections are logged at `warn`, everything else at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionLogger;

impl EventSink for SessionLogger {
    fn on_event(&mut self, event: &SystemEvent) {
        let line = format_event(event);
        if matches!(event.kind, SystemEventKind::RequestRejected { .. }) {
            log::warn!(target: SESSION_TARGET, "{line}");
        } else {
            log::info!(target: SESSION_TARGET, "{line}");
        }
    }
}

/// Renders an event as a session-log line.
pub fn format_event(event: &SystemEvent) -> String {
    match &event.kind {
        SystemEventKind::FloorChanged {
            elevator,
            from,
            to,
            direction,
        } => format!("MOVE: E{elevator} {direction} F{from}→F{to}"),
        SystemEventKind::DirectionChanged {
            elevator,
            floor,
            from,
            to,
        } => format!("DIRECTION: E{elevator} at F{floor} changed {from}→{to}"),
        SystemEventKind::StateChanged {
            elevator,
            floor,
            from,
            to,
        } => format!("STATE: E{elevator} at F{floor} changed {from}→{to}"),
        SystemEventKind::RequestAssigned { request, elevator } => format!(
            "REQUEST: {} request F{} {} assigned to E{elevator}",
            request.kind.as_str(),
            request.stop_floor(),
            request.direction
        ),
        SystemEventKind::RequestQueued { request } => format!(
            "QUEUED: {} request F{} {} (seq {})",
            request.kind.as_str(),
            request.stop_floor(),
            request.direction,
            request.seq
        ),
        SystemEventKind::RequestRejected {
            kind,
            floor,
            elevator,
            detail,
            ..
        } => match elevator {
            Some(id) => format!("REJECTED: {} request F{floor} by E{id} - {detail}", kind.as_str()),
            None => format!("REJECTED: {} request F{floor} - {detail}", kind.as_str()),
        },
        SystemEventKind::RequestCompleted {
            elevator,
            floor,
            direction,
            remaining,
        } => format!(
            "COMPLETED: E{elevator} F{floor} {direction} request, remaining targets: {remaining:?}"
        ),
        SystemEventKind::EmergencyStopped => "EMERGENCY: all elevators stopped".to_string(),
        SystemEventKind::ServiceResumed => "RESUMED: normal service restored".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevator::ElevatorState;
    use crate::request::{Direction, Request, RequestKind};

    fn at(kind: SystemEventKind) -> SystemEvent {
        SystemEvent { tick: 3, kind }
    }

    #[test]
    fn formats_movement_and_state_lines() {
        let line = format_event(&at(SystemEventKind::FloorChanged {
            elevator: 2,
            from: 4,
            to: 5,
            direction: Direction::Up,
        }));
        assert_eq!(line, "MOVE: E2 up F4→F5");

        let line = format_event(&at(SystemEventKind::StateChanged {
            elevator: 2,
            floor: 5,
            from: ElevatorState::Moving,
            to: ElevatorState::DoorOpening,
        }));
        assert_eq!(line, "STATE: E2 at F5 changed moving→door_opening");
    }

    #[test]
    fn formats_request_lines() {
        let line = format_event(&at(SystemEventKind::RequestAssigned {
            request: Request::external(7, 12, Direction::Down),
            elevator: 1,
        }));
        assert_eq!(line, "REQUEST: external request F12 down assigned to E1");

        let line = format_event(&at(SystemEventKind::RequestRejected {
            kind: RequestKind::Internal,
            floor: 30,
            elevator: Some(1),
            reason: "zone_violation",
            detail: "elevator 1 cannot serve floor 30".to_string(),
        }));
        assert!(line.starts_with("REJECTED: internal request F30 by E1"));
    }
}
