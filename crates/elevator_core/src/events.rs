//! Change notifications emitted by the dispatcher.
//!
//! Observers either subscribe an [`EventSink`] (push) or drain the bounded
//! [`EventJournal`] kept by the dispatcher (pull). Both see the same events in the
//! same order.

use std::collections::VecDeque;

use serde::Serialize;

use crate::elevator::ElevatorState;
use crate::request::{Direction, ElevatorId, Request, RequestKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SystemEventKind {
    FloorChanged {
        elevator: ElevatorId,
        from: u32,
        to: u32,
        direction: Direction,
    },
    DirectionChanged {
        elevator: ElevatorId,
        floor: u32,
        from: Direction,
        to: Direction,
    },
    StateChanged {
        elevator: ElevatorId,
        floor: u32,
        from: ElevatorState,
        to: ElevatorState,
    },
    RequestAssigned {
        request: Request,
        elevator: ElevatorId,
    },
    RequestQueued {
        request: Request,
    },
    RequestRejected {
        kind: RequestKind,
        floor: u32,
        elevator: Option<ElevatorId>,
        reason: &'static str,
        detail: String,
    },
    RequestCompleted {
        elevator: ElevatorId,
        floor: u32,
        direction: Direction,
        remaining: Vec<u32>,
    },
    EmergencyStopped,
    ServiceResumed,
}

/// One notification, stamped with the tick it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub kind: SystemEventKind,
}

impl SystemEvent {
    /// Car the event is about, if any.
    pub fn elevator(&self) -> Option<ElevatorId> {
        match &self.kind {
            SystemEventKind::FloorChanged { elevator, .. }
            | SystemEventKind::DirectionChanged { elevator, .. }
            | SystemEventKind::StateChanged { elevator, .. }
            | SystemEventKind::RequestAssigned { elevator, .. }
            | SystemEventKind::RequestCompleted { elevator, .. } => Some(*elevator),
            SystemEventKind::RequestRejected { elevator, .. } => *elevator,
            SystemEventKind::RequestQueued { .. }
            | SystemEventKind::EmergencyStopped
            | SystemEventKind::ServiceResumed => None,
        }
    }
}

/// Receives every event as it is emitted.
pub trait EventSink: Send {
    fn on_event(&mut self, event: &SystemEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&SystemEvent) + Send,
{
    fn on_event(&mut self, event: &SystemEvent) {
        self(event)
    }
}

/// Rolling buffer of the most recent events.
#[derive(Debug, Clone)]
pub struct EventJournal {
    events: VecDeque<SystemEvent>,
    capacity: usize,
    dropped: u64,
    pushed: u64,
}

impl EventJournal {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            dropped: 0,
            pushed: 0,
        }
    }

    pub fn push(&mut self, event: SystemEvent) {
        self.pushed += 1;
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<SystemEvent> {
        self.events.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events ever pushed. Pass it to [`EventJournal::since`] later to read
    /// what arrived in between without draining.
    pub fn mark(&self) -> u64 {
        self.pushed
    }

    /// Events pushed after `mark` that are still held.
    pub fn since(&self, mark: u64) -> impl Iterator<Item = &SystemEvent> {
        let first_held = self.pushed - self.events.len() as u64;
        let skip = mark.saturating_sub(first_held) as usize;
        self.events.iter().skip(skip)
    }

    /// Events evicted because the journal was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
