//! Thread-safe handle around one dispatcher.
//!
//! Every call takes the same lock, so requests, steps and emergency commands are
//! serialized. Status reads are served from a short-lived snapshot cache.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::error::DispatchError;
use crate::events::SystemEvent;
use crate::request::{Direction, ElevatorId};
use crate::snapshot::{SystemSnapshot, SystemStats};
use crate::system::{Ack, CallOutcome, ElevatorSystem};

pub const DEFAULT_STATUS_TTL: Duration = Duration::from_millis(50);

struct Inner {
    system: ElevatorSystem,
    cached: Option<(Instant, SystemSnapshot)>,
}

impl Inner {
    /// Any mutation makes the cached snapshot stale.
    fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[derive(Clone)]
pub struct SharedSystem {
    inner: Arc<Mutex<Inner>>,
    ttl: Duration,
}

impl SharedSystem {
    pub fn new(system: ElevatorSystem) -> Self {
        Self::with_ttl(system, DEFAULT_STATUS_TTL)
    }

    pub fn with_ttl(system: ElevatorSystem, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                system,
                cached: None,
            })),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_external_request(
        &self,
        floor: u32,
        direction: Direction,
    ) -> Result<CallOutcome, DispatchError> {
        let mut inner = self.lock();
        inner.invalidate();
        inner.system.add_external_request(floor, direction)
    }

    pub fn add_internal_request(
        &self,
        elevator_id: ElevatorId,
        floor: u32,
    ) -> Result<Ack, DispatchError> {
        let mut inner = self.lock();
        inner.invalidate();
        inner.system.add_internal_request(elevator_id, floor)
    }

    pub fn step(&self) {
        let mut inner = self.lock();
        inner.invalidate();
        inner.system.step();
    }

    pub fn emergency_stop(&self) {
        let mut inner = self.lock();
        inner.invalidate();
        inner.system.emergency_stop();
    }

    pub fn resume_service(&self) {
        let mut inner = self.lock();
        inner.invalidate();
        inner.system.resume_service();
    }

    /// Snapshot no older than the configured TTL.
    pub fn status(&self) -> SystemSnapshot {
        let mut inner = self.lock();
        if let Some((taken, snapshot)) = &inner.cached {
            if taken.elapsed() < self.ttl {
                return snapshot.clone();
            }
        }
        let snapshot = inner.system.get_status();
        inner.cached = Some((Instant::now(), snapshot.clone()));
        snapshot
    }

    pub fn stats(&self) -> SystemStats {
        self.lock().system.stats()
    }

    pub fn drain_events(&self) -> Vec<SystemEvent> {
        self.lock().system.drain_events()
    }

    /// Runs `f` with exclusive access to the dispatcher.
    pub fn with_system<R>(&self, f: impl FnOnce(&mut ElevatorSystem) -> R) -> R {
        let mut inner = self.lock();
        inner.invalidate();
        f(&mut inner.system)
    }
}
