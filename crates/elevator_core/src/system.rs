//! The dispatcher: owns every car and floor, assigns calls, and advances time.
//!
//! Time moves only through [`ElevatorSystem::step`]. Each step first offers pending
//! requests to cars, in queue order, then advances every car in ascending id order.
//! Request submission is synchronous and validated before anything is mutated.

use crate::config::SystemConfig;
use crate::dispatch::{create_policy, DispatchPolicy, HallCall, PendingQueue};
use crate::elevator::{Admission, Arrival, Elevator, ElevatorState};
use crate::error::{ConfigError, DispatchError};
use crate::events::{EventJournal, EventSink, SystemEvent, SystemEventKind};
use crate::floor::Floor;
use crate::request::{Direction, ElevatorId, Request, RequestKind, SequenceCounter};
use crate::snapshot::{ElevatorSnapshot, FloorSnapshot, SystemSnapshot, SystemStats};

/// Result of a hall call that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Assigned { request: Request, elevator: ElevatorId },
    /// No car is eligible right now; retried on every step.
    Queued(Request),
    /// The hall button was already lit, so no new request was created.
    AlreadyRequested,
}

impl CallOutcome {
    pub fn elevator(&self) -> Option<ElevatorId> {
        match self {
            CallOutcome::Assigned { elevator, .. } => Some(*elevator),
            _ => None,
        }
    }
}

/// Accepted car call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub request: Request,
    pub admission: Admission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CarView {
    floor: u32,
    direction: Direction,
    state: ElevatorState,
}

impl CarView {
    fn of(car: &Elevator) -> Self {
        Self {
            floor: car.current_floor(),
            direction: car.direction(),
            state: car.state(),
        }
    }
}

pub struct ElevatorSystem {
    config: SystemConfig,
    elevators: Vec<Elevator>,
    floors: Vec<Floor>,
    pending: PendingQueue,
    emergency: bool,
    tick: u64,
    seq: SequenceCounter,
    policy: Box<dyn DispatchPolicy>,
    sinks: Vec<Box<dyn EventSink>>,
    journal: EventJournal,
    stats: SystemStats,
}

impl std::fmt::Debug for ElevatorSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevatorSystem")
            .field("tick", &self.tick)
            .field("emergency", &self.emergency)
            .field("policy", &self.policy.name())
            .field("elevators", &self.elevators)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl ElevatorSystem {
    pub fn new(config: SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut cars = config.cars.clone();
        cars.sort_by_key(|car| car.id);
        let elevators: Vec<Elevator> = cars
            .into_iter()
            .map(|car| {
                let start = car.start_floor.unwrap_or(config.lobby_floor);
                log::info!(
                    "Initialized E{} - Zone: {}, Floors: ({}, {})",
                    car.id,
                    car.zone.name,
                    car.zone.lowest,
                    car.zone.highest
                );
                Elevator::new(car.id, car.zone, config.lobby_floor, start, config.max_weight)
            })
            .collect();
        let floors = (1..=config.num_floors).map(Floor::new).collect();
        log::info!(
            "Initializing system with {} floors and {} elevators",
            config.num_floors,
            elevators.len()
        );

        let stats = SystemStats {
            total_floors: config.num_floors,
            total_elevators: elevators.len(),
            ..SystemStats::default()
        };

        Ok(Self {
            policy: create_policy(config.dispatch),
            journal: EventJournal::with_capacity(config.event_journal_capacity),
            config,
            elevators,
            floors,
            pending: PendingQueue::default(),
            emergency: false,
            tick: 0,
            seq: SequenceCounter::default(),
            sinks: Vec::new(),
            stats,
        })
    }

    /// Replaces the configured dispatch policy.
    pub fn with_policy(mut self, policy: Box<dyn DispatchPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn elevators(&self) -> &[Elevator] {
        &self.elevators
    }

    pub fn elevator(&self, id: ElevatorId) -> Option<&Elevator> {
        self.index_of(id).map(|idx| &self.elevators[idx])
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, number: u32) -> Option<&Floor> {
        number
            .checked_sub(1)
            .and_then(|idx| self.floors.get(idx as usize))
    }

    pub fn pending_requests(&self) -> Vec<Request> {
        self.pending.to_sorted_vec()
    }

    /// No stops, no pending requests and every car idle.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
            && self
                .elevators
                .iter()
                .all(|car| car.state() == ElevatorState::Idle && !car.has_targets())
    }

    pub fn get_status(&self) -> SystemSnapshot {
        SystemSnapshot {
            tick: self.tick,
            emergency: self.emergency,
            pending: self.pending.len(),
            elevators: self.elevators.iter().map(ElevatorSnapshot::from).collect(),
            floors: self.floors.iter().map(FloorSnapshot::from).collect(),
        }
    }

    pub fn elevator_status(&self, id: ElevatorId) -> Option<ElevatorSnapshot> {
        self.elevator(id).map(ElevatorSnapshot::from)
    }

    pub fn stats(&self) -> SystemStats {
        SystemStats {
            ticks: self.tick,
            pending: self.pending.len(),
            ..self.stats
        }
    }

    /// Takes every journaled event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SystemEvent> {
        self.journal.drain()
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    /// Hall call from `floor`. Assigned to the best eligible car, or queued.
    pub fn add_external_request(
        &mut self,
        floor: u32,
        direction: Direction,
    ) -> Result<CallOutcome, DispatchError> {
        let result = self.submit_external(floor, direction);
        if let Err(err) = &result {
            self.reject(RequestKind::External, floor, None, err);
        }
        result
    }

    /// Car call pressed inside `elevator_id`. Bypasses the search: only that car is tried.
    ///
    /// A call refused for load is queued against the same car before the error is
    /// returned, and retried on later steps.
    pub fn add_internal_request(
        &mut self,
        elevator_id: ElevatorId,
        floor: u32,
    ) -> Result<Ack, DispatchError> {
        let result = self.submit_internal(elevator_id, floor);
        if let Err(err) = &result {
            self.reject(RequestKind::Internal, floor, Some(elevator_id), err);
        }
        result
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) {
        self.tick += 1;
        if self.emergency {
            log::debug!("tick {}: emergency active, cars frozen", self.tick);
            return;
        }

        self.retry_pending();

        let door = self.config.door;
        for idx in 0..self.elevators.len() {
            let before = CarView::of(&self.elevators[idx]);
            let arrival = self.elevators[idx].advance(&door);
            self.emit_car_changes(idx, before, arrival);
        }
    }

    /// Freezes every car immediately. Stops are kept for after the resume.
    pub fn emergency_stop(&mut self) {
        if !self.emergency {
            self.emergency = true;
            self.emit(SystemEventKind::EmergencyStopped);
        }
        for idx in 0..self.elevators.len() {
            let before = CarView::of(&self.elevators[idx]);
            self.elevators[idx].emergency_stop();
            self.emit_car_changes(idx, before, None);
        }
    }

    /// Returns every car to idle; cars holding stops start moving on the next step.
    pub fn resume_service(&mut self) {
        if !self.emergency {
            return;
        }
        self.emergency = false;
        self.emit(SystemEventKind::ServiceResumed);
        for idx in 0..self.elevators.len() {
            let before = CarView::of(&self.elevators[idx]);
            self.elevators[idx].resume_service();
            self.emit_car_changes(idx, before, None);
        }
    }

    fn submit_external(
        &mut self,
        floor: u32,
        direction: Direction,
    ) -> Result<CallOutcome, DispatchError> {
        if self.emergency {
            return Err(DispatchError::EmergencyActive);
        }
        self.check_floor(floor)?;
        let bad_direction = match direction {
            Direction::Idle => true,
            Direction::Up => floor == self.config.num_floors,
            Direction::Down => floor == 1,
        };
        if bad_direction {
            return Err(DispatchError::InvalidDirection { floor, direction });
        }
        if !self.elevators.iter().any(|car| car.can_serve_floor(floor)) {
            return Err(DispatchError::ZoneViolation {
                elevator: None,
                floor,
            });
        }

        self.stats.requests_received += 1;
        let Some(request) = self.floors[floor as usize - 1].request_elevator(direction, &mut self.seq)
        else {
            log::debug!("F{floor} {direction} already requested");
            return Ok(CallOutcome::AlreadyRequested);
        };

        match self.assign_hall_call(&request) {
            Some(elevator) => Ok(CallOutcome::Assigned { request, elevator }),
            None => {
                self.queue(request.clone());
                Ok(CallOutcome::Queued(request))
            }
        }
    }

    fn submit_internal(
        &mut self,
        elevator_id: ElevatorId,
        floor: u32,
    ) -> Result<Ack, DispatchError> {
        if self.emergency {
            return Err(DispatchError::EmergencyActive);
        }
        let idx = self
            .index_of(elevator_id)
            .ok_or(DispatchError::UnknownElevator(elevator_id))?;
        self.check_floor(floor)?;
        let car = &self.elevators[idx];
        if car.state() == ElevatorState::Emergency {
            return Err(DispatchError::EmergencyActive);
        }
        if !car.can_serve_floor(floor) {
            return Err(DispatchError::ZoneViolation {
                elevator: Some(elevator_id),
                floor,
            });
        }

        self.stats.requests_received += 1;
        let request = Request::internal(self.seq.next(), elevator_id, car.current_floor(), floor);
        match self.offer_to_car(idx, &request) {
            Ok(admission) => Ok(Ack { request, admission }),
            Err(err @ DispatchError::OverCapacity { .. }) => {
                self.queue(request);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn check_floor(&self, floor: u32) -> Result<(), DispatchError> {
        if self.config.is_valid_floor(floor) {
            Ok(())
        } else {
            Err(DispatchError::InvalidFloor {
                floor,
                num_floors: self.config.num_floors,
            })
        }
    }

    fn index_of(&self, id: ElevatorId) -> Option<usize> {
        self.elevators
            .binary_search_by_key(&id, |car| car.id())
            .ok()
    }

    /// Offers a hall call to the ranked cars until one accepts it.
    fn assign_hall_call(&mut self, request: &Request) -> Option<ElevatorId> {
        let call = HallCall {
            floor: request.source_floor,
            direction: request.direction,
        };
        let ranked = self
            .policy
            .rank(&call, &self.elevators, self.config.occupant_weight);

        for id in ranked {
            let Some(idx) = self.index_of(id) else {
                continue;
            };
            match self.offer_to_car(idx, request) {
                Ok(_) => return Some(id),
                Err(err) => {
                    log::debug!("E{id} declined F{}: {err}", call.floor);
                    self.emit(SystemEventKind::RequestRejected {
                        kind: request.kind,
                        floor: call.floor,
                        elevator: Some(id),
                        reason: err.reason(),
                        detail: err.to_string(),
                    });
                }
            }
        }
        None
    }

    /// Adds the request's stop to one car and reports the resulting changes.
    fn offer_to_car(&mut self, idx: usize, request: &Request) -> Result<Admission, DispatchError> {
        let floor = request.stop_floor();
        let load = self.config.occupant_weight;
        let before = CarView::of(&self.elevators[idx]);
        let admission = self.elevators[idx].add_request(floor, request.direction, load)?;
        let elevator = self.elevators[idx].id();

        self.stats.requests_assigned += 1;
        self.emit(SystemEventKind::RequestAssigned {
            request: request.clone(),
            elevator,
        });
        let absorbed = (admission == Admission::Absorbed).then_some(Arrival {
            floor,
            direction: request.direction,
        });
        self.emit_car_changes(idx, before, absorbed);
        Ok(admission)
    }

    fn queue(&mut self, request: Request) {
        log::debug!(
            "queued {} request F{} (seq {})",
            request.kind.as_str(),
            request.stop_floor(),
            request.seq
        );
        self.emit(SystemEventKind::RequestQueued {
            request: request.clone(),
        });
        self.pending.push(request);
    }

    fn retry_pending(&mut self) {
        for request in self.pending.drain_ordered() {
            match request.kind {
                RequestKind::External => {
                    let floor = request.source_floor as usize - 1;
                    if !self.floors[floor].is_pressed(request.direction) {
                        // Another car already stopped here for this direction.
                        continue;
                    }
                    if self.assign_hall_call(&request).is_none() {
                        self.pending.push(request);
                    }
                }
                RequestKind::Internal => {
                    let Some(idx) = request.elevator_id.and_then(|id| self.index_of(id)) else {
                        continue;
                    };
                    match self.offer_to_car(idx, &request) {
                        Ok(_) => {}
                        Err(DispatchError::OverCapacity { .. }) => self.pending.push(request),
                        Err(err) => {
                            log::warn!("dropping pending car call seq {}: {err}", request.seq);
                        }
                    }
                }
            }
        }
    }

    /// Emits floor, completion, state and direction changes for one car, in that order.
    fn emit_car_changes(&mut self, idx: usize, before: CarView, arrival: Option<Arrival>) {
        let after = CarView::of(&self.elevators[idx]);
        let elevator = self.elevators[idx].id();

        if before.floor != after.floor {
            self.emit(SystemEventKind::FloorChanged {
                elevator,
                from: before.floor,
                to: after.floor,
                direction: Direction::between(before.floor, after.floor),
            });
        }
        if let Some(arrival) = arrival {
            self.complete_stop(idx, arrival);
        }
        if before.state != after.state {
            self.emit(SystemEventKind::StateChanged {
                elevator,
                floor: after.floor,
                from: before.state,
                to: after.state,
            });
        }
        if before.direction != after.direction {
            self.emit(SystemEventKind::DirectionChanged {
                elevator,
                floor: after.floor,
                from: before.direction,
                to: after.direction,
            });
        }
    }

    fn complete_stop(&mut self, idx: usize, arrival: Arrival) {
        let car = &self.elevators[idx];
        let (elevator, weight, remaining) = (car.id(), car.weight(), car.target_floors());

        let floor = &mut self.floors[arrival.floor as usize - 1];
        floor.clear_button(arrival.direction);
        floor.record_weight(elevator, weight);
        self.pending
            .remove_hall_call(arrival.floor, arrival.direction);

        self.stats.requests_completed += 1;
        self.emit(SystemEventKind::RequestCompleted {
            elevator,
            floor: arrival.floor,
            direction: arrival.direction,
            remaining,
        });
    }

    fn reject(
        &mut self,
        kind: RequestKind,
        floor: u32,
        elevator: Option<ElevatorId>,
        err: &DispatchError,
    ) {
        self.stats.requests_rejected += 1;
        self.emit(SystemEventKind::RequestRejected {
            kind,
            floor,
            elevator,
            reason: err.reason(),
            detail: err.to_string(),
        });
    }

    fn emit(&mut self, kind: SystemEventKind) {
        let event = SystemEvent {
            tick: self.tick,
            kind,
        };
        for sink in &mut self.sinks {
            sink.on_event(&event);
        }
        self.journal.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CarConfig, Zone};

    fn two_zone_system() -> ElevatorSystem {
        let config = SystemConfig::default().with_cars(vec![
            CarConfig::new(1, Zone::low_rise()),
            CarConfig::new(3, Zone::mid_rise()).starting_at(21),
        ]);
        ElevatorSystem::new(config).expect("config")
    }

    #[test]
    fn builds_reference_building() {
        let system = ElevatorSystem::new(SystemConfig::default()).expect("config");
        assert_eq!(system.elevators().len(), 6);
        assert_eq!(system.floors().len(), 50);
        assert!(system.elevators().iter().all(|car| car.current_floor() == 1));
        assert!(system.is_idle());
        assert_eq!(system.policy_name(), "zoned_scan");
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SystemConfig::default().with_cars(Vec::new());
        assert!(matches!(
            ElevatorSystem::new(config),
            Err(ConfigError::NoElevators)
        ));
    }

    #[test]
    fn invalid_calls_have_no_side_effects() {
        let mut system = two_zone_system();
        assert!(matches!(
            system.add_external_request(0, Direction::Up),
            Err(DispatchError::InvalidFloor { floor: 0, .. })
        ));
        assert!(matches!(
            system.add_external_request(50, Direction::Up),
            Err(DispatchError::InvalidDirection { .. })
        ));
        assert!(matches!(
            system.add_external_request(1, Direction::Down),
            Err(DispatchError::InvalidDirection { .. })
        ));
        assert!(matches!(
            system.add_external_request(40, Direction::Up),
            Err(DispatchError::ZoneViolation {
                elevator: None,
                floor: 40
            })
        ));
        assert!(matches!(
            system.add_internal_request(2, 5),
            Err(DispatchError::UnknownElevator(2))
        ));

        assert!(system.is_idle());
        assert!(system.floors().iter().all(|f| !f.up_pressed() && !f.down_pressed()));
        assert_eq!(system.stats().requests_rejected, 5);
        assert_eq!(system.stats().requests_received, 0);
    }

    #[test]
    fn repeated_hall_call_is_not_duplicated() {
        let mut system = two_zone_system();
        let first = system
            .add_external_request(10, Direction::Up)
            .expect("first call");
        assert_eq!(first.elevator(), Some(1));
        assert_eq!(
            system.add_external_request(10, Direction::Up),
            Ok(CallOutcome::AlreadyRequested)
        );
        assert_eq!(system.elevator(1).map(|c| c.target_floors()), Some(vec![10]));
    }

    #[test]
    fn arrival_clears_hall_button_and_records_weight() {
        let mut system = two_zone_system();
        system
            .add_external_request(3, Direction::Down)
            .expect("call");
        assert!(system.floor(3).is_some_and(|f| f.down_pressed()));

        for _ in 0..2 {
            system.step();
        }
        let floor = system.floor(3).expect("floor");
        assert!(!floor.down_pressed());
        assert_eq!(floor.weight_reading(1), Some(0));
        assert_eq!(system.stats().requests_completed, 1);
    }

    #[test]
    fn emergency_step_still_counts_ticks() {
        let mut system = two_zone_system();
        system.emergency_stop();
        system.step();
        assert_eq!(system.tick(), 1);
        assert!(system
            .elevators()
            .iter()
            .all(|car| car.state() == ElevatorState::Emergency));
    }
}
