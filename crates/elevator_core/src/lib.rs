//! Tick-driven dispatcher for a zoned multi-car elevator bank.
//!
//! [`system::ElevatorSystem`] owns the cars and floors. Callers submit hall calls and
//! car calls, advance time with `step`, and observe the result through snapshots or
//! emitted [`events::SystemEvent`]s.

pub mod config;
pub mod dispatch;
pub mod elevator;
pub mod error;
pub mod events;
pub mod export;
pub mod floor;
pub mod request;
pub mod runner;
pub mod scenario;
pub mod session_log;
pub mod shared;
pub mod snapshot;
pub mod system;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod visualizer;
