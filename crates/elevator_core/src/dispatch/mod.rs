//! Hall-call dispatch: ranking policies and the pending-request queue.

pub mod nearest;
pub mod pending;
pub mod policy;
pub mod zoned_scan;

pub use nearest::NearestCarDispatch;
pub use pending::PendingQueue;
pub use policy::{is_eligible, DispatchPolicy, HallCall};
pub use zoned_scan::ZonedScanDispatch;

use crate::config::DispatchStrategy;

/// Builds the boxed policy selected in the configuration.
pub fn create_policy(strategy: DispatchStrategy) -> Box<dyn DispatchPolicy> {
    match strategy {
        DispatchStrategy::ZonedScan => Box::new(ZonedScanDispatch),
        DispatchStrategy::NearestCar => Box::new(NearestCarDispatch),
    }
}
