//! Single-lane bridge coordination
//!
//! The monitor, its shared state and the pluggable admission policies.
//! Nothing in here knows about arrival rates or crossing times; the
//! simulation drives it through the four enter/exit operations.

mod monitor;
mod policy;
mod state;
mod types;

pub use monitor::BridgeMonitor;
pub use policy::{AdmissionPolicy, Naive, Threshold, TurnBased, DEFAULT_CAR_QUOTA, DEFAULT_PED_QUOTA};
pub use state::{BridgeState, KindCounts, Wake};
pub use types::{Direction, Kind, Party, PartyId};
