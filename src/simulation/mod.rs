//! Participant simulation
//!
//! Generates cars and pedestrians at random intervals and walks each of them
//! through the bridge monitor. This is the driver around the monitor; all
//! coordination lives in `crate::bridge`.

mod config;
mod party;
mod runner;
mod stats;

pub use config::{
    DelayRange, PolicyKind, SimConfig, CAR_ARRIVAL_MEAN, CAR_COUNT, CAR_CROSSING, MAX_IN_FLIGHT,
    MAX_PARTIES, PEDESTRIAN_ARRIVAL_MEAN, PEDESTRIAN_COUNT, PEDESTRIAN_CROSSING,
};
pub use party::{cross, CrossingRecord};
pub use runner::{exponential, join_parties, run};
pub use stats::{RunSummary, WaitStats};
