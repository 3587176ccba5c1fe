//! Single-lane bridge simulation library
//!
//! A monitor coordinating cars and pedestrians on a single-lane bridge, with
//! pluggable fairness policies, plus the simulation that drives it.

pub mod bridge;
pub mod simulation;
