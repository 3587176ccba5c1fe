//! A single crossing: ask, enter, cross, leave

use log::{info, log_enabled, Level};
use std::thread;
use std::time::{Duration, Instant};

use crate::bridge::{BridgeMonitor, Party};

/// What happened to one party
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingRecord {
    pub party: Party,
    /// Time between asking to enter and stepping onto the bridge
    pub waited: Duration,
    /// Time spent on the bridge
    pub crossing: Duration,
}

/// Run one party through the monitor, blocking until it is off the bridge
pub fn cross(monitor: &BridgeMonitor, party: Party, crossing: Duration) -> CrossingRecord {
    transcript(monitor, &party, "wants to enter");
    let asked = Instant::now();
    monitor.enter(party.kind);
    let waited = asked.elapsed();
    transcript(monitor, &party, "enters the bridge");

    thread::sleep(crossing);

    transcript(monitor, &party, "leaving the bridge");
    monitor.exit(party.kind);
    transcript(monitor, &party, "out of the bridge");

    CrossingRecord {
        party,
        waited,
        crossing,
    }
}

fn transcript(monitor: &BridgeMonitor, party: &Party, what: &str) {
    // Snapshots take the monitor lock, skip them when nobody listens.
    if log_enabled!(Level::Info) {
        info!("{} {}. {}", party, what, monitor.snapshot());
    }
}
