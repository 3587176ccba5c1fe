//! Admission policies for the bridge monitor
//!
//! A policy decides, from the current `BridgeState`, whether a kind may
//! proceed. Predicates have no side effects; the monitor calls them again
//! every time a waiter wakes up. The only mutation a policy performs is its
//! own bookkeeping in `record_departure`.

use std::fmt;

use super::state::BridgeState;
use super::types::Kind;

/// Default number of cars allowed to queue ahead of a blocked kind
pub const DEFAULT_CAR_QUOTA: u32 = 2;

/// Default number of pedestrians allowed to queue ahead of blocked cars
pub const DEFAULT_PED_QUOTA: u32 = 0;

/// Fairness rule plugged into a `BridgeMonitor`
pub trait AdmissionPolicy: fmt::Debug + Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether a party of `kind` that already joined the crossing queue may
    /// step onto the bridge now.
    fn may_cross(&self, kind: Kind, state: &BridgeState) -> bool;

    /// Whether the monitor must hold arrivals at a queue gate before they
    /// start waiting to cross.
    fn uses_queue_gate(&self) -> bool {
        false
    }

    /// Whether an arrival of `kind` may pass the queue gate.
    fn may_queue(&self, _kind: Kind, _state: &BridgeState) -> bool {
        true
    }

    /// Whether the entry of a party of `kind` can have opened a predicate of
    /// another kind, so the monitor has to wake them.
    fn wakes_on_entry(&self, _kind: Kind, _state: &BridgeState) -> bool {
        false
    }

    /// Bookkeeping after a party of `kind` left the bridge.
    fn record_departure(&self, _kind: Kind, _state: &mut BridgeState) {}
}

/// Mutual exclusion only.
///
/// A continuous stream of one kind keeps every other kind off the bridge
/// forever. That starvation is a known property of this policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

impl AdmissionPolicy for Naive {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn may_cross(&self, kind: Kind, state: &BridgeState) -> bool {
        state.is_clear_for(kind)
    }
}

/// Quota gate in front of the crossing queue.
///
/// Once more than `car_quota` cars of one direction (or more than
/// `ped_quota` pedestrians) are queued, arrivals of the other kinds are held
/// at the gate. The favored kind then drains and the queued kind gets the
/// bridge.
#[derive(Debug, Clone, Copy)]
pub struct Threshold {
    pub car_quota: u32,
    pub ped_quota: u32,
}

impl Threshold {
    pub fn new(car_quota: u32, ped_quota: u32) -> Self {
        Self {
            car_quota,
            ped_quota,
        }
    }

    fn quota(&self, kind: Kind) -> u32 {
        if kind.is_car() {
            self.car_quota
        } else {
            self.ped_quota
        }
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::new(DEFAULT_CAR_QUOTA, DEFAULT_PED_QUOTA)
    }
}

impl AdmissionPolicy for Threshold {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn may_cross(&self, kind: Kind, state: &BridgeState) -> bool {
        state.is_clear_for(kind)
    }

    fn uses_queue_gate(&self) -> bool {
        true
    }

    fn may_queue(&self, kind: Kind, state: &BridgeState) -> bool {
        match kind.direction() {
            Some(direction) => {
                state.queued(Kind::car(direction.opposite())) <= self.car_quota
                    && state.queued(Kind::Pedestrian) <= self.ped_quota
            }
            None => {
                state.queued(Kind::CarNorth) <= self.car_quota
                    && state.queued(Kind::CarSouth) <= self.car_quota
            }
        }
    }

    fn wakes_on_entry(&self, kind: Kind, state: &BridgeState) -> bool {
        state.queued(kind) <= self.quota(kind)
    }
}

/// Rotating priority: the last kind to leave yields to the others.
///
/// A yielding kind still crosses when nobody else is waiting.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnBased;

impl AdmissionPolicy for TurnBased {
    fn name(&self) -> &'static str {
        "turn-based"
    }

    fn may_cross(&self, kind: Kind, state: &BridgeState) -> bool {
        if !state.is_clear_for(kind) {
            return false;
        }
        state.yielding != Some(kind)
            || kind
                .others()
                .iter()
                .all(|other| state.waiting.get(*other) == 0)
    }

    fn wakes_on_entry(&self, _kind: Kind, _state: &BridgeState) -> bool {
        // Entering lowers a waiting count another kind may be yielding to.
        true
    }

    fn record_departure(&self, kind: Kind, state: &mut BridgeState) {
        state.yielding = Some(kind);
    }
}
