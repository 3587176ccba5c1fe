//! Shared bridge state
//!
//! Plain counters guarded by the monitor's lock. Nothing here synchronizes on
//! its own; every read and write happens through a `MutexGuard`.

use std::fmt;

use super::types::Kind;

/// One counter per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub north: u32,
    pub south: u32,
    pub pedestrians: u32,
}

impl KindCounts {
    pub fn get(&self, kind: Kind) -> u32 {
        match kind {
            Kind::CarNorth => self.north,
            Kind::CarSouth => self.south,
            Kind::Pedestrian => self.pedestrians,
        }
    }

    pub fn get_mut(&mut self, kind: Kind) -> &mut u32 {
        match kind {
            Kind::CarNorth => &mut self.north,
            Kind::CarSouth => &mut self.south,
            Kind::Pedestrian => &mut self.pedestrians,
        }
    }

    pub fn total(&self) -> u32 {
        self.north + self.south + self.pedestrians
    }
}

/// One notification sent by a wake-up broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Queue gate of a kind
    Gate(Kind),
    /// Crossing condition of a kind
    Cross(Kind),
}

/// Occupancy and waiting counters for the bridge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeState {
    /// Parties currently on the bridge
    pub on_bridge: KindCounts,
    /// Parties that asked to enter and have not entered yet (gated ones included)
    pub waiting: KindCounts,
    /// Parties held at the queue gate, only used by gating policies
    pub gated: KindCounts,
    /// Kind that most recently left the bridge and must yield next.
    /// Only the turn-based policy writes this.
    pub yielding: Option<Kind>,
    /// Monitor operations performed so far, for diagnostics
    pub events: u64,
}

impl BridgeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parties past the queue gate that are waiting to cross
    pub fn queued(&self, kind: Kind) -> u32 {
        self.waiting.get(kind) - self.gated.get(kind)
    }

    /// True when no other kind occupies the bridge
    pub fn is_clear_for(&self, kind: Kind) -> bool {
        kind.others().iter().all(|other| self.on_bridge.get(*other) == 0)
    }

    /// Kind currently on the bridge, if any
    pub fn occupant(&self) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| self.on_bridge.get(*kind) > 0)
    }

    /// Nobody on the bridge and nobody waiting
    pub fn is_idle(&self) -> bool {
        self.on_bridge.total() == 0 && self.waiting.total() == 0 && self.gated.total() == 0
    }

    /// The two kinds other than `kind`, fewer waiters first.
    /// Ties keep the order of `Kind::others`.
    pub fn wake_order(&self, kind: Kind) -> [Kind; 2] {
        let mut others = kind.others();
        others.sort_by_key(|other| self.waiting.get(*other));
        others
    }

    /// Notifications for one broadcast after `kind` entered or left: every
    /// queue gate goes before any crossing condition.
    pub fn wake_sequence(&self, kind: Kind, with_gates: bool) -> Vec<Wake> {
        let order = self.wake_order(kind);
        let gates = order.into_iter().filter(|_| with_gates).map(Wake::Gate);
        gates.chain(order.into_iter().map(Wake::Cross)).collect()
    }

    /// Panics if two different kinds share the bridge.
    pub fn assert_exclusive(&self) {
        let occupied = Kind::ALL
            .iter()
            .filter(|kind| self.on_bridge.get(**kind) > 0)
            .count();
        assert!(
            occupied <= 1,
            "mutual exclusion violated on the bridge: {}",
            self
        );
    }
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[events {} | on bridge N:{} S:{} P:{} | waiting N:{} S:{} P:{}",
            self.events,
            self.on_bridge.north,
            self.on_bridge.south,
            self.on_bridge.pedestrians,
            self.waiting.north,
            self.waiting.south,
            self.waiting.pedestrians,
        )?;
        if self.gated.total() > 0 {
            write!(
                f,
                " | gated N:{} S:{} P:{}",
                self.gated.north, self.gated.south, self.gated.pedestrians
            )?;
        }
        if let Some(kind) = self.yielding {
            write!(f, " | {} yield", kind)?;
        }
        write!(f, "]")
    }
}
