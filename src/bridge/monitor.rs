//! The bridge access monitor
//!
//! One lock protects the whole `BridgeState`. Each kind has a condition
//! variable to wait for the bridge ("may cross") and one to wait at the queue
//! gate ("may join the queue"), the latter only used by gating policies.
//! Entering may block; leaving never does.

use log::{debug, trace};
use std::sync::{Condvar, Mutex, MutexGuard};

use super::policy::AdmissionPolicy;
use super::state::{BridgeState, Wake};
use super::types::{Direction, Kind};

/// Coordinates access to the single-lane bridge
#[derive(Debug)]
pub struct BridgeMonitor {
    state: Mutex<BridgeState>,
    /// Woken when the bridge may have become available to a kind
    cross: [Condvar; 3],
    /// Woken when the queue gate may have opened for a kind
    gate: [Condvar; 3],
    policy: Box<dyn AdmissionPolicy>,
}

impl BridgeMonitor {
    pub fn new(policy: impl AdmissionPolicy + 'static) -> Self {
        Self::with_policy(Box::new(policy))
    }

    pub fn with_policy(policy: Box<dyn AdmissionPolicy>) -> Self {
        Self {
            state: Mutex::new(BridgeState::new()),
            cross: std::array::from_fn(|_| Condvar::new()),
            gate: std::array::from_fn(|_| Condvar::new()),
            policy,
        }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> BridgeState {
        self.lock().clone()
    }

    pub fn enter_car(&self, direction: Direction) {
        self.enter(Kind::car(direction));
    }

    pub fn exit_car(&self, direction: Direction) {
        self.exit(Kind::car(direction));
    }

    pub fn enter_pedestrian(&self) {
        self.enter(Kind::Pedestrian);
    }

    pub fn exit_pedestrian(&self) {
        self.exit(Kind::Pedestrian);
    }

    /// Block until a party of `kind` may occupy the bridge, then occupy it.
    pub fn enter(&self, kind: Kind) {
        let mut state = self.lock();
        state.events += 1;
        *state.waiting.get_mut(kind) += 1;

        if self.policy.uses_queue_gate() {
            *state.gated.get_mut(kind) += 1;
            if !self.policy.may_queue(kind, &state) {
                debug!("{} held at the queue gate {}", kind, *state);
            }
            state = self.wait_until(&self.gate[kind.index()], state, |s| {
                self.policy.may_queue(kind, s)
            });
            *state.gated.get_mut(kind) -= 1;
        }

        state = self.wait_until(&self.cross[kind.index()], state, |s| {
            self.policy.may_cross(kind, s)
        });
        *state.on_bridge.get_mut(kind) += 1;
        *state.waiting.get_mut(kind) -= 1;
        state.assert_exclusive();

        if self.policy.wakes_on_entry(kind, &state) {
            self.wake_others(kind, &state);
        }
    }

    /// Leave the bridge. Wakes the other kinds once `kind` has fully left.
    pub fn exit(&self, kind: Kind) {
        let mut state = self.lock();
        state.events += 1;
        let on_bridge = state.on_bridge.get_mut(kind);
        assert!(*on_bridge > 0, "{} left a bridge they were not on", kind);
        *on_bridge -= 1;
        self.policy.record_departure(kind, &mut state);
        state.assert_exclusive();

        if state.on_bridge.get(kind) == 0 {
            self.wake_others(kind, &state);
        }
    }

    /// Broadcast to both other kinds in `BridgeState::wake_sequence` order.
    /// Another order lets two kinds keep re-arming each other's gates and
    /// starve the third.
    fn wake_others(&self, kind: Kind, state: &BridgeState) {
        for wake in state.wake_sequence(kind, self.policy.uses_queue_gate()) {
            trace!("{} wakes {:?}", kind, wake);
            match wake {
                Wake::Gate(other) => self.gate[other.index()].notify_all(),
                Wake::Cross(other) => self.cross[other.index()].notify_all(),
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, BridgeState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => panic!("bridge state poisoned by a failed party: {}", poisoned),
        }
    }

    /// Wait on `condvar` until `ready` holds, re-checking after every wake-up.
    fn wait_until<'a, F>(
        &self,
        condvar: &Condvar,
        guard: MutexGuard<'a, BridgeState>,
        mut ready: F,
    ) -> MutexGuard<'a, BridgeState>
    where
        F: FnMut(&BridgeState) -> bool,
    {
        match condvar.wait_while(guard, |state| !ready(state)) {
            Ok(guard) => guard,
            Err(poisoned) => panic!("bridge state poisoned by a failed party: {}", poisoned),
        }
    }
}
