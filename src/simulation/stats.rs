//! Run statistics gathered from the finished parties

use log::info;
use std::time::Duration;

use super::party::CrossingRecord;
use crate::bridge::{BridgeState, Kind};

/// Waiting and crossing times of one group of parties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitStats {
    pub count: u32,
    /// Summed waiting time
    pub total: Duration,
    pub longest: Duration,
    /// Summed time spent on the bridge
    pub crossing: Duration,
}

impl WaitStats {
    pub fn record(&mut self, record: &CrossingRecord) {
        self.count += 1;
        self.total += record.waited;
        self.longest = self.longest.max(record.waited);
        self.crossing += record.crossing;
    }

    pub fn mean_crossing(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.crossing / self.count
        }
    }

    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count
        }
    }
}

/// Summary of a completed simulation run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub policy: &'static str,
    pub seed: u64,
    pub north: WaitStats,
    pub south: WaitStats,
    pub pedestrians: WaitStats,
    /// Bridge state after every party left
    pub final_state: BridgeState,
}

impl RunSummary {
    pub fn new(
        policy: &'static str,
        seed: u64,
        records: &[CrossingRecord],
        final_state: BridgeState,
    ) -> Self {
        let mut summary = Self {
            policy,
            seed,
            north: WaitStats::default(),
            south: WaitStats::default(),
            pedestrians: WaitStats::default(),
            final_state,
        };
        for record in records {
            summary.stats_mut(record.party.kind).record(record);
        }
        summary
    }

    pub fn stats(&self, kind: Kind) -> &WaitStats {
        match kind {
            Kind::CarNorth => &self.north,
            Kind::CarSouth => &self.south,
            Kind::Pedestrian => &self.pedestrians,
        }
    }

    fn stats_mut(&mut self, kind: Kind) -> &mut WaitStats {
        match kind {
            Kind::CarNorth => &mut self.north,
            Kind::CarSouth => &mut self.south,
            Kind::Pedestrian => &mut self.pedestrians,
        }
    }

    pub fn cars_crossed(&self) -> u32 {
        self.north.count + self.south.count
    }

    pub fn longest_car_wait(&self) -> Duration {
        self.north.longest.max(self.south.longest)
    }

    pub fn mean_car_wait(&self) -> Duration {
        let cars = self.cars_crossed();
        if cars == 0 {
            Duration::ZERO
        } else {
            (self.north.total + self.south.total) / cars
        }
    }

    pub fn mean_car_crossing(&self) -> Duration {
        let cars = self.cars_crossed();
        if cars == 0 {
            Duration::ZERO
        } else {
            (self.north.crossing + self.south.crossing) / cars
        }
    }

    /// Log the end-of-run report
    pub fn log(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Policy: {}", self.policy);
        info!("Seed: {}", self.seed);
        info!(
            "Cars crossed: {} ({} north, {} south)",
            self.cars_crossed(),
            self.north.count,
            self.south.count
        );
        info!("Pedestrians crossed: {}", self.pedestrians.count);
        info!(
            "Car wait: mean {:.3}s, longest {:.3}s",
            self.mean_car_wait().as_secs_f64(),
            self.longest_car_wait().as_secs_f64()
        );
        info!(
            "Pedestrian wait: mean {:.3}s, longest {:.3}s",
            self.pedestrians.mean().as_secs_f64(),
            self.pedestrians.longest.as_secs_f64()
        );
        info!(
            "Mean crossing: cars {:.3}s, pedestrians {:.3}s",
            self.mean_car_crossing().as_secs_f64(),
            self.pedestrians.mean_crossing().as_secs_f64()
        );
        info!("Monitor events: {}", self.final_state.events);
    }
}
