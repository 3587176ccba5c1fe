//! Drives a whole run: two generators, one thread per party
//!
//! The car generator and the pedestrian generator each spawn their parties
//! at exponentially distributed intervals, then wait for all of them to get
//! off the bridge. A generator never has more than `max_in_flight` party
//! threads alive; past that it joins the oldest before spawning the next.

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::config::{DelayRange, SimConfig};
use super::party::{cross, CrossingRecord};
use super::stats::RunSummary;
use crate::bridge::{BridgeMonitor, Direction, Party};

/// Run the configured simulation to completion
pub fn run(config: &SimConfig) -> Result<RunSummary> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut seeder = StdRng::seed_from_u64(seed);
    let monitor = Arc::new(BridgeMonitor::with_policy(config.build_policy()));
    info!(
        "Simulating {} cars and {} pedestrians with the {} policy (seed {})",
        config.cars,
        config.pedestrians,
        monitor.policy_name(),
        seed
    );

    let cars = Arrivals {
        label: "car",
        count: config.cars,
        mean_interval: config.car_arrival_mean,
        crossing: config.car_crossing,
        max_in_flight: config.max_in_flight,
    };
    let pedestrians = Arrivals {
        label: "pedestrian",
        count: config.pedestrians,
        mean_interval: config.pedestrian_arrival_mean,
        crossing: config.pedestrian_crossing,
        max_in_flight: config.max_in_flight,
    };

    let car_generator = cars.start(
        Arc::clone(&monitor),
        StdRng::seed_from_u64(seeder.random()),
        |rng, id| {
            let direction = if rng.random_bool(0.5) {
                Direction::North
            } else {
                Direction::South
            };
            Party::car(id, direction)
        },
    )?;
    let pedestrian_generator = match pedestrians.start(
        Arc::clone(&monitor),
        StdRng::seed_from_u64(seeder.random()),
        |_, id| Party::pedestrian(id),
    ) {
        Ok(handle) => handle,
        Err(error) => {
            // Cars already on their way still have to get off the bridge.
            let _ = join_generator(car_generator, "car");
            return Err(error);
        }
    };

    let car_records = join_generator(car_generator, "car");
    let pedestrian_records = join_generator(pedestrian_generator, "pedestrian");
    let mut records = car_records?;
    records.extend(pedestrian_records?);

    let final_state = monitor.snapshot();
    if !final_state.is_idle() {
        bail!("bridge not empty after the run: {}", final_state);
    }

    Ok(RunSummary::new(monitor.policy_name(), seed, &records, final_state))
}

type GeneratorHandle = thread::JoinHandle<Result<Vec<CrossingRecord>>>;
type PartyHandle = thread::JoinHandle<CrossingRecord>;

/// One stream of arriving parties
struct Arrivals {
    label: &'static str,
    count: u32,
    mean_interval: Duration,
    crossing: DelayRange,
    max_in_flight: u32,
}

impl Arrivals {
    fn start<F>(
        self,
        monitor: Arc<BridgeMonitor>,
        rng: StdRng,
        make_party: F,
    ) -> Result<GeneratorHandle>
    where
        F: FnMut(&mut StdRng, u32) -> Party + Send + 'static,
    {
        let label = self.label;
        thread::Builder::new()
            .name(format!("{}-generator", label))
            .spawn(move || self.generate(monitor, rng, make_party))
            .with_context(|| format!("Failed to start the {} generator", label))
    }

    fn generate<F>(
        self,
        monitor: Arc<BridgeMonitor>,
        mut rng: StdRng,
        mut make_party: F,
    ) -> Result<Vec<CrossingRecord>>
    where
        F: FnMut(&mut StdRng, u32) -> Party,
    {
        let mut records = Vec::new();
        let mut in_flight: VecDeque<(Party, PartyHandle)> = VecDeque::new();
        let mut failure = None;

        for id in 1..=self.count {
            if in_flight.len() >= self.max_in_flight as usize {
                if let Err(error) = join_parties(in_flight.pop_front(), &mut records) {
                    failure = Some(error);
                    break;
                }
            }

            let party = make_party(&mut rng, id);
            let crossing = self.crossing.sample(&mut rng);
            let monitor = Arc::clone(&monitor);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", self.label, id))
                .spawn(move || cross(&monitor, party, crossing))
                .with_context(|| format!("Failed to spawn {}", party));
            match spawned {
                Ok(handle) => in_flight.push_back((party, handle)),
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }

            if id < self.count {
                thread::sleep(exponential(&mut rng, self.mean_interval));
            }
        }

        debug!(
            "{} generator done spawning, waiting for {} {}s",
            self.label,
            in_flight.len(),
            self.label
        );
        let joined = join_parties(in_flight, &mut records);
        match failure {
            Some(error) => Err(error),
            None => joined.map(|()| records),
        }
    }
}

/// Join every given party thread, collecting the records of those that made
/// it across. All threads are joined even after one fails; the first failure
/// is returned.
pub fn join_parties<I>(parties: I, records: &mut Vec<CrossingRecord>) -> Result<()>
where
    I: IntoIterator<Item = (Party, thread::JoinHandle<CrossingRecord>)>,
{
    let mut first_failure = None;
    for (party, handle) in parties {
        match handle.join() {
            Ok(record) => records.push(record),
            Err(_) => {
                first_failure.get_or_insert_with(|| anyhow!("{} panicked while crossing", party));
            }
        }
    }
    first_failure.map_or(Ok(()), Err)
}

fn join_generator(handle: GeneratorHandle, label: &str) -> Result<Vec<CrossingRecord>> {
    handle
        .join()
        .map_err(|_| anyhow!("The {} generator panicked", label))?
}

/// Exponentially distributed interval with the given mean
pub fn exponential<R: Rng>(rng: &mut R, mean: Duration) -> Duration {
    let uniform: f64 = rng.random();
    mean.mul_f64((1.0 - uniform).ln().abs())
}
