//! Run parameters for the participant simulation

use anyhow::{bail, Context, Result};
use rand::Rng;
use std::str::FromStr;
use std::time::Duration;

use crate::bridge::{
    AdmissionPolicy, Naive, Threshold, TurnBased, DEFAULT_CAR_QUOTA, DEFAULT_PED_QUOTA,
};

/// Mean time between car arrivals
pub const CAR_ARRIVAL_MEAN: Duration = Duration::from_millis(500);

/// Mean time between pedestrian arrivals
pub const PEDESTRIAN_ARRIVAL_MEAN: Duration = Duration::from_secs(5);

/// Cars generated per run
pub const CAR_COUNT: u32 = 100;

/// Pedestrians generated per run
pub const PEDESTRIAN_COUNT: u32 = 10;

/// Upper bound on the parties of one kind per run
pub const MAX_PARTIES: u32 = 100_000;

/// Parties of one stream allowed on their own thread at the same time
pub const MAX_IN_FLIGHT: u32 = 64;

/// Time a car spends on the bridge
pub const CAR_CROSSING: DelayRange = DelayRange {
    min: Duration::ZERO,
    max: Duration::from_millis(250),
};

/// Pedestrians are slower than cars
pub const PEDESTRIAN_CROSSING: DelayRange = DelayRange {
    min: Duration::ZERO,
    max: Duration::from_millis(500),
};

/// Which fairness policy the monitor runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PolicyKind {
    /// Mutual exclusion only, can starve a kind
    Naive,
    /// Quota gates in front of the crossing queue
    #[default]
    Threshold,
    /// Last kind to leave yields to the others
    TurnBased,
}

/// Uniform range of crossing times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        if min > max {
            bail!("crossing delay range is empty: {:?} > {:?}", min, max);
        }
        Ok(Self { min, max })
    }

    /// A range that always yields `delay`
    pub fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rng.random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Parses `MIN..MAX` in seconds, e.g. `0.1..0.5`, or a single fixed value.
impl FromStr for DelayRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| -> Result<Duration> {
            let secs: f64 = part
                .trim()
                .parse()
                .with_context(|| format!("invalid number of seconds '{}'", part))?;
            Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid crossing delay '{}'", part))
        };

        match s.split_once("..") {
            Some((min, max)) => DelayRange::new(parse(min)?, parse(max)?),
            None => Ok(DelayRange::fixed(parse(s)?)),
        }
    }
}

/// Everything a simulation run needs
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub cars: u32,
    pub pedestrians: u32,
    pub car_arrival_mean: Duration,
    pub pedestrian_arrival_mean: Duration,
    pub car_crossing: DelayRange,
    pub pedestrian_crossing: DelayRange,
    pub policy: PolicyKind,
    /// Threshold policy only
    pub car_quota: u32,
    /// Threshold policy only
    pub ped_quota: u32,
    /// Parties of one stream running at once; the generator waits for the
    /// oldest to finish before spawning past this
    pub max_in_flight: u32,
    /// Seed for reproducible arrivals; a random one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cars: CAR_COUNT,
            pedestrians: PEDESTRIAN_COUNT,
            car_arrival_mean: CAR_ARRIVAL_MEAN,
            pedestrian_arrival_mean: PEDESTRIAN_ARRIVAL_MEAN,
            car_crossing: CAR_CROSSING,
            pedestrian_crossing: PEDESTRIAN_CROSSING,
            policy: PolicyKind::default(),
            car_quota: DEFAULT_CAR_QUOTA,
            ped_quota: DEFAULT_PED_QUOTA,
            max_in_flight: MAX_IN_FLIGHT,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Reject parameter combinations a run cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.cars == 0 && self.pedestrians == 0 {
            bail!("nothing to simulate: both car and pedestrian counts are zero");
        }
        if self.cars > MAX_PARTIES || self.pedestrians > MAX_PARTIES {
            bail!(
                "too many parties: {} cars and {} pedestrians requested, at most {} of each",
                self.cars,
                self.pedestrians,
                MAX_PARTIES
            );
        }
        if self.max_in_flight == 0 {
            bail!("at least one party must be allowed in flight");
        }
        if self.car_crossing.min > self.car_crossing.max {
            bail!("car crossing delay range is empty");
        }
        if self.pedestrian_crossing.min > self.pedestrian_crossing.max {
            bail!("pedestrian crossing delay range is empty");
        }
        Ok(())
    }

    /// Instantiate the configured admission policy
    pub fn build_policy(&self) -> Box<dyn AdmissionPolicy> {
        match self.policy {
            PolicyKind::Naive => Box::new(Naive),
            PolicyKind::Threshold => Box::new(Threshold::new(self.car_quota, self.ped_quota)),
            PolicyKind::TurnBased => Box::new(TurnBased),
        }
    }
}
