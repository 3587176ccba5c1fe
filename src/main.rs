use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

use bridge_crossing::bridge::{DEFAULT_CAR_QUOTA, DEFAULT_PED_QUOTA};
use bridge_crossing::simulation::{self, DelayRange, PolicyKind, SimConfig, MAX_IN_FLIGHT};

#[derive(Parser)]
#[command(name = "bridge_crossing")]
#[command(about = "Cars and pedestrians sharing a single-lane bridge")]
struct Cli {
    /// Fairness policy deciding who gets the bridge next
    #[arg(long, value_enum, default_value = "threshold")]
    policy: PolicyKind,

    /// Cars that may queue ahead of a blocked kind (threshold policy)
    #[arg(long, default_value_t = DEFAULT_CAR_QUOTA)]
    car_quota: u32,

    /// Pedestrians that may queue ahead of blocked cars (threshold policy)
    #[arg(long, default_value_t = DEFAULT_PED_QUOTA)]
    ped_quota: u32,

    /// Number of cars to generate
    #[arg(long, default_value = "100")]
    cars: u32,

    /// Number of pedestrians to generate
    #[arg(long, default_value = "10")]
    pedestrians: u32,

    /// Mean seconds between car arrivals
    #[arg(long, default_value = "0.5")]
    car_arrival_mean: f64,

    /// Mean seconds between pedestrian arrivals
    #[arg(long, default_value = "5")]
    pedestrian_arrival_mean: f64,

    /// Seconds a car spends on the bridge, as MIN..MAX
    #[arg(long, default_value = "0..0.25")]
    car_crossing: DelayRange,

    /// Seconds a pedestrian spends on the bridge, as MIN..MAX
    #[arg(long, default_value = "0..0.5")]
    pedestrian_crossing: DelayRange,

    /// Parties of each kind allowed to run at the same time
    #[arg(long, default_value_t = MAX_IN_FLIGHT)]
    max_in_flight: u32,

    /// Seed for reproducible arrivals
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<SimConfig> {
        Ok(SimConfig {
            cars: self.cars,
            pedestrians: self.pedestrians,
            car_arrival_mean: Duration::try_from_secs_f64(self.car_arrival_mean)
                .context("Invalid --car-arrival-mean")?,
            pedestrian_arrival_mean: Duration::try_from_secs_f64(self.pedestrian_arrival_mean)
                .context("Invalid --pedestrian-arrival-mean")?,
            car_crossing: self.car_crossing,
            pedestrian_crossing: self.pedestrian_crossing,
            policy: self.policy,
            car_quota: self.car_quota,
            ped_quota: self.ped_quota,
            max_in_flight: self.max_in_flight,
            seed: self.seed,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config()?;
    let summary = simulation::run(&config)?;
    summary.log();

    Ok(())
}
