use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bridge_crossing::bridge::{Kind, Party};
use bridge_crossing::simulation::{
    self, exponential, join_parties, CrossingRecord, DelayRange, PolicyKind, SimConfig,
    MAX_PARTIES,
};

/// A short run: a handful of parties arriving every few milliseconds
fn quick_config(policy: PolicyKind) -> SimConfig {
    SimConfig {
        cars: 12,
        pedestrians: 4,
        car_arrival_mean: Duration::from_millis(2),
        pedestrian_arrival_mean: Duration::from_millis(5),
        car_crossing: DelayRange::new(Duration::ZERO, Duration::from_millis(3)).unwrap(),
        pedestrian_crossing: DelayRange::new(Duration::ZERO, Duration::from_millis(6)).unwrap(),
        policy,
        seed: Some(42),
        ..SimConfig::default()
    }
}

#[test]
fn test_run_completes_for_every_policy() {
    for policy in [PolicyKind::Naive, PolicyKind::Threshold, PolicyKind::TurnBased] {
        let summary = simulation::run(&quick_config(policy)).unwrap();

        assert_eq!(summary.cars_crossed(), 12, "{:?}", policy);
        assert_eq!(summary.pedestrians.count, 4, "{:?}", policy);
        assert_eq!(summary.seed, 42);
        assert!(summary.final_state.is_idle());
        // One enter and one exit per party
        assert_eq!(summary.final_state.events, 2 * 16);
        assert!(summary.longest_car_wait() >= summary.mean_car_wait());
    }
}

#[test]
fn test_seed_fixes_car_directions() {
    let first = simulation::run(&quick_config(PolicyKind::Threshold)).unwrap();
    let second = simulation::run(&quick_config(PolicyKind::TurnBased)).unwrap();

    assert_eq!(first.stats(Kind::CarNorth).count, second.stats(Kind::CarNorth).count);
    assert_eq!(first.stats(Kind::CarSouth).count, second.stats(Kind::CarSouth).count);
}

#[test]
fn test_run_with_one_party_in_flight_completes() {
    let config = SimConfig {
        max_in_flight: 1,
        ..quick_config(PolicyKind::Threshold)
    };
    let summary = simulation::run(&config).unwrap();

    assert_eq!(summary.cars_crossed(), 12);
    assert_eq!(summary.pedestrians.count, 4);
    assert_eq!(summary.final_state.events, 2 * 16);
}

#[test]
fn test_summary_reports_crossing_times() {
    let config = SimConfig {
        car_crossing: DelayRange::fixed(Duration::from_millis(3)),
        pedestrian_crossing: DelayRange::fixed(Duration::from_millis(5)),
        ..quick_config(PolicyKind::TurnBased)
    };
    let summary = simulation::run(&config).unwrap();

    assert_eq!(summary.mean_car_crossing(), Duration::from_millis(3));
    assert_eq!(summary.pedestrians.mean_crossing(), Duration::from_millis(5));
    assert_eq!(summary.pedestrians.crossing, Duration::from_millis(5 * 4));
}

#[test]
fn test_join_parties_waits_for_everyone_after_a_failure() {
    let finished = Arc::new(AtomicBool::new(false));
    let doomed = thread::spawn(|| -> CrossingRecord { panic!("crossing went wrong") });
    let slow = {
        let finished = Arc::clone(&finished);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            finished.store(true, Ordering::SeqCst);
            CrossingRecord {
                party: Party::pedestrian(2),
                waited: Duration::ZERO,
                crossing: Duration::from_millis(50),
            }
        })
    };

    let mut records = Vec::new();
    let result = join_parties(
        [(Party::pedestrian(1), doomed), (Party::pedestrian(2), slow)],
        &mut records,
    );

    let error = result.unwrap_err().to_string();
    assert!(error.contains("pedestrian 1"), "{}", error);
    assert!(finished.load(Ordering::SeqCst), "later party was not joined");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].party, Party::pedestrian(2));
}

#[test]
fn test_party_counts_are_capped() {
    let too_many_cars = SimConfig {
        cars: MAX_PARTIES + 1,
        ..SimConfig::default()
    };
    assert!(too_many_cars.validate().is_err());

    let too_many_pedestrians = SimConfig {
        pedestrians: u32::MAX,
        ..SimConfig::default()
    };
    assert!(too_many_pedestrians.validate().is_err());

    let at_cap = SimConfig {
        cars: MAX_PARTIES,
        pedestrians: MAX_PARTIES,
        ..SimConfig::default()
    };
    at_cap.validate().unwrap();

    let nothing_in_flight = SimConfig {
        max_in_flight: 0,
        ..SimConfig::default()
    };
    assert!(nothing_in_flight.validate().is_err());
}

#[test]
fn test_empty_run_is_rejected() {
    let config = SimConfig {
        cars: 0,
        pedestrians: 0,
        ..SimConfig::default()
    };
    assert!(config.validate().is_err());
    assert!(simulation::run(&config).is_err());
}

#[test]
fn test_default_config_is_valid() {
    let config = SimConfig::default();
    config.validate().unwrap();
    assert_eq!(config.policy, PolicyKind::Threshold);
    assert_eq!(config.car_quota, 2);
    assert_eq!(config.ped_quota, 0);
}

#[test]
fn test_delay_range_parsing() {
    let range: DelayRange = "0.1..0.5".parse().unwrap();
    assert_eq!(range.min, Duration::from_millis(100));
    assert_eq!(range.max, Duration::from_millis(500));

    let fixed: DelayRange = "0.25".parse().unwrap();
    assert_eq!(fixed, DelayRange::fixed(Duration::from_millis(250)));

    assert!("0.5..0.1".parse::<DelayRange>().is_err());
    assert!("-1..2".parse::<DelayRange>().is_err());
    assert!("soon".parse::<DelayRange>().is_err());
}

#[test]
fn test_delay_range_samples_stay_in_range() {
    let range = DelayRange::new(Duration::from_millis(10), Duration::from_millis(20)).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1000 {
        let delay = range.sample(&mut rng);
        assert!(delay >= range.min && delay <= range.max, "{:?}", delay);
    }
}

#[test]
fn test_exponential_arrivals_have_requested_mean() {
    let mean = Duration::from_millis(500);
    let mut rng = StdRng::seed_from_u64(11);
    let samples = 10_000;
    let total: Duration = (0..samples).map(|_| exponential(&mut rng, mean)).sum();
    let observed = total.as_secs_f64() / samples as f64;

    assert!(
        (observed - 0.5).abs() < 0.05,
        "mean inter-arrival {:.3}s is far from 0.5s",
        observed
    );
}

/// Test that the binary runs a short simulation and logs the transcript and summary
#[test]
fn test_headless_binary_reports_summary() {
    let output = Command::new(env!("CARGO_BIN_EXE_bridge_crossing"))
        .args([
            "--policy",
            "turn-based",
            "--cars",
            "8",
            "--pedestrians",
            "3",
            "--car-arrival-mean",
            "0.002",
            "--pedestrian-arrival-mean",
            "0.005",
            "--car-crossing",
            "0..0.003",
            "--pedestrian-crossing",
            "0..0.005",
            "--seed",
            "3",
        ])
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute simulation");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "Simulation failed. stderr: {}",
        stderr
    );

    assert!(stderr.contains("wants to enter"), "Missing transcript");
    assert!(stderr.contains("out of the bridge"), "Missing transcript");
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
    assert!(stderr.contains("Policy: turn-based"));
    assert!(stderr.contains("Cars crossed: 8"));
    assert!(stderr.contains("Pedestrians crossed: 3"));
    assert!(stderr.contains("Mean crossing"));
}

/// Test that an oversized run fails with an error instead of exhausting memory
#[test]
fn test_binary_rejects_oversized_run() {
    let output = Command::new(env!("CARGO_BIN_EXE_bridge_crossing"))
        .args([
            "--cars",
            "4000000000",
            "--pedestrians",
            "0",
            "--car-arrival-mean",
            "0",
            "--car-crossing",
            "0",
        ])
        .output()
        .expect("Failed to execute simulation");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr);
    assert!(stderr.contains("too many parties"), "stderr: {}", stderr);
}

/// Test that an empty crossing range is refused before anything runs
#[test]
fn test_binary_rejects_bad_delay_range() {
    let output = Command::new(env!("CARGO_BIN_EXE_bridge_crossing"))
        .args(["--car-crossing", "1..0"])
        .output()
        .expect("Failed to execute simulation");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("car-crossing"), "stderr: {}", stderr);
}
