//! Integration tests for the drive session.
//!
//! Runs full sessions against the fallback grid classifier, so every
//! scenario is deterministic and needs no network access. The map center
//! sits at the origin and the vehicle drives along the center's grid
//! line, which the fallback heuristic always classifies as road.

use std::sync::Arc;
use std::time::Duration;

use rustdrive::config::SimConfig;
use rustdrive::geo::LatLng;
use rustdrive::roads::{ClassifierMode, FixedMapView};
use rustdrive::scoring::Achievement;
use rustdrive::session::{DriveSession, LogStatusSink, MotionSample};

/// Degrees of latitude per meter at the haversine Earth radius.
const METERS_PER_DEGREE: f64 = 111_194.9;

fn fallback_session() -> DriveSession {
    let config = SimConfig::default();
    let map = Arc::new(FixedMapView {
        center: LatLng::new(0.0, 0.0),
        zoom: 15.0,
    });
    DriveSession::new(&config, map, Box::new(LogStatusSink))
}

/// A sample `meters` north of the map center, on the center's grid line.
fn on_road_sample(meters: f64, speed: f64) -> MotionSample {
    MotionSample {
        position: LatLng::new(meters / METERS_PER_DEGREE, 0.0),
        speed,
        delta_time: 1.0,
    }
}

/// A sample in grid cell (3, 3), which the fallback grid marks off-road.
fn off_road_sample() -> MotionSample {
    MotionSample {
        position: LatLng::new(0.0003, 0.0003),
        speed: 5.0,
        delta_time: 1.0,
    }
}

async fn settle(session: &mut DriveSession) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    session.apply_completed();
}

#[tokio::test]
async fn test_session_starts_in_fallback_without_credential() {
    let session = fallback_session();
    assert_eq!(session.classifier().mode(), ClassifierMode::Fallback);
    assert_eq!(session.points(), 0);
}

#[tokio::test]
async fn test_first_sample_is_baseline_only() {
    let mut session = fallback_session();

    session.tick(on_road_sample(0.0, 5.0));
    settle(&mut session).await;

    assert_eq!(session.points(), 0);
    assert_eq!(session.distance_on_road(), 0.0);
    assert!(session.is_on_road());
}

#[tokio::test]
async fn test_on_road_drive_earns_points() {
    let mut session = fallback_session();

    // 100 m at speed 5, multiplier 1.0 -> floor(100 * 5 * 1 * 1) = 500
    session.tick(on_road_sample(0.0, 5.0));
    settle(&mut session).await;
    session.tick(on_road_sample(100.0, 5.0));
    settle(&mut session).await;

    assert_eq!(session.points(), 500);
    assert!((session.distance_on_road() - 100.0).abs() < 0.1);
    assert_eq!(session.multiplier(), 1.0);
}

#[tokio::test]
async fn test_off_road_excursion_bleeds_points() {
    let mut session = fallback_session();

    session.tick(on_road_sample(0.0, 5.0));
    settle(&mut session).await;
    session.tick(on_road_sample(100.0, 5.0));
    settle(&mut session).await;
    assert_eq!(session.points(), 500);

    // the off-road cell is roughly 47 m from the last position
    session.tick(off_road_sample());
    settle(&mut session).await;

    assert!(session.points() < 500);
    assert!(!session.is_on_road());
    assert_eq!(session.multiplier(), 1.0);
    // on-road distance is untouched by the excursion
    assert!((session.distance_on_road() - 100.0).abs() < 0.1);
}

#[tokio::test]
async fn test_points_never_go_negative() {
    let mut session = fallback_session();

    session.tick(off_road_sample());
    settle(&mut session).await;
    session.tick(on_road_sample(0.0, 5.0));
    settle(&mut session).await;
    session.tick(off_road_sample());
    settle(&mut session).await;

    assert_eq!(session.points(), 0);
}

#[tokio::test]
async fn test_sustained_drive_ramps_multiplier_and_unlocks_achievements() {
    let mut session = fallback_session();

    // 20 seconds of driving at 50 m/s with the speed bonus saturated
    session.tick(on_road_sample(0.0, 25.0));
    settle(&mut session).await;
    for i in 1..=20 {
        session.tick(on_road_sample(50.0 * i as f64, 25.0));
        settle(&mut session).await;
    }

    // two full 8 s streaks have ramped the multiplier twice
    assert!((session.multiplier() - 1.2).abs() < 1e-9);
    assert_eq!(session.points(), 8096);
    assert!((session.distance_on_road() - 1000.0).abs() < 0.5);

    let achievements = session.achievements();
    assert!(achievements.contains(&Achievement::PointMaster));
    assert!(achievements.contains(&Achievement::DistanceDriver));
    assert!(!achievements.contains(&Achievement::RoadWarrior));
}

#[tokio::test]
async fn test_reset_discards_in_flight_classification() {
    let mut session = fallback_session();

    session.tick(on_road_sample(0.0, 5.0));
    settle(&mut session).await;
    session.tick(on_road_sample(100.0, 5.0));
    settle(&mut session).await;
    assert_eq!(session.points(), 500);

    // a tick is in flight when the user resets
    session.tick(on_road_sample(200.0, 5.0));
    session.reset();
    settle(&mut session).await;

    // the resolving classification does not mutate the fresh state
    assert_eq!(session.points(), 0);
    assert_eq!(session.distance_on_road(), 0.0);

    // driving after the reset behaves like a fresh session
    session.tick(on_road_sample(300.0, 5.0));
    settle(&mut session).await;
    assert_eq!(session.points(), 0);
    session.tick(on_road_sample(400.0, 5.0));
    settle(&mut session).await;
    assert_eq!(session.points(), 500);
}

#[tokio::test]
async fn test_fallback_classification_is_stable_across_ticks() {
    let mut session = fallback_session();

    // repeated samples at the same off-road cell never flip on-road
    session.tick(off_road_sample());
    settle(&mut session).await;
    for _ in 0..5 {
        session.tick(off_road_sample());
        settle(&mut session).await;
    }

    assert!(!session.is_on_road());
    assert_eq!(session.points(), 0);
}

#[tokio::test]
async fn test_runtime_tolerance_adjustment() {
    let session = fallback_session();

    assert_eq!(session.classifier().tolerance(), 10.0);
    session.classifier().set_tolerance(25.0);
    assert_eq!(session.classifier().tolerance(), 25.0);
}
