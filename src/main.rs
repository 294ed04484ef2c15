//! RustDrive - Driving Simulation Scoring Engine
//!
//! Demo entry point: drives a synthetic loop in fallback mode and logs the
//! resulting score, exercising the full classification and scoring stack
//! without network access.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rustdrive::config::{get_config_path, load_config};
use rustdrive::geo::LatLng;
use rustdrive::roads::FixedMapView;
use rustdrive::session::{hud, DriveSession, LogStatusSink, MotionSample};

/// Simulated tick interval.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Number of ticks to drive.
const TICKS: u32 = 100;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RustDrive v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&get_config_path())?;
    let map = Arc::new(FixedMapView {
        center: LatLng::new(48.8584, 2.2945),
        zoom: 15.0,
    });

    let mut session = DriveSession::new(&config, map, Box::new(LogStatusSink));

    // Drive north along the map center's grid line at roughly 10 m per tick.
    for tick in 0..TICKS {
        let meters = tick as f64 * 10.0;
        let sample = MotionSample {
            position: LatLng::new(48.8584 + meters / 111_194.9, 2.2945),
            speed: 10.0,
            delta_time: TICK_INTERVAL.as_secs_f64(),
        };

        session.tick(sample);
        tokio::time::sleep(TICK_INTERVAL).await;
    }

    // let the last classification land
    tokio::time::sleep(TICK_INTERVAL).await;
    session.apply_completed();

    tracing::info!(
        "drive complete: {} | {} | {}",
        hud::format_points(session.points()),
        hud::format_multiplier(session.multiplier()),
        hud::format_road_distance(session.distance_on_road()),
    );

    for achievement in session.achievements() {
        tracing::info!("achievement unlocked: {achievement}");
    }

    let stats = session.cache_stats().await;
    tracing::info!(
        "classification cache: {} entries, {:.0}% hit rate",
        stats.entries,
        stats.hit_rate() * 100.0
    );

    Ok(())
}
