//! RustDrive - Driving Simulation Scoring Engine
//!
//! The scoring and road-classification core of a map-overlay driving
//! simulation. Consumes a per-tick stream of position samples, classifies
//! each as on-road or off-road via a remote road snapping service (with a
//! deterministic offline fallback), and converts on-road driving distance
//! into a multiplier-amplified point total for the heads-up display.

pub mod config;
pub mod geo;
pub mod roads;
pub mod scoring;
pub mod session;

// Re-export commonly used types
pub use config::SimConfig;
pub use geo::LatLng;
pub use roads::RoadClassifier;
pub use scoring::ScoreEngine;
pub use session::DriveSession;
