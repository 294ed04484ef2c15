//! Road classification module.
//!
//! Answers whether a coordinate lies on a road, using a remote nearest-road
//! snapping service with a bounded-TTL cache in front of it and a
//! deterministic offline grid when the service is unavailable.

pub mod cache;
pub mod classifier;
pub mod types;

// Re-exports for convenience
pub use cache::{CacheStats, ClassificationCache};
pub use classifier::{FixedMapView, MapView, RoadClassifier};
pub use types::{ClassifierMode, RoadsError, SnapResponse, SnappedLocation, SnappedPoint};
