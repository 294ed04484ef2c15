//! Road classifier backed by a remote snapping service.
//!
//! T023: Implement RoadClassifier with cached snap queries
//! T024: Implement deterministic fallback grid heuristic
//! T025: Unify failure handling onto the fallback path

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use super::cache::{CacheStats, ClassificationCache};
use super::types::{ClassifierMode, RoadsError, SnapResponse, SnappedPoint};
use crate::config::ClassifierSettings;
use crate::geo::{haversine_distance, LatLng};

/// Read-only view of the map the vehicle is driving over.
///
/// The classifier only ever queries the current center and zoom to seed the
/// fallback grid; map lifecycle stays with the owner.
pub trait MapView: Send + Sync {
    /// Current map center.
    fn center(&self) -> LatLng;
    /// Current zoom level.
    fn zoom(&self) -> f32;
}

/// A map view pinned to a fixed center and zoom.
///
/// Used by the demo binary and tests, where no interactive map exists.
#[derive(Debug, Clone, Copy)]
pub struct FixedMapView {
    /// Map center
    pub center: LatLng,
    /// Zoom level
    pub zoom: f32,
}

impl MapView for FixedMapView {
    fn center(&self) -> LatLng {
        self.center
    }

    fn zoom(&self) -> f32 {
        self.zoom
    }
}

/// Classifies coordinates as on-road or off-road.
///
/// Queries a nearest-road snapping service with a bounded-TTL cache in
/// front of it. Every failure path resolves through the deterministic
/// fallback grid instead of an error: gameplay never halts on a network
/// problem, the classifier just degrades to [`ClassifierMode::Fallback`].
pub struct RoadClassifier {
    /// HTTP client, carries the request timeout
    http: reqwest::Client,
    /// Base URL of the snapping API
    base_url: String,
    /// API credential; `None` means fallback-only operation
    api_key: Option<String>,
    /// Snap distance threshold in meters, stored as f64 bits
    tolerance_m: AtomicU64,
    /// Current operating mode
    mode: AtomicU8,
    /// Classification cache keyed by rounded coordinate
    cache: Mutex<ClassificationCache>,
    /// Map handle for the fallback grid
    map: Arc<dyn MapView>,
}

impl RoadClassifier {
    /// Create a classifier from settings and a map handle.
    ///
    /// Without an API credential the classifier starts in fallback mode and
    /// never attempts the remote service.
    pub fn new(settings: &ClassifierSettings, map: Arc<dyn MapView>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let mode = match settings.api_key {
            Some(_) => ClassifierMode::Live,
            None => {
                tracing::info!("no road API credential configured, using fallback grid");
                ClassifierMode::Fallback
            }
        };

        Self {
            http,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            tolerance_m: AtomicU64::new(settings.road_tolerance_m.to_bits()),
            mode: AtomicU8::new(mode as u8),
            cache: Mutex::new(ClassificationCache::new(
                Duration::from_secs(settings.cache_ttl_secs),
                settings.cache_capacity,
            )),
            map,
        }
    }

    /// Current operating mode.
    pub fn mode(&self) -> ClassifierMode {
        ClassifierMode::from_u8(self.mode.load(Ordering::Relaxed))
    }

    /// Current snap distance threshold in meters.
    pub fn tolerance(&self) -> f64 {
        f64::from_bits(self.tolerance_m.load(Ordering::Relaxed))
    }

    /// Adjust the snap distance threshold at runtime.
    pub fn set_tolerance(&self, meters: f64) {
        self.tolerance_m.store(meters.to_bits(), Ordering::Relaxed);
    }

    /// Classify a single coordinate as on-road or off-road.
    ///
    /// Consults the cache first, then the remote service. Failures are
    /// absorbed: the answer comes from the fallback grid and the mode
    /// flips to fallback for status reporting.
    pub async fn classify(&self, position: LatLng) -> bool {
        let key = position.cache_key();

        {
            let mut cache = self.cache.lock().await;
            if let Some(on_road) = cache.get(&key) {
                return on_road;
            }
        }

        if self.api_key.is_none() {
            return self.fallback_on_road(position);
        }

        match self.snap_single(position).await {
            Ok(on_road) => {
                self.cache.lock().await.insert(key, on_road);
                on_road
            }
            Err(err) => {
                tracing::warn!("road snap query failed: {err}");
                self.enter_fallback();
                // Fallback answers are not cached so a later query for a
                // fresh coordinate still probes the service.
                self.fallback_on_road(position)
            }
        }
    }

    /// Classify an ordered list of coordinates with one combined query.
    ///
    /// The result has the same length as the input. Indices absent from the
    /// response's snapped-point set stay off-road; present indices are
    /// matched through the service's original-index back-reference, never
    /// by position order.
    pub async fn classify_batch(&self, positions: &[LatLng]) -> Vec<bool> {
        if positions.is_empty() {
            return Vec::new();
        }

        if self.api_key.is_none() {
            return positions.iter().map(|p| self.fallback_on_road(*p)).collect();
        }

        let joined = positions
            .iter()
            .map(LatLng::query_pair)
            .collect::<Vec<_>>()
            .join("|");

        match self.request_snap(&joined).await {
            Ok(snapped) => {
                let out = self.match_batch(positions, &snapped);

                let mut cache = self.cache.lock().await;
                for (position, on_road) in positions.iter().zip(&out) {
                    cache.insert(position.cache_key(), *on_road);
                }

                out
            }
            Err(err) => {
                tracing::warn!("batch road snap query failed: {err}");
                self.enter_fallback();
                positions.iter().map(|p| self.fallback_on_road(*p)).collect()
            }
        }
    }

    /// Deterministic offline classification from a synthetic road grid.
    ///
    /// Projects the offset from the map center into integer grid cells and
    /// reads a fixed major/minor road pattern off the cell coordinates. A
    /// known-approximate substitute for the real service, not geodesic
    /// truth, but it needs no network and always returns the same answer
    /// for a fixed center and coordinate.
    pub fn fallback_on_road(&self, position: LatLng) -> bool {
        let center = self.map.center();
        tracing::trace!(zoom = self.map.zoom(), "fallback grid classification");

        let gx = ((position.latitude - center.latitude) * 10_000.0).round() as i64;
        let gy = ((position.longitude - center.longitude) * 10_000.0).round() as i64;

        let cx = gx.rem_euclid(10);
        let cy = gy.rem_euclid(10);

        // major roads on every fifth grid line, minor roads on even cells
        let major = cx == 0 || cx == 5 || cy == 0 || cy == 5;
        let minor = cx % 2 == 0 || cy % 2 == 0;

        major || minor
    }

    /// Snapshot of the classification cache statistics.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }

    /// Drop all cached classifications.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    /// Snap one coordinate and compare against the tolerance.
    async fn snap_single(&self, position: LatLng) -> Result<bool, RoadsError> {
        let snapped = self.request_snap(&position.query_pair()).await?;

        // no snapped point is a valid "no road nearby" answer
        let Some(point) = snapped.first() else {
            return Ok(false);
        };

        let snapped_position = LatLng::new(point.location.latitude, point.location.longitude);
        let snap_distance = haversine_distance(position, snapped_position);

        Ok(snap_distance <= self.tolerance())
    }

    /// Issue a nearest-roads query for a `|`-joined list of pairs.
    async fn request_snap(&self, points: &str) -> Result<Vec<SnappedPoint>, RoadsError> {
        let key = self.api_key.as_deref().ok_or(RoadsError::MissingCredential)?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("points", points), ("key", key)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoadsError::Timeout
                } else {
                    RoadsError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoadsError::BadStatus(status.as_u16()));
        }

        let body: SnapResponse = response
            .json()
            .await
            .map_err(|e| RoadsError::Decode(e.to_string()))?;

        Ok(body.snapped_points)
    }

    /// Resolve a batch response against the query positions.
    fn match_batch(&self, positions: &[LatLng], snapped: &[SnappedPoint]) -> Vec<bool> {
        let tolerance = self.tolerance();
        let mut out = vec![false; positions.len()];

        for point in snapped {
            let Some(index) = point.original_index else {
                continue;
            };
            if index >= positions.len() {
                tracing::warn!("snap response index {index} out of range, ignoring");
                continue;
            }

            let snapped_position = LatLng::new(point.location.latitude, point.location.longitude);
            let snap_distance = haversine_distance(positions[index], snapped_position);
            if snap_distance <= tolerance {
                out[index] = true;
            }
        }

        out
    }

    fn enter_fallback(&self) {
        let previous = self.mode.swap(ClassifierMode::Fallback as u8, Ordering::Relaxed);
        if previous == ClassifierMode::Live as u8 {
            tracing::info!("road classifier entering fallback mode");
        }
    }
}
