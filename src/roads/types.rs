//! Shared road classification types and error definitions.
//!
//! T020: Create shared types for roads module

use serde::Deserialize;
use thiserror::Error;

/// Error types for road snapping operations.
///
/// These never escape [`RoadClassifier::classify`](super::RoadClassifier::classify);
/// every failure is absorbed into a fallback classification and a mode
/// transition. The variants exist for the internal request path and logging.
#[derive(Debug, Error)]
pub enum RoadsError {
    /// No API credential configured
    #[error("no road API credential configured")]
    MissingCredential,

    /// Request exceeded the configured timeout
    #[error("road snap request timed out")]
    Timeout,

    /// Transport-level failure (DNS, connect, TLS)
    #[error("road snap transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("road snap API returned status {0}")]
    BadStatus(u16),

    /// Response body could not be decoded
    #[error("road snap response decode error: {0}")]
    Decode(String),
}

/// Operating mode of a [`RoadClassifier`](super::RoadClassifier) instance.
///
/// A classifier starts in `Live` when a credential is configured and
/// transitions to `Fallback` on the first query failure. It never
/// transitions back within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClassifierMode {
    /// Classifying via the remote road snapping service
    Live = 0,
    /// Classifying via the deterministic offline grid heuristic
    Fallback = 1,
}

impl ClassifierMode {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => ClassifierMode::Live,
            _ => ClassifierMode::Fallback,
        }
    }

    /// Get display label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            ClassifierMode::Live => "Live Road Data",
            ClassifierMode::Fallback => "Fallback Mode",
        }
    }
}

impl std::fmt::Display for ClassifierMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Response body of the nearest-roads snapping API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapResponse {
    /// Snapped points, absent entirely when no road is nearby
    #[serde(default)]
    pub snapped_points: Vec<SnappedPoint>,
}

/// A single road-snapped point.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnappedPoint {
    /// The coordinate snapped onto the road centerline
    pub location: SnappedLocation,
    /// Index of the query coordinate this point answers (batch queries)
    pub original_index: Option<usize>,
    /// Provider place identifier for the matched road segment
    pub place_id: Option<String>,
}

/// Snapped coordinate as reported by the service.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SnappedLocation {
    pub latitude: f64,
    pub longitude: f64,
}
