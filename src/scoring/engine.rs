//! Point accumulation state machine.
//!
//! T030: Implement ScoreEngine update rule
//! T031: Implement multiplier ramp and off-road reset

use crate::config::ScoringSettings;
use crate::geo::{haversine_distance, LatLng};
use crate::scoring::achievements::{self, Achievement};

/// Movement below this distance is stationary jitter, not driving.
///
/// Absorbs floating-point noise in the position stream while the vehicle
/// sits still; such samples are recorded but never scored.
const STATIONARY_EPSILON_M: f64 = 0.0001;

/// Multiplier step applied after each sustained on-road interval.
const MULTIPLIER_STEP: f64 = 0.1;

/// Speed at which the speed bonus saturates is `divisor * cap`.
const SPEED_BONUS_DIVISOR: f64 = 5.0;

/// Converts classified motion samples into a running point total.
///
/// Consumed once per simulation tick. On-road driving earns points scaled
/// by an escalating multiplier and a speed bonus; off-road driving bleeds
/// points away and resets the multiplier. The total never goes below zero.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    settings: ScoringSettings,
    /// Accumulated points
    points: u64,
    /// Current scoring multiplier
    multiplier: f64,
    /// Seconds of uninterrupted on-road driving since the last multiplier step
    consecutive_road_time: f64,
    /// Meters driven while on-road
    total_distance_on_road: f64,
    /// Previous position sample, absent before the first update
    last_position: Option<LatLng>,
    /// Classification of the most recent sample
    on_road: bool,
}

impl ScoreEngine {
    /// Create an engine at the fresh-session baseline.
    pub fn new(settings: ScoringSettings) -> Self {
        Self {
            settings,
            points: 0,
            multiplier: 1.0,
            consecutive_road_time: 0.0,
            total_distance_on_road: 0.0,
            last_position: None,
            on_road: false,
        }
    }

    /// Apply one classified motion sample.
    ///
    /// The first call after construction or [`reset`](Self::reset) records
    /// the baseline position without scoring. `speed` and `delta_time` come
    /// from the trusted motion producer and are not validated.
    pub fn update(&mut self, position: LatLng, on_road: bool, speed: f64, delta_time: f64) {
        if let Some(last) = self.last_position {
            let distance = haversine_distance(last, position);

            if distance > STATIONARY_EPSILON_M {
                if on_road {
                    self.score_on_road(distance, speed, delta_time);
                } else {
                    self.apply_penalty(distance);
                }
            }
        }

        self.last_position = Some(position);
        self.on_road = on_road;
    }

    /// Return every field to the fresh-session baseline.
    pub fn reset(&mut self) {
        self.points = 0;
        self.multiplier = 1.0;
        self.consecutive_road_time = 0.0;
        self.total_distance_on_road = 0.0;
        self.last_position = None;
        self.on_road = false;
    }

    /// Accumulated points.
    pub fn points(&self) -> u64 {
        self.points
    }

    /// Current scoring multiplier.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Meters driven while on-road.
    pub fn distance_on_road(&self) -> f64 {
        self.total_distance_on_road
    }

    /// Classification of the most recent sample.
    pub fn is_on_road(&self) -> bool {
        self.on_road
    }

    /// Previous position sample, absent before the first update.
    pub fn last_position(&self) -> Option<LatLng> {
        self.last_position
    }

    /// Achievement labels currently satisfied by the running totals.
    pub fn achievements(&self) -> Vec<Achievement> {
        achievements::unlocked(self.points, self.total_distance_on_road)
    }

    fn score_on_road(&mut self, distance: f64, speed: f64, delta_time: f64) {
        let base = distance * self.settings.points_per_meter;
        let speed_bonus = (speed / SPEED_BONUS_DIVISOR).min(self.settings.speed_bonus_cap);
        let earned = (base * self.multiplier * speed_bonus).floor() as u64;

        self.points += earned;
        self.total_distance_on_road += distance;

        self.consecutive_road_time += delta_time;
        if self.consecutive_road_time >= self.settings.multiplier_ramp_secs {
            self.multiplier = (self.multiplier + MULTIPLIER_STEP).min(self.settings.max_multiplier);
            self.consecutive_road_time = 0.0;
        }
    }

    fn apply_penalty(&mut self, distance: f64) {
        let penalty = (distance * self.settings.off_road_penalty_per_meter).floor() as u64;

        self.points = self.points.saturating_sub(penalty);
        self.multiplier = 1.0;
        self.consecutive_road_time = 0.0;
    }
}
