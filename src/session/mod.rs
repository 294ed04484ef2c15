//! Drive session orchestration.
//!
//! T040: Implement DriveSession tick plumbing
//! T041: Sequence classification completions, discard stale results
//!
//! One session owns the score engine and the road classifier and wires them
//! together once per simulation tick. Classification is the only suspension
//! point in the system, so the tick never waits for it: each sample's
//! classification runs on a spawned task and its result is applied on a
//! later tick, guarded by a sequence number so a slow completion can never
//! overwrite a newer one.

pub mod hud;
pub mod status;

// Re-exports for convenience
pub use status::{LogStatusSink, StatusColor, StatusSink};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossbeam::channel::{unbounded, Receiver, Sender};

use crate::config::SimConfig;
use crate::geo::LatLng;
use crate::roads::{CacheStats, ClassifierMode, MapView, RoadClassifier};
use crate::scoring::{Achievement, ScoreEngine};

/// One position sample from the motion producer.
#[derive(Debug, Clone, Copy)]
pub struct MotionSample {
    /// Vehicle position
    pub position: LatLng,
    /// Speed in simulation units
    pub speed: f64,
    /// Seconds since the previous sample
    pub delta_time: f64,
}

/// A classification that resolved for a ticked sample.
#[derive(Debug, Clone, Copy)]
struct Completion {
    seq: u64,
    sample: MotionSample,
    on_road: bool,
}

/// A running drive session.
///
/// [`tick`](Self::tick) must be called from within a tokio runtime; it
/// spawns the classification for each sample and returns immediately.
pub struct DriveSession {
    engine: ScoreEngine,
    classifier: Arc<RoadClassifier>,
    sink: Box<dyn StatusSink>,
    completed_rx: Receiver<Completion>,
    completed_tx: Sender<Completion>,
    /// Sequence number handed to the next classification request
    next_seq: u64,
    /// Completions below this sequence predate the last reset
    seq_floor: u64,
    /// Highest sequence applied to the engine
    last_applied: Option<u64>,
    /// Mode last pushed to the status sink
    reported_mode: Option<ClassifierMode>,
    /// Whether the classifier had live road data at session start
    started_live: bool,
    /// Session start time
    started_at: DateTime<Utc>,
}

impl DriveSession {
    /// Create a session from configuration, a map handle, and a status sink.
    pub fn new(config: &SimConfig, map: Arc<dyn MapView>, sink: Box<dyn StatusSink>) -> Self {
        let classifier = Arc::new(RoadClassifier::new(&config.classifier, map));
        let engine = ScoreEngine::new(config.scoring.clone());
        Self::with_parts(classifier, engine, sink)
    }

    /// Create a session from pre-built components.
    pub fn with_parts(
        classifier: Arc<RoadClassifier>,
        engine: ScoreEngine,
        sink: Box<dyn StatusSink>,
    ) -> Self {
        let (completed_tx, completed_rx) = unbounded();
        let started_live = classifier.mode() == ClassifierMode::Live;

        Self {
            engine,
            classifier,
            sink,
            completed_rx,
            completed_tx,
            next_seq: 1,
            seq_floor: 0,
            last_applied: None,
            reported_mode: None,
            started_live,
            started_at: Utc::now(),
        }
    }

    /// Feed one motion sample into the session.
    ///
    /// Applies any classifications that resolved since the previous tick,
    /// then issues the classification for this sample without waiting on
    /// it. Score updates for a sample therefore land one or more ticks
    /// after the position that produced them.
    pub fn tick(&mut self, sample: MotionSample) {
        self.apply_completed();

        let seq = self.next_seq;
        self.next_seq += 1;

        let classifier = Arc::clone(&self.classifier);
        let tx = self.completed_tx.clone();
        tokio::spawn(async move {
            let on_road = classifier.classify(sample.position).await;
            let _ = tx.send(Completion {
                seq,
                sample,
                on_road,
            });
        });

        self.publish_status();
    }

    /// Drain resolved classifications into the score engine.
    ///
    /// Called at the start of every tick; also callable directly to settle
    /// the session after the last tick. Completions from before the last
    /// reset and completions older than the newest applied one are
    /// discarded, never applied.
    pub fn apply_completed(&mut self) {
        while let Ok(completion) = self.completed_rx.try_recv() {
            if completion.seq < self.seq_floor {
                tracing::debug!(seq = completion.seq, "discarding pre-reset classification");
                continue;
            }
            if self.last_applied.is_some_and(|applied| completion.seq <= applied) {
                tracing::debug!(seq = completion.seq, "discarding stale classification");
                continue;
            }

            self.engine.update(
                completion.sample.position,
                completion.on_road,
                completion.sample.speed,
                completion.sample.delta_time,
            );
            self.last_applied = Some(completion.seq);
        }
    }

    /// Reset the score to the fresh-session baseline.
    ///
    /// In-flight classifications issued before the reset are discarded when
    /// they resolve instead of mutating the fresh state.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.seq_floor = self.next_seq;
        self.last_applied = None;
        tracing::info!("score reset");
    }

    /// Accumulated points.
    pub fn points(&self) -> u64 {
        self.engine.points()
    }

    /// Current scoring multiplier.
    pub fn multiplier(&self) -> f64 {
        self.engine.multiplier()
    }

    /// Meters driven while on-road.
    pub fn distance_on_road(&self) -> f64 {
        self.engine.distance_on_road()
    }

    /// Whether the latest applied sample was on-road.
    pub fn is_on_road(&self) -> bool {
        self.engine.is_on_road()
    }

    /// Achievements satisfied by the running totals.
    pub fn achievements(&self) -> Vec<Achievement> {
        self.engine.achievements()
    }

    /// The session's road classifier.
    pub fn classifier(&self) -> &Arc<RoadClassifier> {
        &self.classifier
    }

    /// Snapshot of the classification cache statistics.
    pub async fn cache_stats(&self) -> CacheStats {
        self.classifier.cache_stats().await
    }

    /// Session start time.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    fn publish_status(&mut self) {
        let mode = self.classifier.mode();
        if self.reported_mode == Some(mode) {
            return;
        }

        let (label, color) = match mode {
            ClassifierMode::Live => ("Live Road Data", StatusColor::Green),
            ClassifierMode::Fallback if self.started_live => {
                ("API Error - Fallback Mode", StatusColor::Red)
            }
            ClassifierMode::Fallback => ("Fallback Mode", StatusColor::Orange),
        };

        self.sink.update_api_status(label, color);
        self.reported_mode = Some(mode);
    }
}
