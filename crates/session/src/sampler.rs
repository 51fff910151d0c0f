//! Sampling loop implementation

use std::time::Instant;

use alerting::{AlertDebouncer, AlertDecision, AlertSink};
use camera_capture::{CameraConfig, FrameSource};
use expression::{
    AngerTracker, DetectOptions, EmotionReading, ExpressionConfig, ExpressionDetector,
    ExpressionError, FaceDetection,
};
use overlay::{OverlayScene, Palette};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::{DisplaySnapshot, SessionConfig, SessionError, Status};

/// Result of processing one detection result
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing detected; overlay cleared, everything else untouched
    NoFace,
    Face {
        reading: EmotionReading,
        rising_edge: bool,
        /// Set only on a rising edge
        alert: Option<AlertDecision>,
    },
}

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub failures: u64,
    pub alerts: u64,
}

/// One viewer's sampling session.
///
/// Owns all mutable loop state: the anger tracker, the alert debouncer, and
/// the display snapshot it publishes.
pub struct EmotionSession<S> {
    config: SessionConfig,
    expression: ExpressionConfig,
    mirrored: bool,
    tracker: AngerTracker,
    debouncer: AlertDebouncer<S>,
    snapshot: DisplaySnapshot,
    display: watch::Sender<DisplaySnapshot>,
}

impl<S: AlertSink> EmotionSession<S> {
    /// Create a new session
    pub fn new(
        config: SessionConfig,
        expression: ExpressionConfig,
        debouncer: AlertDebouncer<S>,
    ) -> Self {
        info!(
            "Creating emotion session: poll every {}ms, anger threshold {}",
            config.poll_interval_ms, expression.anger_threshold
        );
        let snapshot = DisplaySnapshot::default();
        let (display, _) = watch::channel(snapshot.clone());

        Self {
            config,
            expression,
            mirrored: true,
            tracker: AngerTracker::new(),
            debouncer,
            snapshot,
            display,
        }
    }

    /// Take the preview size and mirroring from the camera settings
    pub fn with_camera(mut self, camera: &CameraConfig) -> Self {
        self.mirrored = camera.mirrored;
        self.snapshot.overlay = OverlayScene::empty(camera.width, camera.height);
        self.publish();
        self
    }

    /// Receive display snapshots
    pub fn subscribe(&self) -> watch::Receiver<DisplaySnapshot> {
        self.display.subscribe()
    }

    pub fn snapshot(&self) -> &DisplaySnapshot {
        &self.snapshot
    }

    pub fn tracker(&self) -> &AngerTracker {
        &self.tracker
    }

    pub fn debouncer(&self) -> &AlertDebouncer<S> {
        &self.debouncer
    }

    /// Update the status line
    pub fn set_status(&mut self, status: Status) {
        info!("Status: {}", status);
        self.snapshot.status = status;
        self.publish();
    }

    /// Handle one detector result taken from a `frame_width` x `frame_height` frame
    pub fn process(
        &mut self,
        detections: &[FaceDetection],
        frame_width: u32,
        frame_height: u32,
        now: Instant,
    ) -> TickOutcome {
        metrics::counter!("emotion_ticks_total").increment(1);
        self.snapshot.ticks += 1;

        let Some(face) = detections.first() else {
            self.snapshot.face_present = false;
            self.snapshot.overlay = OverlayScene::empty(frame_width, frame_height);
            self.publish();
            return TickOutcome::NoFace;
        };

        let reading = EmotionReading::from_face(face, self.expression.anger_threshold);
        let rising_edge = self.tracker.observe(reading.is_angry);
        let alert = if rising_edge {
            debug!("Anger rising edge at {}%", reading.anger_percentage);
            let decision = self.debouncer.request(now);
            if decision.accepted() {
                metrics::counter!("anger_alerts_total").increment(1);
            }
            Some(decision)
        } else {
            None
        };

        metrics::gauge!("anger_percentage").set(reading.anger_percentage as f64);

        self.snapshot.face_present = true;
        self.snapshot.anger_percentage = reading.anger_percentage;
        self.snapshot.dominant_emotion = reading.dominant_label();
        self.snapshot.is_angry = reading.is_angry;
        self.snapshot.palette = Palette::for_state(reading.is_angry);
        self.snapshot.overlay =
            OverlayScene::for_reading(&reading, frame_width, frame_height, self.mirrored);
        self.snapshot.alert_count = self.debouncer.fire_count();
        if alert.is_some() {
            self.snapshot.last_alert = alert;
        }
        self.publish();

        TickOutcome::Face {
            reading,
            rising_edge,
            alert,
        }
    }

    /// Grab a frame, await the detector, process the result
    pub async fn tick<F, D>(
        &mut self,
        source: &mut F,
        detector: &mut D,
        options: &DetectOptions,
    ) -> Result<TickOutcome, SessionError>
    where
        F: FrameSource,
        D: ExpressionDetector,
    {
        let frame = source.next_frame()?;
        let timeout = self.config.detect_timeout();

        let detections = tokio::time::timeout(timeout, detector.detect(&frame, options))
            .await
            .map_err(|_| ExpressionError::Timeout(timeout.as_millis() as u64))??;

        let now = tokio::time::Instant::now().into_std();
        Ok(self.process(&detections, frame.width, frame.height, now))
    }

    /// Run until `shutdown` turns true (or its sender goes away).
    ///
    /// Each detector call finishes before the next tick is scheduled, so
    /// calls never overlap. A failed tick is logged and skipped.
    pub async fn run<F, D>(
        &mut self,
        source: &mut F,
        detector: &mut D,
        mut shutdown: watch::Receiver<bool>,
    ) -> RunSummary
    where
        F: FrameSource,
        D: ExpressionDetector,
    {
        let options = self.expression.detect_options();
        let mut ticker = tokio::time::interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut summary = RunSummary::default();
        self.set_status(Status::Ready);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            summary.ticks += 1;
            match self.tick(source, detector, &options).await {
                Ok(TickOutcome::Face {
                    alert: Some(decision),
                    ..
                }) if decision.accepted() => summary.alerts += 1,
                Ok(_) => {}
                Err(e) => {
                    summary.failures += 1;
                    metrics::counter!("detection_failures_total").increment(1);
                    warn!("Skipping tick {}: {}", summary.ticks, e);
                }
            }
        }

        info!(
            "Sampling stopped after {} ticks ({} failed, {} alerts)",
            summary.ticks, summary.failures, summary.alerts
        );
        self.set_status(Status::Stopped);
        summary
    }

    fn publish(&mut self) {
        self.snapshot.touch();
        self.display.send_replace(self.snapshot.clone());
    }
}
