//! Detector provider seam and detection types

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use camera_capture::VideoFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ExpressionError;

/// Face bounding box in frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 {
    1.0
}

impl FaceBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: 1.0,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Emotion label scores in the order the detector enumerated them.
///
/// Order matters: it decides which label wins a tie for dominant emotion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expressions(Vec<(String, f32)>);

impl Expressions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label score, keeping enumeration order
    pub fn with(mut self, label: &str, score: f32) -> Self {
        self.0.push((label.to_string(), score));
        self
    }

    /// Score for a label (first occurrence)
    pub fn get(&self, label: &str) -> Option<f32> {
        self.0
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(name, score)| (name.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f32)> for Expressions {
    fn from_iter<I: IntoIterator<Item = (S, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, score)| (name.into(), score)).collect())
    }
}

/// One detected face with its expression scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub bbox: FaceBox,
    pub expressions: Expressions,
}

/// Per-call detector options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectOptions {
    /// Detector input resolution (square)
    pub input_size: u32,
    /// Minimum face confidence
    pub score_threshold: f32,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            input_size: 224,
            score_threshold: 0.5,
        }
    }
}

/// External face + expression detector.
///
/// Returns zero or more faces, the closest/largest first.
pub trait ExpressionDetector {
    fn detect(
        &mut self,
        frame: &VideoFrame,
        options: &DetectOptions,
    ) -> impl Future<Output = Result<Vec<FaceDetection>, ExpressionError>> + Send;
}

/// Hands out queued results, then reports no faces.
pub struct ScriptedDetector {
    script: VecDeque<Result<Vec<FaceDetection>, ExpressionError>>,
    delay: Option<Duration>,
    calls: usize,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            delay: None,
            calls: 0,
        }
    }

    /// Queue a result for a later call
    pub fn push(&mut self, result: Result<Vec<FaceDetection>, ExpressionError>) {
        self.script.push_back(result);
    }

    /// Queue a single face with the given scores
    pub fn push_face(&mut self, bbox: FaceBox, expressions: Expressions) {
        self.push(Ok(vec![FaceDetection { bbox, expressions }]));
    }

    /// Simulate slow inference
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of detect calls so far
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Default for ScriptedDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionDetector for ScriptedDetector {
    async fn detect(
        &mut self,
        _frame: &VideoFrame,
        _options: &DetectOptions,
    ) -> Result<Vec<FaceDetection>, ExpressionError> {
        self.calls += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Replays recorded detector output, one JSON array of faces per line,
/// looping back to the first line at the end.
pub struct ReplayDetector {
    frames: Vec<Vec<FaceDetection>>,
    cursor: usize,
}

impl ReplayDetector {
    /// Load a recording from disk
    pub fn open(path: &str) -> Result<Self, ExpressionError> {
        info!("Loading detector recording from {}", path);
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExpressionError::ModelLoad(format!("{}: {}", path, e)))?;
        Self::parse(&content)
    }

    /// Parse a recording
    pub fn parse(content: &str) -> Result<Self, ExpressionError> {
        let mut frames = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let faces: Vec<FaceDetection> = serde_json::from_str(line)
                .map_err(|e| ExpressionError::Replay(format!("line {}: {}", lineno + 1, e)))?;
            frames.push(faces);
        }

        if frames.is_empty() {
            return Err(ExpressionError::Replay("recording has no frames".into()));
        }

        debug!("Recording holds {} frames", frames.len());
        Ok(Self { frames, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl ExpressionDetector for ReplayDetector {
    async fn detect(
        &mut self,
        _frame: &VideoFrame,
        options: &DetectOptions,
    ) -> Result<Vec<FaceDetection>, ExpressionError> {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.frames.len();

        Ok(self.frames[index]
            .iter()
            .filter(|face| face.bbox.confidence >= options.score_threshold)
            .cloned()
            .collect())
    }
}
