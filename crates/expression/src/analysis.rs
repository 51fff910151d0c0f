//! Per-face emotion readings

use serde::{Deserialize, Serialize};

use crate::detector::{FaceBox, FaceDetection};

/// Label the detector uses for anger
pub const ANGER_LABEL: &str = "angry";

/// Everything the loop derives from one detected face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    /// Anger confidence in [0, 1] (missing label counts as 0)
    pub anger_score: f32,

    /// Rounded anger percentage for display
    pub anger_percentage: u8,

    /// Highest scoring label as reported by the detector
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_emotion: Option<String>,

    /// Anger score strictly above the threshold
    pub is_angry: bool,

    /// Where the face is
    pub bbox: FaceBox,
}

impl EmotionReading {
    /// Read one face against the anger threshold
    pub fn from_face(face: &FaceDetection, anger_threshold: f32) -> Self {
        let anger_score = sanitize(face.expressions.get(ANGER_LABEL).unwrap_or(0.0));

        Self {
            anger_score,
            anger_percentage: anger_percentage(anger_score),
            dominant_emotion: dominant_emotion(face).map(str::to_string),
            is_angry: anger_score > anger_threshold,
            bbox: face.bbox,
        }
    }

    /// Dominant emotion as shown to the user ("Angry")
    pub fn dominant_label(&self) -> String {
        self.dominant_emotion
            .as_deref()
            .map(capitalize)
            .unwrap_or_default()
    }
}

/// Score in [0, 1] to a rounded percentage (0.734 -> 73).
///
/// Scaled in f64 so the exact value of the f32 score decides the rounding.
pub fn anger_percentage(score: f32) -> u8 {
    (f64::from(sanitize(score)) * 100.0).round() as u8
}

/// Label with the highest score.
///
/// Strict comparison: on a tie the label enumerated first wins. A label has to
/// score above zero to be picked at all.
pub fn dominant_emotion(face: &FaceDetection) -> Option<&str> {
    let mut best: Option<(&str, f32)> = None;
    for (label, score) in face.expressions.iter() {
        let highest = best.map_or(0.0, |(_, s)| s);
        if score > highest {
            best = Some((label, score));
        }
    }
    best.map(|(label, _)| label)
}

/// Upper-case the first character
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn sanitize(score: f32) -> f32 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
