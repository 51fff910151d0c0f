//! Preview Overlay
//!
//! Color schemes for the angry/calm states and the bounding box plus
//! "Anger: NN%" label drawn over the (mirrored) camera preview.

mod palette;
mod scene;

pub use palette::Palette;
pub use scene::{render_png, render_scene, BoxStroke, Label, OverlayScene};

use thiserror::Error;

/// Overlay error types
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Invalid color: {0}")]
    Color(String),

    #[error("Encoding failed: {0}")]
    Encode(String),
}
