//! Bounding box overlay

use std::io::Cursor;

use expression::EmotionReading;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use serde::Serialize;
use tracing::debug;

use crate::{OverlayError, Palette};

/// Box stroke width in pixels
const LINE_WIDTH: u32 = 3;
/// Label font size in pixels
const FONT_PX: u32 = 16;
/// Boxes closer than this to the top get their label underneath
const LABEL_TOP_MARGIN: f32 = 20.0;

/// Rectangle outline around the face
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStroke {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: &'static str,
    pub line_width: u32,
}

/// Text next to the box.
///
/// With `mirrored` set, the text is drawn flipped horizontally so it reads
/// correctly on a flipped preview; `x` is then where the flipped text starts
/// in frame coordinates (the box's right edge).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub mirrored: bool,
    pub color: &'static str,
    pub font_px: u32,
}

/// Everything drawn over one frame. Empty when no face is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayScene {
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<BoxStroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl OverlayScene {
    /// Cleared overlay
    pub fn empty(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            stroke: None,
            label: None,
        }
    }

    /// Box and anger label for a reading
    pub fn for_reading(
        reading: &EmotionReading,
        frame_width: u32,
        frame_height: u32,
        mirrored: bool,
    ) -> Self {
        let palette = Palette::for_state(reading.is_angry);
        let bbox = reading.bbox;

        let y = if bbox.y > LABEL_TOP_MARGIN {
            bbox.y - 10.0
        } else {
            bbox.bottom() + 20.0
        };
        let x = if mirrored { bbox.right() } else { bbox.x };

        Self {
            frame_width,
            frame_height,
            stroke: Some(BoxStroke {
                x: bbox.x,
                y: bbox.y,
                width: bbox.width,
                height: bbox.height,
                color: palette.accent,
                line_width: LINE_WIDTH,
            }),
            label: Some(Label {
                text: format!("Anger: {}%", reading.anger_percentage),
                x,
                y,
                mirrored,
                color: palette.accent,
                font_px: FONT_PX,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stroke.is_none() && self.label.is_none()
    }
}

/// Draw the scene's box onto an image.
///
/// Labels are left to the front end, which has the fonts.
pub fn render_scene(scene: &OverlayScene, canvas: &mut RgbImage) -> Result<(), OverlayError> {
    let Some(stroke) = &scene.stroke else {
        return Ok(());
    };

    let color: Rgb<u8> = crate::palette::parse_hex(stroke.color)?;
    let (x, y) = (stroke.x.round() as i32, stroke.y.round() as i32);
    let (w, h) = (
        stroke.width.round().max(1.0) as u32,
        stroke.height.round().max(1.0) as u32,
    );

    for inset in 0..stroke.line_width {
        let inner_w = w.saturating_sub(2 * inset);
        let inner_h = h.saturating_sub(2 * inset);
        if inner_w == 0 || inner_h == 0 {
            break;
        }
        let rect = Rect::at(x + inset as i32, y + inset as i32).of_size(inner_w, inner_h);
        draw_hollow_rect_mut(canvas, rect, color);
    }

    debug!("Rendered overlay box at ({}, {}) {}x{}", x, y, w, h);
    Ok(())
}

/// Render the scene on a black canvas of the frame size as PNG bytes
pub fn render_png(scene: &OverlayScene) -> Result<Vec<u8>, OverlayError> {
    let mut canvas = RgbImage::new(scene.frame_width.max(1), scene.frame_height.max(1));
    render_scene(scene, &mut canvas)?;

    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(canvas)
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| OverlayError::Encode(e.to_string()))?;
    Ok(bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use expression::{Expressions, FaceBox, FaceDetection};

    fn reading(bbox: FaceBox, anger: f32) -> EmotionReading {
        let face = FaceDetection {
            bbox,
            expressions: Expressions::new().with("angry", anger).with("neutral", 0.2),
        };
        EmotionReading::from_face(&face, 0.5)
    }

    #[test]
    fn test_label_above_box_when_room() {
        let scene = OverlayScene::for_reading(&reading(FaceBox::new(100.0, 80.0, 50.0, 60.0), 0.734), 720, 560, true);
        let label = scene.label.unwrap();
        assert_eq!(label.text, "Anger: 73%");
        assert_eq!(label.y, 70.0);
        assert_eq!(label.x, 150.0);
        assert!(label.mirrored);
        assert_eq!(label.color, Palette::ANGRY.accent);
    }

    #[test]
    fn test_label_below_box_near_top() {
        let scene = OverlayScene::for_reading(&reading(FaceBox::new(100.0, 20.0, 50.0, 60.0), 0.1), 720, 560, false);
        let label = scene.label.unwrap();
        assert_eq!(label.y, 100.0);
        assert_eq!(label.x, 100.0);
        assert_eq!(label.color, Palette::CALM.accent);
        assert_eq!(scene.stroke.unwrap().line_width, 3);
    }

    #[test]
    fn test_render_draws_accent_border() {
        let scene = OverlayScene::for_reading(&reading(FaceBox::new(10.0, 10.0, 20.0, 20.0), 0.9), 64, 64, true);
        let mut canvas = RgbImage::new(64, 64);
        render_scene(&scene, &mut canvas).unwrap();

        let red = Rgb([0xe7, 0x4c, 0x3c]);
        assert_eq!(*canvas.get_pixel(10, 10), red);
        assert_eq!(*canvas.get_pixel(12, 20), red);
        // Inside the 3px border stays untouched
        assert_eq!(*canvas.get_pixel(20, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_empty_scene_renders_nothing() {
        let scene = OverlayScene::empty(8, 8);
        assert!(scene.is_empty());
        let mut canvas = RgbImage::new(8, 8);
        render_scene(&scene, &mut canvas).unwrap();
        assert!(canvas.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_png_has_signature() {
        let png = render_png(&OverlayScene::empty(4, 4)).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_empty_scene_serializes_without_shapes() {
        let json = serde_json::to_string(&OverlayScene::empty(720, 560)).unwrap();
        assert_eq!(json, r#"{"frame_width":720,"frame_height":560}"#);
    }
}
