//! Frame sources feeding the sampling loop

use std::time::Instant;

use tracing::{debug, info};

use crate::{CameraError, VideoFrame};

/// Anything that can hand out the current video frame
pub trait FrameSource {
    /// Grab the current frame
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        (**self).next_frame()
    }
}

/// Produces black frames of a fixed size.
///
/// Used when the detector does not look at pixels (replayed detections).
pub struct BlankSource {
    template: VideoFrame,
    started: Instant,
    sequence: u32,
}

impl BlankSource {
    pub fn new(width: u32, height: u32) -> Self {
        info!("Blank frame source {}x{}", width, height);
        Self {
            template: VideoFrame::filled(width, height, [0, 0, 0]),
            started: Instant::now(),
            sequence: 0,
        }
    }
}

impl FrameSource for BlankSource {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        let mut frame = self.template.clone();
        frame.sequence = self.sequence;
        frame.timestamp_ns = self.started.elapsed().as_nanos() as u64;
        self.sequence = self.sequence.wrapping_add(1);
        Ok(frame)
    }
}

/// Loops a single still image loaded from disk
pub struct ImageSource {
    frame: VideoFrame,
    sequence: u32,
}

impl ImageSource {
    pub fn open(path: &str) -> Result<Self, CameraError> {
        let img = image::open(path)
            .map_err(|e| CameraError::Open(format!("{}: {}", path, e)))?
            .to_rgb8();
        debug!("Loaded still image {} ({}x{})", path, img.width(), img.height());

        Ok(Self {
            frame: VideoFrame::from_rgb_image(img, 0, 0),
            sequence: 0,
        })
    }
}

impl FrameSource for ImageSource {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        let mut frame = self.frame.clone();
        frame.sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_source_sequences() {
        let mut source = BlankSource::new(8, 6);
        let a = source.next_frame().unwrap();
        let b = source.next_frame().unwrap();
        assert_eq!(a.sequence, 0);
        assert_eq!(b.sequence, 1);
        assert_eq!(b.data.len(), 8 * 6 * 3);
    }

    #[test]
    fn test_image_source_roundtrip_from_disk() {
        let dir = std::env::temp_dir().join(format!("camera-capture-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("still.png");
        image::RgbImage::from_pixel(6, 4, image::Rgb([9, 8, 7]))
            .save(&path)
            .unwrap();

        let mut source = ImageSource::open(path.to_str().unwrap()).unwrap();
        let frame = source.next_frame().unwrap();
        assert_eq!((frame.width, frame.height), (6, 4));
        assert_eq!(frame.get_pixel(5, 3), Some([9, 8, 7]));

        std::fs::remove_dir_all(&dir).ok();
    }
}
