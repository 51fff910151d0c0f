//! Video frame types and conversions

use image::RgbImage;

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Solid-color frame
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Self::new(data, width, height, 0, 0)
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.data
            .get(idx..idx + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Build a frame from an `image` buffer
    pub fn from_rgb_image(img: RgbImage, timestamp_ns: u64, sequence: u32) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, timestamp_ns, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_filled_frame() {
        let frame = VideoFrame::filled(4, 2, [10, 20, 30]);
        assert_eq!(frame.data.len(), 4 * 2 * 3);
        assert_eq!(frame.get_pixel(3, 1), Some([10, 20, 30]));
        assert_eq!(frame.get_pixel(4, 0), None);
    }

    #[test]
    fn test_from_rgb_image_keeps_layout() {
        let mut img = RgbImage::from_pixel(5, 3, Rgb([200, 0, 0]));
        img.put_pixel(4, 2, Rgb([1, 2, 3]));

        let frame = VideoFrame::from_rgb_image(img, 11, 2);
        assert_eq!((frame.width, frame.height), (5, 3));
        assert_eq!(frame.get_pixel(0, 0), Some([200, 0, 0]));
        assert_eq!(frame.get_pixel(4, 2), Some([1, 2, 3]));
        assert_eq!((frame.timestamp_ns, frame.sequence), (11, 2));
    }

    #[test]
    fn test_short_buffer_has_no_pixel() {
        let frame = VideoFrame::new(vec![0; 5], 2, 2, 0, 0);
        assert_eq!(frame.get_pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(frame.get_pixel(1, 1), None);
    }
}
