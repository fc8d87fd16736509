//! Decoded frame container.
//!
//! A `Frame` is one decoded picture tagged with its source frame index.
//! Sources hand frames to the engine at the working resolution; synthetic
//! frames built in memory are scaled on construction through
//! [`Frame::at_working_resolution`].

use image::{RgbImage, imageops};

use crate::config::{WORKING_HEIGHT, WORKING_WIDTH};
use crate::error::{CoreError, CoreResult};

/// A decoded RGB frame and its position in the source.
#[derive(Debug, Clone)]
pub struct Frame {
    index: u64,
    image: RgbImage,
}

impl Frame {
    /// Wraps an image without rescaling it.
    pub fn new(index: u64, image: RgbImage) -> Self {
        Self { index, image }
    }

    /// Wraps an image, scaling it to the working resolution if needed.
    pub fn at_working_resolution(index: u64, image: RgbImage) -> Self {
        let image = if image.dimensions() == (WORKING_WIDTH, WORKING_HEIGHT) {
            image
        } else {
            imageops::resize(
                &image,
                WORKING_WIDTH,
                WORKING_HEIGHT,
                imageops::FilterType::Triangle,
            )
        };
        Self { index, image }
    }

    /// Builds a frame from packed `rgb24` bytes as produced by ffmpeg.
    pub fn from_rgb24(index: u64, width: u32, height: u32, data: Vec<u8>) -> CoreResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(CoreError::Decode(format!(
                "frame {index}: expected {expected} bytes for {width}x{height} rgb24, got {}",
                data.len()
            )));
        }
        let image = RgbImage::from_raw(width, height, data).ok_or_else(|| {
            CoreError::Decode(format!("frame {index}: invalid {width}x{height} buffer"))
        })?;
        Ok(Self { index, image })
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_small_frame_is_scaled_to_working_resolution() {
        let image = RgbImage::from_pixel(3, 3, Rgb([10, 20, 30]));
        let frame = Frame::at_working_resolution(4, image);

        assert_eq!(frame.index(), 4);
        assert_eq!(frame.width(), WORKING_WIDTH);
        assert_eq!(frame.height(), WORKING_HEIGHT);
        // A uniform image stays uniform after interpolation.
        assert_eq!(*frame.image().get_pixel(320, 180), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_working_resolution_frame_is_not_copied() {
        let image = RgbImage::new(WORKING_WIDTH, WORKING_HEIGHT);
        let frame = Frame::at_working_resolution(0, image);
        assert_eq!(frame.image().dimensions(), (WORKING_WIDTH, WORKING_HEIGHT));
    }

    #[test]
    fn test_from_rgb24_checks_length() {
        assert!(Frame::from_rgb24(0, 2, 2, vec![0; 12]).is_ok());
        let err = Frame::from_rgb24(7, 2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
        assert!(err.to_string().contains("frame 7"));
    }
}
