// ============================================================================
// framesift-core/src/analysis/motion.rs
// ============================================================================
//
// MOTION DETECTION: Blurred Differencing and Mask Segmentation
//
// For each frame against its predecessor:
// 1. Gaussian-blur both grayscale frames to suppress sensor noise
// 2. Take the absolute pixel-wise difference
// 3. Binary-threshold the difference and dilate the resulting mask
// 4. Count mask pixels and average the raw difference
//
// A frame has motion when the pixel count and the mean score clear their
// thresholds. `MotionCriteria::All` requires both; `Any` accepts either.
// Frame 0 has no predecessor and is always an anchor with motion.

use image::GrayImage;

use super::imageops;
use crate::config::{AnalysisConfig, DetectorTuning, MotionCriteria};
use crate::frame::Frame;
use crate::report::FrameRecord;

#[derive(Debug, Clone)]
pub struct MotionDetector {
    motion_threshold: f64,
    min_motion_pixels: u64,
    criteria: MotionCriteria,
    tuning: DetectorTuning,
}

impl MotionDetector {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            motion_threshold: config.motion_threshold,
            min_motion_pixels: config.min_motion_pixels,
            criteria: config.motion_criteria,
            tuning: config.tuning.clone(),
        }
    }

    /// The record for the first frame.
    pub fn anchor(&self) -> FrameRecord {
        FrameRecord::anchor()
    }

    /// Blurs a grayscale frame ahead of differencing.
    pub fn prepare(&self, gray: &GrayImage) -> GrayImage {
        imageops::gaussian_blur(gray, self.tuning.blur_kernel)
    }

    /// Classifies frame `index` from the prepared (blurred) predecessor and
    /// current frame.
    pub fn measure(&self, index: u64, previous: &GrayImage, current: &GrayImage) -> FrameRecord {
        let diff = imageops::abs_diff(previous, current);
        let mask = imageops::threshold_binary(&diff, self.tuning.diff_cutoff);
        let mask = imageops::dilate(&mask, self.tuning.dilate_iterations);

        let motion_pixel_count = imageops::count_nonzero(&mask);
        let motion_score = imageops::mean(&diff);

        FrameRecord {
            index,
            motion_score,
            motion_pixel_count,
            has_motion: self.classify(motion_pixel_count, motion_score),
        }
    }

    /// Full pipeline for a frame pair, starting from RGB.
    pub fn detect(&self, previous: &Frame, current: &Frame) -> FrameRecord {
        let prev = self.prepare(&imageops::to_grayscale(previous.image()));
        let cur = self.prepare(&imageops::to_grayscale(current.image()));
        self.measure(current.index(), &prev, &cur)
    }

    fn classify(&self, pixels: u64, score: f64) -> bool {
        let enough_pixels = pixels > self.min_motion_pixels;
        let enough_change = score > self.motion_threshold;
        match self.criteria {
            MotionCriteria::All => enough_pixels && enough_change,
            MotionCriteria::Any => enough_pixels || enough_change,
        }
    }
}
