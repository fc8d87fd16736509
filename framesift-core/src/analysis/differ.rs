//! Pairwise metrics between consecutive frames.
//!
//! `gray_diff` is the mean absolute difference of the grayscale frames.
//! `hist_correlation` is the Pearson correlation of the min-max normalised
//! hue x saturation histograms, in `[-1, 1]`.

use image::{GrayImage, RgbImage};

use super::imageops;
use crate::config::DetectorTuning;
use crate::frame::Frame;

/// Metrics for one frame against its predecessor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMetrics {
    pub gray_diff: f64,
    /// Present only when histograms were computed for both frames.
    pub hist_correlation: Option<f64>,
}

impl FrameMetrics {
    /// `1 - hist_correlation`.
    pub fn hist_diff(&self) -> Option<f64> {
        self.hist_correlation.map(|c| 1.0 - c)
    }
}

/// Per-frame data the differencer derives once and reuses for both pairs a
/// frame takes part in.
#[derive(Debug, Clone)]
pub struct FrameFeatures {
    pub gray: GrayImage,
    pub histogram: Option<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct FrameDifferencer {
    hue_bins: usize,
    saturation_bins: usize,
}

impl FrameDifferencer {
    pub fn new(tuning: &DetectorTuning) -> Self {
        Self {
            hue_bins: tuning.hue_bins,
            saturation_bins: tuning.saturation_bins,
        }
    }

    /// Computes both metrics for a frame pair.
    pub fn compare(&self, previous: &Frame, current: &Frame) -> FrameMetrics {
        let prev = self.features(previous, true);
        let cur = self.features(current, true);
        self.metrics(&prev, &cur)
    }

    /// Derives grayscale and, if requested, the colour histogram.
    pub fn features(&self, frame: &Frame, with_histogram: bool) -> FrameFeatures {
        FrameFeatures {
            gray: imageops::to_grayscale(frame.image()),
            histogram: with_histogram.then(|| self.histogram(frame.image())),
        }
    }

    pub fn metrics(&self, previous: &FrameFeatures, current: &FrameFeatures) -> FrameMetrics {
        let hist_correlation = match (&previous.histogram, &current.histogram) {
            (Some(a), Some(b)) => Some(correlation(a, b)),
            _ => None,
        };
        FrameMetrics {
            gray_diff: imageops::mean_abs_diff(&previous.gray, &current.gray),
            hist_correlation,
        }
    }

    /// 2-D hue x saturation histogram, min-max normalised to `[0, 1]`.
    pub fn histogram(&self, image: &RgbImage) -> Vec<f32> {
        let (hb, sb) = (self.hue_bins, self.saturation_bins);
        let mut counts = vec![0u32; hb * sb];

        for px in image.as_raw().chunks_exact(3) {
            let (h, s, _) = imageops::rgb_to_hsv(px[0], px[1], px[2]);
            let h_bin = (h as usize * hb / 180).min(hb - 1);
            let s_bin = (s as usize * sb / 256).min(sb - 1);
            counts[h_bin * sb + s_bin] += 1;
        }

        normalize_min_max(&counts)
    }
}

fn normalize_min_max(counts: &[u32]) -> Vec<f32> {
    let min = counts.iter().copied().min().unwrap_or(0);
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == min {
        return vec![0.0; counts.len()];
    }
    let range = (max - min) as f32;
    counts.iter().map(|&c| (c - min) as f32 / range).collect()
}

/// Pearson correlation of two equally sized histograms. Degenerate inputs
/// (zero variance) compare as identical.
pub fn correlation(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len() as f64;
    if n == 0.0 {
        return 1.0;
    }
    let mean_a = a.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mean_b = b.iter().map(|&v| v as f64).sum::<f64>() / n;

    let (mut s12, mut s11, mut s22) = (0.0, 0.0, 0.0);
    for (&x, &y) in a.iter().zip(b) {
        let dx = x as f64 - mean_a;
        let dy = y as f64 - mean_b;
        s12 += dx * dy;
        s11 += dx * dx;
        s22 += dy * dy;
    }

    let denom = s11 * s22;
    if denom.abs() > f64::EPSILON {
        (s12 / denom.sqrt()).clamp(-1.0, 1.0)
    } else {
        1.0
    }
}
