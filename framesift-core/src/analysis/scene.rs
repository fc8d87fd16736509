// ============================================================================
// framesift-core/src/analysis/scene.rs
// ============================================================================
//
// SCENE CHANGE DETECTION: Adaptive and Histogram Strategies
//
// Both strategies consume per-frame metrics in frame order and produce scene
// boundaries: a strictly increasing list that starts at 0. A candidate closer
// than `min_scene_length` frames to the last accepted boundary is dropped.
//
// KEY COMPONENTS:
// - SceneStrategy: Trait shared by the strategies
// - AdaptiveStrategy: Threshold at mean + k*stddev of all grayscale diffs;
//   buffers one float per frame and decides after the pass
// - HistogramStrategy: Fixed cutoff on 1 - histogram correlation; decides
//   frame by frame
// - BoundaryAccumulator: Anchor and spacing bookkeeping

use super::differ::FrameMetrics;
use crate::config::{AnalysisConfig, SceneMethod};

/// Consumes frame metrics and yields scene boundaries.
pub trait SceneStrategy: Send {
    /// Whether `observe` needs `FrameMetrics::hist_correlation`.
    fn needs_histogram(&self) -> bool;

    /// Feeds the metrics of frame `index` against its predecessor.
    fn observe(&mut self, index: u64, metrics: &FrameMetrics);

    /// Ends the pass and returns the boundaries.
    fn finish(&mut self) -> Vec<u64>;
}

/// Builds the strategy selected by `config.method`.
pub fn strategy_for(config: &AnalysisConfig) -> Box<dyn SceneStrategy> {
    match config.method {
        SceneMethod::Adaptive => Box::new(AdaptiveStrategy::new(
            config.adaptive_k(),
            config.min_scene_length,
        )),
        SceneMethod::Histogram => Box::new(HistogramStrategy::new(
            config.histogram_cutoff(),
            config.min_scene_length,
        )),
    }
}

/// Accepted boundaries, seeded with the anchor at frame 0.
#[derive(Debug, Clone)]
pub struct BoundaryAccumulator {
    boundaries: Vec<u64>,
    min_scene_length: u64,
}

impl BoundaryAccumulator {
    pub fn new(min_scene_length: u64) -> Self {
        Self {
            boundaries: vec![0],
            min_scene_length,
        }
    }

    /// Accepts `index` if it lies at least `min_scene_length` after the last
    /// boundary. Returns whether it was accepted.
    pub fn offer(&mut self, index: u64) -> bool {
        let last = self.boundaries.last().copied().unwrap_or(0);
        if index > last && index - last >= self.min_scene_length {
            self.boundaries.push(index);
            true
        } else {
            false
        }
    }

    pub fn boundaries(&self) -> &[u64] {
        &self.boundaries
    }

    pub fn into_boundaries(self) -> Vec<u64> {
        self.boundaries
    }
}

// --- Adaptive ---

#[derive(Debug, Clone)]
pub struct AdaptiveStrategy {
    k: f64,
    min_scene_length: u64,
    diffs: Vec<(u64, f64)>,
}

impl AdaptiveStrategy {
    pub fn new(k: f64, min_scene_length: u64) -> Self {
        Self {
            k,
            min_scene_length,
            diffs: Vec::new(),
        }
    }

    /// `mean + k * stddev` over the buffered diffs, or `None` when empty.
    pub fn threshold(&self) -> Option<f64> {
        if self.diffs.is_empty() {
            return None;
        }
        let n = self.diffs.len() as f64;
        let mean = self.diffs.iter().map(|(_, d)| d).sum::<f64>() / n;
        let variance = self
            .diffs
            .iter()
            .map(|(_, d)| (d - mean) * (d - mean))
            .sum::<f64>()
            / n;
        Some(mean + self.k * variance.sqrt())
    }
}

impl SceneStrategy for AdaptiveStrategy {
    fn needs_histogram(&self) -> bool {
        false
    }

    fn observe(&mut self, index: u64, metrics: &FrameMetrics) {
        self.diffs.push((index, metrics.gray_diff));
    }

    fn finish(&mut self) -> Vec<u64> {
        let mut acc = BoundaryAccumulator::new(self.min_scene_length);
        if let Some(threshold) = self.threshold() {
            log::debug!(
                "Adaptive scene threshold {:.4} over {} diff(s)",
                threshold,
                self.diffs.len()
            );
            for &(index, diff) in &self.diffs {
                if diff > threshold {
                    acc.offer(index);
                }
            }
        }
        self.diffs.clear();
        acc.into_boundaries()
    }
}

// --- Histogram ---

#[derive(Debug, Clone)]
pub struct HistogramStrategy {
    cutoff: f64,
    acc: BoundaryAccumulator,
}

impl HistogramStrategy {
    pub fn new(cutoff: f64, min_scene_length: u64) -> Self {
        Self {
            cutoff,
            acc: BoundaryAccumulator::new(min_scene_length),
        }
    }
}

impl SceneStrategy for HistogramStrategy {
    fn needs_histogram(&self) -> bool {
        true
    }

    fn observe(&mut self, index: u64, metrics: &FrameMetrics) {
        if let Some(diff) = metrics.hist_diff() {
            if diff > self.cutoff && self.acc.offer(index) {
                log::trace!("Histogram boundary at frame {} (diff {:.4})", index, diff);
            }
        }
    }

    fn finish(&mut self) -> Vec<u64> {
        let min = self.acc.min_scene_length;
        std::mem::replace(&mut self.acc, BoundaryAccumulator::new(min)).into_boundaries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(diff: f64) -> FrameMetrics {
        FrameMetrics {
            gray_diff: diff,
            hist_correlation: None,
        }
    }

    fn hist(correlation: f64) -> FrameMetrics {
        FrameMetrics {
            gray_diff: 0.0,
            hist_correlation: Some(correlation),
        }
    }

    fn run(strategy: &mut dyn SceneStrategy, metrics: &[FrameMetrics]) -> Vec<u64> {
        for (i, m) in metrics.iter().enumerate() {
            strategy.observe(i as u64 + 1, m);
        }
        strategy.finish()
    }

    #[test]
    fn test_accumulator_spacing() {
        let mut acc = BoundaryAccumulator::new(5);
        assert!(!acc.offer(0));
        assert!(!acc.offer(4));
        assert!(acc.offer(5));
        assert!(!acc.offer(9));
        assert!(acc.offer(10));
        assert_eq!(acc.boundaries(), &[0, 5, 10]);
    }

    #[test]
    fn test_adaptive_single_cut() {
        let mut s = AdaptiveStrategy::new(0.3, 3);
        let diffs: Vec<_> = [0.0, 0.0, 0.0, 0.0, 90.0, 0.0, 0.0, 0.0, 0.0]
            .into_iter()
            .map(gray)
            .collect();
        assert_eq!(run(&mut s, &diffs), vec![0, 5]);
    }

    #[test]
    fn test_adaptive_short_videos_yield_anchor_only() {
        assert_eq!(AdaptiveStrategy::new(0.3, 5).finish(), vec![0]);
        let mut two = AdaptiveStrategy::new(0.3, 5);
        assert_eq!(run(&mut two, &[gray(50.0)]), vec![0]);
    }

    #[test]
    fn test_adaptive_constant_diffs_yield_anchor_only() {
        let mut s = AdaptiveStrategy::new(0.1, 5);
        assert_eq!(run(&mut s, &vec![gray(3.0); 40]), vec![0]);
    }

    #[test]
    fn test_adaptive_suppresses_close_candidates() {
        let mut diffs = vec![gray(0.0); 30];
        diffs[9] = gray(80.0); // frame 10
        diffs[11] = gray(80.0); // frame 12, too close
        diffs[24] = gray(80.0); // frame 25
        let mut s = AdaptiveStrategy::new(0.3, 10);
        assert_eq!(run(&mut s, &diffs), vec![0, 10, 25]);
    }

    #[test]
    fn test_adaptive_threshold_uses_population_stddev() {
        let mut s = AdaptiveStrategy::new(0.5, 5);
        s.observe(1, &gray(2.0));
        s.observe(2, &gray(4.0));
        // mean 3, population stddev 1
        assert_eq!(s.threshold(), Some(3.5));
    }

    #[test]
    fn test_histogram_strategy() {
        let mut s = HistogramStrategy::new(0.3, 5);
        let mut metrics = vec![hist(1.0); 20];
        metrics[2] = hist(0.2); // frame 3, too close to 0
        metrics[7] = hist(0.1); // frame 8
        metrics[9] = hist(0.0); // frame 10, too close to 8
        metrics[14] = hist(0.71); // frame 15, diff 0.29 under cutoff
        assert_eq!(run(&mut s, &metrics), vec![0, 8]);
    }

    #[test]
    fn test_histogram_ignores_missing_correlation() {
        let mut s = HistogramStrategy::new(0.1, 5);
        assert_eq!(run(&mut s, &vec![gray(99.0); 12]), vec![0]);
    }

    #[test]
    fn test_strategy_for_method() {
        let mut config = AnalysisConfig::default();
        assert!(!strategy_for(&config).needs_histogram());
        config.method = SceneMethod::Histogram;
        assert!(strategy_for(&config).needs_histogram());
    }
}
