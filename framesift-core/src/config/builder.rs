// ============================================================================
// framesift-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for AnalysisConfig
//
// Fluent construction of AnalysisConfig for library callers that already
// hold typed values. `build()` runs the same range checks as
// `AnalysisConfig::from_params`, so a built config is always valid.

use super::{AnalysisConfig, DetectorTuning, MotionCriteria, SceneMethod};
use crate::error::CoreResult;

/// Builder for creating validated `AnalysisConfig` instances.
///
/// # Examples
///
/// ```rust
/// use framesift_core::config::{AnalysisConfigBuilder, SceneMethod};
///
/// let config = AnalysisConfigBuilder::new()
///     .method(SceneMethod::Histogram)
///     .scene_threshold(40.0)
///     .motion_threshold(1.5)
///     .min_scene_length(10)
///     .build()
///     .unwrap();
/// assert_eq!(config.min_scene_length, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Creates a builder seeded with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: SceneMethod) -> Self {
        self.config.method = method;
        self
    }

    pub fn scene_threshold(mut self, percent: f64) -> Self {
        self.config.scene_threshold = percent;
        self
    }

    pub fn motion_threshold(mut self, threshold: f64) -> Self {
        self.config.motion_threshold = threshold;
        self
    }

    pub fn min_scene_length(mut self, frames: u64) -> Self {
        self.config.min_scene_length = frames;
        self
    }

    pub fn min_motion_pixels(mut self, pixels: u64) -> Self {
        self.config.min_motion_pixels = pixels;
        self
    }

    pub fn motion_criteria(mut self, criteria: MotionCriteria) -> Self {
        self.config.motion_criteria = criteria;
        self
    }

    pub fn target_fps(mut self, fps: f64) -> Self {
        self.config.target_fps = Some(fps);
        self
    }

    /// Overrides the fixed image-processing constants.
    pub fn tuning(mut self, tuning: DetectorTuning) -> Self {
        self.config.tuning = tuning;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> CoreResult<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_are_valid() {
        let config = AnalysisConfigBuilder::new().build().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_builder_rejects_even_kernel() {
        let tuning = DetectorTuning {
            blur_kernel: 20,
            ..DetectorTuning::default()
        };
        let err = AnalysisConfigBuilder::new().tuning(tuning).build().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_builder_rejects_out_of_range_threshold() {
        let err = AnalysisConfigBuilder::new()
            .scene_threshold(95.0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("scene_threshold"));
    }
}
