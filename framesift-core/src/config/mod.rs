//! Configuration structures and constants for the framesift-core library.
//!
//! Request parameters arrive loosely typed (`AnalysisParams`, usually decoded
//! from form values or JSON) and are turned into a validated
//! `AnalysisConfig` before any algorithm or decoder sees them. Everything
//! downstream of `AnalysisConfig::from_params` can rely on the ranges below.

mod builder;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreResult, validation_error};

pub use builder::AnalysisConfigBuilder;

// Default constants

/// Default scene sensitivity percentage. Lower values detect more boundaries.
pub const DEFAULT_SCENE_THRESHOLD: f64 = 30.0;

/// Accepted scene sensitivity range (percent).
pub const SCENE_THRESHOLD_RANGE: (f64, f64) = (10.0, 80.0);

/// Default mean blurred difference above which a frame counts as moving.
pub const DEFAULT_MOTION_THRESHOLD: f64 = 2.0;

/// Accepted motion threshold range.
pub const MOTION_THRESHOLD_RANGE: (f64, f64) = (0.5, 10.0);

/// Default minimum distance, in frames, between two accepted scene boundaries.
pub const DEFAULT_MIN_SCENE_LENGTH: u64 = 15;

/// Accepted minimum scene length range (frames).
pub const MIN_SCENE_LENGTH_RANGE: (u64, u64) = (5, 60);

/// Default floor on the dilated motion mask. Zero means "any motion pixel".
pub const DEFAULT_MIN_MOTION_PIXELS: u64 = 0;

/// Working resolution every decoded frame is scaled to.
pub const WORKING_WIDTH: u32 = 640;
pub const WORKING_HEIGHT: u32 = 360;

/// Binary threshold applied to the blurred difference image.
pub const DEFAULT_DIFF_CUTOFF: u8 = 25;

/// Side of the square Gaussian kernel used before motion differencing.
pub const DEFAULT_BLUR_KERNEL: usize = 21;

/// Number of 3x3 dilation passes over the motion mask.
pub const DEFAULT_DILATE_ITERATIONS: usize = 2;

/// Histogram bins for the hue channel (OpenCV-style 0..180 hue).
pub const DEFAULT_HUE_BINS: usize = 50;

/// Histogram bins for the saturation channel.
pub const DEFAULT_SATURATION_BINS: usize = 60;

// ============================================================================
// ENUMERATIONS
// ============================================================================

/// Scene change detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneMethod {
    /// Mean + k·stddev threshold over the whole video's grayscale differences.
    Adaptive,
    /// Per-frame HSV histogram correlation against a fixed threshold.
    Histogram,
}

impl SceneMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneMethod::Adaptive => "adaptive",
            SceneMethod::Histogram => "histogram",
        }
    }
}

impl fmt::Display for SceneMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneMethod {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adaptive" => Ok(SceneMethod::Adaptive),
            "histogram" => Ok(SceneMethod::Histogram),
            other => Err(validation_error(format!(
                "unknown method '{other}' (expected 'adaptive' or 'histogram')"
            ))),
        }
    }
}

/// How the two motion criteria (pixel count, mean score) are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionCriteria {
    /// Both the pixel count and the score must clear their thresholds.
    #[default]
    All,
    /// Either criterion is enough.
    Any,
}

impl MotionCriteria {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionCriteria::All => "all",
            MotionCriteria::Any => "any",
        }
    }
}

impl FromStr for MotionCriteria {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "and" => Ok(MotionCriteria::All),
            "any" | "or" => Ok(MotionCriteria::Any),
            other => Err(validation_error(format!(
                "unknown motion_criteria '{other}' (expected 'all' or 'any')"
            ))),
        }
    }
}

/// Frame selection policy applied by the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Frames flagged as containing motion.
    Motion,
    /// Scene boundary frames.
    Scenes,
    /// Union of scene boundaries and motion frames.
    Both,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Motion => "motion",
            FilterMode::Scenes => "scenes",
            FilterMode::Both => "both",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "motion" => Ok(FilterMode::Motion),
            "scenes" => Ok(FilterMode::Scenes),
            "both" => Ok(FilterMode::Both),
            other => Err(validation_error(format!(
                "unknown filter_mode '{other}' (expected 'motion', 'scenes' or 'both')"
            ))),
        }
    }
}

// ============================================================================
// REQUEST PARAMETERS
// ============================================================================

/// Loosely typed analysis parameters as they arrive from a request.
///
/// Every field is optional and textual; numbers sent as JSON numbers are
/// accepted too. Nothing here is trusted until it passes through
/// [`AnalysisConfig::from_params`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisParams {
    #[serde(default, deserialize_with = "loose_string")]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub scene_threshold: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub motion_threshold: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub min_scene_length: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub min_motion_pixels: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub motion_criteria: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub target_fps: Option<String>,
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// ============================================================================
// VALIDATED CONFIGURATION
// ============================================================================

/// Fixed image-processing constants. These are not request parameters, but
/// library callers may adjust them through the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorTuning {
    pub diff_cutoff: u8,
    pub blur_kernel: usize,
    pub dilate_iterations: usize,
    pub hue_bins: usize,
    pub saturation_bins: usize,
}

impl Default for DetectorTuning {
    fn default() -> Self {
        Self {
            diff_cutoff: DEFAULT_DIFF_CUTOFF,
            blur_kernel: DEFAULT_BLUR_KERNEL,
            dilate_iterations: DEFAULT_DILATE_ITERATIONS,
            hue_bins: DEFAULT_HUE_BINS,
            saturation_bins: DEFAULT_SATURATION_BINS,
        }
    }
}

/// Validated configuration for one analysis run.
///
/// # Examples
///
/// ```rust
/// use framesift_core::config::{AnalysisConfig, AnalysisParams, SceneMethod};
///
/// let params = AnalysisParams {
///     method: Some("histogram".to_string()),
///     min_scene_length: Some("20".to_string()),
///     ..Default::default()
/// };
/// let config = AnalysisConfig::from_params(&params).unwrap();
/// assert_eq!(config.method, SceneMethod::Histogram);
/// assert_eq!(config.min_scene_length, 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Scene change strategy
    pub method: SceneMethod,

    /// Sensitivity percentage in [10, 80]
    pub scene_threshold: f64,

    /// Mean blurred difference a frame must exceed to count as moving
    pub motion_threshold: f64,

    /// Minimum frame distance between accepted scene boundaries
    pub min_scene_length: u64,

    /// Dilated mask pixel count a frame must exceed to count as moving
    pub min_motion_pixels: u64,

    /// Combination rule for the two motion criteria
    pub motion_criteria: MotionCriteria,

    /// Optional analysis rate; frames are decimated when below the source fps
    pub target_fps: Option<f64>,

    pub tuning: DetectorTuning,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            method: SceneMethod::Adaptive,
            scene_threshold: DEFAULT_SCENE_THRESHOLD,
            motion_threshold: DEFAULT_MOTION_THRESHOLD,
            min_scene_length: DEFAULT_MIN_SCENE_LENGTH,
            min_motion_pixels: DEFAULT_MIN_MOTION_PIXELS,
            motion_criteria: MotionCriteria::All,
            target_fps: None,
            tuning: DetectorTuning::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parses and range-checks loosely typed parameters. Missing fields take
    /// their defaults.
    pub fn from_params(params: &AnalysisParams) -> CoreResult<Self> {
        let mut builder = AnalysisConfigBuilder::new();

        if let Some(method) = non_empty(&params.method) {
            builder = builder.method(method.parse()?);
        }
        if let Some(raw) = non_empty(&params.scene_threshold) {
            builder = builder.scene_threshold(parse_f64("scene_threshold", raw)?);
        }
        if let Some(raw) = non_empty(&params.motion_threshold) {
            builder = builder.motion_threshold(parse_f64("motion_threshold", raw)?);
        }
        if let Some(raw) = non_empty(&params.min_scene_length) {
            builder = builder.min_scene_length(parse_u64("min_scene_length", raw)?);
        }
        if let Some(raw) = non_empty(&params.min_motion_pixels) {
            builder = builder.min_motion_pixels(parse_u64("min_motion_pixels", raw)?);
        }
        if let Some(criteria) = non_empty(&params.motion_criteria) {
            builder = builder.motion_criteria(criteria.parse()?);
        }
        if let Some(raw) = non_empty(&params.target_fps) {
            builder = builder.target_fps(parse_f64("target_fps", raw)?);
        }

        builder.build()
    }

    /// Range-checks every field.
    pub fn validate(&self) -> CoreResult<()> {
        let (lo, hi) = SCENE_THRESHOLD_RANGE;
        if !(lo..=hi).contains(&self.scene_threshold) {
            return Err(validation_error(format!(
                "scene_threshold must be between {lo} and {hi}, got {}",
                self.scene_threshold
            )));
        }

        let (lo, hi) = MOTION_THRESHOLD_RANGE;
        if !(lo..=hi).contains(&self.motion_threshold) {
            return Err(validation_error(format!(
                "motion_threshold must be between {lo} and {hi}, got {}",
                self.motion_threshold
            )));
        }

        let (lo, hi) = MIN_SCENE_LENGTH_RANGE;
        if !(lo..=hi).contains(&self.min_scene_length) {
            return Err(validation_error(format!(
                "min_scene_length must be between {lo} and {hi}, got {}",
                self.min_scene_length
            )));
        }

        if let Some(fps) = self.target_fps {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(validation_error(format!(
                    "target_fps must be a positive number, got {fps}"
                )));
            }
        }

        let tuning = &self.tuning;
        if tuning.blur_kernel == 0 || tuning.blur_kernel % 2 == 0 {
            return Err(validation_error(format!(
                "blur kernel must be a positive odd size, got {}",
                tuning.blur_kernel
            )));
        }
        if tuning.hue_bins == 0 || tuning.saturation_bins == 0 {
            return Err(validation_error("histogram bin counts must be non-zero"));
        }

        Ok(())
    }

    /// Multiplier on the standard deviation for the adaptive strategy.
    pub fn adaptive_k(&self) -> f64 {
        self.scene_threshold / 100.0
    }

    /// Histogram difference (`1 - correlation`) above which a frame is a
    /// boundary candidate.
    pub fn histogram_cutoff(&self) -> f64 {
        self.scene_threshold / 100.0
    }

    /// Number of source frames per analysed frame for a given source rate.
    pub fn frame_skip(&self, source_fps: f64) -> u64 {
        match self.target_fps {
            Some(target) if source_fps > 0.0 && target < source_fps => {
                ((source_fps / target).floor() as u64).max(1)
            }
            _ => 1,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(field: &str, raw: &str) -> CoreResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| validation_error(format!("{field} must be a number, got '{raw}'")))
}

fn parse_u64(field: &str, raw: &str) -> CoreResult<u64> {
    raw.parse::<u64>().map_err(|_| {
        validation_error(format!(
            "{field} must be a non-negative integer, got '{raw}'"
        ))
    })
}
