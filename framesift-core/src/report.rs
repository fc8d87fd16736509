// ============================================================================
// framesift-core/src/report.rs
// ============================================================================
//
// REPORT TYPES: Results and Requests Exchanged with Callers
//
// These are the JSON contracts of the engine. Frame-keyed maps serialise with
// string keys ("0", "1", ...) and are ordered numerically.
//
// KEY COMPONENTS:
// - FrameRecord / MotionData: Per-frame motion classification
// - AnalysisResult: Aggregate output of one analysis pass
// - FilterRequest / FilterResult: Input and output of frame filtering
// - Selection: Combined analysis + filter output
// - ErrorResponse: `{"success": false, ...}` envelope for failures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{FilterMode, SceneMethod};
use crate::error::{CoreError, CoreResult};
use crate::source::VideoInfo;

/// Motion classification of one analysed frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Source frame index. Carried by the enclosing map key in JSON.
    #[serde(skip)]
    pub index: u64,

    #[serde(default)]
    pub motion_score: f64,

    #[serde(default, rename = "motion_pixels")]
    pub motion_pixel_count: u64,

    #[serde(default)]
    pub has_motion: bool,
}

impl FrameRecord {
    /// The record for frame 0, which has no predecessor and is always kept.
    pub fn anchor() -> Self {
        Self {
            index: 0,
            motion_score: 0.0,
            motion_pixel_count: 0,
            has_motion: true,
        }
    }
}

/// Frame index to motion record, in ascending index order.
pub type MotionData = BTreeMap<u64, FrameRecord>;

/// Restores `FrameRecord::index` from the map keys after deserialisation.
pub fn reindex(motion_data: &mut MotionData) {
    for (index, record) in motion_data.iter_mut() {
        record.index = *index;
    }
}

/// Output of one analysis pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub video_info: VideoInfo,
    /// Strictly increasing; always starts with 0.
    pub scene_changes: Vec<u64>,
    pub motion_data: MotionData,
    pub frames_with_motion: u64,
    pub frames_without_motion: u64,
    pub method: SceneMethod,
}

impl AnalysisResult {
    pub fn scene_count(&self) -> usize {
        self.scene_changes.len()
    }

    /// Borrowing view with the `success` flag and derived counts, as sent
    /// to callers.
    pub fn response(&self) -> AnalysisResponse<'_> {
        AnalysisResponse {
            success: true,
            video_info: &self.video_info,
            scene_changes: &self.scene_changes,
            scene_count: self.scene_count(),
            motion_data: &self.motion_data,
            frames_with_motion: self.frames_with_motion,
            frames_without_motion: self.frames_without_motion,
            method: self.method,
        }
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(&self.response())?)
    }

    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.response())?)
    }
}

/// Serialised form of [`AnalysisResult`].
#[derive(Debug, Serialize)]
pub struct AnalysisResponse<'a> {
    pub success: bool,
    pub video_info: &'a VideoInfo,
    pub scene_changes: &'a [u64],
    pub scene_count: usize,
    pub motion_data: &'a MotionData,
    pub frames_with_motion: u64,
    pub frames_without_motion: u64,
    pub method: SceneMethod,
}

/// Request for the filter engine. Usually the body of an earlier analysis
/// response plus a `filter_mode`, which defaults to `motion`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub motion_data: MotionData,
    #[serde(default)]
    pub scene_changes: Vec<u64>,
    #[serde(default)]
    pub filter_mode: Option<String>,
}

impl FilterRequest {
    /// Builds a request from an analysis result.
    pub fn from_result(result: &AnalysisResult, mode: FilterMode) -> Self {
        Self {
            motion_data: result.motion_data.clone(),
            scene_changes: result.scene_changes.clone(),
            filter_mode: Some(mode.as_str().to_string()),
        }
    }

    /// Parses a JSON request body.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let mut request: FilterRequest = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("malformed filter request: {e}")))?;
        reindex(&mut request.motion_data);
        Ok(request)
    }

    /// The requested mode, validated. Missing means `motion`.
    pub fn mode(&self) -> CoreResult<FilterMode> {
        match self.filter_mode.as_deref() {
            None => Ok(FilterMode::Motion),
            Some(raw) => raw.parse(),
        }
    }
}

/// Output of the filter engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub success: bool,
    /// Ascending, without duplicates.
    pub selected_frames: Vec<u64>,
    pub count: usize,
    pub filter_mode: FilterMode,
}

impl FilterResult {
    pub fn new(selected_frames: Vec<u64>, filter_mode: FilterMode) -> Self {
        Self {
            success: true,
            count: selected_frames.len(),
            selected_frames,
            filter_mode,
        }
    }
}

/// Analysis followed by filtering, as returned by `select`.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub analysis: AnalysisResult,
    pub filter: FilterResult,
}

impl Selection {
    pub fn response(&self) -> SelectionResponse<'_> {
        SelectionResponse {
            success: true,
            analysis: self.analysis.response(),
            selection: &self.filter,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse<'a> {
    pub success: bool,
    pub analysis: AnalysisResponse<'a>,
    pub selection: &'a FilterResult,
}

/// Failure envelope sent in place of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl From<&CoreError> for ErrorResponse {
    fn from(err: &CoreError) -> Self {
        Self {
            success: false,
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}
