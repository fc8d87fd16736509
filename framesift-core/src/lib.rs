//! Core library for selecting informative frames from a video.
//!
//! One forward decode pass produces per-frame motion classifications and a
//! list of scene boundaries; a filter step then reduces the video to the
//! frames worth annotating. Each call is independent: nothing is cached or
//! shared between analyses.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use framesift_core::config::AnalysisParams;
//! use framesift_core::report::FilterRequest;
//!
//! let video = std::fs::read("/path/to/clip.mp4").unwrap();
//! let params = AnalysisParams {
//!     method: Some("histogram".to_string()),
//!     scene_threshold: Some("40".to_string()),
//!     ..Default::default()
//! };
//!
//! let analysis = framesift_core::analyze(&video, &params).unwrap();
//! println!("{}", analysis.to_json_pretty().unwrap());
//!
//! let request = FilterRequest {
//!     filter_mode: Some("both".to_string()),
//!     ..FilterRequest::from_result(&analysis, framesift_core::FilterMode::Motion)
//! };
//! let selection = framesift_core::filter(&request).unwrap();
//! assert_eq!(selection.count, selection.selected_frames.len());
//! ```

pub mod analysis;
pub mod cancel;
pub mod config;
pub mod error;
pub mod extract;
pub mod frame;
pub mod orchestrator;
pub mod progress_reporting;
pub mod report;
pub mod source;
pub mod temp_files;

// Re-exports for public API
pub use cancel::CancellationToken;
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, AnalysisParams, FilterMode, MotionCriteria, SceneMethod,
};
pub use error::{CoreError, CoreResult};
pub use extract::{extract_frames, frame_file_name};
pub use frame::Frame;
pub use orchestrator::AnalysisOrchestrator;
pub use progress_reporting::{NullReporter, ProgressReporter};
pub use report::{
    AnalysisResult, ErrorResponse, FilterRequest, FilterResult, FrameRecord, MotionData, Selection,
};
pub use source::{
    FfmpegOpener, FfmpegSource, FrameSource, MemorySource, SourceOpener, VideoInfo, probe_video,
};

/// Analyses raw video bytes with the ffmpeg decoder.
///
/// Parameters are validated before anything is written or opened. The bytes
/// are spooled to a temporary file that is removed before this returns.
pub fn analyze(video: &[u8], params: &AnalysisParams) -> CoreResult<AnalysisResult> {
    analyze_with(&FfmpegOpener, video, params)
}

/// [`analyze`] with a caller-supplied source opener.
pub fn analyze_with<O: SourceOpener>(
    opener: &O,
    video: &[u8],
    params: &AnalysisParams,
) -> CoreResult<AnalysisResult> {
    let config = AnalysisConfig::from_params(params)?;
    AnalysisOrchestrator::new(config).analyze_bytes(opener, video)
}

/// Filters analysis output. An unknown mode fails before any work is done.
pub fn filter(request: &FilterRequest) -> CoreResult<FilterResult> {
    let mode = request.mode()?;
    Ok(analysis::filter_frames(
        &request.motion_data,
        &request.scene_changes,
        mode,
    ))
}

/// Analyses raw video bytes and filters the result in one call.
pub fn select(video: &[u8], params: &AnalysisParams, filter_mode: &str) -> CoreResult<Selection> {
    select_with(&FfmpegOpener, video, params, filter_mode)
}

/// [`select`] with a caller-supplied source opener. Both the parameters and
/// the filter mode are validated before the video is touched.
pub fn select_with<O: SourceOpener>(
    opener: &O,
    video: &[u8],
    params: &AnalysisParams,
    filter_mode: &str,
) -> CoreResult<Selection> {
    let mode: FilterMode = filter_mode.parse()?;
    let config = AnalysisConfig::from_params(params)?;

    let analysis = AnalysisOrchestrator::new(config).analyze_bytes(opener, video)?;
    let filter = analysis::filter_frames(&analysis.motion_data, &analysis.scene_changes, mode);
    Ok(Selection { analysis, filter })
}
