//! Progress Reporting API
//!
//! The core library reports analysis progress through this trait so that
//! front ends can draw progress bars without the engine depending on any
//! terminal crate.
//!
//! # Design Decisions
//! - Frame-level callbacks only; formatting belongs to the implementor
//! - Reporters are passed to the orchestrator, not installed globally

use crate::config::SceneMethod;
use crate::report::AnalysisResult;
use crate::source::VideoInfo;

/// Receives analysis progress events.
pub trait ProgressReporter: Send + Sync {
    /// The source is open and the pass is about to start.
    fn analysis_started(&self, info: &VideoInfo, method: SceneMethod);

    /// Frame `index` has been analysed. `total` is the container's frame
    /// count, which may be an estimate.
    fn frame_processed(&self, index: u64, total: u64);

    /// The pass completed successfully.
    fn analysis_finished(&self, result: &AnalysisResult);
}

/// Reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn analysis_started(&self, _info: &VideoInfo, _method: SceneMethod) {}

    fn frame_processed(&self, _index: u64, _total: u64) {}

    fn analysis_finished(&self, _result: &AnalysisResult) {}
}
