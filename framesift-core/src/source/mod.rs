// ============================================================================
// framesift-core/src/source/mod.rs
// ============================================================================
//
// FRAME SOURCES: Sequential Decoders Feeding the Analysis Engine
//
// A frame source opens one video, reports its `VideoInfo` once, and then
// yields decoded frames in order until the stream ends. Sources are
// forward-only and single-pass; analysing a video again means opening a new
// source.
//
// KEY COMPONENTS:
// - VideoInfo: Immutable container properties (plus sampling metadata)
// - FrameSource: Trait implemented by every decoder
// - SourceOpener: Trait for opening a source from a path (dependency seam)
// - FfmpegSource / FfmpegOpener: ffprobe + ffmpeg-sidecar implementation
// - MemorySource: In-memory synthetic frames for tests and embedding

pub mod ffmpeg;
pub mod memory;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::frame::Frame;

pub use ffmpeg::{FfmpegOpener, FfmpegSource, probe_video};
pub use memory::MemorySource;

/// Properties of the analysed video.
///
/// The first five fields are read from the container when the source is
/// opened. The optional fields are filled in by the orchestrator and describe
/// how the video was sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub total_frames: u64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub duration_seconds: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_frames: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_fps: Option<f64>,
}

impl VideoInfo {
    /// Builds container-level info; duration is derived from the frame count.
    pub fn new(total_frames: u64, fps: f64, width: u32, height: u32) -> Self {
        let duration_seconds = if fps > 0.0 {
            total_frames as f64 / fps
        } else {
            0.0
        };
        Self {
            total_frames,
            fps,
            width,
            height,
            duration_seconds,
            analyzed_frames: None,
            frame_skip: None,
            target_fps: None,
            original_fps: None,
        }
    }
}

/// A forward-only, single-pass sequence of decoded frames.
pub trait FrameSource {
    /// Container properties, available as soon as the source is open.
    fn video_info(&self) -> &VideoInfo;

    /// Returns the next frame, or `None` once the stream is exhausted.
    ///
    /// Frame indices are contiguous from zero. A stream that breaks off
    /// mid-way reports `CoreError::Truncated` instead of ending early.
    fn next_frame(&mut self) -> CoreResult<Option<Frame>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn video_info(&self) -> &VideoInfo {
        (**self).video_info()
    }

    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        (**self).next_frame()
    }
}

/// Opens frame sources for a video file.
pub trait SourceOpener {
    type Source: FrameSource;

    fn open(&self, path: &Path) -> CoreResult<Self::Source>;
}
