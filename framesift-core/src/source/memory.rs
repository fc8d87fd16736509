//! In-memory frame source.
//!
//! Serves a fixed list of images as if they had been decoded from a file.
//! Images are scaled to the working resolution as they are handed out, the
//! same way the ffmpeg source scales decoded frames.

use std::collections::VecDeque;

use image::RgbImage;

use super::{FrameSource, VideoInfo};
use crate::error::{CoreError, CoreResult};
use crate::frame::Frame;

/// Default frame rate reported for synthetic sources.
pub const DEFAULT_MEMORY_FPS: f64 = 30.0;

#[derive(Debug)]
pub struct MemorySource {
    info: VideoInfo,
    frames: VecDeque<RgbImage>,
    next_index: u64,
}

impl MemorySource {
    /// Builds a source over `frames` at [`DEFAULT_MEMORY_FPS`].
    ///
    /// Fails with `EmptyVideo` when no frames are given, mirroring a
    /// container that reports zero frames.
    pub fn new(frames: Vec<RgbImage>) -> CoreResult<Self> {
        Self::with_fps(frames, DEFAULT_MEMORY_FPS)
    }

    pub fn with_fps(frames: Vec<RgbImage>, fps: f64) -> CoreResult<Self> {
        let first = frames
            .first()
            .ok_or_else(|| CoreError::EmptyVideo("in-memory source has no frames".to_string()))?;
        let (width, height) = first.dimensions();
        let info = VideoInfo::new(frames.len() as u64, fps, width, height);

        Ok(Self {
            info,
            frames: frames.into(),
            next_index: 0,
        })
    }
}

impl FrameSource for MemorySource {
    fn video_info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        let Some(image) = self.frames.pop_front() else {
            return Ok(None);
        };
        let frame = Frame::at_working_resolution(self.next_index, image);
        self.next_index += 1;
        Ok(Some(frame))
    }
}
