// ============================================================================
// framesift-core/src/orchestrator.rs
// ============================================================================
//
// ANALYSIS ORCHESTRATION: Single Decode Pass over a Frame Source
//
// The orchestrator drives one forward pass over a `FrameSource`. Each frame
// is reduced to its grayscale, blurred and (for the histogram strategy)
// histogram features, then dropped; only the previous frame's features are
// kept. Motion records are produced as the pass goes, and scene metrics are
// fed to the selected strategy, which decides after the pass.
//
// KEY COMPONENTS:
// - AnalysisOrchestrator: Validated config + cancellation + progress sink
// - run: The pass itself, over any FrameSource
// - analyze_path / analyze_bytes: Open (or spool then open) and run
//
// All-or-nothing: any decode error, truncation or cancellation aborts the
// pass and no partial result is returned.

use std::path::Path;

use image::GrayImage;

use crate::analysis::{FrameDifferencer, FrameFeatures, MotionDetector, strategy_for};
use crate::cancel::CancellationToken;
use crate::config::AnalysisConfig;
use crate::error::{CoreError, CoreResult};
use crate::progress_reporting::{NullReporter, ProgressReporter};
use crate::report::{AnalysisResult, FrameRecord, MotionData};
use crate::source::{FrameSource, SourceOpener, VideoInfo};
use crate::temp_files;

/// Drives analysis passes with one validated configuration.
pub struct AnalysisOrchestrator {
    config: AnalysisConfig,
    cancel: CancellationToken,
    reporter: Box<dyn ProgressReporter>,
}

impl AnalysisOrchestrator {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
            reporter: Box::new(NullReporter),
        }
    }

    /// Uses `token` to stop the pass from another thread.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Opens `path` with `opener` and analyses it. The source is released
    /// before this returns, whatever the outcome.
    pub fn analyze_path<O: SourceOpener>(&self, opener: &O, path: &Path) -> CoreResult<AnalysisResult> {
        self.cancel.check()?;
        let mut source = opener.open(path)?;
        self.run(&mut source)
    }

    /// Spools `video` to a temporary file and analyses it. The temporary file
    /// is removed before this returns, whatever the outcome.
    pub fn analyze_bytes<O: SourceOpener>(&self, opener: &O, video: &[u8]) -> CoreResult<AnalysisResult> {
        if video.is_empty() {
            return Err(CoreError::EmptyVideo("video payload is empty".to_string()));
        }
        let spooled = temp_files::spool_video(video)?;
        let result = self.analyze_path(opener, spooled.path());
        drop(spooled);
        result
    }

    /// Runs one pass over `source`.
    pub fn run<S: FrameSource + ?Sized>(&self, source: &mut S) -> CoreResult<AnalysisResult> {
        let config = &self.config;
        let mut info = source.video_info().clone();
        let skip = config.frame_skip(info.fps);

        let differ = FrameDifferencer::new(&config.tuning);
        let detector = MotionDetector::new(config);
        let mut strategy = strategy_for(config);
        let with_histogram = strategy.needs_histogram();

        log::debug!(
            "Analysing {} frame(s) @ {:.3} fps with method '{}' (frame skip {})",
            info.total_frames,
            info.fps,
            config.method,
            skip
        );
        self.reporter.analysis_started(&info, config.method);

        let mut motion_data = MotionData::new();
        let mut previous: Option<(FrameFeatures, GrayImage)> = None;
        let mut decoded = 0u64;

        self.cancel.check()?;
        while let Some(frame) = source.next_frame()? {
            self.cancel.check()?;
            decoded += 1;

            let index = frame.index();
            if index % skip != 0 {
                continue;
            }

            let features = differ.features(&frame, with_histogram);
            drop(frame);
            let blurred = detector.prepare(&features.gray);

            let record = match &previous {
                None => FrameRecord {
                    index,
                    ..detector.anchor()
                },
                Some((prev_features, prev_blurred)) => {
                    let metrics = differ.metrics(prev_features, &features);
                    strategy.observe(index, &metrics);
                    detector.measure(index, prev_blurred, &blurred)
                }
            };
            log::trace!(
                "Frame {}: score {:.3}, pixels {}, motion {}",
                index,
                record.motion_score,
                record.motion_pixel_count,
                record.has_motion
            );

            motion_data.insert(index, record);
            previous = Some((features, blurred));
            self.reporter.frame_processed(index, info.total_frames);
        }

        if decoded == 0 {
            return Err(CoreError::EmptyVideo(
                "source produced no frames".to_string(),
            ));
        }
        if decoded != info.total_frames {
            log::warn!(
                "Container reported {} frame(s) but {} were decoded; using the decoded count",
                info.total_frames,
                decoded
            );
            info = VideoInfo::new(decoded, info.fps, info.width, info.height);
        }

        let scene_changes = strategy.finish();
        let result = self.assemble(info, skip, scene_changes, motion_data);

        log::info!(
            "Analysis complete: {} scene(s), {} of {} analysed frame(s) with motion",
            result.scene_count(),
            result.frames_with_motion,
            result.motion_data.len()
        );
        self.reporter.analysis_finished(&result);
        Ok(result)
    }

    fn assemble(
        &self,
        mut info: VideoInfo,
        skip: u64,
        scene_changes: Vec<u64>,
        motion_data: MotionData,
    ) -> AnalysisResult {
        let analyzed = motion_data.len() as u64;
        let frames_with_motion = motion_data.values().filter(|r| r.has_motion).count() as u64;

        info.analyzed_frames = Some(analyzed);
        if let Some(target) = self.config.target_fps {
            info.frame_skip = Some(skip);
            info.target_fps = Some(target);
            info.original_fps = Some(info.fps);
        }

        AnalysisResult {
            video_info: info,
            scene_changes,
            motion_data,
            frames_with_motion,
            frames_without_motion: analyzed - frames_with_motion,
            method: self.config.method,
        }
    }
}
