// ============================================================================
// framesift-core/src/source/ffmpeg.rs
// ============================================================================
//
// FFMPEG SOURCE: Container Probing and Raw Frame Streaming
//
// Container properties come from ffprobe; frames come from an ffmpeg child
// process that decodes the first video stream to packed rgb24 on stdout.
// ffmpeg scales to the working resolution itself, so the engine never holds
// a full-resolution frame.
//
// KEY COMPONENTS:
// - probe_video: ffprobe-backed VideoInfo extraction
// - FfmpegSource: FrameSource over an ffmpeg-sidecar child process
// - FfmpegOpener: SourceOpener used by the default analysis entry points
//
// The child process is owned by the source. Dropping the source before the
// stream ends kills and reaps the process.

use std::path::Path;
use std::process::ExitStatus;

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use ffmpeg_sidecar::iter::FfmpegIterator;
use ffprobe::{FfProbeError, ffprobe};

use super::{FrameSource, SourceOpener, VideoInfo};
use crate::config::{WORKING_HEIGHT, WORKING_WIDTH};
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::frame::Frame;

// --- Probing ---

/// Reads container properties of the first video stream.
///
/// The frame count is taken from the stream's `nb_frames` when present and
/// otherwise estimated as `round(duration * fps)`. Zero frames, or a
/// duration that cannot be read, is reported as `EmptyVideo`.
pub fn probe_video(path: &Path) -> CoreResult<VideoInfo> {
    log::debug!("Running ffprobe on: {}", path.display());

    let metadata = ffprobe(path).map_err(|err| {
        log::error!("ffprobe failed on {}: {:?}", path.display(), err);
        map_ffprobe_error(err, path)
    })?;

    let stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            CoreError::Decode(format!("No video stream found in {}", path.display()))
        })?;

    let width = stream.width.unwrap_or(0);
    let height = stream.height.unwrap_or(0);
    if width <= 0 || height <= 0 {
        return Err(CoreError::Decode(format!(
            "Invalid video dimensions in {}: {}x{}",
            path.display(),
            width,
            height
        )));
    }

    let fps = parse_frame_rate(&stream.avg_frame_rate)
        .or_else(|| parse_frame_rate(&stream.r_frame_rate));

    let duration = stream
        .duration
        .as_deref()
        .or(metadata.format.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok());

    let (total_frames, fps) = stream_timing(
        &path.display().to_string(),
        stream.nb_frames.as_deref(),
        fps,
        duration,
    )?;

    let info = VideoInfo::new(total_frames, fps, width as u32, height as u32);
    log::debug!(
        "Probed {}: {} frames @ {:.3} fps, {}x{}, {:.2}s",
        path.display(),
        info.total_frames,
        info.fps,
        info.width,
        info.height,
        info.duration_seconds
    );
    Ok(info)
}

/// Resolves frame count and frame rate from raw stream fields.
///
/// The count is `nb_frames` when present, else `round(duration * fps)`. A
/// missing rate is recovered as `nb_frames / duration`. Anything that leaves
/// no positive count or no positive rate is an empty video.
fn stream_timing(
    source: &str,
    nb_frames: Option<&str>,
    fps: Option<f64>,
    duration: Option<f64>,
) -> CoreResult<(u64, f64)> {
    let nb_frames = nb_frames
        .and_then(|n| n.trim().parse::<u64>().ok())
        .filter(|&n| n > 0);
    let duration = duration.filter(|d| d.is_finite() && *d > 0.0);

    let fps = match (fps, nb_frames, duration) {
        (Some(fps), _, _) => fps,
        (None, Some(frames), Some(secs)) => frames as f64 / secs,
        _ => {
            return Err(CoreError::EmptyVideo(format!(
                "{source}: unreadable frame rate and duration"
            )));
        }
    };

    let total_frames = match (nb_frames, duration) {
        (Some(frames), _) => frames,
        (None, Some(secs)) => (secs * fps).round() as u64,
        (None, None) => {
            return Err(CoreError::EmptyVideo(format!(
                "{source}: could not determine frame count or duration"
            )));
        }
    };

    if total_frames == 0 {
        return Err(CoreError::EmptyVideo(format!("{source} reports zero frames")));
    }
    Ok((total_frames, fps))
}

/// Parses ffprobe rates such as `30000/1001`, `25/1` or `29.97`.
/// Returns `None` for zero, negative or malformed rates.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

fn map_ffprobe_error(err: FfProbeError, path: &Path) -> CoreError {
    let context = format!("ffprobe ({})", path.display());
    match err {
        FfProbeError::Io(io_err) => command_start_error(context, io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(context, output.status, stderr.trim())
        }
        FfProbeError::Deserialize(err) => {
            CoreError::Decode(format!("{context}: unreadable probe output: {err}"))
        }
        other => CoreError::Decode(format!("{context}: {other:?}")),
    }
}

// --- Decoding ---

/// Frame source backed by an ffmpeg child process.
pub struct FfmpegSource {
    info: VideoInfo,
    child: FfmpegChild,
    events: FfmpegIterator,
    decoded: u64,
    error_lines: u64,
    last_error: Option<String>,
    finished: bool,
}

impl FfmpegSource {
    /// Opens `path` and streams frames scaled to the working resolution.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::spawn(path, Some((WORKING_WIDTH, WORKING_HEIGHT)))
    }

    /// Opens `path` and streams frames at the container's native resolution.
    pub fn open_native(path: &Path) -> CoreResult<Self> {
        Self::spawn(path, None)
    }

    fn spawn(path: &Path, scale: Option<(u32, u32)>) -> CoreResult<Self> {
        let info = probe_video(path)?;

        let mut cmd = FfmpegCommand::new();
        cmd.hide_banner();
        cmd.input(path.to_string_lossy());
        cmd.args(["-map", "0:v:0", "-an", "-sn", "-dn"]);
        if let Some((width, height)) = scale {
            cmd.args(["-vf", &format!("scale={width}:{height}")]);
        }
        cmd.rawvideo();

        log::debug!("Spawning ffmpeg decoder: {:?}", cmd);

        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error("ffmpeg (decode)", e))?;
        let events = match child.iter() {
            Ok(events) => events,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CoreError::Decode(format!(
                    "Failed to read ffmpeg output for {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        Ok(Self {
            info,
            child,
            events,
            decoded: 0,
            error_lines: 0,
            last_error: None,
            finished: false,
        })
    }

    fn record_error(&mut self, line: String) {
        log::trace!("ffmpeg: {}", line);
        self.error_lines += 1;
        self.last_error = Some(line);
    }

    /// Reaps the child and decides whether the stream ended cleanly.
    fn finish(&mut self) -> CoreResult<()> {
        self.finished = true;
        let status = self
            .child
            .wait()
            .map_err(|e| command_start_error("ffmpeg (wait)", e))?;

        let message = self
            .last_error
            .take()
            .unwrap_or_else(|| format!("ffmpeg exited with {status}"));

        classify_exit(
            status,
            self.decoded,
            self.error_lines,
            self.info.total_frames,
            message,
        )?;
        log::debug!("ffmpeg decoded {} frame(s)", self.decoded);
        Ok(())
    }
}

/// Decides how a finished decode ended.
///
/// - failure before any frame: the command failed
/// - failure after some frames: truncated
/// - success without frames: empty video
/// - success after logged errors with fewer frames than the container
///   reports: truncated
fn classify_exit(
    status: ExitStatus,
    decoded: u64,
    error_lines: u64,
    total_frames: u64,
    message: String,
) -> CoreResult<()> {
    if !status.success() {
        if decoded == 0 {
            return Err(command_failed_error("ffmpeg (decode)", status, message));
        }
        return Err(CoreError::Truncated { decoded, message });
    }

    if decoded == 0 {
        return Err(CoreError::EmptyVideo(
            "decoder produced no frames".to_string(),
        ));
    }

    // Decoder errors followed by a short stream mean the input broke off.
    if error_lines > 0 && decoded < total_frames {
        return Err(CoreError::Truncated { decoded, message });
    }
    Ok(())
}

impl FrameSource for FfmpegSource {
    fn video_info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }

        while let Some(event) = self.events.next() {
            match event {
                FfmpegEvent::OutputFrame(raw) => {
                    let frame = Frame::from_rgb24(self.decoded, raw.width, raw.height, raw.data)?;
                    self.decoded += 1;
                    return Ok(Some(frame));
                }
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) => {
                    self.record_error(line);
                }
                FfmpegEvent::Error(line) => {
                    self.record_error(line);
                }
                FfmpegEvent::Done => break,
                _ => {}
            }
        }

        self.finish()?;
        Ok(None)
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if !self.finished {
            log::debug!(
                "Stopping ffmpeg decoder after {} frame(s)",
                self.decoded
            );
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Opens [`FfmpegSource`]s at the working resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegOpener;

impl SourceOpener for FfmpegOpener {
    type Source = FfmpegSource;

    fn open(&self, path: &Path) -> CoreResult<FfmpegSource> {
        FfmpegSource::open(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw

    fn exited(code: i32) -> ExitStatus {
        ExitStatus::from_raw(code << 8)
    }

    #[test]
    fn test_frame_rate_parsing() {
        assert_eq!(parse_frame_rate("30"), Some(30.0));
        assert_eq!(parse_frame_rate("29.97"), Some(29.97));
        assert_eq!(parse_frame_rate("30000/1001"), Some(30000.0 / 1001.0));
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("30/0"), None);
        assert_eq!(parse_frame_rate("invalid"), None);
    }

    #[test]
    fn test_probe_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mp4");
        // Either ffprobe is absent (start error) or it rejects the path.
        assert!(probe_video(&missing).is_err());
    }

    #[test]
    fn test_stream_timing_prefers_nb_frames() {
        let (frames, fps) = stream_timing("clip", Some("120"), Some(30.0), Some(3.9)).unwrap();
        assert_eq!(frames, 120);
        assert_eq!(fps, 30.0);
    }

    #[test]
    fn test_stream_timing_estimates_from_duration() {
        let (frames, fps) = stream_timing("clip", None, Some(25.0), Some(2.04)).unwrap();
        assert_eq!(frames, 51);
        assert_eq!(fps, 25.0);
    }

    #[test]
    fn test_stream_timing_recovers_rate_from_duration() {
        let (frames, fps) = stream_timing("clip", Some("120"), None, Some(4.0)).unwrap();
        assert_eq!(frames, 120);
        assert_eq!(fps, 30.0);
    }

    #[test]
    fn test_stream_timing_without_rate_or_duration_is_empty() {
        // nb_frames alone cannot give a duration.
        let err = stream_timing("clip", Some("120"), None, None).unwrap_err();
        assert!(matches!(err, CoreError::EmptyVideo(_)));

        let err = stream_timing("clip", None, Some(30.0), None).unwrap_err();
        assert!(matches!(err, CoreError::EmptyVideo(_)));

        let err = stream_timing("clip", Some("120"), None, Some(f64::NAN)).unwrap_err();
        assert!(matches!(err, CoreError::EmptyVideo(_)));
    }

    #[test]
    fn test_stream_timing_zero_frames_is_empty() {
        let err = stream_timing("clip", Some("0"), Some(30.0), Some(0.0)).unwrap_err();
        assert!(matches!(err, CoreError::EmptyVideo(_)));

        let err = stream_timing("clip", None, Some(30.0), Some(0.01)).unwrap_err();
        assert!(err.to_string().contains("zero frames"));
    }

    #[test]
    fn test_clean_exit_with_all_frames() {
        assert!(classify_exit(exited(0), 100, 0, 100, String::new()).is_ok());
        // A container estimate above the decoded count is fine without errors.
        assert!(classify_exit(exited(0), 90, 0, 100, String::new()).is_ok());
        // Logged errors alone do not fail a complete stream.
        assert!(classify_exit(exited(0), 100, 3, 100, "warn".into()).is_ok());
    }

    #[test]
    fn test_failure_before_first_frame_is_command_failure() {
        let err = classify_exit(exited(1), 0, 1, 100, "Invalid data".into()).unwrap_err();
        assert!(matches!(err, CoreError::CommandFailed { .. }));
        assert_eq!(err.kind(), "decode_error");
        assert!(err.to_string().contains("Invalid data"));
    }

    #[test]
    fn test_failure_mid_stream_is_truncated() {
        let err = classify_exit(exited(1), 42, 1, 100, "corrupt packet".into()).unwrap_err();
        match err {
            CoreError::Truncated { decoded, message } => {
                assert_eq!(decoded, 42);
                assert_eq!(message, "corrupt packet");
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn test_clean_exit_without_frames_is_empty() {
        let err = classify_exit(exited(0), 0, 0, 100, String::new()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyVideo(_)));
    }

    #[test]
    fn test_short_stream_after_errors_is_truncated() {
        let err = classify_exit(exited(0), 60, 2, 100, "error while decoding".into()).unwrap_err();
        assert!(matches!(err, CoreError::Truncated { decoded: 60, .. }));
    }
}
