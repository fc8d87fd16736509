// ============================================================================
// framesift-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: indicatif progress bars for analysis passes
//
// Implements the core `ProgressReporter` trait with one progress bar per
// analysed video. Bars live in a shared `MultiProgress` so that parallel
// analyses draw cleanly, and are hidden when progress output is disabled.

use framesift_core::{AnalysisResult, ProgressReporter, SceneMethod, VideoInfo};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.green} {msg:24!} [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})";

/// Owns the draw target shared by every bar of one CLI invocation.
#[derive(Clone)]
pub struct ProgressHub {
    multi: MultiProgress,
    enabled: bool,
}

impl ProgressHub {
    pub fn new(enabled: bool) -> Self {
        let target = if enabled {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        Self {
            multi: MultiProgress::with_draw_target(target),
            enabled,
        }
    }

    /// Creates a reporter whose bar is labelled `label`.
    pub fn reporter(&self, label: &str) -> CliProgressReporter {
        let bar = if self.enabled {
            self.multi.add(ProgressBar::new(0))
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("█▓▒░ "));
        }
        bar.set_message(label.to_string());
        CliProgressReporter {
            bar,
            label: label.to_string(),
        }
    }
}

/// Progress bar for one analysis pass.
pub struct CliProgressReporter {
    bar: ProgressBar,
    label: String,
}

impl ProgressReporter for CliProgressReporter {
    fn analysis_started(&self, info: &VideoInfo, method: SceneMethod) {
        self.bar.set_length(info.total_frames);
        self.bar.set_message(format!("{} ({})", self.label, method));
    }

    fn frame_processed(&self, index: u64, total: u64) {
        // Container counts can be estimates; never let the bar overflow.
        if index + 1 > total {
            self.bar.set_length(index + 1);
        }
        self.bar.set_position(index + 1);
    }

    fn analysis_finished(&self, _result: &AnalysisResult) {
        self.bar.finish_and_clear();
    }
}

impl Drop for CliProgressReporter {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}

/// Formats a duration in seconds as `HH:MM:SS`.
pub fn format_duration_seconds(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
