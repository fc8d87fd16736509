//! Terminal output helpers.
//!
//! JSON results go to stdout. Human-readable summaries and error lines go to
//! stderr through `console`, which drops styling when stderr is not a
//! terminal or colours are disabled.

use console::{Term, style};
use framesift_core::{AnalysisResult, CoreError, ErrorResponse, FilterResult};
use serde::Serialize;
use std::io::Write;

use crate::error::CliResult;
use crate::progress::format_duration_seconds;

/// Serialises `value` to stdout as one JSON document.
pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> CliResult<()> {
    let text = to_json(value, pretty)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}

pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> CliResult<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

/// Reports a failure: the JSON envelope on stdout, a styled line on stderr.
pub fn print_error(err: &CoreError, pretty: bool) {
    let envelope = ErrorResponse::from(err);
    if let Ok(text) = to_json(&envelope, pretty) {
        println!("{text}");
    }
    let _ = Term::stderr().write_line(&format!(
        "{} {}",
        style("✗").red().bold().for_stderr(),
        err
    ));
}

/// One-line summary of an analysis on stderr.
pub fn print_analysis_summary(label: &str, result: &AnalysisResult) {
    let info = &result.video_info;
    let line = format!(
        "{} {}: {} scene(s), {}/{} frame(s) with motion, {} @ {:.2} fps, {}",
        style("✓").green().bold().for_stderr(),
        style(label).cyan().for_stderr(),
        result.scene_count(),
        result.frames_with_motion,
        result.motion_data.len(),
        format_duration_seconds(info.duration_seconds),
        info.fps,
        result.method,
    );
    let _ = Term::stderr().write_line(&line);
}

/// One-line summary of a filter result on stderr.
pub fn print_filter_summary(result: &FilterResult) {
    let _ = Term::stderr().write_line(&format!(
        "{} selected {} frame(s) with mode '{}'",
        style("✓").green().bold().for_stderr(),
        result.count,
        result.filter_mode,
    ));
}
