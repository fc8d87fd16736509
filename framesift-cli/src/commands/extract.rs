// ============================================================================
// framesift-cli/src/commands/extract.rs
// ============================================================================
//
// EXTRACT COMMAND: Writes selected frames of a video as JPEG files
//
// The frame list is either given inline ("0,5,9") or read from a JSON file
// with "@path". The file may hold a plain array of indices or a filter
// result, in which case its "selected_frames" are used.

use framesift_core::{CoreError, extract_frames};
use serde_json::{Value, json};
use std::path::Path;

use super::analyze::ensure_input_file;
use super::filter::read_document;
use super::{Outcome, RunContext};
use crate::cli::ExtractArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

pub fn run_extract(args: ExtractArgs, ctx: &RunContext) -> CliResult<Outcome> {
    let frames = parse_frame_list(&args.frames)?;
    ensure_input_file(&args.input)?;

    let written = extract_frames(&args.input, &frames, &args.output).cli_context(args.input.display())?;
    log::info!(
        "Wrote {} of {} requested frame(s) to {}",
        written.len(),
        frames.len(),
        args.output.display()
    );

    let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
    output::print_json(
        &json!({ "success": true, "count": paths.len(), "frames": paths }),
        ctx.pretty,
    )?;
    Ok(Outcome::Success)
}

/// Parses `--frames`: a comma-separated list or `@FILE`.
pub fn parse_frame_list(spec: &str) -> CliResult<Vec<u64>> {
    let spec = spec.trim();
    if let Some(path) = spec.strip_prefix('@') {
        let text = read_document(Path::new(path))?;
        return frames_from_json(&text);
    }

    let frames = spec
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map_err(|_| CoreError::Validation(format!("Invalid frame index '{s}'")))
        })
        .collect::<CliResult<Vec<u64>>>()?;

    if frames.is_empty() {
        return Err(CoreError::Validation("No frame indices given".to_string()));
    }
    Ok(frames)
}

fn frames_from_json(text: &str) -> CliResult<Vec<u64>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CoreError::Validation(format!("Invalid frame list JSON: {e}")))?;
    let list = match &value {
        Value::Array(_) => &value,
        Value::Object(map) => map
            .get("selected_frames")
            .cli_context("Frame list object has no 'selected_frames'")?,
        _ => {
            return Err(CoreError::Validation(
                "Frame list must be an array or a filter result".to_string(),
            ));
        }
    };
    serde_json::from_value(list.clone())
        .map_err(|e| CoreError::Validation(format!("Invalid frame index in list: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_inline_list() {
        assert_eq!(parse_frame_list("0, 5,9").unwrap(), vec![0, 5, 9]);
        assert_eq!(parse_frame_list("12,").unwrap(), vec![12]);
    }

    #[test]
    fn test_inline_list_rejects_garbage() {
        assert!(parse_frame_list("1,x,3").unwrap_err().is_validation());
        assert!(parse_frame_list("-4").unwrap_err().is_validation());
        assert!(parse_frame_list(" , ").unwrap_err().is_validation());
    }

    #[test]
    fn test_json_array_and_filter_result() {
        assert_eq!(frames_from_json("[3, 1, 2]").unwrap(), vec![3, 1, 2]);
        let filter = r#"{"success":true,"selected_frames":[0,4],"count":2,"filter_mode":"motion"}"#;
        assert_eq!(frames_from_json(filter).unwrap(), vec![0, 4]);
    }

    #[test]
    fn test_json_rejects_other_shapes() {
        assert!(frames_from_json("{\"count\": 2}").unwrap_err().is_validation());
        assert!(frames_from_json("\"0,1\"").unwrap_err().is_validation());
        assert!(frames_from_json("[1.5]").unwrap_err().is_validation());
        assert!(frames_from_json("not json").unwrap_err().is_validation());
    }

    #[test]
    fn test_at_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[7, 8]").unwrap();
        let spec = format!("@{}", file.path().display());
        assert_eq!(parse_frame_list(&spec).unwrap(), vec![7, 8]);
    }
}
