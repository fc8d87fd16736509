//! `filter`: reduces a saved analysis to a frame selection.
//!
//! The input is the JSON printed by `analyze` (or any object with
//! `motion_data` and `scene_changes`). `--mode` overrides a `filter_mode`
//! stored in the document.

use framesift_core::FilterRequest;
use std::io::Read;
use std::path::Path;

use super::{Outcome, RunContext};
use crate::cli::FilterArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

pub fn run_filter(args: FilterArgs, ctx: &RunContext) -> CliResult<Outcome> {
    let text = read_document(&args.input)?;
    let mut request = FilterRequest::from_json(&text)?;
    if let Some(mode) = args.mode {
        request.filter_mode = Some(mode);
    }

    let result = framesift_core::filter(&request)?;
    log::debug!(
        "Filtered {} motion record(s) and {} scene change(s)",
        request.motion_data.len(),
        request.scene_changes.len()
    );
    output::print_filter_summary(&result);
    output::print_json(&result, ctx.pretty)?;
    Ok(Outcome::Success)
}

/// Reads `path`, or stdin when `path` is `-`.
pub(crate) fn read_document(path: &Path) -> CliResult<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .cli_context("Failed to read analysis from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).cli_with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_document_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"scene_changes\": [0]}}").unwrap();
        let text = read_document(file.path()).unwrap();
        assert!(text.contains("scene_changes"));
    }

    #[test]
    fn test_read_document_missing_file_is_io_error() {
        let err = read_document(Path::new("no/such/analysis.json")).unwrap_err();
        assert_eq!(err.kind(), "io_error");
        assert!(err.to_string().contains("no/such/analysis.json"));
    }
}
