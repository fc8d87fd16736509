// ============================================================================
// framesift-cli/src/commands/analyze.rs
// ============================================================================
//
// ANALYZE COMMAND: Scene and motion analysis of one or more videos
//
// Parameters are validated once, before any video is opened. Videos are then
// analysed independently on a rayon pool, each with its own decoder and its
// own progress bar.
//
// OUTPUT:
// - one input: the analysis response object
// - several inputs: an array with one entry per input, each tagged "input"
// - --output-dir: one <stem>.analysis.json per input, plus a summary array

use framesift_core::{
    AnalysisConfig, AnalysisOrchestrator, AnalysisResult, CoreError, ErrorResponse, FfmpegOpener,
};
use rayon::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

use super::{Outcome, RunContext};
use crate::cli::AnalyzeArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

pub fn run_analyze(args: AnalyzeArgs, ctx: &RunContext) -> CliResult<Outcome> {
    let config = AnalysisConfig::from_params(&args.analysis.to_params())?;
    for input in &args.inputs {
        ensure_input_file(input)?;
    }
    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)
            .cli_with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let jobs = args
        .jobs
        .map(usize::from)
        .unwrap_or_else(rayon::current_num_threads)
        .min(args.inputs.len());
    log::debug!(
        "Analysing {} input(s) with {} job(s), method '{}'",
        args.inputs.len(),
        jobs,
        config.method
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| CoreError::Io(std::io::Error::other(e.to_string())))?;

    let results: Vec<(PathBuf, CliResult<AnalysisResult>)> = pool.install(|| {
        args.inputs
            .par_iter()
            .map(|input| (input.clone(), analyze_one(input, &config, ctx)))
            .collect()
    });

    if ctx.cancel.is_cancelled() {
        return Err(CoreError::Cancelled);
    }

    // Single input printed directly: its failure is the command's failure.
    if results.len() == 1 && args.output_dir.is_none() {
        let (input, result) = results.into_iter().next().ok_or(CoreError::Cancelled)?;
        let result = result?;
        output::print_analysis_summary(&label(&input), &result);
        output::print_json(&result.response(), ctx.pretty)?;
        return Ok(Outcome::Success);
    }

    let mut entries = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (input, result) in results {
        let entry = match result {
            Ok(result) => {
                output::print_analysis_summary(&label(&input), &result);
                match &args.output_dir {
                    Some(dir) => write_result(dir, &input, &result, ctx.pretty)?,
                    None => tagged(&input, serde_json::to_value(result.response())?),
                }
            }
            Err(err) => {
                failed += 1;
                log::error!("{}", err);
                tagged(&input, serde_json::to_value(ErrorResponse::from(&err))?)
            }
        };
        entries.push(entry);
    }

    output::print_json(&entries, ctx.pretty)?;
    Ok(if failed == 0 {
        Outcome::Success
    } else {
        Outcome::PartialFailure
    })
}

fn analyze_one(input: &Path, config: &AnalysisConfig, ctx: &RunContext) -> CliResult<AnalysisResult> {
    let reporter = ctx.progress.reporter(&label(input));
    AnalysisOrchestrator::new(config.clone())
        .with_cancellation(ctx.cancel.clone())
        .with_reporter(Box::new(reporter))
        .analyze_path(&FfmpegOpener, input)
        .cli_context(input.display())
}

fn write_result(dir: &Path, input: &Path, result: &AnalysisResult, pretty: bool) -> CliResult<Value> {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    let path = dir.join(format!("{stem}.analysis.json"));
    fs::write(&path, output::to_json(&result.response(), pretty)?)
        .cli_with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());

    Ok(json!({
        "input": input.display().to_string(),
        "success": true,
        "output": path.display().to_string(),
        "scene_count": result.scene_count(),
        "frames_with_motion": result.frames_with_motion,
    }))
}

fn tagged(input: &Path, mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        map.insert("input".to_string(), json!(input.display().to_string()));
    }
    value
}

/// Display label for progress bars and summaries.
pub(crate) fn label(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

pub(crate) fn ensure_input_file(input: &Path) -> CliResult<()> {
    if input.is_file() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid input path '{}': not a file",
            input.display()
        )))
    }
}
