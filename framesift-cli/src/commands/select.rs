//! `select`: analysis and filtering of one video in a single step.
//!
//! The filter mode and the analysis parameters are both validated before the
//! video is opened.

use framesift_core::analysis::filter_frames;
use framesift_core::{
    AnalysisConfig, AnalysisOrchestrator, FfmpegOpener, FilterMode, Selection, extract_frames,
};

use super::analyze::{ensure_input_file, label};
use super::{Outcome, RunContext};
use crate::cli::SelectArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

pub fn run_select(args: SelectArgs, ctx: &RunContext) -> CliResult<Outcome> {
    let mode: FilterMode = args.mode.parse()?;
    let config = AnalysisConfig::from_params(&args.analysis.to_params())?;
    ensure_input_file(&args.input)?;

    let name = label(&args.input);
    let analysis = AnalysisOrchestrator::new(config)
        .with_cancellation(ctx.cancel.clone())
        .with_reporter(Box::new(ctx.progress.reporter(&name)))
        .analyze_path(&FfmpegOpener, &args.input)
        .cli_context(args.input.display())?;
    let filter = filter_frames(&analysis.motion_data, &analysis.scene_changes, mode);

    output::print_analysis_summary(&name, &analysis);
    output::print_filter_summary(&filter);

    if let Some(dir) = &args.extract_to {
        ctx.cancel.check()?;
        let written = extract_frames(&args.input, &filter.selected_frames, dir)
            .cli_with_context(|| format!("Failed to extract frames to {}", dir.display()))?;
        log::info!("Wrote {} frame(s) to {}", written.len(), dir.display());
    }

    let selection = Selection { analysis, filter };
    output::print_json(&selection.response(), ctx.pretty)?;
    Ok(Outcome::Success)
}
