//! `info`: prints container properties as reported by ffprobe.

use framesift_core::probe_video;
use serde_json::json;

use super::analyze::ensure_input_file;
use super::{Outcome, RunContext};
use crate::cli::InfoArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

pub fn run_info(args: InfoArgs, ctx: &RunContext) -> CliResult<Outcome> {
    ensure_input_file(&args.input)?;
    let info = probe_video(&args.input).cli_context(args.input.display())?;
    log::debug!(
        "{}: {} frame(s) at {:.3} fps, {}x{}",
        args.input.display(),
        info.total_frames,
        info.fps,
        info.width,
        info.height
    );
    output::print_json(&json!({ "success": true, "video_info": info }), ctx.pretty)?;
    Ok(Outcome::Success)
}
