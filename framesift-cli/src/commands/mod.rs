//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

use framesift_core::CancellationToken;

use crate::cli::Commands;
use crate::error::CliResult;
use crate::progress::ProgressHub;

/// Analyses videos and prints their results.
pub mod analyze;
/// Extracts frames from a video as JPEG files.
pub mod extract;
/// Filters a saved analysis.
pub mod filter;
/// Probes container properties.
pub mod info;
/// Analysis and filtering in one step.
pub mod select;

/// Settings shared by every command of one invocation.
#[derive(Clone)]
pub struct RunContext {
    pub cancel: CancellationToken,
    pub progress: ProgressHub,
    pub pretty: bool,
}

impl RunContext {
    pub fn new(cancel: CancellationToken, show_progress: bool, pretty: bool) -> Self {
        Self {
            cancel,
            progress: ProgressHub::new(show_progress),
            pretty,
        }
    }
}

/// How a command that did not fail outright finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Some inputs of a batch failed; their errors are already in the output.
    PartialFailure,
}

/// Runs the selected subcommand.
pub fn dispatch(command: Commands, ctx: &RunContext) -> CliResult<Outcome> {
    match command {
        Commands::Analyze(args) => analyze::run_analyze(args, ctx),
        Commands::Filter(args) => filter::run_filter(args, ctx),
        Commands::Select(args) => select::run_select(args, ctx),
        Commands::Extract(args) => extract::run_extract(args, ctx),
        Commands::Info(args) => info::run_info(args, ctx),
    }
}
