// framesift-cli/src/lib.rs
//
// Library portion of the framesift CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands};
pub use commands::{Outcome, RunContext, dispatch};
pub use error::{CliErrorContext, CliResult, exit_code};

use framesift_core::CancellationToken;

/// Runs one parsed invocation to completion.
pub fn run(cli: Cli, cancel: CancellationToken) -> CliResult<Outcome> {
    let ctx = RunContext::new(cancel, !cli.no_progress, cli.pretty);
    dispatch(cli.command, &ctx)
}
