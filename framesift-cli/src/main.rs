// framesift-cli/src/main.rs
//
// Entry point for the framesift binary.
//
// Responsibilities:
// - Parsing arguments and setting up logging.
// - Wiring Ctrl-C to cooperative cancellation of running analyses.
// - Printing the JSON error envelope and choosing the exit status.

use clap::Parser;
use framesift_cli::{Cli, Outcome, exit_code, logging, output, run};
use framesift_core::CancellationToken;
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if std::env::var_os("NO_COLOR").is_some() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::warn!("Interrupted, stopping after the current frame");
        handler_token.cancel();
    }) {
        log::warn!("Could not install Ctrl-C handler: {}", e);
    }

    let pretty = cli.pretty;
    match run(cli, cancel) {
        Ok(Outcome::Success) => {}
        Ok(Outcome::PartialFailure) => {
            log::error!("Some inputs failed; see the output for details");
            process::exit(1);
        }
        Err(e) => {
            output::print_error(&e, pretty);
            process::exit(exit_code(&e));
        }
    }
}
