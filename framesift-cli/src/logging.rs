// ============================================================================
// framesift-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger Initialisation for the CLI
//
// Log records go to stderr so that stdout carries nothing but JSON.
//
// USAGE:
// - default: info
// - --verbose: debug
// - RUST_LOG=trace (or any filter spec) overrides both

use console::style;
use log::LevelFilter;
use std::io::Write;

/// Initialises the global logger. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let result = env_logger::Builder::new()
        .format(|buf, record| {
            let level = match record.level() {
                log::Level::Error => style("ERROR").red().for_stderr(),
                log::Level::Warn => style("WARN ").yellow().for_stderr(),
                log::Level::Info => style("INFO ").green().for_stderr(),
                log::Level::Debug => style("DEBUG").blue().for_stderr(),
                log::Level::Trace => style("TRACE").magenta().for_stderr(),
            };
            writeln!(
                buf,
                "{} {} {}",
                style(get_timestamp()).dim().for_stderr(),
                level,
                record.args()
            )
        })
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .try_init();

    if result.is_ok() {
        log::debug!("Logger initialized with level: {}", level);
    }
}

/// Returns the current local time formatted for log lines.
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
