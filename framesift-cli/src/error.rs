// ============================================================================
// framesift-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses the core error type so that every failure keeps its
// machine-readable kind in the JSON error envelope. Context added here is
// prepended to the message without changing the kind.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: Context extension for Results and Options
// - exit_code: Process exit status per error kind

use framesift_core::{CoreError, CoreResult};

use std::fmt;
use std::io;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Extension trait for adding context to errors in the CLI.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;

    /// Add context using a closure (for lazy evaluation).
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| with_context(e.into(), context))
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| with_context(e.into(), f()))
    }
}

impl<T> CliErrorContext<T> for Option<T> {
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.ok_or_else(|| CoreError::Validation(context.to_string()))
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| CoreError::Validation(f().to_string()))
    }
}

/// Prefixes the message of `err` with `context`, keeping its kind.
fn with_context(err: CoreError, context: impl fmt::Display) -> CoreError {
    match err {
        CoreError::Validation(msg) => CoreError::Validation(format!("{context}: {msg}")),
        CoreError::Decode(msg) => CoreError::Decode(format!("{context}: {msg}")),
        CoreError::EmptyVideo(msg) => CoreError::EmptyVideo(format!("{context}: {msg}")),
        CoreError::Truncated { decoded, message } => CoreError::Truncated {
            decoded,
            message: format!("{context}: {message}"),
        },
        CoreError::Io(e) => CoreError::Io(io::Error::new(e.kind(), format!("{context}: {e}"))),
        other => other,
    }
}

/// Exit status for a failed command: 2 for bad input, 130 for Ctrl-C, 1 otherwise.
pub fn exit_code(err: &CoreError) -> i32 {
    match err {
        CoreError::Validation(_) => 2,
        CoreError::Cancelled => 130,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_kind() {
        let err: CliResult<()> = Err(CoreError::EmptyVideo("zero frames".into()));
        let err = err.cli_context("clip.mp4").unwrap_err();
        assert_eq!(err.kind(), "empty_video_error");
        assert!(err.to_string().contains("clip.mp4: zero frames"));
    }

    #[test]
    fn test_io_context() {
        let res: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = res.cli_with_context(|| "reading analysis.json").unwrap_err();
        assert_eq!(err.kind(), "io_error");
        assert!(err.to_string().contains("reading analysis.json"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&CoreError::Validation("x".into())), 2);
        assert_eq!(exit_code(&CoreError::Cancelled), 130);
        assert_eq!(exit_code(&CoreError::Decode("x".into())), 1);
    }
}
