// ============================================================================
// framesift-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for framesift-core
//
// This module defines the error types used throughout the framesift-core
// library. Every failure the engine can report maps onto one of a small set
// of classes that the caller can act on: bad parameters, undecodable input,
// empty input, a stream that broke off mid-pass, or a cancelled analysis.
//
// KEY COMPONENTS:
// - CoreError: Enum of all possible errors in the library
// - CoreResult: Type alias for Result with CoreError
// - Helper functions for external command failures (ffmpeg/ffprobe)

use std::fmt::Display;
use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the analysis engine.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Out-of-range or malformed request parameters. Raised before any
    /// resource is opened.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The container or codec could not be opened or decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The source reported zero frames or an unreadable duration.
    #[error("Empty video: {0}")]
    EmptyVideo(String),

    /// Decoding broke off mid-stream. No partial result is produced.
    #[error("Decode truncated after {decoded} frame(s): {message}")]
    Truncated { decoded: u64, message: String },

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to start command '{cmd}': {source}")]
    CommandStart {
        cmd: String,
        #[source]
        source: io::Error,
    },

    #[error("Command '{cmd}' failed with status {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },
}

impl CoreError {
    /// Stable machine-readable tag for JSON error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "validation_error",
            CoreError::Decode(_) | CoreError::CommandStart { .. } | CoreError::CommandFailed { .. } => {
                "decode_error"
            }
            CoreError::EmptyVideo(_) => "empty_video_error",
            CoreError::Truncated { .. } => "truncated_error",
            CoreError::Cancelled => "cancelled",
            CoreError::Io(_) => "io_error",
            CoreError::Json(_) => "json_error",
            CoreError::Image(_) => "image_error",
        }
    }

    /// True for errors raised by parameter validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

/// Result type for framesift-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CoreError::CommandStart` for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandStart {
        cmd: cmd.into(),
        source,
    }
}

/// Builds a `CoreError::CommandFailed` for a command that exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Display,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.to_string(),
    }
}

/// Shorthand for a validation failure with a formatted message.
pub(crate) fn validation_error(message: impl Into<String>) -> CoreError {
    CoreError::Validation(message.into())
}
