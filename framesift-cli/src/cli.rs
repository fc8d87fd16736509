// framesift-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use framesift_core::AnalysisParams;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "framesift: pick the informative frames out of a video",
    long_about = "Detects scene changes and motion in videos and selects the frames worth annotating. \
                  Results are written to stdout as JSON; logs and progress go to stderr."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG overrides this).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Pretty-print JSON output.
    #[arg(long, global = true, default_value_t = false, env = "FRAMESIFT_PRETTY")]
    pub pretty: bool,

    /// Do not draw progress bars.
    #[arg(long, global = true, default_value_t = false, env = "FRAMESIFT_NO_PROGRESS")]
    pub no_progress: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyses one or more videos for scene changes and motion
    Analyze(AnalyzeArgs),
    /// Filters a saved analysis into a frame selection
    Filter(FilterArgs),
    /// Analyses a video and filters the result in one step
    Select(SelectArgs),
    /// Writes selected frames of a video as JPEG files
    Extract(ExtractArgs),
    /// Prints container properties of a video
    Info(InfoArgs),
}

/// Analysis parameters shared by `analyze` and `select`. Values are passed to
/// the engine as given and validated there.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Scene detection method: adaptive or histogram
    #[arg(long, value_name = "METHOD", env = "FRAMESIFT_METHOD")]
    pub method: Option<String>,

    /// Scene sensitivity percentage (10-80, lower detects more cuts)
    #[arg(long, value_name = "PERCENT", env = "FRAMESIFT_SCENE_THRESHOLD")]
    pub scene_threshold: Option<String>,

    /// Mean blurred difference a frame must exceed to count as moving (0.5-10)
    #[arg(long, value_name = "SCORE", env = "FRAMESIFT_MOTION_THRESHOLD")]
    pub motion_threshold: Option<String>,

    /// Minimum number of frames between scene changes (5-60)
    #[arg(long, value_name = "FRAMES", env = "FRAMESIFT_MIN_SCENE_LENGTH")]
    pub min_scene_length: Option<String>,

    /// Motion mask pixels a frame must exceed to count as moving
    #[arg(long, value_name = "PIXELS", env = "FRAMESIFT_MIN_MOTION_PIXELS")]
    pub min_motion_pixels: Option<String>,

    /// How pixel count and score combine: all or any
    #[arg(long, value_name = "RULE", env = "FRAMESIFT_MOTION_CRITERIA")]
    pub motion_criteria: Option<String>,

    /// Analyse at most this many frames per second of video
    #[arg(long, value_name = "FPS", env = "FRAMESIFT_TARGET_FPS")]
    pub target_fps: Option<String>,
}

impl AnalysisArgs {
    pub fn to_params(&self) -> AnalysisParams {
        AnalysisParams {
            method: self.method.clone(),
            scene_threshold: self.scene_threshold.clone(),
            motion_threshold: self.motion_threshold.clone(),
            min_scene_length: self.min_scene_length.clone(),
            min_motion_pixels: self.min_motion_pixels.clone(),
            motion_criteria: self.motion_criteria.clone(),
            target_fps: self.target_fps.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Video files to analyse
    #[arg(required = true, value_name = "VIDEO")]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Write one <name>.analysis.json per input here instead of printing
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of videos analysed at the same time (defaults to CPU count)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Analysis JSON produced by `analyze` ("-" reads stdin)
    #[arg(short, long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Selection policy: motion, scenes or both (defaults to the file's
    /// filter_mode, then motion)
    #[arg(short, long, value_name = "MODE", env = "FRAMESIFT_FILTER_MODE")]
    pub mode: Option<String>,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Video file to analyse
    #[arg(value_name = "VIDEO")]
    pub input: PathBuf,

    /// Selection policy: motion, scenes or both
    #[arg(short, long, value_name = "MODE", default_value = "motion", env = "FRAMESIFT_FILTER_MODE")]
    pub mode: String,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Also write the selected frames as JPEG files into this directory
    #[arg(long, value_name = "DIR")]
    pub extract_to: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Video file to read frames from
    #[arg(value_name = "VIDEO")]
    pub input: PathBuf,

    /// Comma-separated frame indices, or @FILE with a JSON list or a filter result
    #[arg(short, long, value_name = "FRAMES")]
    pub frames: String,

    /// Directory the JPEG files are written to
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Video file to probe
    #[arg(value_name = "VIDEO")]
    pub input: PathBuf,
}
