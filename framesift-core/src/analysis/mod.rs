//! Frame analysis algorithms.
//!
//! - `imageops`: grayscale, blur, threshold, dilation and HSV primitives
//! - `differ`: pairwise frame metrics
//! - `motion`: per-frame motion classification
//! - `scene`: scene boundary strategies
//! - `filter`: policy-based frame selection

pub mod differ;
pub mod filter;
pub mod imageops;
pub mod motion;
pub mod scene;

pub use differ::{FrameDifferencer, FrameFeatures, FrameMetrics};
pub use filter::filter_frames;
pub use motion::MotionDetector;
pub use scene::{AdaptiveStrategy, BoundaryAccumulator, HistogramStrategy, SceneStrategy, strategy_for};
