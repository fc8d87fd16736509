// Shared fixtures for framesift-core integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use framesift_core::*;
use image::{Rgb, RgbImage};

/// Opener that serves pre-built frames instead of decoding the file. It
/// records every path it was asked to open and whether that path existed.
pub struct MockOpener {
    frames: Vec<RgbImage>,
    fps: f64,
    fail_with: Option<fn() -> CoreError>,
    truncate_after: Option<usize>,
    pub opened: RefCell<Vec<(PathBuf, bool)>>,
}

impl MockOpener {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames,
            fps: 30.0,
            fail_with: None,
            truncate_after: None,
            opened: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> CoreError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::new(Vec::new())
        }
    }

    pub fn truncating(frames: Vec<RgbImage>, after: usize) -> Self {
        Self {
            truncate_after: Some(after),
            ..Self::new(frames)
        }
    }

    pub fn open_count(&self) -> usize {
        self.opened.borrow().len()
    }

    pub fn opened_paths(&self) -> Vec<PathBuf> {
        self.opened.borrow().iter().map(|(p, _)| p.clone()).collect()
    }
}

impl SourceOpener for MockOpener {
    type Source = Box<dyn FrameSource>;

    fn open(&self, path: &Path) -> CoreResult<Self::Source> {
        self.opened
            .borrow_mut()
            .push((path.to_path_buf(), path.exists()));

        if let Some(error) = self.fail_with {
            return Err(error());
        }
        let inner = MemorySource::with_fps(self.frames.clone(), self.fps)?;
        match self.truncate_after {
            Some(limit) => Ok(Box::new(TruncatingSource { inner, limit })),
            None => Ok(Box::new(inner)),
        }
    }
}

/// Yields `limit` frames, then reports a truncated stream.
pub struct TruncatingSource {
    inner: MemorySource,
    limit: usize,
}

impl FrameSource for TruncatingSource {
    fn video_info(&self) -> &VideoInfo {
        self.inner.video_info()
    }

    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        if self.limit == 0 {
            return Err(CoreError::Truncated {
                decoded: 0,
                message: "invalid data found when processing input".to_string(),
            });
        }
        self.limit -= 1;
        self.inner.next_frame()
    }
}

pub fn solid(color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(16, 9, Rgb(color))
}

/// 3x3 checkerboard with the given dark/light values.
pub fn checkerboard(dark: u8, light: u8) -> RgbImage {
    RgbImage::from_fn(3, 3, |x, y| {
        let v = if (x + y) % 2 == 0 { light } else { dark };
        Rgb([v, v, v])
    })
}

/// Deterministic synthetic clip: a few "shots" of distinct colour, each with
/// a small block drifting across a noisy background.
pub fn synthetic_clip(frames: u32) -> Vec<RgbImage> {
    let palette = [[200, 40, 40], [30, 160, 60], [40, 60, 210], [220, 200, 30]];
    let mut seed: u32 = 0x2545_f491;
    let mut next = move || {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (seed >> 24) as u8
    };

    (0..frames)
        .map(|i| {
            let shot = (i / 17) as usize % palette.len();
            let base = palette[shot];
            let block_x = (i * 3) % 56;
            let mut image = RgbImage::new(64, 36);
            for (x, y, px) in image.enumerate_pixels_mut() {
                let noise = next() % 6;
                let in_block = x >= block_x && x < block_x + 8 && (12..24).contains(&y);
                *px = if in_block && i % 5 != 0 {
                    Rgb([255, 255, 255])
                } else {
                    Rgb([
                        base[0].saturating_add(noise),
                        base[1].saturating_add(noise),
                        base[2].saturating_add(noise),
                    ])
                };
            }
            image
        })
        .collect()
}

pub fn params(pairs: &[(&str, &str)]) -> AnalysisParams {
    let mut params = AnalysisParams::default();
    for (key, value) in pairs {
        let value = Some(value.to_string());
        match *key {
            "method" => params.method = value,
            "scene_threshold" => params.scene_threshold = value,
            "motion_threshold" => params.motion_threshold = value,
            "min_scene_length" => params.min_scene_length = value,
            "min_motion_pixels" => params.min_motion_pixels = value,
            "motion_criteria" => params.motion_criteria = value,
            "target_fps" => params.target_fps = value,
            other => panic!("unknown parameter {other}"),
        }
    }
    params
}
