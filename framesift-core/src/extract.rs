//! Frame extraction to JPEG.
//!
//! Decodes a video once, front to back, and writes each requested frame as
//! `frame_{index:06}.jpg`. Decoding stops after the last requested index.
//! Requested indices past the end of the stream are skipped with a warning.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::error::CoreResult;
use crate::source::{FfmpegSource, FrameSource};

/// File name used for an extracted frame.
pub fn frame_file_name(index: u64) -> String {
    format!("frame_{index:06}.jpg")
}

/// Extracts `indices` from the video at `video_path` at native resolution.
pub fn extract_frames(video_path: &Path, indices: &[u64], output_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut source = FfmpegSource::open_native(video_path)?;
    extract_from_source(&mut source, indices, output_dir)
}

/// Extracts `indices` from an already opened source.
pub fn extract_from_source<S: FrameSource + ?Sized>(
    source: &mut S,
    indices: &[u64],
    output_dir: &Path,
) -> CoreResult<Vec<PathBuf>> {
    let mut wanted: BTreeSet<u64> = indices.iter().copied().collect();
    let mut written = Vec::with_capacity(wanted.len());
    if wanted.is_empty() {
        return Ok(written);
    }

    std::fs::create_dir_all(output_dir)?;
    log::debug!(
        "Extracting {} frame(s) to {}",
        wanted.len(),
        output_dir.display()
    );

    while !wanted.is_empty() {
        let Some(frame) = source.next_frame()? else {
            break;
        };
        if !wanted.remove(&frame.index()) {
            continue;
        }
        let path = output_dir.join(frame_file_name(frame.index()));
        frame.image().save_with_format(&path, ImageFormat::Jpeg)?;
        log::trace!("Wrote {}", path.display());
        written.push(path);
    }

    if !wanted.is_empty() {
        log::warn!(
            "Skipped {} frame index(es) beyond the end of the video: {:?}",
            wanted.len(),
            wanted
        );
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use image::{Rgb, RgbImage};

    fn source(n: u8) -> MemorySource {
        let frames = (0..n)
            .map(|i| RgbImage::from_pixel(8, 8, Rgb([i * 10, 0, 0])))
            .collect();
        MemorySource::new(frames).unwrap()
    }

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name(7), "frame_000007.jpg");
        assert_eq!(frame_file_name(1234567), "frame_1234567.jpg");
    }

    #[test]
    fn test_extracts_requested_frames_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frames");
        let written = extract_from_source(&mut source(6), &[4, 1, 4], &out).unwrap();

        assert_eq!(
            written,
            vec![out.join("frame_000001.jpg"), out.join("frame_000004.jpg")]
        );
        for path in &written {
            let image = image::open(path).unwrap();
            assert_eq!(image.width(), crate::config::WORKING_WIDTH);
        }
    }

    #[test]
    fn test_out_of_range_indices_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let written = extract_from_source(&mut source(3), &[2, 10, 99], dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("frame_000002.jpg")]);
    }

    #[test]
    fn test_nothing_requested_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("unused");
        assert!(extract_from_source(&mut source(3), &[], &out).unwrap().is_empty());
        assert!(!out.exists());
    }
}
