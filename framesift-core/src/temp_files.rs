//! Temporary file management utilities.
//!
//! Uploaded video bytes are spooled into a named temporary file so that the
//! decoder can open them by path. The tempfile crate removes the file when
//! the handle is dropped, which covers success and every error path.

use std::io::Write;
use std::path::Path;

use tempfile::{Builder as TempFileBuilder, NamedTempFile};

use crate::error::CoreResult;

/// Prefix of spooled upload files.
pub const UPLOAD_PREFIX: &str = "framesift_upload";

/// Creates a temporary file with prefix and extension. Auto-deleted when dropped.
pub fn create_temp_file(dir: &Path, prefix: &str, extension: &str) -> CoreResult<NamedTempFile> {
    std::fs::create_dir_all(dir)?;
    let temp_file = TempFileBuilder::new()
        .prefix(&format!("{prefix}_"))
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)?;

    Ok(temp_file)
}

/// Writes `bytes` to a new temporary file in the system temp directory.
pub fn spool_video(bytes: &[u8]) -> CoreResult<NamedTempFile> {
    spool_video_in(&std::env::temp_dir(), bytes)
}

/// Writes `bytes` to a new temporary file in `dir`.
pub fn spool_video_in(dir: &Path, bytes: &[u8]) -> CoreResult<NamedTempFile> {
    let mut file = create_temp_file(dir, UPLOAD_PREFIX, "video")?;
    file.write_all(bytes)?;
    file.flush()?;
    log::debug!(
        "Spooled {} byte(s) of video to {}",
        bytes.len(),
        file.path().display()
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spooled_file_holds_bytes_and_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let file = spool_video_in(dir.path(), b"not really a video").unwrap();
        let path = file.path().to_path_buf();

        assert_eq!(std::fs::read(&path).unwrap(), b"not really a video");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(UPLOAD_PREFIX));
        assert!(name.ends_with(".video"));

        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_create_temp_file_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let file = create_temp_file(&nested, "probe", "mkv").unwrap();
        assert!(file.path().starts_with(&nested));
    }
}
