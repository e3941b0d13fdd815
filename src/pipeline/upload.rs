//! Upload validation and on-disk storage.

use crate::core::constants::UPLOAD_URL_PREFIX;
use crate::core::errors::{DiagnosisError, DiagnosisResult};
use chrono::Utc;
use image::ImageFormat;
use rand::Rng;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Decides which uploads are accepted.
///
/// Only JPEG and PNG content is allowed. The format is sniffed from the
/// leading bytes, the client's file name and MIME type are not trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    max_bytes: usize,
}

impl UploadPolicy {
    /// Creates a policy accepting uploads up to `max_bytes`.
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Largest accepted upload.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Checks an upload and returns its detected format.
    ///
    /// # Errors
    ///
    /// [`DiagnosisError::UploadRejected`] for empty, oversized or non
    /// JPEG/PNG uploads.
    pub fn check(&self, bytes: &[u8]) -> DiagnosisResult<ImageFormat> {
        let verdict = if bytes.is_empty() {
            Err(DiagnosisError::upload_rejected("No image file uploaded"))
        } else if bytes.len() > self.max_bytes {
            Err(DiagnosisError::upload_too_large(self.max_bytes, bytes.len()))
        } else {
            match image::guess_format(bytes) {
                Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => Ok(format),
                _ => Err(DiagnosisError::upload_rejected(
                    "Only JPEG and PNG images are allowed",
                )),
            }
        };
        if let Err(e) = &verdict {
            warn!(size = bytes.len(), error = %e, "Upload rejected");
        }
        verdict
    }
}

/// An upload written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Where the file lives on disk.
    pub path: PathBuf,
    /// Generated file name.
    pub file_name: String,
    /// Reference served back to clients, e.g. `/uploads/1700000000000-42.png`.
    pub reference: String,
}

/// Writes accepted uploads under unique names.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Creates a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory uploads are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` under a fresh `<unix-millis>-<random>.<ext>` name.
    ///
    /// The client's extension is kept when it matches the detected format,
    /// otherwise the format's canonical extension is used.
    pub fn save(
        &self,
        original_name: &str,
        format: ImageFormat,
        bytes: &[u8],
    ) -> DiagnosisResult<StoredUpload> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| DiagnosisError::persistence("failed to create upload directory", e))?;

        let extension = upload_extension(original_name, format);
        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
        let file_name = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            suffix,
            extension
        );
        let path = self.dir.join(&file_name);
        self.write_new(&path, bytes)?;
        debug!(path = %path.display(), size = bytes.len(), "Stored upload");

        Ok(StoredUpload {
            reference: format!("{UPLOAD_URL_PREFIX}/{file_name}"),
            path,
            file_name,
        })
    }

    /// Writes into a staging file next to `path` and moves it into place.
    ///
    /// The staging file is deleted on any failure, so an interrupted write
    /// leaves nothing behind. An existing file at `path` is never replaced.
    fn write_new(&self, path: &Path, bytes: &[u8]) -> DiagnosisResult<()> {
        let mut staged = NamedTempFile::new_in(&self.dir)
            .map_err(|e| DiagnosisError::persistence("failed to stage upload", e))?;
        staged
            .write_all(bytes)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| DiagnosisError::persistence("failed to write upload", e))?;
        staged
            .persist_noclobber(path)
            .map_err(|e| DiagnosisError::persistence("failed to move upload into place", e.error))?;
        Ok(())
    }

    /// Deletes a stored upload. Missing files are ignored.
    pub fn remove(&self, upload: &StoredUpload) {
        match fs::remove_file(&upload.path) {
            Ok(()) => debug!(path = %upload.path.display(), "Removed upload after failure"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %upload.path.display(),
                error = %e,
                "Failed to remove upload"
            ),
        }
    }
}

fn upload_extension(original_name: &str, format: ImageFormat) -> String {
    let allowed = format.extensions_str();
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| allowed.iter().any(|known| *known == ext.as_str()))
        .or_else(|| allowed.first().map(|ext| ext.to_string()))
        .unwrap_or_else(|| "img".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::io::Cursor;

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(2, 2))
            .write_to(&mut buf, format)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_accepts_jpeg_and_png() {
        let policy = UploadPolicy::new(1 << 20);
        assert_eq!(policy.check(&encoded(ImageFormat::Png)).unwrap(), ImageFormat::Png);
        assert_eq!(policy.check(&encoded(ImageFormat::Jpeg)).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_rejects_other_formats() {
        let policy = UploadPolicy::new(1 << 20);
        let err = policy.check(&encoded(ImageFormat::Bmp)).unwrap_err();
        assert!(matches!(err, DiagnosisError::UploadRejected { .. }));
        assert!(policy.check(b"plain text").is_err());
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        let png = encoded(ImageFormat::Png);
        assert!(UploadPolicy::new(1 << 20).check(&[]).is_err());
        let err = UploadPolicy::new(png.len() - 1).check(&png).unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert!(UploadPolicy::new(png.len()).check(&png).is_ok());
    }

    #[test]
    fn test_save_writes_unique_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("nested"));
        let png = encoded(ImageFormat::Png);

        let first = store.save("leaf.PNG", ImageFormat::Png, &png).unwrap();
        let second = store.save("leaf.png", ImageFormat::Png, &png).unwrap();

        assert_ne!(first.file_name, second.file_name);
        assert!(first.file_name.ends_with(".png"));
        assert_eq!(first.reference, format!("/uploads/{}", first.file_name));
        assert_eq!(fs::read(&first.path).unwrap(), png);
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        let taken = dir.path().join("taken.png");
        fs::write(&taken, b"earlier upload").unwrap();

        let err = store.write_new(&taken, &encoded(ImageFormat::Png)).unwrap_err();

        assert!(err.to_string().contains("failed to move upload into place"));
        assert_eq!(fs::read(&taken).unwrap(), b"earlier upload");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_mismatched_extension_is_replaced() {
        assert_eq!(upload_extension("leaf.exe", ImageFormat::Png), "png");
        assert_eq!(upload_extension("leaf", ImageFormat::Jpeg), "jpg");
        assert_eq!(upload_extension("leaf.jpeg", ImageFormat::Jpeg), "jpeg");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        let upload = store
            .save("a.png", ImageFormat::Png, &encoded(ImageFormat::Png))
            .unwrap();
        store.remove(&upload);
        assert!(!upload.path.exists());
        store.remove(&upload);
    }
}
