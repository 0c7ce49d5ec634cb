//! 连接配置临时落盘
//!
//! The sharing client reads profiles by path, so each request's profile is
//! written to its own uniquely named `.share` file for the duration of the
//! request and removed afterwards.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use common::errors::{AppError, AppResult};

/// Message returned when the caller sends no profile.
pub const NO_CONFIG_PROVIDED: &str = "No config file provided";

/// A profile written to a temporary file.
///
/// The file is deleted by [`ScopedProfile::release`], or on drop if the
/// request leaves early.
#[derive(Debug)]
pub struct ScopedProfile {
    file: NamedTempFile,
}

impl ScopedProfile {
    /// Writes `content` to a new temp file under `dir` (the OS temp dir when `None`).
    ///
    /// # Errors
    /// `AppError::Validation` for empty content, `AppError::Storage` when the
    /// file cannot be created or written.
    pub fn materialize(content: &[u8], dir: Option<&Path>) -> AppResult<Self> {
        if content.is_empty() {
            return Err(AppError::Validation(NO_CONFIG_PROVIDED.to_string()));
        }

        let mut builder = Builder::new();
        builder.prefix("profile-").suffix(".share");
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| AppError::Storage(format!("Failed to create temporary profile: {}", e)))?;

        file.write_all(content)
            .and_then(|_| file.flush())
            .map_err(|e| AppError::Storage(format!("Failed to write temporary profile: {}", e)))?;

        tracing::debug!(path = %file.path().display(), "profile materialized");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Path as text, for building table addresses.
    pub fn path_str(&self) -> String {
        self.file.path().to_string_lossy().into_owned()
    }

    /// Deletes the file, reporting failures.
    pub fn release(self) -> AppResult<()> {
        let path: PathBuf = self.file.path().to_path_buf();
        self.file.close().map_err(|e| {
            AppError::Storage(format!(
                "Failed to remove temporary profile {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!(path = %path.display(), "profile released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize_writes_content() {
        let profile = ScopedProfile::materialize(b"{\"endpoint\":\"x\"}", None).unwrap();
        let content = std::fs::read(profile.path()).unwrap();
        assert_eq!(content, b"{\"endpoint\":\"x\"}");
        assert_eq!(profile.path().extension().unwrap(), "share");
    }

    #[test]
    fn test_empty_content_is_rejected() {
        let err = ScopedProfile::materialize(b"", None).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == NO_CONFIG_PROVIDED));
    }

    #[test]
    fn test_release_deletes_file() {
        let profile = ScopedProfile::materialize(b"x", None).unwrap();
        let path = profile.path().to_path_buf();
        assert!(path.exists());
        profile.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_deletes_file() {
        let path = {
            let profile = ScopedProfile::materialize(b"x", None).unwrap();
            profile.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_paths_are_unique() {
        let a = ScopedProfile::materialize(b"a", None).unwrap();
        let b = ScopedProfile::materialize(b"b", None).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_custom_directory() {
        let dir = tempfile::tempdir().unwrap();
        let profile = ScopedProfile::materialize(b"x", Some(dir.path())).unwrap();
        assert_eq!(profile.path().parent().unwrap(), dir.path());
    }

    #[test]
    fn test_unwritable_directory_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = ScopedProfile::materialize(b"x", Some(&missing)).unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
