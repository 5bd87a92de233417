//! Filesystem-backed [`AudioFetcher`].
//!
//! [`FileFetcher`] reads the locator as a path via `tokio::fs`, optionally
//! resolved against a base directory.  This is the fetcher the demo binary
//! uses and the natural choice for bundled voice clips.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{AudioFetcher, FetchError};

// ---------------------------------------------------------------------------
// FileFetcher
// ---------------------------------------------------------------------------

/// Reads audio bytes from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    base_dir: Option<PathBuf>,
}

impl FileFetcher {
    /// Fetcher that resolves locators relative to the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher that resolves relative locators against `base_dir`.
    /// Absolute locators ignore the base.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }
}

#[async_trait]
impl AudioFetcher for FileFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let path = match &self.base_dir {
            Some(base) => base.join(locator),
            None => PathBuf::from(locator),
        };
        let bytes = tokio::fs::read(&path).await?;
        log::debug!("fetch: read {} bytes from {}", bytes.len(), path.display());
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_existing_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("clip.wav");
        std::fs::write(&path, b"RIFFxxxx").unwrap();

        let fetcher = FileFetcher::new();
        let bytes = fetcher.fetch(path.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"RIFFxxxx");
    }

    #[tokio::test]
    async fn resolves_against_base_dir() {
        let dir = tempdir().expect("temp dir");
        std::fs::write(dir.path().join("voice.wav"), b"data").unwrap();

        let fetcher = FileFetcher::with_base_dir(dir.path());
        let bytes = fetcher.fetch("voice.wav").await.unwrap();
        assert_eq!(bytes, b"data");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempdir().expect("temp dir");
        let fetcher = FileFetcher::with_base_dir(dir.path());
        let err = fetcher.fetch("no-such-clip.wav").await.unwrap_err();
        assert!(matches!(err, FetchError::Io(_)), "{err}");
    }
}
