//! Byte-fetch seam — how audio bytes reach the decoder.
//!
//! The lip-sync pipeline treats its audio source as an opaque asynchronous
//! byte producer: hand it a locator string, eventually get back either the
//! raw bytes or a failure.  Caching, retry and offline behaviour all live on
//! the other side of this seam.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            AudioFetcher (trait)              │
//! │                                             │
//! │   FileFetcher     tokio::fs::read           │
//! │   HttpFetcher     reqwest GET + timeout     │
//! │   MockFetcher     canned bytes (tests only) │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use lipsync::fetch::{AudioFetcher, FileFetcher};
//!
//! # async fn example() {
//! let fetcher = FileFetcher::new();
//! let bytes = fetcher.fetch("voice/greeting.wav").await.unwrap();
//! println!("fetched {} bytes", bytes.len());
//! # }
//! ```

pub mod file;
pub mod http;

use async_trait::async_trait;
use thiserror::Error;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use file::FileFetcher;
pub use http::HttpFetcher;

// test-only re-export so the pipeline test module can import MockFetcher
// without `use lipsync::fetch::mock::MockFetcher`.
#[cfg(test)]
pub use mock::MockFetcher;

// ---------------------------------------------------------------------------
// FetchError
// ---------------------------------------------------------------------------

/// Errors that can occur while fetching audio bytes.
///
/// The pipeline treats every variant the same way a decode failure is
/// treated — the tracker stays silent — so variants exist for logging, not
/// for control flow.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Filesystem read failed (missing file, permissions, …).
    #[error("file read failed: {0}")]
    Io(String),

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("fetch timed out")]
    Timeout,

    /// The server answered with a non-success status code.
    #[error("HTTP status {0}")]
    Status(u16),
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// AudioFetcher trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe asynchronous byte producer.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn AudioFetcher>` and called from a spawned tokio task.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Fetch the complete byte buffer behind `locator`.
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError>;
}

// Compile-time assertion: Box<dyn AudioFetcher> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn AudioFetcher>) {}
};

// ---------------------------------------------------------------------------
// MockFetcher (tests only)
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
