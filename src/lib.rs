//! Audio-driven lip-sync engine.
//!
//! Decodes WAV voice clips and turns them into a per-frame loudness envelope
//! that drives an avatar's mouth-open shape parameter.
//!
//! # Pipeline
//!
//! ```text
//! locator ─▶ AudioFetcher (file / HTTP) ─▶ wav::decode ─▶ PcmClip
//!                                                           │
//! render loop ─▶ LipSyncPlayer::advance(dt) ─▶ EnvelopeTracker (RMS)
//!                       │
//!                       ▼
//!            MouthDriver ─▶ MouthTarget::set_mouth_open(loudness)
//! ```
//!
//! # Design rules
//!
//! * A bad clip never breaks rendering: fetch and decode failures collapse
//!   to silence, logged at `warn` level.
//! * Only the latest [`LipSyncPlayer::start`] may populate the tracker —
//!   superseded loads are discarded by a generation check.
//! * No global state: configuration is an explicit
//!   [`LipSyncConfig`](config::LipSyncConfig) value passed into constructors.
//!
//! [`LipSyncPlayer::start`]: pipeline::LipSyncPlayer::start

pub mod audio;
pub mod config;
pub mod fetch;
pub mod pipeline;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use audio::{EnvelopeTracker, PcmClip, WavError};
pub use config::LipSyncConfig;
pub use fetch::{AudioFetcher, FetchError, FileFetcher, HttpFetcher};
pub use pipeline::{LipSyncPlayer, MouthDriver, MouthTarget};
