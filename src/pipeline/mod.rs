//! Lip-sync pipeline — fetch → decode → envelope → mouth parameter.
//!
//! This module wires the audio core to its asynchronous collaborators and
//! exposes the per-voice surface the render loop talks to.
//!
//! # Architecture
//!
//! ```text
//! LipSyncPlayer::start(locator)
//!        │
//!        ├─ reset tracker to silence, bump generation   (synchronous)
//!        │
//!        └─ tokio::spawn ─▶ fetcher.fetch(locator)
//!                               └─▶ wav::decode
//!                                     └─▶ install clip iff generation
//!                                         still current (stale → dropped)
//!
//! render loop, once per frame:
//!     MouthDriver::update(&player, &mut avatar, dt)
//!        └─▶ player.advance(dt) → loudness → avatar.set_mouth_open(…)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lipsync::config::LipSyncConfig;
//! use lipsync::fetch::HttpFetcher;
//! use lipsync::pipeline::{LipSyncPlayer, MouthDriver, MouthTarget};
//!
//! struct Avatar { mouth_open: f32 }
//! impl MouthTarget for Avatar {
//!     fn set_mouth_open(&mut self, value: f32) { self.mouth_open = value; }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = LipSyncConfig::load().unwrap();
//!     let player = LipSyncPlayer::new(Arc::new(HttpFetcher::from_config(&config.fetch)));
//!     let driver = MouthDriver::from_config(&config.envelope);
//!     let mut avatar = Avatar { mouth_open: 0.0 };
//!
//!     player.start("https://example.com/voice/greeting.wav");
//!     loop {
//!         driver.update(&player, &mut avatar, 1.0 / 60.0);
//!         // … render the avatar, wait for next frame …
//!         # break;
//!     }
//! }
//! ```

pub mod lipsync;
pub mod mouth;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use lipsync::LipSyncPlayer;
pub use mouth::{MouthDriver, MouthTarget};
