//! Audio core — WAV decoding and the streaming loudness envelope.
//!
//! # Pipeline
//!
//! ```text
//! byte buffer → wav::decode → PcmClip → EnvelopeTracker::advance(dt)
//!                                             │
//!                                             ▼
//!                                  loudness in [0.0, 1.0]
//! ```
//!
//! The decoder is a pure function; the tracker is the only stateful piece,
//! holding one clip, a sample cursor, and a virtual playback clock.  Neither
//! touches the network — the asynchronous fetch + install dance lives in
//! [`crate::pipeline`].
//!
//! # Quick start
//!
//! ```rust
//! use lipsync::audio::{wav, EnvelopeTracker};
//!
//! # fn wav_bytes() -> Vec<u8> {
//! #     let mut buf = Vec::new();
//! #     buf.extend_from_slice(b"RIFF");
//! #     buf.extend_from_slice(&36u32.to_le_bytes());
//! #     buf.extend_from_slice(b"WAVE");
//! #     buf.extend_from_slice(b"fmt ");
//! #     buf.extend_from_slice(&16u32.to_le_bytes());
//! #     buf.extend_from_slice(&1u16.to_le_bytes());
//! #     buf.extend_from_slice(&1u16.to_le_bytes());
//! #     buf.extend_from_slice(&8_000u32.to_le_bytes());
//! #     buf.extend_from_slice(&16_000u32.to_le_bytes());
//! #     buf.extend_from_slice(&2u16.to_le_bytes());
//! #     buf.extend_from_slice(&16u16.to_le_bytes());
//! #     buf.extend_from_slice(b"data");
//! #     buf.extend_from_slice(&8u32.to_le_bytes());
//! #     buf.extend_from_slice(&[0u8; 8]);
//! #     buf
//! # }
//! let clip = wav::decode(&wav_bytes()).expect("valid PCM WAV");
//!
//! let mut tracker = EnvelopeTracker::new();
//! tracker.attach(clip);
//! let loudness = tracker.advance(1.0 / 60.0); // once per render frame
//! assert!(loudness >= 0.0);
//! ```

pub mod envelope;
pub mod pcm;
pub mod wav;

pub use envelope::EnvelopeTracker;
pub use pcm::PcmClip;
pub use wav::WavError;
