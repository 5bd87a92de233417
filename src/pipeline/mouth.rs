//! Mouth parameter write-back.
//!
//! The rendering layer owns the avatar model and its shape parameters; the
//! lip-sync core only needs one capability from it — "set the mouth-open
//! value".  [`MouthTarget`] is that narrow seam, and [`MouthDriver`] is the
//! per-frame step that advances a player and writes the gain-scaled loudness
//! through it.  Any smoothing or damping of the value belongs to the
//! rendering layer, not here.

use crate::config::EnvelopeConfig;

use super::lipsync::LipSyncPlayer;

// ---------------------------------------------------------------------------
// MouthTarget
// ---------------------------------------------------------------------------

/// Capability interface the rendering layer implements to receive the
/// per-frame mouth-open value.
///
/// Object-safe, so the driver can hold `&mut dyn MouthTarget`.
pub trait MouthTarget {
    /// Write the mouth-open control value, already clamped to `[0.0, 1.0]`.
    fn set_mouth_open(&mut self, value: f32);
}

// Compile-time assertion: Box<dyn MouthTarget> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn MouthTarget>) {}
};

// ---------------------------------------------------------------------------
// MouthDriver
// ---------------------------------------------------------------------------

/// Per-frame glue between a [`LipSyncPlayer`] and a [`MouthTarget`].
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use lipsync::config::LipSyncConfig;
/// use lipsync::fetch::FileFetcher;
/// use lipsync::pipeline::{LipSyncPlayer, MouthDriver, MouthTarget};
///
/// struct Avatar { mouth_open: f32 }
/// impl MouthTarget for Avatar {
///     fn set_mouth_open(&mut self, value: f32) { self.mouth_open = value; }
/// }
///
/// # async fn example() {
/// let config = LipSyncConfig::default();
/// let player = LipSyncPlayer::new(Arc::new(FileFetcher::new()));
/// let driver = MouthDriver::from_config(&config.envelope);
/// let mut avatar = Avatar { mouth_open: 0.0 };
///
/// player.start("voice/greeting.wav");
/// // render loop, once per frame:
/// driver.update(&player, &mut avatar, 1.0 / 60.0);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MouthDriver {
    gain: f32,
}

impl MouthDriver {
    /// Driver with an explicit gain.
    pub fn new(gain: f32) -> Self {
        Self { gain }
    }

    /// Driver configured from [`EnvelopeConfig`].
    pub fn from_config(config: &EnvelopeConfig) -> Self {
        Self::new(config.gain)
    }

    /// Advance `player` by `dt` and write `clamp(loudness * gain, 0, 1)`
    /// into `target`.  Returns the written value.
    pub fn update(&self, player: &LipSyncPlayer, target: &mut dyn MouthTarget, dt: f64) -> f32 {
        let value = (player.advance(dt) * self.gain).clamp(0.0, 1.0);
        target.set_mouth_open(value);
        value
    }
}

impl Default for MouthDriver {
    fn default() -> Self {
        Self::from_config(&EnvelopeConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::fetch::MockFetcher;

    use super::*;

    struct RecordingTarget {
        last: Option<f32>,
    }

    impl MouthTarget for RecordingTarget {
        fn set_mouth_open(&mut self, value: f32) {
            self.last = Some(value);
        }
    }

    /// 1-second 8 kHz mono 16-bit WAV of a constant amplitude.
    fn constant_wav(amplitude: f32) -> Vec<u8> {
        let sample = (amplitude * 32_767.0) as i16;
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + 16_000u32).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&8_000u32.to_le_bytes());
        buf.extend_from_slice(&16_000u32.to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&16_000u32.to_le_bytes());
        for _ in 0..8_000 {
            buf.extend_from_slice(&sample.to_le_bytes());
        }
        buf
    }

    #[tokio::test]
    async fn writes_gain_scaled_loudness() {
        let player = LipSyncPlayer::new(Arc::new(MockFetcher::ok(constant_wav(0.3))));
        player.start("clip.wav").await.unwrap();

        let driver = MouthDriver::new(2.0);
        let mut target = RecordingTarget { last: None };

        let written = driver.update(&player, &mut target, 0.5);
        assert!((written - 0.6).abs() < 1e-3, "written = {written}");
        assert_eq!(target.last, Some(written));
    }

    #[tokio::test]
    async fn output_clamped_to_unit_range() {
        let player = LipSyncPlayer::new(Arc::new(MockFetcher::ok(constant_wav(0.9))));
        player.start("clip.wav").await.unwrap();

        let driver = MouthDriver::new(5.0); // 0.9 * 5 would overshoot badly
        let mut target = RecordingTarget { last: None };

        let written = driver.update(&player, &mut target, 0.5);
        assert_eq!(written, 1.0);
        assert_eq!(target.last, Some(1.0));
    }

    #[tokio::test]
    async fn silent_player_writes_zero() {
        let player = LipSyncPlayer::new(Arc::new(MockFetcher::failing()));
        player.start("clip.wav").await.unwrap();

        let driver = MouthDriver::default();
        let mut target = RecordingTarget { last: None };

        assert_eq!(driver.update(&player, &mut target, 0.5), 0.0);
        assert_eq!(target.last, Some(0.0));
    }

    #[test]
    fn default_gain_matches_config() {
        let driver = MouthDriver::default();
        assert_eq!(driver.gain, EnvelopeConfig::default().gain);
    }
}
