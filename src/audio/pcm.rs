//! Decoded PCM audio container.
//!
//! [`PcmClip`] is the immutable result of a successful WAV decode: the sample
//! rate, and one normalized `f32` sample vector per channel.  It is produced
//! once by [`crate::audio::wav::decode`] and then owned exclusively by a
//! single envelope tracker until that tracker loads a new clip.
//!
//! # Example
//!
//! ```rust
//! use lipsync::audio::PcmClip;
//!
//! // 1 second of mono silence at 8 kHz
//! let clip = PcmClip::new(8_000, vec![vec![0.0_f32; 8_000]]).unwrap();
//! assert_eq!(clip.frame_count(), 8_000);
//! assert!((clip.duration_secs() - 1.0).abs() < 1e-6);
//! ```

// ---------------------------------------------------------------------------
// PcmClip
// ---------------------------------------------------------------------------

/// Immutable decoded audio: sample rate plus per-channel normalized samples.
///
/// ## Invariants
///
/// * `sample_rate > 0`
/// * at least one channel
/// * every channel holds the same number of samples (`frame_count`)
/// * samples are normalized to `[-1.0, 1.0]`
///
/// The constructor enforces the first three; the WAV decoder guarantees the
/// normalization range.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmClip {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl PcmClip {
    /// Build a clip from raw per-channel samples.
    ///
    /// Returns `None` when `sample_rate == 0`, `channels` is empty, or the
    /// channel lengths differ.  A clip with zero frames is valid (an empty
    /// `data` chunk decodes to one).
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Option<Self> {
        if sample_rate == 0 || channels.is_empty() {
            return None;
        }
        let frames = channels[0].len();
        if channels.iter().any(|c| c.len() != frames) {
            return None;
        }
        Some(Self {
            sample_rate,
            channels,
        })
    }

    /// Samples per second.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels (≥ 1).
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    /// All channels, each an equal-length normalized sample vector.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Clip duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_mono_clip() {
        let clip = PcmClip::new(16_000, vec![vec![0.1, -0.1, 0.5]]).unwrap();
        assert_eq!(clip.sample_rate(), 16_000);
        assert_eq!(clip.channel_count(), 1);
        assert_eq!(clip.frame_count(), 3);
    }

    #[test]
    fn valid_stereo_clip() {
        let clip = PcmClip::new(44_100, vec![vec![0.0; 10], vec![0.0; 10]]).unwrap();
        assert_eq!(clip.channel_count(), 2);
        assert_eq!(clip.frame_count(), 10);
    }

    #[test]
    fn zero_frames_is_valid() {
        let clip = PcmClip::new(8_000, vec![Vec::new()]).unwrap();
        assert_eq!(clip.frame_count(), 0);
        assert_eq!(clip.duration_secs(), 0.0);
    }

    #[test]
    fn zero_sample_rate_rejected() {
        assert!(PcmClip::new(0, vec![vec![0.0]]).is_none());
    }

    #[test]
    fn no_channels_rejected() {
        assert!(PcmClip::new(8_000, Vec::new()).is_none());
    }

    #[test]
    fn mismatched_channel_lengths_rejected() {
        assert!(PcmClip::new(8_000, vec![vec![0.0; 4], vec![0.0; 5]]).is_none());
    }

    #[test]
    fn duration_calculation() {
        let clip = PcmClip::new(8_000, vec![vec![0.0; 4_000]]).unwrap();
        assert!((clip.duration_secs() - 0.5).abs() < 1e-9);
    }
}
