//! Clock-synchronized loudness envelope over a decoded clip.
//!
//! [`EnvelopeTracker`] owns one [`PcmClip`] and a virtual playback clock.
//! Each frame the render loop calls [`advance`](EnvelopeTracker::advance)
//! with the elapsed wall time; the tracker maps the clock to a sample index
//! and computes the RMS of exactly the newly-elapsed sample window, pooled
//! across all channels.  The result drives the avatar's mouth-open parameter.
//!
//! ## Hold-last-value policy
//!
//! When a frame elapses without crossing a new sample boundary (very high
//! frame rates, or `dt == 0`), the previous RMS is returned unchanged — the
//! envelope holds rather than decaying toward zero.  Once the cursor reaches
//! the end of the clip the tracker stays on the final window's value forever;
//! "the mouth stops moving after the audio ends" needs no external stop
//! signal.
//!
//! # Example
//!
//! ```rust
//! use lipsync::audio::{EnvelopeTracker, PcmClip};
//!
//! let clip = PcmClip::new(8_000, vec![vec![0.5_f32; 8_000]]).unwrap();
//! let mut tracker = EnvelopeTracker::new();
//! tracker.attach(clip);
//!
//! // Half a second elapses → RMS of the first 4 000 samples.
//! let value = tracker.advance(0.5);
//! assert!((value - 0.5).abs() < 1e-4);
//! assert_eq!(tracker.current(), value);
//! ```

use super::pcm::PcmClip;

// ---------------------------------------------------------------------------
// EnvelopeTracker
// ---------------------------------------------------------------------------

/// Streaming RMS envelope over one decoded clip.
///
/// One tracker per concurrently-playing voice; the attached clip is owned
/// exclusively and replaced wholesale by the next [`attach`](Self::attach).
///
/// ## Invariants
///
/// * `sample_cursor` is monotonic non-decreasing within one attach and never
///   exceeds the clip's frame count.
/// * `last_value` stays in `[0.0, 1.0]` (samples are normalized, so a pooled
///   RMS cannot exceed 1).
#[derive(Debug, Default)]
pub struct EnvelopeTracker {
    clip: Option<PcmClip>,
    /// Index of the next unconsumed sample.
    sample_cursor: usize,
    /// Virtual playback clock in seconds, reset on every attach.
    elapsed_secs: f64,
    /// Most recently computed RMS; held across idle frames.
    last_value: f32,
}

impl EnvelopeTracker {
    /// Create an empty tracker that reports silence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new clip, discarding the previous one, and rewind the
    /// cursor, clock and cached value to zero.
    pub fn attach(&mut self, clip: PcmClip) {
        log::debug!(
            "envelope: attached clip ({} frames @ {} Hz, {} ch)",
            clip.frame_count(),
            clip.sample_rate(),
            clip.channel_count()
        );
        self.clip = Some(clip);
        self.reset();
    }

    /// Drop the current clip; the tracker reports silence afterwards.
    pub fn detach(&mut self) {
        self.clip = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.sample_cursor = 0;
        self.elapsed_secs = 0.0;
        self.last_value = 0.0;
    }

    /// Returns `true` while a clip is attached.
    pub fn has_clip(&self) -> bool {
        self.clip.is_some()
    }

    /// Index of the next unconsumed sample (for diagnostics and tests).
    pub fn sample_cursor(&self) -> usize {
        self.sample_cursor
    }

    /// Returns `true` once the cursor has consumed the entire attached clip
    /// (the terminal steady state).  `false` while no clip is attached.
    pub fn is_finished(&self) -> bool {
        self.clip
            .as_ref()
            .is_some_and(|c| self.sample_cursor >= c.frame_count())
    }

    /// Advance the virtual clock by `dt` seconds and return the loudness.
    ///
    /// * No clip attached (or an empty clip) → `0.0`; the clock does not run.
    /// * No new samples elapsed → the previous value, unchanged.
    /// * Otherwise → pooled RMS of the newly-elapsed window, cached for
    ///   subsequent reads.
    ///
    /// A negative `dt` is treated as `0.0` so a misbehaving driver cannot
    /// rewind the clock.
    pub fn advance(&mut self, dt: f64) -> f32 {
        let Some(clip) = &self.clip else {
            self.last_value = 0.0;
            return 0.0;
        };

        let frame_count = clip.frame_count();
        if frame_count == 0 {
            self.last_value = 0.0;
            return 0.0;
        }

        self.elapsed_secs += dt.max(0.0);

        let target = ((self.elapsed_secs * clip.sample_rate() as f64) as usize).min(frame_count);
        if target <= self.sample_cursor {
            // Idle frame: hold the last computed value.
            return self.last_value;
        }

        self.last_value = pooled_rms(clip, self.sample_cursor, target);
        self.sample_cursor = target;
        self.last_value
    }

    /// Most recently computed loudness, without advancing the clock.
    pub fn current(&self) -> f32 {
        self.last_value
    }
}

/// RMS over the half-open sample window `[from, to)`, all channels pooled
/// with equal weight.
fn pooled_rms(clip: &PcmClip, from: usize, to: usize) -> f32 {
    let mut sum_sq = 0.0_f64;
    for channel in clip.channels() {
        for &s in &channel[from..to] {
            sum_sq += f64::from(s) * f64::from(s);
        }
    }
    let pooled = (to - from) * clip.channel_count();
    (sum_sq / pooled as f64).sqrt() as f32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_clip(rate: u32, secs: f64, value: f32) -> PcmClip {
        let n = (rate as f64 * secs) as usize;
        PcmClip::new(rate, vec![vec![value; n]]).unwrap()
    }

    // ---- Empty / detached state -------------------------------------------

    #[test]
    fn no_clip_reports_silence() {
        let mut t = EnvelopeTracker::new();
        assert_eq!(t.advance(0.1), 0.0);
        assert_eq!(t.advance(10.0), 0.0);
        assert_eq!(t.current(), 0.0);
    }

    #[test]
    fn empty_clip_reports_silence() {
        let mut t = EnvelopeTracker::new();
        t.attach(PcmClip::new(8_000, vec![Vec::new()]).unwrap());
        assert_eq!(t.advance(1.0), 0.0);
        assert_eq!(t.sample_cursor(), 0);
    }

    #[test]
    fn detach_returns_to_silence() {
        let mut t = EnvelopeTracker::new();
        t.attach(constant_clip(8_000, 1.0, 0.5));
        assert!(t.advance(0.5) > 0.0);

        t.detach();
        assert_eq!(t.current(), 0.0);
        assert_eq!(t.advance(0.5), 0.0);
    }

    // ---- Known-signal RMS --------------------------------------------------

    #[test]
    fn silent_clip_rms_is_zero() {
        let mut t = EnvelopeTracker::new();
        t.attach(constant_clip(8_000, 1.0, 0.0));
        assert_eq!(t.advance(0.25), 0.0);
        assert_eq!(t.advance(0.25), 0.0);
    }

    #[test]
    fn constant_clip_rms_equals_amplitude() {
        let mut t = EnvelopeTracker::new();
        t.attach(constant_clip(8_000, 1.0, 0.3));
        let v = t.advance(0.5);
        assert!((v - 0.3).abs() < 1e-5, "rms = {v}");
    }

    #[test]
    fn alternating_full_scale_rms_is_one() {
        let samples: Vec<f32> = (0..8_000).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let mut t = EnvelopeTracker::new();
        t.attach(PcmClip::new(8_000, vec![samples]).unwrap());
        let v = t.advance(1.0);
        assert!((v - 1.0).abs() < 1e-5, "rms = {v}");
    }

    #[test]
    fn stereo_channels_pool_equally() {
        // One loud channel, one silent: pooled mean square is half the loud
        // channel's, so RMS = 0.8 / sqrt(2).
        let loud = vec![0.8_f32; 8_000];
        let quiet = vec![0.0_f32; 8_000];
        let mut t = EnvelopeTracker::new();
        t.attach(PcmClip::new(8_000, vec![loud, quiet]).unwrap());

        let v = t.advance(1.0);
        let expected = 0.8 / 2.0_f32.sqrt();
        assert!((v - expected).abs() < 1e-5, "rms = {v}, expected {expected}");
    }

    // ---- Windowing ---------------------------------------------------------

    #[test]
    fn windows_are_computed_incrementally() {
        // First half loud, second half silent.
        let mut samples = vec![0.6_f32; 4_000];
        samples.extend(vec![0.0_f32; 4_000]);
        let mut t = EnvelopeTracker::new();
        t.attach(PcmClip::new(8_000, vec![samples]).unwrap());

        let first = t.advance(0.5);
        assert!((first - 0.6).abs() < 1e-5);
        assert_eq!(t.sample_cursor(), 4_000);

        let second = t.advance(0.5);
        assert!(second.abs() < 1e-6, "second window should be silent: {second}");
        assert_eq!(t.sample_cursor(), 8_000);
    }

    #[test]
    fn cursor_is_monotonic_and_bounded() {
        let mut t = EnvelopeTracker::new();
        t.attach(constant_clip(8_000, 0.5, 0.4));

        let mut prev = 0;
        for dt in [0.0, 0.016, 0.0, 0.1, 0.3, 1.0, 0.016, 5.0] {
            t.advance(dt);
            let cursor = t.sample_cursor();
            assert!(cursor >= prev, "cursor went backwards: {prev} → {cursor}");
            assert!(cursor <= 4_000);
            prev = cursor;
        }
        assert_eq!(prev, 4_000);
    }

    #[test]
    fn negative_dt_is_clamped() {
        let mut t = EnvelopeTracker::new();
        t.attach(constant_clip(8_000, 1.0, 0.5));

        let v = t.advance(0.25);
        let cursor = t.sample_cursor();
        // Negative dt must not rewind the clock or change the value.
        assert_eq!(t.advance(-1.0), v);
        assert_eq!(t.sample_cursor(), cursor);
    }

    // ---- Hold-last-value policy -------------------------------------------

    #[test]
    fn zero_dt_holds_last_value() {
        let mut t = EnvelopeTracker::new();
        t.attach(constant_clip(8_000, 1.0, 0.7));

        let v = t.advance(0.25);
        assert!((v - 0.7).abs() < 1e-5);
        assert_eq!(t.advance(0.0), v);
        assert_eq!(t.advance(0.0), v);
        assert_eq!(t.current(), v);
    }

    #[test]
    fn sub_sample_dt_holds_last_value() {
        // At 10 Hz a 0.01 s frame does not cross a sample boundary.
        let mut t = EnvelopeTracker::new();
        t.attach(PcmClip::new(10, vec![vec![0.5; 10]]).unwrap());

        let v = t.advance(0.15); // crosses sample 0 → cursor 1
        assert_eq!(t.advance(0.01), v);
        assert_eq!(t.advance(0.01), v);
        // Accumulated clock eventually crosses the next boundary.
        let later = t.advance(0.1);
        assert!((later - 0.5).abs() < 1e-5);
    }

    // ---- Terminal steady state --------------------------------------------

    #[test]
    fn holds_final_value_past_end_of_clip() {
        let mut t = EnvelopeTracker::new();
        t.attach(constant_clip(8_000, 0.5, 0.4));

        assert!(!t.is_finished());
        let terminal = t.advance(2.0); // clock runs well past the end
        assert!((terminal - 0.4).abs() < 1e-5);
        assert_eq!(t.sample_cursor(), 4_000);
        assert!(t.is_finished());

        for _ in 0..10 {
            assert_eq!(t.advance(1.0), terminal);
            assert_eq!(t.sample_cursor(), 4_000);
        }
    }

    #[test]
    fn reattach_rewinds_everything() {
        let mut t = EnvelopeTracker::new();
        t.attach(constant_clip(8_000, 0.5, 0.4));
        t.advance(1.0);
        assert_eq!(t.sample_cursor(), 4_000);

        t.attach(constant_clip(8_000, 1.0, 0.2));
        assert_eq!(t.sample_cursor(), 0);
        assert_eq!(t.current(), 0.0);
        let v = t.advance(0.5);
        assert!((v - 0.2).abs() < 1e-5);
    }

    // ---- Value range -------------------------------------------------------

    #[test]
    fn value_stays_in_unit_range() {
        let samples: Vec<f32> = (0..8_000).map(|i| ((i as f32) * 0.01).sin()).collect();
        let mut t = EnvelopeTracker::new();
        t.attach(PcmClip::new(8_000, vec![samples]).unwrap());

        let mut elapsed = 0.0;
        while elapsed < 1.2 {
            let v = t.advance(0.016);
            assert!((0.0..=1.0).contains(&v), "value out of range: {v}");
            elapsed += 0.016;
        }
    }
}
