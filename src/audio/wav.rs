//! Minimal WAV (RIFF) decoder for linear PCM.
//!
//! [`decode`] turns a raw byte buffer into a [`PcmClip`] — or reports that
//! the buffer is not a supported WAV stream.  Only uncompressed PCM at
//! 8 / 16 / 24 / 32 bits per sample is accepted; that covers every voice
//! clip the lip-sync pipeline is expected to see.
//!
//! ## Robustness contract
//!
//! The decoder must survive arbitrary bytes without panicking: hostile or
//! truncated input yields a [`WavError`], never an index fault.  A `data`
//! chunk whose declared size runs past the end of the buffer is *truncated*
//! to the bytes that are actually present rather than rejected — partially
//! downloaded clips still produce usable audio.
//!
//! ## Duplicate chunks
//!
//! When a stream contains more than one `fmt ` or `data` chunk the **last**
//! one wins: the chunk walk is a single pass and each match overwrites the
//! previously recorded slot.
//!
//! # Example
//!
//! ```rust
//! use lipsync::audio::wav;
//!
//! // 12-byte RIFF/WAVE shell with no chunks — structurally valid container,
//! // but there is no fmt chunk to describe the audio.
//! let mut buf = Vec::new();
//! buf.extend_from_slice(b"RIFF");
//! buf.extend_from_slice(&4u32.to_le_bytes());
//! buf.extend_from_slice(b"WAVE");
//! assert!(wav::decode(&buf).is_err());
//! ```

use thiserror::Error;

use super::pcm::PcmClip;

// ---------------------------------------------------------------------------
// WavError
// ---------------------------------------------------------------------------

/// Reason a byte buffer failed to decode as PCM WAV.
///
/// Callers may log the variant for diagnostics but must not branch on it —
/// every variant means the same thing to the pipeline: no audio, stay silent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WavError {
    /// Buffer is shorter than the 12-byte RIFF/WAVE header.
    #[error("buffer too short for a RIFF header ({0} bytes)")]
    TooShort(usize),

    /// `RIFF` / `WAVE` magic tags are missing.
    #[error("not a RIFF/WAVE stream")]
    BadMagic,

    /// No usable `fmt ` chunk was found.
    #[error("missing fmt chunk")]
    MissingFmt,

    /// No `data` chunk was found.
    #[error("missing data chunk")]
    MissingData,

    /// Audio format code is not 1 (linear PCM).
    #[error("unsupported audio format code {0} (only PCM is supported)")]
    NotPcm(u16),

    /// Bits per sample is not 8, 16, 24 or 32.
    #[error("unsupported bit depth {0}")]
    UnsupportedBitDepth(u16),

    /// `fmt ` chunk declares zero channels.
    #[error("zero channels")]
    ZeroChannels,

    /// `fmt ` chunk declares a zero sample rate.
    #[error("zero sample rate")]
    ZeroSampleRate,
}

// ---------------------------------------------------------------------------
// fmt chunk fields
// ---------------------------------------------------------------------------

/// Fields read from a `fmt ` chunk payload.
#[derive(Debug, Clone, Copy)]
struct FmtChunk {
    format_code: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

/// Minimum `fmt ` payload: format(2) + channels(2) + rate(4) + byte-rate(4)
/// + block-align(2) + bits(2).
const FMT_MIN_LEN: usize = 16;

impl FmtChunk {
    /// Parse a `fmt ` payload.  Returns `None` when the payload is too short
    /// to hold the mandatory fields (the chunk is then treated as absent).
    fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < FMT_MIN_LEN {
            return None;
        }
        Some(Self {
            format_code: u16::from_le_bytes([payload[0], payload[1]]),
            channels: u16::from_le_bytes([payload[2], payload[3]]),
            sample_rate: u32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]),
            bits_per_sample: u16::from_le_bytes([payload[14], payload[15]]),
        })
    }
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

/// Decode a WAV byte buffer into a [`PcmClip`].
///
/// Walks the RIFF chunk list, extracts the last `fmt ` and `data` chunks,
/// and converts the interleaved integer samples into per-channel `f32`
/// vectors normalized (and clamped) to `[-1.0, 1.0]`.
///
/// # Errors
///
/// See [`WavError`].  No input can make this function panic.
pub fn decode(bytes: &[u8]) -> Result<PcmClip, WavError> {
    // ── 1. RIFF/WAVE header ──────────────────────────────────────────────
    if bytes.len() < 12 {
        return Err(WavError::TooShort(bytes.len()));
    }
    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(WavError::BadMagic);
    }

    // ── 2. Chunk walk (last fmt / data wins) ─────────────────────────────
    let mut fmt: Option<FmtChunk> = None;
    let mut data: Option<&[u8]> = None;

    let mut pos = 12usize;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let declared =
            u32::from_le_bytes([bytes[pos + 4], bytes[pos + 5], bytes[pos + 6], bytes[pos + 7]])
                as usize;

        // Clamp the payload to what the buffer actually holds — a declared
        // size past the end of the buffer truncates instead of failing.
        let start = pos + 8;
        let available = declared.min(bytes.len() - start);
        let payload = &bytes[start..start + available];

        match id {
            b"fmt " => {
                if let Some(f) = FmtChunk::parse(payload) {
                    fmt = Some(f);
                }
            }
            b"data" => data = Some(payload),
            _ => {}
        }

        // Chunk payloads are padded to an even byte boundary.
        let pad = declared % 2;
        pos = pos
            .saturating_add(8)
            .saturating_add(declared)
            .saturating_add(pad);
    }

    let fmt = fmt.ok_or(WavError::MissingFmt)?;
    let data = data.ok_or(WavError::MissingData)?;

    // ── 3. Format validation ─────────────────────────────────────────────
    if fmt.format_code != 1 {
        return Err(WavError::NotPcm(fmt.format_code));
    }
    if fmt.channels == 0 {
        return Err(WavError::ZeroChannels);
    }
    if fmt.sample_rate == 0 {
        return Err(WavError::ZeroSampleRate);
    }
    let bytes_per_sample = match fmt.bits_per_sample {
        8 | 16 | 24 | 32 => fmt.bits_per_sample as usize / 8,
        other => return Err(WavError::UnsupportedBitDepth(other)),
    };

    // ── 4. Interleaved sample decode ─────────────────────────────────────
    let channel_count = fmt.channels as usize;
    let frame_size = channel_count * bytes_per_sample;
    let frame_count = data.len() / frame_size;

    let mut channels: Vec<Vec<f32>> = (0..channel_count)
        .map(|_| Vec::with_capacity(frame_count))
        .collect();

    for frame in 0..frame_count {
        for (ch, out) in channels.iter_mut().enumerate() {
            let at = (frame * channel_count + ch) * bytes_per_sample;
            let sample = decode_sample(&data[at..at + bytes_per_sample]);
            out.push(sample.clamp(-1.0, 1.0));
        }
    }

    log::debug!(
        "wav: decoded {frame_count} frames, {channel_count} ch @ {} Hz, {} bit",
        fmt.sample_rate,
        fmt.bits_per_sample
    );

    // Invariants (rate > 0, ≥ 1 channel, equal lengths) are established
    // above, so the constructor cannot reject this.
    PcmClip::new(fmt.sample_rate, channels).ok_or(WavError::MissingData)
}

/// Convert one little-endian integer sample to a normalized `f32`.
///
/// 8-bit WAV is unsigned with a 128 offset; 16/24/32-bit are signed
/// two's-complement.
fn decode_sample(raw: &[u8]) -> f32 {
    match raw.len() {
        1 => (raw[0] as i16 - 128) as f32 / 128.0,
        2 => i16::from_le_bytes([raw[0], raw[1]]) as f32 / 32_768.0,
        3 => {
            let unsigned = raw[0] as i32 | (raw[1] as i32) << 8 | (raw[2] as i32) << 16;
            // Sign-extend from 24 bits.
            let signed = if unsigned & 0x80_0000 != 0 {
                unsigned - 0x100_0000
            } else {
                unsigned
            };
            signed as f32 / 8_388_608.0
        }
        4 => i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f32 / 2_147_483_648.0,
        _ => unreachable!("bytes_per_sample is validated to 1, 2, 3 or 4"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
