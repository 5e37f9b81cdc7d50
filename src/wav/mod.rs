//! Incremental WAV framing
//!
//! Recordings stream to storage before their length is known, so the writer
//! reserves the fixed 44-byte header up front and patches the two size
//! fields with a seek-back-and-rewrite once the stream ends. The reader
//! parses the same header and yields sample batches for playback.
//!
//! Layout is bit-exact PCM: "RIFF" <wav_size> "WAVE" "fmt " <16> <1 PCM>
//! <channels> <rate> <byte_rate> <block_align> <bits> "data" <data_bytes>,
//! then little-endian i16 mono samples.

pub mod reader;
pub mod writer;

pub use reader::WavStreamReader;
pub use writer::WavStreamWriter;

use crate::error::WavError;

/// Length of the fixed PCM header in bytes
pub const HEADER_LEN: usize = 44;

/// Bytes per stored sample (16-bit mono)
pub const BYTES_PER_SAMPLE: u32 = 2;

/// The fixed 44-byte WAV header.
///
/// `wav_size` and `data_bytes` are zero until the stream is finalized.
/// Invariants after finalize: `wav_size == data_bytes + 36` and
/// `data_bytes == 2 * sample_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub wav_size: u32,
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_bytes: u32,
}

impl WavHeader {
    /// Header for a finished mono 16-bit stream of `sample_count` samples.
    pub fn pcm_mono(sample_rate: u32, sample_count: u64) -> Self {
        // a single WAV cannot exceed the u32 size fields
        let data_bytes = (sample_count * BYTES_PER_SAMPLE as u64)
            .min((u32::MAX - 36) as u64) as u32;
        Self {
            wav_size: data_bytes + 36,
            audio_format: 1,
            num_channels: 1,
            sample_rate,
            byte_rate: sample_rate * BYTES_PER_SAMPLE,
            block_align: BYTES_PER_SAMPLE as u16,
            bits_per_sample: 16,
            data_bytes,
        }
    }

    /// Number of 16-bit samples the data chunk claims
    pub fn sample_count(&self) -> u64 {
        (self.data_bytes / BYTES_PER_SAMPLE) as u64
    }

    /// Serialize to the on-disk 44-byte layout
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(b"RIFF");
        buf[4..8].copy_from_slice(&self.wav_size.to_le_bytes());
        buf[8..12].copy_from_slice(b"WAVE");
        buf[12..16].copy_from_slice(b"fmt ");
        buf[16..20].copy_from_slice(&16u32.to_le_bytes());
        buf[20..22].copy_from_slice(&self.audio_format.to_le_bytes());
        buf[22..24].copy_from_slice(&self.num_channels.to_le_bytes());
        buf[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        buf[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        buf[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        buf[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        buf[36..40].copy_from_slice(b"data");
        buf[40..44].copy_from_slice(&self.data_bytes.to_le_bytes());
        buf
    }

    /// Parse the on-disk layout. Rejects structurally broken headers (bad
    /// chunk magic); format-field mismatches are the caller's concern.
    pub fn decode(buf: &[u8; HEADER_LEN]) -> Result<Self, WavError> {
        if &buf[0..4] != b"RIFF" {
            return Err(WavError::BadMagic { chunk: "RIFF" });
        }
        if &buf[8..12] != b"WAVE" {
            return Err(WavError::BadMagic { chunk: "WAVE" });
        }
        if &buf[12..16] != b"fmt " {
            return Err(WavError::BadMagic { chunk: "fmt " });
        }
        if &buf[36..40] != b"data" {
            return Err(WavError::BadMagic { chunk: "data" });
        }

        let u32_at = |i: usize| u32::from_le_bytes(buf[i..i + 4].try_into().unwrap());
        let u16_at = |i: usize| u16::from_le_bytes(buf[i..i + 2].try_into().unwrap());

        Ok(Self {
            wav_size: u32_at(4),
            audio_format: u16_at(20),
            num_channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            block_align: u16_at(32),
            bits_per_sample: u16_at(34),
            data_bytes: u32_at(40),
        })
    }
}
