//! Streaming WAV reader
//!
//! Parses the 44-byte header on open and yields sample batches until the
//! data chunk is exhausted. Structurally broken headers are rejected;
//! unexpected format fields are logged and played anyway, leaving the
//! decision to the listener.

use super::{WavHeader, HEADER_LEN};
use crate::error::WavError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Incremental WAV input stream
pub struct WavStreamReader {
    input: BufReader<File>,
    header: WavHeader,
    /// Data-chunk bytes not yet consumed
    remaining_bytes: u64,
    scratch: Vec<u8>,
}

impl WavStreamReader {
    /// Open the file and parse its header.
    pub fn open(path: &Path) -> Result<Self, WavError> {
        let file = File::open(path)?;
        let mut input = BufReader::new(file);

        let mut raw = [0u8; HEADER_LEN];
        input.read_exact(&mut raw).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                WavError::TruncatedHeader
            } else {
                WavError::Io(e)
            }
        })?;
        let header = WavHeader::decode(&raw)?;

        if header.audio_format != 1 || header.num_channels != 1 || header.bits_per_sample != 16 {
            tracing::warn!(
                format = header.audio_format,
                channels = header.num_channels,
                bits = header.bits_per_sample,
                "unexpected WAV format fields, playing as 16-bit mono PCM anyway"
            );
        }

        Ok(Self {
            input,
            remaining_bytes: header.data_bytes as u64,
            header,
            scratch: Vec::new(),
        })
    }

    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    /// Fill `samples` from the data chunk; returns how many were read,
    /// possibly fewer than requested. Zero signals end of stream. A data
    /// chunk truncated on disk ends the stream early rather than erroring.
    pub fn read_samples(&mut self, samples: &mut [i16]) -> Result<usize, WavError> {
        let want_bytes = (samples.len() as u64 * 2).min(self.remaining_bytes) as usize;
        if want_bytes < 2 {
            return Ok(0);
        }

        if self.scratch.len() < want_bytes {
            self.scratch.resize(want_bytes, 0);
        }

        let mut filled = 0;
        while filled < want_bytes {
            let n = self.input.read(&mut self.scratch[filled..want_bytes])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        self.remaining_bytes -= filled as u64;

        // a trailing odd byte cannot form a sample and is dropped
        let whole = filled / 2;
        for (i, slot) in samples[..whole].iter_mut().enumerate() {
            *slot = i16::from_le_bytes([self.scratch[2 * i], self.scratch[2 * i + 1]]);
        }
        Ok(whole)
    }
}
