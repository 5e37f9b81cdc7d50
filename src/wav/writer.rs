//! Streaming WAV writer with a deferred header
//!
//! Samples append to the file as they are captured; the header slot stays
//! unwritten until `finalize` patches it with the real sizes. A recording
//! interrupted before finalize leaves a file with a zeroed header slot,
//! which the reader rejects rather than misplays.

use super::{WavHeader, HEADER_LEN};
use crate::error::WavError;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Incremental WAV output stream
pub struct WavStreamWriter {
    out: BufWriter<File>,
    sample_rate: u32,
}

impl WavStreamWriter {
    /// Create the output file and reserve space for the header.
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self, WavError> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        out.seek(SeekFrom::Start(HEADER_LEN as u64))?;
        Ok(Self { out, sample_rate })
    }

    /// Append a batch of mono samples to the data chunk.
    pub fn append_samples(&mut self, samples: &[i16]) -> Result<(), WavError> {
        for &sample in samples {
            self.out.write_all(&sample.to_le_bytes())?;
        }
        Ok(())
    }

    /// Seek back to the start, write the header computed from the final
    /// sample count, and close the stream. A zero-sample recording is
    /// valid: the file is the 44-byte header alone.
    pub fn finalize(mut self, total_samples: u64) -> Result<(), WavError> {
        let header = WavHeader::pcm_mono(self.sample_rate, total_samples);
        self.out.seek(SeekFrom::Start(0))?;
        self.out.write_all(&header.encode())?;
        self.out.flush()?;
        Ok(())
    }
}
