//! Recorder worker
//!
//! A long-lived worker that owns the capture side of the transport. While
//! idle it blocks on its start channel; a received path opens one recording
//! session: Idle → Calibrating → Active → Idle. The session streams
//! corrected samples into a WAV file until the continuation flag clears,
//! the sample cap is reached, or a capture read times out.

use crate::audio::AudioSource;
use crate::calibrate;
use crate::config::Config;
use crate::error::AudioError;
use crate::frame::{self, FrameGroup};
use crate::indicator::RecordIndicator;
use crate::wav::WavStreamWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Why an active session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// Continuation flag observed clear
    Stopped,
    /// Bounded-duration sample cap reached
    CapReached,
    /// Capture read timed out; fatal to the session, samples so far kept
    Timeout,
    /// Transport or storage error
    Failed,
}

/// Recorder worker state and buffers
pub struct Recorder {
    source: Box<dyn AudioSource>,
    indicator: Box<dyn RecordIndicator>,
    start_rx: Receiver<PathBuf>,
    keep_running: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
    /// Reused capture batch, one transport read's worth
    batch: Vec<FrameGroup>,
    /// Reused output batch of corrected samples
    corrected: Vec<i16>,
    sample_rate: u32,
    window_ms: u32,
    /// 0 = record until stopped
    max_samples: u64,
}

impl Recorder {
    pub fn new(
        config: &Config,
        source: Box<dyn AudioSource>,
        indicator: Box<dyn RecordIndicator>,
        start_rx: Receiver<PathBuf>,
        keep_running: Arc<AtomicBool>,
        active: Arc<AtomicBool>,
    ) -> Self {
        let frames_per_read = config.audio.frames_per_read.max(1);
        Self {
            source,
            indicator,
            start_rx,
            keep_running,
            active,
            batch: vec![FrameGroup::default(); frames_per_read],
            corrected: Vec::with_capacity(frames_per_read),
            sample_rate: config.audio.sample_rate,
            window_ms: config.calibration.window_ms,
            max_samples: config.recording.max_samples,
        }
    }

    /// Worker entry point: serve start signals until the channel closes.
    /// Session failures are logged, never fatal to the worker.
    pub fn run(mut self) {
        self.source.enable();
        while let Ok(path) = self.start_rx.recv() {
            self.keep_running.store(true, Ordering::SeqCst);
            self.active.store(true, Ordering::SeqCst);
            if let Err(e) = self.record_session(&path) {
                tracing::error!("recording session failed: {}", e);
            }
            self.active.store(false, Ordering::SeqCst);
        }
        self.source.disable();
        tracing::debug!("recorder worker shutting down");
    }

    fn record_session(&mut self, path: &Path) -> crate::Result<()> {
        tracing::info!("opening {} for recording", path.display());
        let mut writer = WavStreamWriter::create(path, self.sample_rate)?;

        let bias = match calibrate::compute_bias(
            self.source.as_mut(),
            &mut self.batch,
            self.sample_rate,
            self.window_ms,
        ) {
            Ok(bias) => bias,
            Err(e) => {
                // keep the file well formed even when calibration dies
                writer.finalize(0)?;
                return Err(e.into());
            }
        };
        tracing::info!(bias, "calibration complete, recording");
        self.indicator.set_active(true);

        let (total, end, result) = self.stream_capture(&mut writer, bias);

        self.indicator.set_active(false);
        writer.finalize(total)?;
        tracing::info!(samples = total, reason = ?end, "recording finished");
        result
    }

    /// The Active loop. Returns the accumulated sample count alongside the
    /// outcome so the caller can always finalize the stream.
    fn stream_capture(
        &mut self,
        writer: &mut WavStreamWriter,
        bias: i64,
    ) -> (u64, SessionEnd, crate::Result<()>) {
        let mut total: u64 = 0;
        loop {
            // stop is advisory: observed here, once per iteration
            if !self.keep_running.load(Ordering::SeqCst) {
                return (total, SessionEnd::Stopped, Ok(()));
            }
            if self.max_samples > 0 && total >= self.max_samples {
                return (total, SessionEnd::CapReached, Ok(()));
            }

            let want = if self.max_samples > 0 {
                self.batch.len().min((self.max_samples - total) as usize)
            } else {
                self.batch.len()
            };
            let got = match self.source.read_frames(&mut self.batch[..want]) {
                Ok(n) => n,
                Err(AudioError::Timeout) => {
                    tracing::warn!(samples = total, "capture read timed out, ending session");
                    return (total, SessionEnd::Timeout, Ok(()));
                }
                Err(e) => return (total, SessionEnd::Failed, Err(e.into())),
            };

            self.corrected.clear();
            self.corrected
                .extend(self.batch[..got].iter().map(|g| frame::correct(g.voice(), bias)));
            if let Err(e) = writer.append_samples(&self.corrected) {
                return (total, SessionEnd::Failed, Err(e.into()));
            }
            total += got as u64;
        }
    }
}
