//! Player worker
//!
//! The render-side twin of the recorder: blocks on its start channel while
//! idle, and one received path opens one playback session, Idle → Active →
//! Idle. The session streams sample batches from a WAV file into the sink
//! until end of stream or the continuation flag clears.

use crate::audio::AudioSink;
use crate::config::Config;
use crate::error::AudioError;
use crate::frame::FrameGroup;
use crate::wav::WavStreamReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Player worker state and buffers
pub struct Player {
    sink: Box<dyn AudioSink>,
    start_rx: Receiver<PathBuf>,
    keep_running: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
    /// Reused sample batch, one transport write's worth
    samples: Vec<i16>,
    /// Reused rendered frame batch
    frames: Vec<FrameGroup>,
}

impl Player {
    pub fn new(
        config: &Config,
        sink: Box<dyn AudioSink>,
        start_rx: Receiver<PathBuf>,
        keep_running: Arc<AtomicBool>,
        active: Arc<AtomicBool>,
    ) -> Self {
        let frames_per_write = config.audio.frames_per_read.max(1);
        Self {
            sink,
            start_rx,
            keep_running,
            active,
            samples: vec![0i16; frames_per_write],
            frames: Vec::with_capacity(frames_per_write),
        }
    }

    /// Worker entry point: serve start signals until the channel closes.
    /// Session failures are logged, never fatal to the worker.
    pub fn run(mut self) {
        while let Ok(path) = self.start_rx.recv() {
            self.keep_running.store(true, Ordering::SeqCst);
            self.active.store(true, Ordering::SeqCst);
            if let Err(e) = self.play_session(&path) {
                tracing::error!("playback session failed: {}", e);
            }
            self.active.store(false, Ordering::SeqCst);
        }
        tracing::debug!("player worker shutting down");
    }

    fn play_session(&mut self, path: &Path) -> crate::Result<()> {
        tracing::info!("opening {} for playback", path.display());
        let mut reader = WavStreamReader::open(path)?;
        tracing::debug!(
            sample_rate = reader.header().sample_rate,
            samples = reader.header().sample_count(),
            "playback stream open"
        );

        self.sink.enable();
        let result = self.stream_render(&mut reader);
        self.sink.disable();
        tracing::info!("playback ended");
        result
    }

    /// The Active loop. Stop requests are observed once per iteration,
    /// never between the read and the write of a batch.
    fn stream_render(&mut self, reader: &mut WavStreamReader) -> crate::Result<()> {
        loop {
            if !self.keep_running.load(Ordering::SeqCst) {
                return Ok(());
            }

            let n = reader.read_samples(&mut self.samples)?;
            if n == 0 {
                // end of stream
                return Ok(());
            }

            self.frames.clear();
            self.frames
                .extend(self.samples[..n].iter().map(|&s| FrameGroup::render(s)));

            let mut written = 0;
            while written < self.frames.len() {
                match self.sink.write_frames(&self.frames[written..]) {
                    Ok(0) => {
                        tracing::warn!("sink accepted no frames, ending playback");
                        return Ok(());
                    }
                    Ok(k) => written += k,
                    Err(AudioError::Timeout) => {
                        // no retry policy for render timeouts: treat as end of stream
                        tracing::warn!("render write timed out, ending playback");
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }
}
