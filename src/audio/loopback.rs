//! Deterministic in-memory transport
//!
//! Stands in for the duplex streaming device in tests and the scripted
//! demo: a capture source driven by a sample generator, and a render sink
//! that logs every frame it accepts. Both can simulate the real device's
//! pacing, and the source can run out of frames to exercise the timeout
//! paths.

use super::{AudioSink, AudioSource};
use crate::error::AudioError;
use crate::frame::FrameGroup;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Capture source driven by a sample generator closure.
///
/// The generator receives the running frame index and returns the raw
/// voice-channel value for that frame.
pub struct ScriptedSource {
    gen: Box<dyn FnMut(u64) -> i32 + Send>,
    /// Frames remaining before reads start timing out (None = unlimited)
    budget: Option<u64>,
    /// Optional per-read sleep simulating real-time delivery
    pace: Option<Duration>,
    position: u64,
    enabled: bool,
}

impl ScriptedSource {
    pub fn new(gen: impl FnMut(u64) -> i32 + Send + 'static) -> Self {
        Self {
            gen: Box::new(gen),
            budget: None,
            pace: None,
            position: 0,
            enabled: false,
        }
    }

    /// Limit the source to `frames` frame groups; reads past the budget
    /// return Err(Timeout), the way a stalled device would.
    pub fn with_budget(mut self, frames: u64) -> Self {
        self.budget = Some(frames);
        self
    }

    /// Sleep for `pace` on every read, simulating device pacing.
    pub fn with_pacing(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl AudioSource for ScriptedSource {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn read_frames(&mut self, frames: &mut [FrameGroup]) -> Result<usize, AudioError> {
        if let Some(pace) = self.pace {
            std::thread::sleep(pace);
        }

        let want = frames.len() as u64;
        let grant = match self.budget {
            Some(0) => return Err(AudioError::Timeout),
            Some(remaining) => want.min(remaining),
            None => want,
        };

        for slot in frames[..grant as usize].iter_mut() {
            *slot = FrameGroup {
                left: 0,
                right: (self.gen)(self.position),
            };
            self.position += 1;
        }

        if let Some(remaining) = &mut self.budget {
            *remaining -= grant;
        }
        Ok(grant as usize)
    }
}

/// Render sink that records every frame group it accepts.
///
/// Clones share the same frame log, so a test can hand one handle to the
/// player worker and inspect the other.
#[derive(Clone, Default)]
pub struct MemorySink {
    frames: Arc<Mutex<Vec<FrameGroup>>>,
    enabled: Arc<AtomicBool>,
    pace: Option<Duration>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `pace` on every write, simulating device pacing.
    pub fn with_pacing(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }

    /// Snapshot of every frame group written so far
    pub fn frames(&self) -> Vec<FrameGroup> {
        self.frames.lock().unwrap().clone()
    }

    /// Number of frame groups written so far
    pub fn len(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mono samples recovered from the voice slot of each written frame
    pub fn samples(&self) -> Vec<i16> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .map(|g| (g.right >> 16) as i16)
            .collect()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

impl AudioSink for MemorySink {
    fn enable(&mut self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    fn disable(&mut self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    fn write_frames(&mut self, frames: &[FrameGroup]) -> Result<usize, AudioError> {
        if let Some(pace) = self.pace {
            std::thread::sleep(pace);
        }
        self.frames.lock().unwrap().extend_from_slice(frames);
        Ok(frames.len())
    }
}
