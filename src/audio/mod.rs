//! Audio transport seams
//!
//! The duplex streaming device is an external collaborator; the core only
//! sees these traits. Capture and render are opened as two independent
//! unidirectional instances, each read or written with blocking calls that
//! a real device bounds with a timeout.

pub mod loopback;

use crate::error::AudioError;
use crate::frame::FrameGroup;

/// Capture side of the duplex audio device
pub trait AudioSource: Send {
    /// Start the capture clock
    fn enable(&mut self);

    /// Stop the capture clock
    fn disable(&mut self);

    /// Blocking read of raw interleaved frame groups into `frames`.
    /// Returns the number of groups read, which may be short.
    /// Err(AudioError::Timeout) when the device's bound elapses first.
    fn read_frames(&mut self, frames: &mut [FrameGroup]) -> Result<usize, AudioError>;
}

/// Render side of the duplex audio device
pub trait AudioSink: Send {
    /// Start the render clock
    fn enable(&mut self);

    /// Stop the render clock
    fn disable(&mut self);

    /// Blocking write of rendered frame groups.
    /// Returns the number of groups accepted, which may be short.
    /// Err(AudioError::Timeout) when the device's bound elapses first.
    fn write_frames(&mut self, frames: &[FrameGroup]) -> Result<usize, AudioError>;
}
