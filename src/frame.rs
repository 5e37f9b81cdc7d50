//! Typed audio frame model
//!
//! The transport delivers interleaved stereo 32-bit samples, two slots per
//! frame group. The microphone drives exactly one of those slots; the other
//! carries nothing useful. Naming the selected slot here replaces the byte
//! offset arithmetic the device driver would otherwise impose on every
//! consumer.

/// One interleaved stereo pair as carried by the transport in a single
/// transfer unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameGroup {
    /// First 32-bit slot. Unused by the mono pipeline.
    pub left: i32,
    /// Second 32-bit slot. Both the microphone and the amplifier sit here.
    pub right: i32,
}

/// Fixed right shift mapping the raw capture range down to i16 output.
///
/// This is a scaling law, not an adaptive gain: the ADC delivers its useful
/// bits MSB-aligned in the 32-bit slot, and dropping 14 bits lands the
/// speech band inside the 16-bit output range.
pub const SAMPLE_SHIFT: u32 = 14;

/// Bytes one frame group occupies on the wire (two 32-bit slots).
pub const FRAME_GROUP_BYTES: usize = 8;

impl FrameGroup {
    /// Raw capture value from the voice channel.
    pub fn voice(&self) -> i32 {
        self.right
    }

    /// Frame group rendering one mono sample for playback.
    ///
    /// The sample occupies the high half of the voice slot, mirroring the
    /// MSB-aligned 16-bit-in-32 layout the amplifier expects.
    pub fn render(sample: i16) -> Self {
        FrameGroup {
            left: 0,
            right: (sample as i32) << 16,
        }
    }
}

/// Apply the bias correction and fixed downshift to one raw capture value.
pub fn correct(raw: i32, bias: i64) -> i16 {
    ((raw as i64 - bias) >> SAMPLE_SHIFT) as i16
}
