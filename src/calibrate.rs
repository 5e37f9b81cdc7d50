//! DC bias calibration
//!
//! The microphone/ADC sits on a DC offset; subtracting the mean of an
//! initial capture window before the downshift centers the waveform at
//! zero and keeps the quantized output clear of clipping. The window also
//! serves as the warm-up/discard period: nothing read here reaches storage.

use crate::audio::AudioSource;
use crate::error::AudioError;
use crate::frame::FrameGroup;

/// Measure the DC bias over `window_ms` of capture.
///
/// Accumulates raw (pre-shift) voice-channel values and returns their
/// arithmetic mean, so the result is commensurate with the raw samples the
/// streaming path corrects later. A timeout after at least one sample ends
/// the window early with a mean of what was read; a timeout before any
/// sample fails the session. An empty window yields bias 0.
pub fn compute_bias(
    source: &mut dyn AudioSource,
    batch: &mut [FrameGroup],
    sample_rate: u32,
    window_ms: u32,
) -> Result<i64, AudioError> {
    let target = (sample_rate as u64 * window_ms as u64) / 1000;
    let mut sum: i64 = 0;
    let mut count: u64 = 0;

    while count < target {
        let want = batch.len().min((target - count) as usize);
        let got = match source.read_frames(&mut batch[..want]) {
            Ok(n) => n,
            Err(AudioError::Timeout) if count > 0 => break,
            Err(e) => return Err(e),
        };
        if got == 0 {
            break;
        }
        for group in &batch[..got] {
            sum += group.voice() as i64;
        }
        count += got as u64;
    }

    if count == 0 {
        return Ok(0);
    }
    Ok(sum / count as i64)
}
