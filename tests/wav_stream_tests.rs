//! WAV stream writer/reader tests
//!
//! Verifies the incremental framing end to end: the deferred header, the
//! seek-back-and-rewrite finalize, batch reads, and the size invariants.
//! Files produced by our writer are cross-checked with hound's independent
//! WAV parser.

use memovox::wav::{WavStreamReader, WavStreamWriter, HEADER_LEN};
use std::path::Path;
use tempfile::TempDir;

const SAMPLE_RATE: u32 = 44100;

fn write_wav(path: &Path, samples: &[i16]) {
    let mut writer = WavStreamWriter::create(path, SAMPLE_RATE).unwrap();
    writer.append_samples(samples).unwrap();
    writer.finalize(samples.len() as u64).unwrap();
}

fn read_all(path: &Path) -> Vec<i16> {
    let mut reader = WavStreamReader::open(path).unwrap();
    let mut out = Vec::new();
    let mut batch = [0i16; 64];
    loop {
        let n = reader.read_samples(&mut batch).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&batch[..n]);
    }
    out
}

#[test]
fn test_header_invariant_on_disk() {
    let dir = TempDir::new().unwrap();
    for n in [0usize, 1, 4096] {
        let path = dir.path().join(format!("{}.wav", n));
        let samples: Vec<i16> = (0..n).map(|i| (i % 100) as i16).collect();
        write_wav(&path, &samples);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 2 * n);
        let wav_size = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        let data_bytes = u32::from_le_bytes(bytes[40..44].try_into().unwrap());
        assert_eq!(data_bytes as usize, 2 * n);
        assert_eq!(wav_size, data_bytes + 36);
    }
}

#[test]
fn test_round_trip_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.wav");
    write_wav(&path, &[]);
    assert!(read_all(&path).is_empty());
}

#[test]
fn test_round_trip_single_sample() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("one.wav");
    write_wav(&path, &[-12345]);
    assert_eq!(read_all(&path), vec![-12345]);
}

#[test]
fn test_round_trip_spans_many_batches() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.wav");
    // not a multiple of the 64-sample read batch
    let samples: Vec<i16> = (0..10_007).map(|i| (i as i16).wrapping_mul(31)).collect();
    write_wav(&path, &samples);
    assert_eq!(read_all(&path), samples);
}

#[test]
fn test_hound_parses_our_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cross.wav");
    let samples: Vec<i16> = vec![0, 1, -1, i16::MAX, i16::MIN, 400];
    write_wav(&path, &samples);

    let reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);

    let decoded: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(decoded, samples);
}

#[test]
fn test_reader_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.wav");
    std::fs::write(&path, vec![0xAB; HEADER_LEN]).unwrap();
    assert!(WavStreamReader::open(&path).is_err());
}

#[test]
fn test_reader_rejects_short_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.wav");
    std::fs::write(&path, b"RIFF").unwrap();
    assert!(WavStreamReader::open(&path).is_err());
}

#[test]
fn test_unfinalized_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crashed.wav");
    {
        let mut writer = WavStreamWriter::create(&path, SAMPLE_RATE).unwrap();
        writer.append_samples(&[1, 2, 3]).unwrap();
        // dropped without finalize, as after a power loss
    }
    assert!(WavStreamReader::open(&path).is_err());
}

#[test]
fn test_reader_honors_data_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("over.wav");
    let samples: Vec<i16> = (0..100i16).collect();
    let mut writer = WavStreamWriter::create(&path, SAMPLE_RATE).unwrap();
    writer.append_samples(&samples).unwrap();
    // header claims fewer samples than were appended
    writer.finalize(50).unwrap();
    assert_eq!(read_all(&path).len(), 50);
}

#[test]
fn test_truncated_data_ends_stream_early() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("truncated.wav");
    let mut writer = WavStreamWriter::create(&path, SAMPLE_RATE).unwrap();
    writer.append_samples(&[7; 50]).unwrap();
    // header claims more samples than exist on disk
    writer.finalize(100).unwrap();
    assert_eq!(read_all(&path), vec![7i16; 50]);
}

#[test]
fn test_zero_sample_file_is_header_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("silent.wav");
    let writer = WavStreamWriter::create(&path, SAMPLE_RATE).unwrap();
    writer.finalize(0).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), HEADER_LEN);
    let reader = WavStreamReader::open(&path).unwrap();
    assert_eq!(reader.header().data_bytes, 0);
    assert_eq!(reader.header().wav_size, 36);
}
