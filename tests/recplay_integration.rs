//! Record/playback coordination tests
//!
//! Drives the manager and both workers over the loopback transport:
//! calibration, bounded-duration capture, cooperative mutual exclusion,
//! advisory stops, and the end-to-end record-then-replay scenario.

use memovox::audio::loopback::{MemorySink, ScriptedSource};
use memovox::config::Config;
use memovox::indicator::{LogIndicator, SharedIndicator};
use memovox::wav::{WavStreamReader, WavStreamWriter, HEADER_LEN};
use memovox::RecPlayManager;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const SAMPLE_RATE: u32 = 44100;

/// DC offset baked into the synthetic microphone
const OFFSET: i32 = 1 << 20;
/// Square-wave swing; 2^18 >> 14 corrects to +/-16
const SWING: i32 = 1 << 18;

fn wait_until(cond: impl Fn() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}

/// Synthetic microphone: per-sample alternating square wave on a DC offset
fn alternating_source() -> ScriptedSource {
    ScriptedSource::new(|i| OFFSET + if i % 2 == 0 { SWING } else { -SWING })
}

fn write_playable(path: &Path, samples: &[i16]) {
    let mut writer = WavStreamWriter::create(path, SAMPLE_RATE).unwrap();
    writer.append_samples(samples).unwrap();
    writer.finalize(samples.len() as u64).unwrap();
}

/// Finalized header must agree with what is on disk
fn assert_well_formed(path: &Path) {
    let reader = WavStreamReader::open(path).unwrap();
    let data_bytes = reader.header().data_bytes as u64;
    let file_len = std::fs::metadata(path).unwrap().len();
    assert_eq!(file_len, HEADER_LEN as u64 + data_bytes);
}

#[test]
fn test_end_to_end_record_then_replay() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memo.wav");

    // four seconds of bounded-duration recording
    let expected_samples = 4 * SAMPLE_RATE as u64;
    let mut config = Config::default();
    config.recording.max_samples = expected_samples;

    let sink = MemorySink::new();
    let indicator = SharedIndicator::new();
    let mut manager = RecPlayManager::spawn(
        &config,
        Box::new(alternating_source()),
        Box::new(sink.clone()),
        Box::new(indicator.clone()),
    );

    manager.start_rec(&path);
    assert!(wait_until(
        || !manager.recording_active() && path.exists(),
        Duration::from_secs(30)
    ));
    assert!(!indicator.is_active(), "indicator must clear at session end");

    // the sample cap bounds the session exactly
    let header = *WavStreamReader::open(&path).unwrap().header();
    assert_eq!(header.data_bytes as u64, 2 * expected_samples);
    assert_eq!(header.wav_size as u64, 2 * expected_samples + 36);
    assert_well_formed(&path);

    manager.start_play(&path);
    assert!(wait_until(
        || !manager.playback_active() && !sink.is_empty(),
        Duration::from_secs(30)
    ));
    manager.shutdown();

    // calibration consumed an even window, so bias == OFFSET exactly and
    // the replayed stream is the corrected square wave
    let played = sink.samples();
    assert_eq!(played.len() as u64, expected_samples);
    let window = (SAMPLE_RATE as u64 * config.calibration.window_ms as u64) / 1000;
    for (k, &sample) in played.iter().enumerate() {
        let source_index = window + k as u64;
        let expected = if source_index % 2 == 0 { 16 } else { -16 };
        assert_eq!(sample, expected, "sample {} mismatched", k);
    }
}

#[test]
fn test_start_play_winds_down_active_recording() {
    let dir = TempDir::new().unwrap();
    let rec_path = dir.path().join("rec.wav");
    let play_path = dir.path().join("play.wav");
    write_playable(&play_path, &[3i16; 1000]);

    // unbounded recording from a paced source; only the start_play ends it
    let mut config = Config::default();
    config.recording.max_samples = 0;
    let source = alternating_source().with_pacing(Duration::from_millis(1));
    let sink = MemorySink::new();
    let indicator = SharedIndicator::new();
    let mut manager = RecPlayManager::spawn(
        &config,
        Box::new(source),
        Box::new(sink.clone()),
        Box::new(indicator.clone()),
    );

    manager.start_rec(&rec_path);
    assert!(wait_until(
        || manager.recording_active() && indicator.is_active(),
        Duration::from_secs(5)
    ));

    manager.start_play(&play_path);
    assert!(
        wait_until(|| !manager.recording_active(), Duration::from_secs(5)),
        "recorder must reach idle after start_play"
    );
    assert!(!indicator.is_active());
    assert_well_formed(&rec_path);

    assert!(wait_until(
        || !manager.playback_active() && !sink.is_empty(),
        Duration::from_secs(5)
    ));
    assert_eq!(sink.samples().len(), 1000);
    manager.shutdown();
}

#[test]
fn test_start_rec_winds_down_active_playback() {
    let dir = TempDir::new().unwrap();
    let rec_path = dir.path().join("rec.wav");
    let play_path = dir.path().join("long.wav");
    write_playable(&play_path, &vec![5i16; SAMPLE_RATE as usize]);

    let mut config = Config::default();
    config.recording.max_samples = 0;
    let source = alternating_source().with_pacing(Duration::from_millis(1));
    // paced sink keeps the one-second file playing long enough to interrupt
    let sink = MemorySink::new().with_pacing(Duration::from_millis(2));
    let mut manager = RecPlayManager::spawn(
        &config,
        Box::new(source),
        Box::new(sink.clone()),
        Box::new(LogIndicator),
    );

    manager.start_play(&play_path);
    assert!(wait_until(
        || manager.playback_active(),
        Duration::from_secs(5)
    ));

    manager.start_rec(&rec_path);
    assert!(
        wait_until(|| !manager.playback_active(), Duration::from_secs(5)),
        "player must reach idle after start_rec"
    );
    assert!(
        (sink.len() as u64) < SAMPLE_RATE as u64,
        "playback must have been cut short"
    );
    assert!(wait_until(
        || manager.recording_active(),
        Duration::from_secs(5)
    ));

    manager.stop_rec();
    assert!(wait_until(
        || !manager.recording_active(),
        Duration::from_secs(5)
    ));
    assert_well_formed(&rec_path);
    manager.shutdown();
}

#[test]
fn test_stop_rec_while_idle_is_harmless() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("after.wav");

    let mut config = Config::default();
    config.recording.max_samples = 2000;
    let mut manager = RecPlayManager::spawn(
        &config,
        Box::new(alternating_source()),
        Box::new(MemorySink::new()),
        Box::new(LogIndicator),
    );

    manager.stop_rec();
    manager.stop_rec();
    manager.stop_play();
    assert!(!manager.recording_active());
    assert!(!manager.playback_active());

    // the workers still serve requests afterwards
    manager.start_rec(&path);
    assert!(wait_until(
        || !manager.recording_active() && path.exists(),
        Duration::from_secs(10)
    ));
    let header = *WavStreamReader::open(&path).unwrap().header();
    assert_eq!(header.sample_count(), 2000);
    manager.shutdown();
}

#[test]
fn test_empty_playback_writes_no_frames() {
    let dir = TempDir::new().unwrap();
    let empty_path = dir.path().join("empty.wav");
    let full_path = dir.path().join("full.wav");
    WavStreamWriter::create(&empty_path, SAMPLE_RATE)
        .unwrap()
        .finalize(0)
        .unwrap();
    write_playable(&full_path, &[9i16; 300]);

    let config = Config::default();
    let sink = MemorySink::new();
    let mut manager = RecPlayManager::spawn(
        &config,
        Box::new(alternating_source()),
        Box::new(sink.clone()),
        Box::new(LogIndicator),
    );

    manager.start_play(&empty_path);
    std::thread::sleep(Duration::from_millis(100));
    assert!(!manager.playback_active());
    assert!(sink.is_empty(), "zero-sample file must write nothing");

    // the same worker then plays a real file, proving it went back to idle
    manager.start_play(&full_path);
    assert!(wait_until(
        || !manager.playback_active() && sink.len() == 300,
        Duration::from_secs(5)
    ));
    manager.shutdown();
}

#[test]
fn test_open_failure_leaves_worker_serving() {
    let dir = TempDir::new().unwrap();
    let bad_path = dir.path().join("no-such-dir").join("x.wav");
    let good_path = dir.path().join("ok.wav");

    let mut config = Config::default();
    config.recording.max_samples = 1000;
    let mut manager = RecPlayManager::spawn(
        &config,
        Box::new(alternating_source()),
        Box::new(MemorySink::new()),
        Box::new(LogIndicator),
    );

    manager.start_rec(&bad_path);
    assert!(wait_until(
        || !manager.recording_active(),
        Duration::from_secs(5)
    ));
    assert!(!bad_path.exists());

    manager.start_rec(&good_path);
    assert!(wait_until(
        || !manager.recording_active() && good_path.exists(),
        Duration::from_secs(10)
    ));
    assert_well_formed(&good_path);
    manager.shutdown();
}

#[test]
fn test_capture_timeout_keeps_collected_samples() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stalled.wav");

    let mut config = Config::default();
    config.recording.max_samples = 0;
    // enough for the calibration window plus 500 recorded samples
    let window = (SAMPLE_RATE as u64 * config.calibration.window_ms as u64) / 1000;
    let source = alternating_source().with_budget(window + 500);
    let mut manager = RecPlayManager::spawn(
        &config,
        Box::new(source),
        Box::new(MemorySink::new()),
        Box::new(LogIndicator),
    );

    manager.start_rec(&path);
    assert!(wait_until(
        || !manager.recording_active() && path.exists(),
        Duration::from_secs(10)
    ));
    let header = *WavStreamReader::open(&path).unwrap().header();
    assert_eq!(header.sample_count(), 500);
    assert_well_formed(&path);
    manager.shutdown();
}

#[test]
fn test_over_long_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a-name-well-past-the-appliance-filename-buffer.wav");

    let mut config = Config::default();
    config.recording.max_path_bytes = 8;
    let mut manager = RecPlayManager::spawn(
        &config,
        Box::new(alternating_source()),
        Box::new(MemorySink::new()),
        Box::new(LogIndicator),
    );

    manager.start_rec(&path);
    std::thread::sleep(Duration::from_millis(100));
    assert!(!manager.recording_active());
    assert!(!path.exists());
    manager.shutdown();
}
