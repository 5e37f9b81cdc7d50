//! Rec/Play manager — the public control surface
//!
//! Owns the single source of truth for what should be running: one start
//! channel and one continuation flag per worker. A new start clears both
//! flags before sending its own worker's message, so whatever was active is
//! asked to wind down first; mutual exclusion is cooperative, never a lock.
//! Stops are advisory — the worker observes the cleared flag at its next
//! loop check — and the UI polls the still-active indicators for completion.

use crate::audio::{AudioSink, AudioSource};
use crate::config::Config;
use crate::indicator::RecordIndicator;
use crate::player::Player;
use crate::recorder::Recorder;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Spawns and controls the recorder and player workers
pub struct RecPlayManager {
    rec_tx: Option<Sender<PathBuf>>,
    play_tx: Option<Sender<PathBuf>>,
    rec_continue: Arc<AtomicBool>,
    play_continue: Arc<AtomicBool>,
    rec_active: Arc<AtomicBool>,
    play_active: Arc<AtomicBool>,
    max_path_bytes: usize,
    workers: Vec<JoinHandle<()>>,
}

impl RecPlayManager {
    /// Spawn both workers. Called once, before any control call; the
    /// workers live until `shutdown` (or drop).
    pub fn spawn(
        config: &Config,
        source: Box<dyn AudioSource>,
        sink: Box<dyn AudioSink>,
        indicator: Box<dyn RecordIndicator>,
    ) -> Self {
        let (rec_tx, rec_rx) = mpsc::channel();
        let (play_tx, play_rx) = mpsc::channel();
        let rec_continue = Arc::new(AtomicBool::new(false));
        let play_continue = Arc::new(AtomicBool::new(false));
        let rec_active = Arc::new(AtomicBool::new(false));
        let play_active = Arc::new(AtomicBool::new(false));

        let recorder = Recorder::new(
            config,
            source,
            indicator,
            rec_rx,
            rec_continue.clone(),
            rec_active.clone(),
        );
        let player = Player::new(
            config,
            sink,
            play_rx,
            play_continue.clone(),
            play_active.clone(),
        );

        let workers = vec![
            thread::spawn(move || recorder.run()),
            thread::spawn(move || player.run()),
        ];
        tracing::debug!("recorder and player workers spawned");

        Self {
            rec_tx: Some(rec_tx),
            play_tx: Some(play_tx),
            rec_continue,
            play_continue,
            rec_active,
            play_active,
            max_path_bytes: config.recording.max_path_bytes,
            workers,
        }
    }

    /// Begin recording to `path`, winding down any active session first.
    /// Fire-and-forget; watch `recording_active` for completion.
    pub fn start_rec(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.check_path(&path) {
            return;
        }
        tracing::info!("record requested: {}", path.display());
        // a new start supersedes whatever either worker is doing
        self.play_continue.store(false, Ordering::SeqCst);
        self.rec_continue.store(false, Ordering::SeqCst);
        if let Some(tx) = &self.rec_tx {
            if tx.send(path).is_err() {
                tracing::error!("recorder worker is gone, request dropped");
            }
        }
    }

    /// Begin playing `path`, winding down any active session first.
    /// Fire-and-forget; watch `playback_active` for completion.
    pub fn start_play(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.check_path(&path) {
            return;
        }
        tracing::info!("playback requested: {}", path.display());
        self.play_continue.store(false, Ordering::SeqCst);
        self.rec_continue.store(false, Ordering::SeqCst);
        if let Some(tx) = &self.play_tx {
            if tx.send(path).is_err() {
                tracing::error!("player worker is gone, request dropped");
            }
        }
    }

    /// Ask the recorder to wind down. Advisory and idempotent: a no-op
    /// while idle, eventual while active.
    pub fn stop_rec(&self) {
        tracing::info!("record stop requested");
        self.rec_continue.store(false, Ordering::SeqCst);
    }

    /// Ask the player to wind down. Advisory and idempotent.
    pub fn stop_play(&self) {
        tracing::info!("playback stop requested");
        self.play_continue.store(false, Ordering::SeqCst);
    }

    /// Still-active indicator for the recorder, for UI polling
    pub fn recording_active(&self) -> bool {
        self.rec_active.load(Ordering::SeqCst)
    }

    /// Still-active indicator for the player, for UI polling
    pub fn playback_active(&self) -> bool {
        self.play_active.load(Ordering::SeqCst)
    }

    /// Wind down both sessions, close the start channels, and join the
    /// workers.
    pub fn shutdown(&mut self) {
        self.rec_continue.store(false, Ordering::SeqCst);
        self.play_continue.store(false, Ordering::SeqCst);
        // dropping the senders closes the idle gates
        self.rec_tx = None;
        self.play_tx = None;
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }

    fn check_path(&self, path: &Path) -> bool {
        let len = path.as_os_str().len();
        if len > self.max_path_bytes {
            tracing::error!(
                "path {:?} is {} bytes, over the {}-byte bound; request ignored",
                path,
                len,
                self.max_path_bytes
            );
            return false;
        }
        true
    }
}

impl Drop for RecPlayManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
