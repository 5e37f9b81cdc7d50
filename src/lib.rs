//! Memovox: record/playback coordination core for a button-driven voice
//! memo appliance
//!
//! This library provides the core functionality for:
//! - Capturing microphone audio through a duplex transport seam
//! - DC-bias calibration of the capture path before each recording
//! - Incremental WAV framing to storage, header patched on finalize
//! - Playback of stored recordings through the render seam
//! - A fire-and-forget control surface with cooperative mutual exclusion
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │        RecPlayManager       │
//!                    │ start_rec/start_play/stop_* │
//!                    └──────────────┬──────────────┘
//!                 start channel +   │   + continuation flags
//!              ┌────────────────────┴────────────────────┐
//!              ▼                                         ▼
//!      ┌──────────────┐                          ┌──────────────┐
//!      │   Recorder   │                          │    Player    │
//!      │ Idle→Calib→  │                          │ Idle→Active  │
//!      │   Active     │                          │              │
//!      └──────┬───────┘                          └──────┬───────┘
//!             │ AudioSource ⇄ WavStreamWriter           │
//!             │                    WavStreamReader ⇄ AudioSink
//!             ▼                                         ▼
//!      ┌──────────────┐                          ┌──────────────┐
//!      │  microphone  │                          │   speaker    │
//!      │  (capture)   │                          │   (render)   │
//!      └──────────────┘                          └──────────────┘
//! ```

pub mod audio;
pub mod calibrate;
pub mod config;
pub mod error;
pub mod frame;
pub mod indicator;
pub mod manager;
pub mod player;
pub mod recorder;
pub mod wav;

pub use config::Config;
pub use error::{MemovoxError, Result};
pub use manager::RecPlayManager;
