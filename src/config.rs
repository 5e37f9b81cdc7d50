//! Configuration loading and types for memovox
//!
//! Configuration is loaded in layers:
//! 1. Built-in defaults
//! 2. Config file (~/.config/memovox/config.toml)
//! 3. CLI arguments (highest priority)

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"# Memovox Configuration
#
# Location: ~/.config/memovox/config.toml
# All settings can be overridden via CLI flags

[audio]
# Transport sample rate in Hz
sample_rate = 44100

# Frame groups fetched per transport read
# 128 groups = 1024 bytes on the wire at the 8-byte stereo frame width
frames_per_read = 128

# Bound on a single blocking transport read/write, in milliseconds
io_timeout_ms = 1000

[calibration]
# Capture window measured for the DC bias estimate, in milliseconds.
# Doubles as the microphone warm-up period; nothing read during the
# window reaches storage.
window_ms = 100

[recording]
# Directory for new recordings
# "auto" = ~/.local/share/memovox/recordings
dir = "auto"

# Stop a recording after this many samples (0 = record until stopped)
# 262144 samples is roughly six seconds at 44100 Hz
max_samples = 262144

# Upper bound on caller-supplied recording paths, in bytes.
# The appliance reserves a 32-byte filename buffer; set 32 to match it.
max_path_bytes = 256
"#;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub calibration: CalibrationConfig,

    #[serde(default)]
    pub recording: RecordingConfig,
}

/// Audio transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioConfig {
    /// Sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Frame groups fetched per transport read
    #[serde(default = "default_frames_per_read")]
    pub frames_per_read: usize,

    /// Bound on a single blocking transport call, in milliseconds
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
}

/// DC bias calibration configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalibrationConfig {
    /// Capture window measured for the bias estimate, in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u32,
}

/// Recording storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordingConfig {
    /// Recordings directory ("auto" for the platform data directory)
    #[serde(default = "default_recordings_dir")]
    pub dir: String,

    /// Sample cap for bounded-duration recordings (0 = unbounded)
    #[serde(default = "default_max_samples")]
    pub max_samples: u64,

    /// Checked bound on caller-supplied path length, in bytes
    #[serde(default = "default_max_path_bytes")]
    pub max_path_bytes: usize,
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_frames_per_read() -> usize {
    128
}

fn default_io_timeout_ms() -> u64 {
    1000
}

fn default_window_ms() -> u32 {
    100
}

fn default_recordings_dir() -> String {
    "auto".to_string()
}

fn default_max_samples() -> u64 {
    262144
}

fn default_max_path_bytes() -> usize {
    256
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            frames_per_read: default_frames_per_read(),
            io_timeout_ms: default_io_timeout_ms(),
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            dir: default_recordings_dir(),
            max_samples: default_max_samples(),
            max_path_bytes: default_max_path_bytes(),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or the default location.
    /// A missing file is not an error; defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path(),
        };

        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("memovox")
            .join("config.toml")
    }

    /// Resolve the recordings directory, expanding "auto"
    pub fn recordings_dir(&self) -> PathBuf {
        if self.recording.dir == "auto" {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("memovox")
                .join("recordings")
        } else {
            PathBuf::from(&self.recording.dir)
        }
    }
}
