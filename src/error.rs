//! Error types for memovox
//!
//! Uses thiserror for ergonomic error definitions. Session-level failures
//! are logged and absorbed by the worker loops; only setup-time errors
//! propagate out of the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the memovox crate
#[derive(Error, Debug)]
pub enum MemovoxError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Audio transport error: {0}")]
    Audio(#[from] AudioError),

    #[error("WAV stream error: {0}")]
    Wav(#[from] WavError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the audio transport seams
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("transport I/O timed out")]
    Timeout,

    #[error("transport disconnected: {0}")]
    Disconnected(String),

    #[error("audio stream error: {0}")]
    Stream(String),
}

/// Errors raised by the WAV stream writer and reader
#[derive(Error, Debug)]
pub enum WavError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file too short for a WAV header")]
    TruncatedHeader,

    #[error("bad {chunk} magic")]
    BadMagic { chunk: &'static str },
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Result type alias using MemovoxError
pub type Result<T> = std::result::Result<T, MemovoxError>;
