//! Error types for loading audio and opening the output device.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a file into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unrecognized container format: {0}")]
    Format(symphonia::core::errors::Error),

    #[error("No default track found")]
    NoTrack,

    #[error("No sample rate in track")]
    MissingSampleRate,

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(usize),

    #[error("Failed to create decoder: {0}")]
    Codec(symphonia::core::errors::Error),

    #[error("Error reading packet: {0}")]
    Packet(symphonia::core::errors::Error),

    #[error("Decode error: {0}")]
    Decode(symphonia::core::errors::Error),
}

/// Errors that can occur while opening the audio output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Failed to get output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("Unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("Failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("Failed to start stream: {0}")]
    Play(#[from] cpal::PlayStreamError),

    #[error("Failed to spawn keepalive thread: {0}")]
    Keepalive(std::io::Error),
}
