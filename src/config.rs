//! Configuration for the Atlas gateway

use std::path::PathBuf;
use std::time::Duration;

use crate::stream::DEFAULT_CAPACITY;

/// Gateway configuration assembled from the CLI at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the two-section vocabulary file
    pub vocab_path: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Per-session engine tuning
    pub engine: EngineConfig,

    /// Speech-to-text settings
    pub stt: SttConfig,
}

/// Per-session recognition engine tuning
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Word capacity of each session's token buffer
    pub buffer_capacity: usize,

    /// How often the producer drains accumulated audio for transcription
    pub transcribe_interval: Duration,

    /// How often the consumer re-scans the token buffer
    pub match_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_CAPACITY,
            transcribe_interval: Duration::from_secs(1),
            match_interval: Duration::from_millis(500),
        }
    }
}

/// Speech-to-text settings
#[derive(Debug, Clone)]
pub struct SttConfig {
    /// API key for the transcription service
    pub api_key: String,

    /// STT model identifier (e.g. "whisper-1")
    pub model: String,
}
