//! Atlas Gateway - Voice country-guessing gateway
//!
//! Clients stream raw audio over a WebSocket; the gateway transcribes it,
//! scans the resulting word stream for country names (canonical names plus
//! aliases), and reports each country exactly once per session.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  WebSocket client                 │
//! │        audio frames in  │  guess events out       │
//! └───────────┬─────────────┴──────────▲─────────────┘
//!             │                        │
//! ┌───────────▼────────────────────────┴─────────────┐
//! │              Session (per connection)             │
//! │  producer: audio → STT → token buffer             │
//! │  consumer: buffer → pattern index → dedup → emit  │
//! └───────────┬──────────────────────────────────────┘
//!             │ shared, read-only
//! ┌───────────▼──────────────────────────────────────┐
//! │     PatternIndex (compiled once at startup)       │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod matcher;
pub mod session;
pub mod stream;
pub mod transcribe;
pub mod vocab;

pub use config::{Config, EngineConfig, SttConfig};
pub use error::{Error, Result};
pub use matcher::match_tick;
pub use session::{Session, SessionState, SharedSession};
pub use stream::TokenBuffer;
pub use transcribe::{Transcriber, WhisperStt};
pub use vocab::{MatchOccurrence, PatternIndex, Vocabulary};
