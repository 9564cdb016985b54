//! Per-connection session coordination
//!
//! Each live connection owns one [`SessionState`] (token buffer + guessed
//! set) behind a single mutex, an audio inbox the transport extends, and two
//! tasks: a producer that transcribes accumulated audio into words, and a
//! consumer running the matching loop. Teardown is cooperative — both tasks
//! observe a cancellation token at their sleep points and exit cleanly.
//!
//! The shared [`PatternIndex`] is read-only; buffer and guessed set belong
//! exclusively to their session. One mutex guards both so a matching tick is
//! atomic with respect to producer appends.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::matcher;
use crate::stream::TokenBuffer;
use crate::transcribe::Transcriber;
use crate::vocab::PatternIndex;

/// Punctuation stripped from the edges of each transcribed segment
const EDGE_PUNCTUATION: [char; 5] = [' ', '.', '?', '!', ','];

/// Mutable per-session state shared by producer and consumer
#[derive(Debug)]
pub struct SessionState {
    /// Words awaiting matching
    pub buffer: TokenBuffer,
    /// Countries already reported this session
    pub guessed: HashSet<String>,
}

impl SessionState {
    /// Fresh state with an empty buffer of the given capacity
    #[must_use]
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            buffer: TokenBuffer::new(buffer_capacity),
            guessed: HashSet::new(),
        }
    }
}

/// Session state behind its mutex, shared between the two tasks
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Handle to one live session and its task pair
pub struct Session {
    audio: Arc<Mutex<Vec<u8>>>,
    cancel: CancellationToken,
    producer: JoinHandle<()>,
    consumer: JoinHandle<()>,
}

impl Session {
    /// Spawn the producer/consumer pair for a new connection
    ///
    /// Newly recognized countries flow out over `events` in the order they
    /// were matched.
    #[must_use]
    pub fn spawn(
        index: Arc<PatternIndex>,
        transcriber: Arc<dyn Transcriber>,
        events: mpsc::Sender<String>,
        config: &EngineConfig,
    ) -> Self {
        let state: SharedSession = Arc::new(Mutex::new(SessionState::new(config.buffer_capacity)));
        let audio = Arc::new(Mutex::new(Vec::new()));
        let cancel = CancellationToken::new();

        let producer = tokio::spawn(run_producer(
            transcriber,
            Arc::clone(&audio),
            Arc::clone(&state),
            config.transcribe_interval,
            cancel.clone(),
        ));
        let consumer = tokio::spawn(matcher::run_matcher(
            index,
            state,
            events,
            config.match_interval,
            cancel.clone(),
        ));

        Self {
            audio,
            cancel,
            producer,
            consumer,
        }
    }

    /// Append inbound audio bytes to the session's inbox
    ///
    /// Frames accumulate between producer ticks; chunking is arbitrary.
    pub async fn push_audio(&self, data: &[u8]) {
        self.audio.lock().await.extend_from_slice(data);
    }

    /// Cancel both tasks and wait for them to acknowledge termination
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.producer.await {
            tracing::warn!(error = %e, "producer task did not shut down cleanly");
        }
        if let Err(e) = self.consumer.await {
            tracing::warn!(error = %e, "consumer task did not shut down cleanly");
        }
        tracing::debug!("session tasks terminated");
    }
}

/// Producer loop: drain accumulated audio, transcribe, feed the buffer
///
/// Ticks with no accumulated audio skip the transcriber entirely. A failed
/// transcription is logged and treated as an empty tick; the loop continues.
async fn run_producer(
    transcriber: Arc<dyn Transcriber>,
    audio: Arc<Mutex<Vec<u8>>>,
    session: SharedSession,
    interval: std::time::Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!("producer loop cancelled");
                return;
            }
            () = tokio::time::sleep(interval) => {}
        }

        let pending = std::mem::take(&mut *audio.lock().await);
        if pending.is_empty() {
            continue;
        }

        let segments = match transcriber.transcribe(&pending).await {
            Ok(segments) => segments,
            Err(e) => {
                tracing::warn!(error = %e, "transcription failed, skipping tick");
                continue;
            }
        };

        let new_words: Vec<String> = segments.iter().flat_map(|s| tokenize_segment(s)).collect();
        if new_words.is_empty() {
            continue;
        }

        let mut state = session.lock().await;
        state.buffer.append(new_words.iter().cloned());
        tracing::info!(
            words = ?new_words,
            stream_len = state.buffer.len(),
            "added to stream"
        );
    }
}

/// Split a transcribed segment into normalized words
///
/// Lowercases, strips leading/trailing punctuation, splits on whitespace.
#[must_use]
pub fn tokenize_segment(segment: &str) -> Vec<String> {
    segment
        .to_lowercase()
        .trim_matches(EDGE_PUNCTUATION)
        .split_whitespace()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize_segment("I love USA"),
            vec!["i", "love", "usa"]
        );
    }

    #[test]
    fn tokenize_strips_edge_punctuation() {
        assert_eq!(
            tokenize_segment(" And Chad. "),
            vec!["and", "chad"]
        );
        assert_eq!(tokenize_segment("France?!"), vec!["france"]);
    }

    #[test]
    fn tokenize_empty_segment_yields_nothing() {
        assert!(tokenize_segment("").is_empty());
        assert!(tokenize_segment(" .?!, ").is_empty());
    }
}
