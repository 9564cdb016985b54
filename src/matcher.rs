//! Streaming matching engine
//!
//! The consumer half of a session: on a fixed polling period it snapshots the
//! token buffer, scans it with the shared [`PatternIndex`], reports countries
//! not yet guessed this session, and trims the fully-scanned prefix. Polling
//! (rather than event-driven matching) is deliberate — words arrive in
//! discrete batches from the producer, and re-scanning the whole bounded
//! buffer keeps matches that span batch boundaries correct.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::session::{SessionState, SharedSession};
use crate::vocab::PatternIndex;

/// Run one matching tick against the session state
///
/// Scans the current buffer snapshot, records every not-yet-guessed country
/// in occurrence order, then consumes the scanned prefix up to the maximum
/// end offset over all occurrences — already-guessed countries advance the
/// boundary too, since their text needs no rescan. Trailing words with no
/// match yet stay buffered so multi-word names can complete on a later tick.
///
/// Returns the newly recognized countries, earliest-ending first.
pub fn match_tick(index: &PatternIndex, state: &mut SessionState) -> Vec<String> {
    if state.buffer.is_empty() {
        return Vec::new();
    }

    let text = state.buffer.snapshot();
    let occurrences = index.scan(&text);

    let mut newly = Vec::new();
    let mut boundary = 0;
    for occurrence in &occurrences {
        if !state.guessed.contains(occurrence.term) {
            state.guessed.insert(occurrence.term.to_string());
            newly.push(occurrence.term.to_string());
        }
        boundary = boundary.max(occurrence.end);
    }

    if boundary > 0 {
        state.buffer.consume(words_within(&text, boundary));
    }

    newly
}

/// Count the words fully covered by the scanned prefix `text[..end]`
fn words_within(text: &str, end: usize) -> usize {
    text[..end].matches(' ').count() + 1
}

/// Consumer loop: poll, match, emit, until cancelled
///
/// Each newly recognized country goes out over `events`; if the receiving
/// side is gone the loop logs and exits without propagating a failure.
pub async fn run_matcher(
    index: Arc<PatternIndex>,
    session: SharedSession,
    events: mpsc::Sender<String>,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!("matcher loop cancelled");
                return;
            }
            () = tokio::time::sleep(interval) => {}
        }

        let newly = {
            let mut state = session.lock().await;
            match_tick(&index, &mut state)
        };

        for country in newly {
            tracing::info!(country = %country, "correct guess");
            if events.send(country).await.is_err() {
                tracing::warn!("event channel closed, stopping matcher loop");
                return;
            }
        }
    }
}
