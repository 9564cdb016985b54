//! End-to-end recognition scenarios
//!
//! Drives full sessions (producer + matcher task pair) with a scripted
//! transcriber standing in for the speech model. Intervals are shortened so
//! each scenario settles in well under a second.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tokio::time::timeout;

use atlas_gateway::{
    EngineConfig, Error, PatternIndex, Result, Session, TokenBuffer, Transcriber, Vocabulary,
};

/// Returns one scripted transcript per transcription call, then silence
struct ScriptedStt {
    script: Mutex<VecDeque<Vec<String>>>,
}

impl ScriptedStt {
    fn new(script: &[&[&str]]) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(
                script
                    .iter()
                    .map(|segments| segments.iter().map(ToString::to_string).collect())
                    .collect(),
            ),
        })
    }
}

#[async_trait]
impl Transcriber for ScriptedStt {
    async fn transcribe(&self, _audio: &[u8]) -> Result<Vec<String>> {
        Ok(self.script.lock().await.pop_front().unwrap_or_default())
    }
}

/// Fails on the first call, transcribes "chad" on the second
struct FlakyStt {
    calls: Mutex<u32>,
}

#[async_trait]
impl Transcriber for FlakyStt {
    async fn transcribe(&self, _audio: &[u8]) -> Result<Vec<String>> {
        let mut calls = self.calls.lock().await;
        *calls += 1;
        if *calls == 1 {
            Err(Error::Stt("model unavailable".to_string()))
        } else {
            Ok(vec!["chad".to_string()])
        }
    }
}

fn test_index() -> Arc<PatternIndex> {
    let vocab = Vocabulary::parse(
        "[COUNTRIES]\n\
         chad\n\
         france\n\
         united states of america\n\
         \n\
         [ALTERNATES]\n\
         usa -> united states of america\n",
    );
    Arc::new(PatternIndex::compile(&vocab).unwrap())
}

fn fast_engine() -> EngineConfig {
    EngineConfig {
        buffer_capacity: 500,
        transcribe_interval: Duration::from_millis(20),
        match_interval: Duration::from_millis(10),
    }
}

async fn next_event(rx: &mut mpsc::Receiver<String>) -> String {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for guess event")
        .expect("event channel closed")
}

async fn assert_silent(rx: &mut mpsc::Receiver<String>) {
    assert!(
        timeout(Duration::from_millis(150), rx.recv()).await.is_err(),
        "unexpected extra guess event"
    );
}

/// Scenario A: an alias and a canonical name in one utterance come back as
/// canonical names, in spoken order.
#[tokio::test]
async fn alias_and_canonical_emit_in_spoken_order() {
    let (tx, mut rx) = mpsc::channel(32);
    let session = Session::spawn(
        test_index(),
        ScriptedStt::new(&[&["i love usa and chad"]]),
        tx,
        &fast_engine(),
    );

    session.push_audio(&[0u8; 64]).await;

    assert_eq!(next_event(&mut rx).await, "united states of america");
    assert_eq!(next_event(&mut rx).await, "chad");
    assert_silent(&mut rx).await;

    session.shutdown().await;
}

/// Scenario B: repeating a country produces exactly one event.
#[tokio::test]
async fn repeated_country_emits_once() {
    let (tx, mut rx) = mpsc::channel(32);
    let session = Session::spawn(
        test_index(),
        ScriptedStt::new(&[&["chad chad"], &["chad again"]]),
        tx,
        &fast_engine(),
    );

    session.push_audio(&[0u8; 64]).await;
    assert_eq!(next_event(&mut rx).await, "chad");

    // Re-speaking the same country on a later tick stays silent
    tokio::time::sleep(Duration::from_millis(60)).await;
    session.push_audio(&[0u8; 64]).await;
    assert_silent(&mut rx).await;

    session.shutdown().await;
}

/// Scenario C: the buffer never exceeds capacity; oldest words evict first.
#[test]
fn buffer_evicts_oldest_past_capacity() {
    let mut buf = TokenBuffer::new(3);
    buf.append(["a", "b", "c", "d"].map(str::to_string));
    assert_eq!(buf.snapshot(), "b c d");
    assert_eq!(buf.len(), 3);
}

/// Scenario D: a missing vocabulary file is an error before anything serves.
#[test]
fn missing_vocabulary_file_is_fatal() {
    let err = Vocabulary::load(std::path::Path::new("/no/such/countries.txt")).unwrap_err();
    assert!(matches!(err, Error::Vocabulary(_)));
}

/// A multi-word name split across two producer ticks is still recognized:
/// consumption never discards an incomplete prefix match.
#[tokio::test]
async fn multi_word_name_split_across_ticks() {
    let (tx, mut rx) = mpsc::channel(32);
    let session = Session::spawn(
        test_index(),
        ScriptedStt::new(&[&["united states"], &["of america"]]),
        tx,
        &fast_engine(),
    );

    session.push_audio(&[0u8; 64]).await;
    // Let the first half land and get scanned (no match yet)
    tokio::time::sleep(Duration::from_millis(80)).await;
    session.push_audio(&[0u8; 64]).await;

    assert_eq!(next_event(&mut rx).await, "united states of america");
    assert_silent(&mut rx).await;

    session.shutdown().await;
}

/// Events preserve spoken order across ticks.
#[tokio::test]
async fn order_is_preserved_across_ticks() {
    let (tx, mut rx) = mpsc::channel(32);
    let session = Session::spawn(
        test_index(),
        ScriptedStt::new(&[&["chad"], &["france"]]),
        tx,
        &fast_engine(),
    );

    session.push_audio(&[0u8; 64]).await;
    assert_eq!(next_event(&mut rx).await, "chad");

    tokio::time::sleep(Duration::from_millis(60)).await;
    session.push_audio(&[0u8; 64]).await;
    assert_eq!(next_event(&mut rx).await, "france");

    session.shutdown().await;
}

/// A failed transcription tick is logged and skipped; the loop keeps going.
#[tokio::test]
async fn transcription_error_skips_tick_and_continues() {
    let (tx, mut rx) = mpsc::channel(32);
    let session = Session::spawn(
        test_index(),
        Arc::new(FlakyStt {
            calls: Mutex::new(0),
        }),
        tx,
        &fast_engine(),
    );

    session.push_audio(&[0u8; 64]).await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    session.push_audio(&[0u8; 64]).await;

    assert_eq!(next_event(&mut rx).await, "chad");

    session.shutdown().await;
}

/// Shutdown is cooperative and prompt: both tasks acknowledge cancellation.
#[tokio::test]
async fn shutdown_terminates_both_tasks() {
    let (tx, _rx) = mpsc::channel(32);
    let session = Session::spawn(test_index(), ScriptedStt::new(&[]), tx, &fast_engine());

    session.push_audio(&[0u8; 16]).await;

    timeout(Duration::from_secs(1), session.shutdown())
        .await
        .expect("session did not shut down in time");
}
