//! Speech-to-text collaborator
//!
//! The engine treats transcription as a black box: audio bytes in, zero or
//! more lowercase-ready text segments out. The production backend posts the
//! audio to the OpenAI Whisper transcription API.

use async_trait::async_trait;

use crate::{Error, Result};

/// Response from the OpenAI Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Converts a buffer of audio into text segments
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe accumulated audio bytes into zero or more text segments
    ///
    /// # Errors
    ///
    /// Returns an error when transcription fails; callers treat the tick as
    /// empty and continue.
    async fn transcribe(&self, audio: &[u8]) -> Result<Vec<String>>;
}

/// Whisper-backed transcriber
#[derive(Debug)]
pub struct WhisperStt {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl WhisperStt {
    /// Create a Whisper transcriber
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the API key is missing — a fatal startup
    /// condition, since no session can transcribe without it.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "OpenAI API key required for Whisper".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl Transcriber for WhisperStt {
    async fn transcribe(&self, audio: &[u8]) -> Result<Vec<String>> {
        tracing::debug!(audio_bytes = audio.len(), "starting Whisper transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name("audio.webm")
                    .mime_str("audio/webm")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse Whisper response");
            e
        })?;

        tracing::debug!(transcript = %result.text, "transcription complete");

        if result.text.trim().is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![result.text])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        let err = WhisperStt::new(String::new(), "whisper-1".to_string()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn whisper_response_deserializes() {
        let parsed: WhisperResponse =
            serde_json::from_str(r#"{"text":"i love usa"}"#).unwrap();
        assert_eq!(parsed.text, "i love usa");
    }
}
