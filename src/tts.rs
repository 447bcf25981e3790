use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Audio sink error: {0}")]
    Sink(String),
}

/// Speech output collaborator. Best-effort: the pipeline logs failures and
/// keeps running.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), TtsError>;
}

/// Destination for synthesized audio bytes.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, audio: &[u8]) -> Result<(), TtsError>;
}

/// Writes each utterance to a numbered file for an external player to pick
/// up. Keeps audio-device handling out of the agent.
pub struct FileSink {
    dir: PathBuf,
    counter: AtomicU64,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl AudioSink for FileSink {
    async fn play(&self, audio: &[u8]) -> Result<(), TtsError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!("utterance-{:04}.mp3", n));
        tokio::fs::write(&path, audio)
            .await
            .map_err(|e| TtsError::Sink(format!("failed to write {}: {}", path.display(), e)))?;
        log::info!("Wrote synthesized speech to {}", path.display());
        Ok(())
    }
}

/// Discards audio. Used in tests and dry runs.
pub struct NullSink;

#[async_trait]
impl AudioSink for NullSink {
    async fn play(&self, _audio: &[u8]) -> Result<(), TtsError> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TtsConfig {
    pub voice_id: String,
    pub model: String,
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(), // Rachel voice
            model: "eleven_multilingual_v2".to_string(),
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

pub struct ElevenLabsTts {
    client: Client,
    api_key: String,
    base_url: String,
    config: TtsConfig,
    sink: Arc<dyn AudioSink>,
}

impl ElevenLabsTts {
    pub fn new(api_key: String, sink: Arc<dyn AudioSink>) -> Self {
        Self::with_config(api_key, TtsConfig::default(), sink)
    }

    pub fn with_config(api_key: String, config: TtsConfig, sink: Arc<dyn AudioSink>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url: "https://api.elevenlabs.io/v1".to_string(),
            config,
            sink,
        }
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let url = format!("{}/text-to-speech/{}", self.base_url, self.config.voice_id);

        let payload = json!({
            "text": text,
            "model_id": self.config.model,
            "voice_settings": {
                "stability": self.config.stability,
                "similarity_boost": self.config.similarity_boost,
            }
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "audio/mpeg")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TtsError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SpeechOutput for ElevenLabsTts {
    async fn speak(&self, text: &str) -> Result<(), TtsError> {
        let audio = self.synthesize(text).await?;
        log::debug!("Synthesized {} bytes for {} chars", audio.len(), text.len());
        self.sink.play(&audio).await
    }
}

/// Speak with best-effort delivery: log failure, never propagate.
pub async fn speak_best_effort(output: &dyn SpeechOutput, text: &str) {
    if let Err(e) = output.speak(text).await {
        log::error!("Speech output failed (continuing): {}", e);
    }
}
