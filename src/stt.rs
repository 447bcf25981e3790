use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SttError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Audio error: {0}")]
    Audio(String),
    #[error("Response parsing error: {0}")]
    Parse(String),
}

/// Speech input collaborator. `None` means "no command" (unintelligible
/// audio, nothing recorded, or a service hiccup) and is never an error for
/// the caller.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    async fn listen(&self) -> Option<String>;
}

/// Source of recorded WAV audio to transcribe.
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn record(&self) -> Result<Vec<u8>, SttError>;
}

/// Reads a pre-recorded WAV question from disk. The header is validated with
/// hound before upload so malformed files are caught locally.
pub struct WavFileSource {
    path: PathBuf,
}

impl WavFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AudioSource for WavFileSource {
    async fn record(&self) -> Result<Vec<u8>, SttError> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SttError::Audio(format!("failed to read {}: {}", self.path.display(), e)))?;

        let reader = hound::WavReader::new(Cursor::new(&data))
            .map_err(|e| SttError::Audio(format!("not a valid WAV file: {}", e)))?;
        let spec = reader.spec();
        let seconds = reader.duration() as f32 / spec.sample_rate as f32;
        log::debug!(
            "Question audio: {:.1}s at {} Hz, {} channel(s)",
            seconds,
            spec.sample_rate,
            spec.channels
        );

        Ok(data)
    }
}

/// Speech input that never hears anything. Used when no recording source is
/// configured; the pipeline treats the absence as "no command."
pub struct NoInput;

#[async_trait]
impl SpeechInput for NoInput {
    async fn listen(&self) -> Option<String> {
        log::debug!("No speech input configured");
        None
    }
}

#[derive(Debug, Clone)]
pub struct SttConfig {
    pub model: String,
    pub language: Option<String>,
    pub temperature: f32,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "whisper-large-v3".to_string(),
            language: None, // No biasing - let it transcribe naturally
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper transcription over the Groq audio endpoint.
pub struct WhisperStt {
    client: Client,
    api_key: String,
    base_url: String,
    config: SttConfig,
    source: Arc<dyn AudioSource>,
}

impl WhisperStt {
    pub fn new(api_key: String, source: Arc<dyn AudioSource>) -> Self {
        Self::with_config(api_key, SttConfig::default(), source)
    }

    pub fn with_config(api_key: String, config: SttConfig, source: Arc<dyn AudioSource>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            config,
            source,
        }
    }

    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, SttError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let file = Part::bytes(audio)
            .file_name("question.wav")
            .mime_str("audio/wav")?;
        let mut form = Form::new()
            .part("file", file)
            .text("model", self.config.model.clone())
            .text("temperature", self.config.temperature.to_string());
        if let Some(language) = &self.config.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SttError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SttError::Parse(e.to_string()))?;

        Ok(body.text.trim().to_string())
    }
}

#[async_trait]
impl SpeechInput for WhisperStt {
    async fn listen(&self) -> Option<String> {
        log::info!("Listening for input...");

        let audio = match self.source.record().await {
            Ok(audio) => audio,
            Err(e) => {
                log::warn!("Could not record audio: {}", e);
                return None;
            }
        };

        match self.transcribe(audio).await {
            Ok(text) if text.is_empty() => {
                log::info!("Sorry, I did not understand that.");
                None
            }
            Ok(text) => {
                log::info!("User said: {}", text);
                Some(text)
            }
            Err(e) => {
                log::warn!("Speech service unavailable: {}", e);
                None
            }
        }
    }
}
