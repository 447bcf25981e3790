use super::prompts::NavigationPrompt;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Response parsing error: {0}")]
    Parse(String),
}

/// Language-model collaborator: answers a question in the context of the
/// current surroundings description.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, surroundings: &str, question: &str)
        -> Result<String, ResponderError>;
}

#[derive(Debug, Clone)]
pub struct ResponderConfig {
    pub model_id: String,
    pub decoding_method: String,
    pub max_new_tokens: u32,
    pub repetition_penalty: f32,
    pub stop_sequences: Vec<String>,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            model_id: "ibm/granite-13b-chat-v2".to_string(),
            decoding_method: "greedy".to_string(),
            max_new_tokens: 300,
            repetition_penalty: 1.0,
            stop_sequences: vec!["\n\n".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResult {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    results: Vec<GenerationResult>,
}

/// Client for the IBM watsonx.ai text-generation endpoint. Credentials and
/// project id come from configuration, never from source.
pub struct WatsonxLlm {
    client: Client,
    api_key: String,
    project_id: String,
    base_url: String,
    config: ResponderConfig,
}

impl WatsonxLlm {
    pub fn new(api_key: String, project_id: String, base_url: String) -> Self {
        Self::with_config(api_key, project_id, base_url, ResponderConfig::default())
    }

    pub fn with_config(
        api_key: String,
        project_id: String,
        base_url: String,
        config: ResponderConfig,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60)) // LLM calls can be slow
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            project_id,
            base_url,
            config,
        }
    }

    async fn generate(&self, prompt: String) -> Result<String, ResponderError> {
        let url = format!(
            "{}/ml/v1/text/generation?version=2023-05-29",
            self.base_url
        );

        let payload = json!({
            "input": prompt,
            "model_id": self.config.model_id,
            "project_id": self.project_id,
            "parameters": {
                "decoding_method": self.config.decoding_method,
                "max_new_tokens": self.config.max_new_tokens,
                "repetition_penalty": self.config.repetition_penalty,
                "stop_sequences": self.config.stop_sequences,
            },
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ResponderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ResponderError::Parse(e.to_string()))?;

        let result = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ResponderError::Parse("empty results array".to_string()))?;

        Ok(result.generated_text.trim().to_string())
    }
}

#[async_trait]
impl Responder for WatsonxLlm {
    async fn respond(
        &self,
        surroundings: &str,
        question: &str,
    ) -> Result<String, ResponderError> {
        let prompt = NavigationPrompt::render(surroundings, question);
        log::debug!(
            "Responder prompt: {} chars of context, question: \"{}\"",
            surroundings.len(),
            question
        );
        self.generate(prompt).await
    }
}
