use crate::types::{BoundingBox, Detection, DetectionBatch, Frame};
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Detector unavailable: {0}")]
    Unavailable(String),
    #[error("Detection failed: {status} - {message}")]
    Failed { status: u16, message: String },
    #[error("Response parsing error: {0}")]
    Parse(String),
}

/// Object detection collaborator. The model itself is external; the crate
/// only consumes its label/confidence/box output.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, frame: &Frame) -> Result<DetectionBatch, DetectorError>;
}

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Model name the inference server loads, e.g. "yolov5s".
    pub model: String,
    /// Detections below this confidence are dropped client-side.
    pub min_confidence: f32,
    pub timeout: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model: "yolov5s".to_string(),
            min_confidence: 0.25,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Wire format of one detection row as the inference endpoint returns it.
#[derive(Debug, Deserialize)]
struct DetectionRow {
    label: String,
    confidence: Option<f32>,
    #[serde(rename = "box")]
    bbox: [f32; 4],
}

#[derive(Debug, Deserialize)]
struct DetectionResponse {
    detections: Vec<DetectionRow>,
}

/// Detector backed by a remote inference endpoint: posts the encoded frame
/// as base64 JSON and parses the returned detection rows.
pub struct HttpDetector {
    client: Client,
    endpoint: String,
    config: DetectorConfig,
}

impl HttpDetector {
    pub fn new(endpoint: String) -> Self {
        Self::with_config(endpoint, DetectorConfig::default())
    }

    pub fn with_config(endpoint: String, config: DetectorConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint,
            config,
        }
    }

    fn parse_batch(&self, body: &str, frame: &Frame) -> Result<DetectionBatch, DetectorError> {
        let response: DetectionResponse = serde_json::from_str(body)
            .map_err(|e| DetectorError::Parse(format!("invalid detection payload: {}", e)))?;

        let detections = response
            .detections
            .into_iter()
            .filter(|row| row.confidence.unwrap_or(1.0) >= self.config.min_confidence)
            .map(|row| Detection {
                label: row.label,
                confidence: row.confidence,
                bbox: BoundingBox::new(row.bbox[0], row.bbox[1], row.bbox[2], row.bbox[3]),
            })
            .collect();

        Ok(DetectionBatch {
            detections,
            dimensions: frame.dimensions,
        })
    }
}

#[async_trait]
impl Detector for HttpDetector {
    async fn detect(&self, frame: &Frame) -> Result<DetectionBatch, DetectorError> {
        let payload = json!({
            "model": self.config.model,
            "image": base64::engine::general_purpose::STANDARD.encode(&frame.data),
            "width": frame.dimensions.width,
            "height": frame.dimensions.height,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| DetectorError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DetectorError::Failed {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DetectorError::Parse(e.to_string()))?;

        let batch = self.parse_batch(&body, frame)?;
        log::debug!(
            "Detector returned {} detections for {}x{} frame",
            batch.detections.len(),
            frame.dimensions.width,
            frame.dimensions.height
        );
        Ok(batch)
    }
}
