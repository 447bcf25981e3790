use crate::types::{Frame, FrameDimensions};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Image decode error: {0}")]
    Decode(String),
    #[error("Snapshot request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Camera API error: status {0}")]
    Api(u16),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Frame source exhausted")]
    Exhausted,
}

/// Source of encoded image frames for the detection loop.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<Frame, CameraError>;
}

fn frame_from_bytes(data: Vec<u8>) -> Result<Frame, CameraError> {
    let img = image::load_from_memory(&data).map_err(|e| CameraError::Decode(e.to_string()))?;
    Ok(Frame {
        dimensions: FrameDimensions::new(img.width(), img.height()),
        data,
    })
}

/// Yields a single still image from disk, then reports exhaustion.
pub struct FileFrameSource {
    path: PathBuf,
    taken: bool,
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            taken: false,
        }
    }
}

#[async_trait]
impl FrameSource for FileFrameSource {
    async fn next_frame(&mut self) -> Result<Frame, CameraError> {
        if self.taken {
            return Err(CameraError::Exhausted);
        }
        self.taken = true;

        let data = tokio::fs::read(&self.path).await?;
        let frame = frame_from_bytes(data)?;
        log::info!(
            "Loaded {} ({}x{})",
            self.path.display(),
            frame.dimensions.width,
            frame.dimensions.height
        );
        Ok(frame)
    }
}

/// Fetches a JPEG snapshot from a network camera URL on every call.
pub struct HttpCameraSource {
    client: Client,
    url: String,
}

impl HttpCameraSource {
    pub fn new(url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, url }
    }
}

#[async_trait]
impl FrameSource for HttpCameraSource {
    async fn next_frame(&mut self) -> Result<Frame, CameraError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CameraError::Api(status.as_u16()));
        }

        let data = response.bytes().await?.to_vec();
        frame_from_bytes(data)
    }
}
