use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavError>;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("Spatial error: {0}")]
    Spatial(#[from] crate::spatial::SpatialError),

    #[error("Detector error: {0}")]
    Detector(#[from] crate::detector::DetectorError),

    #[error("Camera error: {0}")]
    Camera(#[from] crate::camera::CameraError),

    #[error("Speech output error: {0}")]
    Tts(#[from] crate::tts::TtsError),

    #[error("Speech input error: {0}")]
    Stt(#[from] crate::stt::SttError),

    #[error("Responder error: {0}")]
    Responder(#[from] crate::llm::ResponderError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
