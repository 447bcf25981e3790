pub mod camera;
pub mod config;
pub mod describe;
pub mod detector;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod spatial;
pub mod stt;
pub mod tts;
pub mod types;

pub use error::{NavError, Result};
