use crate::camera::{CameraError, FrameSource};
use crate::describe::{DescriptionComposer, EMPTY_SCENE};
use crate::detector::Detector;
use crate::llm::{Responder, SpokenNotices};
use crate::stt::SpeechInput;
use crate::tts::{speak_best_effort, SpeechOutput};
use crate::types::Frame;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Detect and describe one frame. Detector failures degrade to the
/// empty-scene description so speech and prompting stay well-defined.
pub async fn describe_frame(
    frame: &Frame,
    detector: &dyn Detector,
    composer: &DescriptionComposer,
) -> String {
    match detector.detect(frame).await {
        Ok(batch) => composer.compose(&batch),
        Err(e) => {
            log::warn!("Detection failed, describing empty scene: {}", e);
            EMPTY_SCENE.to_string()
        }
    }
}

/// Spawn the capture/detect task. The latest description is published
/// through a single-slot watch channel: readers always see the newest value
/// atomically and older values are dropped, never queued.
pub fn spawn_capture_loop(
    mut source: Box<dyn FrameSource>,
    detector: Arc<dyn Detector>,
    composer: DescriptionComposer,
    interval: Duration,
    cancel: CancellationToken,
) -> (watch::Receiver<String>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(EMPTY_SCENE.to_string());

    let handle = tokio::spawn(async move {
        loop {
            if cancel.is_cancelled() {
                break;
            }

            let frame = match source.next_frame().await {
                Ok(frame) => frame,
                Err(CameraError::Exhausted) => {
                    log::info!("Frame source exhausted, stopping capture loop");
                    break;
                }
                Err(e) => {
                    log::warn!("Frame capture failed: {}", e);
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => continue,
                        _ = cancel.cancelled() => break,
                    }
                }
            };

            let description = describe_frame(&frame, detector.as_ref(), &composer).await;
            log::debug!("Published description: {}", description);
            if tx.send(description).is_err() {
                // All readers gone, nothing left to describe for.
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = cancel.cancelled() => break,
            }
        }
        log::info!("Capture loop stopped");
    });

    (rx, handle)
}

/// One command cycle: speak the current surroundings, take a question,
/// answer it. Speech failures are logged and skipped; a responder failure is
/// announced as a failure, never covered by a stale prior answer.
pub async fn handle_command(
    description: &str,
    speech_in: &dyn SpeechInput,
    speech_out: &dyn SpeechOutput,
    responder: &dyn Responder,
) {
    speak_best_effort(speech_out, description).await;

    let Some(question) = speech_in.listen().await else {
        log::info!("No question recognized, returning to capture loop");
        speak_best_effort(speech_out, SpokenNotices::no_question()).await;
        return;
    };

    match responder.respond(description, &question).await {
        Ok(answer) => {
            println!("Assistant: {}", answer);
            speak_best_effort(speech_out, &answer).await;
        }
        Err(e) => {
            log::error!("Responder failed: {}", e);
            speak_best_effort(speech_out, SpokenNotices::responder_failure()).await;
        }
    }
}

/// Command loop for live mode: each Enter keypress reads the newest
/// description from the capture task and runs one command cycle. Stops on
/// cancellation or end of stdin.
pub async fn run_live(
    mut descriptions: watch::Receiver<String>,
    speech_in: Arc<dyn SpeechInput>,
    speech_out: Arc<dyn SpeechOutput>,
    responder: Arc<dyn Responder>,
    cancel: CancellationToken,
) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    println!("Press Enter to hear your surroundings and ask a question. Ctrl+C to exit.");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => {
                match line {
                    Ok(Some(_)) => {
                        let description = descriptions.borrow_and_update().clone();
                        println!("Surroundings: {}", description);
                        handle_command(
                            &description,
                            speech_in.as_ref(),
                            speech_out.as_ref(),
                            responder.as_ref(),
                        )
                        .await;
                    }
                    Ok(None) => break, // stdin closed
                    Err(e) => {
                        log::error!("Failed to read command input: {}", e);
                        break;
                    }
                }
            }
        }
    }
    log::info!("Command loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::DetectorError;
    use crate::spatial::DistanceModel;
    use crate::types::{BoundingBox, Detection, DetectionBatch, FrameDimensions};
    use async_trait::async_trait;

    struct FixedDetector(Result<Vec<Detection>, ()>);

    #[async_trait]
    impl Detector for FixedDetector {
        async fn detect(&self, frame: &Frame) -> Result<DetectionBatch, DetectorError> {
            match &self.0 {
                Ok(detections) => Ok(DetectionBatch {
                    detections: detections.clone(),
                    dimensions: frame.dimensions,
                }),
                Err(()) => Err(DetectorError::Unavailable("model not loaded".to_string())),
            }
        }
    }

    fn frame() -> Frame {
        Frame {
            data: vec![0u8; 8],
            dimensions: FrameDimensions::new(300, 480),
        }
    }

    #[tokio::test]
    async fn test_describe_frame_renders_detections() {
        let detector = FixedDetector(Ok(vec![Detection {
            label: "chair".to_string(),
            confidence: Some(0.9),
            bbox: BoundingBox::new(10.0, 400.0, 100.0, 480.0),
        }]));
        let composer = DescriptionComposer::new(DistanceModel::Linear);

        let description = describe_frame(&frame(), &detector, &composer).await;
        assert_eq!(
            description,
            "A chair is on the left, approximately 3.3 meters away."
        );
    }

    #[tokio::test]
    async fn test_describe_frame_degrades_to_empty_scene_on_detector_failure() {
        let detector = FixedDetector(Err(()));
        let composer = DescriptionComposer::new(DistanceModel::Linear);

        let description = describe_frame(&frame(), &detector, &composer).await;
        assert_eq!(description, EMPTY_SCENE);
    }
}
