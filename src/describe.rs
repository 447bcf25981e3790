use crate::spatial::{DistanceHint, DistanceModel, SpatialClassifier};
use crate::types::DetectionBatch;

/// Spoken instead of an empty string when a frame yields no detections, so
/// downstream prompt context is never blank.
pub const EMPTY_SCENE: &str = "No objects detected.";

/// Renders a detection batch into one natural-language surroundings
/// description, used both for speech output and as prompt context.
#[derive(Debug, Clone, Copy)]
pub struct DescriptionComposer {
    classifier: SpatialClassifier,
}

impl DescriptionComposer {
    pub fn new(model: DistanceModel) -> Self {
        Self {
            classifier: SpatialClassifier::new(model),
        }
    }

    /// Compose one sentence per detection, in detector order, joined with a
    /// single space. A detection with malformed geometry is skipped and the
    /// rest of the batch is still rendered.
    pub fn compose(&self, batch: &DetectionBatch) -> String {
        let mut sentences = Vec::with_capacity(batch.detections.len());

        for detection in &batch.detections {
            match self.classifier.classify(&detection.bbox, batch.dimensions) {
                Ok(hint) => {
                    let sentence = match hint.distance {
                        DistanceHint::Meters(meters) => format!(
                            "A {} is on the {}, approximately {:.1} meters away.",
                            detection.label, hint.bucket, meters
                        ),
                        DistanceHint::Label(label) => format!(
                            "A {} is {} to your {}.",
                            detection.label, label, hint.bucket
                        ),
                    };
                    sentences.push(sentence);
                }
                Err(e) => {
                    log::warn!("Skipping detection '{}': {}", detection.label, e);
                }
            }
        }

        if sentences.is_empty() {
            return EMPTY_SCENE.to_string();
        }

        sentences.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, Detection, DetectionBatch, FrameDimensions};

    fn detection(label: &str, bbox: BoundingBox) -> Detection {
        Detection {
            label: label.to_string(),
            confidence: Some(0.9),
            bbox,
        }
    }

    fn batch(detections: Vec<Detection>) -> DetectionBatch {
        DetectionBatch {
            detections,
            dimensions: FrameDimensions::new(300, 480),
        }
    }

    #[test]
    fn test_linear_family_sentence() {
        let composer = DescriptionComposer::new(DistanceModel::Linear);
        let description = composer.compose(&batch(vec![detection(
            "chair",
            BoundingBox::new(10.0, 400.0, 100.0, 480.0),
        )]));
        assert_eq!(
            description,
            "A chair is on the left, approximately 3.3 meters away."
        );
    }

    #[test]
    fn test_ratio_family_sentence() {
        let composer = DescriptionComposer::new(DistanceModel::Ratio);
        let description = composer.compose(&batch(vec![detection(
            "chair",
            BoundingBox::new(10.0, 400.0, 100.0, 480.0),
        )]));
        assert_eq!(description, "A chair is moderate distance to your left.");
    }

    #[test]
    fn test_empty_batch_composes_empty_scene() {
        let composer = DescriptionComposer::new(DistanceModel::Linear);
        assert_eq!(composer.compose(&batch(vec![])), EMPTY_SCENE);
    }

    #[test]
    fn test_preserves_detector_order() {
        let composer = DescriptionComposer::new(DistanceModel::Linear);
        let description = composer.compose(&batch(vec![
            detection("laptop", BoundingBox::new(10.0, 60.0, 90.0, 120.0)),
            detection("bottle", BoundingBox::new(220.0, 60.0, 280.0, 120.0)),
        ]));
        let laptop = description.find("laptop").unwrap();
        let bottle = description.find("bottle").unwrap();
        assert!(laptop < bottle);
        assert_eq!(
            description,
            "A laptop is on the left, approximately 17.5 meters away. \
             A bottle is on the right, approximately 17.5 meters away."
        );
    }

    #[test_log::test]
    fn test_invalid_detection_is_skipped_not_fatal() {
        let composer = DescriptionComposer::new(DistanceModel::Linear);
        let description = composer.compose(&batch(vec![
            detection("ghost", BoundingBox::new(90.0, 10.0, 50.0, 20.0)), // inverted
            detection("chair", BoundingBox::new(10.0, 400.0, 100.0, 480.0)),
        ]));
        assert_eq!(
            description,
            "A chair is on the left, approximately 3.3 meters away."
        );
    }

    #[test]
    fn test_all_invalid_detections_fall_back_to_empty_scene() {
        let composer = DescriptionComposer::new(DistanceModel::Linear);
        let description = composer.compose(&batch(vec![detection(
            "ghost",
            BoundingBox::new(90.0, 10.0, 50.0, 20.0),
        )]));
        assert_eq!(description, EMPTY_SCENE);
    }
}
