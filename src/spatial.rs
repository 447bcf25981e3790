use crate::types::{BoundingBox, FrameDimensions};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Coarse left/center/right classification of an object within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum HorizontalBucket {
    Left,
    Center,
    Right,
}

/// Qualitative distance bucket derived from the object's apparent height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum DistanceLabel {
    #[strum(serialize = "very close")]
    VeryClose,
    #[strum(serialize = "close")]
    Close,
    #[strum(serialize = "moderate distance")]
    Moderate,
    #[strum(serialize = "far")]
    Far,
}

/// Which of the two monocular distance heuristics to apply. Neither is a
/// physical depth estimate; both derive from frame position only. A
/// deployment picks one at startup and never mixes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DistanceModel {
    /// Linear meters estimate from the box's vertical position, clamped to [0, 20].
    #[default]
    Linear,
    /// Four qualitative buckets from the box-height-to-frame-height ratio.
    Ratio,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceHint {
    Meters(f32),
    Label(DistanceLabel),
}

/// Where an object sits relative to the walker, derived from one bounding
/// box. Never persisted; recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationHint {
    pub bucket: HorizontalBucket,
    pub distance: DistanceHint,
}

/// Maps a bounding box and frame dimensions to a navigation hint.
/// Pure function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct SpatialClassifier {
    model: DistanceModel,
}

impl SpatialClassifier {
    pub fn new(model: DistanceModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> DistanceModel {
        self.model
    }

    pub fn classify(
        &self,
        bbox: &BoundingBox,
        dims: FrameDimensions,
    ) -> Result<NavigationHint, SpatialError> {
        validate_geometry(bbox, dims)?;

        let width = dims.width as f32;
        let height = dims.height as f32;

        // Strict `<` at both thirds keeps the boundary assignment deterministic.
        let center_x = (bbox.x_min + bbox.x_max) / 2.0;
        let bucket = if center_x < width / 3.0 {
            HorizontalBucket::Left
        } else if center_x < 2.0 * width / 3.0 {
            HorizontalBucket::Center
        } else {
            HorizontalBucket::Right
        };

        let distance = match self.model {
            DistanceModel::Linear => {
                let meters = (20.0 - (bbox.y_min / height) * 20.0).clamp(0.0, 20.0);
                DistanceHint::Meters(meters)
            }
            DistanceModel::Ratio => {
                let ratio = (bbox.y_max - bbox.y_min) / height;
                let label = if ratio > 0.5 {
                    DistanceLabel::VeryClose
                } else if ratio > 0.3 {
                    DistanceLabel::Close
                } else if ratio > 0.1 {
                    DistanceLabel::Moderate
                } else {
                    DistanceLabel::Far
                };
                DistanceHint::Label(label)
            }
        };

        Ok(NavigationHint { bucket, distance })
    }
}

fn validate_geometry(bbox: &BoundingBox, dims: FrameDimensions) -> Result<(), SpatialError> {
    if dims.width == 0 || dims.height == 0 {
        return Err(SpatialError::InvalidGeometry(format!(
            "zero-area frame {}x{}",
            dims.width, dims.height
        )));
    }
    if bbox.x_min > bbox.x_max || bbox.y_min > bbox.y_max {
        return Err(SpatialError::InvalidGeometry(format!(
            "inverted box ({}, {}, {}, {})",
            bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max
        )));
    }
    if bbox.x_min < 0.0
        || bbox.y_min < 0.0
        || bbox.x_max > dims.width as f32
        || bbox.y_max > dims.height as f32
    {
        return Err(SpatialError::InvalidGeometry(format!(
            "box ({}, {}, {}, {}) outside {}x{} frame",
            bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max, dims.width, dims.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameDimensions {
        FrameDimensions::new(300, 480)
    }

    fn classify(model: DistanceModel, bbox: BoundingBox) -> NavigationHint {
        SpatialClassifier::new(model).classify(&bbox, frame()).unwrap()
    }

    #[test]
    fn test_bucket_thirds() {
        let hint = classify(DistanceModel::Linear, BoundingBox::new(10.0, 0.0, 50.0, 10.0));
        assert_eq!(hint.bucket, HorizontalBucket::Left);

        let hint = classify(DistanceModel::Linear, BoundingBox::new(120.0, 0.0, 180.0, 10.0));
        assert_eq!(hint.bucket, HorizontalBucket::Center);

        let hint = classify(DistanceModel::Linear, BoundingBox::new(250.0, 0.0, 290.0, 10.0));
        assert_eq!(hint.bucket, HorizontalBucket::Right);
    }

    #[test]
    fn test_bucket_boundary_is_deterministic() {
        // center_x lands exactly on width/3 = 100: not strictly below, so center.
        let hint = classify(DistanceModel::Linear, BoundingBox::new(50.0, 0.0, 150.0, 10.0));
        assert_eq!(hint.bucket, HorizontalBucket::Center);

        // center_x exactly on 2*width/3 = 200: not strictly below, so right.
        let hint = classify(DistanceModel::Linear, BoundingBox::new(150.0, 0.0, 250.0, 10.0));
        assert_eq!(hint.bucket, HorizontalBucket::Right);
    }

    #[test]
    fn test_linear_distance_for_nearby_chair() {
        let hint = classify(DistanceModel::Linear, BoundingBox::new(10.0, 400.0, 100.0, 480.0));
        assert_eq!(hint.bucket, HorizontalBucket::Left);
        match hint.distance {
            DistanceHint::Meters(m) => assert!((m - 3.333).abs() < 0.01),
            other => panic!("expected meters, got {:?}", other),
        }
    }

    #[test]
    fn test_linear_distance_stays_in_range() {
        for y_min in [0.0, 120.0, 240.0, 360.0, 480.0] {
            let bbox = BoundingBox::new(0.0, y_min, 10.0, 480.0);
            let hint = classify(DistanceModel::Linear, bbox);
            match hint.distance {
                DistanceHint::Meters(m) => assert!((0.0..=20.0).contains(&m)),
                other => panic!("expected meters, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_ratio_buckets() {
        let cases = [
            (480.0, DistanceLabel::VeryClose), // ratio 1.0
            (200.0, DistanceLabel::Close),     // ratio ~0.42
            (80.0, DistanceLabel::Moderate),   // ratio ~0.17
            (40.0, DistanceLabel::Far),        // ratio ~0.08
        ];
        for (box_height, expected) in cases {
            let bbox = BoundingBox::new(0.0, 0.0, 10.0, box_height);
            let hint = classify(DistanceModel::Ratio, bbox);
            assert_eq!(hint.distance, DistanceHint::Label(expected));
        }
    }

    #[test]
    fn test_ratio_family_never_emits_meters() {
        let hint = classify(DistanceModel::Ratio, BoundingBox::new(0.0, 100.0, 50.0, 300.0));
        assert!(matches!(hint.distance, DistanceHint::Label(_)));
    }

    #[test]
    fn test_rejects_zero_area_frame() {
        let classifier = SpatialClassifier::new(DistanceModel::Linear);
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let err = classifier
            .classify(&bbox, FrameDimensions::new(0, 480))
            .unwrap_err();
        assert!(matches!(err, SpatialError::InvalidGeometry(_)));
    }

    #[test]
    fn test_rejects_inverted_box() {
        let classifier = SpatialClassifier::new(DistanceModel::Linear);
        let bbox = BoundingBox::new(100.0, 10.0, 50.0, 20.0);
        let err = classifier.classify(&bbox, frame()).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidGeometry(_)));
    }

    #[test]
    fn test_rejects_box_outside_frame() {
        let classifier = SpatialClassifier::new(DistanceModel::Linear);
        let bbox = BoundingBox::new(10.0, 10.0, 350.0, 20.0);
        let err = classifier.classify(&bbox, frame()).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidGeometry(_)));
    }
}
