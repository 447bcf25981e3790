use nav_agent_rs::describe::{DescriptionComposer, EMPTY_SCENE};
use nav_agent_rs::llm::NavigationPrompt;
use nav_agent_rs::spatial::DistanceModel;
use nav_agent_rs::types::{BoundingBox, Detection, DetectionBatch, FrameDimensions};

fn detection(label: &str, bbox: BoundingBox) -> Detection {
    Detection {
        label: label.to_string(),
        confidence: Some(0.9),
        bbox,
    }
}

fn office_scene() -> DetectionBatch {
    DetectionBatch {
        detections: vec![
            detection("laptop", BoundingBox::new(50.0, 60.0, 150.0, 200.0)),
            detection("chair", BoundingBox::new(250.0, 120.0, 350.0, 300.0)),
            detection("book", BoundingBox::new(450.0, 384.0, 550.0, 430.0)),
        ],
        dimensions: FrameDimensions::new(600, 480),
    }
}

#[test]
fn test_linear_family_full_scene() {
    let composer = DescriptionComposer::new(DistanceModel::Linear);
    assert_eq!(
        composer.compose(&office_scene()),
        "A laptop is on the left, approximately 17.5 meters away. \
         A chair is on the center, approximately 15.0 meters away. \
         A book is on the right, approximately 4.0 meters away."
    );
}

#[test]
fn test_ratio_family_full_scene() {
    let composer = DescriptionComposer::new(DistanceModel::Ratio);
    assert_eq!(
        composer.compose(&office_scene()),
        "A laptop is moderate distance to your left. \
         A chair is close to your center. \
         A book is far to your right."
    );
}

#[test]
fn test_description_feeds_prompt_template() {
    let composer = DescriptionComposer::new(DistanceModel::Linear);
    let description = composer.compose(&office_scene());

    let prompt = NavigationPrompt::render(&description, "How do I get to the nearest chair?");
    assert!(prompt.contains(&description));
    assert!(prompt.contains("How do I get to the nearest chair?"));
}

#[test]
fn test_empty_scene_feeds_prompt_template() {
    let composer = DescriptionComposer::new(DistanceModel::Linear);
    let description = composer.compose(&DetectionBatch::empty(FrameDimensions::new(600, 480)));
    assert_eq!(description, EMPTY_SCENE);

    // Degenerate context must not break prompting downstream.
    let prompt = NavigationPrompt::render(&description, "What is around me?");
    assert!(prompt.contains(EMPTY_SCENE));
}
