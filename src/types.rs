/// Axis-aligned rectangle in pixel coordinates delimiting a detected object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }
}

/// One object instance identified by the vision model in a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub label: String,
    pub confidence: Option<f32>,
    pub bbox: BoundingBox,
}

/// Width and height of the image a detection batch was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

impl FrameDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// An encoded (JPEG/PNG) image plus its pixel dimensions.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub dimensions: FrameDimensions,
}

/// Everything one detector invocation returns. Consumed by a single
/// classification pass and discarded when the next batch arrives; no
/// identity is carried across frames.
#[derive(Debug, Clone)]
pub struct DetectionBatch {
    pub detections: Vec<Detection>,
    pub dimensions: FrameDimensions,
}

impl DetectionBatch {
    pub fn empty(dimensions: FrameDimensions) -> Self {
        Self {
            detections: Vec::new(),
            dimensions,
        }
    }
}
