// src/types.rs

use serde::{Deserialize, Serialize};

// ============================================================================
// CLOSED SCENE VOCABULARY
// ============================================================================
//
// Variant order is the lexical order of the wire names, so the derived `Ord`
// sorts objects exactly as their serialized strings would.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Obstacle,
    Pedestrian,
    Vehicle,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Obstacle => "obstacle",
            ObjectType::Pedestrian => "pedestrian",
            ObjectType::Vehicle => "vehicle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    Far,
    Medium,
    Near,
}

impl Distance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Distance::Far => "far",
            Distance::Medium => "medium",
            Distance::Near => "near",
        }
    }
}

/// Always `Static` when produced by the analyzer: a single frame carries no
/// temporal signal. `Moving` only arrives through externally supplied facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    Moving,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLight {
    Red,
    Green,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Clear,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Urban,
    Indoor,
    OpenArea,
}

// ============================================================================
// FRAMES
// ============================================================================

/// Decoded RGB pixel grid, row-major and channel-interleaved.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Self {
        Self {
            data,
            width,
            height,
            channels: 3,
        }
    }

    pub fn from_rgb_image(image: image::RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width as usize, height as usize)
    }

    /// Solid-color frame, mostly useful for synthetic scenes.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self::new(data, width, height)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width + x) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

// ============================================================================
// VISION OUTPUT
// ============================================================================

/// Axis-aligned box in pixel coordinates; width and height are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectedObject {
    pub kind: ObjectType,
    pub distance: Distance,
    pub motion: Motion,
    pub area: f64,
    pub bbox: BoundingBox,
}

/// What the analyzer saw in one frame, objects in detection order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScene {
    pub objects: Vec<DetectedObject>,
    pub traffic_light: TrafficLight,
    pub visibility: Visibility,
    pub environment: Environment,
}

// ============================================================================
// SCENE FACTS (normalizer input)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectFacts {
    #[serde(rename = "type", default)]
    pub kind: Option<ObjectType>,
    #[serde(default)]
    pub distance: Option<Distance>,
    #[serde(default)]
    pub motion: Option<Motion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

/// Possibly-partial scene record. Anything missing is filled in by
/// [`crate::scene::SceneNormalizer`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFacts {
    #[serde(default)]
    pub objects: Option<Vec<ObjectFacts>>,
    #[serde(default)]
    pub traffic_light: Option<TrafficLight>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub environment: Option<Environment>,
}

impl From<&DetectedObject> for ObjectFacts {
    fn from(obj: &DetectedObject) -> Self {
        Self {
            kind: Some(obj.kind),
            distance: Some(obj.distance),
            motion: Some(obj.motion),
            bbox: Some(obj.bbox),
        }
    }
}

impl From<RawScene> for SceneFacts {
    fn from(raw: RawScene) -> Self {
        Self {
            objects: Some(raw.objects.iter().map(ObjectFacts::from).collect()),
            traffic_light: Some(raw.traffic_light),
            visibility: Some(raw.visibility),
            environment: Some(raw.environment),
        }
    }
}

// ============================================================================
// NORMALIZED SCENE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SceneObject {
    #[serde(rename = "type")]
    pub kind: ObjectType,
    pub distance: Distance,
    pub motion: Motion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub traffic_light: TrafficLight,
    pub visibility: Visibility,
    pub environment: Environment,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            traffic_light: TrafficLight::Unknown,
            visibility: Visibility::Clear,
            environment: Environment::OpenArea,
        }
    }
}

impl From<&Scene> for SceneFacts {
    fn from(scene: &Scene) -> Self {
        Self {
            objects: Some(
                scene
                    .objects
                    .iter()
                    .map(|o| ObjectFacts {
                        kind: Some(o.kind),
                        distance: Some(o.distance),
                        motion: Some(o.motion),
                        bbox: None,
                    })
                    .collect(),
            ),
            traffic_light: Some(scene.traffic_light),
            visibility: Some(scene.visibility),
            environment: Some(scene.environment),
        }
    }
}

// ============================================================================
// RISK / DECISION
// ============================================================================

/// Ordered so that `max` is escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Proceed,
    SlowDown,
    Stop,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Proceed => "PROCEED",
            Action::SlowDown => "SLOW_DOWN",
            Action::Stop => "STOP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub scene: Scene,
    pub risk: RiskAssessment,
    pub action: Action,
    pub explanation: String,
}
