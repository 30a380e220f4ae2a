// src/scene.rs

use crate::types::{
    Distance, Environment, Motion, ObjectFacts, ObjectType, Scene, SceneFacts, SceneObject,
    TrafficLight, Visibility,
};

/// Fills in whatever the facts leave out and sorts objects by
/// (type, distance, motion), so equal facts always give equal scenes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneNormalizer;

impl SceneNormalizer {
    pub fn normalize(&self, facts: &SceneFacts) -> Scene {
        let mut objects: Vec<SceneObject> = facts
            .objects
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(normalize_object)
            .collect();
        objects.sort();

        Scene {
            objects,
            traffic_light: facts.traffic_light.unwrap_or(TrafficLight::Unknown),
            visibility: facts.visibility.unwrap_or(Visibility::Clear),
            environment: facts.environment.unwrap_or(Environment::OpenArea),
        }
    }
}

fn normalize_object(obj: &ObjectFacts) -> SceneObject {
    SceneObject {
        kind: obj.kind.unwrap_or(ObjectType::Obstacle),
        distance: obj.distance.unwrap_or(Distance::Far),
        motion: obj.motion.unwrap_or(Motion::Static),
    }
}
