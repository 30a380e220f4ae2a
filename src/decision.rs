// src/decision.rs

use crate::types::{Action, RiskAssessment, RiskLevel, Scene, TrafficLight, Visibility};

/// First matching rule wins; a red light overrides everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionResolver;

impl DecisionResolver {
    pub fn decide(&self, scene: &Scene, risk: &RiskAssessment) -> Action {
        if scene.traffic_light == TrafficLight::Red {
            return Action::Stop;
        }

        match risk.level {
            RiskLevel::High => return Action::Stop,
            RiskLevel::Medium => return Action::SlowDown,
            RiskLevel::Low => {}
        }

        if scene.visibility == Visibility::Low {
            return Action::SlowDown;
        }

        match (scene.objects.is_empty(), scene.traffic_light) {
            (true, TrafficLight::Green) => Action::Proceed,
            // Nothing in view and no light to go on.
            (true, TrafficLight::Red | TrafficLight::Unknown) => Action::SlowDown,
            (false, _) => Action::Proceed,
        }
    }
}
