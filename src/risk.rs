// src/risk.rs
//
// Rule-based hazard scoring. Rules run in a fixed order and may only raise
// the level; HIGH is absorbing.

use crate::types::{
    Distance, Motion, ObjectType, RiskAssessment, RiskLevel, Scene, TrafficLight, Visibility,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAssessor;

impl RiskAssessor {
    pub fn assess(&self, scene: &Scene) -> RiskAssessment {
        let mut acc = RiskAccumulator::new();

        for obj in &scene.objects {
            match obj.distance {
                Distance::Near => {
                    acc.raise(RiskLevel::High);
                    acc.note(format!("near {}", obj.kind.as_str()));
                }
                Distance::Medium if acc.level != RiskLevel::High => {
                    acc.raise(RiskLevel::Medium);
                    acc.note(format!("medium {}", obj.kind.as_str()));
                }
                Distance::Medium | Distance::Far => {}
            }

            // Noted even when the level is already at or above MEDIUM.
            match (obj.motion, obj.kind) {
                (Motion::Moving, ObjectType::Pedestrian | ObjectType::Vehicle) => {
                    acc.raise(RiskLevel::Medium);
                    acc.note(format!("moving {}", obj.kind.as_str()));
                }
                (Motion::Moving, ObjectType::Obstacle) | (Motion::Static, _) => {}
            }
        }

        match scene.traffic_light {
            TrafficLight::Red => {
                acc.raise(RiskLevel::High);
                acc.note("traffic light red");
            }
            TrafficLight::Unknown if acc.level == RiskLevel::Low => {
                acc.raise(RiskLevel::Medium);
                acc.note("traffic light unknown");
            }
            TrafficLight::Unknown | TrafficLight::Green => {}
        }

        match scene.visibility {
            Visibility::Low if acc.level != RiskLevel::High => {
                acc.raise(RiskLevel::Medium);
                acc.note("low visibility");
            }
            Visibility::Low | Visibility::Clear => {}
        }

        let assessment = acc.finish();
        debug!(
            "risk: {:?} from [{}]",
            assessment.level,
            assessment.factors.join(", ")
        );
        assessment
    }
}

/// Level that can only go up, plus an insertion-ordered set of factors.
#[derive(Debug)]
struct RiskAccumulator {
    level: RiskLevel,
    factors: Vec<String>,
}

impl RiskAccumulator {
    fn new() -> Self {
        Self {
            level: RiskLevel::Low,
            factors: Vec::new(),
        }
    }

    fn raise(&mut self, to: RiskLevel) {
        self.level = self.level.max(to);
    }

    fn note(&mut self, factor: impl Into<String>) {
        let factor = factor.into();
        if !self.factors.contains(&factor) {
            self.factors.push(factor);
        }
    }

    fn finish(self) -> RiskAssessment {
        RiskAssessment {
            level: self.level,
            factors: self.factors,
        }
    }
}
