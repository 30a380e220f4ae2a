// src/explanation.rs

use crate::types::{Action, RiskAssessment};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExplanationGenerator;

impl ExplanationGenerator {
    pub fn explain(&self, action: Action, risk: &RiskAssessment) -> String {
        if risk.factors.is_empty() {
            return match action {
                Action::Proceed => "Proceed; no hazards detected.",
                Action::SlowDown => "Slow down as a precaution in low-information conditions.",
                Action::Stop => "Stop due to missing or uncertain scene data.",
            }
            .to_string();
        }

        let factors = risk.factors.join(", ");
        match action {
            Action::Stop => format!("Stop because of {factors}."),
            Action::SlowDown => format!("Slow down; watch for {factors}."),
            Action::Proceed => format!("Proceed with caution; noted {factors}."),
        }
    }
}
