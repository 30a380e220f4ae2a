// src/pipeline/stage.rs
//
// Linear stage machine for one evaluation. The only branch is
// Analyzing → Failed, taken when perception errors out.

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineStage {
    Idle,
    Analyzing,
    Normalizing,
    AssessingRisk,
    Deciding,
    Explaining,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn next(self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Idle => Some(PipelineStage::Analyzing),
            PipelineStage::Analyzing => Some(PipelineStage::Normalizing),
            PipelineStage::Normalizing => Some(PipelineStage::AssessingRisk),
            PipelineStage::AssessingRisk => Some(PipelineStage::Deciding),
            PipelineStage::Deciding => Some(PipelineStage::Explaining),
            PipelineStage::Explaining => Some(PipelineStage::Done),
            PipelineStage::Done | PipelineStage::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }
}

/// Every stage an evaluation passed through, starting at `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTrace {
    stages: Vec<PipelineStage>,
}

impl StageTrace {
    pub fn new() -> Self {
        Self {
            stages: vec![PipelineStage::Idle],
        }
    }

    pub fn current(&self) -> PipelineStage {
        *self.stages.last().unwrap_or(&PipelineStage::Idle)
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    /// Move to the successor stage. Terminal stages stay put.
    pub fn advance(&mut self) -> PipelineStage {
        if let Some(next) = self.current().next() {
            debug!("stage: {:?} -> {:?}", self.current(), next);
            self.stages.push(next);
        }
        self.current()
    }

    /// Only perception can fail; from any other stage this is a no-op.
    pub fn fail(&mut self) -> PipelineStage {
        if self.current() == PipelineStage::Analyzing {
            debug!("stage: Analyzing -> Failed");
            self.stages.push(PipelineStage::Failed);
        }
        self.current()
    }
}

impl Default for StageTrace {
    fn default() -> Self {
        Self::new()
    }
}
