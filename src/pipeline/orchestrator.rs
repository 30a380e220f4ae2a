// src/pipeline/orchestrator.rs
//
// Sequences perception and the decision chain for one image. This is the
// only place perception errors are handled: any failure while analyzing
// becomes the fixed fallback result, so callers always get a decision.

use super::stage::{PipelineStage, StageTrace};
use crate::config::Config;
use crate::decision::DecisionResolver;
use crate::error::VisionError;
use crate::explanation::ExplanationGenerator;
use crate::risk::RiskAssessor;
use crate::scene::SceneNormalizer;
use crate::types::{
    Action, Frame, PipelineResult, RawScene, RiskAssessment, RiskLevel, Scene, SceneFacts,
};
use crate::vision::{FileImageLoader, ImageLoader, VisionAnalyzer};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const FALLBACK_FACTOR: &str = "vision failure";
pub const FALLBACK_EXPLANATION: &str = "Fallback decision because processing failed.";

#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Frame(Frame),
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<Frame> for ImageSource {
    fn from(frame: Frame) -> Self {
        ImageSource::Frame(frame)
    }
}

/// Result of one evaluation together with the stages it went through.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub result: PipelineResult,
    pub trace: StageTrace,
}

impl PipelineRun {
    pub fn is_fallback(&self) -> bool {
        self.trace.current() == PipelineStage::Failed
    }
}

/// The result returned whenever perception fails.
pub fn fallback_result(action: Action) -> PipelineResult {
    PipelineResult {
        scene: Scene::default(),
        risk: RiskAssessment {
            level: RiskLevel::High,
            factors: vec![FALLBACK_FACTOR.to_string()],
        },
        action,
        explanation: FALLBACK_EXPLANATION.to_string(),
    }
}

pub struct PipelineOrchestrator<L = FileImageLoader> {
    loader: L,
    analyzer: VisionAnalyzer,
    normalizer: SceneNormalizer,
    assessor: RiskAssessor,
    resolver: DecisionResolver,
    explainer: ExplanationGenerator,
    default_action_on_error: Action,
}

impl PipelineOrchestrator<FileImageLoader> {
    pub fn new(config: &Config) -> Self {
        Self::with_loader(config, FileImageLoader)
    }
}

impl<L: ImageLoader> PipelineOrchestrator<L> {
    pub fn with_loader(config: &Config, loader: L) -> Self {
        Self {
            loader,
            analyzer: VisionAnalyzer::new(config.vision.clone()),
            normalizer: SceneNormalizer,
            assessor: RiskAssessor,
            resolver: DecisionResolver,
            explainer: ExplanationGenerator,
            default_action_on_error: config.decision.default_action_on_error,
        }
    }

    pub fn evaluate(&self, source: &ImageSource) -> PipelineResult {
        self.run(source).result
    }

    pub fn evaluate_path(&self, path: impl AsRef<Path>) -> PipelineResult {
        self.run_path(path.as_ref()).result
    }

    pub fn evaluate_frame(&self, frame: &Frame) -> PipelineResult {
        self.run_frame(frame).result
    }

    /// Skip perception and run the chain on already-extracted facts.
    pub fn evaluate_facts(&self, facts: &SceneFacts) -> PipelineResult {
        self.run_facts(facts).result
    }

    pub fn run(&self, source: &ImageSource) -> PipelineRun {
        match source {
            ImageSource::Path(path) => self.run_path(path),
            ImageSource::Frame(frame) => self.run_frame(frame),
        }
    }

    pub fn run_path(&self, path: &Path) -> PipelineRun {
        self.run_perception(|| self.analyzer.analyze_path(&self.loader, path))
    }

    pub fn run_frame(&self, frame: &Frame) -> PipelineRun {
        self.run_perception(|| self.analyzer.analyze_frame(frame))
    }

    pub fn run_facts(&self, facts: &SceneFacts) -> PipelineRun {
        let mut trace = StageTrace::new();
        trace.advance();
        self.run_chain(facts, trace)
    }

    fn run_perception<F>(&self, perceive: F) -> PipelineRun
    where
        F: FnOnce() -> Result<RawScene, VisionError>,
    {
        let mut trace = StageTrace::new();
        trace.advance();

        match perceive() {
            Ok(raw) => self.run_chain(&SceneFacts::from(raw), trace),
            Err(err) => {
                trace.fail();
                let result = fallback_result(self.default_action_on_error);
                warn!(
                    "⚠️  perception failed ({}); falling back to {}",
                    err,
                    result.action.as_str()
                );
                PipelineRun { result, trace }
            }
        }
    }

    /// Normalize → assess → decide → explain. Cannot fail.
    fn run_chain(&self, facts: &SceneFacts, mut trace: StageTrace) -> PipelineRun {
        trace.advance();
        let scene = self.normalizer.normalize(facts);

        trace.advance();
        let risk = self.assessor.assess(&scene);

        trace.advance();
        let action = self.resolver.decide(&scene, &risk);

        trace.advance();
        let explanation = self.explainer.explain(action, &risk);

        trace.advance();
        info!(
            "🚦 {} | risk={:?} | {}",
            action.as_str(),
            risk.level,
            explanation
        );

        PipelineRun {
            result: PipelineResult {
                scene,
                risk,
                action,
                explanation,
            },
            trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Distance, Environment, Motion, ObjectFacts, ObjectType, TrafficLight, Visibility,
    };
    use image::{Rgb, RgbImage};
    use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
    use imageproc::rect::Rect;

    fn orchestrator() -> PipelineOrchestrator {
        PipelineOrchestrator::new(&Config::default())
    }

    struct BrokenLoader;

    impl ImageLoader for BrokenLoader {
        fn load(&self, _path: &Path) -> Result<Frame, VisionError> {
            Err(VisionError::InvalidFrame("decoder exploded".into()))
        }
    }

    /// Dark canvas, small red light top-left, large red block in the middle.
    fn red_light_obstacle_scene() -> RgbImage {
        let mut img = RgbImage::from_pixel(300, 300, Rgb([20, 20, 20]));
        draw_filled_circle_mut(&mut img, (40, 40), 15, Rgb([255, 0, 0]));
        draw_filled_rect_mut(&mut img, Rect::at(100, 100).of_size(100, 100), Rgb([255, 0, 0]));
        img
    }

    fn assert_fallback(result: &PipelineResult) {
        assert_eq!(result.action, Action::SlowDown);
        assert!(result.explanation.to_lowercase().contains("fallback"));
        assert_eq!(result.risk.level, RiskLevel::High);
        assert_eq!(result.risk.factors, vec![FALLBACK_FACTOR]);
        assert_eq!(result.scene, Scene::default());
    }

    #[test]
    fn test_missing_image_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator();
        let run = orchestrator.run_path(&dir.path().join("nope.png"));

        assert!(run.is_fallback());
        assert_eq!(
            run.trace.stages(),
            &[PipelineStage::Idle, PipelineStage::Analyzing, PipelineStage::Failed]
        );
        assert_fallback(&run.result);
    }

    #[test]
    fn test_malformed_frame_falls_back() {
        let orchestrator = orchestrator();
        let result = orchestrator.evaluate_frame(&Frame::new(vec![1, 2, 3], 10, 10));
        assert_fallback(&result);
    }

    #[test]
    fn test_loader_failure_falls_back() {
        let orchestrator = PipelineOrchestrator::with_loader(&Config::default(), BrokenLoader);
        assert_fallback(&orchestrator.evaluate_path("whatever.png"));
    }

    #[test]
    fn test_fallback_action_is_configurable() {
        let mut config = Config::default();
        config.decision.default_action_on_error = Action::Stop;
        let orchestrator = PipelineOrchestrator::new(&config);
        let result = orchestrator.evaluate_path("/no/such/image.png");
        assert_eq!(result.action, Action::Stop);
        assert!(result.explanation.contains("Fallback"));
    }

    #[test]
    fn test_red_light_and_near_obstacle_stops() {
        let orchestrator = orchestrator();
        let frame = Frame::from_rgb_image(red_light_obstacle_scene());
        let run = orchestrator.run(&ImageSource::from(frame));

        assert_eq!(run.trace.current(), PipelineStage::Done);
        let result = run.result;
        assert_eq!(result.scene.traffic_light, TrafficLight::Red);
        assert!(result.scene.objects.iter().any(|o| o.distance == Distance::Near
            && matches!(o.kind, ObjectType::Obstacle | ObjectType::Vehicle)));
        assert_eq!(result.risk.level, RiskLevel::High);
        assert_eq!(result.action, Action::Stop);
        assert!(result.explanation.contains("traffic light red"));
    }

    /// Green light on the right, a wide block pressed against the left edge.
    fn green_light_edge_vehicle_scene() -> RgbImage {
        let mut img = RgbImage::from_pixel(300, 300, Rgb([20, 20, 20]));
        draw_filled_circle_mut(&mut img, (260, 40), 10, Rgb([20, 200, 40]));
        draw_filled_rect_mut(&mut img, Rect::at(0, 120).of_size(160, 90), Rgb([240, 240, 240]));
        img
    }

    #[test]
    fn test_vehicle_on_left_edge_stops() {
        let frame = Frame::from_rgb_image(green_light_edge_vehicle_scene());
        let result = orchestrator().evaluate_frame(&frame);

        assert_eq!(result.scene.traffic_light, TrafficLight::Green);
        assert!(result
            .scene
            .objects
            .iter()
            .any(|o| o.kind == ObjectType::Vehicle && o.distance == Distance::Near));
        assert_eq!(result.risk.level, RiskLevel::High);
        assert!(result.risk.factors.contains(&"near vehicle".to_string()));
        assert_eq!(result.action, Action::Stop);
    }

    #[test]
    fn test_blocks_on_every_edge_are_seen() {
        let placements = [(0, 100), (100, 0), (200, 100), (100, 200)];
        for (x, y) in placements {
            let mut img = RgbImage::from_pixel(300, 300, Rgb([20, 20, 20]));
            draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(100, 100), Rgb([240, 240, 240]));
            let result = orchestrator().evaluate_frame(&Frame::from_rgb_image(img));

            assert_eq!(result.scene.objects.len(), 1, "block at ({x}, {y})");
            assert_eq!(result.scene.objects[0].distance, Distance::Near);
            assert_eq!(result.action, Action::Stop, "block at ({x}, {y})");
        }
    }

    #[test]
    fn test_same_scene_from_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.png");
        red_light_obstacle_scene().save(&path).unwrap();

        let orchestrator = orchestrator();
        let from_file = orchestrator.evaluate(&ImageSource::from(path.as_path()));
        let from_frame =
            orchestrator.evaluate_frame(&Frame::from_rgb_image(red_light_obstacle_scene()));
        assert_eq!(from_file, from_frame);
        assert_eq!(from_file.action, Action::Stop);
    }

    #[test]
    fn test_dark_frame_slows_down() {
        let orchestrator = orchestrator();
        let result = orchestrator.evaluate_frame(&Frame::filled(320, 240, [12, 12, 14]));

        assert_eq!(result.scene.visibility, Visibility::Low);
        assert_eq!(result.scene.traffic_light, TrafficLight::Unknown);
        assert!(result.scene.objects.is_empty());
        assert!(result.risk.level >= RiskLevel::Medium);
        assert_eq!(result.action, Action::SlowDown);
        assert_eq!(
            result.risk.factors,
            vec!["traffic light unknown", "low visibility"]
        );
    }

    #[test]
    fn test_facts_bypass_perception() {
        let facts = SceneFacts {
            objects: Some(vec![ObjectFacts {
                kind: Some(ObjectType::Pedestrian),
                distance: Some(Distance::Near),
                motion: None,
                bbox: None,
            }]),
            traffic_light: Some(TrafficLight::Green),
            ..SceneFacts::default()
        };
        let run = orchestrator().run_facts(&facts);

        assert_eq!(run.trace.current(), PipelineStage::Done);
        assert_eq!(run.result.scene.objects[0].motion, Motion::Static);
        assert_eq!(run.result.scene.environment, Environment::OpenArea);
        assert_eq!(run.result.risk.level, RiskLevel::High);
        assert_eq!(run.result.risk.factors, vec!["near pedestrian"]);
        assert_eq!(run.result.action, Action::Stop);
        assert_eq!(run.result.explanation, "Stop because of near pedestrian.");
    }

    #[test]
    fn test_green_empty_scene_proceeds() {
        let facts = SceneFacts {
            traffic_light: Some(TrafficLight::Green),
            ..SceneFacts::default()
        };
        let result = orchestrator().evaluate_facts(&facts);
        assert_eq!(result.risk.level, RiskLevel::Low);
        assert_eq!(result.action, Action::Proceed);
        assert_eq!(result.explanation, "Proceed; no hazards detected.");
    }

    #[test]
    fn test_output_is_deterministic() {
        let orchestrator = orchestrator();
        let frame = crate::demo::demo_scene();
        let a = serde_json::to_string(&orchestrator.evaluate_frame(&frame)).unwrap();
        let b = serde_json::to_string(&orchestrator.evaluate_frame(&frame)).unwrap();
        assert_eq!(a, b);
    }
}
