// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sight_to_action::{demo, Config, PipelineOrchestrator, PipelineResult, SceneFacts};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sight-to-action", about = "Single image → safe driving decision")]
struct Cli {
    /// YAML config; built-in thresholds are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the pipeline on an image file
    Run { image: PathBuf },

    /// Evaluate the built-in synthetic scene
    Demo {
        /// Also write the generated scene to this PNG
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Run the decision chain on a JSON scene-facts file, skipping vision
    Scene { facts: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    init_tracing(&config);

    let orchestrator = PipelineOrchestrator::new(&config);

    let result = match cli.command {
        Command::Run { image } => {
            info!("📷 Evaluating {}", image.display());
            orchestrator.evaluate_path(&image)
        }
        Command::Demo { save } => {
            if let Some(path) = &save {
                demo::save_demo_scene(path)
                    .with_context(|| format!("writing demo scene to {}", path.display()))?;
                info!("✓ Demo scene saved to {}", path.display());
            }
            orchestrator.evaluate_frame(&demo::demo_scene())
        }
        Command::Scene { facts } => {
            let facts = load_facts(&facts)?;
            orchestrator.evaluate_facts(&facts)
        }
    };

    print_result(&result)
}

/// `RUST_LOG` wins over the config's level. Logs go to stderr so stdout
/// stays pure JSON.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sight_to_action={}", config.logging.level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_facts(path: &Path) -> Result<SceneFacts> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let facts = serde_json::from_str(&contents)
        .with_context(|| format!("parsing scene facts in {}", path.display()))?;
    Ok(facts)
}

fn print_result(result: &PipelineResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
