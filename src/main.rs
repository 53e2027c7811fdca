//! Main entry point for the treemorph viewer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use treemorph::headless::{self, LogSink};
use treemorph::viewer::{self, ViewerOptions};
use treemorph::{Scene, SceneConfig};

#[derive(Parser, Debug)]
#[command(name = "treemorph")]
#[command(about = "Particle tree that morphs between an assembled cone and a dispersed cloud", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON scene config; unset fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start under pointer-simulated gesture control
    #[arg(short, long)]
    gesture: bool,

    /// Layout seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window, logging frame stats
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// In headless mode, flip the mode every N frames
    #[arg(long)]
    toggle_every: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let mut scene = Scene::new(config).context("Failed to build scene")?;

    if cli.headless {
        let mut sink = LogSink::new(60);
        headless::run(&mut scene, cli.frames, cli.toggle_every, &mut sink);
        return Ok(());
    }

    viewer::run(
        scene,
        ViewerOptions {
            gesture: cli.gesture,
        },
    )
    .context("Viewer failed")?;
    Ok(())
}
