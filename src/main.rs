//! Iris gaze tracker: live camera or video file gaze direction overlay.

use anyhow::Result;
use clap::{Parser, Subcommand};
use iris_gaze_tracker::{
    app::{process_video_file, start_live_capture},
    config::{Config, EXAMPLE_CONFIG},
    Error,
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Process frames without opening a window
    #[arg(long, global = true)]
    headless: bool,

    /// Smoothing filter (none, exponential[:alpha], moving_average[:window], median[:window])
    #[arg(short, long, global = true)]
    smoothing: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Track gaze on a live camera
    Live {
        /// Camera index to use
        #[arg(long)]
        cam: Option<i32>,
    },
    /// Track gaze on a video file
    Video {
        /// Video file to process (.mp4 or .avi)
        path: Option<PathBuf>,
    },
    /// Print an example configuration file
    ExampleConfig,
}

fn load_config(args: &Args) -> Config {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            match Config::from_file(path).and_then(|cfg| cfg.validate().map(|()| cfg)) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Failed to load config file: {}. Using defaults.", e);
                    Config::default()
                }
            }
        }
        None => Config::default(),
    };

    if args.headless {
        config.display.headless = true;
    }
    if let Some(spec) = &args.smoothing {
        config.smoothing.filter.clone_from(spec);
    }

    config
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let mut config = load_config(&args);

    let summary = match &args.command {
        Command::ExampleConfig => {
            print!("{EXAMPLE_CONFIG}");
            return Ok(());
        }
        Command::Live { cam } => {
            if let Some(index) = cam {
                config.capture.camera_index = *index;
            }
            start_live_capture(&config)?
        }
        Command::Video { path } => match process_video_file(path.as_deref(), &config) {
            Err(Error::NoFileSelected) => {
                warn!("No file selected. Please select a video file.");
                return Ok(());
            }
            other => other?,
        },
    };

    info!(
        "Done: {} frames processed, {} with a face",
        summary.frames_processed, summary.frames_with_faces
    );
    Ok(())
}
