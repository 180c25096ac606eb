use clap::Parser;
use dual_rasterizer::app::{run_cli, run_gui};
use dual_rasterizer::io::config::Config;
use log::{error, info};
use std::path::PathBuf;

/// Software rasterizer with textured Phong shading and debug visualizations
#[derive(Parser, Debug)]
#[command(name = "dual-rasterizer")]
#[command(version, about)]
struct Cli {
    /// TOML scene/render configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render without a window and save the final frame
    #[arg(long)]
    headless: bool,

    /// Number of frames to render in headless mode
    #[arg(long, value_name = "N")]
    frames: Option<usize>,

    /// Output image path for headless mode
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("minifb", log::LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config '{}'", path.display());
            Config::load(path).inspect_err(|e| error!("{}", e))?
        }
        None => {
            info!("No config given, using defaults");
            Config::default()
        }
    };

    if let Some(frames) = cli.frames {
        config.render.frames = frames;
    }
    if let Some(output) = &cli.output {
        config.render.output = output.to_string_lossy().into_owned();
    }

    let result = if cli.headless {
        run_cli(config)
    } else {
        run_gui(config, cli.config.as_deref())
    };
    result.inspect_err(|e| error!("{}", e))
}
