//! arplace - Entry point
//!
//! Opens a window with a floor surface; tap or click it, pick a model, and
//! adjust the placed model from the panel.

mod app;
mod config;

use anyhow::Result;
use bevy::app::AppExit;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "arplace")]
#[command(about = "Place remote 3D models on surfaces and adjust them")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "arplace.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable the Space shortcut that places at the origin
    #[arg(long)]
    debug_shortcut: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    init: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("arplace v{}", env!("CARGO_PKG_VERSION"));

    if args.init {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    let config = config::load_config(&args.config)?;
    let catalog = config.catalog()?;

    info!(
        models = catalog.len(),
        surfaces = config.surfaces.len(),
        "Configuration loaded"
    );

    let exit = app::run(app::ViewerOptions {
        title: config.window.title.clone(),
        catalog,
        surfaces: config.surface_specs(),
        debug_shortcut: args.debug_shortcut || config.debug.identity_pose_shortcut,
    });

    if let AppExit::Error(code) = exit {
        anyhow::bail!("viewer exited with code {}", code);
    }
    Ok(())
}
