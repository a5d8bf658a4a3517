//! # Mythica Engine
//!
//! Headless runner for Project Mythica.
//!
//! Builds an arena from CSV layers, replays a scripted input track against
//! the simulation on a fixed-step clock and logs every game event.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod arena;
mod config;
mod runner;
mod script;
mod sink;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{EngineConfig, CONFIG_FILE};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("mythica=info".parse()?))
        .init();

    info!("Project Mythica starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let config = EngineConfig::load_from(&config_path);

    let summary = runner::run(&config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("Project Mythica shutdown complete");
    Ok(())
}
