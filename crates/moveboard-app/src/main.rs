//! Headless Moveboard session runner.
//!
//! Replays a scripted session against a board and prints the resulting
//! snapshot as JSON.

mod script;

use anyhow::Context;
use clap::Parser;
use moveboard_core::{Board, BoardConfig};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "moveboard", about = "Replay a Moveboard session and print the final board")]
struct Cli {
    /// Board configuration (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session script (JSON array of commands), or `-` for stdin.
    #[arg(long)]
    script: PathBuf,

    /// Pretty-print the snapshot.
    #[arg(long)]
    pretty: bool,

    /// How long to wait for decorative images before printing.
    #[arg(long, default_value_t = 3000)]
    decoration_timeout_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BoardConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => BoardConfig::default(),
    };

    let mut board = Board::new(&config);
    install_photo_source(&mut board, &config);

    let commands = script::parse(&read_script(&cli.script)?).context("parsing session script")?;
    log::info!("Replaying {} commands", commands.len());
    script::run(&mut board, &commands);

    if config.decorations.enabled {
        let timeout = Duration::from_millis(cli.decoration_timeout_ms);
        let events = board.wait_decorations(timeout);
        log::info!("Applied {} decoration results", events.len());
    }

    let changes = board.drain_events();
    log::debug!("Session produced {} store notifications", changes.len());

    let snapshot = board.snapshot();
    let json = if cli.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{json}");
    Ok(())
}

fn read_script(path: &PathBuf) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .context("reading script from stdin")?;
        return Ok(json);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))
}

#[cfg(feature = "http")]
fn install_photo_source(board: &mut Board, config: &BoardConfig) {
    if config.decorations.enabled {
        let source = moveboard_core::HttpPhotoSource::new(config.decorations.endpoint.clone());
        board.set_photo_source(Some(std::sync::Arc::new(source)));
    }
}

#[cfg(not(feature = "http"))]
fn install_photo_source(_board: &mut Board, config: &BoardConfig) {
    if config.decorations.enabled {
        log::warn!("Decorations requested but this build has no `http` feature; using solid fills");
    }
}
