use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use snake_duel::game::{GameConfig, GameEngine};
use snake_duel::logger::init_logger;
use snake_duel::modes::DuelMode;

#[derive(Parser)]
#[command(name = "snake_duel")]
#[command(version, about = "Snake duel against a greedy AI")]
struct Cli {
    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter directives, e.g. "debug" or "snake_duel=trace"
    #[arg(long)]
    log_level: Option<String>,

    /// Seed food placement for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.log_file.as_deref(), cli.log_level.as_deref())?;

    let config = GameConfig::default();
    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    let mut duel_mode = DuelMode::new(engine);
    duel_mode.run().await?;

    Ok(())
}
