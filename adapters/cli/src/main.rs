#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that simulates a tank battle from a board file.

mod config;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use tank_battle_board_file::{load_board, RecoverableError};
use tank_battle_core::PlayerId;
use tank_battle_system_battle::Battle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::BattleConfig;

/// File collecting recoverable board errors, written next to the battle output.
const INPUT_ERRORS_FILE: &str = "input_errors.txt";

/// Simulates a tank battle described by a board file.
#[derive(Debug, Parser)]
#[command(name = "tank-battle", version)]
struct Args {
    /// Board file describing the battlefield.
    board: PathBuf,

    /// TOML file selecting strategies, players and the ammo countdown.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving the battle output and input error files.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Writes a JSON summary of the finished game to this path.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Logs every turn to stderr.
    #[arg(long)]
    verbose: bool,
}

/// Entry point for the tank battle command-line interface.
fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => BattleConfig::load(path)
            .with_context(|| format!("invalid configuration {}", path.display()))?,
        None => BattleConfig::default(),
    };

    let board = load_board(&args.board)
        .with_context(|| format!("failed to load board {}", args.board.display()))?;
    info!(description = %board.description, "board loaded");

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            args.output_dir.display()
        )
    })?;

    if !board.recoverable.is_empty() {
        warn!(
            count = board.recoverable.len(),
            "board contained recoverable errors"
        );
        write_input_errors(&args.output_dir, &board.recoverable)?;
    }

    let mut battle = Battle::with_ammo_countdown(
        &board.setup,
        config.ammo_countdown(),
        &config.strategy_factory(),
        &config.player_factory(),
    );
    let outcome = battle.run();

    let output = output_path(&args.output_dir, &args.board)?;
    fs::write(&output, battle.log().render())
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        path = %output.display(),
        winner = ?outcome.winner().map(PlayerId::number),
        "battle output written"
    );

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&battle.summary())
            .context("failed to serialize battle summary")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
    }

    Ok(())
}

fn write_input_errors(output_dir: &Path, errors: &[RecoverableError]) -> Result<()> {
    let mut text = String::new();
    for error in errors {
        text.push_str(&error.to_string());
        text.push('\n');
    }

    let path = output_dir.join(INPUT_ERRORS_FILE);
    fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// Output file named after the board: `output_<board file name>`.
fn output_path(output_dir: &Path, board: &Path) -> Result<PathBuf> {
    let name = board
        .file_name()
        .with_context(|| format!("{} has no file name", board.display()))?;
    let file_name = format!("output_{}", name.to_string_lossy());
    Ok(output_dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_file_is_named_after_the_board() {
        let path = output_path(Path::new("out"), Path::new("boards/arena.txt"))
            .expect("board has a file name");

        assert_eq!(path, Path::new("out").join("output_arena.txt"));
    }

    #[test]
    fn arguments_parse_with_defaults() {
        let args = Args::try_parse_from(["tank-battle", "board.txt"]).expect("valid invocation");

        assert_eq!(args.board, PathBuf::from("board.txt"));
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(args.config.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn missing_board_argument_is_rejected() {
        assert!(Args::try_parse_from(["tank-battle"]).is_err());
    }
}
