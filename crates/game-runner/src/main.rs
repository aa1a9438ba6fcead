mod driver;
mod store;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use twenty48_core::engine::{Move, BOARD_SIZES, DEFAULT_BOARD_SIZE};
use twenty48_core::session::GameSession;

use driver::play_random;
use store::SqliteStore;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Play and inspect saved 2048 games on 3x3 to 5x5 boards"
)]
struct Cli {
    /// SQLite save file (created on first use)
    #[arg(long, value_name = "FILE", default_value = "saves.db", global = true)]
    save: PathBuf,

    /// Seed for the tile RNG (defaults to entropy)
    #[arg(long, value_name = "N", global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Let the random player finish the current game
    Play {
        /// Board size to play
        #[arg(long, value_name = "SIZE", default_value_t = DEFAULT_BOARD_SIZE,
              value_parser = clap::value_parser!(u8).range(3..=5))]
        size: u8,

        /// Stop after this many effective moves
        #[arg(long, value_name = "N")]
        max_moves: Option<u64>,
    },
    /// Apply a single move to a board
    Step {
        /// Direction to shift: up, down, left or right
        #[arg(long, value_name = "DIRECTION")]
        dir: String,

        /// Board size to step
        #[arg(long, value_name = "SIZE", default_value_t = DEFAULT_BOARD_SIZE,
              value_parser = clap::value_parser!(u8).range(3..=5))]
        size: u8,
    },
    /// Print every board with its scores
    Show,
    /// Start a size over, keeping its high score
    Reset {
        /// Board size to reset
        #[arg(long, value_name = "SIZE", default_value_t = DEFAULT_BOARD_SIZE,
              value_parser = clap::value_parser!(u8).range(3..=5))]
        size: u8,
    },
}

fn parse_direction(text: &str) -> Result<Move> {
    match text.to_ascii_lowercase().as_str() {
        "up" => Ok(Move::Up),
        "down" => Ok(Move::Down),
        "left" => Ok(Move::Left),
        "right" => Ok(Move::Right),
        other => bail!("unknown direction {other:?} (expected up, down, left or right)"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let store = SqliteStore::open(&cli.save)?;
    let mut session = GameSession::load(store, &mut rng)?;

    match cli.command {
        Command::Play { size, max_moves } => {
            session.select_board_size(size)?;
            if session.is_game_over() {
                println!("{}", session.board());
                info!("the {size}x{size} game is already over, reset it to play again");
                return Ok(());
            }
            let report = play_random(&mut session, &mut rng, max_moves)?;
            println!("{}", session.board());
            info!(
                "{} effective moves, score {}, high score {}, best tile {}{}",
                report.effective_moves,
                report.score,
                report.highscore,
                report.highest_tile,
                if report.game_over { ", game over" } else { "" }
            );
        }
        Command::Step { dir, size } => {
            let direction = parse_direction(&dir)?;
            session.select_board_size(size)?;
            let moved = session.make_move(direction, &mut rng)?;
            println!("{}", session.board());
            if moved {
                info!("score {}, high score {}", session.score(), session.highscore());
            } else {
                info!("nothing moved");
            }
            if session.is_game_over() {
                info!("game over, reset to keep playing");
            }
        }
        Command::Show => {
            for size in BOARD_SIZES {
                let marker = if size == session.board_size() {
                    " (active)"
                } else {
                    ""
                };
                let over = if session.game_over_for(size) {
                    ", game over"
                } else {
                    ""
                };
                println!(
                    "{size}x{size}{marker}: score {}, high score {}{over}",
                    session.score_for(size),
                    session.highscore_for(size)
                );
                println!("{}", session.board_for(size));
            }
        }
        Command::Reset { size } => {
            session.select_board_size(size)?;
            session.reset(&mut rng)?;
            println!("{}", session.board());
            info!(
                "fresh {size}x{size} board, high score {} kept",
                session.highscore()
            );
        }
    }
    Ok(())
}
