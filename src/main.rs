//! Ringmatch: a circular match-three board engine.
//!
//! ## Usage
//!
//! - `ringmatch` - Show a demo
//! - `ringmatch play` - Read commands from stdin (see `protocol`)
//! - `ringmatch demo` - Replay the demo game

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use ringmatch::board::{Board, End};
use ringmatch::constants::{DEFAULT_SAVE_FILE, DEFAULT_SCORES_FILE};
use ringmatch::piece::{Color, Shape};
use ringmatch::protocol::Session;

/// Ringmatch: a circular match-three board engine
#[derive(Parser)]
#[command(name = "ringmatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play through the text command protocol on stdin/stdout
    Play {
        /// Game file used by `save` and `load` without a path
        #[arg(long, value_name = "FILE", default_value = DEFAULT_SAVE_FILE)]
        save_file: PathBuf,

        /// High score table file
        #[arg(long, value_name = "FILE", default_value = DEFAULT_SCORES_FILE)]
        scores_file: PathBuf,
    },
    /// Run a short demo game
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    match cli.command {
        Some(Commands::Play {
            save_file,
            scores_file,
        }) => {
            info!(
                "starting session (game file {}, scores {})",
                save_file.display(),
                scores_file.display()
            );
            let mut session = Session::with_files(save_file, scores_file);
            session.run(io::stdin().lock(), io::stdout())?;
        }
        Some(Commands::Demo) | None => run_demo(),
    }
    Ok(())
}

fn run_demo() {
    println!("Ringmatch: circular match-three\n");

    let mut board = Board::new();
    let moves = [
        (Color::Green, Shape::Square),
        (Color::Green, Shape::Diamond),
        (Color::Green, Shape::Square),
        (Color::Red, Shape::Square),
    ];
    for (color, shape) in moves {
        let outcome = board.insert(color, shape, End::Tail);
        println!("insert {color}/{shape}: {outcome:?}");
    }

    println!("\n{board}");
    println!("Score: {}", board.score());
}
