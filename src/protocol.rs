//! Line-oriented text protocol for driving a game.
//!
//! The framing follows GTP: each line holds an optional numeric id, a
//! command and its arguments. Replies start with `=` on success or `?` on
//! failure, echo the id, and end with a blank line.
//!
//! ## Supported Commands
//!
//! - `name` - Return engine name
//! - `version` - Return engine version
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `insert <color> <shape> [head|tail]` - Insert a piece (default: tail)
//! - `shift_color <color>` - Pull pieces of a color together
//! - `shift_shape <shape>` - Pull pieces of a shape together
//! - `show` - Print the board
//! - `score` / `size` - Current score / number of pieces
//! - `clear` - Start a new game
//! - `save [path]` / `load [path]` - Write or read a game file
//! - `record <name>` - Enter the current score in the high score table
//! - `highscores` - Print the high score table
//!
//! Colors and shapes are given by name or by index.
//!
//! ## Example
//!
//! ```ignore
//! use ringmatch::protocol::Session;
//! let mut session = Session::new();
//! session.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::board::{Board, End, Resolution};
use crate::constants::{DEFAULT_SAVE_FILE, DEFAULT_SCORES_FILE};
use crate::error::StorageError;
use crate::piece::{Color, Shape};
use crate::storage::{load_game, save_game, HighScores};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "clear",
    "highscores",
    "insert",
    "known_command",
    "list_commands",
    "load",
    "name",
    "quit",
    "record",
    "save",
    "score",
    "shift_color",
    "shift_shape",
    "show",
    "size",
    "version",
];

/// Protocol session state.
pub struct Session {
    /// The game being played
    board: Board,
    /// Game file used when `save`/`load` get no path
    save_file: PathBuf,
    /// High score table file
    scores_file: PathBuf,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session using the default file locations.
    pub fn new() -> Self {
        Self::with_files(DEFAULT_SAVE_FILE, DEFAULT_SCORES_FILE)
    }

    pub fn with_files(save_file: impl Into<PathBuf>, scores_file: impl Into<PathBuf>) -> Self {
        Self {
            board: Board::new(),
            save_file: save_file.into(),
            scores_file: scores_file.into(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            debug!("{command} {args:?} -> {success} {message:?}");

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "insert" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let color = match args[0].parse::<Color>() {
                    Ok(c) => c,
                    Err(e) => return (false, e),
                };
                let shape = match args[1].parse::<Shape>() {
                    Ok(s) => s,
                    Err(e) => return (false, e),
                };
                let end = match args.get(2).map(|s| s.to_lowercase()).as_deref() {
                    None | Some("tail") => End::Tail,
                    Some("head") => End::Head,
                    Some(other) => return (false, format!("unknown end: {other}")),
                };
                let outcome = self.board.insert(color, shape, end);
                (true, describe(outcome))
            }

            "shift_color" => match args.first().map(|s| s.parse::<Color>()) {
                None => (false, "missing argument".to_string()),
                Some(Err(e)) => (false, e),
                Some(Ok(color)) => (true, self.board.shift_by_color(color).to_string()),
            },

            "shift_shape" => match args.first().map(|s| s.parse::<Shape>()) {
                None => (false, "missing argument".to_string()),
                Some(Err(e)) => (false, e),
                Some(Ok(shape)) => (true, self.board.shift_by_shape(shape).to_string()),
            },

            "show" => (true, format!("\n{}", self.board).trim_end().to_string()),

            "score" => (true, self.board.score().to_string()),

            "size" => (true, self.board.len().to_string()),

            "clear" => {
                self.board.reset();
                (true, String::new())
            }

            "save" => {
                let path = self.game_path(args);
                match save_game(&path, &self.board) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "load" => {
                let path = self.game_path(args);
                match load_game(&path, &mut self.board) {
                    Ok(outcome) => (true, describe(outcome)),
                    Err(e) => (false, e.to_string()),
                }
            }

            "record" => {
                if args.is_empty() {
                    return (false, "missing name".to_string());
                }
                let name = args.join(" ");
                match self.record_score(&name) {
                    Ok(Some(rank)) => (true, format!("rank {rank}")),
                    Ok(None) => (true, "not a high score".to_string()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "highscores" => match HighScores::load(&self.scores_file) {
                Ok(table) => (true, table.to_string().trim_end().to_string()),
                Err(e) => (false, e.to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn game_path(&self, args: &[&str]) -> PathBuf {
        args.first()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.save_file.clone())
    }

    fn record_score(&self, name: &str) -> Result<Option<usize>, StorageError> {
        let path: &Path = &self.scores_file;
        let mut table = HighScores::load(path)?;
        let rank = table.record(name, self.board.score());
        if rank.is_some() {
            table.save(path)?;
        }
        Ok(rank)
    }
}

/// Reply text for an operation that may have removed runs.
fn describe(outcome: Resolution) -> String {
    if outcome.is_empty() {
        String::new()
    } else {
        format!(
            "removed {} in {} run(s) +{}",
            outcome.removed, outcome.runs, outcome.points
        )
    }
}
