use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use irekae_core::puzzle::system_clock_ms;
use irekae_core::{cell_index, Difficulty, Puzzle, PuzzleConfig, TileId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::render::SourceImage;

mod render;

#[derive(Parser)]
#[command(name = "irekae", version, about = "Swap-tile puzzles cut from your own images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shuffle a grid and rearrange it interactively
    Play {
        /// Source image; required for `export`, optional otherwise
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long, default_value_t = 3)]
        grid: u32,
        #[arg(long, default_value = "normal")]
        difficulty: Difficulty,
        /// Session seed; a random one is drawn and echoed when omitted
        #[arg(long, env = "IREKAE_SEED")]
        seed: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            image,
            grid,
            difficulty,
            seed,
        } => play(image, grid, difficulty, seed),
    }
}

fn play(
    image: Option<PathBuf>,
    grid: u32,
    difficulty: Difficulty,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = match &image {
        Some(path) => Some(SourceImage::load(path, grid)?),
        None => None,
    };
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut puzzle = Puzzle::start(
        PuzzleConfig {
            grid_size: grid,
            difficulty,
        },
        &mut rng,
    )?;

    println!("{grid}x{grid} puzzle, difficulty {difficulty}, seed {seed}");
    println!("type `help` for the command list");
    print_grid(&puzzle);
    announce(&mut puzzle);

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        let command = match parse_session_command(line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        match command {
            SessionCommand::Show => print_grid(&puzzle),
            SessionCommand::Swap(source_tile, target_tile) => {
                match puzzle.apply_move(source_tile, target_tile) {
                    Ok(()) => {
                        print_grid(&puzzle);
                        announce(&mut puzzle);
                    }
                    Err(err) => eprintln!("move ignored: {err}"),
                }
            }
            SessionCommand::Undo => {
                if puzzle.undo() {
                    print_grid(&puzzle);
                    announce(&mut puzzle);
                } else {
                    println!("nothing to undo");
                }
            }
            SessionCommand::Redo => {
                if puzzle.redo() {
                    print_grid(&puzzle);
                    announce(&mut puzzle);
                } else {
                    println!("nothing to redo");
                }
            }
            SessionCommand::Shuffle(override_difficulty) => {
                puzzle.reshuffle(override_difficulty, &mut rng);
                print_grid(&puzzle);
                announce(&mut puzzle);
            }
            SessionCommand::Export(path) => match &source {
                Some(source) => {
                    let path = path.unwrap_or_else(|| default_export_path(grid));
                    match source.export(puzzle.current_order(), &path) {
                        Ok(()) => println!("saved {}", path.display()),
                        Err(err) => eprintln!("export failed: {err}"),
                    }
                }
                None => eprintln!("no source image; restart with --image to export"),
            },
            SessionCommand::Help => print_help(),
            SessionCommand::Quit => break,
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum SessionCommand {
    Show,
    Swap(TileId, TileId),
    Undo,
    Redo,
    Shuffle(Option<Difficulty>),
    Export(Option<PathBuf>),
    Help,
    Quit,
}

fn parse_session_command(line: &str) -> Result<SessionCommand, String> {
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default();
    match head {
        "show" => Ok(SessionCommand::Show),
        "swap" => {
            let usage = "usage: swap <row-col> <row-col>";
            let source = parts.next().ok_or(usage)?;
            let target = parts.next().ok_or(usage)?;
            let source = TileId::from_str(source).map_err(|err| err.to_string())?;
            let target = TileId::from_str(target).map_err(|err| err.to_string())?;
            Ok(SessionCommand::Swap(source, target))
        }
        "undo" => Ok(SessionCommand::Undo),
        "redo" => Ok(SessionCommand::Redo),
        "shuffle" => {
            let difficulty = match parts.next() {
                Some(word) => Some(Difficulty::from_str(word).map_err(|err| err.to_string())?),
                None => None,
            };
            Ok(SessionCommand::Shuffle(difficulty))
        }
        "export" => Ok(SessionCommand::Export(parts.next().map(PathBuf::from))),
        "help" => Ok(SessionCommand::Help),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        other => Err(format!("unknown command {other:?}, try `help`")),
    }
}

/// Text rendering of the grid: each slot shows the tile's origin key, with
/// `*` marking tiles already back in their home cell.
fn print_grid(puzzle: &Puzzle) {
    let grid_size = puzzle.grid_size();
    for row in 0..grid_size {
        let mut line = String::new();
        for col in 0..grid_size {
            let slot = cell_index(row, col, grid_size);
            let tile = puzzle.current_order()[slot];
            let marker = if tile == TileId::new(row, col) { '*' } else { ' ' };
            let _ = write!(line, "{:>7}{marker}", tile.to_string());
        }
        println!("{line}");
    }
}

fn announce(puzzle: &mut Puzzle) {
    if puzzle.take_completed() {
        println!("puzzle completed!");
    }
}

fn default_export_path(grid_size: u32) -> PathBuf {
    PathBuf::from(format!(
        "puzzle-{grid_size}x{grid_size}-{}.png",
        system_clock_ms()
    ))
}

fn print_help() {
    println!("commands:");
    println!("  show                      render the grid");
    println!("  swap <row-col> <row-col>  exchange two tiles");
    println!("  undo / redo               step through move history");
    println!("  shuffle [difficulty]      reshuffle, optionally at a new difficulty");
    println!("  export [path]             save the arrangement as a PNG (needs --image)");
    println!("  quit                      leave");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_command_parses_tile_keys() {
        assert_eq!(
            parse_session_command("swap 0-1 2-2"),
            Ok(SessionCommand::Swap(TileId::new(0, 1), TileId::new(2, 2)))
        );
        assert!(parse_session_command("swap 0-1").is_err());
        assert!(parse_session_command("swap x-1 0-0").is_err());
    }

    #[test]
    fn shuffle_difficulty_is_optional() {
        assert_eq!(
            parse_session_command("shuffle"),
            Ok(SessionCommand::Shuffle(None))
        );
        assert_eq!(
            parse_session_command("shuffle hard"),
            Ok(SessionCommand::Shuffle(Some(Difficulty::Hard)))
        );
        assert!(parse_session_command("shuffle extreme").is_err());
    }

    #[test]
    fn unknown_words_are_reported() {
        assert!(parse_session_command("flip").is_err());
    }
}
