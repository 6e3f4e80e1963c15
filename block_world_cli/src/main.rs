// CLI entry point for block world map files.
//
// Loads a map, which parses it and runs the layout engine, then reports on
// it or writes it back out. A successful `resave` renumbers tiles in BFS
// order and drops tiles unreachable from the start tile. See `world_map.rs`
// in `block_world_sim` for the load/save rules.
//
// Usage:
//   blockworld [OPTIONS] <COMMAND>
//     check <MAP>             Load and print a summary
//     layout <MAP>            Print every laid-out tile in BFS order
//     resave <IN> <OUT>       Load, then save in canonical form
//   Options:
//     --config <FILE>         MapConfig JSON (default: built-in defaults)
//     --crlf                  Write CRLF line endings
//
// Exit codes: 0 ok, 1 usage or I/O error, 2 malformed map, 3 inconsistent
// map, 4 map file not found. Logging goes to stderr and is controlled by
// `RUST_LOG` (default `warn`).

use std::path::{Path, PathBuf};
use std::process;

use block_world_sim::config::LineEnding;
use block_world_sim::{MapConfig, WorldMap, WorldMapError};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

enum Command {
    Check(PathBuf),
    Layout(PathBuf),
    Resave { input: PathBuf, output: PathBuf },
}

struct Args {
    command: Command,
    config_path: Option<PathBuf>,
    crlf: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    let mut config = match &args.config_path {
        Some(path) => load_config(path),
        None => MapConfig::default(),
    };
    if args.crlf {
        config.line_ending = LineEnding::CrLf;
    }
    debug!(?config, "using map config");

    match args.command {
        Command::Check(path) => {
            let world = load_or_exit(&path, &config);
            let builder = world.builder();
            println!("{}: ok", path.display());
            println!("  start:     {}", world.start_position());
            println!("  tiles:     {}", world.tiles().len());
            println!("  builder:   {:?}", builder.name());
            println!("  inventory: {} blocks", builder.inventory().len());
        }
        Command::Layout(path) => {
            let world = load_or_exit(&path, &config);
            for (index, (id, position)) in world.layout().iter().enumerate() {
                let Some(tile) = world.tile(id) else {
                    continue;
                };
                let position = position.to_string();
                let blocks: Vec<&str> = tile.blocks().iter().map(|b| b.tag()).collect();
                let exits: Vec<String> = tile
                    .exits()
                    .map(|(direction, target)| match world.layout().index_of(target) {
                        Some(target) => format!("{direction}:{target}"),
                        None => format!("{direction}:?"),
                    })
                    .collect();
                println!(
                    "{index:>4} {position:<16} [{}] {}",
                    blocks.join(","),
                    exits.join(",")
                );
            }
        }
        Command::Resave { input, output } => {
            let world = load_or_exit(&input, &config);
            if let Err(e) = world.save_with(&output, &config) {
                error!(path = %output.display(), "save failed");
                eprintln!("{}: {e}", output.display());
                process::exit(1);
            }
            println!(
                "{} -> {} ({} tiles)",
                input.display(),
                output.display(),
                world.tiles().len()
            );
        }
    }
}

/// Load a map or exit with the code for its failure kind.
fn load_or_exit(path: &Path, config: &MapConfig) -> WorldMap {
    match WorldMap::load_with(path, config) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            process::exit(exit_code(&e));
        }
    }
}

fn exit_code(err: &WorldMapError) -> i32 {
    match err {
        WorldMapError::Format(_) => 2,
        WorldMapError::Inconsistent(_) => 3,
        WorldMapError::NotFound(_) => 4,
        WorldMapError::Io(_) => 1,
    }
}

fn load_config(path: &Path) -> MapConfig {
    let json = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read config {}: {e}", path.display());
        process::exit(1);
    });
    MapConfig::from_json(&json).unwrap_or_else(|e| {
        eprintln!("Invalid config {}: {e}", path.display());
        process::exit(1);
    })
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching.
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;
    let mut crlf = false;
    let mut positional = Vec::new();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    process::exit(1);
                }));
            }
            "--crlf" => crlf = true,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                process::exit(1);
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let command = match positional.as_slice() {
        [cmd, map] if cmd == "check" => Command::Check(PathBuf::from(map)),
        [cmd, map] if cmd == "layout" => Command::Layout(PathBuf::from(map)),
        [cmd, input, output] if cmd == "resave" => Command::Resave {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
        },
        _ => {
            print_usage();
            process::exit(1);
        }
    };

    Args {
        command,
        config_path,
        crlf,
    }
}

fn print_usage() {
    println!("Usage: blockworld [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  check <MAP>             Load and print a summary");
    println!("  layout <MAP>            Print every laid-out tile in BFS order");
    println!("  resave <IN> <OUT>       Load, then save in canonical form");
    println!();
    println!("Options:");
    println!("  --config <FILE>         MapConfig JSON (default: built-in defaults)");
    println!("  --crlf                  Write CRLF line endings");
    println!("  --help, -h              Show this help");
    println!();
    println!("Exit codes: 0 ok, 1 usage/IO, 2 malformed, 3 inconsistent, 4 not found");
}
