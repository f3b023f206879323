//! CLI entry point for the plank solver.
//!
//! Usage:
//!   plank-solver solve <board.txt> [options]
//!   plank-solver solve --stdin [--json-input] [options]
//!
//! Options:
//!   --strategy <s>      iddfs (default) or best-first
//!   --start-bound <n>   Iterative deepening starts at n + 1 (default: 0)
//!   --max-bound <n>     Give up after bound n (default: unbounded)
//!   --format <f>        text (default) or json
//!
//! Set RUST_LOG=info to follow the search bound by bound.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use plank_solver::{
    load_file, parse_json, parse_lines, solve, Action, Error, Puzzle, Solution, SolverConfig,
    Strategy,
};

#[derive(Parser)]
#[command(name = "plank-solver")]
#[command(about = "Search for a plank-bridging route from Start to Goal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Iterative-deepening depth-first search (shortest solution)
    Iddfs,
    /// Heuristic best-first descent
    BestFirst,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Iddfs => Strategy::IterativeDeepening,
            StrategyArg::BestFirst => Strategy::BestFirst,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle definition
    Solve {
        /// Path to the puzzle file (.json for JSON, anything else for the line format)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the puzzle from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Treat stdin as JSON rather than the line format
        #[arg(long, requires = "stdin")]
        json_input: bool,

        /// Search strategy
        #[arg(long, value_enum, default_value = "iddfs")]
        strategy: StrategyArg,

        /// Bound already searched; the first pass uses this plus one
        #[arg(long, default_value = "0")]
        start_bound: u32,

        /// Largest bound to try before giving up
        #[arg(long)]
        max_bound: Option<u32>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// JSON output for a solve run
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    actions: Vec<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bound: Option<u32>,
    iterations: u32,
    nodes_expanded: usize,
    total_nodes_expanded: usize,
    time_elapsed_ms: u64,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            json_input,
            strategy,
            start_bound,
            max_bound,
            format,
        } => {
            let puzzle = match read_puzzle(file, stdin, json_input) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error loading puzzle: {}", e);
                    process::exit(1);
                }
            };

            let config = SolverConfig {
                strategy: strategy.into(),
                start_bound,
                max_bound,
            };

            if let OutputFormat::Text = format {
                print_board(&puzzle, &config);
            }

            let start_time = Instant::now();
            let result = solve(&puzzle, &config);
            let elapsed_ms = start_time.elapsed().as_millis() as u64;

            let solved = result.is_ok();
            match format {
                OutputFormat::Text => print_text(&result, elapsed_ms),
                OutputFormat::Json => {
                    let output = format_result(&result, elapsed_ms);
                    match serde_json::to_string_pretty(&output) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("Error writing output: {}", e);
                            process::exit(1);
                        }
                    }
                }
            }

            if solved {
                process::exit(0);
            } else {
                process::exit(1);
            }
        }
    }
}

fn read_puzzle(file: Option<PathBuf>, stdin: bool, json_input: bool) -> Result<Puzzle, Error> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| Error::Io {
                operation: "read from stdin".to_string(),
                source,
            })?;
        if json_input {
            parse_json(&buffer)
        } else {
            parse_lines(&buffer)
        }
    } else if let Some(path) = file {
        load_file(&path)
    } else {
        eprintln!("Error: Must provide either a file path or --stdin");
        process::exit(1);
    }
}

fn print_board(puzzle: &Puzzle, config: &SolverConfig) {
    println!(
        "Board: {} stumps, {} edges, {} planks",
        puzzle.state.stumps.len(),
        puzzle.state.edges.len(),
        puzzle.plank_count()
    );
    println!("{}", puzzle.state);
    println!();
    println!("Searching from {} to {} using {}", puzzle.source, puzzle.goal, config.strategy);
}

fn print_text(result: &Result<Solution, Error>, elapsed_ms: u64) {
    match result {
        Ok(solution) => {
            match solution.bound {
                Some(bound) => println!("Solution found at depth {} (g = {}):", bound, solution.cost),
                None => println!("Solution found (g = {}):", solution.cost),
            }
            for (i, action) in solution.actions.iter().enumerate() {
                println!("  {}. {}", i + 1, action);
            }
            println!(
                "{} nodes expanded during last iteration, {} in total",
                solution.nodes_expanded, solution.total_nodes_expanded
            );
        }
        Err(e) => println!("No solution: {}", e),
    }
    println!("Time elapsed: {} ms", elapsed_ms);
}

fn format_result(result: &Result<Solution, Error>, elapsed_ms: u64) -> SolveOutput {
    match result {
        Ok(solution) => SolveOutput {
            solved: true,
            reason: None,
            actions: solution.actions.clone(),
            cost: Some(solution.cost),
            bound: solution.bound,
            iterations: solution.iterations,
            nodes_expanded: solution.nodes_expanded,
            total_nodes_expanded: solution.total_nodes_expanded,
            time_elapsed_ms: elapsed_ms,
        },
        Err(e) => SolveOutput {
            solved: false,
            reason: Some(e.to_string()),
            actions: Vec::new(),
            cost: None,
            bound: match e {
                Error::NoSolutionWithinBound { bound } => Some(*bound),
                _ => None,
            },
            iterations: 0,
            nodes_expanded: 0,
            total_nodes_expanded: 0,
            time_elapsed_ms: elapsed_ms,
        },
    }
}
