//! Solver library for the stump-and-plank puzzle.
//!
//! A player stands on a stump in a graph of stumps. Some edges between
//! stumps are bridged by planks; the player may cross bridged edges, lift a
//! plank from an edge next to them, and lay a carried plank over an empty
//! edge of the same length. This crate searches for a sequence of those
//! actions that brings the player to the goal stump.

pub mod action;
pub mod board;
pub mod error;
pub mod explored;
pub mod heuristic;
pub mod parse;
pub mod solver;
pub mod transition;
pub mod tree;

// Re-export main types
pub use action::{legal_actions, Action};
pub use board::{Edge, Plank, Player, Puzzle, PuzzleConfig, Span, State, Stump, GOAL, SOURCE};
pub use error::{Error, Result};
pub use explored::{ExploredSet, StateKey};
pub use parse::{load_file, parse_json, parse_lines};
pub use solver::{best_first, iterative_deepening, solve, Solution, SolverConfig, Strategy};
pub use tree::{NodeId, SearchNode, SearchTree};
