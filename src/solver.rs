//! Search strategies for the plank puzzle.
//!
//! Two strategies share the same node visit rules:
//!
//! - **Iterative deepening**: repeated depth-limited DFS with the bound raised
//!   by one after every exhausted pass. The first bound that yields a
//!   solution is the minimum number of actions.
//! - **Best-first descent**: no depth bound; a node's children are visited in
//!   ascending `g + h` order, each subtree finished before the next sibling.
//!
//! Every visit checks the goal first, then skips the node if an equal
//! position was already expanded at no greater cost in this run.

use std::fmt;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::board::Puzzle;
use crate::error::{Error, Result};
use crate::explored::ExploredSet;
use crate::heuristic::estimate;
use crate::tree::{NodeId, SearchTree};

/// Which search to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    IterativeDeepening,
    BestFirst,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::IterativeDeepening => write!(f, "iterative deepening"),
            Strategy::BestFirst => write!(f, "best-first"),
        }
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Iterative deepening starts at `start_bound + 1`
    pub start_bound: u32,
    /// Give up once this bound has been searched. `None` searches forever.
    pub max_bound: Option<u32>,
}

/// A path from the initial board to the goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub actions: Vec<Action>,
    /// Number of actions taken
    pub cost: u32,
    /// Depth bound that found the solution (iterative deepening only)
    pub bound: Option<u32>,
    pub iterations: u32,
    /// Expansions during the pass that found the solution
    pub nodes_expanded: usize,
    /// Expansions over all passes
    pub total_nodes_expanded: usize,
}

/// Run-level state shared by every frame of one search pass
struct SearchContext<'a> {
    goal: &'a str,
    explored: ExploredSet,
    found: Option<NodeId>,
}

impl<'a> SearchContext<'a> {
    fn new(goal: &'a str) -> Self {
        Self {
            goal,
            explored: ExploredSet::new(),
            found: None,
        }
    }

    fn goal_found(&self) -> bool {
        self.found.is_some()
    }
}

/// Common visit prelude. Returns true if the caller should expand `id`.
fn enter(tree: &mut SearchTree, id: NodeId, bound: Option<u32>, ctx: &mut SearchContext<'_>) -> bool {
    if ctx.goal_found() {
        return false;
    }

    let node = tree.node_mut(id);
    node.discovered = true;
    if node.goal {
        info!("goal reached with g = {}", node.g);
        ctx.found = Some(id);
        return false;
    }
    if bound.map_or(false, |b| node.g >= b) {
        return false;
    }

    let g = node.g;
    if !ctx.explored.insert(&tree.node(id).state, g) {
        debug!("skipping duplicate position at g = {}", g);
        return false;
    }
    true
}

fn depth_limited(
    tree: &mut SearchTree,
    id: NodeId,
    bound: u32,
    ctx: &mut SearchContext<'_>,
) -> Result<()> {
    if !enter(tree, id, Some(bound), ctx) {
        return Ok(());
    }

    let children = tree.expand(id, ctx.goal)?;
    debug!("expanded node at g = {} into {} children", tree.node(id).g, children.len());

    for child in children {
        if ctx.goal_found() {
            break;
        }
        if !tree.node(child).discovered {
            depth_limited(tree, child, bound, ctx)?;
        }
        tree.node_mut(child).processed = true;
    }
    Ok(())
}

fn best_first_descent(tree: &mut SearchTree, id: NodeId, ctx: &mut SearchContext<'_>) -> Result<()> {
    if !enter(tree, id, None, ctx) {
        return Ok(());
    }

    let children = tree.expand(id, ctx.goal)?;
    let mut ranked: Vec<(u32, NodeId)> = children
        .iter()
        .map(|&child| {
            let node = tree.node(child);
            let h = estimate(&node.state, ctx.goal).unwrap_or(u32::MAX);
            trace!("child {:?}: g = {}, h = {}", node.action, node.g, h);
            (node.g.saturating_add(h), child)
        })
        .collect();
    // Stable: equal scores keep generation order
    ranked.sort_by_key(|&(f, _)| f);

    for (_, child) in ranked {
        if ctx.goal_found() {
            break;
        }
        if !tree.node(child).discovered {
            best_first_descent(tree, child, ctx)?;
        }
        tree.node_mut(child).processed = true;
    }
    Ok(())
}

fn solution_from(tree: &SearchTree, found: NodeId) -> (Vec<Action>, u32) {
    (tree.path_to(found), tree.node(found).g)
}

/// Iterative-deepening depth-first search.
///
/// Raises the bound by one per pass until a goal is found. Without a
/// `max_bound` an unsolvable puzzle never returns.
pub fn iterative_deepening(puzzle: &Puzzle, config: &SolverConfig) -> Result<Solution> {
    if puzzle.state.is_goal(&puzzle.goal) {
        return Ok(Solution {
            actions: Vec::new(),
            cost: 0,
            bound: Some(0),
            iterations: 0,
            nodes_expanded: 0,
            total_nodes_expanded: 0,
        });
    }

    let mut bound = config.start_bound;
    let mut iterations = 0;
    let mut total_nodes_expanded = 0;

    loop {
        if let Some(max) = config.max_bound {
            if bound >= max {
                info!("giving up after bound {}", max);
                return Err(Error::NoSolutionWithinBound { bound: max });
            }
        }
        bound += 1;
        iterations += 1;
        info!("attempting to find solution at depth {}", bound);

        let mut tree = SearchTree::new(puzzle.state.clone(), &puzzle.goal);
        let mut ctx = SearchContext::new(&puzzle.goal);
        let root = tree.root();
        depth_limited(&mut tree, root, bound, &mut ctx)?;

        let nodes_expanded = tree.expansions();
        total_nodes_expanded += nodes_expanded;

        if let Some(found) = ctx.found {
            let (actions, cost) = solution_from(&tree, found);
            info!(
                "solution of {} actions at bound {} ({} nodes expanded)",
                cost, bound, nodes_expanded
            );
            return Ok(Solution {
                actions,
                cost,
                bound: Some(bound),
                iterations,
                nodes_expanded,
                total_nodes_expanded,
            });
        }

        info!(
            "bound {} exhausted: {} nodes expanded, {} positions explored",
            bound,
            nodes_expanded,
            ctx.explored.len()
        );
    }
}

/// Heuristic best-first descent.
///
/// Terminates on every finite board: once each position has been expanded at
/// its cheapest reachable cost there is nothing left to visit.
pub fn best_first(puzzle: &Puzzle) -> Result<Solution> {
    info!("performing best-first search");

    let mut tree = SearchTree::new(puzzle.state.clone(), &puzzle.goal);
    let mut ctx = SearchContext::new(&puzzle.goal);
    let root = tree.root();
    best_first_descent(&mut tree, root, &mut ctx)?;

    let nodes_expanded = tree.expansions();
    match ctx.found {
        Some(found) => {
            let (actions, cost) = solution_from(&tree, found);
            info!("solution of {} actions ({} nodes expanded)", cost, nodes_expanded);
            Ok(Solution {
                actions,
                cost,
                bound: None,
                iterations: 1,
                nodes_expanded,
                total_nodes_expanded: nodes_expanded,
            })
        }
        None => {
            info!("search exhausted after {} expansions", nodes_expanded);
            Err(Error::NoSolution)
        }
    }
}

/// Solve `puzzle` with the configured strategy
pub fn solve(puzzle: &Puzzle, config: &SolverConfig) -> Result<Solution> {
    match config.strategy {
        Strategy::IterativeDeepening => iterative_deepening(puzzle, config),
        Strategy::BestFirst => best_first(puzzle),
    }
}
