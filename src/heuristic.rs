//! Distance-to-goal estimate for informed search.
//!
//! A fresh single-source shortest-path pass over the current board is run for
//! every query. Crossing a bridged edge costs 1; an empty edge costs 2, one
//! for laying a plank and one for walking over it.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::board::State;

/// Cost of walking over a bridged edge
pub const FILLED_COST: u32 = 1;
/// Cost of bridging and then crossing an empty edge
pub const UNFILLED_COST: u32 = 2;

/// Per-stump scratch data for one relaxation pass
#[derive(Debug, Clone, Copy)]
struct Scratch {
    distance: u32,
    visited: bool,
}

impl Default for Scratch {
    fn default() -> Self {
        Self {
            distance: u32::MAX,
            visited: false,
        }
    }
}

/// Estimated remaining cost from the player's stump to `goal`.
///
/// `None` if the goal cannot be reached through the graph at all.
pub fn estimate(state: &State, goal: &str) -> Option<u32> {
    shortest_distance(state, &state.player.position, goal)
}

/// Cheapest relaxed cost between two stumps of `state`.
pub fn shortest_distance<'a>(state: &'a State, from: &'a str, to: &str) -> Option<u32> {
    let mut table: HashMap<&str, Scratch> = state
        .stumps
        .iter()
        .map(|s| (s.id.as_str(), Scratch::default()))
        .collect();

    table.get_mut(from)?.distance = 0;
    if !table.contains_key(to) {
        return None;
    }

    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0u32, from)));

    while let Some(Reverse((distance, stump))) = heap.pop() {
        let Some(scratch) = table.get_mut(stump) else {
            continue;
        };
        if scratch.visited {
            continue;
        }
        scratch.visited = true;

        if stump == to {
            return Some(distance);
        }

        for edge in state.incident_edges(stump) {
            let Some(next) = edge.span.other_end(stump) else {
                continue;
            };
            let step = if edge.filled { FILLED_COST } else { UNFILLED_COST };
            let candidate = distance + step;
            if let Some(neighbour) = table.get_mut(next) {
                if !neighbour.visited && candidate < neighbour.distance {
                    neighbour.distance = candidate;
                    heap.push(Reverse((candidate, next)));
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::linear_puzzle;
    use crate::board::{planks_for_filled_edges, Edge, Puzzle, Stump, GOAL, SOURCE};

    /// A straight chain Start - S1 - ... - Goal with the given fill pattern
    fn chain(filled: &[bool]) -> Puzzle {
        let mut names = vec![SOURCE.to_string()];
        for i in 1..filled.len() {
            names.push(format!("S{}", i));
        }
        names.push(GOAL.to_string());

        let edges: Vec<Edge> = filled
            .iter()
            .enumerate()
            .map(|(i, &f)| Edge::new(i as u32 + 1, names[i].clone(), names[i + 1].clone(), 2, f))
            .collect();
        let planks = planks_for_filled_edges(&edges);
        let stumps = names.into_iter().map(Stump::new).collect();

        Puzzle::new(stumps, edges, planks, SOURCE, GOAL).unwrap()
    }

    #[test]
    fn test_all_filled_counts_edges() {
        let puzzle = chain(&[true, true, true]);
        assert_eq!(estimate(&puzzle.state, GOAL), Some(3));
    }

    #[test]
    fn test_unfilled_edges_add_between_one_and_two() {
        for pattern in [
            vec![true, false, true],
            vec![false, false, true, true],
            vec![false, false, false],
        ] {
            let puzzle = chain(&pattern);
            let baseline = pattern.len() as u32;
            let k = pattern.iter().filter(|&&f| !f).count() as u32;
            let h = estimate(&puzzle.state, GOAL).unwrap();

            assert!(h >= baseline + k, "h = {} for {:?}", h, pattern);
            assert!(h <= baseline + 2 * k, "h = {} for {:?}", h, pattern);
        }
    }

    #[test]
    fn test_linear_board_estimate() {
        let puzzle = linear_puzzle();
        assert_eq!(estimate(&puzzle.state, GOAL), Some(FILLED_COST + UNFILLED_COST));
    }

    #[test]
    fn test_prefers_cheaper_route() {
        // Direct empty edge (2) beats three bridged edges (3)
        let edges = vec![
            Edge::new(1, SOURCE, GOAL, 4, false),
            Edge::new(2, SOURCE, "A", 1, true),
            Edge::new(3, "A", "B", 1, true),
            Edge::new(4, "B", GOAL, 1, true),
        ];
        let planks = planks_for_filled_edges(&edges);
        let puzzle = Puzzle::new(
            vec![
                Stump::new(SOURCE),
                Stump::new("A"),
                Stump::new("B"),
                Stump::new(GOAL),
            ],
            edges,
            planks,
            SOURCE,
            GOAL,
        )
        .unwrap();

        assert_eq!(estimate(&puzzle.state, GOAL), Some(2));
        assert_eq!(shortest_distance(&puzzle.state, "A", GOAL), Some(2));
    }

    #[test]
    fn test_disconnected_goal_is_none() {
        let puzzle = Puzzle::new(
            vec![Stump::new(SOURCE), Stump::new("A"), Stump::new(GOAL)],
            vec![Edge::new(1, SOURCE, "A", 1, false)],
            vec![],
            SOURCE,
            GOAL,
        )
        .unwrap();

        assert_eq!(estimate(&puzzle.state, GOAL), None);
        assert_eq!(shortest_distance(&puzzle.state, SOURCE, "Nowhere"), None);
    }

    #[test]
    fn test_at_goal_is_zero() {
        let mut state = linear_puzzle().state;
        state.player.position = GOAL.to_string();
        assert_eq!(estimate(&state, GOAL), Some(0));
    }
}
