//! Board model for the plank puzzle.
//!
//! A board is a graph of stumps joined by edges. An edge is a slot that a
//! plank can bridge; it is not the plank itself. Planks either rest on an
//! edge (filling it) or are carried by the player.
//!
//! The JSON shape accepted by [`PuzzleConfig`] mirrors these types directly.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type StumpId = String;
pub type EdgeId = u32;
pub type PlankId = u32;

/// Reserved identifier of the stump the player starts on
pub const SOURCE: &str = "Start";
/// Reserved identifier of the stump the player must reach
pub const GOAL: &str = "Goal";

/// A node in the puzzle graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stump {
    pub id: StumpId,
}

impl Stump {
    pub fn new(id: impl Into<StumpId>) -> Self {
        Self { id: id.into() }
    }
}

/// An unordered pair of stumps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: StumpId,
    pub finish: StumpId,
}

impl Span {
    pub fn new(start: impl Into<StumpId>, finish: impl Into<StumpId>) -> Self {
        Self {
            start: start.into(),
            finish: finish.into(),
        }
    }

    /// True if this span connects `a` and `b`, in either direction
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.start == a && self.finish == b) || (self.start == b && self.finish == a)
    }

    pub fn touches(&self, stump: &str) -> bool {
        self.start == stump || self.finish == stump
    }

    /// The endpoint opposite `stump`, if `stump` is an endpoint at all
    pub fn other_end(&self, stump: &str) -> Option<&str> {
        if self.start == stump {
            Some(&self.finish)
        } else if self.finish == stump {
            Some(&self.start)
        } else {
            None
        }
    }

    pub fn same_pair(&self, other: &Span) -> bool {
        self.joins(&other.start, &other.finish)
    }
}

/// A crossable slot between two stumps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge identifier
    pub id: EdgeId,
    /// Stumps this edge connects
    #[serde(flatten)]
    pub span: Span,
    /// Only a plank of exactly this length can bridge the edge
    pub length: u32,
    /// A plank currently rests on the edge
    pub filled: bool,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        start: impl Into<StumpId>,
        finish: impl Into<StumpId>,
        length: u32,
        filled: bool,
    ) -> Self {
        Self {
            id,
            span: Span::new(start, finish),
            length,
            filled,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Edge {} spans {} - {} Length {} Filled = {}",
            self.id,
            self.span.start,
            self.span.finish,
            self.length,
            if self.filled { "True" } else { "False" }
        )
    }
}

/// A movable plank. `span` is `None` while the player carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plank {
    /// Unique plank identifier
    pub id: PlankId,
    /// Fixed for the life of the puzzle
    pub length: u32,
    /// Stumps the plank rests between; `None` while carried
    #[serde(default)]
    pub span: Option<Span>,
}

impl Plank {
    pub fn placed(
        id: PlankId,
        start: impl Into<StumpId>,
        finish: impl Into<StumpId>,
        length: u32,
    ) -> Self {
        Self {
            id,
            length,
            span: Some(Span::new(start, finish)),
        }
    }

    pub fn held(id: PlankId, length: u32) -> Self {
        Self {
            id,
            length,
            span: None,
        }
    }

    pub fn is_held(&self) -> bool {
        self.span.is_none()
    }
}

impl fmt::Display for Plank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some(span) => write!(
                f,
                "Plank {} spans {} - {} Length {}",
                self.id, span.start, span.finish, self.length
            ),
            None => write!(f, "Plank {} {{Currently Held}} Length {}", self.id, self.length),
        }
    }
}

/// The player's position and the plank they carry, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stump the player stands on
    pub position: StumpId,
    /// Plank in hand, at most one
    pub plank: Option<PlankId>,
}

impl Player {
    pub fn new(position: impl Into<StumpId>) -> Self {
        Self {
            position: position.into(),
            plank: None,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.plank.is_some()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.plank {
            Some(id) => write!(f, "Player at {} carrying plank {}", self.position, id),
            None => write!(f, "Player at {} carrying nothing", self.position),
        }
    }
}

/// One point in the search: the whole board plus the player.
///
/// Cloning a state copies every edge, plank and the player, so a clone can be
/// mutated without affecting any other node of the search tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub stumps: Vec<Stump>,
    pub edges: Vec<Edge>,
    pub planks: Vec<Plank>,
    pub player: Player,
}

impl State {
    pub fn is_goal(&self, goal: &str) -> bool {
        self.player.position == goal
    }

    pub fn has_stump(&self, id: &str) -> bool {
        self.stumps.iter().any(|s| s.id == id)
    }

    /// Edges with `stump` as one of their endpoints, in board order
    pub fn incident_edges<'a>(&'a self, stump: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.span.touches(stump))
    }

    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.span.joins(a, b))
    }

    pub fn edge_between_mut(&mut self, a: &str, b: &str) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.span.joins(a, b))
    }

    /// The plank resting between `a` and `b`, if any
    pub fn plank_between(&self, a: &str, b: &str) -> Option<&Plank> {
        self.planks
            .iter()
            .find(|p| p.span.as_ref().map_or(false, |s| s.joins(a, b)))
    }

    /// The plank the player is carrying
    pub fn held_plank(&self) -> Option<&Plank> {
        let id = self.player.plank?;
        self.planks.iter().find(|p| p.id == id)
    }

    pub fn filled_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.filled).count()
    }

    /// Verify the fill/plank bookkeeping of this state.
    ///
    /// Every filled edge carries exactly one plank of matching length, every
    /// placed plank lies on an edge, and the player holds exactly the one
    /// unplaced plank (or nothing when all planks are placed).
    pub fn check_invariants(&self) -> Result<()> {
        for edge in &self.edges {
            let resting: Vec<&Plank> = self
                .planks
                .iter()
                .filter(|p| p.span.as_ref().map_or(false, |s| s.same_pair(&edge.span)))
                .collect();

            if resting.len() > 1 {
                return Err(Error::invalid_board(format!(
                    "edge {} carries {} planks",
                    edge.id,
                    resting.len()
                )));
            }
            if edge.filled != (resting.len() == 1) {
                return Err(Error::invalid_board(format!(
                    "edge {} is marked filled = {} but has {} plank(s)",
                    edge.id,
                    edge.filled,
                    resting.len()
                )));
            }
            if let Some(plank) = resting.first() {
                if plank.length != edge.length {
                    return Err(Error::invalid_board(format!(
                        "plank {} of length {} rests on edge {} of length {}",
                        plank.id, plank.length, edge.id, edge.length
                    )));
                }
            }
        }

        for plank in &self.planks {
            if let Some(span) = &plank.span {
                if self.edge_between(&span.start, &span.finish).is_none() {
                    return Err(Error::invalid_board(format!(
                        "plank {} spans {} - {} where no edge exists",
                        plank.id, span.start, span.finish
                    )));
                }
            }
        }

        let held: Vec<PlankId> = self
            .planks
            .iter()
            .filter(|p| p.is_held())
            .map(|p| p.id)
            .collect();
        match (held.as_slice(), self.player.plank) {
            ([], None) => Ok(()),
            ([id], Some(holding)) if *id == holding => Ok(()),
            _ => Err(Error::invalid_board(format!(
                "unplaced planks {:?} do not match player's plank {:?}",
                held, self.player.plank
            ))),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.player)?;
        for plank in &self.planks {
            writeln!(f, "{}", plank)?;
        }
        for (i, edge) in self.edges.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", edge)?;
        }
        Ok(())
    }
}

/// A validated initial board together with its reserved endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub state: State,
    pub source: StumpId,
    pub goal: StumpId,
}

impl Puzzle {
    /// Build a puzzle and validate the board.
    ///
    /// The player starts at `source`. If one plank has no span it is placed in
    /// the player's hand.
    pub fn new(
        stumps: Vec<Stump>,
        edges: Vec<Edge>,
        planks: Vec<Plank>,
        source: impl Into<StumpId>,
        goal: impl Into<StumpId>,
    ) -> Result<Self> {
        let source = source.into();
        let goal = goal.into();

        let mut stump_ids = HashSet::new();
        for stump in &stumps {
            if !stump_ids.insert(stump.id.as_str()) {
                return Err(Error::invalid_board(format!("duplicate stump '{}'", stump.id)));
            }
        }
        for reserved in [&source, &goal] {
            if !stump_ids.contains(reserved.as_str()) {
                return Err(Error::invalid_board(format!("missing stump '{}'", reserved)));
            }
        }

        let mut edge_ids = HashSet::new();
        for (i, edge) in edges.iter().enumerate() {
            if !edge_ids.insert(edge.id) {
                return Err(Error::invalid_board(format!("duplicate edge id {}", edge.id)));
            }
            for end in [&edge.span.start, &edge.span.finish] {
                if !stump_ids.contains(end.as_str()) {
                    return Err(Error::invalid_board(format!(
                        "edge {} references unknown stump '{}'",
                        edge.id, end
                    )));
                }
            }
            if edge.span.start == edge.span.finish {
                return Err(Error::invalid_board(format!(
                    "edge {} joins stump '{}' to itself",
                    edge.id, edge.span.start
                )));
            }
            if edges[..i].iter().any(|e| e.span.same_pair(&edge.span)) {
                return Err(Error::invalid_board(format!(
                    "more than one edge joins {} and {}",
                    edge.span.start, edge.span.finish
                )));
            }
        }

        let mut plank_ids = HashSet::new();
        for plank in &planks {
            if !plank_ids.insert(plank.id) {
                return Err(Error::invalid_board(format!("duplicate plank id {}", plank.id)));
            }
        }
        let held = planks.iter().find(|p| p.is_held()).map(|p| p.id);

        let state = State {
            stumps,
            edges,
            planks,
            player: Player {
                position: source.clone(),
                plank: held,
            },
        };
        state.check_invariants()?;

        Ok(Self {
            state,
            source,
            goal,
        })
    }

    pub fn from_config(config: PuzzleConfig) -> Result<Self> {
        let mut stumps: Vec<Stump> = Vec::new();
        let mut push_stump = |id: &str| {
            if !stumps.iter().any(|s| s.id == id) {
                stumps.push(Stump::new(id));
            }
        };
        for id in &config.stumps {
            push_stump(id.as_str());
        }
        push_stump(config.source.as_str());
        for edge in &config.edges {
            push_stump(edge.span.start.as_str());
            push_stump(edge.span.finish.as_str());
        }
        push_stump(config.goal.as_str());

        let planks = match config.planks {
            Some(planks) => planks,
            None => planks_for_filled_edges(&config.edges),
        };

        Self::new(stumps, config.edges, planks, config.source, config.goal)
    }

    pub fn plank_count(&self) -> usize {
        self.state.planks.len()
    }
}

/// One plank per filled edge, ids assigned from 1 in edge order
pub fn planks_for_filled_edges(edges: &[Edge]) -> Vec<Plank> {
    edges
        .iter()
        .filter(|e| e.filled)
        .zip(1..)
        .map(|(e, id)| Plank::placed(id, e.span.start.clone(), e.span.finish.clone(), e.length))
        .collect()
}

fn default_source() -> StumpId {
    SOURCE.to_string()
}

fn default_goal() -> StumpId {
    GOAL.to_string()
}

/// Serializable puzzle definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleConfig {
    #[serde(default = "default_source")]
    pub source: StumpId,
    #[serde(default = "default_goal")]
    pub goal: StumpId,
    /// Extra stumps not reachable through any edge
    #[serde(default)]
    pub stumps: Vec<StumpId>,
    pub edges: Vec<Edge>,
    /// Omitted: one plank per filled edge
    #[serde(default)]
    pub planks: Option<Vec<Plank>>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Start -3- A -3- Goal, with a plank on Start-A only
    pub(crate) fn linear_puzzle() -> Puzzle {
        Puzzle::new(
            vec![Stump::new(SOURCE), Stump::new("A"), Stump::new(GOAL)],
            vec![Edge::new(1, SOURCE, "A", 3, true), Edge::new(2, "A", GOAL, 3, false)],
            vec![Plank::placed(1, SOURCE, "A", 3)],
            SOURCE,
            GOAL,
        )
        .unwrap()
    }

    /// Hub stump A with two planks resting on it and one empty slot of each length
    pub(crate) fn hub_puzzle() -> Puzzle {
        Puzzle::new(
            vec![
                Stump::new(SOURCE),
                Stump::new("A"),
                Stump::new("B"),
                Stump::new(GOAL),
            ],
            vec![
                Edge::new(1, SOURCE, "A", 2, true),
                Edge::new(2, "A", "B", 3, true),
                Edge::new(3, "A", GOAL, 2, false),
                Edge::new(4, "B", GOAL, 5, false),
            ],
            vec![Plank::placed(1, SOURCE, "A", 2), Plank::placed(2, "A", "B", 3)],
            SOURCE,
            GOAL,
        )
        .unwrap()
    }

    /// Two planks of the same length on parallel routes
    pub(crate) fn twin_plank_puzzle() -> Puzzle {
        Puzzle::new(
            vec![
                Stump::new(SOURCE),
                Stump::new("A"),
                Stump::new("B"),
                Stump::new(GOAL),
            ],
            vec![
                Edge::new(1, SOURCE, "A", 2, true),
                Edge::new(2, SOURCE, "B", 2, true),
                Edge::new(3, "A", GOAL, 2, false),
            ],
            vec![Plank::placed(1, SOURCE, "A", 2), Plank::placed(2, SOURCE, "B", 2)],
            SOURCE,
            GOAL,
        )
        .unwrap()
    }

    /// The player starts carrying a length-4 plank; a length-2 plank rests on Start-B
    pub(crate) fn held_plank_puzzle() -> Puzzle {
        Puzzle::new(
            vec![
                Stump::new(SOURCE),
                Stump::new("A"),
                Stump::new("B"),
                Stump::new(GOAL),
            ],
            vec![
                Edge::new(1, SOURCE, "A", 4, false),
                Edge::new(2, SOURCE, "B", 2, true),
                Edge::new(3, "A", GOAL, 4, false),
                Edge::new(4, "B", GOAL, 2, false),
            ],
            vec![Plank::held(1, 4), Plank::placed(2, SOURCE, "B", 2)],
            SOURCE,
            GOAL,
        )
        .unwrap()
    }

    /// Every fixture board, for properties that must hold on all of them
    pub(crate) fn all_puzzles() -> Vec<Puzzle> {
        vec![linear_puzzle(), hub_puzzle(), twin_plank_puzzle(), held_plank_puzzle()]
    }

    #[test]
    fn test_span_joins_either_direction() {
        let span = Span::new("A", "B");
        assert!(span.joins("A", "B"));
        assert!(span.joins("B", "A"));
        assert!(!span.joins("A", "C"));
        assert_eq!(span.other_end("B"), Some("A"));
        assert_eq!(span.other_end("C"), None);
    }

    #[test]
    fn test_linear_puzzle_is_valid() {
        let puzzle = linear_puzzle();
        assert_eq!(puzzle.state.player.position, SOURCE);
        assert!(!puzzle.state.player.is_holding());
        assert_eq!(puzzle.plank_count(), 1);
        assert!(puzzle.state.check_invariants().is_ok());
    }

    #[test]
    fn test_filled_edge_without_plank_rejected() {
        let result = Puzzle::new(
            vec![Stump::new(SOURCE), Stump::new(GOAL)],
            vec![Edge::new(1, SOURCE, GOAL, 2, true)],
            vec![],
            SOURCE,
            GOAL,
        );
        assert!(matches!(result, Err(Error::InvalidBoard { .. })));
    }

    #[test]
    fn test_plank_length_mismatch_rejected() {
        let result = Puzzle::new(
            vec![Stump::new(SOURCE), Stump::new(GOAL)],
            vec![Edge::new(1, SOURCE, GOAL, 2, true)],
            vec![Plank::placed(1, SOURCE, GOAL, 3)],
            SOURCE,
            GOAL,
        );
        assert!(matches!(result, Err(Error::InvalidBoard { .. })));
    }

    #[test]
    fn test_parallel_edges_rejected() {
        let result = Puzzle::new(
            vec![Stump::new(SOURCE), Stump::new(GOAL)],
            vec![
                Edge::new(1, SOURCE, GOAL, 2, false),
                Edge::new(2, GOAL, SOURCE, 3, false),
            ],
            vec![],
            SOURCE,
            GOAL,
        );
        assert!(matches!(result, Err(Error::InvalidBoard { .. })));
    }

    #[test]
    fn test_unplaced_plank_starts_in_hand() {
        let puzzle = Puzzle::new(
            vec![Stump::new(SOURCE), Stump::new(GOAL)],
            vec![Edge::new(1, SOURCE, GOAL, 4, false)],
            vec![Plank::held(7, 4)],
            SOURCE,
            GOAL,
        )
        .unwrap();
        assert_eq!(puzzle.state.player.plank, Some(7));
        assert_eq!(puzzle.state.held_plank().map(|p| p.length), Some(4));

        let puzzle = held_plank_puzzle();
        assert_eq!(puzzle.state.player.plank, Some(1));
        assert!(puzzle.state.check_invariants().is_ok());
    }

    #[test]
    fn test_config_synthesises_planks() {
        let json = r#"{
            "edges": [
                {"id": 1, "start": "Start", "finish": "A", "length": 3, "filled": true},
                {"id": 2, "start": "A", "finish": "Goal", "length": 3, "filled": false}
            ]
        }"#;
        let config: PuzzleConfig = serde_json::from_str(json).unwrap();
        let puzzle = Puzzle::from_config(config).unwrap();

        assert_eq!(puzzle, linear_puzzle());
    }
}
