//! Loading puzzle definitions.
//!
//! Two inputs are understood:
//!
//! - the line format, one edge per line as `src-dst-length-T|F`, where `T`
//!   marks an edge that starts with a plank on it. Blank lines and lines
//!   starting with `#` are ignored. The player starts on `Start` and must
//!   reach `Goal`.
//! - JSON matching [`PuzzleConfig`].

use std::fs;
use std::path::Path;

use crate::board::{planks_for_filled_edges, Edge, Puzzle, PuzzleConfig, Stump, GOAL, SOURCE};
use crate::error::{Error, Result};

/// Parse the line format
pub fn parse_lines(input: &str) -> Result<Puzzle> {
    let mut stumps: Vec<Stump> = vec![Stump::new(SOURCE)];
    let mut edges: Vec<Edge> = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_number = index + 1;
        let invalid = |message: &str| Error::InvalidLine {
            line: line_number,
            content: line.to_string(),
            message: message.to_string(),
        };

        let fields: Vec<&str> = line.split('-').map(str::trim).collect();
        let [src, dst, length, filled] = fields.as_slice() else {
            return Err(invalid("expected 'src-dst-length-T|F'"));
        };
        if src.is_empty() || dst.is_empty() {
            return Err(invalid("empty stump name"));
        }
        let length: u32 = length.parse().map_err(|_| invalid("length is not a number"))?;
        let filled = match *filled {
            "T" | "t" => true,
            "F" | "f" => false,
            _ => return Err(invalid("fill flag must be T or F")),
        };

        for name in [*src, *dst] {
            if !stumps.iter().any(|s| s.id == name) {
                stumps.push(Stump::new(name));
            }
        }
        edges.push(Edge::new(edges.len() as u32 + 1, *src, *dst, length, filled));
    }

    if !stumps.iter().any(|s| s.id == GOAL) {
        stumps.push(Stump::new(GOAL));
    }
    let planks = planks_for_filled_edges(&edges);

    Puzzle::new(stumps, edges, planks, SOURCE, GOAL)
}

/// Parse a JSON puzzle definition
pub fn parse_json(input: &str) -> Result<Puzzle> {
    let config: PuzzleConfig = serde_json::from_str(input)?;
    Puzzle::from_config(config)
}

/// Load a puzzle file, choosing the format by its extension (`.json` or not)
pub fn load_file(path: &Path) -> Result<Puzzle> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        operation: format!("read puzzle file {}", path.display()),
        source,
    })?;

    if path.extension().map_or(false, |ext| ext == "json") {
        parse_json(&content)
    } else {
        parse_lines(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::linear_puzzle;

    #[test]
    fn test_parse_linear_board() {
        let puzzle = parse_lines("Start-A-3-T\nA-Goal-3-F\n").unwrap();
        assert_eq!(puzzle, linear_puzzle());
    }

    #[test]
    fn test_parse_assigns_ids_in_order() {
        let input = "# sample board\nStart-A-2-T\n\nA-B-3-T\nB-Goal-2-F\n";
        let puzzle = parse_lines(input).unwrap();

        let ids: Vec<u32> = puzzle.state.edges.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let plank_ids: Vec<u32> = puzzle.state.planks.iter().map(|p| p.id).collect();
        assert_eq!(plank_ids, vec![1, 2]);
        let stumps: Vec<&str> = puzzle.state.stumps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(stumps, vec!["Start", "A", "B", "Goal"]);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = parse_lines("Start-A-3-T\nA-Goal-x-F\n").unwrap_err();
        assert!(matches!(err, Error::InvalidLine { line: 2, .. }));

        let err = parse_lines("Start-A-3\n").unwrap_err();
        assert!(matches!(err, Error::InvalidLine { line: 1, .. }));

        let err = parse_lines("Start-A-3-Y\n").unwrap_err();
        assert!(matches!(err, Error::InvalidLine { line: 1, .. }));
    }

    #[test]
    fn test_parse_missing_goal_edge_is_still_valid() {
        // Goal exists but nothing reaches it
        let puzzle = parse_lines("Start-A-3-T\n").unwrap();
        assert!(puzzle.state.has_stump(GOAL));
        assert_eq!(puzzle.state.incident_edges(GOAL).count(), 0);
    }

    #[test]
    fn test_parse_json_with_held_plank() {
        let json = r#"{
            "edges": [
                {"id": 1, "start": "Start", "finish": "Goal", "length": 4, "filled": false}
            ],
            "planks": [{"id": 9, "length": 4}]
        }"#;
        let puzzle = parse_json(json).unwrap();
        assert_eq!(puzzle.state.player.plank, Some(9));
    }

    #[test]
    fn test_parse_json_rejects_bad_input() {
        assert!(matches!(parse_json("{"), Err(Error::Serialization(_))));
    }
}
