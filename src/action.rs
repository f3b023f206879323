//! Player actions and the legal-action generator.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{Span, State, StumpId};

/// Inline capacity for the actions available at one stump
pub const INLINE_ACTIONS: usize = 8;

pub type ActionList = SmallVec<[Action; INLINE_ACTIONS]>;

/// One step the player can take.
///
/// For `PickUp` the stumps are the ends of the plank being lifted. For
/// `Move` and `PutDown` `src` is the player's stump and `dst` the far end of
/// the edge being crossed or bridged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Move { src: StumpId, dst: StumpId },
    PickUp { src: StumpId, dst: StumpId },
    PutDown { src: StumpId, dst: StumpId },
}

impl Action {
    pub fn move_to(src: impl Into<StumpId>, dst: impl Into<StumpId>) -> Self {
        Action::Move {
            src: src.into(),
            dst: dst.into(),
        }
    }

    pub fn pick_up(src: impl Into<StumpId>, dst: impl Into<StumpId>) -> Self {
        Action::PickUp {
            src: src.into(),
            dst: dst.into(),
        }
    }

    pub fn put_down(src: impl Into<StumpId>, dst: impl Into<StumpId>) -> Self {
        Action::PutDown {
            src: src.into(),
            dst: dst.into(),
        }
    }

    pub fn src(&self) -> &str {
        match self {
            Action::Move { src, .. } | Action::PickUp { src, .. } | Action::PutDown { src, .. } => {
                src
            }
        }
    }

    pub fn dst(&self) -> &str {
        match self {
            Action::Move { dst, .. } | Action::PickUp { dst, .. } | Action::PutDown { dst, .. } => {
                dst
            }
        }
    }

    /// The edge this action concerns, as an unordered pair
    pub fn span(&self) -> Span {
        Span::new(self.src(), self.dst())
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { src, dst } => write!(f, "Move from {} to {}", src, dst),
            Action::PickUp { src, dst } => {
                write!(f, "Pick up plank that spans stumps {} and {}", src, dst)
            }
            Action::PutDown { src, dst } => write!(
                f,
                "Put down the plank you're carrying between {} and {}",
                src, dst
            ),
        }
    }
}

/// Generate every legal action for `state`.
///
/// Order is deterministic: pick-ups first (in plank order), then one entry per
/// incident edge in edge order: a move if the edge is filled, or a put-down if
/// it is empty and the carried plank has the same length.
pub fn legal_actions(state: &State) -> ActionList {
    let mut actions = ActionList::new();
    let position = state.player.position.as_str();
    let held = state.held_plank();

    if held.is_none() {
        for plank in &state.planks {
            if let Some(span) = &plank.span {
                if span.touches(position) {
                    actions.push(Action::pick_up(span.start.clone(), span.finish.clone()));
                }
            }
        }
    }

    for edge in state.incident_edges(position) {
        let Some(other) = edge.span.other_end(position) else {
            continue;
        };
        if edge.filled {
            actions.push(Action::move_to(position, other));
        } else if held.map_or(false, |p| p.length == edge.length) {
            actions.push(Action::put_down(position, other));
        }
    }

    actions
}
