//! Duplicate detection for the search.
//!
//! Two states are the same search position when the same edges are bridged,
//! the player stands on the same stump, and the player either does or does
//! not carry a plank. Which plank is carried is not part of the key, and
//! edges are compared by id so their order in the board does not matter.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::board::{EdgeId, State, StumpId};

/// Structural identity of a state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    /// Ids of bridged edges, ascending
    filled: SmallVec<[EdgeId; 16]>,
    position: StumpId,
    holding: bool,
}

impl StateKey {
    pub fn of(state: &State) -> Self {
        let mut filled: SmallVec<[EdgeId; 16]> = state
            .edges
            .iter()
            .filter(|e| e.filled)
            .map(|e| e.id)
            .collect();
        filled.sort_unstable();

        Self {
            filled,
            position: state.player.position.clone(),
            holding: state.player.is_holding(),
        }
    }
}

/// Returns true if `a` and `b` are the same search position
pub fn same_position(a: &State, b: &State) -> bool {
    StateKey::of(a) == StateKey::of(b)
}

/// States already expanded during one search run, with the shallowest path
/// cost at which each was expanded.
#[derive(Debug, Default)]
pub struct ExploredSet {
    seen: HashMap<StateKey, u32>,
}

impl ExploredSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `state` is being expanded at path cost `g`.
    ///
    /// Returns false if it was already expanded at a cost no greater than
    /// `g`, in which case the caller should not expand it again.
    pub fn insert(&mut self, state: &State, g: u32) -> bool {
        let key = StateKey::of(state);
        match self.seen.get_mut(&key) {
            Some(best) if *best <= g => false,
            Some(best) => {
                *best = g;
                true
            }
            None => {
                self.seen.insert(key, g);
                true
            }
        }
    }

    pub fn contains(&self, state: &State) -> bool {
        self.seen.contains_key(&StateKey::of(state))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
