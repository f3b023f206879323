//! State transitions: applying one action to a board state.
//!
//! States are mutated in place. Callers that need to keep the original
//! (every search expansion does) clone it first.

use crate::action::Action;
use crate::board::State;
use crate::error::{Error, Result};

impl State {
    /// Apply `action` to this state.
    ///
    /// Returns `Ok(true)` when a move lands the player on `goal`. An action
    /// that [`legal_actions`](crate::action::legal_actions) could not have
    /// produced for this state is an invariant violation; the state may be
    /// partially updated in that case and must be discarded.
    pub fn apply(&mut self, action: &Action, goal: &str) -> Result<bool> {
        match action {
            Action::Move { src, dst } => {
                if self.player.position != *src {
                    return Err(Error::invariant(action, "player is not on the source stump"));
                }
                match self.edge_between(src, dst) {
                    Some(edge) if edge.filled => {}
                    Some(_) => return Err(Error::invariant(action, "edge is not bridged")),
                    None => return Err(Error::invariant(action, "no edge joins these stumps")),
                }
                self.player.position = dst.clone();
                Ok(self.player.position == goal)
            }

            Action::PickUp { src, dst } => {
                if self.player.is_holding() {
                    return Err(Error::invariant(action, "player already carries a plank"));
                }
                if self.player.position != *src && self.player.position != *dst {
                    return Err(Error::invariant(action, "plank is out of the player's reach"));
                }
                let plank = self
                    .planks
                    .iter_mut()
                    .find(|p| p.span.as_ref().map_or(false, |s| s.joins(src, dst)))
                    .ok_or_else(|| Error::invariant(action, "no plank rests on this edge"))?;
                plank.span = None;
                let plank_id = plank.id;

                let edge = self
                    .edge_between_mut(src, dst)
                    .ok_or_else(|| Error::invariant(action, "no edge joins these stumps"))?;
                edge.filled = false;

                self.player.plank = Some(plank_id);
                Ok(false)
            }

            Action::PutDown { src, dst } => {
                let plank_id = self
                    .player
                    .plank
                    .ok_or_else(|| Error::invariant(action, "player carries no plank"))?;
                if self.player.position != *src {
                    return Err(Error::invariant(action, "player is not on the source stump"));
                }

                let edge = self
                    .edge_between_mut(src, dst)
                    .ok_or_else(|| Error::invariant(action, "no edge joins these stumps"))?;
                if edge.filled {
                    return Err(Error::invariant(action, "edge is already bridged"));
                }
                edge.filled = true;
                let edge_length = edge.length;

                let plank = self
                    .planks
                    .iter_mut()
                    .find(|p| p.id == plank_id && p.is_held())
                    .ok_or_else(|| Error::invariant(action, "carried plank is not in the hand"))?;
                if plank.length != edge_length {
                    return Err(Error::invariant(action, "plank length does not match the edge"));
                }
                plank.span = Some(action.span());

                self.player.plank = None;
                Ok(false)
            }
        }
    }
}
