//! Search tree stored as an arena of nodes.
//!
//! Children are owned by the arena and listed on their parent by id; the
//! parent link is an id as well, so walking back to the root never needs a
//! reference cycle.

use smallvec::SmallVec;

use crate::action::{legal_actions, Action, INLINE_ACTIONS};
use crate::board::State;
use crate::error::Result;

/// Index of a node in its [`SearchTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

pub type Children = SmallVec<[NodeId; INLINE_ACTIONS]>;

/// A state plus the bookkeeping needed to rebuild the path that reached it
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub state: State,
    /// Action that produced this node; `None` for the root
    pub action: Option<Action>,
    pub parent: Option<NodeId>,
    pub children: Children,
    /// Number of actions from the root
    pub g: u32,
    /// The action that produced this node landed the player on the goal
    pub goal: bool,
    pub discovered: bool,
    pub processed: bool,
    expanded: bool,
}

impl SearchNode {
    fn new(state: State, action: Option<Action>, parent: Option<NodeId>, g: u32, goal: bool) -> Self {
        Self {
            state,
            action,
            parent,
            children: Children::new(),
            g,
            goal,
            discovered: false,
            processed: false,
            expanded: false,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// All nodes created by one search run
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    expansions: usize,
}

impl SearchTree {
    pub fn new(root: State, goal: &str) -> Self {
        let at_goal = root.is_goal(goal);
        Self {
            nodes: vec![SearchNode::new(root, None, None, 0, at_goal)],
            expansions: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes that have been expanded
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Create one child per legal action of `id`'s state.
    ///
    /// Each child gets its own clone of the parent state with the action
    /// applied, and a path cost one greater than the parent's. Expanding a
    /// node twice returns the children made the first time.
    pub fn expand(&mut self, id: NodeId, goal: &str) -> Result<Children> {
        if self.nodes[id.0].expanded {
            return Ok(self.nodes[id.0].children.clone());
        }

        let actions = legal_actions(&self.nodes[id.0].state);
        let g = self.nodes[id.0].g + 1;
        let mut children = Children::new();

        for action in actions {
            let mut state = self.nodes[id.0].state.clone();
            let at_goal = state.apply(&action, goal)?;
            let child = NodeId(self.nodes.len());
            self.nodes
                .push(SearchNode::new(state, Some(action), Some(id), g, at_goal));
            children.push(child);
        }

        let node = &mut self.nodes[id.0];
        node.children = children.clone();
        node.expanded = true;
        self.expansions += 1;
        Ok(children)
    }

    /// Actions from the root to `id`, in the order they were taken
    pub fn path_to(&self, id: NodeId) -> Vec<Action> {
        let mut path = Vec::with_capacity(self.nodes[id.0].g as usize);
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if let Some(action) = &node.action {
                path.push(action.clone());
            }
            current = node.parent;
        }
        path.reverse();
        path
    }
}
