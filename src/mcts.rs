//! Monte Carlo Tree Search with UCT selection.
//!
//! One iteration: **select** a path down the tree (any never-visited child
//! is taken before the UCT formula applies), **expand** a leaf on its
//! second visit into one child per legal move, **simulate** a uniformly
//! random playout to a full board, and **backpropagate** the outcome along
//! the path.
//!
//! Nodes live in an arena indexed by [`NodeId`]; each node stores only the
//! single-cell move that produced it, and descent writes and later undoes
//! those cells on one scratch board instead of snapshotting the grid per
//! node. Outcomes are net signed scores from the root mover's perspective;
//! each node accumulates them under the sign of the player who moved into
//! it, so plain maximization is correct at every level.

use std::cmp::Ordering;

use log::debug;

use crate::board::{Board, Move, TabooMove};
use crate::executor::{CancelToken, ProposalSlot};
use crate::score::points_for;
use crate::state::GameState;
use crate::strategy::{SearchEnd, SearchStrategy};

/// Exploration constant in the UCT formula.
pub const EXPLORATION: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

const ROOT: NodeId = NodeId(0);

/// Sign, from the root mover's perspective, of the player who made the
/// move into a node at this depth. The root itself counts as the mover.
fn move_sign(depth: u32) -> i32 {
    if depth == 0 || depth % 2 == 1 { 1 } else { -1 }
}

struct Node {
    /// Move that produced this node; absent at the root.
    mv: Option<Move>,
    /// Ply count from the root.
    depth: u32,
    /// Net signed score from the root to here, root mover's perspective.
    /// The root carries the current score difference of the game.
    score: i32,
    /// Visit count.
    n: u32,
    /// Accumulated outcomes, signed for the player who moved into this node.
    q: f64,
    /// Child ids; empty until expanded.
    children: Vec<NodeId>,
    expanded: bool,
}

struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new(root_score: i32) -> Self {
        Self {
            nodes: vec![Node {
                mv: None,
                depth: 0,
                score: root_score,
                n: 0,
                q: 0.0,
                children: Vec::new(),
                expanded: false,
            }],
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}

pub struct MctsStrategy {
    exploration: f64,
    rng: fastrand::Rng,
    best: Option<Move>,
}

impl Default for MctsStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MctsStrategy {
    pub fn new() -> Self {
        Self {
            exploration: EXPLORATION,
            rng: fastrand::Rng::new(),
            best: None,
        }
    }

    /// Deterministic playouts for tests and reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            ..Self::new()
        }
    }

    fn uct(&self, child: &Node, ln_parent: f64) -> f64 {
        child.q / child.n as f64 + self.exploration * (ln_parent / child.n as f64).sqrt()
    }

    /// Child to descend into: any unvisited child first, then the UCT argmax.
    fn select_child(&self, tree: &Tree, id: NodeId) -> NodeId {
        let node = tree.node(id);
        for &c in &node.children {
            if tree.node(c).n == 0 {
                return c;
            }
        }
        let ln_parent = (node.n as f64).ln();
        node.children
            .iter()
            .copied()
            .max_by(|&a, &b| {
                self.uct(tree.node(a), ln_parent)
                    .partial_cmp(&self.uct(tree.node(b), ln_parent))
                    .unwrap_or(Ordering::Equal)
            })
            .unwrap_or(id)
    }

    /// Generate one child per legal move of `board` (already positioned at
    /// the node being expanded).
    fn expand(&self, tree: &mut Tree, id: NodeId, board: &mut Board, taboo: &[TabooMove]) {
        let depth = tree.node(id).depth + 1;
        let base = tree.node(id).score;
        let sign = move_sign(depth);
        for mv in board.legal_moves(taboo) {
            board.put(mv.row, mv.col, mv.value);
            let points = points_for(board.regions_completed(mv.row, mv.col));
            board.clear(mv.row, mv.col);
            let child = Node {
                mv: Some(mv),
                depth,
                score: base + sign * points,
                n: 0,
                q: 0.0,
                children: Vec::new(),
                expanded: false,
            };
            let cid = tree.push(child);
            tree.node_mut(id).children.push(cid);
        }
        tree.node_mut(id).expanded = true;
    }

    /// Random playout from `board`, starting with the player to move at
    /// `depth`, seeded with the accumulated signed score. A stuck playout
    /// (no legal move on a non-full board) counts as neutral.
    fn simulate(&mut self, board: &Board, taboo: &[TabooMove], score: i32, depth: u32) -> i32 {
        let mut sim = board.clone();
        let mut score = score;
        let mut sign = move_sign(depth + 1);
        while !sim.is_full() {
            let moves = sim.legal_moves(taboo);
            if moves.is_empty() {
                return 0;
            }
            let mv = moves[self.rng.usize(..moves.len())];
            sim.put(mv.row, mv.col, mv.value);
            score += sign * points_for(sim.regions_completed(mv.row, mv.col));
            sign = -sign;
        }
        score
    }

    /// One full selection / expansion / simulation / backpropagation pass.
    /// `board` must be at the root position on entry and is restored.
    fn iterate(&mut self, tree: &mut Tree, board: &mut Board, taboo: &[TabooMove]) {
        let mut path = vec![ROOT];
        let mut applied: Vec<Move> = Vec::new();
        let mut id = ROOT;

        // Selection
        loop {
            let node = tree.node(id);
            if !node.expanded || node.children.is_empty() {
                break;
            }
            let next = self.select_child(tree, id);
            let Some(mv) = tree.node(next).mv else { break };
            board.put(mv.row, mv.col, mv.value);
            applied.push(mv);
            path.push(next);
            id = next;
        }

        // Expansion and simulation
        let outcome = if board.is_full() {
            tree.node(id).score
        } else if tree.node(id).expanded {
            // Dead end discovered earlier: expanded, zero children.
            0
        } else if tree.node(id).n == 0 {
            self.simulate(board, taboo, tree.node(id).score, tree.node(id).depth)
        } else {
            self.expand(tree, id, board, taboo);
            match tree.node(id).children.first().copied() {
                None => 0, // no legal continuation
                Some(first) => {
                    // Descend into the freshly created leaf and play it out.
                    if let Some(mv) = tree.node(first).mv {
                        board.put(mv.row, mv.col, mv.value);
                        applied.push(mv);
                    }
                    path.push(first);
                    let (score, depth) = {
                        let leaf = tree.node(first);
                        (leaf.score, leaf.depth)
                    };
                    if board.is_full() {
                        score
                    } else {
                        self.simulate(board, taboo, score, depth)
                    }
                }
            }
        };

        // Backpropagation: the outcome sign was fixed during simulation and
        // only re-oriented per node here, never flipped along the path.
        for &nid in &path {
            let sign = move_sign(tree.node(nid).depth) as f64;
            let node = tree.node_mut(nid);
            node.n += 1;
            node.q += outcome as f64 * sign;
        }

        // Restore the scratch board.
        for mv in applied.iter().rev() {
            board.clear(mv.row, mv.col);
        }
    }

    /// Best root move so far: greatest mean outcome among visited children.
    fn best_child(&self, tree: &Tree) -> Option<Move> {
        tree.node(ROOT)
            .children
            .iter()
            .map(|&c| tree.node(c))
            .filter(|c| c.n > 0)
            .max_by(|a, b| {
                (a.q / a.n as f64)
                    .partial_cmp(&(b.q / b.n as f64))
                    .unwrap_or(Ordering::Equal)
            })
            .and_then(|c| c.mv)
    }
}

impl SearchStrategy for MctsStrategy {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn run(&mut self, state: &GameState, slot: &ProposalSlot, cancel: &CancelToken) -> SearchEnd {
        let taboo = &state.taboo_moves;
        let mut board = state.board.clone();
        if board.is_full() || board.legal_moves(taboo).is_empty() {
            debug!("nothing to search, board is closed");
            return SearchEnd::Exhausted;
        }
        let mut tree = Tree::new(state.score_diff());

        loop {
            if cancel.is_cancelled() {
                return SearchEnd::Cancelled;
            }
            self.iterate(&mut tree, &mut board, taboo);
            if let Some(mv) = self.best_child(&tree) {
                if self.best != Some(mv) {
                    self.best = Some(mv);
                    slot.propose(mv);
                }
            }
        }
    }

    fn best_move_so_far(&self) -> Option<Move> {
        self.best
    }
}
