//! Monte Carlo Tree Search (MCTS) with UCT selection.
//!
//! This module implements plain UCT:
//! - UCB1 selection, with unvisited children tried first
//! - Lazy expansion: a leaf gets its children on its second visit
//! - Uniformly random rollouts for value estimation
//! - Final move chosen by visit count
//!
//! Each node's `w` accumulates results for the player who moved *into* that
//! node, so a parent maximizing its children's Q picks the best move for
//! the side it has to move. Values flip (`v -> 1 - v`) at every level.

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::board::{Board, Color};
use crate::constants::UCT_C;
use crate::engine::{Engine, SearchSession};
use crate::movegen::successors;
use crate::playout::rollout;

/// A node in the MCTS search tree.
///
/// Children are owned; the path back to the root is kept as a list of
/// child indices during each simulation.
pub struct TreeNode {
    /// The position at this node
    pub board: Board,
    /// Side to move at this node
    pub to_move: Color,
    /// Number of visits
    pub n: u32,
    /// Accumulated value for the side that moved into this node
    pub w: f64,
    /// Child nodes (one per legal move once expanded)
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(board: Board, to_move: Color) -> Self {
        Self {
            board,
            to_move,
            n: 0,
            w: 0.0,
            children: Vec::new(),
        }
    }

    /// Average value, 0 for an unvisited node.
    #[inline]
    pub fn q(&self) -> f64 {
        if self.n > 0 {
            self.w / self.n as f64
        } else {
            0.0
        }
    }
}

/// Materialize one child per legal move.
pub fn expand(node: &mut TreeNode) {
    if !node.children.is_empty() {
        return;
    }
    let next = node.to_move.opponent();
    node.children = successors(&node.board, node.to_move)
        .into_iter()
        .map(|board| TreeNode::new(board, next))
        .collect();
}

/// UCT priority of `child`; `log_parent` is `ln(N_parent + 1)`.
#[inline]
fn uct(child: &TreeNode, log_parent: f64, c: f64) -> f64 {
    if child.n == 0 {
        return f64::INFINITY;
    }
    child.q() + c * (log_parent / child.n as f64).sqrt()
}

/// Index of the child with the highest UCT priority.
fn most_urgent(node: &TreeNode, c: f64) -> usize {
    let log_parent = (node.n as f64 + 1.0).ln();
    node.children
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            uct(a, log_parent, c)
                .partial_cmp(&uct(b, log_parent, c))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Descend through the tree to a leaf, expanding it if it is being revisited.
///
/// Returns the path of child indices from root to the node to roll out from.
fn tree_descend(tree: &mut TreeNode, c: f64, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = tree;

    while !node.children.is_empty() {
        let idx = most_urgent(node, c);
        path.push(idx);
        node = &mut node.children[idx];
    }

    if node.n > 0 && node.board.winner().is_none() {
        expand(node);
        if !node.children.is_empty() {
            path.push(rng.usize(..node.children.len()));
        }
    }

    path
}

/// Get the node reached by following the given path.
fn node_at<'a>(tree: &'a TreeNode, path: &[usize]) -> &'a TreeNode {
    path.iter().fold(tree, |node, &idx| &node.children[idx])
}

/// Propagate a rollout result (from White's point of view) along `path`.
fn tree_update(tree: &mut TreeNode, path: &[usize], white_value: f64) {
    // The root was entered by the opponent of its side to move.
    let mut value = if tree.to_move.opponent() == Color::White {
        white_value
    } else {
        1.0 - white_value
    };

    tree.n += 1;
    tree.w += value;

    let mut node = tree;
    for &idx in path {
        value = 1.0 - value;
        node = &mut node.children[idx];
        node.n += 1;
        node.w += value;
    }
}

/// Run simulations until `sims` is exhausted or `deadline` passes.
///
/// Returns the number of simulations performed.
pub fn tree_search(
    root: &mut TreeNode,
    sims: u32,
    deadline: Option<Instant>,
    c: f64,
    rng: &mut fastrand::Rng,
) -> u32 {
    expand(root);

    let mut done = 0;
    while done < sims {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        let path = tree_descend(root, c, rng);
        let leaf = node_at(root, &path);
        let value = rollout(&leaf.board, leaf.to_move, rng);
        tree_update(root, &path, value);
        done += 1;
    }
    done
}

/// The most visited child of the root, if the root has any.
pub fn most_visited(root: &TreeNode) -> Option<&TreeNode> {
    root.children.iter().max_by_key(|c| c.n)
}

/// Log statistics about the root's children.
pub fn dump_children(root: &TreeNode) {
    for (i, child) in root.children.iter().enumerate() {
        trace!("child {i}: n={} w={:.1} q={:.3}", child.n, child.w, child.q());
    }
}

/// MCTS engine configuration.
#[derive(Debug, Clone)]
pub struct MonteCarlo {
    pub simulations: u32,
    pub time_limit: Option<Duration>,
    /// UCT exploration constant
    pub exploration: f64,
}

impl MonteCarlo {
    pub fn new(simulations: u32, time_limit: Duration) -> Self {
        Self {
            simulations,
            time_limit: Some(time_limit),
            exploration: UCT_C,
        }
    }

    /// Build and search a tree for `color` on `board`, returning the root.
    pub fn search(&self, session: &mut SearchSession, board: &Board, color: Color) -> TreeNode {
        let start = Instant::now();
        let mut root = TreeNode::new(board.clone(), color);
        expand(&mut root);
        if root.children.is_empty() {
            return root;
        }

        let deadline = self.time_limit.map(|t| start + t);
        let done = tree_search(
            &mut root,
            self.simulations,
            deadline,
            self.exploration,
            &mut session.rng,
        );

        debug!(
            "mcts: {done}/{} simulations in {:.3}s, {} root children",
            self.simulations,
            start.elapsed().as_secs_f64(),
            root.children.len()
        );
        dump_children(&root);
        root
    }
}

impl Engine for MonteCarlo {
    fn name(&self) -> String {
        format!("mcts {}", self.simulations)
    }

    fn choose(&mut self, session: &mut SearchSession, board: &Board, color: Color) -> Board {
        let root = self.search(session, board, color);
        most_visited(&root).map_or_else(|| board.clone(), |child| child.board.clone())
    }
}
