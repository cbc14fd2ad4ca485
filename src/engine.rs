//! Public entry points: search sessions, configuration, and the engine trait.
//!
//! A [`SearchSession`] owns all state that outlives a single search: the
//! transposition table, the position history used for the repetition
//! penalty, and the random number generator used by MCTS rollouts. Callers
//! create one per game and call [`SearchSession::reset`] (or make a new one)
//! before starting an unrelated game, so cached results never leak between
//! games.
//!
//! ## Example
//!
//! ```
//! use checkers_rust::board::Color;
//! use checkers_rust::engine::{best_move, new_game, SearchConfig, SearchSession};
//!
//! let mut session = SearchSession::with_seed(7);
//! let board = new_game();
//! let config = SearchConfig::alpha_beta(2, 1.0);
//! let reply = best_move(&mut session, &board, Color::Red, &config);
//! assert_ne!(reply, board);
//! ```

use std::time::Duration;

use crate::alphabeta::AlphaBeta;
use crate::board::{Board, Color};
use crate::eval::PositionHistory;
use crate::mcts::MonteCarlo;
use crate::tt::TranspositionTable;

/// Search state shared by every search of one game.
pub struct SearchSession {
    pub tt: TranspositionTable,
    pub history: PositionHistory,
    pub rng: fastrand::Rng,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    /// A fresh session with an entropy-seeded random number generator.
    pub fn new() -> Self {
        Self {
            tt: TranspositionTable::new(),
            history: PositionHistory::new(),
            rng: fastrand::Rng::new(),
        }
    }

    /// A fresh session whose MCTS rollouts are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            ..Self::new()
        }
    }

    /// Forget everything learned in previous games.
    pub fn reset(&mut self) {
        self.tt.clear();
        self.history.clear();
    }
}

/// Which engine to run and its budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchKind {
    /// Iterative-deepening alpha-beta to a base depth (plus the endgame bonus)
    AlphaBeta { depth: u32 },
    /// Monte-Carlo tree search with a simulation budget
    MonteCarlo { simulations: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub kind: SearchKind,
    pub time_limit: Duration,
}

impl SearchConfig {
    /// Panics on a zero depth or a non-positive time limit.
    pub fn alpha_beta(depth: u32, time_limit_secs: f64) -> Self {
        assert!(depth > 0, "search depth must be positive");
        Self {
            kind: SearchKind::AlphaBeta { depth },
            time_limit: time_limit(time_limit_secs),
        }
    }

    /// Panics on a zero simulation count or a non-positive time limit.
    pub fn monte_carlo(simulations: u32, time_limit_secs: f64) -> Self {
        assert!(simulations > 0, "simulation budget must be positive");
        Self {
            kind: SearchKind::MonteCarlo { simulations },
            time_limit: time_limit(time_limit_secs),
        }
    }

    /// The engine this configuration describes.
    pub fn engine(&self) -> Box<dyn Engine> {
        match self.kind {
            SearchKind::AlphaBeta { depth } => Box::new(AlphaBeta::new(depth, self.time_limit)),
            SearchKind::MonteCarlo { simulations } => {
                Box::new(MonteCarlo::new(simulations, self.time_limit))
            }
        }
    }
}

fn time_limit(secs: f64) -> Duration {
    assert!(
        secs.is_finite() && secs > 0.0,
        "time limit must be a positive number of seconds, got {secs}"
    );
    Duration::from_secs_f64(secs)
}

/// A move-choosing strategy.
///
/// Implementations return a position reachable by exactly one ply of
/// `color`, or an unchanged copy of `board` when `color` has no legal move.
pub trait Engine {
    /// Short label for logs and game output.
    fn name(&self) -> String;

    fn choose(&mut self, session: &mut SearchSession, board: &Board, color: Color) -> Board;
}

/// The starting position.
pub fn new_game() -> Board {
    Board::new()
}

/// Pick a move for `color` with the engine described by `config`.
pub fn best_move(
    session: &mut SearchSession,
    board: &Board,
    color: Color,
    config: &SearchConfig,
) -> Board {
    config.engine().choose(session, board, color)
}
