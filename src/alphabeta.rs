//! Alpha-beta minimax with iterative deepening and a transposition table.
//!
//! White is the maximizing side and Red the minimizing side, matching the
//! evaluator's point of view. The driver searches depth 1, 2, ... up to the
//! base depth plus an endgame bonus, stopping early when the time budget
//! runs low. A depth that runs out of time is abandoned and the move from
//! the last completed depth is kept.
//!
//! # Example
//!
//! ```
//! use checkers_rust::alphabeta::AlphaBeta;
//! use checkers_rust::board::{Board, Color};
//! use checkers_rust::engine::SearchSession;
//!
//! let mut session = SearchSession::new();
//! let result = AlphaBeta::fixed(3).search(&mut session, &Board::new(), Color::Red);
//! assert_eq!(result.depth, 3);
//! ```

use std::time::{Duration, Instant};

use log::debug;

use crate::board::{Board, Color};
use crate::constants::{ABORT_CUTOFF, DEEPENING_CUTOFF, DEPTH_BONUS, TIME_CHECK_INTERVAL};
use crate::engine::{Engine, SearchSession};
use crate::eval::{evaluate, terminal_score, PositionHistory};
use crate::movegen::successors;
use crate::tt::{Bound, TranspositionTable};

/// Marker returned up the recursion when the deadline passes mid-search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncated;

/// Outcome of an alpha-beta search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen successor, or the input board if the side to move has no moves
    pub board: Board,
    /// Minimax score of `board` from White's point of view
    pub score: f64,
    /// Deepest fully completed iteration (0 if none completed)
    pub depth: u32,
    /// Nodes visited across all iterations
    pub nodes: u64,
    /// Transposition table hits across all iterations
    pub tt_hits: u64,
    /// Whether an iteration was abandoned because time ran out
    pub truncated: bool,
}

/// Base depth plus the endgame bonus for the number of pieces left.
pub fn dynamic_depth(board: &Board, base_depth: u32) -> u32 {
    let total = board.total_pieces();
    let bonus = DEPTH_BONUS
        .iter()
        .find(|&&(pieces, _)| total <= pieces)
        .map_or(0, |&(_, bonus)| bonus);
    base_depth + bonus
}

/// Alpha-beta engine configuration.
#[derive(Debug, Clone)]
pub struct AlphaBeta {
    pub depth: u32,
    /// `None` searches every depth to completion.
    pub time_limit: Option<Duration>,
    /// Apply the endgame depth bonus.
    pub dynamic: bool,
    pub use_tt: bool,
}

impl AlphaBeta {
    pub fn new(depth: u32, time_limit: Duration) -> Self {
        Self {
            depth,
            time_limit: Some(time_limit),
            dynamic: true,
            use_tt: true,
        }
    }

    /// Search exactly to `depth` with no deadline.
    pub fn fixed(depth: u32) -> Self {
        Self {
            depth,
            time_limit: None,
            dynamic: false,
            use_tt: true,
        }
    }

    pub fn without_tt(mut self) -> Self {
        self.use_tt = false;
        self
    }

    /// Run iterative deepening for `color` on `board`.
    ///
    /// Does not record the chosen position in the session history; see
    /// [`Engine::choose`] for that.
    pub fn search(&self, session: &mut SearchSession, board: &Board, color: Color) -> SearchResult {
        let start = Instant::now();
        let max_depth = if self.dynamic {
            dynamic_depth(board, self.depth)
        } else {
            self.depth
        };
        let hits_before = session.tt.stats().hits;

        if let Some(winner) = board.winner() {
            // Decided already, but a mover who can still move must play on.
            return SearchResult {
                board: successors(board, color)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| board.clone()),
                score: terminal_score(winner),
                depth: 0,
                nodes: 0,
                tt_hits: 0,
                truncated: false,
            };
        }

        let mut searcher = Searcher {
            tt: self.use_tt.then_some(&mut session.tt),
            history: &session.history,
            deadline: self.time_limit.map(|t| start + t.mul_f64(ABORT_CUTOFF)),
            nodes: 0,
        };

        let mut result = SearchResult {
            board: board.clone(),
            score: 0.0,
            depth: 0,
            nodes: 0,
            tt_hits: 0,
            truncated: false,
        };

        for depth in 1..=max_depth {
            if let Some(limit) = self.time_limit {
                if start.elapsed() > limit.mul_f64(DEEPENING_CUTOFF) {
                    break;
                }
            }

            match searcher.minimax(board, depth, color, f64::NEG_INFINITY, f64::INFINITY) {
                Ok((score, best)) => {
                    result.score = score;
                    result.depth = depth;
                    debug!(
                        "depth {depth}: score {score:.2}, {} nodes, {:.3}s",
                        searcher.nodes,
                        start.elapsed().as_secs_f64()
                    );
                    match best {
                        Some(best) => result.board = best,
                        // No legal moves: the game is already decided.
                        None => break,
                    }
                    if score.is_infinite() {
                        break;
                    }
                }
                Err(Truncated) => {
                    debug!("depth {depth} abandoned after {:.3}s", start.elapsed().as_secs_f64());
                    result.truncated = true;
                    break;
                }
            }
        }

        result.nodes = searcher.nodes;
        if result.depth == 0 {
            // Not even depth 1 finished; fall back to any legal move.
            if let Some(first) = successors(board, color).into_iter().next() {
                result.board = first;
            }
        }
        result.tt_hits = session.tt.stats().hits - hits_before;
        result
    }
}

impl Engine for AlphaBeta {
    fn name(&self) -> String {
        format!("alpha-beta d{}", self.depth)
    }

    fn choose(&mut self, session: &mut SearchSession, board: &Board, color: Color) -> Board {
        let result = self.search(session, board, color);
        if result.board != *board {
            session.history.record(&result.board);
        }
        result.board
    }
}

struct Searcher<'a> {
    tt: Option<&'a mut TranspositionTable>,
    history: &'a PositionHistory,
    deadline: Option<Instant>,
    nodes: u64,
}

impl Searcher<'_> {
    #[inline]
    fn check_time(&self) -> Result<(), Truncated> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Truncated),
            _ => Ok(()),
        }
    }

    /// Minimax value of `board` with `to_move` to play, and the best successor.
    ///
    /// Only results of fully searched subtrees are written to the
    /// transposition table, so an abort never leaves a partial entry behind.
    fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        to_move: Color,
        mut alpha: f64,
        mut beta: f64,
    ) -> Result<(f64, Option<Board>), Truncated> {
        self.nodes += 1;
        if self.nodes % TIME_CHECK_INTERVAL == 0 {
            self.check_time()?;
        }

        if let Some(winner) = board.winner() {
            return Ok((terminal_score(winner), None));
        }
        if depth == 0 {
            return Ok((evaluate(board, self.history), None));
        }

        let generation = self.history.generation();
        if let Some(tt) = self.tt.as_deref_mut() {
            if let Some(hit) = tt.probe(board, to_move, generation, depth, alpha, beta) {
                return Ok(hit);
            }
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let maximizing = to_move == Color::White;
        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best: Option<Board> = None;

        for child in successors(board, to_move) {
            let (score, _) = self.minimax(&child, depth - 1, to_move.opponent(), alpha, beta)?;
            let improves = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if best.is_none() || improves {
                best_score = score;
                best = Some(child);
            }
            if maximizing {
                alpha = alpha.max(best_score);
            } else {
                beta = beta.min(best_score);
            }
            if beta <= alpha {
                break;
            }
        }

        if let Some(tt) = self.tt.as_deref_mut() {
            let bound = if best_score <= alpha_orig {
                Bound::UpperBound
            } else if best_score >= beta_orig {
                Bound::LowerBound
            } else {
                Bound::Exact
            };
            tt.store(board, to_move, generation, depth, best_score, bound, best.clone());
        }

        Ok((best_score, best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    fn board(diagram: &str) -> Board {
        diagram.parse().unwrap()
    }

    /// Plain minimax without pruning or caching.
    fn brute_force(board: &Board, depth: u32, to_move: Color, history: &PositionHistory) -> f64 {
        if let Some(winner) = board.winner() {
            return terminal_score(winner);
        }
        if depth == 0 {
            return evaluate(board, history);
        }
        let scores = successors(board, to_move)
            .into_iter()
            .map(|child| brute_force(&child, depth - 1, to_move.opponent(), history));
        if to_move == Color::White {
            scores.fold(f64::NEG_INFINITY, f64::max)
        } else {
            scores.fold(f64::INFINITY, f64::min)
        }
    }

    fn small_board() -> Board {
        board(
            "
            ........
            ..R.R...
            ........
            ........
            ...W....
            ......W.
            ........
            ........",
        )
    }

    #[test]
    fn test_dynamic_depth() {
        assert_eq!(dynamic_depth(&Board::new(), 4), 4);
        let b = small_board();
        assert_eq!(b.total_pieces(), 4);
        assert_eq!(dynamic_depth(&b, 4), 8);
    }

    #[test]
    fn test_matches_brute_force() {
        let b = small_board();
        let history = PositionHistory::new();
        for depth in 1..=4 {
            for color in [Color::Red, Color::White] {
                let expected = brute_force(&b, depth, color, &history);
                let mut session = SearchSession::new();
                let got = AlphaBeta::fixed(depth).search(&mut session, &b, color).score;
                assert_eq!(got, expected, "depth {depth}, {color} to move");
            }
        }
    }

    #[test]
    fn test_tt_matches_uncached_search() {
        let b = small_board();
        for depth in 1..=5 {
            let mut cached = SearchSession::new();
            let mut plain = SearchSession::new();
            let with_tt = AlphaBeta::fixed(depth).search(&mut cached, &b, Color::White);
            let without = AlphaBeta::fixed(depth)
                .without_tt()
                .search(&mut plain, &b, Color::White);
            assert_eq!(with_tt.score, without.score, "depth {depth}");
            assert!(plain.tt.is_empty());
        }
    }

    #[test]
    fn test_takes_forced_win() {
        // Red's only capture takes the last white piece.
        let b = board(
            "
            ........
            ..R.....
            ...W....
            ........
            ........
            ........
            ........
            ........",
        );
        let mut session = SearchSession::new();
        let result = AlphaBeta::fixed(2).search(&mut session, &b, Color::Red);
        assert_eq!(result.score, f64::NEG_INFINITY);
        assert_eq!(result.board.piece_count(Color::White), 0);
    }

    #[test]
    fn test_no_moves_returns_input() {
        let b = board(
            "
            ........
            ........
            ........
            ........
            ........
            ........
            .R......
            W.W.....",
        );
        let mut session = SearchSession::new();
        let mut engine = AlphaBeta::new(3, Duration::from_secs(5));
        let reply = engine.choose(&mut session, &b, Color::Red);
        assert_eq!(reply, b);
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_time_limit_still_returns_legal_move() {
        let b = Board::new();
        let mut session = SearchSession::new();
        let engine = AlphaBeta::new(30, Duration::from_millis(50));
        let start = Instant::now();
        let result = engine.search(&mut session, &b, Color::Red);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(result.depth >= 1 && result.depth < 30);
        assert!(successors(&b, Color::Red).contains(&result.board));
    }

    #[test]
    fn test_choose_records_history() {
        let b = Board::new();
        let mut session = SearchSession::new();
        let mut engine = AlphaBeta::fixed(2);
        let reply = engine.choose(&mut session, &b, Color::Red);
        assert_eq!(session.history.occurrences(&reply), 1);
    }

    #[test]
    fn test_deeper_search_reuses_tt() {
        let b = small_board();
        let mut session = SearchSession::new();
        let first = AlphaBeta::fixed(3).search(&mut session, &b, Color::White);
        let again = AlphaBeta::fixed(3).search(&mut session, &b, Color::White);
        assert!(again.tt_hits > 0);
        // Every iteration is answered by the cached root entry.
        assert_eq!(again.nodes, u64::from(again.depth));
        assert_eq!(again.score, first.score);
        assert_eq!(again.board, first.board);
    }

    #[test]
    fn test_cached_root_sees_new_history() {
        let b = small_board();
        let mut session = SearchSession::new();
        let reply = AlphaBeta::fixed(1).choose(&mut session, &b, Color::White);

        // The reply now carries a repetition penalty the old entry lacks.
        let cached = AlphaBeta::fixed(1).search(&mut session, &b, Color::White);
        let fresh = AlphaBeta::fixed(1)
            .without_tt()
            .search(&mut session, &b, Color::White);
        assert_eq!(cached.score, fresh.score);
        assert_eq!(cached.board, fresh.board);
        assert_ne!(cached.board, reply);
    }

    #[test]
    fn test_transposed_position_matches_uncached() {
        let mut session = SearchSession::new();
        AlphaBeta::fixed(4).search(&mut session, &Board::new(), Color::Red);

        let play = |moves: &[(Pos, Pos)]| {
            let mut b = Board::new();
            for &(from, to) in moves {
                b.move_piece(from, to);
            }
            b
        };
        let left = (Pos::new(2, 1), Pos::new(3, 0));
        let right = (Pos::new(2, 7), Pos::new(3, 6));
        let reply = (Pos::new(5, 4), Pos::new(4, 3));
        let b = play(&[left, reply, right]);
        assert_eq!(b, play(&[right, reply, left]));

        let fresh = AlphaBeta::fixed(1)
            .without_tt()
            .search(&mut SearchSession::new(), &b, Color::White);
        if let Some(entry) = session.tt.entry(&b, Color::White) {
            if entry.bound == Bound::Exact {
                assert_eq!(entry.score, fresh.score);
            }
        }
        let cached = AlphaBeta::fixed(1).search(&mut session, &b, Color::White);
        assert_eq!(cached.score, fresh.score);
    }

    #[test]
    fn test_plays_on_when_opponent_is_stuck() {
        let b = board(
            "
            .R......
            W.......
            ...R....
            ......R.
            ........
            ........
            ........
            ........",
        );
        assert_eq!(b.winner(), Some(Color::Red));
        let mut session = SearchSession::new();
        let mut engine = AlphaBeta::new(3, Duration::from_secs(5));
        let reply = engine.choose(&mut session, &b, Color::Red);
        assert!(successors(&b, Color::Red).contains(&reply));
        assert_eq!(session.history.occurrences(&reply), 1);
    }
}
