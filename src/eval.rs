//! Static evaluation of checkers positions.
//!
//! Scores are always from White's point of view: positive is good for White,
//! negative is good for Red. Both search engines interpret them that way.
//!
//! The score is the sum of:
//! - material (1.0 per piece, 1.5 extra per king)
//! - endgame terms once 10 or fewer pieces remain (center control, pursuit
//!   by the side ahead, and an aggression multiplier below 6 pieces)
//! - a kings-only term (centralization and hunting/evading distance)
//! - minus a penalty for each time the position was already played

use std::collections::HashMap;

use log::info;

use crate::board::{Board, Color, Pos};
use crate::constants::{
    AGGRESSION_BASE, AGGRESSION_PIECES, AGGRESSION_SLOPE, AVG_DISTANCE_WEIGHT, CAPTURE_BONUS,
    CENTER, CENTER_WEIGHT, ENDGAME_PIECES, HISTORY_CAPACITY, HISTORY_EVICT,
    KING_CENTRALITY_WEIGHT, KING_BONUS, KING_DISTANCE_WEIGHT, MAX_CENTER_DISTANCE, PIECE_VALUE,
    PIECES_PER_SIDE, REPETITION_PENALTY,
};

/// Occurrence counts of played positions, keyed by canonical encoding.
///
/// Only consulted as a repetition penalty. Once it holds more than
/// `HISTORY_CAPACITY` positions, `HISTORY_EVICT` arbitrary entries are dropped.
///
/// Every change bumps [`PositionHistory::generation`]; cached search scores
/// are only valid for the generation they were computed under.
#[derive(Debug, Clone, Default)]
pub struct PositionHistory {
    counts: HashMap<String, u32>,
    generation: u64,
}

impl PositionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// How often `board` has been recorded.
    pub fn occurrences(&self, board: &Board) -> u32 {
        self.counts.get(&board.encode()).copied().unwrap_or(0)
    }

    /// Record one more occurrence of `board`, trimming the table if it grew too large.
    pub fn record(&mut self, board: &Board) {
        *self.counts.entry(board.encode()).or_insert(0) += 1;
        self.generation += 1;

        if self.counts.len() > HISTORY_CAPACITY {
            let evicted: Vec<String> = self.counts.keys().take(HISTORY_EVICT).cloned().collect();
            for key in &evicted {
                self.counts.remove(key);
            }
            info!(
                "position history trimmed by {} to {} entries",
                evicted.len(),
                self.counts.len()
            );
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.generation += 1;
    }
}

/// Score of a finished game from White's point of view.
#[inline]
pub fn terminal_score(winner: Color) -> f64 {
    match winner {
        Color::White => f64::INFINITY,
        Color::Red => f64::NEG_INFINITY,
    }
}

/// Material of one side, read from the board counters.
#[inline]
pub fn material(board: &Board, color: Color) -> f64 {
    board.piece_count(color) as f64 * PIECE_VALUE + board.king_count(color) as f64 * KING_BONUS
}

#[inline]
fn center_distance(pos: Pos) -> f64 {
    (pos.row as f64 - CENTER).abs() + (pos.col as f64 - CENTER).abs()
}

fn average_center_distance(positions: &[Pos]) -> f64 {
    if positions.is_empty() {
        return 0.0;
    }
    positions.iter().map(|&p| center_distance(p)).sum::<f64>() / positions.len() as f64
}

/// Closest and average Manhattan distance over all pairs from `a` x `b`.
fn pair_distances(a: &[Pos], b: &[Pos]) -> (f64, f64) {
    if a.is_empty() || b.is_empty() {
        return (0.0, 0.0);
    }
    let mut closest = usize::MAX;
    let mut total = 0usize;
    for &p in a {
        for &q in b {
            let d = p.manhattan(q);
            closest = closest.min(d);
            total += d;
        }
    }
    (closest as f64, total as f64 / (a.len() * b.len()) as f64)
}

/// Positive when the side ahead has `hunters` close to `prey` and has already
/// removed many of its pieces.
fn pursuit(hunters: &[Pos], prey: &[Pos], advantage: f64, prey_left: u8) -> f64 {
    let (closest, average) = pair_distances(hunters, prey);
    let removed = (PIECES_PER_SIDE as f64 - prey_left as f64).max(0.0);
    -closest * advantage - average * AVG_DISTANCE_WEIGHT * advantage
        + CAPTURE_BONUS * advantage * removed
}

fn endgame_term(board: &Board, white: &[Pos], red: &[Pos], white_mat: f64, red_mat: f64) -> f64 {
    let mut score =
        CENTER_WEIGHT * (average_center_distance(red) - average_center_distance(white));

    if white_mat > red_mat {
        score += pursuit(white, red, white_mat - red_mat, board.piece_count(Color::Red));
    } else if red_mat > white_mat {
        score -= pursuit(red, white, red_mat - white_mat, board.piece_count(Color::White));
    }

    let remaining = board.total_pieces();
    if remaining < AGGRESSION_PIECES {
        score *= 1.0 + AGGRESSION_SLOPE * (AGGRESSION_BASE - remaining as f64);
    }
    score
}

fn kings_only(board: &Board, color: Color) -> bool {
    board.king_count(color) > 0 && board.piece_count(color) == board.king_count(color)
}

fn kings_only_term(board: &Board) -> f64 {
    let kings = |color| -> Vec<Pos> {
        board
            .pieces_of(color)
            .into_iter()
            .filter(|(_, piece)| piece.king)
            .map(|(pos, _)| pos)
            .collect()
    };
    let white = kings(Color::White);
    let red = kings(Color::Red);
    if white.is_empty() || red.is_empty() {
        return 0.0;
    }

    let centrality = |ks: &[Pos]| {
        ks.iter()
            .map(|&k| MAX_CENTER_DISTANCE - center_distance(k))
            .sum::<f64>()
            / ks.len() as f64
    };
    let mut score = (centrality(&white) - centrality(&red)) * KING_CENTRALITY_WEIGHT;

    let (closest, _) = pair_distances(&white, &red);
    if white.len() >= red.len() {
        score -= closest * KING_DISTANCE_WEIGHT;
    } else {
        score += closest * KING_DISTANCE_WEIGHT;
    }
    score
}

/// Evaluate a non-terminal position from White's point of view.
pub fn evaluate(board: &Board, history: &PositionHistory) -> f64 {
    let white_mat = material(board, Color::White);
    let red_mat = material(board, Color::Red);
    let repetition = history.occurrences(board) as f64 * REPETITION_PENALTY;

    let mut endgame = 0.0;
    if board.total_pieces() <= ENDGAME_PIECES {
        let positions = |color| -> Vec<Pos> {
            board
                .pieces_of(color)
                .into_iter()
                .map(|(pos, _)| pos)
                .collect()
        };
        let white = positions(Color::White);
        let red = positions(Color::Red);
        endgame += endgame_term(board, &white, &red, white_mat, red_mat);
    }

    if kings_only(board, Color::White) && kings_only(board, Color::Red) {
        endgame += kings_only_term(board);
    }

    (white_mat - red_mat) + endgame - repetition
}

/// Evaluate any position, scoring finished games as +/- infinity.
pub fn evaluate_position(board: &Board, history: &PositionHistory) -> f64 {
    match board.winner() {
        Some(winner) => terminal_score(winner),
        None => evaluate(board, history),
    }
}
