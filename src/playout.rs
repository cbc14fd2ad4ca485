//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves until the game ends or the
//! ply cap is reached, then scores the result from White's point of view.

use crate::board::{Board, Color};
use crate::constants::{DRAW_VALUE, LOSS_VALUE, ROLLOUT_LIMIT, WIN_VALUE};
use crate::movegen::all_moves;

/// Score of a finished or abandoned playout: 1.0 White won, 0.0 Red won, 0.5 undecided.
#[inline]
pub fn outcome_value(winner: Option<Color>) -> f64 {
    match winner {
        Some(Color::White) => WIN_VALUE,
        Some(Color::Red) => LOSS_VALUE,
        None => DRAW_VALUE,
    }
}

/// Play random moves from `board` with `to_move` to play.
///
/// Stops after `ROLLOUT_LIMIT` plies, when the game is decided, or when the
/// side to move is stuck.
pub fn rollout(board: &Board, to_move: Color, rng: &mut fastrand::Rng) -> f64 {
    let mut board = board.clone();
    let mut turn = to_move;

    for _ in 0..ROLLOUT_LIMIT {
        if board.winner().is_some() {
            break;
        }
        let moves = all_moves(&board, turn);
        if moves.is_empty() {
            break;
        }
        let mv = &moves[rng.usize(..moves.len())];
        board = mv.apply(&board);
        turn = turn.opponent();
    }

    outcome_value(board.winner())
}
