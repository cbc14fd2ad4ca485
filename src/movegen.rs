//! Legal move generation.
//!
//! Men step and capture diagonally forward; kings use all four diagonals.
//! A capture chain is generated as one [`Move`] that lists every jumped piece
//! in order. Chains must be completed: only squares where no further jump is
//! possible are destinations. When any capture exists for a side, only
//! capturing moves are legal for that side.
//!
//! A man never reverses mid-chain: after each jump it continues only along
//! its forward diagonals. Only kings can turn back.

use crate::board::{Board, Color, Piece, Pos};
use crate::constants::DIAGONALS;

/// A single ply: a piece travels from `from` to `to`, jumping `captured` in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Pos,
    pub to: Pos,
    pub captured: Vec<Pos>,
}

impl Move {
    #[inline]
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    /// The position after this move, leaving `board` untouched.
    pub fn apply(&self, board: &Board) -> Board {
        let mut next = board.clone();
        next.move_piece(self.from, self.to);
        next.remove(&self.captured);
        next
    }
}

/// Directions a piece may travel in.
#[inline]
fn directions(piece: Piece) -> impl Iterator<Item = (isize, isize)> {
    DIAGONALS
        .into_iter()
        .filter(move |&(dr, _)| piece.king || dr == piece.color.forward())
}

/// All moves of the piece on `from`, capturing and non-capturing.
///
/// The mandatory-capture rule is not applied here; see [`all_moves`].
pub fn piece_moves(board: &Board, from: Pos) -> Vec<Move> {
    let piece = board
        .square(from)
        .piece()
        .unwrap_or_else(|| panic!("no piece on {from}"));

    let mut moves = Vec::new();
    for dir in directions(piece) {
        if let Some(to) = from.offset(dir, 1) {
            if board.square(to).is_empty() {
                moves.push(Move {
                    from,
                    to,
                    captured: Vec::new(),
                });
            }
        }
    }

    let mut captured = Vec::new();
    extend_captures(board, from, piece, from, &mut captured, &mut moves);
    moves
}

/// Recursively follow jumps from `at`, recording completed chains in `out`.
///
/// Jumped pieces stay on the board until the move is applied, so they block
/// landing and cannot be jumped twice. The mover's origin counts as empty.
fn extend_captures(
    board: &Board,
    origin: Pos,
    piece: Piece,
    at: Pos,
    captured: &mut Vec<Pos>,
    out: &mut Vec<Move>,
) {
    let mut extended = false;

    for dir in directions(piece) {
        let (Some(over), Some(land)) = (at.offset(dir, 1), at.offset(dir, 2)) else {
            continue;
        };
        let Some(victim) = board.square(over).piece() else {
            continue;
        };
        if victim.color == piece.color || captured.contains(&over) {
            continue;
        }
        if !board.square(land).is_empty() && land != origin {
            continue;
        }

        extended = true;
        captured.push(over);
        extend_captures(board, origin, piece, land, captured, out);
        captured.pop();
    }

    if !extended && !captured.is_empty() {
        // A king can reach the same square by jumping the same pieces in a
        // different order; keep one of them.
        let duplicate = out.iter().any(|m| {
            m.to == at
                && m.captured.len() == captured.len()
                && captured.iter().all(|p| m.captured.contains(p))
        });
        if !duplicate {
            out.push(Move {
                from: origin,
                to: at,
                captured: captured.clone(),
            });
        }
    }
}

/// All legal moves for `color`, enforcing mandatory capture.
pub fn all_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves: Vec<Move> = board
        .pieces_of(color)
        .into_iter()
        .flat_map(|(pos, _)| piece_moves(board, pos))
        .collect();

    if moves.iter().any(Move::is_capture) {
        moves.retain(Move::is_capture);
    }
    moves
}

/// Every position reachable by one legal ply of `color`.
pub fn successors(board: &Board, color: Color) -> Vec<Board> {
    all_moves(board, color)
        .iter()
        .map(|mv| mv.apply(board))
        .collect()
}

/// Whether `color` has at least one legal move.
pub fn has_legal_moves(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .into_iter()
        .any(|(pos, _)| !piece_moves(board, pos).is_empty())
}
