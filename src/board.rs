//! Checkers board representation.
//!
//! The board is an 8x8 grid of [`Square`]s plus per-color piece and king
//! counters. Red starts on rows 0-2 and moves toward row 7; White starts on
//! rows 5-7 and moves toward row 0. Only dark squares (`(row + col)` odd) are
//! ever occupied.
//!
//! Boards are value types: search code explores a move by cloning the board
//! and mutating the clone, so sibling branches never share state.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    HOME_ROWS, N, PIECES_PER_SIDE, SYM_EMPTY, SYM_RED, SYM_RED_KING, SYM_WHITE, SYM_WHITE_KING,
};
use crate::movegen::has_legal_moves;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    White,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Red => Color::White,
            Color::White => Color::Red,
        }
    }

    /// Row step of a man of this color.
    #[inline]
    pub fn forward(self) -> isize {
        match self {
            Color::Red => 1,
            Color::White => -1,
        }
    }

    /// The far rank where men of this color are crowned.
    #[inline]
    pub fn promotion_row(self) -> usize {
        match self {
            Color::Red => N - 1,
            Color::White => 0,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::White => write!(f, "White"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub king: bool,
}

impl Piece {
    pub fn man(color: Color) -> Self {
        Self { color, king: false }
    }

    pub fn king(color: Color) -> Self {
        Self { color, king: true }
    }

    fn symbol(self) -> u8 {
        match (self.color, self.king) {
            (Color::Red, false) => SYM_RED,
            (Color::Red, true) => SYM_RED_KING,
            (Color::White, false) => SYM_WHITE,
            (Color::White, true) => SYM_WHITE_KING,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Square {
    #[default]
    Empty,
    Occupied(Piece),
}

impl Square {
    #[inline]
    pub fn piece(self) -> Option<Piece> {
        match self {
            Square::Empty => None,
            Square::Occupied(piece) => Some(piece),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Square::Empty
    }
}

/// A square coordinate. Row 0 is Red's back rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    /// Panics if the coordinate is off the board.
    pub fn new(row: usize, col: usize) -> Self {
        assert!(row < N && col < N, "square ({row}, {col}) is off the board");
        Self { row, col }
    }

    /// The square `steps` diagonal steps away in direction `(dr, dc)`, if on the board.
    #[inline]
    pub fn offset(self, (dr, dc): (isize, isize), steps: isize) -> Option<Pos> {
        let row = self.row as isize + dr * steps;
        let col = self.col as isize + dc * steps;
        if (0..N as isize).contains(&row) && (0..N as isize).contains(&col) {
            Some(Pos {
                row: row as usize,
                col: col as usize,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn manhattan(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    #[inline]
    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A checkers position.
///
/// The counters are maintained incrementally by [`Board::move_piece`] and
/// [`Board::remove`]. Removing a king decrements the piece counter only; the
/// king counter keeps its value, so it reads as "kings ever crowned minus
/// none". Terminal detection only looks at the piece counter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [[Square; N]; N],
    pieces: [u8; 2],
    kings: [u8; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting position: 12 men per side on the dark squares.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..N {
            for col in 0..N {
                let pos = Pos { row, col };
                if !pos.is_dark() {
                    continue;
                }
                if row < HOME_ROWS {
                    board.grid[row][col] = Square::Occupied(Piece::man(Color::Red));
                } else if row >= N - HOME_ROWS {
                    board.grid[row][col] = Square::Occupied(Piece::man(Color::White));
                }
            }
        }
        board.pieces = [PIECES_PER_SIDE; 2];
        board
    }

    /// A board with no pieces, for building hand-made positions with [`Board::place`].
    pub fn empty() -> Self {
        Self {
            grid: [[Square::Empty; N]; N],
            pieces: [0; 2],
            kings: [0; 2],
        }
    }

    /// Put a piece on an empty dark square, updating the counters.
    pub fn place(&mut self, pos: Pos, piece: Piece) {
        assert!(pos.is_dark(), "pieces only stand on dark squares, not {pos}");
        assert!(self.square(pos).is_empty(), "square {pos} is already occupied");
        self.grid[pos.row][pos.col] = Square::Occupied(piece);
        self.pieces[piece.color.index()] += 1;
        if piece.king {
            self.kings[piece.color.index()] += 1;
        }
    }

    #[inline]
    pub fn square(&self, pos: Pos) -> Square {
        self.grid[pos.row][pos.col]
    }

    /// The piece at `(row, col)`, if any. Panics on an off-board coordinate.
    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        self.square(Pos::new(row, col)).piece()
    }

    /// All pieces of `color` in row-major order.
    pub fn pieces_of(&self, color: Color) -> Vec<(Pos, Piece)> {
        let mut out = Vec::with_capacity(self.piece_count(color) as usize);
        for row in 0..N {
            for col in 0..N {
                if let Square::Occupied(piece) = self.grid[row][col] {
                    if piece.color == color {
                        out.push((Pos { row, col }, piece));
                    }
                }
            }
        }
        out
    }

    #[inline]
    pub fn piece_count(&self, color: Color) -> u8 {
        self.pieces[color.index()]
    }

    #[inline]
    pub fn king_count(&self, color: Color) -> u8 {
        self.kings[color.index()]
    }

    #[inline]
    pub fn total_pieces(&self) -> u8 {
        self.pieces[0] + self.pieces[1]
    }

    /// Relocate the piece on `from` to `to`, crowning it on its far rank.
    ///
    /// Crowning happens once: moving an existing king onto the far rank
    /// leaves the king counter alone.
    pub fn move_piece(&mut self, from: Pos, to: Pos) {
        let Square::Occupied(mut piece) = self.square(from) else {
            panic!("no piece to move on {from}");
        };
        assert!(
            from == to || self.square(to).is_empty(),
            "destination {to} is occupied"
        );
        self.grid[from.row][from.col] = Square::Empty;
        if to.row == piece.color.promotion_row() && !piece.king {
            piece.king = true;
            self.kings[piece.color.index()] += 1;
        }
        self.grid[to.row][to.col] = Square::Occupied(piece);
    }

    /// Clear each given square and decrement its owner's piece counter.
    pub fn remove(&mut self, captured: &[Pos]) {
        for &pos in captured {
            if let Square::Occupied(piece) = self.square(pos) {
                self.grid[pos.row][pos.col] = Square::Empty;
                self.pieces[piece.color.index()] -= 1;
            }
        }
    }

    /// The winner, if the game is over.
    ///
    /// A side loses when it has no pieces left or when none of its pieces
    /// can move. Red is checked first in both cases.
    pub fn winner(&self) -> Option<Color> {
        if self.piece_count(Color::Red) == 0 {
            return Some(Color::White);
        }
        if self.piece_count(Color::White) == 0 {
            return Some(Color::Red);
        }
        if !has_legal_moves(self, Color::Red) {
            return Some(Color::White);
        }
        if !has_legal_moves(self, Color::White) {
            return Some(Color::Red);
        }
        None
    }

    /// Canonical 64-character encoding, one symbol per square in row-major order.
    pub fn encode(&self) -> String {
        self.grid
            .iter()
            .flatten()
            .map(|sq| match sq {
                Square::Empty => SYM_EMPTY as char,
                Square::Occupied(piece) => piece.symbol() as char,
            })
            .collect()
    }

    /// A simple polynomial checksum of [`Board::encode`].
    ///
    /// Not collision resistant; consumers must compare boards before trusting a match.
    pub fn checksum(&self) -> u64 {
        self.encode()
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
    }
}

/// Error returned when parsing a board diagram fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBoardError {
    #[error("expected 64 squares, found {0}")]
    Length(usize),

    #[error("unknown square symbol '{0}'")]
    Symbol(char),

    #[error("piece on light square {0}")]
    LightSquare(Pos),
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parse a diagram in the canonical symbols; `.` is also accepted for
    /// empty squares and whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.len() != N * N {
            return Err(ParseBoardError::Length(symbols.len()));
        }
        let mut board = Board::empty();
        for (i, &c) in symbols.iter().enumerate() {
            let pos = Pos {
                row: i / N,
                col: i % N,
            };
            let piece = match c as u8 {
                b'.' | SYM_EMPTY => continue,
                SYM_RED => Piece::man(Color::Red),
                SYM_RED_KING => Piece::king(Color::Red),
                SYM_WHITE => Piece::man(Color::White),
                SYM_WHITE_KING => Piece::king(Color::White),
                _ => return Err(ParseBoardError::Symbol(c)),
            };
            if !pos.is_dark() {
                return Err(ParseBoardError::LightSquare(pos));
            }
            board.place(pos, piece);
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            for sq in row {
                let ch = match sq {
                    Square::Empty => '.',
                    Square::Occupied(piece) => piece.symbol() as char,
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
