//! Transposition table for caching alpha-beta results.
//!
//! Entries are keyed by [`Board::checksum`], a cheap checksum of the
//! canonical encoding. Because the checksum can collide, every entry also
//! keeps the full position and side to move, and a probe only succeeds when
//! both match exactly.
//!
//! Scores depend on the repetition history they were computed under, so
//! entries are tagged with [`PositionHistory::generation`](crate::eval::PositionHistory::generation)
//! and entries from another generation never answer a probe.
//!
//! # Example
//!
//! ```
//! use checkers_rust::board::{Board, Color};
//! use checkers_rust::tt::{Bound, TranspositionTable};
//!
//! let mut tt = TranspositionTable::new();
//! let board = Board::new();
//!
//! tt.store(&board, Color::Red, 0, 3, 0.5, Bound::Exact, None);
//! let hit = tt.probe(&board, Color::Red, 0, 3, f64::NEG_INFINITY, f64::INFINITY);
//! assert_eq!(hit.map(|(score, _)| score), Some(0.5));
//!
//! // A later history generation misses.
//! assert!(tt.probe(&board, Color::Red, 1, 3, f64::NEG_INFINITY, f64::INFINITY).is_none());
//! ```

use std::collections::HashMap;

use crate::board::{Board, Color};

/// How a stored score relates to the true minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside the window
    Exact,
    /// True value >= stored score (beta cutoff)
    LowerBound,
    /// True value <= stored score (failed low)
    UpperBound,
}

#[derive(Debug, Clone)]
pub struct TtEntry {
    /// History generation the score was computed under
    pub generation: u64,
    pub depth: u32,
    pub score: f64,
    pub bound: Bound,
    /// Side to move in the stored position
    pub to_move: Color,
    /// The stored position, compared on every probe
    pub position: Board,
    /// Best successor found, if the position had moves
    pub best: Option<Board>,
}

/// Statistics about table usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TtStats {
    pub entries: usize,
    pub probes: u64,
    pub hits: u64,
    /// Probes that found the checksum but a different position
    pub collisions: u64,
}

/// Unbounded transposition table. Owned by a search session and cleared
/// between independent games.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, TtEntry>,
    probes: u64,
    hits: u64,
    collisions: u64,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a usable result for `position` searched to at least `depth`.
    ///
    /// Returns `Some((score, best))` only if the entry belongs to
    /// `generation`, the stored depth is sufficient, and the bound is
    /// consistent with the `alpha`/`beta` window.
    pub fn probe(
        &mut self,
        position: &Board,
        to_move: Color,
        generation: u64,
        depth: u32,
        alpha: f64,
        beta: f64,
    ) -> Option<(f64, Option<Board>)> {
        self.probes += 1;
        let entry = self.entries.get(&position.checksum())?;

        if entry.to_move != to_move || entry.position != *position {
            self.collisions += 1;
            return None;
        }
        if entry.generation != generation || entry.depth < depth {
            return None;
        }

        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::LowerBound => entry.score >= beta,
            Bound::UpperBound => entry.score <= alpha,
        };
        if !usable {
            return None;
        }

        self.hits += 1;
        Some((entry.score, entry.best.clone()))
    }

    /// Store a completed search result.
    ///
    /// An existing entry for the same position and generation is only
    /// replaced by a search at least as deep. Stale or colliding entries are
    /// always replaced.
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        position: &Board,
        to_move: Color,
        generation: u64,
        depth: u32,
        score: f64,
        bound: Bound,
        best: Option<Board>,
    ) {
        let hash = position.checksum();
        if let Some(existing) = self.entries.get(&hash) {
            let same = existing.to_move == to_move
                && existing.position == *position
                && existing.generation == generation;
            if same && existing.depth > depth {
                return;
            }
        }
        self.entries.insert(
            hash,
            TtEntry {
                generation,
                depth,
                score,
                bound,
                to_move,
                position: position.clone(),
                best,
            },
        );
    }

    /// The raw entry for `position`, ignoring generation, depth and bounds.
    pub fn entry(&self, position: &Board, to_move: Color) -> Option<&TtEntry> {
        self.entries
            .get(&position.checksum())
            .filter(|e| e.to_move == to_move && e.position == *position)
    }

    /// Clear all entries and statistics.
    ///
    /// This should be called when starting a new game.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.probes = 0;
        self.hits = 0;
        self.collisions = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> TtStats {
        TtStats {
            entries: self.entries.len(),
            probes: self.probes,
            hits: self.hits,
            collisions: self.collisions,
        }
    }
}
