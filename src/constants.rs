//! Constants for board geometry, evaluation weights, and search parameters.
//!
//! All tunable numbers of the engines live here so the search and evaluation
//! modules read as pure logic.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Checkers is always played on 8x8.
pub const N: usize = 8;

/// Number of men each side starts with.
pub const PIECES_PER_SIDE: u8 = 12;

/// Rows occupied by each side at the start (Red at the top, White at the bottom).
pub const HOME_ROWS: usize = 3;

/// Center of the board used by distance-from-center terms.
pub const CENTER: f64 = 3.5;

/// Diagonal step offsets as (row, col) deltas.
/// Order: down-left, down-right, up-left, up-right.
pub const DIAGONALS: [(isize, isize); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];

// =============================================================================
// Canonical Encoding Symbols
// =============================================================================

/// Empty square.
pub const SYM_EMPTY: u8 = b'0';

/// Red man.
pub const SYM_RED: u8 = b'R';

/// Red king.
pub const SYM_RED_KING: u8 = b'Q';

/// White man.
pub const SYM_WHITE: u8 = b'W';

/// White king.
pub const SYM_WHITE_KING: u8 = b'K';

// =============================================================================
// Evaluation Weights
// =============================================================================

/// Material value of any piece.
pub const PIECE_VALUE: f64 = 1.0;

/// Extra material value of a king on top of `PIECE_VALUE`.
pub const KING_BONUS: f64 = 1.5;

/// Penalty per recorded occurrence of the current position.
pub const REPETITION_PENALTY: f64 = 2.0;

/// Endgame terms switch on at this many total pieces or fewer.
pub const ENDGAME_PIECES: u8 = 10;

/// Weight of the center-control difference in the endgame.
pub const CENTER_WEIGHT: f64 = 0.2;

/// Weight of the average pairwise distance for the side ahead.
pub const AVG_DISTANCE_WEIGHT: f64 = 0.5;

/// Bonus per opponent piece already removed, scaled by the advantage.
pub const CAPTURE_BONUS: f64 = 5.0;

/// Below this many total pieces the endgame term is amplified.
pub const AGGRESSION_PIECES: u8 = 6;

/// Aggression multiplier slope: `1 + AGGRESSION_SLOPE * (AGGRESSION_BASE - remaining)`.
pub const AGGRESSION_SLOPE: f64 = 2.0;

/// Piece count the aggression multiplier counts down from.
pub const AGGRESSION_BASE: f64 = 8.0;

/// Largest Manhattan distance from the center; centrality is this minus distance.
pub const MAX_CENTER_DISTANCE: f64 = 7.0;

/// Weight of the centrality difference in kings-only endgames.
pub const KING_CENTRALITY_WEIGHT: f64 = 3.0;

/// Weight of the closest king-to-king distance in kings-only endgames.
pub const KING_DISTANCE_WEIGHT: f64 = 2.0;

// =============================================================================
// Position History
// =============================================================================

/// History is trimmed once it holds more than this many positions.
pub const HISTORY_CAPACITY: usize = 500;

/// Number of positions dropped by one trim.
pub const HISTORY_EVICT: usize = 250;

// =============================================================================
// Alpha-Beta Parameters
// =============================================================================

/// Default base search depth.
pub const DEFAULT_DEPTH: u32 = 4;

/// Default time per move in seconds.
pub const DEFAULT_TIME_LIMIT: f64 = 5.0;

/// Fraction of the time limit after which no new depth is started.
pub const DEEPENING_CUTOFF: f64 = 0.8;

/// Fraction of the time limit after which a running search aborts.
pub const ABORT_CUTOFF: f64 = 0.95;

/// The deadline is checked once every this many nodes (must be a power of two).
pub const TIME_CHECK_INTERVAL: u64 = 64;

/// Extra depth by total remaining pieces: (at most this many pieces, bonus).
pub const DEPTH_BONUS: [(u8, u32); 4] = [(4, 4), (6, 3), (8, 2), (12, 1)];

// =============================================================================
// MCTS (Monte Carlo Tree Search) Parameters
// =============================================================================

/// Default number of simulations per move.
pub const N_SIMS: u32 = 800;

/// UCT exploration constant.
pub const UCT_C: f64 = 1.4;

/// Maximum plies played by one rollout before it is scored as a draw.
pub const ROLLOUT_LIMIT: usize = 60;

/// Rollout value when White wins.
pub const WIN_VALUE: f64 = 1.0;

/// Rollout value when Red wins.
pub const LOSS_VALUE: f64 = 0.0;

/// Rollout value when the ply cap is reached.
pub const DRAW_VALUE: f64 = 0.5;
