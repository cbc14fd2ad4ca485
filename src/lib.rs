//! Checkers-Rust: 8x8 checkers with two competing search engines.
//!
//! This crate plays checkers (draughts) under forced-capture rules and
//! offers an alpha-beta searcher and a Monte Carlo Tree Search engine
//! behind one [`engine::Engine`] trait.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, evaluation weights, and search parameters
//! - [`board`] - Board state, pieces, promotion, and game-over detection
//! - [`movegen`] - Legal moves, capture chains, and mandatory capture
//! - [`eval`] - Static evaluation and the repetition history
//! - [`tt`] - Transposition table
//! - [`alphabeta`] - Iterative-deepening alpha-beta search
//! - [`mcts`] - Monte Carlo Tree Search with UCT
//! - [`playout`] - Random game simulation for MCTS
//! - [`engine`] - Search sessions, configuration, and the public entry points
//!
//! ## Example
//!
//! ```
//! use checkers_rust::board::Color;
//! use checkers_rust::engine::{best_move, new_game, SearchConfig, SearchSession};
//!
//! // Create a new game
//! let board = new_game();
//! let mut session = SearchSession::with_seed(42);
//!
//! // Let MCTS answer for Red
//! let config = SearchConfig::monte_carlo(100, 2.0);
//! let reply = best_move(&mut session, &board, Color::Red, &config);
//! println!("{reply}");
//! ```

pub mod alphabeta;
pub mod board;
pub mod constants;
pub mod engine;
pub mod eval;
pub mod mcts;
pub mod movegen;
pub mod playout;
pub mod tt;
