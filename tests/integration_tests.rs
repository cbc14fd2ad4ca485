//! Integration tests for checkers-rust
//!
//! These exercise the public API end to end: rules, both engines, and the
//! session that ties them together.

use std::time::Duration;

use checkers_rust::alphabeta::AlphaBeta;
use checkers_rust::board::{Board, Color, Pos};
use checkers_rust::engine::{best_move, new_game, SearchConfig, SearchSession};
use checkers_rust::mcts::MonteCarlo;
use checkers_rust::movegen::{all_moves, has_legal_moves, successors};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Parse an 8-row diagram, row 0 first. `R`/`Q` are red man/king,
/// `W`/`K` white man/king, `.` empty.
fn diagram(rows: &str) -> Board {
    rows.parse().expect("valid board diagram")
}

// =============================================================================
// Rules
// =============================================================================

#[test]
fn test_initial_board() {
    let board = new_game();
    assert_eq!(board.piece_count(Color::Red), 12);
    assert_eq!(board.piece_count(Color::White), 12);
    assert_eq!(board.king_count(Color::Red), 0);
    assert_eq!(board.winner(), None);
    assert_eq!(successors(&board, Color::Red).len(), 7);
    assert_eq!(successors(&board, Color::White).len(), 7);
}

#[test]
fn test_mandatory_capture_everywhere() {
    let boards = [
        diagram(
            "
            ........
            ........
            ...R....
            ....W...
            ........
            ..R.....
            ........
            W.......",
        ),
        diagram(
            "
            .R......
            ........
            ...Q....
            ..W.....
            ........
            ........
            .....W..
            ........",
        ),
    ];
    for board in &boards {
        let moves = all_moves(board, Color::Red);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.is_capture()), "{board}");
    }
}

#[test]
fn test_two_jump_chain_is_one_move() {
    let board = diagram(
        "
        ........
        R.......
        .W......
        ........
        ...W....
        ........
        ........
        ........",
    );
    let moves = all_moves(&board, Color::Red);
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].to, Pos::new(5, 4));
    assert_eq!(moves[0].captured.len(), 2);

    let after = moves[0].apply(&board);
    assert_eq!(after.piece_count(Color::White), 0);
    assert_eq!(after.winner(), Some(Color::Red));
}

#[test]
fn test_promotion_happens_once() {
    let mut board = diagram(
        "
        ........
        ........
        ........
        ........
        ........
        ........
        .R......
        ........",
    );
    board.move_piece(Pos::new(6, 1), Pos::new(7, 2));
    assert_eq!(board.king_count(Color::Red), 1);

    board.move_piece(Pos::new(7, 2), Pos::new(6, 3));
    board.move_piece(Pos::new(6, 3), Pos::new(7, 4));
    assert_eq!(board.king_count(Color::Red), 1);
    assert!(board.piece_at(7, 4).is_some_and(|p| p.king));
}

#[test]
fn test_stalemate_loses() {
    let board = diagram(
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
    assert!(!has_legal_moves(&board, Color::Red));
    assert_eq!(board.winner(), Some(Color::White));
}

// =============================================================================
// Engines
// =============================================================================

#[test]
fn test_engines_return_input_without_moves() {
    let board = diagram(
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
    let configs = [
        SearchConfig::alpha_beta(3, 2.0),
        SearchConfig::monte_carlo(50, 2.0),
    ];
    for config in &configs {
        let mut session = SearchSession::with_seed(3);
        assert_eq!(best_move(&mut session, &board, Color::Red, config), board);
    }
}

#[test]
fn test_engines_agree_with_winner_when_opponent_is_stuck() {
    // White's only man is blocked, so Red has already won but still moves.
    let board = diagram(
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
    assert!(has_legal_moves(&board, Color::Red));
    assert!(!has_legal_moves(&board, Color::White));
    assert_eq!(board.winner(), Some(Color::Red));

    let configs = [
        SearchConfig::alpha_beta(3, 2.0),
        SearchConfig::monte_carlo(50, 2.0),
    ];
    for config in &configs {
        let mut session = SearchSession::with_seed(5);
        let reply = best_move(&mut session, &board, Color::Red, config);
        assert!(successors(&board, Color::Red).contains(&reply), "{:?}", config.kind);
    }
}

#[test]
fn test_repeated_root_matches_uncached_search() {
    let mut session = SearchSession::new();
    let config = SearchConfig::alpha_beta(2, 10.0);
    let board = new_game();
    best_move(&mut session, &board, Color::Red, &config);

    let cached = AlphaBeta::fixed(2).search(&mut session, &board, Color::Red);
    let fresh = AlphaBeta::fixed(2).without_tt().search(&mut session, &board, Color::Red);
    assert_eq!(cached.score, fresh.score);
    assert_eq!(cached.board, fresh.board);
}

#[test]
fn test_tt_does_not_change_scores() {
    let board = new_game();
    for turn in [Color::Red, Color::White] {
        for depth in [3, 4] {
            let mut with = SearchSession::new();
            let mut without = SearchSession::new();
            let a = AlphaBeta::fixed(depth).search(&mut with, &board, turn);
            let b = AlphaBeta::fixed(depth).without_tt().search(&mut without, &board, turn);
            assert_eq!(a.score, b.score, "{turn} at depth {depth}");
        }
    }
}

#[test]
fn test_alpha_beta_takes_the_win() {
    // Red's only man can be jumped, ending the game.
    let board = diagram(
        "
        ........
        ........
        ........
        ........
        .....R..
        ....W...
        .......W
        ........",
    );
    let mut session = SearchSession::new();
    let result = AlphaBeta::fixed(2).search(&mut session, &board, Color::White);
    assert_eq!(result.board.winner(), Some(Color::White));
    assert_eq!(result.score, f64::INFINITY);
}

#[test]
fn test_mcts_single_move() {
    let board = diagram(
        "
        ........
        ..R.....
        ...W....
        ........
        .......W
        ........
        ........
        ........",
    );
    let mut session = SearchSession::with_seed(17);
    let root = MonteCarlo::new(120, Duration::from_secs(60)).search(&mut session, &board, Color::Red);
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].n, 120);
}

#[test]
fn test_session_reset_clears_state() {
    let mut session = SearchSession::new();
    let config = SearchConfig::alpha_beta(3, 5.0);
    best_move(&mut session, &new_game(), Color::Red, &config);
    assert!(!session.tt.is_empty());
    assert!(!session.history.is_empty());

    session.reset();
    assert!(session.tt.is_empty());
    assert!(session.history.is_empty());
}

#[test]
fn test_engine_game_stays_legal() {
    let mut sessions = [SearchSession::with_seed(1), SearchSession::with_seed(2)];
    let configs = [
        SearchConfig::alpha_beta(2, 2.0),
        SearchConfig::monte_carlo(40, 2.0),
    ];

    let mut board = new_game();
    let mut turn = Color::Red;
    for ply in 0..30 {
        if board.winner().is_some() {
            break;
        }
        let side = ply % 2;
        let next = best_move(&mut sessions[side], &board, turn, &configs[side]);
        assert!(
            successors(&board, turn).contains(&next),
            "illegal reply at ply {ply}:\n{board}\n{next}"
        );
        board = next;
        turn = turn.opponent();
    }
}
