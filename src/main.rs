//! Checkers-Rust: engine-vs-engine checkers.
//!
//! ## Usage
//!
//! - `checkers-rust` - Play a demo game (alpha-beta as Red, MCTS as White)
//! - `checkers-rust demo --red mcts --white alpha-beta` - Pick the engines
//! - `checkers-rust bestmove` - Print Red's reply to the starting position

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use checkers_rust::board::{Board, Color};
use checkers_rust::constants::{DEFAULT_DEPTH, DEFAULT_TIME_LIMIT, N_SIMS};
use checkers_rust::engine::{best_move, new_game, SearchConfig, SearchSession};

/// Checkers-Rust: alpha-beta and MCTS checkers engines
#[derive(Parser)]
#[command(name = "checkers-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine playing Red
    #[arg(long, value_enum, default_value_t = EngineKind::AlphaBeta, global = true)]
    red: EngineKind,

    /// Engine playing White
    #[arg(long, value_enum, default_value_t = EngineKind::Mcts, global = true)]
    white: EngineKind,

    /// Base alpha-beta depth
    #[arg(long, default_value_t = DEFAULT_DEPTH, global = true)]
    depth: u32,

    /// MCTS simulations per move
    #[arg(long, default_value_t = N_SIMS, global = true)]
    sims: u32,

    /// Seconds per move
    #[arg(long, default_value_t = DEFAULT_TIME_LIMIT, global = true)]
    time: f64,

    /// Seed for MCTS rollouts
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Stop the demo game as a draw after this many plies
    #[arg(long, default_value_t = 160, global = true)]
    max_plies: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one engine-vs-engine game, printing every position
    Demo,
    /// Print the Red engine's reply to the starting position
    Bestmove,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    AlphaBeta,
    Mcts,
}

impl Cli {
    fn config(&self, kind: EngineKind) -> SearchConfig {
        match kind {
            EngineKind::AlphaBeta => SearchConfig::alpha_beta(self.depth, self.time),
            EngineKind::Mcts => SearchConfig::monte_carlo(self.sims, self.time),
        }
    }

    fn session(&self) -> SearchSession {
        match self.seed {
            Some(seed) => SearchSession::with_seed(seed),
            None => SearchSession::new(),
        }
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("failed to install logger")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Some(Commands::Bestmove) => run_bestmove(&cli),
        Some(Commands::Demo) | None => run_demo(&cli),
    }
    Ok(())
}

fn run_bestmove(cli: &Cli) {
    let board = new_game();
    let mut session = cli.session();
    let reply = best_move(&mut session, &board, Color::Red, &cli.config(cli.red));
    println!("{reply}");
}

fn run_demo(cli: &Cli) {
    let mut engines = [cli.config(cli.red).engine(), cli.config(cli.white).engine()];
    println!(
        "Checkers-Rust: {} (Red) vs {} (White)\n",
        engines[0].name(),
        engines[1].name()
    );

    // Each side keeps its own session so the engines do not share caches.
    let mut sessions = [cli.session(), cli.session()];

    let mut board: Board = new_game();
    let mut turn = Color::Red;
    let mut ply = 0;
    println!("{board}");

    while ply < cli.max_plies && board.winner().is_none() {
        let side = match turn {
            Color::Red => 0,
            Color::White => 1,
        };
        let next = engines[side].choose(&mut sessions[side], &board, turn);
        if next == board {
            info!("{turn} has no legal move");
            break;
        }
        board = next;
        ply += 1;
        println!("ply {ply}: {turn} ({})\n{board}", engines[side].name());
        turn = turn.opponent();
    }

    match board.winner() {
        Some(winner) => println!("{winner} wins after {ply} plies"),
        None => println!("Draw after {ply} plies"),
    }
}
