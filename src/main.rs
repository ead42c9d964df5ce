//! Sudoku-Duel: anytime adversarial Sudoku engine.
//!
//! ## Usage
//!
//! - `sudoku-duel` - Compute one turn on the demo position
//! - `sudoku-duel demo --strategy mcts --budget-ms 500` - Pick the strategy
//!   and budget

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use sudoku_duel::board::Board;
use sudoku_duel::deepening::IterativeDeepening;
use sudoku_duel::executor::AnytimeExecutor;
use sudoku_duel::mcts::MctsStrategy;
use sudoku_duel::minimax::FixedDepthMinimax;
use sudoku_duel::state::GameState;
use sudoku_duel::strategy::SearchStrategy;

/// Sudoku-Duel: anytime search for competitive Sudoku
#[derive(Parser)]
#[command(name = "sudoku-duel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one turn on the built-in demo position
    Demo {
        /// Search strategy to run
        #[arg(long, value_enum, default_value_t = StrategyKind::Deepening)]
        strategy: StrategyKind,
        /// Wall-clock budget in milliseconds
        #[arg(long, default_value_t = 500)]
        budget_ms: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyKind {
    /// Single pass of depth-2 minimax
    Minimax,
    /// Iterative deepening over alpha-beta
    Deepening,
    /// Monte Carlo Tree Search
    Mcts,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Demo {
            strategy,
            budget_ms,
        }) => run_demo(strategy, budget_ms),
        None => run_demo(StrategyKind::Deepening, 500),
    }
}

/// A nearly finished 4x4 position, small enough to search in a few ms.
fn demo_state() -> Result<GameState> {
    let board = Board::from_cells(
        2,
        2,
        vec![
            1, 2, 3, 4, //
            3, 4, 0, 2, //
            2, 1, 0, 3, //
            0, 0, 0, 1,
        ],
    )?;
    Ok(GameState::new(board))
}

fn run_demo(kind: StrategyKind, budget_ms: u64) -> Result<()> {
    let state = demo_state()?;
    println!("Board:\n{}", state.board);

    let strategy: Box<dyn SearchStrategy> = match kind {
        StrategyKind::Minimax => Box::new(FixedDepthMinimax::new(2)),
        StrategyKind::Deepening => Box::new(IterativeDeepening::new()),
        StrategyKind::Mcts => Box::new(MctsStrategy::new()),
    };

    let executor = AnytimeExecutor::new(Duration::from_millis(budget_ms));
    match executor.run(strategy, state) {
        Some(mv) => println!("Best move after {budget_ms} ms: {mv}"),
        None => println!("No move found within {budget_ms} ms: turn forfeited"),
    }
    Ok(())
}
