//! Thin play-harness binary: wires one reference game (Nim, Othello,
//! Gobang) to the chosen parallelization strategy and plays a single
//! self-play game to completion.
//!
//! This is deliberately not the "external driver" spec.md scopes out of the
//! engine — it doesn't do board rendering or a rich play loop, it just
//! proves `mcts-core`'s public API is callable end to end the way
//! `hexwar-cli::match_cmd::run` exercises `hexwar-mcts` end to end.

use std::fmt::Debug;
use std::hash::Hash;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

use mcts_core::config::SearchConfig;
use mcts_core::{leaf, persistence, root, sequential, tree_parallel, SearchTree};
use mcts_games::{GameState, GobangState, NimState, OthelloState};

#[derive(Parser)]
#[command(name = "mcts")]
#[command(about = "Play a reference game to completion against itself using UCT search")]
struct Cli {
    #[command(subcommand)]
    game: GameCommand,
}

#[derive(Subcommand)]
enum GameCommand {
    /// Nim: take 1-3 chips per turn, last chip taken wins.
    Nim {
        /// Starting pile size.
        #[arg(long, default_value = "15")]
        chips: u32,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Othello on a variable-sized square board.
    Othello {
        /// Board side length (even, >= 2).
        #[arg(long, default_value = "8")]
        size: usize,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Gobang (n-in-a-row) on a variable-sized square board.
    Gobang {
        /// Board side length.
        #[arg(long, default_value = "8")]
        size: usize,
        /// Stones in a row needed to win.
        #[arg(long, default_value = "5")]
        in_row: usize,
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(clap::Args)]
struct CommonArgs {
    /// Iteration budget per move.
    #[arg(short = 'i', long = "itermax", default_value = "100")]
    itermax: usize,
    /// Worker count for the parallel strategies (defaults to host CPUs).
    #[arg(short = 'p', long = "parallel")]
    parallel: Option<usize>,
    /// Which parallelization strategy drives the search.
    #[arg(long, value_enum, default_value = "sequential")]
    strategy: Strategy,
    /// Print a per-search summary (max depth, nodes generated) to the log.
    #[arg(long)]
    verbose: bool,
    /// RNG seed; omit for an entropy-seeded, non-reproducible game.
    #[arg(long)]
    seed: Option<u64>,
    /// Load/save the transposition table here across runs. Disables pruning
    /// for the duration of this game (spec.md §4.8) and is ignored by the
    /// root-parallel strategy, which has no single tree to persist.
    #[arg(long)]
    persist: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    Sequential,
    Leaf,
    Root,
    Tree,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.game {
        GameCommand::Nim { chips, common } => play_to_completion(NimState::new(chips), &common),
        GameCommand::Othello { size, common } => play_to_completion(OthelloState::new(size), &common),
        GameCommand::Gobang { size, in_row, common } => {
            play_to_completion(GobangState::new(size, in_row), &common)
        }
    }
}

fn play_to_completion<G>(initial: G, common: &CommonArgs) -> Result<()>
where
    G: GameState + Debug + Send + Sync + Serialize + DeserializeOwned,
    G::Move: Send + Serialize + DeserializeOwned + Hash + Eq,
{
    let mut rng = match common.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let persisting = common.persist.is_some() && !matches!(common.strategy, Strategy::Root);
    if common.persist.is_some() && matches!(common.strategy, Strategy::Root) {
        tracing::warn!("--persist has no effect with --strategy root: each worker discards its own tree");
    }

    let tree: SearchTree<G> = match &common.persist {
        Some(path) if persisting => persistence::load_tree_or_empty(path),
        _ => SearchTree::new(),
    };

    let mut config = SearchConfig::default().with_iter_max(common.itermax);
    if let Some(workers) = common.parallel {
        config = config.with_workers(workers);
    }
    if common.verbose {
        config = config.verbose();
    }
    if persisting {
        config = config.without_pruning();
    }

    let mut state = initial;
    let mut ply = 0u32;

    while !state.is_terminal() {
        let worker_seed: u64 = rng.gen();
        let mut search_rng = ChaCha8Rng::seed_from_u64(worker_seed);

        let mv = match common.strategy {
            Strategy::Sequential => sequential::uct(&state, &config, Some(&tree), &mut search_rng),
            Strategy::Leaf => leaf::uct(&state, &config, &tree, &mut search_rng)?,
            Strategy::Root => root::uct(&state, &config, &mut search_rng)?,
            Strategy::Tree => tree_parallel::uct(&state, &config, &tree, &mut search_rng)?,
        };

        state.do_move(mv);
        ply += 1;
        if common.verbose {
            tracing::info!(ply, player = state.player_just_moved(), ?mv, "move played");
        }
    }

    if persisting {
        if let Some(path) = &common.persist {
            persistence::save_tree(&tree, path)?;
        }
    }

    let result_p1 = state.get_result(1);
    let outcome = if result_p1 > 0.5 {
        "player 1 wins"
    } else if result_p1 < 0.5 {
        "player 2 wins"
    } else {
        "draw"
    };
    println!("game over after {ply} plies: {outcome} (result_p1={result_p1:.2})");

    Ok(())
}
