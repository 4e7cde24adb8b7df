//! Root-parallel: `workers` fully independent searches, each over its own
//! tree and `iter_max / workers` iterations, joined and aggregated by
//! summing each worker's per-move child values and taking the arg-max.
//! Grounded on `original_source/uct-root-parallelization.py`'s
//! `SearchWorker`/`multiprocessing.Process` model.
//!
//! The spec allows "isolated address spaces" as the abstraction rather
//! than literally requiring OS processes (spec.md §5); this realizes it
//! with `std::thread::scope` plus one independent `SearchTree` and one
//! independently-seeded `rand_chacha::ChaCha8Rng` per worker, which is the
//! property that actually matters (no shared tree, no shared RNG stream).
//! Trees are discarded when their worker's scope exits; there is no
//! pruning to perform since nothing outlives the search (spec.md §4.6/§4.7).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

use mcts_games::GameState;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::sequential;
use crate::tree::SearchTree;

/// Run a root-parallel UCT search. Returns the move with the highest
/// summed per-worker child value; workers that never explored a given
/// move contribute 0 to its sum.
pub fn uct<G>(root_state: &G, config: &SearchConfig, rng: &mut impl Rng) -> Result<G::Move, SearchError>
where
    G: GameState + Send + Sync,
    G::Move: Send + std::hash::Hash + Eq,
{
    let workers = config.workers.max(1);
    let per_worker_iters = (config.iter_max / workers).max(1);
    let seeds: Vec<u64> = (0..workers).map(|_| rng.gen()).collect();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        std::thread::scope(|scope| {
            let handles: Vec<_> = seeds
                .into_iter()
                .map(|seed| {
                    scope.spawn(move || {
                        let mut worker_rng = ChaCha8Rng::seed_from_u64(seed);
                        let worker_config = SearchConfig {
                            iter_max: per_worker_iters,
                            workers: 1,
                            prune: false,
                            ..config.clone()
                        };
                        let tree: SearchTree<G> = SearchTree::new();
                        let _best = sequential::uct(root_state, &worker_config, Some(&tree), &mut worker_rng);

                        let root_tree_node = tree.get_node(root_state);
                        let guard = root_tree_node.lock().unwrap();
                        let values: FxHashMap<G::Move, f64> = guard
                            .children()
                            .iter()
                            .map(|(mv, child)| (*mv, child.lock().unwrap().value()))
                            .collect();
                        (values, tree.len())
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join())
                .collect::<Result<Vec<_>, _>>()
        })
    }));

    let per_worker = outcome
        .map_err(|_| SearchError::WorkerPanicked)?
        .map_err(|_| SearchError::WorkerPanicked)?;

    let mut summed: FxHashMap<G::Move, f64> = FxHashMap::default();
    let mut nodes_generated = 0usize;
    for (values, size) in &per_worker {
        nodes_generated += size;
        for (mv, value) in values {
            *summed.entry(*mv).or_insert(0.0) += value;
        }
    }

    if config.verbose {
        tracing::info!(nodes_generated, "root-parallel search complete");
    }

    summed
        .into_iter()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(mv, _)| mv)
        .ok_or(SearchError::WorkerPanicked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcts_games::NimState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn root_parallel_finds_the_nim_win() {
        let state = NimState::new(15);
        let config = SearchConfig::default().with_iter_max(1000).with_workers(4);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mv = uct(&state, &config, &mut rng).unwrap();
        assert_eq!(mv, 3);
    }

    #[test]
    fn root_parallel_returns_a_legal_move_on_a_losing_position() {
        let state = NimState::new(12);
        let config = SearchConfig::default().with_iter_max(400).with_workers(4);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mv = uct(&state, &config, &mut rng).unwrap();
        assert!(state.get_moves().contains(&mv));
    }
}
