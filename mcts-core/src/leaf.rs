//! Leaf-parallel: one Select/Expand per iteration as in `sequential`, but
//! the Rollout phase fans out into `workers` independent rollouts from the
//! same expanded state, joined before Backpropagate. Grounded on
//! `original_source/uct-leaf-parallelization.py`'s `SimulationThread`,
//! realized with `rayon` the way `hexwar-tournament::match_play` batches
//! independent games with `par_iter`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use mcts_games::GameState;

use crate::algorithm::{backpropagate_averaged, rollout};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::node::SearchNode;
use crate::tree::SearchTree;

/// Run a leaf-parallel UCT search. `tree` is always supplied and mutated
/// in place (unlike `sequential::uct`, this variant has no ephemeral-tree
/// shorthand, since the shared tree is the whole point of the exercise).
///
/// Each of the `workers` rollouts gets its own independently-seeded RNG
/// stream per spec.md §5 ("sharing one source across workers is
/// forbidden"); a worker panic is caught and reported as
/// `SearchError::WorkerPanicked` rather than silently dropping results.
pub fn uct<G>(
    root_state: &G,
    config: &SearchConfig,
    tree: &SearchTree<G>,
    rng: &mut impl Rng,
) -> Result<G::Move, SearchError>
where
    G: GameState + Send + Sync,
    G::Move: Send,
{
    let workers = config.workers.max(1);
    let mut max_depth = 0usize;
    let node_count_before = tree.len();
    let root_tree_node = tree.get_node(root_state);
    let root = SearchNode::root(root_tree_node);

    for _ in 0..config.iter_max {
        let mut node = Rc::clone(&root);
        while node.untried_moves().is_empty() && node.has_children() {
            node = node.uct_select_child(config.exploration);
        }

        let (node, rollout_start) = match node.try_expand(tree, rng) {
            Some((child, state)) => (child, state),
            None => {
                let state = node.state();
                (node, state)
            }
        };
        max_depth = max_depth.max(node.depth);

        let seeds: Vec<u64> = (0..workers).map(|_| rng.gen()).collect();
        let batch = catch_unwind(AssertUnwindSafe(|| {
            seeds
                .into_par_iter()
                .map(|seed| {
                    let mut worker_rng = ChaCha8Rng::seed_from_u64(seed);
                    rollout(&rollout_start, &mut worker_rng)
                })
                .collect::<Vec<G>>()
        }))
        .map_err(|_| SearchError::WorkerPanicked)?;

        backpropagate_averaged(node, &batch);
    }

    let selected = root.uct_select_child(0.0);

    if config.verbose {
        tracing::info!(
            max_depth,
            nodes_generated = tree.len() - node_count_before,
            "leaf-parallel search complete"
        );
    }

    if config.prune {
        tree.clean_sub_tree(selected.tree_node());
        if config.verbose {
            tracing::info!(nodes_remaining = tree.len(), "pruned to chosen subtree");
        }
    }

    Ok(selected.move_made.expect("root always has at least one legal move to select a child for"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcts_games::NimState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn leaf_parallel_finds_the_nim_win() {
        let state = NimState::new(15);
        let config = SearchConfig::default().with_iter_max(300).with_workers(4);
        let tree = SearchTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mv = uct(&state, &config, &tree, &mut rng).unwrap();
        assert_eq!(mv, 3);
    }

    #[test]
    fn leaf_parallel_with_one_worker_matches_averaging_of_one() {
        let state = NimState::new(5);
        let config = SearchConfig::default().with_iter_max(50).with_workers(1);
        let tree = SearchTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mv = uct(&state, &config, &tree, &mut rng).unwrap();
        assert!(state.get_moves().contains(&mv));
    }
}
