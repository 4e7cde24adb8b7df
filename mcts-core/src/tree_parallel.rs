//! Tree-parallel: `workers` concurrent iteration loops sharing one
//! `SearchTree`. Grounded on
//! `original_source/uct-tree-parallelization.py`'s `SearchThread` plus its
//! lock discipline: the table lock guards `get_node`/`clean_sub_tree`, each
//! `TreeNode` has its own lock for `update`/`add_child`, and the UCB1 read
//! during selection is unlocked in the source (approximated here by the
//! shortest possible snapshot lock — see `SearchNode::uct_select_child`).
//!
//! Each thread builds its own `Rc`-chained `SearchNode` path locally (an
//! `Rc` is not `Send`, so it never crosses a thread boundary) while
//! referencing the one shared `Arc<Mutex<TreeNode<G>>>` table entries —
//! this is exactly the "transposition sharing via parent-less TreeNodes"
//! design the spec calls out (spec.md §9).

use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mcts_games::GameState;

use crate::algorithm::{backpropagate, rollout};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::node::SearchNode;
use crate::tree::SearchTree;

/// Run a tree-parallel UCT search against a tree shared by all workers.
/// Unlike root-parallel, pruning runs once at the end against the single
/// shared table (not disabled — tree-parallel has no reason to skip it).
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
    let per_worker_iters = (config.iter_max / workers).max(1);
    let seeds: Vec<u64> = (0..workers).map(|_| rng.gen()).collect();
    let node_count_before = tree.len();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        std::thread::scope(|scope| {
            let handles: Vec<_> = seeds
                .into_iter()
                .map(|seed| {
                    scope.spawn(move || {
                        let mut worker_rng = ChaCha8Rng::seed_from_u64(seed);
                        run_worker_loop(root_state, tree, config.exploration, per_worker_iters, &mut worker_rng);
                    })
                })
                .collect();

            handles.into_iter().map(|h| h.join()).collect::<Result<Vec<_>, _>>()
        })
    }));

    outcome
        .map_err(|_| SearchError::WorkerPanicked)?
        .map_err(|_| SearchError::WorkerPanicked)?;

    let root_tree_node = tree.get_node(root_state);
    let root = SearchNode::root(root_tree_node);
    let selected = root.uct_select_child(0.0);

    if config.verbose {
        tracing::info!(
            nodes_generated = tree.len() - node_count_before,
            "tree-parallel search complete"
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

fn run_worker_loop<G: GameState>(
    root_state: &G,
    tree: &SearchTree<G>,
    exploration: f64,
    iterations: usize,
    rng: &mut impl Rng,
) {
    let root_tree_node = tree.get_node(root_state);
    let root = SearchNode::root(root_tree_node);

    for _ in 0..iterations {
        let mut node = Rc::clone(&root);
        while node.untried_moves().is_empty() && node.has_children() {
            node = node.uct_select_child(exploration);
        }

        let (node, rollout_start) = match node.try_expand(tree, rng) {
            Some((child, state)) => (child, state),
            None => {
                let state = node.state();
                (node, state)
            }
        };

        let terminal = rollout(&rollout_start, rng);
        backpropagate(node, &terminal);
    }
}
