//! The single-threaded driver: one simulation at a time, strict
//! Select → Expand → Rollout → Backpropagate ordering, exact iteration
//! count. Every other variant in this crate is this loop generalized to
//! a different unit of parallelism; read this one first.
//!
//! Grounded directly on `original_source/common.py::uct`.

use std::rc::Rc;

use rand::Rng;

use mcts_games::GameState;

use crate::algorithm::{backpropagate, rollout};
use crate::config::SearchConfig;
use crate::node::SearchNode;
use crate::tree::SearchTree;

/// Run a sequential UCT search from `root_state` and return the move
/// judged best.
///
/// When `tree` is `None`, the engine builds and discards its own table —
/// there is nothing to prune since nothing survives the call. When a tree
/// is supplied, it is mutated in place and, unless `config.prune` is
/// false, pruned down to the chosen subtree before returning.
pub fn uct<G: GameState>(
    root_state: &G,
    config: &SearchConfig,
    tree: Option<&SearchTree<G>>,
    rng: &mut impl Rng,
) -> G::Move {
    let owned_tree;
    let (tree, should_prune) = match tree {
        Some(t) => (t, config.prune),
        None => {
            owned_tree = SearchTree::new();
            (&owned_tree, false)
        }
    };

    let mut max_depth = 0usize;
    let node_count_before = tree.len();
    let root_tree_node = tree.get_node(root_state);
    let root = SearchNode::root(root_tree_node);

    for _ in 0..config.iter_max {
        // Select
        let mut node = Rc::clone(&root);
        while node.untried_moves().is_empty() && node.has_children() {
            node = node.uct_select_child(config.exploration);
        }

        // Expand
        let (node, rollout_start) = match node.try_expand(tree, rng) {
            Some((child, state)) => (child, state),
            None => {
                let state = node.state();
                (node, state)
            }
        };
        max_depth = max_depth.max(node.depth);

        // Rollout
        let terminal = rollout(&rollout_start, rng);

        // Backpropagate
        backpropagate(node, &terminal);
    }

    let selected = root.uct_select_child(0.0);

    if config.verbose {
        tracing::info!(
            max_depth,
            nodes_generated = tree.len() - node_count_before,
            "sequential search complete"
        );
    }

    if should_prune {
        tree.clean_sub_tree(selected.tree_node());
        if config.verbose {
            tracing::info!(nodes_remaining = tree.len(), "pruned to chosen subtree");
        }
    }

    selected.move_made.expect("root always has at least one legal move to select a child for")
}
