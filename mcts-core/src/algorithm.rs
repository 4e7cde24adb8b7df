//! The two iteration phases shared verbatim across every parallelization
//! strategy: rollout (simulation) and backpropagation. Selection and
//! expansion live on `SearchNode` itself since they operate node-by-node;
//! these two are free functions because they operate on a whole path or a
//! whole (possibly cloned) state.

use std::rc::Rc;

use rand::seq::SliceRandom;
use rand::Rng;

use mcts_games::GameState;

use crate::node::SearchNode;

/// Random self-play from `start` to a terminal state. Always works on a
/// fresh clone; never touches the tree.
pub fn rollout<G: GameState>(start: &G, rng: &mut impl Rng) -> G {
    let mut state = start.clone();
    loop {
        let moves = state.get_moves();
        let Some(&mv) = moves.choose(rng) else {
            break;
        };
        state.do_move(mv);
    }
    state
}

/// Walk from `node` back to the root, updating each node's visits by one
/// and its wins by `terminal.get_result(node.player_just_moved())`.
pub fn backpropagate<G: GameState>(node: Rc<SearchNode<G>>, terminal: &G) {
    let mut current = Some(node);
    while let Some(n) = current {
        let pjm = n.player_just_moved();
        n.update(terminal.get_result(pjm));
        current = n.parent.clone();
    }
}

/// Leaf-parallel's averaged variant: each node's wins are updated by the
/// *average* of `terminal.get_result(pjm)` across `terminals`, and visits
/// by exactly 1 (not by `terminals.len()`). This understates uncertainty
/// relative to crediting one visit per rollout, but it is preserved
/// deliberately to match `original_source/uct-leaf-parallelization.py`'s
/// semantics — see spec.md §9's open question. Do not "fix" this into
/// incrementing visits by `terminals.len()`.
pub fn backpropagate_averaged<G: GameState>(node: Rc<SearchNode<G>>, terminals: &[G]) {
    assert!(!terminals.is_empty());
    let mut current = Some(node);
    while let Some(n) = current {
        let pjm = n.player_just_moved();
        let avg = terminals.iter().map(|t| t.get_result(pjm)).sum::<f64>() / terminals.len() as f64;
        n.update(avg);
        current = n.parent.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SearchTree;
    use mcts_games::NimState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rollout_always_reaches_a_terminal_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let terminal = rollout(&NimState::new(15), &mut rng);
        assert!(terminal.is_terminal());
    }

    #[test]
    fn backpropagate_increments_visits_by_one_per_node() {
        let tree: SearchTree<NimState> = SearchTree::new();
        let root_state = NimState::new(3);
        let root_tree_node = tree.get_node(&root_state);
        let root = SearchNode::root(root_tree_node);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let (child, rollout_state) = root.try_expand(&tree, &mut rng).unwrap();
        let terminal = rollout(&rollout_state, &mut rng);
        backpropagate(child, &terminal);

        assert_eq!(root.tree_node().lock().unwrap().visits(), 2.0);
    }

    #[test]
    fn backpropagate_averaged_increments_visits_by_one_not_by_batch_size() {
        let tree: SearchTree<NimState> = SearchTree::new();
        let root_state = NimState::new(3);
        let root_tree_node = tree.get_node(&root_state);
        let root = SearchNode::root(root_tree_node);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let (child, rollout_state) = root.try_expand(&tree, &mut rng).unwrap();
        let terminals: Vec<NimState> = (0..5).map(|_| rollout(&rollout_state, &mut rng)).collect();
        backpropagate_averaged(child, &terminals);

        assert_eq!(root.tree_node().lock().unwrap().visits(), 2.0);
    }
}
